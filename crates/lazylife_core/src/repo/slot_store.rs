//! Key-value slot contract.
//!
//! # Responsibility
//! - Define the `SlotStore` port used by every service.
//! - Own slot key naming and validation.
//!
//! # Invariants
//! - A slot holds one opaque UTF-8 string (JSON by convention).
//! - Keys match `[a-z0-9][a-z0-9._-]*`.

use crate::db::DbError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot holding the task list.
pub const TASKS_KEY: &str = "offline-task-manager-tasks";
/// Slot holding the note list.
pub const NOTES_KEY: &str = "offline-noter-notes";
/// Slot holding earned achievement IDs.
pub const ACHIEVEMENTS_KEY: &str = "offline-task-manager-achievements";
/// Slot holding aggregate stats.
pub const STATS_KEY: &str = "offline-task-manager-stats";
/// Slot holding the last retention sweep time (epoch ms, decimal string).
pub const LAST_CLEANUP_KEY: &str = "offline-task-manager-last-cleanup";

static SLOT_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9._-]*$").expect("valid slot key regex"));

pub type RepoResult<T> = Result<T, RepoError>;

/// Slot store error.
#[derive(Debug)]
pub enum RepoError {
    /// Key does not match the slot naming rule.
    InvalidKey(String),
    /// Backend refused or failed the operation.
    Unavailable(String),
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKey(key) => write!(f, "invalid slot key: `{key}`"),
            Self::Unavailable(message) => write!(f, "slot store unavailable: {message}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence port over string-keyed slots.
pub trait SlotStore {
    fn get(&self, key: &str) -> RepoResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> RepoResult<()>;
    /// Removing a missing slot is not an error.
    fn remove(&self, key: &str) -> RepoResult<()>;
}

impl<S: SlotStore + ?Sized> SlotStore for &S {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> RepoResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> RepoResult<()> {
        (**self).remove(key)
    }
}

/// Rejects keys outside the slot naming rule.
pub fn validate_slot_key(key: &str) -> RepoResult<()> {
    if SLOT_KEY_RE.is_match(key) {
        Ok(())
    } else {
        Err(RepoError::InvalidKey(key.to_string()))
    }
}
