//! Note domain model.
//!
//! Notes are flat records with no hierarchy.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type NoteId = Uuid;

/// Title assigned to freshly created notes.
pub const DEFAULT_NOTE_TITLE: &str = "New Note";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

impl Note {
    /// Creates an empty note with the default title.
    pub fn new(now_ms: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: DEFAULT_NOTE_TITLE.to_string(),
            content: String::new(),
            created_at: now_ms,
            updated_at: now_ms,
        }
    }
}
