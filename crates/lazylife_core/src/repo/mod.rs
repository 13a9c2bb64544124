//! Persistence port and its implementations.
//!
//! # Responsibility
//! - Define the key-value slot contract services persist through.
//! - Provide in-memory and SQLite-backed slot stores.
//! - Offer JSON load/save helpers with best-effort failure semantics.
//!
//! # Invariants
//! - Slot keys are validated before any backend access.
//! - Services never depend on a concrete backend, only on `SlotStore`.

pub mod json_slot;
pub mod memory_store;
pub mod slot_store;
pub mod sqlite_store;
