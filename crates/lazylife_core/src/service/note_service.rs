//! Note store use-case service.
//!
//! # Responsibility
//! - Own the in-memory note list and write it through to the slot store.
//! - Route summarization requests to a `Summarizer`.
//!
//! # Invariants
//! - The list is kept sorted by `updated_at DESC` after load and update.
//! - New notes are prepended.
//! - Persistence failures are logged, never surfaced.

use crate::clock::Clock;
use crate::model::note::{Note, NoteId};
use crate::repo::json_slot::{load_json_records, save_json};
use crate::repo::slot_store::{SlotStore, NOTES_KEY};
use crate::service::autosave::Debouncer;
use crate::service::summarize::{SummarizeError, SummarizeRequest, Summarizer};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteServiceError {
    NoteNotFound(NoteId),
    Summarize(SummarizeError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Summarize(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Summarize(err) => Some(err),
            Self::NoteNotFound(_) => None,
        }
    }
}

impl From<SummarizeError> for NoteServiceError {
    fn from(value: SummarizeError) -> Self {
        Self::Summarize(value)
    }
}

/// Note store over a slot store and a clock.
pub struct NoteService<S: SlotStore, C: Clock> {
    store: S,
    clock: C,
    notes: Vec<Note>,
}

impl<S: SlotStore, C: Clock> NoteService<S, C> {
    /// Loads notes, newest first. Unreadable slots load as empty.
    pub fn load(store: S, clock: C) -> Self {
        let mut notes: Vec<Note> = load_json_records(&store, NOTES_KEY).unwrap_or_default();
        sort_newest_first(&mut notes);
        info!(
            "event=notes_load module=note_service status=ok count={}",
            notes.len()
        );
        Self {
            store,
            clock,
            notes,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// Creates an empty "New Note" at the top of the list.
    pub fn add(&mut self) -> Note {
        let note = Note::new(self.clock.now_ms());
        let mut next = Vec::with_capacity(self.notes.len() + 1);
        next.push(note.clone());
        next.extend(self.notes.iter().cloned());
        self.commit(next);
        info!("event=note_add module=note_service status=ok id={}", note.id);
        note
    }

    /// Replaces title and content, then re-sorts newest first.
    pub fn update(
        &mut self,
        id: NoteId,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<(), NoteServiceError> {
        let now = self.clock.now_ms();
        let mut next = self.notes.clone();
        let note = next
            .iter_mut()
            .find(|note| note.id == id)
            .ok_or(NoteServiceError::NoteNotFound(id))?;
        note.title = title.into();
        note.content = content.into();
        note.updated_at = now;
        sort_newest_first(&mut next);
        self.commit(next);
        Ok(())
    }

    /// Editor save path: writes only when title or content differ.
    pub fn apply_edit(
        &mut self,
        id: NoteId,
        title: &str,
        content: &str,
    ) -> Result<bool, NoteServiceError> {
        let note = self.get(id).ok_or(NoteServiceError::NoteNotFound(id))?;
        if note.title == title && note.content == content {
            return Ok(false);
        }
        self.update(id, title, content)?;
        Ok(true)
    }

    /// Feeds successive content drafts into one note through `autosave`.
    ///
    /// Each draft is stamped with the clock time at which it arrives. A pending
    /// draft is saved when the next one arrives after the delay, and the last
    /// draft is saved when the stream ends. Returns the number of writes.
    pub fn stream_content<I>(
        &mut self,
        id: NoteId,
        drafts: I,
        autosave: &mut Debouncer<String>,
    ) -> Result<usize, NoteServiceError>
    where
        I: IntoIterator<Item = String>,
    {
        let title = self
            .get(id)
            .ok_or(NoteServiceError::NoteNotFound(id))?
            .title
            .clone();

        let mut writes = 0;
        for draft in drafts {
            let now = self.clock.now_ms();
            if let Some(ready) = autosave.poll(now) {
                writes += usize::from(self.apply_edit(id, &title, &ready)?);
            }
            autosave.push(now, draft);
        }
        if let Some(last) = autosave.flush() {
            writes += usize::from(self.apply_edit(id, &title, &last)?);
        }
        info!("event=note_stream module=note_service status=ok id={id} writes={writes}");
        Ok(writes)
    }

    pub fn delete(&mut self, id: NoteId) -> Result<(), NoteServiceError> {
        if self.get(id).is_none() {
            return Err(NoteServiceError::NoteNotFound(id));
        }
        let next = self
            .notes
            .iter()
            .filter(|note| note.id != id)
            .cloned()
            .collect();
        self.commit(next);
        info!("event=note_delete module=note_service status=ok id={id}");
        Ok(())
    }

    /// Summarizes one note following a free-text instruction.
    ///
    /// Single attempt; backend failures are returned for display.
    pub fn summarize(
        &self,
        id: NoteId,
        instruction: &str,
        summarizer: &dyn Summarizer,
    ) -> Result<String, NoteServiceError> {
        let note = self.get(id).ok_or(NoteServiceError::NoteNotFound(id))?;
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(SummarizeError::EmptyInstruction.into());
        }

        let request = SummarizeRequest {
            note_content: note.content.clone(),
            user_prompt: instruction.to_string(),
        };
        let response = summarizer.summarize(&request).map_err(|err| {
            error!("event=note_summarize module=note_service status=error id={id} error={err}");
            err
        })?;

        let summary = response.summary.trim();
        if summary.is_empty() {
            return Err(SummarizeError::EmptySummary.into());
        }
        info!(
            "event=note_summarize module=note_service status=ok id={id} summary_chars={}",
            summary.chars().count()
        );
        Ok(summary.to_string())
    }

    fn commit(&mut self, next: Vec<Note>) {
        self.notes = next;
        save_json(&self.store, NOTES_KEY, &self.notes);
    }
}

fn sort_newest_first(notes: &mut [Note]) {
    notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}
