//! Note service - Handles note-related use cases.
//!
//! SOLID (SRP): Orchestrates the note repository and form validation only.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{Note, NoteForm};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::Repository;

/// Note service trait for dependency injection.
#[async_trait]
pub trait NoteService: Send + Sync {
    /// List notes, oldest first
    async fn list_notes(&self) -> AppResult<Vec<Note>>;

    /// Get a note by ID
    async fn get_note(&self, id: Uuid) -> AppResult<Note>;

    /// Validate and store a new note
    async fn create_note(&self, form: NoteForm) -> AppResult<Note>;

    /// Validate and apply edits; locked notes are rejected
    async fn update_note(&self, id: Uuid, form: NoteForm) -> AppResult<Note>;

    /// Delete a note; locked notes are rejected
    async fn delete_note(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of NoteService over a repository.
pub struct NoteManager {
    notes: Arc<dyn Repository<Note>>,
}

impl NoteManager {
    pub fn new(notes: Arc<dyn Repository<Note>>) -> Self {
        Self { notes }
    }

    fn validated(form: NoteForm) -> AppResult<NoteForm> {
        let form = NoteForm {
            title: form.title.trim().to_string(),
            body: form.body,
        };
        form.validate()?;
        Ok(form)
    }
}

#[async_trait]
impl NoteService for NoteManager {
    async fn list_notes(&self) -> AppResult<Vec<Note>> {
        let mut notes = self.notes.list().await?;
        notes.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.title.cmp(&b.title)));
        Ok(notes)
    }

    async fn get_note(&self, id: Uuid) -> AppResult<Note> {
        self.notes.find_by_id(&id).await?.ok_or_not_found()
    }

    async fn create_note(&self, form: NoteForm) -> AppResult<Note> {
        let form = Self::validated(form)?;
        let note = self.notes.save(Note::new(form.title, form.body)).await?;
        tracing::info!(note_id = %note.id, "Note created");
        Ok(note)
    }

    async fn update_note(&self, id: Uuid, form: NoteForm) -> AppResult<Note> {
        let mut note = self.get_note(id).await?;
        if note.locked {
            tracing::warn!(note_id = %id, "Rejected edit of locked note");
            return Err(AppError::Forbidden);
        }

        note.apply(Self::validated(form)?);
        let note = self.notes.save(note).await?;
        tracing::info!(note_id = %id, "Note updated");
        Ok(note)
    }

    async fn delete_note(&self, id: Uuid) -> AppResult<()> {
        let note = self.get_note(id).await?;
        if note.locked {
            tracing::warn!(note_id = %id, "Rejected delete of locked note");
            return Err(AppError::Forbidden);
        }

        self.notes.delete(&id).await?;
        tracing::info!(note_id = %id, "Note deleted");
        Ok(())
    }
}
