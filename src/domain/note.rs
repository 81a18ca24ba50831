//! Note domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::AggregateRoot;

/// Note domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    /// Locked notes are read-only for visitors
    pub locked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Create a new unlocked note
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            body: body.into(),
            locked: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a read-only note
    pub fn locked(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            locked: true,
            ..Self::new(title, body)
        }
    }

    /// Apply edited fields and bump the update timestamp
    pub fn apply(&mut self, form: NoteForm) {
        self.title = form.title.trim().to_string();
        self.body = form.body;
        self.updated_at = Utc::now();
    }
}

impl AggregateRoot for Note {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }
}

/// Create / edit form payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NoteForm {
    #[validate(length(min = 1, max = 120, message = "Title must be 1-120 characters"))]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl From<&Note> for NoteForm {
    fn from(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            body: note.body.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_note_is_unlocked() {
        let note = Note::new("Groceries", "milk");
        assert!(!note.locked);
        assert_eq!(note.created_at, note.updated_at);
        assert_eq!(note.id(), &note.id);
    }

    #[test]
    fn test_apply_trims_title() {
        let mut note = Note::new("Old", "");
        note.apply(NoteForm {
            title: "  New title ".to_string(),
            body: "text".to_string(),
        });

        assert_eq!(note.title, "New title");
        assert_eq!(note.body, "text");
        assert!(note.updated_at >= note.created_at);
    }

    #[test]
    fn test_form_validation() {
        let empty = NoteForm::default();
        assert!(empty.validate().is_err());

        let long = NoteForm {
            title: "x".repeat(121),
            body: String::new(),
        };
        assert!(long.validate().is_err());

        let ok = NoteForm {
            title: "Fine".to_string(),
            body: String::new(),
        };
        assert!(ok.validate().is_ok());
    }
}
