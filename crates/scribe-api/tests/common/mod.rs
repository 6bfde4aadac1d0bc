//! Shared fixtures for scribe-api tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use scribe_core::{
    CreateNoteRequest, Error, ListNotesResponse, Note, NoteRepository, Result, User,
};

/// A user as the session extractor would hand it to a handler.
pub fn test_user() -> User {
    User {
        id: Uuid::new_v4(),
        email: format!("test-{}@example.com", Uuid::new_v4()),
        created_at: Utc::now(),
    }
}

/// In-memory NoteRepository for service tests.
///
/// Notes are kept in insertion order; "newest first" is the reverse of that
/// order, matching the store's `created_at DESC` contract for sequential
/// inserts.
#[derive(Default)]
pub struct InMemoryNoteRepository {
    notes: Mutex<Vec<Note>>,
}

impl InMemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteRepository for InMemoryNoteRepository {
    async fn insert(&self, req: CreateNoteRequest) -> Result<Uuid> {
        let mut notes = self.notes.lock().unwrap();
        if notes.iter().any(|n| n.id == req.id) {
            return Err(Error::Internal(format!("duplicate note id {}", req.id)));
        }
        let now = Utc::now();
        notes.push(Note {
            id: req.id,
            author_id: req.author_id,
            text: String::new(),
            created_at: now,
            updated_at: now,
        });
        Ok(req.id)
    }

    async fn fetch(&self, id: Uuid) -> Result<Note> {
        self.notes
            .lock()
            .unwrap()
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or(Error::NoteNotFound(id))
    }

    async fn update_text(&self, id: Uuid, author_id: Uuid, text: &str) -> Result<()> {
        let mut notes = self.notes.lock().unwrap();
        match notes
            .iter_mut()
            .find(|n| n.id == id && n.author_id == author_id)
        {
            Some(note) => {
                note.text = text.to_string();
                note.updated_at = Utc::now();
                Ok(())
            }
            None => Err(Error::NoteNotFound(id)),
        }
    }

    async fn delete(&self, id: Uuid, author_id: Uuid) -> Result<()> {
        let mut notes = self.notes.lock().unwrap();
        let before = notes.len();
        notes.retain(|n| !(n.id == id && n.author_id == author_id));
        if notes.len() == before {
            return Err(Error::NoteNotFound(id));
        }
        Ok(())
    }

    async fn list_for_author(&self, author_id: Uuid) -> Result<ListNotesResponse> {
        let notes: Vec<Note> = self
            .notes
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|n| n.author_id == author_id)
            .cloned()
            .collect();
        let total = notes.len() as i64;
        Ok(ListNotesResponse { notes, total })
    }

    async fn texts_for_author(&self, author_id: Uuid) -> Result<Vec<String>> {
        Ok(self
            .notes
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|n| n.author_id == author_id)
            .map(|n| n.text.clone())
            .collect())
    }
}
