//! Note lifecycle service: create, update, delete, list.
//!
//! One authorization policy for every mutation: the acting user's id rides
//! along to the store, which matches on the `(id, author_id)` compound key.
//! A non-owner observes `NoteNotFound`, never an authorization-specific
//! error that would confirm the note exists.

use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use scribe_core::{CreateNoteRequest, ListNotesResponse, NoteRepository, Result, User};

/// Service for note CRUD on behalf of an authenticated user.
#[derive(Clone)]
pub struct NoteService {
    notes: Arc<dyn NoteRepository>,
}

impl NoteService {
    pub fn new(notes: Arc<dyn NoteRepository>) -> Self {
        Self { notes }
    }

    /// Create an empty note with a caller-supplied id, owned by `user`.
    #[instrument(skip(self, user), fields(subsystem = "api", component = "note_service", op = "create_note", user_id = %user.id, note_id = %note_id))]
    pub async fn create(&self, user: &User, note_id: Uuid) -> Result<Uuid> {
        self.notes
            .insert(CreateNoteRequest {
                id: note_id,
                author_id: user.id,
            })
            .await
    }

    /// Overwrite the text of a note owned by `user`.
    #[instrument(skip(self, user, text), fields(subsystem = "api", component = "note_service", op = "update_note", user_id = %user.id, note_id = %note_id))]
    pub async fn update(&self, user: &User, note_id: Uuid, text: &str) -> Result<()> {
        self.notes.update_text(note_id, user.id, text).await
    }

    /// Permanently delete a note owned by `user`.
    #[instrument(skip(self, user), fields(subsystem = "api", component = "note_service", op = "delete_note", user_id = %user.id, note_id = %note_id))]
    pub async fn delete(&self, user: &User, note_id: Uuid) -> Result<()> {
        self.notes.delete(note_id, user.id).await
    }

    /// List the user's notes, newest first.
    #[instrument(skip(self, user), fields(subsystem = "api", component = "note_service", op = "list_notes", user_id = %user.id))]
    pub async fn list(&self, user: &User) -> Result<ListNotesResponse> {
        self.notes.list_for_author(user.id).await
    }
}
