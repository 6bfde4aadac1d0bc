//! Core traits for scribe abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// NOTE REPOSITORY
// =============================================================================

/// Request for creating a new note.
///
/// The id comes from the caller: the client mints a UUID before the first
/// save so the editor can address the note immediately. Text starts empty.
#[derive(Debug, Clone)]
pub struct CreateNoteRequest {
    pub id: Uuid,
    pub author_id: Uuid,
}

/// Response for listing a user's notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListNotesResponse {
    pub notes: Vec<Note>,
    pub total: i64,
}

/// Repository for note CRUD operations.
///
/// Every mutating operation takes the acting user's id and enforces
/// ownership at the store: updates and deletes match on the
/// `(id, author_id)` compound key, so a non-owner observes the same
/// not-found outcome as a missing id.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a new empty note with a caller-supplied id.
    async fn insert(&self, req: CreateNoteRequest) -> Result<Uuid>;

    /// Fetch a note by id, regardless of owner.
    async fn fetch(&self, id: Uuid) -> Result<Note>;

    /// Overwrite the text of a note owned by `author_id`.
    async fn update_text(&self, id: Uuid, author_id: Uuid, text: &str) -> Result<()>;

    /// Permanently delete a note owned by `author_id`.
    async fn delete(&self, id: Uuid, author_id: Uuid) -> Result<()>;

    /// List all notes owned by `author_id`, newest first.
    async fn list_for_author(&self, author_id: Uuid) -> Result<ListNotesResponse>;

    /// Project only the text of all notes owned by `author_id`, newest first.
    ///
    /// Used to build the model grounding context; timestamps are deliberately
    /// left out so the model cannot echo or fabricate temporal claims.
    async fn texts_for_author(&self, author_id: Uuid) -> Result<Vec<String>>;
}

// =============================================================================
// SESSION STORE
// =============================================================================

/// Store resolving bearer tokens to authenticated users.
///
/// Tokens are hashed at rest; resolution joins the session row to its user
/// and checks expiry. Called once per request, no caching.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Resolve a presented token to its user, or None if the token is
    /// unknown, expired, or revoked.
    async fn resolve(&self, token: &str) -> Result<Option<User>>;

    /// Issue a new session token for a user. The returned token is shown
    /// only once; the store keeps only its hash.
    async fn create_session(&self, user_id: Uuid, ttl: chrono::Duration) -> Result<String>;

    /// Revoke a session by its token.
    async fn revoke(&self, token: &str) -> Result<()>;
}

// =============================================================================
// CHAT BACKEND
// =============================================================================

/// Generative model backend exposing a seeded-history chat contract.
///
/// The backend is stateless: every call carries the full prior history plus
/// one live message. No retry, timeout beyond the HTTP client's own, or
/// rate-limit handling is layered on top.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send `message` against a conversation seeded with `history`, and
    /// return the model's text response. An empty string means the model
    /// produced no text; callers own any fallback.
    async fn chat(&self, history: &[ChatTurn], message: &str) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}
