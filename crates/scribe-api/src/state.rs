//! Shared application state.

use std::sync::Arc;

use scribe_core::ChatBackend;
use scribe_db::Database;

use crate::services::{AskService, NoteService};

/// State shared by every handler.
///
/// The chat backend is constructed once at startup and injected here, so
/// tests can substitute a mock without touching the services.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub notes: NoteService,
    pub ask: AskService,
}

impl AppState {
    pub fn new(db: Database, chat: Arc<dyn ChatBackend>) -> Self {
        let notes = NoteService::new(db.notes.clone());
        let ask = AskService::new(db.notes.clone(), chat);
        Self { db, notes, ask }
    }
}
