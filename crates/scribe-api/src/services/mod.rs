//! Service layer for scribe-api.
//!
//! Services hold the behavioral logic; HTTP handlers stay thin.

pub mod ask_service;
pub mod note_service;

pub use ask_service::{AskService, FALLBACK_REPLY, NO_NOTES_REPLY};
pub use note_service::NoteService;
