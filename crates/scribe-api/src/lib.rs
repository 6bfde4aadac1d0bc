//! # scribe-api
//!
//! HTTP API server for scribe: note CRUD and AI Q&A over the caller's notes.

pub mod app;
pub mod error;
pub mod extract;
pub mod services;
pub mod state;

pub use app::router;
pub use error::ApiError;
pub use state::AppState;
