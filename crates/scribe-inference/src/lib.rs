//! # scribe-inference
//!
//! Generative model backend abstraction for scribe.
//!
//! This crate provides:
//! - The hosted Gemini chat backend (default)
//! - A mock backend for deterministic tests (feature `mock`)
//!
//! # Example
//!
//! ```rust,no_run
//! use scribe_inference::GeminiBackend;
//! use scribe_core::ChatBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = GeminiBackend::from_env().unwrap();
//!     let answer = backend.chat(&[], "What's in my notes?").await.unwrap();
//!     println!("{answer}");
//! }
//! ```

pub mod gemini;

// Mock chat backend for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use scribe_core::*;

pub use gemini::{GeminiBackend, GeminiConfig};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockChatBackend;
