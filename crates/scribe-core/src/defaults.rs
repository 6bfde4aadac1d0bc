//! Centralized default constants for the scribe system.
//!
//! **This module is the single source of truth** for shared default values.
//! All crates should reference these constants instead of defining their own
//! magic numbers.

// =============================================================================
// GENERATIVE MODEL
// =============================================================================

/// Default base URL for the hosted generative-language API.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default generation model.
pub const GEN_MODEL: &str = "gemini-1.5-flash";

/// Timeout for generation requests (seconds).
pub const GEN_TIMEOUT_SECS: u64 = 120;

/// Generation latency above which a slow-operation warning is logged (ms).
pub const SLOW_GEN_THRESHOLD_MS: u64 = 30_000;

// =============================================================================
// SESSIONS
// =============================================================================

/// Prefix for session tokens, so tokens are recognizable in logs and
/// support tooling without exposing the secret part.
pub const SESSION_TOKEN_PREFIX: &str = "scrb_sess_";

/// Length of the random secret part of a session token.
pub const SESSION_TOKEN_SECRET_LEN: usize = 40;

// =============================================================================
// HTTP SERVER
// =============================================================================

/// Default bind host.
pub const HOST: &str = "0.0.0.0";

/// Default bind port.
pub const PORT: u16 = 3000;

/// Maximum request body size (bytes). Notes are small free text.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;
