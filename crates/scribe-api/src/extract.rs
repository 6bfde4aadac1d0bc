//! Request extractors for session resolution.
//!
//! The session token arrives as `Authorization: Bearer <token>` and is
//! resolved against the session store on every request, with no caching.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use scribe_core::{SessionStore, User};

use crate::error::ApiError;
use crate::state::AppState;

/// Extractor for the current session, if any.
///
/// Resolves the Bearer token to a user. An absent header, an unknown or
/// expired token, or a store failure all yield `user: None`; handlers that
/// need a caller use [`RequireUser`] instead.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: Option<User>,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let user = match auth_header {
            Some(header) if header.starts_with("Bearer ") => {
                let token = header.trim_start_matches("Bearer ").trim();
                match state.db.sessions.resolve(token).await {
                    Ok(Some(user)) => Some(user),
                    _ => None,
                }
            }
            _ => None,
        };

        Ok(Session { user })
    }
}

/// Extractor that requires an authenticated user.
///
/// Use this for endpoints that must have a valid session.
#[derive(Debug, Clone)]
pub struct RequireUser {
    pub user: User,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;

        match session.user {
            Some(user) => Ok(RequireUser { user }),
            None => Err(ApiError::Unauthorized(
                "Authentication required".to_string(),
            )),
        }
    }
}
