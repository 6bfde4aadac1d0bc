//! HTTP error mapping.
//!
//! Services speak `scribe_core::Error`; this module is the single place
//! where error kinds become status codes and a `{"error": message}` body.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[derive(Debug)]
pub enum ApiError {
    Database(scribe_core::Error),
    Unauthorized(String),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
}

impl From<scribe_core::Error> for ApiError {
    fn from(err: scribe_core::Error) -> Self {
        match &err {
            scribe_core::Error::NotFound(msg) => ApiError::NotFound(msg.clone()),
            scribe_core::Error::NoteNotFound(id) => {
                ApiError::NotFound(format!("Note {} not found", id))
            }
            scribe_core::Error::Unauthorized(msg) => ApiError::Unauthorized(msg.clone()),
            scribe_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg.clone()),
            scribe_core::Error::Database(sqlx_err) => {
                let msg = sqlx_err.to_string();
                if msg.contains("duplicate key") || msg.contains("unique constraint") {
                    // Provide user-friendly error messages for known constraints
                    let friendly_msg = if msg.contains("note_pkey") {
                        "A note with this id already exists".to_string()
                    } else if msg.contains("app_user_email_key") {
                        "A user with this email already exists".to_string()
                    } else {
                        msg
                    };
                    return ApiError::Conflict(friendly_msg);
                }
                ApiError::Database(err)
            }
            _ => ApiError::Database(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Database(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
