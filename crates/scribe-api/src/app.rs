//! Router and HTTP handlers.

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use scribe_core::defaults::MAX_BODY_BYTES;

use crate::error::ApiError;
use crate::extract::RequireUser;
use crate::state::AppState;

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically — useful for
/// log correlation and debugging production incidents.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// REQUEST BODIES
// =============================================================================

#[derive(Debug, Deserialize)]
struct CreateNoteBody {
    /// Caller-supplied note id, minted client-side before the first save.
    id: Uuid,
}

#[derive(Debug, Deserialize)]
struct UpdateNoteBody {
    text: String,
}

#[derive(Debug, Deserialize)]
struct AskBody {
    /// Every question asked so far, the new one last.
    questions: Vec<String>,
    /// The model's answers to all but the last question.
    #[serde(default)]
    responses: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct CredentialsBody {
    email: String,
    password: String,
}

// =============================================================================
// HANDLERS
// =============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn create_note(
    State(state): State<AppState>,
    auth: RequireUser,
    Json(body): Json<CreateNoteBody>,
) -> Result<impl IntoResponse, ApiError> {
    let id = state.notes.create(&auth.user, body.id).await?;
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}

async fn update_note(
    State(state): State<AppState>,
    auth: RequireUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateNoteBody>,
) -> Result<impl IntoResponse, ApiError> {
    state.notes.update(&auth.user, id, &body.text).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_note(
    State(state): State<AppState>,
    auth: RequireUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.notes.delete(&auth.user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_notes(
    State(state): State<AppState>,
    auth: RequireUser,
) -> Result<impl IntoResponse, ApiError> {
    let response = state.notes.list(&auth.user).await?;
    Ok(Json(response))
}

async fn ask_notes(
    State(state): State<AppState>,
    auth: RequireUser,
    Json(body): Json<AskBody>,
) -> Result<impl IntoResponse, ApiError> {
    let answer = state
        .ask
        .ask(&auth.user, &body.questions, &body.responses)
        .await?;
    Ok(Json(serde_json::json!({ "answer": answer })))
}

/// Login is not wired to a credential check yet; the form posts here and
/// gets a 501 until the issuing side of the session store lands.
async fn login(Json(_body): Json<CredentialsBody>) -> impl IntoResponse {
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(serde_json::json!({ "error": "Login is not implemented yet" })),
    )
}

async fn signup(Json(_body): Json<CredentialsBody>) -> impl IntoResponse {
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(serde_json::json!({ "error": "Sign-up is not implemented yet" })),
    )
}

// =============================================================================
// ROUTER
// =============================================================================

/// Parse the CORS origin whitelist from `ALLOWED_ORIGINS`.
fn parse_allowed_origins() -> Vec<HeaderValue> {
    let origins_str = std::env::var("ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000".to_string());

    if origins_str.trim().is_empty() {
        return vec![HeaderValue::from_static("http://localhost:3000")];
    }

    origins_str
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

/// Build the application router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Notes CRUD
        .route("/api/notes", get(list_notes).post(create_note))
        .route(
            "/api/notes/:id",
            axum::routing::patch(update_note).delete(delete_note),
        )
        // AI Q&A over the caller's notes
        .route("/api/ask", post(ask_notes))
        // Auth form endpoints (submission is stubbed)
        .route("/api/auth/login", post(login))
        .route("/api/auth/signup", post(signup))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer({
            let allowed_origins = parse_allowed_origins();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(allowed_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
                .allow_credentials(true)
                .max_age(std::time::Duration::from_secs(3600))
        })
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}
