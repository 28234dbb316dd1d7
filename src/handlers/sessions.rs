use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    error::{AppError, Result},
    middleware_layer::auth::AuthUser,
    services::sessions::{self as session_service, DraftInput, DraftSaved},
    state::AppState,
    validation::session::{clean_tags, non_blank, parse_optional_session_id, parse_session_id},
};

/// The request payload for saving a draft.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SaveDraftRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub json_file_url: Option<String>,
}

/// The request payload for publishing a session.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Lists all published sessions. Public.
#[axum::debug_handler]
pub async fn list_published(State(state): State<AppState>) -> Result<Response> {
    let sessions = session_service::list_published(&state).await?;
    tracing::debug!("📋 Listing {} published sessions", sessions.len());
    Ok((StatusCode::OK, Json(sessions)).into_response())
}

/// Lists the caller's own sessions.
#[axum::debug_handler]
pub async fn list_own(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Response> {
    let sessions = session_service::list_own(&state, auth.user_id).await?;
    Ok((StatusCode::OK, Json(sessions)).into_response())
}

/// Gets one of the caller's sessions.
#[axum::debug_handler]
pub async fn get_own(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(session_id): Path<String>,
) -> Result<Response> {
    let session_id = parse_session_id(&session_id)?;
    let session = session_service::get_own(&state, auth.user_id, session_id).await?;
    Ok((StatusCode::OK, Json(session)).into_response())
}

/// Creates or updates a draft.
#[axum::debug_handler]
pub async fn save_draft(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    payload: std::result::Result<Json<SaveDraftRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(payload) = payload?;

    let input = DraftInput {
        session_id: parse_optional_session_id(payload.session_id.as_deref())?,
        title: non_blank(payload.title),
        tags: clean_tags(payload.tags),
        json_file_url: non_blank(payload.json_file_url),
    };

    let response = match session_service::save_draft(&state, auth.user_id, input).await? {
        DraftSaved::Created(session) => (StatusCode::CREATED, Json(session)),
        DraftSaved::Updated(session) => (StatusCode::OK, Json(session)),
    };

    Ok(response.into_response())
}

/// Publishes one of the caller's sessions.
#[axum::debug_handler]
pub async fn publish(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    payload: std::result::Result<Json<PublishRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(payload) = payload?;

    let session_id = parse_optional_session_id(payload.session_id.as_deref())?
        .ok_or_else(|| AppError::Validation("Session ID is required".to_string()))?;

    let session = session_service::publish(&state, auth.user_id, session_id).await?;
    Ok((StatusCode::OK, Json(session)).into_response())
}
