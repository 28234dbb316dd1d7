use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    error::Result,
    services::auth as auth_service,
    state::AppState,
    validation::auth::*,
};

/// The request payload for registration and login.
///
/// No `Debug`: the password must not end up in logs.
#[derive(Deserialize, Default)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Handles user registration.
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(payload) = payload?;
    let (email, password) = require_credentials(payload.email, payload.password)?;
    tracing::info!("📝 Register attempt: {}", email);

    validate_registration(&email, &password)?;

    let created = auth_service::register(&state, &email, &password).await?;
    tracing::info!("✅ User registered: {}", created.id);

    Ok((StatusCode::CREATED, Json(created)).into_response())
}

/// Handles user login.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(payload) = payload?;
    let (email, password) = require_credentials(payload.email, payload.password)?;
    tracing::info!("🔐 Login attempt: {}", email);

    let authenticated = auth_service::login(&state, &email, &password).await?;
    tracing::info!("✅ User logged in: {}", authenticated.id);

    Ok((StatusCode::OK, Json(authenticated)).into_response())
}
