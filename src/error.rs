use axum::{
    extract::rejection::JsonRejection,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// The fixed message returned for every internal failure.
const SERVER_ERROR: &str = "Server Error";

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A database error.
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// A connection pool error.
    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// Missing or invalid input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Registration with an email that is already taken.
    #[error("User with that email already exists")]
    DuplicateEmail,

    /// Unknown email or wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No usable bearer token on a protected request.
    #[error("Not authorized, {0}")]
    Unauthenticated(&'static str),

    /// The caller does not own the session.
    #[error("Not authorized")]
    NotAuthorized,

    /// A resource not found error.
    #[error("Session not found")]
    NotFound,

    /// Password hashing failed.
    #[error("Password hash error: {0}")]
    PasswordHash(String),

    /// Token signing failed.
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl AppError {
    /// The HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::DuplicateEmail => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials
            | AppError::Unauthenticated(_)
            | AppError::NotAuthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Database(_)
            | AppError::Pool(_)
            | AppError::PasswordHash(_)
            | AppError::Token(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                SERVER_ERROR.to_string()
            }

            AppError::Pool(ref e) => {
                tracing::error!("Pool error: {}", e);
                SERVER_ERROR.to_string()
            }

            AppError::PasswordHash(ref msg) => {
                tracing::error!("Password hash error: {}", msg);
                SERVER_ERROR.to_string()
            }

            AppError::Token(ref e) => {
                tracing::error!("Token signing error: {}", e);
                SERVER_ERROR.to_string()
            }

            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                SERVER_ERROR.to_string()
            }

            AppError::Validation(ref msg) => {
                tracing::debug!("Validation error: {}", msg);
                msg.clone()
            }

            AppError::DuplicateEmail | AppError::InvalidCredentials => {
                tracing::warn!("Authentication failed: {}", self);
                self.to_string()
            }

            AppError::Unauthenticated(_) | AppError::NotAuthorized => {
                tracing::warn!("Authorization failed: {}", self);
                self.to_string()
            }

            AppError::NotFound => {
                tracing::debug!("Resource not found");
                self.to_string()
            }
        };

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "error": message
        }))
        .unwrap_or_else(|_| r#"{"error":"Server Error"}"#.to_string());

        (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
    }
}
