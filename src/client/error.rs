use thiserror::Error;

/// Errors surfaced to client views.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered 401.
    #[error("{0}")]
    Unauthenticated(String),

    /// Any other non-success answer.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The token file could not be read or written.
    #[error("Token storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Rejected locally before any request was made.
    #[error("{0}")]
    Invalid(String),
}

impl ClientError {
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, ClientError::Unauthenticated(_))
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
