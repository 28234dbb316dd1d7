use uuid::Uuid;

use crate::error::{AppError, Result};

/// Parses a session id. A malformed id cannot name a session, so it is `NotFound`.
pub fn parse_session_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        tracing::debug!("Malformed session id: {}", raw);
        AppError::NotFound
    })
}

/// Parses an optional session id; blank counts as absent.
pub fn parse_optional_session_id(raw: Option<&str>) -> Result<Option<Uuid>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => parse_session_id(raw).map(Some),
        None => Ok(None),
    }
}

/// Trims a text field; blank counts as "not supplied".
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trims every tag and drops blank ones. A supplied list, even empty, is kept.
pub fn clean_tags(tags: Option<Vec<String>>) -> Option<Vec<String>> {
    tags.map(|tags| {
        tags.into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    })
}
