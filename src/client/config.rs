use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Settings of the client application.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the API, without trailing slash (e.g. `http://127.0.0.1:5000`).
    pub api_base_url: String,
    /// File that persists the bearer token between runs.
    pub token_path: PathBuf,
    /// Quiet period after the last edit before the editor autosaves.
    pub autosave_delay: Duration,
    /// Delay between a 401 and the automatic logout.
    pub expiry_logout_delay: Duration,
    /// How long a "saved" status stays before returning to idle.
    pub saved_reset_delay: Duration,
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>, token_path: impl Into<PathBuf>) -> Self {
        Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            token_path: token_path.into(),
            autosave_delay: Duration::from_secs(2),
            expiry_logout_delay: Duration::from_secs(2),
            saved_reset_delay: Duration::from_secs(2),
        }
    }

    /// Reads `WELLNESS_API_URL` and `WELLNESS_TOKEN_FILE`.
    pub fn from_env() -> Self {
        Self::new(
            env::var("WELLNESS_API_URL").unwrap_or_else(|_| "http://127.0.0.1:5000".to_string()),
            env::var("WELLNESS_TOKEN_FILE").unwrap_or_else(|_| ".wellness-token".to_string()),
        )
    }
}
