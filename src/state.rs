use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::repositories::{
    session::{MemorySessionRepository, PgSessionRepository, SessionRepository},
    user::{MemoryUserRepository, PgUserRepository, UserRepository},
};
use crate::services::{credentials::CredentialStore, token::TokenService};

/// Connection string that selects the in-memory store.
pub const MEMORY_DATABASE_URL: &str = "memory://";

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Config,
    /// User records.
    pub users: Arc<dyn UserRepository>,
    /// Wellness session records.
    pub sessions: Arc<dyn SessionRepository>,
    /// Credential Store (hashing + user persistence).
    pub credentials: CredentialStore,
    /// Token Service.
    pub tokens: TokenService,
}

impl AppState {
    /// Creates a new `AppState`, connecting to the store named by `config.database_url`.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub async fn new(config: &Config) -> Result<Self> {
        if config.database_url.starts_with(MEMORY_DATABASE_URL) {
            tracing::warn!("⚠️ Using the in-memory store, data is lost on restart");
            return Ok(Self::in_memory(config));
        }

        let pool = crate::db::create_pool(&config.database_url)?;
        crate::db::ensure_schema(&pool).await?;
        tracing::info!("✅ PostgreSQL Pool initialized with deadpool-postgres");

        Ok(Self::with_repositories(
            config,
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgSessionRepository::new(pool)),
        ))
    }

    /// Creates an `AppState` backed by the in-memory store.
    pub fn in_memory(config: &Config) -> Self {
        Self::with_repositories(
            config,
            Arc::new(MemoryUserRepository::new()),
            Arc::new(MemorySessionRepository::new()),
        )
    }

    fn with_repositories(
        config: &Config,
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
    ) -> Self {
        let tokens = TokenService::new(config);
        tracing::info!("✅ Token service initialized (ttl: {}s)", config.jwt_ttl.num_seconds());

        AppState {
            config: config.clone(),
            credentials: CredentialStore::new(users.clone()),
            users,
            sessions,
            tokens,
        }
    }
}
