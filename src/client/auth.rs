use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::{api::ApiClient, error::Result, routes::Route, storage::TokenStore};

/// The signed-in user as known to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

struct AuthInner {
    api: ApiClient,
    store: TokenStore,
    user: RwLock<Option<CurrentUser>>,
}

/// Holds the token and current user, shared by every page.
#[derive(Clone)]
pub struct AuthContext {
    inner: Arc<AuthInner>,
}

impl AuthContext {
    pub fn new(api: ApiClient, store: TokenStore) -> Self {
        Self {
            inner: Arc::new(AuthInner {
                api,
                store,
                user: RwLock::new(None),
            }),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Picks up a token persisted by an earlier run. Returns whether one was found.
    ///
    /// The token is trusted until the server rejects it.
    pub async fn restore(&self) -> Result<bool> {
        let token = self.inner.store.load().await?;
        let found = token.is_some();
        self.inner.api.set_token(token).await;
        Ok(found)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentUser> {
        let payload = self.inner.api.login(email, password).await.inspect_err(|e| {
            tracing::warn!("Login failed: {}", e);
        })?;
        self.sign_in(payload.id, payload.email, payload.token).await
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<CurrentUser> {
        let payload = self.inner.api.register(email, password).await.inspect_err(|e| {
            tracing::warn!("Registration failed: {}", e);
        })?;
        self.sign_in(payload.id, payload.email, payload.token).await
    }

    async fn sign_in(&self, id: Uuid, email: String, token: String) -> Result<CurrentUser> {
        self.inner.store.save(&token).await?;
        self.inner.api.set_token(Some(token)).await;

        let user = CurrentUser { id, email };
        *self.inner.user.write().await = Some(user.clone());
        Ok(user)
    }

    /// Forgets the token, on disk and in memory, and the current user.
    pub async fn logout(&self) -> Result<()> {
        self.inner.api.set_token(None).await;
        *self.inner.user.write().await = None;
        self.inner.store.clear().await
    }

    /// Logs out after `delay`, leaving time to show the expiry message.
    pub fn schedule_logout(&self, delay: Duration) -> JoinHandle<()> {
        let auth = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = auth.logout().await {
                tracing::error!("Logout after expiry failed: {}", e);
            }
        })
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.api.token().await.is_some()
    }

    pub async fn current_user(&self) -> Option<CurrentUser> {
        self.inner.user.read().await.clone()
    }

    /// Where navigating to `route` actually lands: protected routes need a token.
    pub async fn guard(&self, route: Route) -> Route {
        route.resolve(self.is_authenticated().await)
    }
}
