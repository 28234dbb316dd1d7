use std::time::Duration;

use super::{api::ApiClient, auth::AuthContext};
use crate::models::session::{PublishedSession, Session};

/// Lifecycle of a page's data.
#[derive(Debug, Clone, PartialEq)]
pub enum PageState<T> {
    Idle,
    Loading,
    Loaded(T),
    Error(String),
}

impl<T> PageState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, PageState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            PageState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PageState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Public listing of published sessions.
pub struct Dashboard {
    api: ApiClient,
    state: PageState<Vec<PublishedSession>>,
}

impl Dashboard {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: PageState::Idle,
        }
    }

    pub fn state(&self) -> &PageState<Vec<PublishedSession>> {
        &self.state
    }

    pub async fn load(&mut self) -> &PageState<Vec<PublishedSession>> {
        self.state = PageState::Loading;
        self.state = match self.api.list_published().await {
            Ok(sessions) => PageState::Loaded(sessions),
            Err(e) => {
                tracing::error!("Failed to fetch sessions: {}", e);
                PageState::Error("Failed to fetch sessions. The server might be busy.".to_string())
            }
        };
        &self.state
    }
}

/// The signed-in user's sessions, drafts included.
pub struct MySessionsPage {
    auth: AuthContext,
    expiry_logout_delay: Duration,
    state: PageState<Vec<Session>>,
}

impl MySessionsPage {
    pub fn new(auth: AuthContext, expiry_logout_delay: Duration) -> Self {
        Self {
            auth,
            expiry_logout_delay,
            state: PageState::Idle,
        }
    }

    pub fn state(&self) -> &PageState<Vec<Session>> {
        &self.state
    }

    /// Fetches the list. A 401 shows the expiry message and logs out after a delay.
    pub async fn load(&mut self) -> &PageState<Vec<Session>> {
        self.state = PageState::Loading;
        self.state = match self.auth.api().my_sessions().await {
            Ok(sessions) => PageState::Loaded(sessions),
            Err(e) if e.is_unauthenticated() => {
                self.auth.schedule_logout(self.expiry_logout_delay);
                PageState::Error("Your session has expired. Please log in again.".to_string())
            }
            Err(e) => {
                tracing::error!("Failed to fetch own sessions: {}", e);
                PageState::Error("Failed to fetch your sessions. Please try again later.".to_string())
            }
        };
        &self.state
    }
}
