use std::sync::Arc;

use reqwest::{RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::error::{ClientError, Result};
use crate::models::{
    session::{PublishedSession, Session},
    user::AuthPayload,
};

/// Body of a save-draft call.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    pub title: String,
    pub tags: Vec<String>,
    pub json_file_url: String,
}

#[derive(Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PublishBody {
    session_id: Uuid,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Typed access to the HTTP API. Cheap to clone; clones share the token.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Sets or clears the token attached to outgoing requests.
    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let request = match self.token.read().await.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string(),
        };

        tracing::debug!("API call failed with {}: {}", status, message);

        if status == StatusCode::UNAUTHORIZED {
            Err(ClientError::Unauthenticated(message))
        } else {
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<AuthPayload> {
        let request = self
            .http
            .post(self.url("/api/auth/register"))
            .json(&CredentialsBody { email, password });
        self.send(request).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload> {
        let request = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&CredentialsBody { email, password });
        self.send(request).await
    }

    pub async fn list_published(&self) -> Result<Vec<PublishedSession>> {
        self.send(self.http.get(self.url("/api/sessions"))).await
    }

    pub async fn my_sessions(&self) -> Result<Vec<Session>> {
        self.send(self.http.get(self.url("/api/sessions/my-sessions")))
            .await
    }

    pub async fn get_session(&self, id: Uuid) -> Result<Session> {
        let path = format!("/api/sessions/my-sessions/{}", id);
        self.send(self.http.get(self.url(&path))).await
    }

    pub async fn save_draft(&self, draft: &DraftRequest) -> Result<Session> {
        let request = self
            .http
            .post(self.url("/api/sessions/save-draft"))
            .json(draft);
        self.send(request).await
    }

    pub async fn publish(&self, session_id: Uuid) -> Result<Session> {
        let request = self
            .http
            .post(self.url("/api/sessions/publish"))
            .json(&PublishBody { session_id });
        self.send(request).await
    }
}
