#![allow(dead_code)]

use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::{Value, json};
use wellness::{config::Config, routes, state::AppState};

/// A server on an ephemeral port backed by the in-memory store.
pub struct TestContext {
    pub client: reqwest::Client,
    pub base_url: String,
}

pub fn test_config(ttl: &str) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("JWT_SECRET", "test-secret-with-enough-bytes".to_string()),
        ("DATABASE_URL", "memory://".to_string()),
        ("APP_ENV", "test".to_string()),
        ("JWT_EXPIRES_IN", ttl.to_string()),
    ]);
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

impl TestContext {
    pub async fn start() -> Self {
        Self::start_with(test_config("30d")).await
    }

    pub async fn start_with(config: Config) -> Self {
        let app = routes::router(AppState::in_memory(&config));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            client: reqwest::Client::new(),
            base_url: format!("http://{}", addr),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> (u16, Value) {
        let mut request = self.client.post(self.url(path)).json(&body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (u16, Value) {
        let mut request = self.client.get(self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }

    /// Registers a fresh account and returns its token.
    pub async fn register(&self, email: &str) -> String {
        let (status, body) = self
            .post(
                "/api/auth/register",
                None,
                json!({ "email": email, "password": "secret1" }),
            )
            .await;
        assert_eq!(status, 201, "Registration failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }
}

pub fn unique_email(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}_{}@example.com", prefix, nanos)
}

pub async fn settle(duration: Duration) {
    tokio::time::sleep(duration).await;
}
