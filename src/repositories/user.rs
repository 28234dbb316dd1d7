use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use deadpool_postgres::Pool;
use tokio::sync::RwLock;
use tokio_postgres::error::SqlState;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::user::User,
};

/// Persistence of user records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by their (already normalized) email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Returns `(id, email)` for every known user among `ids`.
    async fn emails_by_ids(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>>;

    /// Inserts a user. Fails with `DuplicateEmail` if the email is taken.
    async fn insert(&self, email: &str, password_hash: String) -> Result<User>;
}

/// PostgreSQL-backed user repository.
pub struct PgUserRepository {
    pool: Pool,
}

impl PgUserRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                SELECT id, email, password_hash, created_at, updated_at
                FROM users
                WHERE email = $1
                "#,
                &[&email],
            )
            .await?;
        Ok(row.as_ref().map(User::from))
    }

    async fn emails_by_ids(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let client = self.pool.get().await?;
        let rows = client
            .query(
                "SELECT id, email FROM users WHERE id = ANY($1)",
                &[&ids],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| (row.get("id"), row.get("email")))
            .collect())
    }

    async fn insert(&self, email: &str, password_hash: String) -> Result<User> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                r#"
                INSERT INTO users (id, email, password_hash)
                VALUES ($1, $2, $3)
                RETURNING id, email, password_hash, created_at, updated_at
                "#,
                &[&Uuid::new_v4(), &email, &password_hash],
            )
            .await
            .map_err(|e| {
                if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
                    AppError::DuplicateEmail
                } else {
                    AppError::Database(e)
                }
            })?;
        Ok(User::from(&row))
    }
}

/// In-memory user repository.
#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn emails_by_ids(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, String>> {
        let users = self.users.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| users.get(id).map(|u| (*id, u.email.clone())))
            .collect())
    }

    async fn insert(&self, email: &str, password_hash: String) -> Result<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == email) {
            return Err(AppError::DuplicateEmail);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }
}
