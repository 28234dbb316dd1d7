use async_trait::async_trait;
use chrono::Utc;
use deadpool_postgres::Pool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::session::{NewSession, Session, SessionChanges, SessionFilter, SessionStatus},
};

const SESSION_COLUMNS: &str =
    "id, user_id, title, tags, json_file_url, status, created_at, updated_at";

/// Persistence of wellness session records.
///
/// Single-record writes are atomic; nothing else is guaranteed.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Lists sessions matching `filter`, oldest first.
    async fn find(&self, filter: SessionFilter) -> Result<Vec<Session>>;

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Session>>;

    /// Inserts a new session in `draft` status.
    async fn insert(&self, session: NewSession) -> Result<Session>;

    /// Applies `changes` to an existing session. Fails with `NotFound` if it is gone.
    async fn update(&self, id: &Uuid, changes: SessionChanges) -> Result<Session>;
}

/// PostgreSQL-backed session repository.
pub struct PgSessionRepository {
    pool: Pool,
}

impl PgSessionRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn find(&self, filter: SessionFilter) -> Result<Vec<Session>> {
        let client = self.pool.get().await?;
        let sql = format!(
            r#"
            SELECT {SESSION_COLUMNS}
            FROM sessions
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::session_status IS NULL OR status = $2)
            ORDER BY created_at ASC
            "#
        );
        let rows = client
            .query(sql.as_str(), &[&filter.user_id, &filter.status])
            .await?;
        Ok(rows.iter().map(Session::from).collect())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Session>> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE id = $1");
        let row = client
            .query_opt(sql.as_str(), &[id])
            .await?;
        Ok(row.as_ref().map(Session::from))
    }

    async fn insert(&self, session: NewSession) -> Result<Session> {
        let client = self.pool.get().await?;
        let sql = format!(
            r#"
            INSERT INTO sessions (id, user_id, title, tags, json_file_url, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {SESSION_COLUMNS}
            "#
        );
        let row = client
            .query_one(
                sql.as_str(),
                &[
                    &Uuid::new_v4(),
                    &session.user_id,
                    &session.title,
                    &session.tags,
                    &session.json_file_url,
                    &SessionStatus::Draft,
                ],
            )
            .await?;
        Ok(Session::from(&row))
    }

    async fn update(&self, id: &Uuid, changes: SessionChanges) -> Result<Session> {
        let client = self.pool.get().await?;
        let sql = format!(
            r#"
            UPDATE sessions
            SET title = COALESCE($2, title),
                tags = COALESCE($3, tags),
                json_file_url = COALESCE($4, json_file_url),
                status = COALESCE($5, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SESSION_COLUMNS}
            "#
        );
        let row = client
            .query_opt(
                sql.as_str(),
                &[
                    id,
                    &changes.title,
                    &changes.tags,
                    &changes.json_file_url,
                    &changes.status,
                ],
            )
            .await?
            .ok_or(AppError::NotFound)?;
        Ok(Session::from(&row))
    }
}

/// In-memory session repository. Keeps insertion order.
#[derive(Default)]
pub struct MemorySessionRepository {
    sessions: RwLock<Vec<Session>>,
}

impl MemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn find(&self, filter: SessionFilter) -> Result<Vec<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.iter().filter(|s| filter.matches(s)).cloned().collect())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.iter().find(|s| s.id == *id).cloned())
    }

    async fn insert(&self, session: NewSession) -> Result<Session> {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            user_id: session.user_id,
            title: session.title,
            tags: session.tags,
            json_file_url: session.json_file_url,
            status: SessionStatus::Draft,
            created_at: now,
            updated_at: now,
        };
        self.sessions.write().await.push(session.clone());
        Ok(session)
    }

    async fn update(&self, id: &Uuid, changes: SessionChanges) -> Result<Session> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .iter_mut()
            .find(|s| s.id == *id)
            .ok_or(AppError::NotFound)?;
        changes.apply(session, Utc::now());
        Ok(session.clone())
    }
}
