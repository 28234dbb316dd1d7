use chrono::{DateTime, Utc};
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use uuid::Uuid;

/// Publication state of a wellness session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSql, FromSql)]
#[serde(rename_all = "lowercase")]
#[postgres(name = "session_status")]
pub enum SessionStatus {
    #[default]
    #[postgres(name = "draft")]
    Draft,
    #[postgres(name = "published")]
    Published,
}

/// Represents a wellness session authored by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// The unique identifier for the session.
    pub id: Uuid,
    /// The owner. Immutable after creation.
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Link to the session's JSON payload.
    pub json_file_url: String,
    #[serde(default)]
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Row> for Session {
    fn from(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            user_id: row.get("user_id"),
            title: row.get("title"),
            tags: row.get("tags"),
            json_file_url: row.get("json_file_url"),
            status: row.get("status"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

/// The owner fields exposed by the public listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOwner {
    pub email: String,
}

/// A published session joined with its owner's email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedSession {
    pub id: Uuid,
    /// `None` only if the owning user record has disappeared.
    pub user: Option<SessionOwner>,
    pub title: String,
    pub tags: Vec<String>,
    pub json_file_url: String,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PublishedSession {
    /// Joins a session with its owner's email.
    pub fn new(session: Session, owner_email: Option<String>) -> Self {
        Self {
            id: session.id,
            user: owner_email.map(|email| SessionOwner { email }),
            title: session.title,
            tags: session.tags,
            json_file_url: session.json_file_url,
            status: session.status,
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

/// Fields of a session about to be inserted.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: Uuid,
    pub title: String,
    pub tags: Vec<String>,
    pub json_file_url: String,
}

/// A partial update. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct SessionChanges {
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
    pub json_file_url: Option<String>,
    pub status: Option<SessionStatus>,
}

impl SessionChanges {
    /// Applies the changes to a stored session.
    pub fn apply(self, session: &mut Session, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            session.title = title;
        }
        if let Some(tags) = self.tags {
            session.tags = tags;
        }
        if let Some(url) = self.json_file_url {
            session.json_file_url = url;
        }
        if let Some(status) = self.status {
            session.status = status;
        }
        session.updated_at = now;
    }
}

/// Selects sessions by owner and/or status.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionFilter {
    pub user_id: Option<Uuid>,
    pub status: Option<SessionStatus>,
}

impl SessionFilter {
    pub fn published() -> Self {
        Self {
            user_id: None,
            status: Some(SessionStatus::Published),
        }
    }

    pub fn owned_by(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            status: None,
        }
    }

    /// Returns `true` if the session satisfies every set criterion.
    pub fn matches(&self, session: &Session) -> bool {
        self.user_id.is_none_or(|id| id == session.user_id)
            && self.status.is_none_or(|status| status == session.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Session {
        let now = Utc::now();
        Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Yoga".to_string(),
            tags: vec!["am".to_string()],
            json_file_url: "http://x/1.json".to_string(),
            status: SessionStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn serializes_with_wire_names() {
        let session = sample();
        let value = sonic_rs::to_string(&session).unwrap();
        assert!(value.contains("\"jsonFileUrl\":\"http://x/1.json\""));
        assert!(value.contains("\"status\":\"draft\""));
        assert!(value.contains(&format!("\"user\":\"{}\"", session.user_id)));
        assert!(value.contains("\"createdAt\""));
    }

    #[test]
    fn changes_keep_unset_fields() {
        let mut session = sample();
        let later = session.updated_at + chrono::Duration::seconds(5);
        SessionChanges {
            title: Some("Evening Yoga".to_string()),
            ..Default::default()
        }
        .apply(&mut session, later);

        assert_eq!(session.title, "Evening Yoga");
        assert_eq!(session.tags, vec!["am".to_string()]);
        assert_eq!(session.json_file_url, "http://x/1.json");
        assert_eq!(session.updated_at, later);
    }

    #[test]
    fn filter_matches_owner_and_status() {
        let session = sample();
        assert!(SessionFilter::owned_by(session.user_id).matches(&session));
        assert!(!SessionFilter::owned_by(Uuid::new_v4()).matches(&session));
        assert!(!SessionFilter::published().matches(&session));
        assert!(SessionFilter::default().matches(&session));
    }
}
