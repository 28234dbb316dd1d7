use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use uuid::Uuid;

/// Represents a registered user.
///
/// Deliberately not `Serialize`: the password hash must never reach a client.
#[derive(Clone, Debug)]
pub struct User {
    /// The unique identifier for the user.
    pub id: Uuid,
    /// The user's email address, stored lower-cased.
    pub email: String,
    /// The argon2 PHC string of the user's password.
    pub password_hash: String,
    /// The timestamp when the user was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl From<&Row> for User {
    fn from(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

/// The body returned by register and login.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthPayload {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}
