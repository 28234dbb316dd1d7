use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{config::Config, error::Result};

/// Claims carried by an identity token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User ID.
    sub: Uuid,
    /// Issued at (Unix timestamp).
    iat: i64,
    /// Expiration time (Unix timestamp).
    exp: i64,
}

/// Why a token was rejected.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

/// Issues and verifies signed, time-limited identity tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: chrono::Duration,
}

impl TokenService {
    /// Builds the service from the signing secret and TTL in `config`.
    pub fn new(config: &Config) -> Self {
        Self::with_secret(&config.jwt_secret, config.jwt_ttl)
    }

    pub fn with_secret(secret: &[u8], ttl: chrono::Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Issues a token for `user_id`, valid for the configured TTL.
    pub fn issue(&self, user_id: Uuid) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        tracing::debug!("🔑 Token issued for user: {}", user_id);
        Ok(token)
    }

    /// Verifies signature and expiry and returns the user id the token carries.
    pub fn verify(&self, token: &str) -> std::result::Result<Uuid, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-0123456789";

    #[test]
    fn verify_returns_issued_user() {
        let tokens = TokenService::with_secret(SECRET, chrono::Duration::hours(1));
        for _ in 0..8 {
            let user_id = Uuid::new_v4();
            let token = tokens.issue(user_id).unwrap();
            assert_eq!(tokens.verify(&token).unwrap(), user_id);
        }
    }

    #[test]
    fn rejects_foreign_signature() {
        let ours = TokenService::with_secret(SECRET, chrono::Duration::hours(1));
        let theirs = TokenService::with_secret(b"another-secret-987654321", chrono::Duration::hours(1));

        let token = theirs.issue(Uuid::new_v4()).unwrap();
        assert!(ours.verify(&token).is_err());
    }

    #[test]
    fn rejects_malformed_token() {
        let tokens = TokenService::with_secret(SECRET, chrono::Duration::hours(1));
        assert!(tokens.verify("").is_err());
        assert!(tokens.verify("not.a.token").is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let tokens = TokenService::with_secret(SECRET, chrono::Duration::hours(1));
        let past = Utc::now() - chrono::Duration::hours(2);
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: past.timestamp(),
            exp: (past + chrono::Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(tokens.verify(&token).is_err());
    }
}
