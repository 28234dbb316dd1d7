use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::{
    crypto::password,
    error::{AppError, Result},
    models::user::User,
    repositories::user::UserRepository,
};

/// Persists user credentials. Plaintext passwords never leave this type.
#[derive(Clone)]
pub struct CredentialStore {
    users: Arc<dyn UserRepository>,
    /// Verified against when the email is unknown, so both failures cost the same.
    dummy_hash: Arc<OnceCell<String>>,
}

impl CredentialStore {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self {
            users,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Finds a user, including its password hash, by normalized email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.users.find_by_email(email).await
    }

    /// Hashes `raw_password` and stores a new user.
    ///
    /// Fails with `DuplicateEmail` if the email is already registered.
    pub async fn create(&self, email: &str, raw_password: &str) -> Result<User> {
        let password = raw_password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))??;

        let user = self.users.insert(email, password_hash).await?;
        tracing::info!("✅ User created with ID: {}", user.id);
        Ok(user)
    }

    /// Returns the user if `email` is registered and `raw_password` matches.
    ///
    /// An unknown email still runs a full verification.
    pub async fn authenticate(&self, email: &str, raw_password: &str) -> Result<Option<User>> {
        match self.users.find_by_email(email).await? {
            Some(user) => {
                let matches = verify_blocking(raw_password, &user.password_hash).await?;
                Ok(matches.then_some(user))
            }
            None => {
                let dummy = self
                    .dummy_hash
                    .get_or_try_init(|| async {
                        tokio::task::spawn_blocking(|| {
                            password::hash_password("wellness-unknown-account")
                        })
                        .await
                        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
                    })
                    .await?;
                verify_blocking(raw_password, dummy).await?;
                Ok(None)
            }
        }
    }
}

async fn verify_blocking(raw_password: &str, hash: &str) -> Result<bool> {
    let password = raw_password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || password::verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Verify task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::user::MemoryUserRepository;

    #[tokio::test]
    async fn authenticate_checks_the_password() {
        let store = CredentialStore::new(Arc::new(MemoryUserRepository::new()));
        let user = store.create("a@x.com", "secret1").await.unwrap();

        let found = store.authenticate("a@x.com", "secret1").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
        assert!(store.authenticate("a@x.com", "secret2").await.unwrap().is_none());
        assert!(!store.dummy_hash.initialized());
    }

    #[tokio::test]
    async fn unknown_email_still_verifies_a_hash() {
        let store = CredentialStore::new(Arc::new(MemoryUserRepository::new()));

        assert!(store.authenticate("ghost@x.com", "secret1").await.unwrap().is_none());
        assert!(store.dummy_hash.initialized());

        let dummy = store.dummy_hash.get().cloned().unwrap();
        assert!(store.authenticate("ghost@x.com", "secret1").await.unwrap().is_none());
        assert_eq!(store.dummy_hash.get(), Some(&dummy));
    }
}
