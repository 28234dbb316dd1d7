use crate::{
    error::{AppError, Result},
    models::user::AuthPayload,
    state::AppState,
};

/// Registers a new user and issues a token for it.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `email` - The normalized, validated email address.
/// * `password` - The plaintext password.
///
/// # Returns
///
/// A `Result` containing the new user's id, email and token.
pub async fn register(state: &AppState, email: &str, password: &str) -> Result<AuthPayload> {
    tracing::debug!("🔐 Registering user: {}", email);

    if state.credentials.find_by_email(email).await?.is_some() {
        return Err(AppError::DuplicateEmail);
    }

    let user = state.credentials.create(email, password).await?;
    let token = state.tokens.issue(user.id)?;

    Ok(AuthPayload {
        id: user.id,
        email: user.email,
        token,
    })
}

/// Authenticates a user and issues a token.
///
/// Unknown email and wrong password fail identically with `InvalidCredentials`,
/// and both run a password verification.
pub async fn login(state: &AppState, email: &str, password: &str) -> Result<AuthPayload> {
    tracing::debug!("🔐 Authenticating user: {}", email);

    let user = state
        .credentials
        .authenticate(email, password)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    tracing::info!("✅ User authenticated: {}", user.id);

    let token = state.tokens.issue(user.id)?;
    Ok(AuthPayload {
        id: user.id,
        email: user.email,
        token,
    })
}
