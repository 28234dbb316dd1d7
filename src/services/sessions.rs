use std::collections::HashSet;

use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::session::{
        NewSession, PublishedSession, Session, SessionChanges, SessionFilter, SessionStatus,
    },
    state::AppState,
};

/// Validated input of a draft save. `None` means "not supplied".
#[derive(Debug, Clone, Default)]
pub struct DraftInput {
    pub session_id: Option<Uuid>,
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
    pub json_file_url: Option<String>,
}

/// Outcome of a draft save.
#[derive(Debug, Clone)]
pub enum DraftSaved {
    Created(Session),
    Updated(Session),
}

/// Lists every published session, each joined with its owner's email.
pub async fn list_published(state: &AppState) -> Result<Vec<PublishedSession>> {
    let sessions = state.sessions.find(SessionFilter::published()).await?;

    let owner_ids: Vec<Uuid> = sessions
        .iter()
        .map(|s| s.user_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let emails = state.users.emails_by_ids(&owner_ids).await?;

    Ok(sessions
        .into_iter()
        .map(|session| {
            let email = emails.get(&session.user_id).cloned();
            if email.is_none() {
                tracing::warn!("⚠️ Session {} has no owner record", session.id);
            }
            PublishedSession::new(session, email)
        })
        .collect())
}

/// Lists the caller's sessions, drafts and published alike.
pub async fn list_own(state: &AppState, user_id: Uuid) -> Result<Vec<Session>> {
    state.sessions.find(SessionFilter::owned_by(user_id)).await
}

/// Fetches a session the caller owns.
///
/// # Returns
///
/// `NotFound` if the session does not exist, `NotAuthorized` if someone else owns it.
pub async fn get_own(state: &AppState, user_id: Uuid, session_id: Uuid) -> Result<Session> {
    let session = state
        .sessions
        .find_by_id(&session_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if session.user_id != user_id {
        tracing::warn!(
            "❌ User {} tried to access session {} owned by {}",
            user_id,
            session.id,
            session.user_id
        );
        return Err(AppError::NotAuthorized);
    }

    Ok(session)
}

/// Creates a draft, or updates one the caller owns.
///
/// On update each supplied field replaces the stored value, omitted fields are
/// kept, and the status always returns to `draft`.
pub async fn save_draft(state: &AppState, user_id: Uuid, input: DraftInput) -> Result<DraftSaved> {
    match input.session_id {
        Some(session_id) => {
            get_own(state, user_id, session_id).await?;

            let session = state
                .sessions
                .update(
                    &session_id,
                    SessionChanges {
                        title: input.title,
                        tags: input.tags,
                        json_file_url: input.json_file_url,
                        status: Some(SessionStatus::Draft),
                    },
                )
                .await?;

            tracing::info!("✅ Draft updated: {}", session.id);
            Ok(DraftSaved::Updated(session))
        }
        None => {
            let title = input
                .title
                .ok_or_else(|| AppError::Validation("Please provide a title".to_string()))?;
            let json_file_url = input.json_file_url.ok_or_else(|| {
                AppError::Validation("Please provide a JSON file URL".to_string())
            })?;

            let session = state
                .sessions
                .insert(NewSession {
                    user_id,
                    title,
                    tags: input.tags.unwrap_or_default(),
                    json_file_url,
                })
                .await?;

            tracing::info!("✅ Draft created: {} by user {}", session.id, user_id);
            Ok(DraftSaved::Created(session))
        }
    }
}

/// Publishes a session the caller owns. Publishing twice is a no-op success.
pub async fn publish(state: &AppState, user_id: Uuid, session_id: Uuid) -> Result<Session> {
    get_own(state, user_id, session_id).await?;

    let session = state
        .sessions
        .update(
            &session_id,
            SessionChanges {
                status: Some(SessionStatus::Published),
                ..Default::default()
            },
        )
        .await?;

    tracing::info!("✅ Session published: {}", session.id);
    Ok(session)
}
