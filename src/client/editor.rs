use std::sync::{
    Arc, Weak,
    atomic::{AtomicU64, Ordering},
};
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::{
    api::DraftRequest,
    auth::AuthContext,
    config::ClientConfig,
    error::{ClientError, Result},
    routes::Route,
};
use crate::models::session::Session;

const SESSION_EXPIRED: &str = "Session expired. Logging out...";
const SAVE_BEFORE_PUBLISH: &str = "Please save a draft before publishing.";

/// What the editor's status indicator shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Idle,
    Saving(String),
    Saved(String),
    Error(String),
}

/// The editable fields of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftFields {
    pub title: String,
    pub tags: Vec<String>,
    pub json_file_url: String,
}

impl DraftFields {
    /// Worth autosaving: a title, and for a never-saved session also a URL.
    fn ready_for_autosave(&self, saved: bool) -> bool {
        !self.title.trim().is_empty() && (saved || !self.json_file_url.trim().is_empty())
    }
}

/// Splits comma-separated tag input, trimming and dropping blanks.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug)]
struct EditorState {
    fields: DraftFields,
    session_id: Option<Uuid>,
    status: SaveStatus,
    /// Fields changed since the last save picked them up.
    dirty: bool,
    last_saved: Option<Session>,
    /// Outcome of a response that arrived while a newer request was queued.
    stale_status: Option<SaveStatus>,
}

struct Timing {
    expiry_logout: Duration,
    saved_reset: Duration,
}

struct EditorShared {
    auth: AuthContext,
    timing: Timing,
    state: Mutex<EditorState>,
    /// Serializes saves and publishes: one request in flight at a time.
    in_flight: Mutex<()>,
    /// Sequence number of the newest save/publish requested.
    latest_seq: AtomicU64,
    changes: watch::Sender<u64>,
}

/// Session editor with debounced autosave.
///
/// Autosave and the manual actions feed the same in-flight slot. A save that
/// is superseded before it starts is dropped, and a response is only reflected
/// in the status when no newer request was issued meanwhile.
pub struct SessionEditor {
    shared: Arc<EditorShared>,
    autosave: JoinHandle<()>,
}

impl SessionEditor {
    /// Opens the editor on a new, unsaved session.
    pub fn new(auth: AuthContext, config: &ClientConfig) -> Self {
        Self::start(auth, config, DraftFields::default(), None)
    }

    /// Opens the editor on an existing session owned by the signed-in user.
    pub async fn open(auth: AuthContext, config: &ClientConfig, id: Uuid) -> Result<Self> {
        match auth.api().get_session(id).await {
            Ok(session) => {
                let fields = DraftFields {
                    title: session.title.clone(),
                    tags: session.tags.clone(),
                    json_file_url: session.json_file_url.clone(),
                };
                Ok(Self::start(auth, config, fields, Some(session)))
            }
            Err(e) => {
                if e.is_unauthenticated() {
                    auth.schedule_logout(config.expiry_logout_delay);
                }
                tracing::error!("Failed to fetch session {}: {}", id, e);
                Err(e)
            }
        }
    }

    fn start(
        auth: AuthContext,
        config: &ClientConfig,
        fields: DraftFields,
        session: Option<Session>,
    ) -> Self {
        let (changes, receiver) = watch::channel(0u64);
        let shared = Arc::new(EditorShared {
            auth,
            timing: Timing {
                expiry_logout: config.expiry_logout_delay,
                saved_reset: config.saved_reset_delay,
            },
            state: Mutex::new(EditorState {
                fields,
                session_id: session.as_ref().map(|s| s.id),
                status: SaveStatus::Idle,
                dirty: false,
                last_saved: session,
                stale_status: None,
            }),
            in_flight: Mutex::new(()),
            latest_seq: AtomicU64::new(0),
            changes,
        });

        let autosave = tokio::spawn(autosave_loop(
            Arc::downgrade(&shared),
            receiver,
            config.autosave_delay,
        ));

        Self { shared, autosave }
    }

    pub async fn set_title(&self, title: impl Into<String>) {
        let title = title.into();
        self.edit(|fields| fields.title = title).await;
    }

    /// Takes the raw comma-separated tag input.
    pub async fn set_tags_input(&self, input: &str) {
        let tags = parse_tags(input);
        self.edit(|fields| fields.tags = tags).await;
    }

    pub async fn set_json_file_url(&self, url: impl Into<String>) {
        let url = url.into();
        self.edit(|fields| fields.json_file_url = url).await;
    }

    async fn edit(&self, change: impl FnOnce(&mut DraftFields)) {
        {
            let mut state = self.shared.state.lock().await;
            change(&mut state.fields);
            state.dirty = true;
        }
        self.shared.changes.send_modify(|version| *version += 1);
    }

    pub async fn fields(&self) -> DraftFields {
        self.shared.state.lock().await.fields.clone()
    }

    pub async fn session_id(&self) -> Option<Uuid> {
        self.shared.state.lock().await.session_id
    }

    pub async fn status(&self) -> SaveStatus {
        self.shared.state.lock().await.status.clone()
    }

    /// The session as last returned by the server.
    pub async fn last_saved(&self) -> Option<Session> {
        self.shared.state.lock().await.last_saved.clone()
    }

    /// The route this editor lives at; changes once a new session is first saved.
    pub async fn route(&self) -> Route {
        match self.session_id().await {
            Some(id) => Route::EditSession(id),
            None => Route::NewSession,
        }
    }

    /// Saves immediately, bypassing the debounce.
    ///
    /// Returns `Ok(None)` if there was nothing to save (no title) or a newer
    /// request superseded this one.
    pub async fn save_draft(&self) -> Result<Option<Session>> {
        self.shared.save(true).await
    }

    /// Publishes the session, first flushing any unsaved edits.
    pub async fn publish(&self) -> Result<Session> {
        self.shared.publish().await
    }
}

impl Drop for SessionEditor {
    fn drop(&mut self) {
        self.autosave.abort();
    }
}

impl EditorShared {
    fn next_seq(&self) -> u64 {
        self.latest_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, seq: u64) -> bool {
        self.latest_seq.load(Ordering::SeqCst) == seq
    }

    async fn set_status(&self, status: SaveStatus) {
        let mut state = self.state.lock().await;
        state.stale_status = None;
        state.status = status;
    }

    /// Shows the outcome of `seq`, or keeps it aside if a newer request is queued.
    fn settle(&self, state: &mut EditorState, seq: u64, status: SaveStatus) -> bool {
        if self.is_current(seq) {
            state.stale_status = None;
            state.status = status;
            true
        } else {
            tracing::debug!("Response #{} superseded", seq);
            state.stale_status = Some(status);
            false
        }
    }

    /// A request that sent nothing shows what the previous one ended with.
    async fn finish_unsent(&self, seq: u64) {
        let mut state = self.state.lock().await;
        if self.is_current(seq) {
            if let Some(status) = state.stale_status.take() {
                state.status = status;
            }
        }
    }

    /// Queues a save. `manual` saves ignore the dirty flag.
    async fn save(self: &Arc<Self>, manual: bool) -> Result<Option<Session>> {
        if !manual && !self.state.lock().await.dirty {
            return Ok(None);
        }

        let seq = self.next_seq();
        let _slot = self.in_flight.lock().await;

        if !self.is_current(seq) {
            tracing::debug!("Save #{} superseded before it started", seq);
            return Ok(None);
        }

        let wanted = {
            let state = self.state.lock().await;
            if manual {
                !state.fields.title.trim().is_empty()
            } else {
                state.dirty && state.fields.ready_for_autosave(state.session_id.is_some())
            }
        };
        if !wanted {
            self.finish_unsent(seq).await;
            return Ok(None);
        }

        self.save_locked(seq).await.map(Some)
    }

    /// Sends the current fields. The caller holds the in-flight slot.
    async fn save_locked(self: &Arc<Self>, seq: u64) -> Result<Session> {
        let request = {
            let mut state = self.state.lock().await;
            state.dirty = false;
            state.stale_status = None;
            state.status = SaveStatus::Saving("Saving...".to_string());
            DraftRequest {
                session_id: state.session_id,
                title: state.fields.title.clone(),
                tags: state.fields.tags.clone(),
                json_file_url: state.fields.json_file_url.clone(),
            }
        };

        let result = self.auth.api().save_draft(&request).await;
        let mut state = self.state.lock().await;

        match result {
            Ok(session) => {
                // Later saves must update this session rather than create another.
                state.session_id = Some(session.id);
                state.last_saved = Some(session.clone());
                if self.settle(&mut state, seq, SaveStatus::Saved("Draft saved!".to_string())) {
                    self.schedule_status_reset(seq);
                }
                Ok(session)
            }
            Err(e) => {
                // The edits did not reach the server.
                state.dirty = true;
                let status = self.failure_status(&e, "Error: Could not save draft.");
                self.settle(&mut state, seq, status);
                tracing::error!("Failed to save draft: {}", e);
                Err(e)
            }
        }
    }

    async fn publish(self: &Arc<Self>) -> Result<Session> {
        let seq = self.next_seq();
        let _slot = self.in_flight.lock().await;

        let (session_id, flush) = {
            let state = self.state.lock().await;
            (
                state.session_id,
                state.dirty && state.fields.ready_for_autosave(state.session_id.is_some()),
            )
        };

        let session_id = match (session_id, flush) {
            (Some(id), false) => id,
            (_, true) => self.save_locked(seq).await?.id,
            (None, false) => {
                self.set_status(SaveStatus::Error(SAVE_BEFORE_PUBLISH.to_string()))
                    .await;
                return Err(ClientError::Invalid(SAVE_BEFORE_PUBLISH.to_string()));
            }
        };

        self.set_status(SaveStatus::Saving("Publishing...".to_string()))
            .await;

        let result = self.auth.api().publish(session_id).await;
        let mut state = self.state.lock().await;

        match result {
            Ok(session) => {
                state.last_saved = Some(session.clone());
                self.settle(
                    &mut state,
                    seq,
                    SaveStatus::Saved("Session published successfully!".to_string()),
                );
                Ok(session)
            }
            Err(e) => {
                let status = self.failure_status(&e, "Error: Could not publish.");
                self.settle(&mut state, seq, status);
                tracing::error!("Failed to publish: {}", e);
                Err(e)
            }
        }
    }

    fn failure_status(&self, error: &ClientError, message: &str) -> SaveStatus {
        if error.is_unauthenticated() {
            self.auth.schedule_logout(self.timing.expiry_logout);
            SaveStatus::Error(SESSION_EXPIRED.to_string())
        } else {
            SaveStatus::Error(message.to_string())
        }
    }

    /// Returns a "saved" indicator to idle unless something newer happened.
    fn schedule_status_reset(self: &Arc<Self>, seq: u64) {
        let shared = Arc::downgrade(self);
        let delay = self.timing.saved_reset;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(shared) = shared.upgrade() {
                let mut state = shared.state.lock().await;
                if shared.is_current(seq) && matches!(state.status, SaveStatus::Saved(_)) {
                    state.status = SaveStatus::Idle;
                }
            }
        });
    }
}

/// Waits for edits to settle for `delay`, then saves. Every edit restarts the timer.
async fn autosave_loop(
    shared: Weak<EditorShared>,
    mut changes: watch::Receiver<u64>,
    delay: Duration,
) {
    loop {
        if changes.changed().await.is_err() {
            return;
        }

        loop {
            tokio::select! {
                _ = tokio::time::sleep(delay) => break,
                changed = changes.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
            }
        }

        let Some(shared) = shared.upgrade() else {
            return;
        };
        // Failures are already reflected in the status; the next edit retries.
        let _ = shared.save(false).await;
    }
}
