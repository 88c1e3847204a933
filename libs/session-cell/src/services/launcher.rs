// libs/session-cell/src/services/launcher.rs
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use signaling_cell::{ChannelEvent, SignalingChannel};

use crate::error::SessionError;
use crate::models::{Session, SessionHandle, SessionKind, SessionState};

struct SessionEntry {
    session: Session,
    channel: Option<Arc<SignalingChannel>>,
    watcher: Option<JoinHandle<()>>,
}

type SessionMap = Arc<RwLock<HashMap<SessionHandle, SessionEntry>>>;

/// Translates a user's choice of chat/voice/video on an appointment into
/// session lifecycle transitions.
///
/// Invariant: at most one session per `(appointment_id, kind)` is connecting
/// or active. Starting over a live session supersedes it — the prior one is
/// ended and its channel released before the new one exists, so a rapid
/// double-start never yields two live sessions.
pub struct SessionLauncher {
    sessions: SessionMap,
}

impl SessionLauncher {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Begin a session, superseding any live one of the same kind on the same
    /// appointment. The new session enters `Connecting`.
    pub async fn start(
        &self,
        appointment_id: &str,
        kind: SessionKind,
        counterpart_id: Option<&str>,
    ) -> SessionHandle {
        let mut sessions = self.sessions.write().await;

        let superseded: Vec<SessionHandle> = sessions
            .iter()
            .filter(|(_, entry)| {
                entry.session.appointment_id == appointment_id
                    && entry.session.kind == kind
                    && entry.session.state.is_live()
            })
            .map(|(handle, _)| *handle)
            .collect();

        for handle in superseded {
            if let Some(entry) = sessions.get_mut(&handle) {
                info!(
                    "Superseding {} session {} on appointment {}",
                    kind, handle, appointment_id
                );
                end_entry(entry).await;
            }
        }

        let handle = SessionHandle::new();
        let session = Session {
            id: handle,
            appointment_id: appointment_id.to_string(),
            kind,
            counterpart_id: counterpart_id.map(str::to_string),
            state: SessionState::Connecting,
        };

        info!("Starting {} session {} on appointment {}", kind, handle, appointment_id);
        sessions.insert(
            handle,
            SessionEntry {
                session,
                channel: None,
                watcher: None,
            },
        );

        handle
    }

    /// `Connecting → Active`, driven by the counterpart answering. Ended
    /// sessions are never resurrected; a fresh `start` is required instead.
    pub async fn mark_active(&self, handle: SessionHandle) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&handle).ok_or(SessionError::NotFound)?;

        match entry.session.state {
            SessionState::Connecting => {
                entry.session.state = SessionState::Active;
                info!("Session {} is active", handle);
                Ok(())
            }
            state => Err(SessionError::InvalidTransition(state)),
        }
    }

    /// Transition to `Ended`, releasing the attached channel and its
    /// subscription. Idempotent on already-ended or unknown sessions.
    pub async fn end(&self, handle: SessionHandle) {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&handle) {
            Some(entry) => end_entry(entry).await,
            None => debug!("end() for unknown session {} ignored", handle),
        }
    }

    /// Tie a signaling channel to a session: the session owns the channel
    /// from here on, and a channel close notification ends the session.
    pub async fn attach_channel(
        &self,
        handle: SessionHandle,
        channel: Arc<SignalingChannel>,
    ) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&handle).ok_or(SessionError::NotFound)?;

        if !entry.session.state.is_live() {
            return Err(SessionError::InvalidTransition(entry.session.state));
        }

        let mut events = channel.subscribe();
        entry.channel = Some(Arc::clone(&channel));

        let session_map = Arc::clone(&self.sessions);
        entry.watcher = Some(tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(ChannelEvent::Closed(reason)) => {
                        debug!("Channel for session {} closed: {:?}", handle, reason);
                        end_in_map(&session_map, handle).await;
                        break;
                    }
                    Ok(ChannelEvent::Message(_)) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Session {} watcher lagged, skipped {} events", handle, skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }));

        Ok(())
    }

    pub async fn session(&self, handle: SessionHandle) -> Option<Session> {
        self.sessions
            .read()
            .await
            .get(&handle)
            .map(|entry| entry.session.clone())
    }

    /// Sessions currently connecting or active.
    pub async fn live_sessions(&self) -> Vec<Session> {
        self.sessions
            .read()
            .await
            .values()
            .filter(|entry| entry.session.state.is_live())
            .map(|entry| entry.session.clone())
            .collect()
    }
}

impl Default for SessionLauncher {
    fn default() -> Self {
        Self::new()
    }
}

async fn end_in_map(sessions: &SessionMap, handle: SessionHandle) {
    let mut sessions = sessions.write().await;
    if let Some(entry) = sessions.get_mut(&handle) {
        end_entry(entry).await;
    }
}

async fn end_entry(entry: &mut SessionEntry) {
    if entry.session.state == SessionState::Ended {
        return;
    }
    entry.session.state = SessionState::Ended;
    info!("Session {} ended", entry.session.id);

    // Channel first: close() is idempotent, and the watcher may be the task
    // running this teardown, so self-abort has to come last.
    if let Some(channel) = entry.channel.take() {
        channel.close().await;
    }
    if let Some(watcher) = entry.watcher.take() {
        watcher.abort();
    }
}
