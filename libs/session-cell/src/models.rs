// libs/session-cell/src/models.rs
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Client-generated identifier for one session instance. A superseded or
/// ended session keeps its handle; a fresh start always mints a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionHandle(Uuid);

impl SessionHandle {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A live communication instance tied to one appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionHandle,
    pub appointment_id: String,
    pub kind: SessionKind,
    pub counterpart_id: Option<String>,
    pub state: SessionState,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Chat,
    Voice,
    Video,
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionKind::Chat => write!(f, "chat"),
            SessionKind::Voice => write!(f, "voice"),
            SessionKind::Video => write!(f, "video"),
        }
    }
}

/// `Idle → Connecting → Active → Ended`; `Connecting → Ended` is the abort
/// path and `Ended` is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Connecting,
    Active,
    Ended,
}

impl SessionState {
    /// A live session blocks a second one of the same kind on the same
    /// appointment.
    pub fn is_live(&self) -> bool {
        matches!(self, SessionState::Connecting | SessionState::Active)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Connecting => write!(f, "connecting"),
            SessionState::Active => write!(f, "active"),
            SessionState::Ended => write!(f, "ended"),
        }
    }
}
