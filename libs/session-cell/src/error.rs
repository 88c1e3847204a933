use thiserror::Error;

use crate::models::SessionState;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session not found")]
    NotFound,

    #[error("Session cannot transition out of state: {0}")]
    InvalidTransition(SessionState),
}
