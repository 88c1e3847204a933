use thiserror::Error;

/// Failure taxonomy shared by every HTTP-backed cell.
///
/// `Validation` is raised before any I/O, `Network` when no response was
/// received at all, and `Server` for non-2xx responses or success bodies that
/// do not have the documented shape.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error: {0}")]
    Server(String),
}
