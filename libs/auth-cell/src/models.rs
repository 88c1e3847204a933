// libs/auth-cell/src/models.rs
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use shared_http::ApiClient;
use shared_models::auth::User;

/// Authenticated context: created at login, destroyed at logout.
///
/// Replaces any notion of global client state — the stores and the signaling
/// channel receive this context (or the client it carries) at construction.
#[derive(Debug)]
pub struct AuthSession {
    pub user: User,
    api: Arc<ApiClient>,
}

impl AuthSession {
    pub fn new(user: User, api: Arc<ApiClient>) -> Self {
        Self { user, api }
    }

    /// Token-bound API client for the stores owned by this session.
    pub fn api(&self) -> Arc<ApiClient> {
        Arc::clone(&self.api)
    }

    /// The identity the signaling channel is addressed by.
    pub fn local_id(&self) -> &str {
        &self.user.id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub message: Option<String>,
    pub user: User,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterResponse {
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileImagePreview {
    pub preview_url: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileImageUpload {
    pub message: Option<String>,
    pub profile: ProfileRecord,
}

#[derive(Debug, Deserialize)]
pub struct ProfileRecord {
    pub image_path: String,
}
