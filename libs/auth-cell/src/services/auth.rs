// libs/auth-cell/src/services/auth.rs
use std::sync::Arc;

use tracing::info;

use shared_config::AppConfig;
use shared_http::ApiClient;
use shared_models::error::ApiError;

use crate::models::{AuthSession, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

/// Login and registration against the clinic backend.
pub struct AuthService {
    config: Arc<AppConfig>,
    api: ApiClient,
}

impl AuthService {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let api = ApiClient::new(&config);
        Self { config, api }
    }

    /// Authenticate and build the session context the rest of the client runs
    /// under. When the backend issues a token, the context's API client
    /// carries it as a bearer header.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ApiError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ApiError::Validation("Please fill in all fields".to_string()));
        }

        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.api.post("/auth/login", &request).await?;

        info!("Patient {} logged in", response.user.id);

        let api = match &response.token {
            Some(token) => ApiClient::with_token(&self.config, token.clone()),
            None => ApiClient::new(&self.config),
        };

        Ok(AuthSession::new(response.user, Arc::new(api)))
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, ApiError> {
        if request.email.trim().is_empty()
            || request.password.is_empty()
            || request.name.trim().is_empty()
        {
            return Err(ApiError::Validation(
                "Email, password, and name are required".to_string(),
            ));
        }

        let response: RegisterResponse = self.api.post("/auth/register", &request).await?;

        info!("Registered account for {}", request.email.trim());
        Ok(response)
    }

    /// Tear down the session context. Dropping it releases the token-bound
    /// client, so nothing constructed afterwards can reuse the credentials.
    pub fn logout(&self, session: AuthSession) {
        info!("Patient {} logged out", session.user.id);
        drop(session);
    }
}
