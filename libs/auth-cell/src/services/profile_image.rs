// libs/auth-cell/src/services/profile_image.rs
use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use tracing::info;

use shared_http::ApiClient;
use shared_models::error::ApiError;

use crate::models::{ProfileImagePreview, ProfileImageUpload};

/// Profile image preview and upload.
pub struct ProfileImageService {
    api: Arc<ApiClient>,
}

impl ProfileImageService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn preview_url(&self, user_id: &str) -> Result<String, ApiError> {
        let response: ProfileImagePreview = self
            .api
            .get(&format!(
                "/auth/profile-image/preview?user_id={}",
                urlencoding::encode(user_id)
            ))
            .await?;
        Ok(response.preview_url)
    }

    pub async fn upload(
        &self,
        user_id: &str,
        file_name: &str,
        image: Vec<u8>,
    ) -> Result<ProfileImageUpload, ApiError> {
        let part = Part::bytes(image).file_name(file_name.to_string());
        let form = Form::new()
            .text("user_id", user_id.to_string())
            .part("image", part);

        let response: ProfileImageUpload = self.api.post_multipart("/auth/profile-image", form).await?;
        info!("Profile image for {} stored at {}", user_id, response.profile.image_path);
        Ok(response)
    }
}
