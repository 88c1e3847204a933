// libs/perception-cell/src/services/perception.rs
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use shared_http::ApiClient;
use shared_models::error::ApiError;

use crate::models::{normalize_perception, Perception};

/// Read-only viewer for the perceptions recorded against an appointment.
pub struct PerceptionService {
    api: Arc<ApiClient>,
}

impl PerceptionService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list_for_appointment(
        &self,
        appointment_id: &str,
    ) -> Result<Vec<Perception>, ApiError> {
        debug!("Fetching perceptions for appointment {}", appointment_id);

        let response: Value = self
            .api
            .get(&format!("/perceptions/appointment/{appointment_id}"))
            .await?;

        let rows = response
            .as_array()
            .ok_or_else(|| ApiError::Server("Expected a list of perceptions".to_string()))?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(normalize_perception(row)?);
        }

        info!(
            "Loaded {} perceptions for appointment {}",
            items.len(),
            appointment_id
        );
        Ok(items)
    }
}
