// libs/appointment-cell/src/services/stats.rs
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use shared_http::ApiClient;
use shared_models::error::ApiError;

use crate::models::{normalize_appointment, AppointmentStats, AppointmentStatus};

/// Dashboard appointment counters.
///
/// The dashboard treats this data as best-effort: a failed refresh keeps the
/// previously cached values instead of surfacing an error. This is the one
/// place a backend failure is deliberately swallowed.
pub struct AppointmentStatsService {
    api: Arc<ApiClient>,
    cached: RwLock<AppointmentStats>,
}

impl AppointmentStatsService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            cached: RwLock::new(AppointmentStats::default()),
        }
    }

    /// Recompute the counters, falling back to the cached values on failure.
    pub async fn refresh(&self, patient_id: &str) -> AppointmentStats {
        match self.fetch(patient_id).await {
            Ok(stats) => {
                *self.cached.write().await = stats.clone();
                stats
            }
            Err(e) => {
                debug!("Stats refresh failed, keeping previous values: {}", e);
                self.cached.read().await.clone()
            }
        }
    }

    pub async fn current(&self) -> AppointmentStats {
        self.cached.read().await.clone()
    }

    async fn fetch(&self, patient_id: &str) -> Result<AppointmentStats, ApiError> {
        let response: Value = self
            .api
            .get(&format!("/appointments/patient/{patient_id}"))
            .await?;

        let rows = response
            .as_array()
            .ok_or_else(|| ApiError::Server("Expected a list of appointments".to_string()))?;

        let today = Utc::now().date_naive();
        let mut stats = AppointmentStats {
            total: rows.len(),
            ..AppointmentStats::default()
        };

        for row in rows {
            let appointment = normalize_appointment(row)?;
            if appointment.date == today {
                stats.today += 1;
            }
            if appointment.status == AppointmentStatus::Pending {
                stats.pending += 1;
            }
        }

        Ok(stats)
    }
}
