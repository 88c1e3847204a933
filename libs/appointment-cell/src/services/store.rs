// libs/appointment-cell/src/services/store.rs
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use shared_http::ApiClient;
use shared_models::error::ApiError;

use crate::models::{
    normalize_appointment, normalize_time_string, Appointment, CreateAppointmentRequest,
};

/// Owns the patient's appointment list and mediates list/create calls against
/// the backend.
///
/// The in-memory collection is a cache of the remote source of truth: a list
/// call replaces it wholesale, a create inserts an optimistic echo at the
/// front (deduplicated by id) and then refreshes to canonical state. Callers
/// treat the collection as eventually consistent and re-fetch after a create
/// rather than trusting the echo.
pub struct AppointmentStore {
    api: Arc<ApiClient>,
    appointments: RwLock<Vec<Appointment>>,
}

impl AppointmentStore {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            appointments: RwLock::new(Vec::new()),
        }
    }

    /// Fetch all appointments for a patient, replacing the local collection.
    pub async fn list_appointments(&self, patient_id: &str) -> Result<Vec<Appointment>, ApiError> {
        debug!("Fetching appointments for patient {}", patient_id);

        let response: Value = self
            .api
            .get(&format!("/appointments/patient/{patient_id}"))
            .await?;

        let rows = response
            .as_array()
            .ok_or_else(|| ApiError::Server("Expected a list of appointments".to_string()))?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(normalize_appointment(row)?);
        }

        info!("Loaded {} appointments for patient {}", items.len(), patient_id);
        *self.appointments.write().await = items.clone();
        Ok(items)
    }

    /// Create an appointment and reconcile the local collection.
    ///
    /// Date, time, and description are all required; missing input fails
    /// before any network call. The time-of-day value is sent UTC-qualified.
    pub async fn create_appointment(
        &self,
        patient_id: &str,
        date: &str,
        time: &str,
        description: &str,
    ) -> Result<Appointment, ApiError> {
        if date.trim().is_empty() || time.trim().is_empty() || description.trim().is_empty() {
            return Err(ApiError::Validation(
                "Please fill in date, time, and description".to_string(),
            ));
        }
        if patient_id.trim().is_empty() {
            return Err(ApiError::Validation("User not logged in".to_string()));
        }

        let request = CreateAppointmentRequest {
            patient_id: patient_id.to_string(),
            date: date.trim().to_string(),
            time: normalize_time_string(time),
            description: description.trim().to_string(),
        };

        let echo: Value = self.api.post("/appointments/t", &request).await?;

        let created = normalize_appointment(&echo)?;
        info!("Created appointment {} for patient {}", created.id, patient_id);

        // Optimistic echo at the front, keyed by id so a duplicate echo never
        // yields two records.
        {
            let mut appointments = self.appointments.write().await;
            appointments.retain(|existing| existing.id != created.id);
            appointments.insert(0, created.clone());
        }

        // Canonical refresh. On failure the optimistic entry stays in place
        // and the error is surfaced; the next successful list call heals it.
        if let Err(e) = self.list_appointments(patient_id).await {
            warn!("Appointment list refresh after create failed: {}", e);
            return Err(e);
        }

        Ok(created)
    }

    /// Current in-memory collection, most recent create first.
    pub async fn snapshot(&self) -> Vec<Appointment> {
        self.appointments.read().await.clone()
    }
}
