// libs/perception-cell/src/models.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

use shared_models::error::ApiError;
use shared_models::ids;

/// A clinician note attached to an appointment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Perception {
    pub id: String,
    pub appointment_id: String,
    pub title: String,
    pub note: String,
    pub created_at: Option<String>,
}

/// Map one backend perception record to the canonical entity.
pub fn normalize_perception(record: &Value) -> Result<Perception, ApiError> {
    let id = record
        .get("id")
        .and_then(ids::id_from_value)
        .ok_or_else(|| ApiError::Server("Perception record is missing an id".to_string()))?;

    let appointment_id = record
        .get("appointment_id")
        .and_then(ids::id_from_value)
        .ok_or_else(|| {
            ApiError::Server(format!("Perception {id} is missing its appointment id"))
        })?;

    Ok(Perception {
        id,
        appointment_id,
        title: record
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        note: record
            .get("note")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        created_at: record
            .get("created_at")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_numeric_ids_and_absent_fields() {
        let record = json!({ "id": 7, "appointment_id": 9 });
        let perception = normalize_perception(&record).unwrap();

        assert_eq!(perception.id, "7");
        assert_eq!(perception.appointment_id, "9");
        assert_eq!(perception.title, "");
        assert_eq!(perception.created_at, None);
    }
}
