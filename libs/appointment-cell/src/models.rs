// libs/appointment-cell/src/models.rs
use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use shared_models::error::ApiError;
use shared_models::ids;

/// Display name used while no doctor has been assigned to an appointment.
pub const DOCTOR_PENDING: &str = "Doctor pending";

/// A scheduled consultation, normalized from whatever shape the backend sent.
///
/// `id` is assigned by the backend and is the reconciliation key between the
/// optimistic local echo of a create and the canonical record from a later
/// fetch. The schedule is a calendar date plus wall-clock time; the backend
/// gives no timezone guarantee, so no instant is derived from them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: String,
    pub doctor_name: String,
    pub doctor_id: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub description: String,
    pub status: AppointmentStatus,
}

impl Appointment {
    /// Schedule line the list screens render, e.g. `2026-02-10 • 14:30:00`.
    pub fn schedule_label(&self) -> String {
        format!("{} • {}", self.date.format("%Y-%m-%d"), self.time.format("%H:%M:%S"))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl AppointmentStatus {
    /// Backend statuses outside the documented set collapse to `Pending`,
    /// the same default applied when the field is absent.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("confirmed") => AppointmentStatus::Confirmed,
            Some("cancelled") => AppointmentStatus::Cancelled,
            _ => AppointmentStatus::Pending,
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateAppointmentRequest {
    pub patient_id: String,
    pub date: String,
    pub time: String,
    pub description: String,
}

/// Dashboard summary counters, refreshed best-effort.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct AppointmentStats {
    pub total: usize,
    pub today: usize,
    pub pending: usize,
}

/// Append the UTC marker the backend requires on time-of-day values.
/// Idempotent: an already-qualified value is returned unchanged.
pub fn normalize_time_string(time: &str) -> String {
    let trimmed = time.trim();
    if trimmed.ends_with('Z') {
        trimmed.to_string()
    } else {
        format!("{trimmed}Z")
    }
}

/// Map one backend appointment record to the canonical entity.
///
/// This is the single place the union of observed server shapes is resolved:
/// string or numeric ids, `doctor_id` / `doctor.id` / `doctorId`, `date`
/// values with a trailing `T...` section, `time` values with a `Z` or
/// fractional suffix, and absent `doctor_name` / `description` / `status`
/// fields. Records that still do not fit are a malformed success body.
pub fn normalize_appointment(record: &Value) -> Result<Appointment, ApiError> {
    let id = record
        .get("id")
        .and_then(ids::id_from_value)
        .ok_or_else(|| ApiError::Server("Appointment record is missing an id".to_string()))?;

    let doctor_name = record
        .get("doctor_name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .unwrap_or(DOCTOR_PENDING)
        .to_string();

    let doctor_id = record
        .get("doctor_id")
        .and_then(ids::id_from_value)
        .or_else(|| record.pointer("/doctor/id").and_then(ids::id_from_value))
        .or_else(|| record.get("doctorId").and_then(ids::id_from_value));

    let date = parse_date(record.get("date").and_then(Value::as_str))
        .ok_or_else(|| ApiError::Server(format!("Appointment {id} has an invalid date")))?;
    let time = parse_time(record.get("time").and_then(Value::as_str))
        .ok_or_else(|| ApiError::Server(format!("Appointment {id} has an invalid time")))?;

    let description = record
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let status = AppointmentStatus::parse(record.get("status").and_then(Value::as_str));

    Ok(Appointment {
        id,
        doctor_name,
        doctor_id,
        date,
        time,
        description,
        status,
    })
}

fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let date_part = raw?.trim().split('T').next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn parse_time(raw: Option<&str>) -> Option<NaiveTime> {
    // "14:30:00Z" and "14:30:00.000Z" both reduce to the first 8 characters.
    let clock: String = raw?.trim().chars().take(8).collect();
    NaiveTime::parse_from_str(&clock, "%H:%M:%S").ok()
}
