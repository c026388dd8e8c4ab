use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{ClinicError, ClinicResult},
    models::doctor::DoctorSummary,
    time::{self, Interval},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub doctor_id: Uuid,
    #[serde(rename = "date")]
    pub start: NaiveDateTime,
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    pub appointment_type: String,
    pub patient_name: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn end(&self) -> NaiveDateTime {
        time::end_of(self.start, self.duration_minutes)
    }

    pub fn interval(&self) -> Interval {
        Interval::new(self.start, self.end())
    }
}

/// A validated booking, ready to be handed to the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub doctor_id: Uuid,
    pub start: NaiveDateTime,
    pub duration_minutes: u32,
    pub appointment_type: String,
    pub patient_name: String,
    pub notes: Option<String>,
}

/// Typed partial update. `None` leaves the attribute unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentPatch {
    pub doctor_id: Option<Uuid>,
    pub start: Option<NaiveDateTime>,
    pub duration_minutes: Option<u32>,
    pub appointment_type: Option<String>,
    pub patient_name: Option<String>,
    pub notes: Option<String>,
}

impl AppointmentPatch {
    /// Whether applying this patch can move the appointment in anyone's calendar.
    pub fn touches_schedule(&self) -> bool {
        self.doctor_id.is_some() || self.start.is_some() || self.duration_minutes.is_some()
    }

    /// Returns `current` with every present field replaced.
    pub fn apply_to(&self, current: &Appointment) -> Appointment {
        let mut next = current.clone();
        if let Some(doctor_id) = self.doctor_id {
            next.doctor_id = doctor_id;
        }
        if let Some(start) = self.start {
            next.start = start;
        }
        if let Some(duration) = self.duration_minutes {
            next.duration_minutes = duration;
        }
        if let Some(kind) = &self.appointment_type {
            next.appointment_type = kind.clone();
        }
        if let Some(patient) = &self.patient_name {
            next.patient_name = patient.clone();
        }
        if let Some(notes) = &self.notes {
            next.notes = Some(notes.clone());
        }
        next
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub doctor_id: Uuid,
    pub date: String,
    pub duration: Option<u32>,
    pub appointment_type: String,
    pub patient_name: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    pub doctor_id: Option<Uuid>,
    pub date: Option<String>,
    pub duration: Option<u32>,
    pub appointment_type: Option<String>,
    pub patient_name: Option<String>,
    pub notes: Option<String>,
}

/// An appointment with its doctor reference resolved, as listed to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDetails {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub doctor: Option<DoctorSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelAppointmentResponse {
    pub message: String,
}

pub(crate) fn validate_duration(minutes: u32) -> ClinicResult<u32> {
    if minutes == 0 || minutes > time::MAX_APPOINTMENT_MINUTES {
        return Err(ClinicError::InvalidInput(format!(
            "Duration must be between 1 and {} minutes, got {}",
            time::MAX_APPOINTMENT_MINUTES,
            minutes
        )));
    }
    Ok(minutes)
}

pub(crate) fn validate_label(field: &str, value: &str) -> ClinicResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ClinicError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}
