use chrono::{DateTime, NaiveDateTime, NaiveTime, Utc};
use clinic_core::{
    errors::{ClinicError, ClinicResult},
    models::{
        appointment::Appointment,
        doctor::{Doctor, WorkingHours},
    },
};
use eyre::eyre;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbDoctor {
    pub id: Uuid,
    pub name: String,
    pub specialization: String,
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub start_time: NaiveDateTime,
    pub duration_minutes: i32,
    pub appointment_type: String,
    pub patient_name: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbDoctor> for Doctor {
    type Error = ClinicError;

    fn try_from(row: DbDoctor) -> ClinicResult<Self> {
        let working_hours = WorkingHours::new(row.work_start, row.work_end).map_err(|_| {
            ClinicError::Storage(eyre!("Doctor {} has inverted working hours", row.id))
        })?;

        Ok(Doctor {
            id: row.id,
            name: row.name,
            specialization: row.specialization,
            working_hours,
        })
    }
}

impl TryFrom<DbAppointment> for Appointment {
    type Error = ClinicError;

    fn try_from(row: DbAppointment) -> ClinicResult<Self> {
        let duration_minutes = u32::try_from(row.duration_minutes)
            .ok()
            .filter(|minutes| *minutes > 0)
            .ok_or_else(|| {
                ClinicError::Storage(eyre!(
                    "Appointment {} has invalid duration {}",
                    row.id,
                    row.duration_minutes
                ))
            })?;

        Ok(Appointment {
            id: row.id,
            doctor_id: row.doctor_id,
            start: row.start_time,
            duration_minutes,
            appointment_type: row.appointment_type,
            patient_name: row.patient_name,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
