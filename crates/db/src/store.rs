//! PostgreSQL-backed implementations of the core collaborator traits.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use clinic_core::{
    errors::{ClinicError, ClinicResult},
    models::{
        appointment::{Appointment, AppointmentPatch, NewAppointment},
        doctor::Doctor,
    },
    repository::{AppointmentRepository, DoctorDirectory},
};
use uuid::Uuid;

use crate::{
    DbPool,
    repositories::{appointment, doctor},
};

/// SQLSTATE raised when an EXCLUDE constraint rejects a row.
const EXCLUSION_VIOLATION: &str = "23P01";

/// Maps a repository failure onto the core error, singling out the overlap
/// exclusion constraint so the service can report it as a booking conflict.
pub fn classify(err: eyre::Report) -> ClinicError {
    if let Some(sqlx::Error::Database(db_err)) = err.downcast_ref::<sqlx::Error>() {
        if db_err.code().as_deref() == Some(EXCLUSION_VIOLATION) {
            return ClinicError::Conflict(db_err.message().to_string());
        }
    }
    ClinicError::Storage(err)
}

#[derive(Clone)]
pub struct PgDoctorDirectory {
    pool: DbPool,
}

impl PgDoctorDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DoctorDirectory for PgDoctorDirectory {
    async fn find_by_id(&self, id: Uuid) -> ClinicResult<Option<Doctor>> {
        doctor::get_doctor_by_id(&self.pool, id)
            .await
            .map_err(classify)?
            .map(Doctor::try_from)
            .transpose()
    }

    async fn list(&self) -> ClinicResult<Vec<Doctor>> {
        doctor::list_doctors(&self.pool)
            .await
            .map_err(classify)?
            .into_iter()
            .map(Doctor::try_from)
            .collect()
    }
}

#[derive(Clone)]
pub struct PgAppointmentRepository {
    pool: DbPool,
}

impl PgAppointmentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn not_found(id: Uuid) -> ClinicError {
    ClinicError::NotFound(format!("Appointment with ID {} not found", id))
}

#[async_trait]
impl AppointmentRepository for PgAppointmentRepository {
    async fn find_by_doctor_and_range(
        &self,
        doctor_id: Uuid,
        start_inclusive: NaiveDateTime,
        end_exclusive: NaiveDateTime,
    ) -> ClinicResult<Vec<Appointment>> {
        appointment::get_appointments_by_doctor_in_range(
            &self.pool,
            doctor_id,
            start_inclusive,
            end_exclusive,
        )
        .await
        .map_err(classify)?
        .into_iter()
        .map(Appointment::try_from)
        .collect()
    }

    async fn find_by_id(&self, id: Uuid) -> ClinicResult<Option<Appointment>> {
        appointment::get_appointment_by_id(&self.pool, id)
            .await
            .map_err(classify)?
            .map(Appointment::try_from)
            .transpose()
    }

    async fn list(&self) -> ClinicResult<Vec<Appointment>> {
        appointment::list_appointments(&self.pool)
            .await
            .map_err(classify)?
            .into_iter()
            .map(Appointment::try_from)
            .collect()
    }

    async fn insert(&self, new: NewAppointment) -> ClinicResult<Appointment> {
        appointment::create_appointment(&self.pool, &new)
            .await
            .map_err(classify)?
            .try_into()
    }

    async fn update(&self, id: Uuid, patch: AppointmentPatch) -> ClinicResult<Appointment> {
        appointment::update_appointment(&self.pool, id, &patch)
            .await
            .map_err(classify)?
            .ok_or_else(|| not_found(id))?
            .try_into()
    }

    async fn delete(&self, id: Uuid) -> ClinicResult<()> {
        if appointment::delete_appointment(&self.pool, id)
            .await
            .map_err(classify)?
        {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }
}
