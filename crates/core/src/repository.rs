//! Collaborator seams of the scheduling core. The core reads doctors and
//! reads/writes appointments only through these traits.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::{
    errors::ClinicResult,
    models::{
        appointment::{Appointment, AppointmentPatch, NewAppointment},
        doctor::Doctor,
    },
};

#[async_trait]
pub trait DoctorDirectory: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> ClinicResult<Option<Doctor>>;

    async fn list(&self) -> ClinicResult<Vec<Doctor>>;
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Appointments of `doctor_id` overlapping `[start_inclusive, end_exclusive)`,
    /// ascending by start.
    async fn find_by_doctor_and_range(
        &self,
        doctor_id: Uuid,
        start_inclusive: NaiveDateTime,
        end_exclusive: NaiveDateTime,
    ) -> ClinicResult<Vec<Appointment>>;

    async fn find_by_id(&self, id: Uuid) -> ClinicResult<Option<Appointment>>;

    /// Every appointment, ascending by start.
    async fn list(&self) -> ClinicResult<Vec<Appointment>>;

    /// Fails with `ClinicError::Conflict` when a storage-level exclusion
    /// constraint rejects the row.
    async fn insert(&self, appointment: NewAppointment) -> ClinicResult<Appointment>;

    /// Fails with `ClinicError::NotFound` for an unknown id.
    async fn update(&self, id: Uuid, patch: AppointmentPatch) -> ClinicResult<Appointment>;

    /// Fails with `ClinicError::NotFound` for an unknown id.
    async fn delete(&self, id: Uuid) -> ClinicResult<()>;
}
