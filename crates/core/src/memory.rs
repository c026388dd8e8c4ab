//! In-memory implementations of the collaborator traits, used for tests and
//! for running the API without a database.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    conflict::overlaps,
    errors::{ClinicError, ClinicResult},
    models::{
        appointment::{Appointment, AppointmentPatch, NewAppointment},
        doctor::Doctor,
    },
    repository::{AppointmentRepository, DoctorDirectory},
};

#[derive(Default)]
pub struct InMemoryDoctorDirectory {
    doctors: RwLock<HashMap<Uuid, Doctor>>,
}

impl InMemoryDoctorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_doctors(doctors: impl IntoIterator<Item = Doctor>) -> Self {
        Self {
            doctors: RwLock::new(doctors.into_iter().map(|d| (d.id, d)).collect()),
        }
    }

    pub async fn insert(&self, doctor: Doctor) {
        self.doctors.write().await.insert(doctor.id, doctor);
    }
}

#[async_trait]
impl DoctorDirectory for InMemoryDoctorDirectory {
    async fn find_by_id(&self, id: Uuid) -> ClinicResult<Option<Doctor>> {
        Ok(self.doctors.read().await.get(&id).cloned())
    }

    async fn list(&self) -> ClinicResult<Vec<Doctor>> {
        let mut doctors: Vec<Doctor> = self.doctors.read().await.values().cloned().collect();
        doctors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(doctors)
    }
}

#[derive(Default)]
pub struct InMemoryAppointmentRepository {
    appointments: RwLock<HashMap<Uuid, Appointment>>,
}

impl InMemoryAppointmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.appointments.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.appointments.read().await.is_empty()
    }
}

fn sorted(mut appointments: Vec<Appointment>) -> Vec<Appointment> {
    appointments.sort_by_key(|a| (a.start, a.created_at));
    appointments
}

#[async_trait]
impl AppointmentRepository for InMemoryAppointmentRepository {
    async fn find_by_doctor_and_range(
        &self,
        doctor_id: Uuid,
        start_inclusive: NaiveDateTime,
        end_exclusive: NaiveDateTime,
    ) -> ClinicResult<Vec<Appointment>> {
        let appointments = self.appointments.read().await;
        Ok(sorted(
            appointments
                .values()
                .filter(|a| a.doctor_id == doctor_id)
                .filter(|a| overlaps(a.start, a.end(), start_inclusive, end_exclusive))
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_id(&self, id: Uuid) -> ClinicResult<Option<Appointment>> {
        Ok(self.appointments.read().await.get(&id).cloned())
    }

    async fn list(&self) -> ClinicResult<Vec<Appointment>> {
        Ok(sorted(self.appointments.read().await.values().cloned().collect()))
    }

    async fn insert(&self, appointment: NewAppointment) -> ClinicResult<Appointment> {
        let now = Utc::now();
        let stored = Appointment {
            id: Uuid::new_v4(),
            doctor_id: appointment.doctor_id,
            start: appointment.start,
            duration_minutes: appointment.duration_minutes,
            appointment_type: appointment.appointment_type,
            patient_name: appointment.patient_name,
            notes: appointment.notes,
            created_at: now,
            updated_at: now,
        };
        self.appointments.write().await.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: Uuid, patch: AppointmentPatch) -> ClinicResult<Appointment> {
        let mut appointments = self.appointments.write().await;
        let current = appointments
            .get_mut(&id)
            .ok_or_else(|| ClinicError::NotFound(format!("Appointment with ID {} not found", id)))?;

        let mut next = patch.apply_to(current);
        next.updated_at = Utc::now();
        *current = next.clone();
        Ok(next)
    }

    async fn delete(&self, id: Uuid) -> ClinicResult<()> {
        self.appointments
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| ClinicError::NotFound(format!("Appointment with ID {} not found", id)))
    }
}
