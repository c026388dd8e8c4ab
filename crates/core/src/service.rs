//! # Scheduling Service
//!
//! Composes the conflict checker and the slot generator with the injected
//! collaborators. Every write for a doctor runs read, validate and commit
//! while holding that doctor's lock, so two requests can never both pass
//! validation for overlapping times.

use std::{collections::HashMap, sync::Arc};

use chrono::{NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::{
    conflict::{find_conflict, validate_candidate},
    errors::{ClinicError, ClinicResult},
    locks::DoctorLocks,
    models::{
        appointment::{
            self, Appointment, AppointmentDetails, AppointmentPatch, CreateAppointmentRequest,
            NewAppointment, UpdateAppointmentRequest,
        },
        doctor::{Doctor, DoctorSummary},
        slot::Slot,
    },
    repository::{AppointmentRepository, DoctorDirectory},
    slots::{SlotOptions, generate_slots},
    time::{self, DEFAULT_APPOINTMENT_MINUTES, Interval},
};

pub struct SchedulingService {
    doctors: Arc<dyn DoctorDirectory>,
    appointments: Arc<dyn AppointmentRepository>,
    locks: DoctorLocks,
    zone: Tz,
    slot_options: SlotOptions,
}

impl SchedulingService {
    /// Creates a service comparing times in UTC with default slot options.
    pub fn new(doctors: Arc<dyn DoctorDirectory>, appointments: Arc<dyn AppointmentRepository>) -> Self {
        Self {
            doctors,
            appointments,
            locks: DoctorLocks::new(),
            zone: Tz::UTC,
            slot_options: SlotOptions::default(),
        }
    }

    /// Sets the zone offset-bearing input datetimes are converted into.
    pub fn with_zone(mut self, zone: Tz) -> Self {
        self.zone = zone;
        self
    }

    pub fn with_slot_options(mut self, slot_options: SlotOptions) -> Self {
        self.slot_options = slot_options;
        self
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    pub async fn list_doctors(&self) -> ClinicResult<Vec<Doctor>> {
        self.doctors.list().await
    }

    pub async fn get_doctor(&self, id: Uuid) -> ClinicResult<Doctor> {
        self.doctors
            .find_by_id(id)
            .await?
            .ok_or_else(|| ClinicError::NotFound(format!("Doctor with ID {} not found", id)))
    }

    /// All slots of the doctor on `date` (`YYYY-MM-DD`), ascending.
    #[instrument(skip(self))]
    pub async fn slots_for(&self, doctor_id: Uuid, date: &str) -> ClinicResult<Vec<Slot>> {
        let date = time::parse_date(date)?;
        let doctor = self.get_doctor(doctor_id).await?;
        let existing = self.bookings_on(doctor.id, date).await?;

        debug!(existing = existing.len(), "generating slots");
        generate_slots(&doctor.working_hours, date, &existing, self.slot_options)
    }

    /// Only the free slots of the doctor on `date`.
    pub async fn available_slots(&self, doctor_id: Uuid, date: &str) -> ClinicResult<Vec<Slot>> {
        let slots = self.slots_for(doctor_id, date).await?;
        Ok(slots.into_iter().filter(|slot| slot.available).collect())
    }

    pub async fn list_appointments(&self) -> ClinicResult<Vec<AppointmentDetails>> {
        let doctors: HashMap<Uuid, DoctorSummary> = self
            .doctors
            .list()
            .await?
            .iter()
            .map(|doctor| (doctor.id, DoctorSummary::from(doctor)))
            .collect();

        let appointments = self.appointments.list().await?;
        Ok(appointments
            .into_iter()
            .map(|appointment| AppointmentDetails {
                doctor: doctors.get(&appointment.doctor_id).cloned(),
                appointment,
            })
            .collect())
    }

    pub async fn get_appointment(&self, id: Uuid) -> ClinicResult<AppointmentDetails> {
        let appointment = self.find_appointment(id).await?;
        let doctor = self
            .doctors
            .find_by_id(appointment.doctor_id)
            .await?
            .map(|doctor| DoctorSummary::from(&doctor));

        Ok(AppointmentDetails { appointment, doctor })
    }

    /// Validates and commits a new booking.
    #[instrument(skip(self, request), fields(doctor_id = %request.doctor_id))]
    pub async fn book(&self, request: CreateAppointmentRequest) -> ClinicResult<Appointment> {
        let candidate = NewAppointment {
            doctor_id: request.doctor_id,
            start: time::parse_instant(&request.date, self.zone)?,
            duration_minutes: appointment::validate_duration(
                request.duration.unwrap_or(DEFAULT_APPOINTMENT_MINUTES),
            )?,
            appointment_type: appointment::validate_label("appointmentType", &request.appointment_type)?,
            patient_name: appointment::validate_label("patientName", &request.patient_name)?,
            notes: request.notes,
        };

        let doctor = self.get_doctor(candidate.doctor_id).await?;
        let _guard = self.locks.acquire(doctor.id).await;

        let existing = self.bookings_on(doctor.id, candidate.start.date()).await?;
        if let Err(rejection) =
            validate_candidate(&doctor, candidate.start, candidate.duration_minutes, &existing, None)
        {
            warn!(?rejection, start = %candidate.start, "booking rejected");
            return Err(rejection.into());
        }

        let interval = Interval::from_duration(candidate.start, candidate.duration_minutes);
        let created = match self.appointments.insert(candidate).await {
            Ok(created) => created,
            Err(ClinicError::Conflict(reason)) => {
                return Err(self.storage_conflict(doctor.id, interval, None, &reason).await);
            }
            Err(err) => return Err(err),
        };

        info!(appointment_id = %created.id, start = %created.start, "appointment booked");
        Ok(created)
    }

    /// Applies a partial update, re-validating when the doctor, start or
    /// duration is part of the patch.
    #[instrument(skip(self, request))]
    pub async fn update(&self, id: Uuid, request: UpdateAppointmentRequest) -> ClinicResult<Appointment> {
        let patch = self.parse_patch(request)?;

        if !patch.touches_schedule() {
            let updated = self.appointments.update(id, patch).await?;
            info!(appointment_id = %id, "appointment details updated");
            return Ok(updated);
        }

        let current = self.find_appointment(id).await?;
        let doctor = self.get_doctor(patch.doctor_id.unwrap_or(current.doctor_id)).await?;

        // A reassignment changes two calendars, so both doctors are locked
        let _guards = self.locks.acquire_all(&[current.doctor_id, doctor.id]).await;

        // Re-read under the locks so validation sees the committed state
        let latest = self.find_appointment(id).await?;
        if latest.doctor_id != current.doctor_id {
            return Err(ClinicError::Conflict(format!(
                "Appointment {} was reassigned while being updated",
                id
            )));
        }
        let target = patch.apply_to(&latest);

        let existing = self.bookings_on(doctor.id, target.start.date()).await?;
        if let Err(rejection) =
            validate_candidate(&doctor, target.start, target.duration_minutes, &existing, Some(id))
        {
            warn!(?rejection, start = %target.start, "update rejected");
            return Err(rejection.into());
        }

        // Write the validated schedule itself, not just the fields that changed
        let validated = AppointmentPatch {
            doctor_id: Some(target.doctor_id),
            start: Some(target.start),
            duration_minutes: Some(target.duration_minutes),
            ..patch
        };

        let updated = match self.appointments.update(id, validated).await {
            Ok(updated) => updated,
            Err(ClinicError::Conflict(reason)) => {
                return Err(self
                    .storage_conflict(doctor.id, target.interval(), Some(id), &reason)
                    .await);
            }
            Err(err) => return Err(err),
        };

        info!(appointment_id = %id, start = %updated.start, "appointment rescheduled");
        Ok(updated)
    }

    /// Hard-deletes the appointment.
    pub async fn cancel(&self, id: Uuid) -> ClinicResult<()> {
        self.appointments.delete(id).await?;
        info!(appointment_id = %id, "appointment cancelled");
        Ok(())
    }

    async fn find_appointment(&self, id: Uuid) -> ClinicResult<Appointment> {
        self.appointments
            .find_by_id(id)
            .await?
            .ok_or_else(|| ClinicError::NotFound(format!("Appointment with ID {} not found", id)))
    }

    async fn bookings_on(&self, doctor_id: Uuid, date: NaiveDate) -> ClinicResult<Vec<Appointment>> {
        let day = time::day_bounds(date);
        self.appointments
            .find_by_doctor_and_range(doctor_id, day.start, day.end)
            .await
    }

    /// Validates every present field before anything is written.
    fn parse_patch(&self, request: UpdateAppointmentRequest) -> ClinicResult<AppointmentPatch> {
        let start: Option<NaiveDateTime> = request
            .date
            .as_deref()
            .map(|raw| time::parse_instant(raw, self.zone))
            .transpose()?;

        Ok(AppointmentPatch {
            doctor_id: request.doctor_id,
            start,
            duration_minutes: request.duration.map(appointment::validate_duration).transpose()?,
            appointment_type: request
                .appointment_type
                .as_deref()
                .map(|value| appointment::validate_label("appointmentType", value))
                .transpose()?,
            patient_name: request
                .patient_name
                .as_deref()
                .map(|value| appointment::validate_label("patientName", value))
                .transpose()?,
            notes: request.notes,
        })
    }

    /// The storage layer refused an overlapping write that slipped past the
    /// in-process lock (another process). Name the winner if it can be found.
    async fn storage_conflict(
        &self,
        doctor_id: Uuid,
        candidate: Interval,
        exclude: Option<Uuid>,
        reason: &str,
    ) -> ClinicError {
        warn!(%doctor_id, reason, "storage rejected overlapping appointment");

        let existing = match self
            .appointments
            .find_by_doctor_and_range(doctor_id, candidate.start, candidate.end)
            .await
        {
            Ok(existing) => existing,
            Err(err) => return err,
        };

        ClinicError::Overlaps {
            conflicting_id: find_conflict(candidate, &existing, exclude).map(|a| a.id),
        }
    }
}
