//! # Interval Conflict Checker
//!
//! Decides whether a candidate appointment collides with an existing booking
//! or falls outside the doctor's working hours. Intervals are half-open, so
//! back-to-back bookings are allowed.

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::{
    errors::ClinicError,
    models::{appointment::Appointment, doctor::{Doctor, WorkingHours}},
    time::Interval,
};

/// Why a candidate was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    OutsideWorkingHours { window: Interval },
    Overlaps(Uuid),
}

impl From<Rejection> for ClinicError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::OutsideWorkingHours { window } => ClinicError::OutsideWorkingHours {
                start: window.start,
                end: window.end,
            },
            Rejection::Overlaps(id) => ClinicError::Overlaps {
                conflicting_id: Some(id),
            },
        }
    }
}

/// True iff `[candidate_start, candidate_end)` and `[existing_start, existing_end)`
/// share at least one instant.
pub fn overlaps(
    candidate_start: NaiveDateTime,
    candidate_end: NaiveDateTime,
    existing_start: NaiveDateTime,
    existing_end: NaiveDateTime,
) -> bool {
    candidate_start < existing_end && existing_start < candidate_end
}

/// True iff the candidate starts no earlier than opening and ends no later
/// than closing on `date`.
pub fn within_working_hours(
    candidate_start: NaiveDateTime,
    candidate_end: NaiveDateTime,
    hours: &WorkingHours,
    date: NaiveDate,
) -> bool {
    let window = hours.window_on(date);
    candidate_start >= window.start && candidate_end <= window.end && candidate_start < candidate_end
}

/// The first existing appointment (by start) the candidate would collide with.
pub fn find_conflict<'a>(
    candidate: Interval,
    existing: &'a [Appointment],
    exclude: Option<Uuid>,
) -> Option<&'a Appointment> {
    existing
        .iter()
        .filter(|appointment| Some(appointment.id) != exclude)
        .filter(|appointment| {
            let booked = appointment.interval();
            overlaps(candidate.start, candidate.end, booked.start, booked.end)
        })
        .min_by_key(|appointment| appointment.start)
}

/// Checks a candidate against the doctor's hours on its own calendar date and
/// against `existing`, ignoring the appointment named by `exclude`.
pub fn validate_candidate(
    doctor: &Doctor,
    candidate_start: NaiveDateTime,
    duration_minutes: u32,
    existing: &[Appointment],
    exclude: Option<Uuid>,
) -> Result<(), Rejection> {
    let candidate = Interval::from_duration(candidate_start, duration_minutes);
    let date = candidate_start.date();

    if !within_working_hours(candidate.start, candidate.end, &doctor.working_hours, date) {
        return Err(Rejection::OutsideWorkingHours {
            window: doctor.working_hours.window_on(date),
        });
    }

    match find_conflict(candidate, existing, exclude) {
        Some(conflicting) => Err(Rejection::Overlaps(conflicting.id)),
        None => Ok(()),
    }
}
