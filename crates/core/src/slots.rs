//! # Slot Generator
//!
//! Produces the fixed-length candidate slots inside a doctor's working hours
//! for one date, each marked available unless it overlaps an existing booking.

use chrono::{NaiveDate, NaiveDateTime};

use crate::{
    conflict::overlaps,
    errors::{ClinicError, ClinicResult},
    models::{appointment::Appointment, doctor::WorkingHours, slot::Slot},
    time::{self, DEFAULT_SLOT_MINUTES},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotOptions {
    pub length_minutes: u32,
    /// Drop a trailing slot whose end would pass closing time.
    pub require_full_fit: bool,
}

impl Default for SlotOptions {
    fn default() -> Self {
        Self {
            length_minutes: DEFAULT_SLOT_MINUTES,
            require_full_fit: false,
        }
    }
}

/// Enumerates slot starts `workStart, workStart + step, ...` strictly before
/// `workEnd`, in ascending order.
///
/// With the default options a final slot that runs past closing time is still
/// produced, matching the behavior clients already rely on.
pub fn generate_slots(
    hours: &WorkingHours,
    date: NaiveDate,
    existing: &[Appointment],
    options: SlotOptions,
) -> ClinicResult<Vec<Slot>> {
    if options.length_minutes == 0 {
        return Err(ClinicError::InvalidInput(
            "Slot length must be greater than zero".to_string(),
        ));
    }

    let window = hours.window_on(date);
    let booked: Vec<(NaiveDateTime, NaiveDateTime)> = existing
        .iter()
        .map(|appointment| (appointment.start, appointment.end()))
        .collect();

    let mut slots = Vec::new();
    let mut cursor = window.start;
    while cursor < window.end {
        let slot_end = time::end_of(cursor, options.length_minutes);
        if options.require_full_fit && slot_end > window.end {
            break;
        }

        let available = booked
            .iter()
            .all(|&(start, end)| !overlaps(cursor, slot_end, start, end));

        slots.push(Slot {
            start: cursor.time(),
            available,
        });
        cursor = slot_end;
    }

    Ok(slots)
}
