use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{ClinicError, ClinicResult},
    time::{self, Interval},
};

/// Daily availability window `[start, end)`, applied uniformly to every date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    #[serde(with = "time::hhmm")]
    pub start: NaiveTime,
    #[serde(with = "time::hhmm")]
    pub end: NaiveTime,
}

impl WorkingHours {
    pub fn new(start: NaiveTime, end: NaiveTime) -> ClinicResult<Self> {
        if start >= end {
            return Err(ClinicError::InvalidInput(format!(
                "Working hours must start before they end ({} - {})",
                time::format_hhmm(start),
                time::format_hhmm(end)
            )));
        }
        Ok(Self { start, end })
    }

    /// The concrete window these hours describe on `date`.
    pub fn window_on(&self, date: NaiveDate) -> Interval {
        Interval::new(date.and_time(self.start), date.and_time(self.end))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub specialization: String,
    pub working_hours: WorkingHours,
}

/// The slice of a doctor embedded in appointment listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorSummary {
    pub id: Uuid,
    pub name: String,
    pub specialization: String,
}

impl From<&Doctor> for DoctorSummary {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id,
            name: doctor.name.clone(),
            specialization: doctor.specialization.clone(),
        }
    }
}
