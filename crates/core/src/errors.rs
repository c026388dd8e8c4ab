use chrono::NaiveDateTime;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Appointment time is outside working hours: {start} to {end}")]
    OutsideWorkingHours {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Time slot is already booked (conflicts with appointment {})", display_conflict(.conflicting_id))]
    Overlaps { conflicting_id: Option<Uuid> },

    #[error("Storage conflict: {0}")]
    Conflict(String),

    #[error("Storage failure: {0}")]
    Storage(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

fn display_conflict(id: &Option<Uuid>) -> String {
    id.map(|id| id.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

impl ClinicError {
    /// Stable machine-readable tag carried next to the message in API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            ClinicError::NotFound(_) => "not_found",
            ClinicError::InvalidInput(_) => "invalid_input",
            ClinicError::OutsideWorkingHours { .. } => "outside_working_hours",
            ClinicError::Overlaps { .. } => "overlaps",
            ClinicError::Conflict(_) => "conflict",
            ClinicError::Storage(_) => "storage_failure",
            ClinicError::Internal(_) => "internal",
        }
    }
}

pub type ClinicResult<T> = Result<T, ClinicError>;
