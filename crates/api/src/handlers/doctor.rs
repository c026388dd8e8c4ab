//! # Doctor Handlers
//!
//! Read-only doctor endpoints and the slot availability query.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use clinic_core::{models::doctor::Doctor, time};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

/// Query parameters for the slot endpoint
#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,

    /// Return every slot with its availability instead of only the free ones
    #[serde(default)]
    pub all: bool,
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Doctor>>, AppError> {
    Ok(Json(state.scheduler.list_doctors().await?))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Doctor>, AppError> {
    Ok(Json(state.scheduler.get_doctor(id).await?))
}

/// Slots of a doctor on a date
///
/// # Endpoint
///
/// ```text
/// GET /api/doctors/:id/slots?date=2024-05-01          -> ["09:00", "09:30", ...]
/// GET /api/doctors/:id/slots?date=2024-05-01&all=true -> [{"time": "09:00", "available": true}, ...]
/// ```
///
/// # Errors
///
/// * `ClinicError::NotFound` - Unknown doctor
/// * `ClinicError::InvalidInput` - Unparsable date
#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<SlotQuery>,
) -> Result<Response, AppError> {
    if query.all {
        let slots = state.scheduler.slots_for(id, &query.date).await?;
        return Ok(Json(slots).into_response());
    }

    let times: Vec<String> = state
        .scheduler
        .available_slots(id, &query.date)
        .await?
        .into_iter()
        .map(|slot| time::format_hhmm(slot.start))
        .collect();

    Ok(Json(times).into_response())
}
