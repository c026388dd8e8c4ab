use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use clinic_core::models::appointment::{
    Appointment, AppointmentDetails, CancelAppointmentResponse, CreateAppointmentRequest,
    UpdateAppointmentRequest,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<AppointmentDetails>>, AppError> {
    Ok(Json(state.scheduler.list_appointments().await?))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<AppointmentDetails>, AppError> {
    Ok(Json(state.scheduler.get_appointment(id).await?))
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let appointment = state.scheduler.book(payload).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAppointmentRequest>,
) -> Result<Json<Appointment>, AppError> {
    Ok(Json(state.scheduler.update(id, payload).await?))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CancelAppointmentResponse>, AppError> {
    state.scheduler.cancel(id).await?;

    Ok(Json(CancelAppointmentResponse {
        message: "Appointment cancelled successfully".to_string(),
    }))
}
