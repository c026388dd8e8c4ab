use std::sync::Arc;

use axum::http::StatusCode;
use clinic_core::memory::{InMemoryAppointmentRepository, InMemoryDoctorDirectory};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::test_utils::{TestContext, doctor, server_with};

fn booking(ctx: &TestContext, date: &str, duration: Option<u32>) -> Value {
    let mut body = json!({
        "doctorId": ctx.doctor.id,
        "date": date,
        "appointmentType": "Consultation",
        "patientName": "Priya Natarajan",
        "notes": "Allergic to penicillin",
    });
    if let Some(duration) = duration {
        body["duration"] = json!(duration);
    }
    body
}

async fn create(ctx: &TestContext, date: &str, duration: Option<u32>) -> Value {
    let response = ctx
        .server
        .post("/api/appointments")
        .json(&booking(ctx, date, duration))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_create_appointment_defaults_duration() {
    let ctx = TestContext::new();
    let created = create(&ctx, "2024-05-01T10:00:00", None).await;

    assert_eq!(created["date"], "2024-05-01T10:00:00");
    assert_eq!(created["duration"], 30);
    assert_eq!(created["doctorId"], json!(ctx.doctor.id));
    assert_eq!(created["patientName"], "Priya Natarajan");
}

#[tokio::test]
async fn test_create_before_opening_is_outside_working_hours() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/appointments")
        .json(&booking(&ctx, "2024-05-01T08:30:00", Some(30)))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["kind"], "outside_working_hours");
}

#[tokio::test]
async fn test_create_overlapping_is_conflict() {
    let ctx = TestContext::new();
    let first = create(&ctx, "2024-05-01T10:00:00", Some(30)).await;

    let response = ctx
        .server
        .post("/api/appointments")
        .json(&booking(&ctx, "2024-05-01T10:00:00", Some(30)))
        .await;
    response.assert_status(StatusCode::CONFLICT);

    let body: Value = response.json();
    assert_eq!(body["kind"], "overlaps");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains(first["id"].as_str().unwrap()));
}

#[tokio::test]
async fn test_create_for_unknown_doctor_is_not_found() {
    let ctx = TestContext::new();
    let mut body = booking(&ctx, "2024-05-01T10:00:00", None);
    body["doctorId"] = json!(Uuid::new_v4());

    let response = ctx.server.post("/api/appointments").json(&body).await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_with_blank_patient_is_invalid() {
    let ctx = TestContext::new();
    let mut body = booking(&ctx, "2024-05-01T10:00:00", None);
    body["patientName"] = json!("  ");

    let response = ctx.server.post("/api/appointments").json(&body).await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_appointment_embeds_doctor() {
    let ctx = TestContext::new();
    let created = create(&ctx, "2024-05-01T11:00:00", None).await;
    let id = created["id"].as_str().unwrap();

    let response = ctx.server.get(&format!("/api/appointments/{}", id)).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["id"], created["id"]);
    assert_eq!(body["doctor"]["name"], "Dr. Sarah Johnson");
    assert_eq!(body["doctor"]["specialization"], "General Practice");
}

#[tokio::test]
async fn test_list_appointments_is_sorted_by_date() {
    let ctx = TestContext::new();
    create(&ctx, "2024-05-02T09:00:00", None).await;
    create(&ctx, "2024-05-01T15:00:00", None).await;

    let response = ctx.server.get("/api/appointments").await;
    response.assert_status_ok();

    let body: Vec<Value> = response.json();
    let dates: Vec<&str> = body.iter().map(|a| a["date"].as_str().unwrap()).collect();
    assert_eq!(dates, vec!["2024-05-01T15:00:00", "2024-05-02T09:00:00"]);
}

#[tokio::test]
async fn test_update_to_same_time_succeeds() {
    let ctx = TestContext::new();
    let created = create(&ctx, "2024-05-01T10:00:00", None).await;
    let id = created["id"].as_str().unwrap();

    let response = ctx
        .server
        .put(&format!("/api/appointments/{}", id))
        .json(&json!({ "date": "2024-05-01T10:00:00", "duration": 30 }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["date"], "2024-05-01T10:00:00");
}

#[tokio::test]
async fn test_update_onto_other_booking_is_conflict() {
    let ctx = TestContext::new();
    create(&ctx, "2024-05-01T10:00:00", None).await;
    let second = create(&ctx, "2024-05-01T13:00:00", None).await;
    let id = second["id"].as_str().unwrap();

    let response = ctx
        .server
        .put(&format!("/api/appointments/{}", id))
        .json(&json!({ "date": "2024-05-01T09:45:00" }))
        .await;
    response.assert_status(StatusCode::CONFLICT);

    // nothing was written
    let unchanged: Value = ctx.server.get(&format!("/api/appointments/{}", id)).await.json();
    assert_eq!(unchanged["date"], "2024-05-01T13:00:00");
}

#[tokio::test]
async fn test_update_notes_only() {
    let ctx = TestContext::new();
    let created = create(&ctx, "2024-05-01T10:00:00", None).await;
    let id = created["id"].as_str().unwrap();

    let response = ctx
        .server
        .put(&format!("/api/appointments/{}", id))
        .json(&json!({ "notes": "Rescheduled by phone" }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["notes"], "Rescheduled by phone");
    assert_eq!(body["appointmentType"], "Consultation");
}

#[tokio::test]
async fn test_delete_appointment_then_not_found() {
    let ctx = TestContext::new();
    let created = create(&ctx, "2024-05-01T10:00:00", None).await;
    let path = format!("/api/appointments/{}", created["id"].as_str().unwrap());

    let response = ctx.server.delete(&path).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Appointment cancelled successfully");

    ctx.server.delete(&path).await.assert_status(StatusCode::NOT_FOUND);
    ctx.server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_reassigns_doctor_against_new_calendar() {
    let morning = doctor(8, 12);
    let afternoon = doctor(13, 18);
    let server = server_with(
        Arc::new(InMemoryDoctorDirectory::with_doctors([morning.clone(), afternoon.clone()])),
        Arc::new(InMemoryAppointmentRepository::new()),
    );

    let created: Value = server
        .post("/api/appointments")
        .json(&json!({
            "doctorId": morning.id,
            "date": "2024-05-01T09:00:00",
            "appointmentType": "Consultation",
            "patientName": "Priya Natarajan",
        }))
        .await
        .json();
    let path = format!("/api/appointments/{}", created["id"].as_str().unwrap());

    let outside = server
        .put(&path)
        .json(&json!({ "doctorId": afternoon.id }))
        .await;
    outside.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = outside.json();
    assert_eq!(body["kind"], "outside_working_hours");

    let moved = server
        .put(&path)
        .json(&json!({ "doctorId": afternoon.id, "date": "2024-05-01T14:00:00" }))
        .await;
    moved.assert_status_ok();
    let body: Value = moved.json();
    assert_eq!(body["doctorId"], json!(afternoon.id));
    assert_eq!(body["date"], "2024-05-01T14:00:00");
}
