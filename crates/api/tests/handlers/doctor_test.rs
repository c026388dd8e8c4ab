use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::test_utils::TestContext;

async fn book(ctx: &TestContext, date: &str, duration: u32) {
    ctx.server
        .post("/api/appointments")
        .json(&json!({
            "doctorId": ctx.doctor.id,
            "date": date,
            "duration": duration,
            "appointmentType": "Checkup",
            "patientName": "Jo Park",
        }))
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_list_doctors_renders_working_hours() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/api/doctors").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body[0]["id"], json!(ctx.doctor.id));
    assert_eq!(body[0]["workingHours"], json!({ "start": "09:00", "end": "17:00" }));
}

#[tokio::test]
async fn test_get_unknown_doctor_is_not_found() {
    let ctx = TestContext::new();

    let response = ctx.server.get(&format!("/api/doctors/{}", Uuid::new_v4())).await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["kind"], "not_found");
}

#[tokio::test]
async fn test_slots_exclude_booked_time() {
    let ctx = TestContext::new();
    book(&ctx, "2024-05-01T10:00:00", 30).await;

    let response = ctx
        .server
        .get(&format!("/api/doctors/{}/slots", ctx.doctor.id))
        .add_query_param("date", "2024-05-01")
        .await;
    response.assert_status_ok();

    let slots: Vec<String> = response.json();
    assert_eq!(slots.len(), 15);
    assert_eq!(slots[0], "09:00");
    assert_eq!(slots.last().map(String::as_str), Some("16:30"));
    assert!(slots.contains(&"09:30".to_string()));
    assert!(slots.contains(&"10:30".to_string()));
    assert!(!slots.contains(&"10:00".to_string()));
}

#[tokio::test]
async fn test_all_slots_carry_availability() {
    let ctx = TestContext::new();
    book(&ctx, "2024-05-01T10:00:00", 60).await;

    let response = ctx
        .server
        .get(&format!("/api/doctors/{}/slots", ctx.doctor.id))
        .add_query_param("date", "2024-05-01")
        .add_query_param("all", true)
        .await;
    response.assert_status_ok();

    let slots: Vec<Value> = response.json();
    assert_eq!(slots.len(), 16);
    assert_eq!(slots[2], json!({ "time": "10:00", "available": false }));
    assert_eq!(slots[3], json!({ "time": "10:30", "available": false }));
    assert_eq!(slots[4], json!({ "time": "11:00", "available": true }));
}

#[tokio::test]
async fn test_slots_with_bad_date_are_invalid_input() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get(&format!("/api/doctors/{}/slots", ctx.doctor.id))
        .add_query_param("date", "01-05-2024")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["kind"], "invalid_input");
}

#[tokio::test]
async fn test_slots_for_unknown_doctor_are_not_found() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get(&format!("/api/doctors/{}/slots", Uuid::new_v4()))
        .add_query_param("date", "2024-05-01")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}
