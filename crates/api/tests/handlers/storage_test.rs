use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{NaiveDate, NaiveTime, Utc};
use clinic_core::{errors::ClinicError, models::appointment::Appointment};
use clinic_db::mock::repositories::{MockAppointmentRepo, MockDoctorRepo};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::test_utils::{doctor, server_with};

#[tokio::test]
async fn test_repository_failure_surfaces_as_storage_failure() {
    let mut doctors = MockDoctorRepo::new();
    doctors.expect_list().returning(|| Ok(vec![]));

    let mut appointments = MockAppointmentRepo::new();
    appointments
        .expect_list()
        .times(1)
        .returning(|| Err(ClinicError::Storage(eyre::eyre!("connection refused"))));

    let server = server_with(Arc::new(doctors), Arc::new(appointments));
    let response = server.get("/api/appointments").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json();
    assert_eq!(body["kind"], "storage_failure");
}

#[tokio::test]
async fn test_readiness_reports_unavailable_directory() {
    let mut doctors = MockDoctorRepo::new();
    doctors
        .expect_list()
        .returning(|| Err(ClinicError::Storage(eyre::eyre!("timeout"))));

    let server = server_with(Arc::new(doctors), Arc::new(MockAppointmentRepo::new()));
    server
        .get("/health/ready")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_exclusion_violation_is_reported_as_overlap() {
    let doctor = doctor(9, 17);
    let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let midnight = day.and_time(NaiveTime::MIN);

    // Booked by another process after our read
    let winner = Appointment {
        id: Uuid::new_v4(),
        doctor_id: doctor.id,
        start: day.and_hms_opt(10, 0, 0).unwrap(),
        duration_minutes: 30,
        appointment_type: "Consultation".to_string(),
        patient_name: "Other Patient".to_string(),
        notes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let mut doctors = MockDoctorRepo::new();
    let found = doctor.clone();
    doctors
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));

    let mut appointments = MockAppointmentRepo::new();
    appointments
        .expect_find_by_doctor_and_range()
        .withf(move |_, from, _| *from == midnight)
        .returning(|_, _, _| Ok(vec![]));
    let raced = winner.clone();
    appointments
        .expect_find_by_doctor_and_range()
        .withf(move |_, from, _| *from != midnight)
        .returning(move |_, _, _| Ok(vec![raced.clone()]));
    appointments.expect_insert().times(1).returning(|_| {
        Err(ClinicError::Conflict(
            "conflicting key value violates exclusion constraint".to_string(),
        ))
    });

    let server = server_with(Arc::new(doctors), Arc::new(appointments));
    let response = server
        .post("/api/appointments")
        .json(&json!({
            "doctorId": doctor.id,
            "date": "2024-05-01T10:00:00",
            "appointmentType": "Consultation",
            "patientName": "Late Patient",
        }))
        .await;
    response.assert_status(StatusCode::CONFLICT);

    let body: Value = response.json();
    assert_eq!(body["kind"], "overlaps");
    assert!(body["error"].as_str().unwrap().contains(&winner.id.to_string()));
}
