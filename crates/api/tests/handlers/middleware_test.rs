use axum::http::StatusCode;
use chrono::NaiveDate;
use clinic_api::middleware::error_handling::{AppError, map_error};
use clinic_core::errors::ClinicError;
use rstest::rstest;
use uuid::Uuid;

fn outside_hours() -> ClinicError {
    let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    ClinicError::OutsideWorkingHours {
        start: day.and_hms_opt(9, 0, 0).unwrap(),
        end: day.and_hms_opt(17, 0, 0).unwrap(),
    }
}

#[rstest]
#[case(ClinicError::NotFound("Doctor".to_string()), StatusCode::NOT_FOUND)]
#[case(ClinicError::InvalidInput("date".to_string()), StatusCode::BAD_REQUEST)]
#[case(outside_hours(), StatusCode::BAD_REQUEST)]
#[case(ClinicError::Overlaps { conflicting_id: Some(Uuid::new_v4()) }, StatusCode::CONFLICT)]
#[case(ClinicError::Conflict("exclusion".to_string()), StatusCode::CONFLICT)]
#[case(ClinicError::Storage(eyre::eyre!("connection reset")), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_error_status_mapping(#[case] error: ClinicError, #[case] expected: StatusCode) {
    let response = map_error(error);
    assert_eq!(response.status(), expected);
}

#[test]
fn test_eyre_report_becomes_storage_failure() {
    let error = AppError::from(eyre::eyre!("pool exhausted"));
    assert!(matches!(error.0, ClinicError::Storage(_)));
    assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
