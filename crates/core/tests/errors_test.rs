use std::error::Error;

use chrono::{NaiveDate, NaiveTime};
use rstest::rstest;
use turnero_core::errors::{AdmissionError, TurnoError, TurnoResult};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[test]
fn test_turno_error_display() {
    let not_found = TurnoError::NotFound("Appointment with ID 7 not found".to_string());
    let validation = TurnoError::Validation("Invalid input".to_string());
    let range = TurnoError::InvalidRange("end must be after start".to_string());
    let authentication = TurnoError::Authentication("Invalid password".to_string());
    let authorization = TurnoError::Authorization("Not authorized".to_string());
    let database = TurnoError::Database(eyre::eyre!("Database connection failed"));
    let internal = TurnoError::Internal(Box::new(std::io::Error::other("Internal error")));

    assert_eq!(
        not_found.to_string(),
        "Resource not found: Appointment with ID 7 not found"
    );
    assert_eq!(validation.to_string(), "Validation error: Invalid input");
    assert_eq!(range.to_string(), "Invalid range: end must be after start");
    assert_eq!(
        authentication.to_string(),
        "Authentication error: Invalid password"
    );
    assert_eq!(
        authorization.to_string(),
        "Authorization error: Not authorized"
    );
    assert!(database.to_string().contains("Database error:"));
    assert!(internal.to_string().contains("Internal server error:"));
}

#[test]
fn test_admission_error_display() {
    let blocked = AdmissionError::Blocked {
        date: date(2030, 5, 6),
        reason: Some("Feriado".to_string()),
    };
    assert_eq!(
        blocked.to_string(),
        "the schedule is blocked on 2030-05-06 (Feriado)"
    );

    let unexplained = AdmissionError::Blocked {
        date: date(2030, 5, 6),
        reason: None,
    };
    assert_eq!(unexplained.to_string(), "the schedule is blocked on 2030-05-06");

    let lead = AdmissionError::LeadTime {
        lead_minutes: 30,
        earliest: time(10, 30),
    };
    assert!(lead.to_string().contains("30 minutes notice"));
}

#[rstest]
#[case(AdmissionError::PastDate(date(2020, 1, 1)), "past_date")]
#[case(AdmissionError::LeadTime { lead_minutes: 30, earliest: time(9, 0) }, "lead_time")]
#[case(
    AdmissionError::OutsideBusinessHours {
        start: time(8, 0),
        end: time(8, 30),
        opening: time(9, 0),
        closing: time(22, 0),
    },
    "outside_business_hours"
)]
#[case(AdmissionError::Blocked { date: date(2030, 5, 6), reason: None }, "blocked")]
#[case(AdmissionError::Overlap { appointment_id: Some(3) }, "overlap")]
#[case(
    AdmissionError::WeeklyLimit { customer_id: 1, week_start: date(2030, 5, 6) },
    "weekly_limit"
)]
#[case(AdmissionError::DuplicateFullDayBlock(date(2030, 5, 6)), "duplicate_full_day_block")]
#[case(AdmissionError::OverlappingBlock { block_id: None }, "overlapping_block")]
fn test_admission_codes(#[case] error: AdmissionError, #[case] code: &str) {
    assert_eq!(error.code(), code);
    assert_eq!(TurnoError::from(error).code(), code);
}

#[test]
fn test_admission_wraps_into_turno_error() {
    let error: TurnoError = AdmissionError::Overlap {
        appointment_id: Some(4),
    }
    .into();

    assert!(matches!(
        error,
        TurnoError::Admission(AdmissionError::Overlap {
            appointment_id: Some(4)
        })
    ));
    assert!(error.to_string().starts_with("Booking rejected:"));
}

#[test]
fn test_error_source() {
    let io_error = std::io::Error::other("IO error");
    let turno_error = TurnoError::Internal(Box::new(io_error));

    assert!(turno_error.source().is_some());
    assert!(turno_error.to_string().contains("IO error"));
}

#[test]
fn test_turno_result() {
    let result: TurnoResult<i32> = Ok(42);
    assert_eq!(result.unwrap(), 42);

    let result: TurnoResult<i32> = Err(TurnoError::NotFound("Not found".to_string()));
    assert_eq!(result.unwrap_err().code(), "not_found");
}
