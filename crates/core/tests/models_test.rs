use chrono::{NaiveDate, NaiveTime, Utc};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{from_str, json, to_value};
use serde_test::{Token, assert_de_tokens_error, assert_tokens};
use turnero_core::models::{
    appointment::{
        Appointment, AppointmentQuery, AppointmentStats, AppointmentStatus, BookingRequest,
        CustomerRef, ServiceRef, UpdateAppointmentRequest,
    },
    block::{CreateBlockRequest, ScheduleBlock},
    service::Service,
    staff::{StaffRole, StaffUser},
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn appointment(
    id: i64,
    customer_id: i64,
    day: NaiveDate,
    status: AppointmentStatus,
) -> Appointment {
    Appointment {
        id,
        customer_id,
        service_id: 1,
        date: day,
        start: time(10, 0),
        end: time(10, 30),
        status,
        notified: false,
        created_at: Utc::now(),
    }
}

#[test]
fn test_service_tokens() {
    let service = Service {
        id: 1,
        name: "Corte".to_string(),
        duration_minutes: 30,
        price: 500_000,
    };

    assert_tokens(
        &service,
        &[
            Token::Struct {
                name: "Service",
                len: 4,
            },
            Token::Str("id"),
            Token::I64(1),
            Token::Str("name"),
            Token::Str("Corte"),
            Token::Str("duration_minutes"),
            Token::I32(30),
            Token::Str("price"),
            Token::I64(500_000),
            Token::StructEnd,
        ],
    );
}

#[rstest]
#[case(AppointmentStatus::Pending, "pending")]
#[case(AppointmentStatus::Confirmed, "confirmed")]
#[case(AppointmentStatus::Cancelled, "cancelled")]
#[case(AppointmentStatus::Completed, "completed")]
#[case(AppointmentStatus::InProgress, "in_progress")]
fn test_status_wire_names(#[case] status: AppointmentStatus, #[case] name: &'static str) {
    assert_tokens(
        &status,
        &[Token::UnitVariant {
            name: "AppointmentStatus",
            variant: name,
        }],
    );
    assert_eq!(status.to_string(), name);
    assert_eq!(name.parse::<AppointmentStatus>().unwrap(), status);
}

#[test]
fn test_unknown_status_is_rejected() {
    assert!("booked".parse::<AppointmentStatus>().is_err());
}

#[rstest]
#[case(AppointmentStatus::Pending, AppointmentStatus::Confirmed, true)]
#[case(AppointmentStatus::Confirmed, AppointmentStatus::InProgress, true)]
#[case(AppointmentStatus::InProgress, AppointmentStatus::Completed, true)]
#[case(AppointmentStatus::Cancelled, AppointmentStatus::Pending, true)]
#[case(AppointmentStatus::Completed, AppointmentStatus::Pending, false)]
#[case(AppointmentStatus::Cancelled, AppointmentStatus::Completed, false)]
fn test_nominal_transitions(
    #[case] from: AppointmentStatus,
    #[case] to: AppointmentStatus,
    #[case] allowed: bool,
) {
    assert_eq!(from.can_transition_to(to), allowed);
}

#[test]
fn test_only_cancelled_frees_the_calendar() {
    for status in AppointmentStatus::ALL {
        assert_eq!(
            status.occupies_calendar(),
            status != AppointmentStatus::Cancelled
        );
    }
    assert!(AppointmentStatus::Pending.is_active());
    assert!(AppointmentStatus::Confirmed.is_active());
    assert!(!AppointmentStatus::InProgress.is_active());
}

#[test]
fn test_appointment_times_serialize_as_hours_and_minutes() {
    let value = to_value(appointment(1, 2, date(2030, 5, 6), AppointmentStatus::Pending)).unwrap();

    assert_eq!(value["date"], json!("2030-05-06"));
    assert_eq!(value["start"], json!("10:00"));
    assert_eq!(value["end"], json!("10:30"));
    assert_eq!(value["status"], json!("pending"));
}

#[test]
fn test_invalid_time_is_rejected() {
    assert_de_tokens_error::<Service>(
        &[
            Token::Struct {
                name: "Service",
                len: 4,
            },
            Token::Str("id"),
            Token::Str("one"),
        ],
        "invalid type: string \"one\", expected i64",
    );

    let result = from_str::<BookingRequest>(
        r#"{"customer_id": 1, "service_id": 1, "date": "2030-05-06", "start": "25:00"}"#,
    );
    assert!(result.is_err());
}

#[test]
fn test_booking_request_with_ids() {
    let request: BookingRequest = from_str(
        r#"{"customer_id": 4, "service_id": 2, "date": "2030-05-06", "start": "10:00"}"#,
    )
    .unwrap();

    assert_eq!(request.customer, CustomerRef::Id { customer_id: 4 });
    assert_eq!(request.service, ServiceRef::Id { service_id: 2 });
    assert_eq!(request.start, time(10, 0));
    assert_eq!(request.end, None);
}

#[test]
fn test_booking_request_with_contact_and_service_name() {
    let request: BookingRequest = from_str(
        r#"{
            "name": "Ana",
            "phone": "+5491100000000",
            "service": "Corte",
            "date": "2030-05-06",
            "start": "10:00:00",
            "end": "11:00"
        }"#,
    )
    .unwrap();

    assert_eq!(
        request.customer,
        CustomerRef::Contact {
            name: "Ana".to_string(),
            phone: "+5491100000000".to_string(),
        }
    );
    assert_eq!(
        request.service,
        ServiceRef::Name {
            service: "Corte".to_string()
        }
    );
    assert_eq!(request.end, Some(time(11, 0)));
}

#[test]
fn test_update_request_detects_moves() {
    let status_only = UpdateAppointmentRequest {
        status: Some(AppointmentStatus::Confirmed),
        ..Default::default()
    };
    let moved = UpdateAppointmentRequest {
        start: Some(time(11, 0)),
        ..Default::default()
    };

    assert!(!status_only.moves_slot());
    assert!(moved.moves_slot());
}

#[test]
fn test_block_request_defaults_to_partial() {
    let request: CreateBlockRequest =
        from_str(r#"{"date": "2030-05-06", "start": "12:00", "end": "13:00"}"#).unwrap();

    assert_eq!(
        request,
        CreateBlockRequest::partial(date(2030, 5, 6), time(12, 0), time(13, 0), None)
    );
}

#[test]
fn test_full_day_block_has_no_interval() {
    let block = ScheduleBlock {
        id: 1,
        date: date(2030, 5, 6),
        is_full_day: true,
        start: Some(time(9, 0)),
        end: Some(time(10, 0)),
        reason: None,
        created_at: Utc::now(),
    };

    assert_eq!(block.interval(), None);
}

#[test]
fn test_query_matching() {
    let day = date(2030, 5, 6);
    let query = AppointmentQuery {
        customer_id: Some(2),
        from: Some(day),
        to: Some(day),
        status: Some(AppointmentStatus::Pending),
        ..Default::default()
    };

    assert!(query.matches(&appointment(1, 2, day, AppointmentStatus::Pending)));
    assert!(!query.matches(&appointment(2, 3, day, AppointmentStatus::Pending)));
    assert!(!query.matches(&appointment(3, 2, date(2030, 5, 7), AppointmentStatus::Pending)));
    assert!(!query.matches(&appointment(4, 2, day, AppointmentStatus::Cancelled)));
}

#[test]
fn test_stats_tally() {
    let day = date(2030, 5, 6);
    let appointments = vec![
        appointment(1, 1, day, AppointmentStatus::Pending),
        appointment(2, 1, day, AppointmentStatus::Pending),
        appointment(3, 2, day, AppointmentStatus::Cancelled),
        appointment(4, 3, day, AppointmentStatus::Completed),
    ];

    let stats = AppointmentStats::tally(&appointments);

    assert_eq!(
        stats,
        AppointmentStats {
            total: 4,
            pending: 2,
            confirmed: 0,
            cancelled: 1,
            completed: 1,
            in_progress: 0,
        }
    );
}

#[test]
fn test_staff_password_hash_is_never_serialized() {
    let user = StaffUser {
        id: 1,
        name: "Carlos".to_string(),
        username: "carlos".to_string(),
        password_hash: "$argon2id$secret".to_string(),
        role: StaffRole::Barber,
        created_at: Utc::now(),
    };

    let value = to_value(&user).unwrap();

    assert_eq!(value["role"], json!("barber"));
    assert!(value.get("password_hash").is_none());
}
