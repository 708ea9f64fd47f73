use axum::{body::to_bytes, http::StatusCode};
use rstest::rstest;
use serde_json::Value;
use turnero_api::middleware::{auth, error_handling::map_error};
use turnero_core::{
    errors::{AdmissionError, TurnoError},
    models::staff::{NewStaffUser, StaffRole},
    store::{DirectoryStore, memory::MemoryStore},
};

fn io_error() -> TurnoError {
    TurnoError::Internal(Box::new(std::io::Error::other("disk on fire")))
}

fn holiday_taken() -> TurnoError {
    AdmissionError::DuplicateFullDayBlock(chrono::NaiveDate::from_ymd_opt(2030, 5, 6).unwrap())
        .into()
}

#[rstest]
#[case(
    TurnoError::NotFound("Appointment with ID 1 not found".to_string()),
    StatusCode::NOT_FOUND,
    "not_found"
)]
#[case(
    TurnoError::Validation("Invalid input".to_string()),
    StatusCode::BAD_REQUEST,
    "validation"
)]
#[case(
    TurnoError::InvalidRange("end before start".to_string()),
    StatusCode::BAD_REQUEST,
    "invalid_range"
)]
#[case(
    TurnoError::Authentication("Invalid password".to_string()),
    StatusCode::UNAUTHORIZED,
    "authentication"
)]
#[case(
    TurnoError::Authorization("Not authorized".to_string()),
    StatusCode::FORBIDDEN,
    "authorization"
)]
#[case(
    TurnoError::Database(eyre::eyre!("Database error")),
    StatusCode::INTERNAL_SERVER_ERROR,
    "database"
)]
#[case(io_error(), StatusCode::INTERNAL_SERVER_ERROR, "internal")]
#[case(
    AdmissionError::Overlap { appointment_id: Some(1) }.into(),
    StatusCode::CONFLICT,
    "overlap"
)]
#[case(holiday_taken(), StatusCode::CONFLICT, "duplicate_full_day_block")]
#[tokio::test]
async fn test_error_mapping(
    #[case] error: TurnoError,
    #[case] status: StatusCode,
    #[case] code: &str,
) {
    let response = map_error(error);
    assert_eq!(response.status(), status);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["code"], code);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_server_errors_hide_details() {
    let response = map_error(TurnoError::Database(eyre::eyre!("password=hunter2")));

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(!body.contains("hunter2"));
}

#[test]
fn test_password_hashing() {
    let password = "tijeras123";

    let hashed = auth::hash_password(password).unwrap();

    assert_ne!(hashed, password);
    assert!(hashed.starts_with("$argon2"));
    assert!(auth::verify_password(password, &hashed).unwrap());
    assert!(!auth::verify_password("wrong_password", &hashed).unwrap());
    // salted, so hashing twice differs
    assert_ne!(hashed, auth::hash_password(password).unwrap());
}

#[test]
fn test_malformed_hash_is_an_error() {
    assert!(auth::verify_password("anything", "not-a-phc-string").is_err());
}

#[test_log::test(tokio::test)]
async fn test_authenticate_staff() {
    let store = MemoryStore::new();
    store
        .create_staff(&NewStaffUser {
            name: "Carlos".to_string(),
            username: "carlos".to_string(),
            password_hash: auth::hash_password("navaja").unwrap(),
            role: StaffRole::Barber,
        })
        .await
        .unwrap();

    let user = auth::authenticate(&store, "carlos", "navaja").await.unwrap();
    assert_eq!(user.role, StaffRole::Barber);

    let wrong = auth::authenticate(&store, "carlos", "tijera").await.unwrap_err();
    let unknown = auth::authenticate(&store, "nadie", "navaja").await.unwrap_err();
    assert_eq!(wrong.to_string(), unknown.to_string());
    assert!(matches!(wrong, TurnoError::Authentication(_)));
}
