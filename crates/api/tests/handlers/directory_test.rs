use std::sync::Arc;

use axum::http::StatusCode;
use fake::{Fake, faker::name::en::Name};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use turnero_core::{
    config::CalendarConfig,
    models::{
        appointment::{WeeklyCancelResponse, WeeklyCheckResponse},
        customer::Customer,
        service::Service,
        staff::{LoginResponse, StaffRole, StaffUser},
    },
    store::memory::MemoryStore,
};
use turnero_db::mock::MockDirectoryRepo;

use crate::test_utils::{DAY, TestContext, server};

#[tokio::test]
async fn test_customer_crud() {
    let ctx = TestContext::new();
    let name: String = Name().fake();

    let created: Customer = ctx
        .server
        .post("/api/customers")
        .json(&json!({ "name": name, "phone": " +5491100000001 " }))
        .await
        .json();
    assert_eq!(created.phone, "+5491100000001");

    let path = format!("/api/customers/{}", created.id);
    let renamed: Customer = ctx
        .server
        .put(&path)
        .json(&json!({ "name": "Ana María" }))
        .await
        .json();
    assert_eq!(renamed.name, "Ana María");
    assert_eq!(renamed.phone, created.phone);

    ctx.server
        .post("/api/customers")
        .json(&json!({ "name": "", "phone": "123" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    ctx.server.delete(&path).await.assert_status(StatusCode::NO_CONTENT);
    ctx.server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_weekly_check_and_cancel() {
    let ctx = TestContext::with_config(CalendarConfig {
        enforce_weekly_limit: true,
        ..CalendarConfig::default()
    });
    let haircut = ctx.service("Corte", 30).await;
    let ana = ctx.customer("Ana", "+5491100000001").await;

    ctx.server
        .post("/api/appointments")
        .json(&json!({
            "customer_id": ana.id,
            "service_id": haircut.id,
            "date": DAY,
            "start": "10:00"
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let check: WeeklyCheckResponse = ctx
        .server
        .get(&format!("/api/customers/{}/week/2030-05-12", ana.id))
        .await
        .json();
    assert!(check.has_appointment);

    let cancelled: WeeklyCancelResponse = ctx
        .server
        .post(&format!("/api/customers/{}/week/{DAY}/cancel", ana.id))
        .await
        .json();
    assert_eq!(cancelled.cancelled, 1);

    ctx.server
        .post("/api/appointments")
        .json(&json!({
            "customer_id": ana.id,
            "service_id": haircut.id,
            "date": "2030-05-10",
            "start": "10:00"
        }))
        .await
        .assert_status(StatusCode::CREATED);

    ctx.server
        .post(&format!("/api/customers/999/week/{DAY}/cancel"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_service_validation_and_lookup() {
    let ctx = TestContext::new();

    let created: Service = ctx
        .server
        .post("/api/services")
        .json(&json!({ "name": "Barba", "duration_minutes": 20, "price": 300000 }))
        .await
        .json();

    ctx.server
        .post("/api/services")
        .json(&json!({ "name": "Gratis", "duration_minutes": 0, "price": 0 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    ctx.server
        .put(&format!("/api/services/{}", created.id))
        .json(&json!({ "price": -1 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let services: Vec<Service> = ctx.server.get("/api/services").await.json();
    assert_eq!(services, vec![created]);
}

#[tokio::test]
async fn test_referenced_service_cannot_be_deleted() {
    let ctx = TestContext::new();
    let haircut = ctx.service("Corte", 30).await;
    let ana = ctx.customer("Ana", "+5491100000001").await;

    ctx.server
        .post("/api/appointments")
        .json(&json!({
            "customer_id": ana.id,
            "service_id": haircut.id,
            "date": DAY,
            "start": "10:00"
        }))
        .await
        .assert_status(StatusCode::CREATED);

    ctx.server
        .delete(&format!("/api/services/{}", haircut.id))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_staff_signup_and_login() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/staff")
        .json(&json!({
            "name": "Carlos",
            "username": "carlos",
            "password": "navaja",
            "role": "admin"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert!(body.get("password_hash").is_none());
    let created: StaffUser = serde_json::from_value(body).unwrap();
    assert_eq!(created.role, StaffRole::Admin);

    let login: LoginResponse = ctx
        .server
        .post("/api/auth/login")
        .json(&json!({ "username": "carlos", "password": "navaja" }))
        .await
        .json();
    assert_eq!(login.user.id, created.id);

    let denied = ctx
        .server
        .post("/api/auth/login")
        .json(&json!({ "username": "carlos", "password": "tijera" }))
        .await;
    denied.assert_status(StatusCode::UNAUTHORIZED);

    let updated: StaffUser = ctx
        .server
        .put(&format!("/api/staff/{}", created.id))
        .json(&json!({ "role": "barber" }))
        .await
        .json();
    assert_eq!(updated.role, StaffRole::Barber);

    ctx.server
        .delete(&format!("/api/staff/{}", created.id))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    ctx.server
        .post("/api/auth/login")
        .json(&json!({ "username": "carlos", "password": "navaja" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_customer_is_not_found() {
    let mut directory = MockDirectoryRepo::new();
    directory
        .expect_get_customer()
        .with(eq(42))
        .times(1)
        .returning(|_| Ok(None));

    let server = server(
        CalendarConfig::default(),
        Arc::new(MemoryStore::new()),
        Arc::new(directory),
    );

    let response = server.get("/api/customers/42").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn test_health_reports_calendar_rules() {
    let ctx = TestContext::new();

    let health: Value = ctx.server.get("/health").await.json();

    assert_eq!(health["status"], "ok");
    assert_eq!(health["opening"], "09:00");
    assert_eq!(health["closing"], "22:00");
    assert_eq!(health["slot_minutes"], 30);
}
