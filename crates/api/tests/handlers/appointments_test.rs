use std::sync::Arc;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use turnero_core::{
    config::CalendarConfig,
    errors::TurnoError,
    models::{
        appointment::{Appointment, AppointmentStatus, AvailabilityResponse, StatsResponse},
        block::SlotsResponse,
    },
    store::memory::MemoryStore,
};
use turnero_db::mock::MockCalendarRepo;

use crate::test_utils::{DAY, TestContext, server};

async fn book(ctx: &TestContext, body: Value) -> axum_test::TestResponse {
    ctx.server.post("/api/appointments").json(&body).await
}

#[tokio::test]
async fn test_book_and_fetch_appointment() {
    let ctx = TestContext::new();
    let haircut = ctx.service("Corte", 30).await;
    let ana = ctx.customer("Ana", "+5491100000001").await;

    let response = book(
        &ctx,
        json!({ "customer_id": ana.id, "service_id": haircut.id, "date": DAY, "start": "10:00" }),
    )
    .await;
    response.assert_status(StatusCode::CREATED);
    let created: Appointment = response.json();
    assert_eq!(created.status, AppointmentStatus::Pending);

    let fetched: Appointment = ctx
        .server
        .get(&format!("/api/appointments/{}", created.id))
        .await
        .json();
    assert_eq!(fetched, created);

    let body: Value = ctx
        .server
        .get(&format!("/api/appointments/{}", created.id))
        .await
        .json();
    assert_eq!(body["start"], "10:00");
    assert_eq!(body["end"], "10:30");
}

#[tokio::test]
async fn test_overlapping_booking_conflicts() {
    let ctx = TestContext::new();
    let haircut = ctx.service("Corte", 30).await;
    let ana = ctx.customer("Ana", "+5491100000001").await;
    let beto = ctx.customer("Beto", "+5491100000002").await;

    book(
        &ctx,
        json!({ "customer_id": ana.id, "service_id": haircut.id, "date": DAY, "start": "10:00" }),
    )
    .await
    .assert_status(StatusCode::CREATED);

    let response = book(
        &ctx,
        json!({
            "customer_id": beto.id,
            "service_id": haircut.id,
            "date": DAY,
            "start": "10:15",
            "end": "10:45"
        }),
    )
    .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["code"], "overlap");
}

#[tokio::test]
async fn test_booking_by_contact_and_service_name() {
    let ctx = TestContext::new();
    ctx.service("Corte", 30).await;

    let response = book(
        &ctx,
        json!({
            "name": "Ana",
            "phone": "+5491100000009",
            "service": "Corte",
            "date": DAY,
            "start": "11:00"
        }),
    )
    .await;
    response.assert_status(StatusCode::CREATED);

    let customers: Vec<Value> = ctx.server.get("/api/customers").await.json();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0]["phone"], "+5491100000009");
}

#[tokio::test]
async fn test_booking_unknown_service_is_not_found() {
    let ctx = TestContext::new();
    let ana = ctx.customer("Ana", "+5491100000001").await;

    let response = book(
        &ctx,
        json!({ "customer_id": ana.id, "service": "Tintura", "date": DAY, "start": "10:00" }),
    )
    .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_availability_reports_the_failed_rule() {
    let ctx = TestContext::new();
    let haircut = ctx.service("Corte", 30).await;
    let ana = ctx.customer("Ana", "+5491100000001").await;
    book(
        &ctx,
        json!({ "customer_id": ana.id, "service_id": haircut.id, "date": DAY, "start": "10:00" }),
    )
    .await;

    let taken: AvailabilityResponse = ctx
        .server
        .get("/api/appointments/availability")
        .add_query_param("date", DAY)
        .add_query_param("start", "10:15")
        .add_query_param("end", "10:45")
        .await
        .json();
    assert!(!taken.available);
    assert_eq!(taken.reason.as_deref(), Some("overlap"));

    let touching: AvailabilityResponse = ctx
        .server
        .get("/api/appointments/availability")
        .add_query_param("date", DAY)
        .add_query_param("start", "10:30")
        .add_query_param("end", "11:00")
        .await
        .json();
    assert!(touching.available);
    assert_eq!(touching.reason, None);

    let early: AvailabilityResponse = ctx
        .server
        .get("/api/appointments/availability")
        .add_query_param("date", DAY)
        .add_query_param("start", "07:00")
        .add_query_param("end", "07:30")
        .await
        .json();
    assert_eq!(early.reason.as_deref(), Some("outside_business_hours"));

    ctx.server
        .get("/api/appointments/availability")
        .add_query_param("date", DAY)
        .add_query_param("start", "11:00")
        .add_query_param("end", "10:00")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_slots_include_the_days_blocks() {
    let ctx = TestContext::new();

    ctx.server
        .post("/api/blocks")
        .json(&json!({ "date": DAY, "start": "12:00", "end": "13:00", "reason": "Almuerzo" }))
        .await
        .assert_status(StatusCode::CREATED);

    let slots: SlotsResponse = ctx
        .server
        .get("/api/appointments/slots")
        .add_query_param("date", DAY)
        .await
        .json();

    assert_eq!(slots.slots.len(), 24);
    assert_eq!(slots.slots.first().map(String::as_str), Some("09:00"));
    assert!(!slots.slots.iter().any(|s| s == "12:00" || s == "12:30"));
    assert_eq!(slots.blocks.len(), 1);
    assert_eq!(slots.blocks[0].reason.as_deref(), Some("Almuerzo"));
}

#[tokio::test]
async fn test_status_changes_and_cancellation_frees_slot() {
    let ctx = TestContext::new();
    let haircut = ctx.service("Corte", 30).await;
    let ana = ctx.customer("Ana", "+5491100000001").await;

    let created: Appointment = book(
        &ctx,
        json!({ "customer_id": ana.id, "service_id": haircut.id, "date": DAY, "start": "10:00" }),
    )
    .await
    .json();

    let confirmed: Appointment = ctx
        .server
        .put(&format!("/api/appointments/{}/status", created.id))
        .json(&json!({ "status": "confirmed" }))
        .await
        .json();
    assert_eq!(confirmed.status, AppointmentStatus::Confirmed);

    ctx.server
        .put(&format!("/api/appointments/{}/status", created.id))
        .json(&json!({ "status": "booked" }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    ctx.server
        .put(&format!("/api/appointments/{}/status", created.id))
        .json(&json!({ "status": "cancelled" }))
        .await
        .assert_status_ok();

    let slots: SlotsResponse = ctx
        .server
        .get("/api/appointments/slots")
        .add_query_param("date", DAY)
        .await
        .json();
    assert!(slots.slots.contains(&"10:00".to_string()));
}

#[tokio::test]
async fn test_update_and_delete_appointment() {
    let ctx = TestContext::new();
    let haircut = ctx.service("Corte", 30).await;
    let ana = ctx.customer("Ana", "+5491100000001").await;

    let created: Appointment = book(
        &ctx,
        json!({ "customer_id": ana.id, "service_id": haircut.id, "date": DAY, "start": "10:00" }),
    )
    .await
    .json();
    let path = format!("/api/appointments/{}", created.id);

    let moved: Appointment = ctx
        .server
        .put(&path)
        .json(&json!({ "start": "15:00", "end": "15:30" }))
        .await
        .json();
    assert_eq!(moved.start, crate::test_utils::time(15, 0));

    ctx.server.delete(&path).await.assert_status(StatusCode::NO_CONTENT);
    ctx.server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
    ctx.server.delete(&path).await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_agendas_stats_and_notifications() {
    let ctx = TestContext::new();
    let haircut = ctx.service("Corte", 30).await;
    let ana = ctx.customer("Ana", "+5491100000001").await;

    let bookings = [
        ("2030-05-06", "10:00"),
        (DAY, "10:00"),
        (DAY, "11:00"),
        ("2030-05-13", "10:00"),
    ];
    for (day, start) in bookings {
        book(
            &ctx,
            json!({ "customer_id": ana.id, "service_id": haircut.id, "date": day, "start": start }),
        )
        .await
        .assert_status(StatusCode::CREATED);
    }

    let day: Vec<Appointment> = ctx
        .server
        .get(&format!("/api/appointments/day/{DAY}"))
        .await
        .json();
    assert_eq!(day.len(), 2);
    let week: Vec<Appointment> = ctx
        .server
        .get(&format!("/api/appointments/week/{DAY}"))
        .await
        .json();
    assert_eq!(week.len(), 3);

    let stats: StatsResponse = ctx
        .server
        .get("/api/appointments/stats")
        .add_query_param("from", "2030-05-06")
        .add_query_param("to", "2030-05-12")
        .await
        .json();
    assert_eq!(stats.stats.total, 3);
    assert_eq!(stats.stats.pending, 3);

    ctx.server
        .get("/api/appointments/stats")
        .add_query_param("from", "2030-05-12")
        .add_query_param("to", "2030-05-06")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let filtered: Vec<Appointment> = ctx
        .server
        .get("/api/appointments")
        .add_query_param("from", DAY)
        .add_query_param("to", DAY)
        .add_query_param("limit", 1)
        .await
        .json();
    assert_eq!(filtered.len(), 1);

    let unnotified: Vec<Appointment> = ctx.server.get("/api/appointments/unnotified").await.json();
    assert_eq!(unnotified.len(), 4);
    let marked: Value = ctx.server.put("/api/appointments/notified").await.json();
    assert_eq!(marked["marked"], 4);
    let unnotified: Vec<Appointment> = ctx.server.get("/api/appointments/unnotified").await.json();
    assert!(unnotified.is_empty());
}

#[tokio::test]
async fn test_weekly_limit_over_http() {
    let ctx = TestContext::with_config(CalendarConfig {
        enforce_weekly_limit: true,
        ..CalendarConfig::default()
    });
    let haircut = ctx.service("Corte", 30).await;
    let ana = ctx.customer("Ana", "+5491100000001").await;

    book(
        &ctx,
        json!({ "customer_id": ana.id, "service_id": haircut.id, "date": DAY, "start": "10:00" }),
    )
    .await
    .assert_status(StatusCode::CREATED);

    let response = book(
        &ctx,
        json!({
            "customer_id": ana.id,
            "service_id": haircut.id,
            "date": "2030-05-10",
            "start": "10:00"
        }),
    )
    .await;
    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["code"], "weekly_limit");
}

#[tokio::test]
async fn test_store_failure_is_a_server_error() {
    let mut calendar = MockCalendarRepo::new();
    calendar
        .expect_find_blocks()
        .returning(|_| Err(TurnoError::Database(eyre::eyre!("connection refused"))));
    calendar.expect_find_appointments().never();

    let server = server(
        CalendarConfig::default(),
        Arc::new(calendar),
        Arc::new(MemoryStore::new()),
    );

    let response = server
        .get("/api/appointments/slots")
        .add_query_param("date", DAY)
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["code"], "database");
}
