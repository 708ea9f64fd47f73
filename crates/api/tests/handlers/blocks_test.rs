use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use turnero_core::models::block::{ScheduleBlock, SlotsResponse};

use crate::test_utils::{DAY, TestContext};

#[tokio::test]
async fn test_full_day_block_closes_the_day() {
    let ctx = TestContext::new();

    let created: ScheduleBlock = ctx
        .server
        .post("/api/blocks")
        .json(&json!({ "date": DAY, "is_full_day": true, "reason": "Feriado" }))
        .await
        .json();
    assert!(created.is_full_day);

    let slots: SlotsResponse = ctx
        .server
        .get("/api/appointments/slots")
        .add_query_param("date", DAY)
        .await
        .json();
    assert!(slots.slots.is_empty());
    assert_eq!(slots.blocks, vec![created]);

    let duplicate = ctx
        .server
        .post("/api/blocks")
        .json(&json!({ "date": DAY, "is_full_day": true }))
        .await;
    duplicate.assert_status(StatusCode::CONFLICT);
    let body: Value = duplicate.json();
    assert_eq!(body["code"], "duplicate_full_day_block");
}

#[tokio::test]
async fn test_overlapping_partial_block_conflicts() {
    let ctx = TestContext::new();

    ctx.server
        .post("/api/blocks")
        .json(&json!({ "date": DAY, "start": "12:00", "end": "13:00" }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = ctx
        .server
        .post("/api/blocks")
        .json(&json!({ "date": DAY, "start": "12:30", "end": "12:45" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["code"], "overlapping_block");
}

#[tokio::test]
async fn test_partial_block_needs_times() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/blocks")
        .json(&json!({ "date": DAY, "start": "12:00" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "invalid_range");
}

#[tokio::test]
async fn test_list_and_delete_blocks() {
    let ctx = TestContext::new();

    let lunch: ScheduleBlock = ctx
        .server
        .post("/api/blocks")
        .json(&json!({ "date": DAY, "start": "12:00", "end": "13:00" }))
        .await
        .json();
    ctx.server
        .post("/api/blocks")
        .json(&json!({ "date": "2030-06-01", "is_full_day": true }))
        .await
        .assert_status(StatusCode::CREATED);

    let all: Vec<ScheduleBlock> = ctx.server.get("/api/blocks").await.json();
    assert_eq!(all.len(), 2);

    let may: Vec<ScheduleBlock> = ctx
        .server
        .get("/api/blocks")
        .add_query_param("from", "2030-05-01")
        .add_query_param("to", "2030-05-31")
        .await
        .json();
    assert_eq!(may, vec![lunch.clone()]);

    let on_day: Vec<ScheduleBlock> = ctx
        .server
        .get(&format!("/api/blocks/date/{DAY}"))
        .await
        .json();
    assert_eq!(on_day.len(), 1);

    ctx.server
        .delete(&format!("/api/blocks/{}", lunch.id))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    ctx.server
        .delete(&format!("/api/blocks/{}", lunch.id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
