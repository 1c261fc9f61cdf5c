//! End-to-end booking workflow tests against the full router.

mod common;

use axum::http::StatusCode;
use carelink_server::storage::AppointmentStore;
use common::*;
use uuid::Uuid;

#[tokio::test]
async fn valid_booking_is_persisted_and_confirmed() {
    let ctx = test_context(RecordingNotifier::succeeding());

    let (status, body) = post_json(
        &ctx.app,
        "/api/v1/appointments",
        booking_body(ctx.category_id, "10:00"),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["is_confirmed"], true);
    assert_eq!(body["data"]["time"], "10:00");
    assert_eq!(body["data"]["date"], "2025-01-10");

    // Exactly one delivery, to the booker, naming the category
    let deliveries = ctx.notifier.deliveries();
    assert_eq!(deliveries.len(), 1);
    let (to, subject, message) = &deliveries[0];
    assert_eq!(to, "jane@x.com");
    assert_eq!(subject, "Appointment Confirmation");
    assert!(message.contains("Jane Doe"));
    assert!(message.contains("Prenatal Care"));

    // The stored record is confirmed too
    let stored = ctx.appointments.all();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].is_confirmed);
}

#[tokio::test]
async fn first_bookable_slot_is_accepted() {
    let ctx = test_context(RecordingNotifier::succeeding());

    let (status, _) = post_json(
        &ctx.app,
        "/api/v1/appointments",
        booking_body(ctx.category_id, "09:00"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn slot_outside_the_fixed_set_is_rejected_without_side_effects() {
    let ctx = test_context(RecordingNotifier::succeeding());

    let (status, body) = post_json(
        &ctx.app,
        "/api/v1/appointments",
        booking_body(ctx.category_id, "08:00"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "validation_error");
    assert_eq!(body["field"], "time");
    assert!(ctx.appointments.all().is_empty());
    assert!(ctx.notifier.deliveries().is_empty());
}

#[tokio::test]
async fn weak_email_format_is_still_checked() {
    let ctx = test_context(RecordingNotifier::succeeding());

    let mut body = booking_body(ctx.category_id, "10:00");
    body["email"] = "jane-at-x.com".into();
    let (status, response) = post_json(&ctx.app, "/api/v1/appointments", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["field"], "email");
    assert!(ctx.appointments.all().is_empty());
}

#[tokio::test]
async fn unknown_category_is_rejected_without_persistence() {
    let ctx = test_context(RecordingNotifier::succeeding());

    let (status, body) = post_json(
        &ctx.app,
        "/api/v1/appointments",
        booking_body(Uuid::new_v4(), "10:00"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_type"], "not_found");
    assert!(ctx.appointments.all().is_empty());
    assert!(ctx.notifier.deliveries().is_empty());
}

#[tokio::test]
async fn notifier_failure_keeps_the_booking_unconfirmed() {
    let ctx = test_context(RecordingNotifier::failing());

    let (status, body) = post_json(
        &ctx.app,
        "/api/v1/appointments",
        booking_body(ctx.category_id, "10:00"),
    )
    .await;

    // The failure is surfaced to the caller...
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error_type"], "notification_error");

    // ...but the booking itself is durable and retrievable
    let stored = ctx.appointments.all();
    assert_eq!(stored.len(), 1);
    assert!(!stored[0].is_confirmed);
    assert_eq!(stored[0].full_name, "Jane Doe");

    let fetched = ctx
        .appointments
        .find_by_id(stored[0].id)
        .await
        .unwrap()
        .unwrap();
    assert!(!fetched.is_confirmed);

    // The error message names the persisted record
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains(&stored[0].id.to_string()));
}

#[tokio::test]
async fn categories_are_listed_alphabetically() {
    let ctx = test_context(RecordingNotifier::succeeding());

    let (status, body) = get_auth(&ctx.app, "/api/v1/categories", None).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["General Consultation", "Prenatal Care"]);
}

#[tokio::test]
async fn health_endpoints_respond() {
    let ctx = test_context(RecordingNotifier::succeeding());

    let (status, body) = get_auth(&ctx.app, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = get_auth(&ctx.app, "/version", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "carelink-server");
}
