//! Shared test harness: an app over in-memory stores with a recording
//! notifier double.

// Each test binary uses a different subset of these helpers
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use carelink_auth::{InMemoryRevocationStore, TokenConfig};
use carelink_server::models::Category;
use carelink_server::storage::memory::{
    InMemoryAppointmentStore, InMemoryCategoryStore, InMemoryIdentityStore,
};
use carelink_server::{create_app, CareLinkServer};
use email_notify::{Notifier, NotifyError, NotifyResult};
use http_body_util::BodyExt;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

/// Notifier double that records deliveries and can be told to fail.
pub struct RecordingNotifier {
    fail: bool,
    pub sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingNotifier {
    pub fn succeeding() -> Self {
        Self {
            fail: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn deliveries(&self) -> Vec<(String, String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, to: &str, subject: &str, body: &str) -> NotifyResult<String> {
        if self.fail {
            return Err(NotifyError::SendFailed("smtp unreachable".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok("test-message".to_string())
    }
}

pub struct TestContext {
    pub app: Router,
    pub notifier: Arc<RecordingNotifier>,
    pub appointments: Arc<InMemoryAppointmentStore>,
    pub category_id: Uuid,
}

pub fn test_context(notifier: RecordingNotifier) -> TestContext {
    let category_id = Uuid::new_v4();
    let categories = vec![
        Category {
            id: category_id,
            name: "Prenatal Care".to_string(),
            description: "Care during pregnancy".to_string(),
            slug: "prenatal-care".to_string(),
        },
        Category {
            id: Uuid::new_v4(),
            name: "General Consultation".to_string(),
            description: "General health consultation".to_string(),
            slug: "general-consultation".to_string(),
        },
    ];

    let notifier = Arc::new(notifier);
    let appointments = Arc::new(InMemoryAppointmentStore::new());
    let server = CareLinkServer::new(
        Arc::new(InMemoryIdentityStore::new()),
        Arc::new(InMemoryRevocationStore::new()),
        Arc::new(InMemoryCategoryStore::new(categories)),
        appointments.clone(),
        notifier.clone(),
        TokenConfig::new("integration-test-secret"),
    );

    TestContext {
        app: create_app(server),
        notifier,
        appointments,
        category_id,
    }
}

/// POST a JSON body and return status plus parsed response body.
pub async fn post_json(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    post_json_auth(app, uri, body, None).await
}

/// POST a JSON body with an optional bearer token.
pub async fn post_json_auth(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
    bearer: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();

    send(app, request).await
}

/// GET with an optional bearer token.
pub async fn get_auth(
    app: &Router,
    uri: &str,
    bearer: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::empty()).unwrap();

    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// A signup body with sensible defaults.
pub fn signup_body(username: &str, email: &str) -> serde_json::Value {
    serde_json::json!({
        "role": "patient",
        "username": username,
        "email": email,
        "password": "P@ss1234",
        "confirm_password": "P@ss1234",
    })
}

/// A valid booking body against the seeded category.
pub fn booking_body(category_id: Uuid, time: &str) -> serde_json::Value {
    serde_json::json!({
        "category_id": category_id,
        "full_name": "Jane Doe",
        "email": "jane@x.com",
        "phone_number": "555-0100",
        "date": "2025-01-10",
        "time": time,
    })
}
