use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::config::Config;
use crate::logic::classifier::LocationClassifier;
use crate::logic::cooldown::AlertGate;
use crate::logic::dispatch::testing::RecordingNotifier;
use crate::logic::evidence::EvidenceStore;
use crate::logic::safe_zone::{train, SafeZoneProfile};
use crate::{create_router, AppState};

const JPEG: &str = "data:image/jpeg;base64,/9j/4AAQSkZJRgABAQ==";

struct Harness {
    app: Router,
    notifier: Arc<RecordingNotifier>,
    evidence_dir: tempfile::TempDir,
}

fn harness_with(notifier: RecordingNotifier) -> Harness {
    let evidence_dir = tempfile::tempdir().unwrap();
    let config = Config {
        evidence_dir: evidence_dir.path().to_path_buf(),
        public_base_url: "https://guard.example.com".to_string(),
        ..Default::default()
    };
    let profile = SafeZoneProfile {
        seed: Some(77),
        ..config.safe_zone_profile()
    };
    let notifier = Arc::new(notifier);

    let state = AppState {
        classifier: LocationClassifier::new(train(&profile).unwrap()),
        alert_gate: Arc::new(AlertGate::new(config.alert_cooldown_secs)),
        notifier: notifier.clone(),
        evidence: EvidenceStore::new(&config.evidence_dir, &config.public_base_url),
        config,
    };

    Harness {
        app: create_router(state),
        notifier,
        evidence_dir,
    }
}

fn harness() -> Harness {
    harness_with(RecordingNotifier::default())
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(app, uri, body.to_string()).await
}

async fn post_raw(app: &Router, uri: &str, body: String) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// Captures formatted log output for the current thread
#[derive(Clone, Default)]
struct LogBuffer(Arc<parking_lot::Mutex<Vec<u8>>>);

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl LogBuffer {
    fn lines_containing(&self, needle: &str) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock())
            .lines()
            .filter(|line| line.contains(needle))
            .map(str::to_string)
            .collect()
    }
}

fn evidence_files(h: &Harness) -> Vec<std::path::PathBuf> {
    std::fs::read_dir(h.evidence_dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect()
}

// ============================================================================
// CHECK LOCATION
// ============================================================================

#[tokio::test]
async fn test_safe_then_danger_then_suppressed() {
    let h = harness();

    let (status, body) =
        post_json(&h.app, "/check_location", json!({ "lat": 18.4575, "long": 73.8508 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "SAFE" }));
    assert_eq!(h.notifier.count(), 0);

    let (status, body) = post_json(&h.app, "/check_location", json!({ "lat": 19.0, "long": 74.5 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "DANGER" }));
    assert_eq!(h.notifier.count(), 1);
    assert!(h.notifier.sent()[0].media_url.is_none());

    // Still inside the 60s window
    let (status, body) = post_json(&h.app, "/check_location", json!({ "lat": 19.0, "long": 74.5 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "DANGER" }));
    assert_eq!(h.notifier.count(), 1);
}

#[tokio::test]
async fn test_dispatch_failure_keeps_danger_verdict() {
    let h = harness_with(RecordingNotifier::failing());

    let (status, body) = post_json(&h.app, "/check_location", json!({ "lat": 28.4575, "long": 73.8508 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "DANGER" }));
    assert_eq!(h.notifier.count(), 1);
}

#[tokio::test]
async fn test_every_danger_log_carries_score() {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let h = harness_with(RecordingNotifier::failing());
    let danger = json!({ "lat": 19.0, "long": 74.5 });

    // Dispatch fails, then the second one is suppressed by the cooldown
    post_json(&h.app, "/check_location", danger.clone()).await;
    post_json(&h.app, "/check_location", danger).await;

    let failed = logs.lines_containing("dispatch failed");
    assert_eq!(failed.len(), 1);
    assert!(failed[0].contains("score="));

    let suppressed = logs.lines_containing("alert suppressed");
    assert_eq!(suppressed.len(), 1);
    assert!(suppressed[0].contains("score="));
}

#[tokio::test]
async fn test_check_location_missing_field_is_400() {
    let h = harness();

    let (status, body) = post_json(&h.app, "/check_location", json!({ "lat": 18.4575 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Missing long");
}

#[tokio::test]
async fn test_check_location_non_numeric_is_400() {
    let h = harness();

    let (status, body) =
        post_json(&h.app, "/check_location", json!({ "lat": "north", "long": 73.8508 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(h.notifier.count(), 0);
}

#[tokio::test]
async fn test_concurrent_danger_dispatches_once() {
    let h = harness();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let app = h.app.clone();
            tokio::spawn(async move {
                post_json(&app, "/check_location", json!({ "lat": 19.0, "long": 74.5 })).await
            })
        })
        .collect();

    for handle in handles {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "DANGER");
    }
    assert_eq!(h.notifier.count(), 1);
}

// ============================================================================
// PANIC ALERT
// ============================================================================

#[tokio::test]
async fn test_panic_missing_image_is_400_without_side_effects() {
    let h = harness();

    let (status, body) = post_json(
        &h.app,
        "/send_panic_alert",
        json!({ "latitude": 18.4575, "longitude": 73.8508 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "status": "error", "message": "Missing GPS or Image" }));
    assert_eq!(h.notifier.count(), 0);
    assert!(evidence_files(&h).is_empty());
}

#[tokio::test]
async fn test_panic_missing_latitude_is_400() {
    let h = harness();

    let (status, body) = post_json(
        &h.app,
        "/send_panic_alert",
        json!({ "longitude": 73.8508, "image": JPEG }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(h.notifier.count(), 0);
    assert!(evidence_files(&h).is_empty());
}

#[tokio::test]
async fn test_panic_success_persists_and_dispatches() {
    let h = harness();

    let (status, body) = post_json(
        &h.app,
        "/send_panic_alert",
        json!({ "latitude": 18.4575, "longitude": 73.8508, "image": JPEG }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "success" }));

    let files = evidence_files(&h);
    assert_eq!(files.len(), 1);
    let expected: [u8; 13] = [0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10, 0x4a, 0x46, 0x49, 0x46, 0x00, 0x01, 0x01];
    assert_eq!(std::fs::read(&files[0]).unwrap(), expected);

    let sent = h.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body.contains("https://maps.google.com/?q=18.4575,73.8508"));

    let file_name = files[0].file_name().unwrap().to_string_lossy().to_string();
    assert_eq!(
        sent[0].media_url.as_deref(),
        Some(format!("https://guard.example.com/static/{}", file_name).as_str())
    );
}

#[tokio::test]
async fn test_panic_ignores_cooldown() {
    let h = harness();
    let payload = json!({ "latitude": 18.4575, "longitude": 73.8508, "image": JPEG });

    post_json(&h.app, "/check_location", json!({ "lat": 19.0, "long": 74.5 })).await;
    let (first, _) = post_json(&h.app, "/send_panic_alert", payload.clone()).await;
    let (second, _) = post_json(&h.app, "/send_panic_alert", payload).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(h.notifier.count(), 3);
    assert_eq!(evidence_files(&h).len(), 2);
}

#[tokio::test]
async fn test_panic_dispatch_failure_is_500() {
    let h = harness_with(RecordingNotifier::failing());

    let (status, body) = post_json(
        &h.app,
        "/send_panic_alert",
        json!({ "latitude": 18.4575, "longitude": 73.8508, "image": JPEG }),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("Failed to send alert"));
}

#[tokio::test]
async fn test_panic_malformed_image_is_400() {
    let h = harness();

    let (status, body) = post_json(
        &h.app,
        "/send_panic_alert",
        json!({ "latitude": 18.4575, "longitude": 73.8508, "image": "data:image/jpeg;base64,%%%" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(h.notifier.count(), 0);
    assert!(evidence_files(&h).is_empty());
}

#[tokio::test]
async fn test_panic_invalid_json_is_400() {
    let h = harness();

    let (status, body) = post_raw(&h.app, "/send_panic_alert", "{not json".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

// ============================================================================
// PLUMBING
// ============================================================================

#[tokio::test]
async fn test_stored_evidence_is_served() {
    let h = harness();

    post_json(
        &h.app,
        "/send_panic_alert",
        json!({ "latitude": 18.4575, "longitude": 73.8508, "image": JPEG }),
    )
    .await;
    let media_url = h.notifier.sent()[0].media_url.clone().unwrap();
    let path = media_url.trim_start_matches("https://guard.example.com");

    let response = h
        .app
        .clone()
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..3], &[0xff, 0xd8, 0xff]);
}

#[tokio::test]
async fn test_health() {
    let h = harness();

    let response = h
        .app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
    assert!(body["support_vectors"].as_u64().unwrap() > 0);
}
