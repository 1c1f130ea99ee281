//! Location check handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::Utc;
use validator::Validate;

use crate::logic::classifier::Verdict;
use crate::logic::dispatch::danger_alert_body;
use crate::models::{CheckLocationRequest, CheckLocationResponse};
use crate::{AppError, AppResult, AppState};

/// Classify a reported position. A DANGER verdict may trigger one alert per
/// cooldown window; alert failures never change the verdict returned.
pub async fn check_location(
    State(state): State<AppState>,
    payload: Result<Json<CheckLocationRequest>, JsonRejection>,
) -> AppResult<Json<CheckLocationResponse>> {
    let Json(req) = payload?;
    req.validate()?;
    let sample = req
        .sample()
        .ok_or_else(|| AppError::ValidationError("Missing lat or long".to_string()))?;

    let verdict = state.classifier.classify(&sample);
    tracing::debug!("({}, {}) -> {}", sample.lat, sample.long, verdict);

    if verdict == Verdict::Danger {
        let score = state.classifier.decision_value(&sample);

        if state.alert_gate.try_acquire(Utc::now()) {
            let body = danger_alert_body(&sample);
            match state.notifier.send(&body, None).await {
                Ok(()) => tracing::info!(
                    "📲 Danger alert sent for ({}, {}), score={:.4}",
                    sample.lat, sample.long, score
                ),
                Err(e) => tracing::error!(
                    "Danger alert dispatch failed for ({}, {}), score={:.4}: {}",
                    sample.lat, sample.long, score, e
                ),
            }
        } else {
            let last = state.alert_gate.snapshot().last_alert_at;
            tracing::debug!(
                "Danger at ({}, {}), score={:.4}, within cooldown (last alert {:?}), alert suppressed",
                sample.lat, sample.long, score, last
            );
        }
    }

    Ok(Json(CheckLocationResponse { status: verdict }))
}
