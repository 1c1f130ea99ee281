//! Panic alert handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::logic::evidence;
use crate::models::{PanicAlertRequest, PanicAlertResponse};
use crate::{AppResult, AppState};

/// Store the photo and relay the alert immediately. Every failure is
/// returned to the caller.
pub async fn send_panic_alert(
    State(state): State<AppState>,
    payload: Result<Json<PanicAlertRequest>, JsonRejection>,
) -> AppResult<Json<PanicAlertResponse>> {
    tracing::warn!("⚠️ Panic alert triggered");
    let Json(req) = payload?;

    let record = evidence::capture_panic(&state.evidence, state.notifier.as_ref(), &req).await?;
    tracing::info!("Panic alert delivered, evidence at {}", record.public_url);

    Ok(Json(PanicAlertResponse::success()))
}
