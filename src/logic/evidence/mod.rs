//! Evidence Capture - panic alert pathway
//!
//! Validates the panic signal, stores the photo, and relays an immediate
//! alert with a map link and the photo link. No cooldown applies.
//!
//! # Failure Strategy
//! Every failure is returned to the caller; nothing is retried.

pub mod data_url;
pub mod storage;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use validator::Validate;

use super::dispatch::{map_link, panic_alert_body, DispatchError, Notifier};
use crate::models::{validation_message, PanicAlertRequest};

pub use data_url::DataUrlError;
pub use storage::EvidenceStore;

// ============================================================================
// TYPES
// ============================================================================

/// Persisted panic evidence. Never mutated after creation.
#[derive(Debug, Clone, Serialize)]
pub struct EvidenceRecord {
    #[serde(skip)]
    pub image_bytes: Vec<u8>,
    pub lat: f64,
    pub long: Option<f64>,
    pub captured_at: DateTime<Utc>,
    pub storage_key: String,
    pub public_url: String,
}

#[derive(Debug, Error)]
pub enum EvidenceError {
    #[error("{0}")]
    Validation(String),

    #[error("invalid image: {0}")]
    InvalidImage(#[from] DataUrlError),

    #[error("failed to store evidence: {0}")]
    Persistence(#[from] std::io::Error),

    #[error("failed to relay panic alert: {0}")]
    Dispatch(#[from] DispatchError),
}

// ============================================================================
// CAPTURE
// ============================================================================

/// Validate, decode and store the panic photo.
///
/// Nothing is written when validation or decoding fails.
pub async fn capture(
    store: &EvidenceStore,
    request: &PanicAlertRequest,
    captured_at: DateTime<Utc>,
) -> Result<EvidenceRecord, EvidenceError> {
    request
        .validate()
        .map_err(|e| EvidenceError::Validation(validation_message(&e)))?;

    let (Some(lat), Some(image)) = (request.latitude, request.image.as_deref()) else {
        return Err(EvidenceError::Validation("Missing GPS or Image".to_string()));
    };

    let decoded = data_url::decode(image)?;
    let storage_key = EvidenceStore::storage_key(captured_at, decoded.extension());
    let path = store.write(&storage_key, &decoded.bytes).await?;

    tracing::info!("Evidence stored: {} ({} bytes)", path.display(), decoded.bytes.len());

    Ok(EvidenceRecord {
        public_url: store.public_url(&storage_key),
        image_bytes: decoded.bytes,
        lat,
        long: request.longitude,
        captured_at,
        storage_key,
    })
}

/// Capture the evidence and relay it immediately with the photo attached
pub async fn capture_panic(
    store: &EvidenceStore,
    notifier: &dyn Notifier,
    request: &PanicAlertRequest,
) -> Result<EvidenceRecord, EvidenceError> {
    let record = capture(store, request, Utc::now()).await?;

    let body = panic_alert_body(&map_link(record.lat, record.long));
    notifier.send(&body, Some(&record.public_url)).await?;

    tracing::info!(
        "Panic alert relayed for {} ({} bytes)",
        record.storage_key, record.image_bytes.len()
    );
    Ok(record)
}
