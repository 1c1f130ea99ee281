//! Safe Zone Guard Server
//!
//! Classifies reported positions against a learned safe zone and relays
//! danger and panic alerts to a single recipient.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      SAFE ZONE GUARD                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  POST /check_location          POST /send_panic_alert       │
//! │        │                              │                     │
//! │        ▼                              ▼                     │
//! │  ┌────────────┐               ┌──────────────────┐         │
//! │  │ Classifier │               │ Evidence Capture │         │
//! │  │ (1-class   │               │ (decode + store) │         │
//! │  │  SVM)      │               └────────┬─────────┘         │
//! │  └─────┬──────┘                        │                    │
//! │        │ DANGER                        │ always             │
//! │        ▼                               │                    │
//! │  ┌────────────┐                        │                    │
//! │  │ Alert Gate │                        │                    │
//! │  │ (cooldown) │                        │                    │
//! │  └─────┬──────┘                        │                    │
//! │        └──────────────┬────────────────┘                    │
//! │                       ▼                                     │
//! │                ┌─────────────┐                              │
//! │                │   Twilio    │                              │
//! │                └─────────────┘                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod logic;
mod models;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use logic::classifier::LocationClassifier;
use logic::cooldown::AlertGate;
use logic::dispatch::{Notifier, TwilioConfig, TwilioNotifier};
use logic::evidence::{storage::PUBLIC_PREFIX, EvidenceStore};
use logic::safe_zone;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env first so RUST_LOG from it applies
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "safe_zone_guard=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env();

    tracing::info!("Safe Zone Guard starting...");

    // Train the safe zone model; no traffic without it
    let profile = config.safe_zone_profile();
    tracing::info!(
        "Training safe zone model around ({}, {}) with {} samples",
        profile.reference_latitude, profile.reference_longitude, profile.sample_count
    );
    let boundary = safe_zone::train(&profile).context("Failed to fit safe zone model")?;
    tracing::info!(
        "✅ Safe zone model trained: {} support vectors, rho={:.6}, gamma={}",
        boundary.support_vector_count(), boundary.rho(), boundary.gamma()
    );

    let notifier = TwilioNotifier::new(TwilioConfig::from_app_config(&config))
        .context("Failed to create notification client")?;

    tokio::fs::create_dir_all(&config.evidence_dir)
        .await
        .with_context(|| format!("Failed to create evidence dir {}", config.evidence_dir.display()))?;

    let state = AppState {
        classifier: LocationClassifier::new(boundary),
        alert_gate: Arc::new(AlertGate::new(config.alert_cooldown_secs)),
        notifier: Arc::new(notifier),
        evidence: EvidenceStore::new(&config.evidence_dir, &config.public_base_url),
        config: config.clone(),
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    pub classifier: LocationClassifier,
    pub alert_gate: Arc<AlertGate>,
    pub notifier: Arc<dyn Notifier>,
    pub evidence: EvidenceStore,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let evidence_files = ServeDir::new(state.evidence.dir());
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/check_location", post(handlers::location::check_location))
        .route("/send_panic_alert", post(handlers::panic::send_panic_alert))
        // Evidence images, so alert links resolve
        .nest_service(PUBLIC_PREFIX, evidence_files)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
