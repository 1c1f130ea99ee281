//! Notification Dispatcher
//!
//! Sends text or text+media alerts to the single configured recipient.
//!
//! # Failure Strategy
//! One attempt per event, bounded by the provider timeout. Callers decide
//! whether a failure is swallowed (danger alerts) or surfaced (panic alerts).

pub mod twilio;

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use super::classifier::LocationSample;

pub use twilio::{TwilioConfig, TwilioNotifier};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("notification provider timed out")]
    Timeout,

    #[error("notification provider unreachable: {0}")]
    Network(String),

    #[error("notification provider rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

impl From<reqwest::Error> for DispatchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DispatchError::Timeout
        } else {
            DispatchError::Network(err.to_string())
        }
    }
}

// ============================================================================
// NOTIFIER
// ============================================================================

pub type DispatchFuture<'a> = Pin<Box<dyn Future<Output = Result<(), DispatchError>> + Send + 'a>>;

/// External messaging channel
pub trait Notifier: Send + Sync {
    fn send<'a>(&'a self, body: &'a str, media_url: Option<&'a str>) -> DispatchFuture<'a>;
}

// ============================================================================
// MESSAGES
// ============================================================================

pub fn map_link(lat: f64, long: Option<f64>) -> String {
    match long {
        Some(long) => format!("https://maps.google.com/?q={},{}", lat, long),
        None => format!("https://maps.google.com/?q={}", lat),
    }
}

pub fn danger_alert_body(sample: &LocationSample) -> String {
    format!(
        "🚨 *AI SECURITY ALERT* 🚨\nUser is outside the Safe Zone!\n📍 Location: {}, {}\n🗺️ {}",
        sample.lat,
        sample.long,
        map_link(sample.lat, Some(sample.long))
    )
}

pub fn panic_alert_body(map_link: &str) -> String {
    format!(
        "🚨 *PANIC ALERT* 🚨\n\nI need help!\n📍 *Location:* {}\n(Photo evidence attached)",
        map_link
    )
}

// ============================================================================
// TEST DOUBLES
// ============================================================================
