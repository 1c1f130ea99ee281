//! Configuration module

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::logic::safe_zone::SafeZoneProfile;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Reference coordinate of the safe zone
    pub safe_zone_lat: f64,
    pub safe_zone_long: f64,

    /// Minimum seconds between two dispatched danger alerts
    pub alert_cooldown_secs: i64,

    /// Synthetic training cloud
    pub training_sample_count: usize,
    pub training_spread: f64,
    pub training_seed: Option<u64>,

    /// One-class boundary parameters (nu and RBF gamma)
    pub boundary_tightness: f64,
    pub kernel_scale: f64,

    /// Messaging provider credentials and addresses
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_from: String,
    pub alert_recipient: String,
    pub twilio_api_base: String,

    /// Provider call timeout in seconds
    pub dispatch_timeout_secs: u64,

    /// Directory holding panic evidence images
    pub evidence_dir: PathBuf,

    /// Externally resolvable base URL used to build evidence links
    pub public_base_url: String,

    /// Maximum accepted request body size
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        let port = 5000;
        Self {
            port,
            safe_zone_lat: 18.4575,
            safe_zone_long: 73.8508,
            alert_cooldown_secs: 60,
            training_sample_count: 500,
            training_spread: 0.01,
            training_seed: None,
            boundary_tightness: 0.05,
            kernel_scale: 100.0,
            twilio_account_sid: "sid".to_string(),
            twilio_auth_token: "auth_token".to_string(),
            twilio_from: "whatsapp:+14155238886".to_string(),
            alert_recipient: "whatsapp:+910000000000".to_string(),
            twilio_api_base: "https://api.twilio.com".to_string(),
            dispatch_timeout_secs: 10,
            evidence_dir: PathBuf::from("static"),
            public_base_url: format!("http://localhost:{}", port),
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// `Config::default()` for anything unset or unparsable
    pub fn from_env() -> Self {
        let d = Self::default();
        let port = parse_var("PORT", d.port);

        Self {
            port,

            safe_zone_lat: parse_var("SAFE_ZONE_LAT", d.safe_zone_lat),
            safe_zone_long: parse_var("SAFE_ZONE_LONG", d.safe_zone_long),

            alert_cooldown_secs: parse_non_negative("ALERT_COOLDOWN_SECS", d.alert_cooldown_secs),

            training_sample_count: parse_var("TRAINING_SAMPLE_COUNT", d.training_sample_count),
            training_spread: parse_var("TRAINING_SPREAD", d.training_spread),
            training_seed: env::var("TRAINING_SEED").ok().and_then(|s| s.trim().parse().ok()),

            boundary_tightness: parse_var("BOUNDARY_TIGHTNESS", d.boundary_tightness),
            kernel_scale: parse_var("KERNEL_SCALE", d.kernel_scale),

            twilio_account_sid: env::var("TWILIO_ACCOUNT_SID").unwrap_or(d.twilio_account_sid),
            twilio_auth_token: env::var("TWILIO_AUTH_TOKEN").unwrap_or(d.twilio_auth_token),
            twilio_from: env::var("TWILIO_FROM").unwrap_or(d.twilio_from),
            alert_recipient: env::var("ALERT_RECIPIENT").unwrap_or(d.alert_recipient),
            twilio_api_base: env::var("TWILIO_API_BASE").unwrap_or(d.twilio_api_base),

            dispatch_timeout_secs: parse_var("DISPATCH_TIMEOUT_SECS", d.dispatch_timeout_secs),

            evidence_dir: env::var("EVIDENCE_DIR")
                .map(PathBuf::from)
                .unwrap_or(d.evidence_dir),

            public_base_url: env::var("PUBLIC_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| format!("http://localhost:{}", port)),

            max_body_bytes: parse_var("MAX_BODY_BYTES", d.max_body_bytes),
        }
    }

    /// Safe zone profile used for the startup training run
    pub fn safe_zone_profile(&self) -> SafeZoneProfile {
        SafeZoneProfile {
            reference_latitude: self.safe_zone_lat,
            reference_longitude: self.safe_zone_long,
            spread: self.training_spread,
            boundary_tightness: self.boundary_tightness,
            kernel_scale: self.kernel_scale,
            sample_count: self.training_sample_count,
            seed: self.training_seed,
        }
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_non_negative(key: &str, default: i64) -> i64 {
    let value = parse_var(key, default);
    if value < 0 {
        tracing::warn!("{}={} is negative, using {}", key, value, default);
        return default;
    }
    value
}
