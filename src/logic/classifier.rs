//! Location Classifier
//!
//! Maps a reported position through the fitted safe zone boundary.
//! Stateless; the boundary is shared read-only across requests.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::safe_zone::FittedBoundary;

/// One reported position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    pub lat: f64,
    pub long: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Safe,
    Danger,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Safe => "SAFE",
            Verdict::Danger => "DANGER",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inside the boundary is SAFE, anything else (including non-finite
/// coordinates) is DANGER.
pub fn classify(boundary: &FittedBoundary, sample: &LocationSample) -> Verdict {
    if boundary.contains(sample.lat, sample.long) {
        Verdict::Safe
    } else {
        Verdict::Danger
    }
}

/// Classifier handle owning the process-wide boundary
#[derive(Debug, Clone)]
pub struct LocationClassifier {
    boundary: Arc<FittedBoundary>,
}

impl LocationClassifier {
    pub fn new(boundary: FittedBoundary) -> Self {
        Self {
            boundary: Arc::new(boundary),
        }
    }

    pub fn classify(&self, sample: &LocationSample) -> Verdict {
        classify(&self.boundary, sample)
    }

    pub fn decision_value(&self, sample: &LocationSample) -> f64 {
        self.boundary.decision_value(sample.lat, sample.long)
    }

    pub fn boundary(&self) -> &FittedBoundary {
        &self.boundary
    }
}
