//! Safe Zone Model - one-class boundary over 2-D coordinates
//!
//! The model is trained exactly once at startup from a synthetic cloud of
//! positions scattered around the configured reference coordinate.
//!
//! # Architecture
//! - `sampling.rs`: `TrainingSampleSet` generation (normal scatter)
//! - `svm.rs`: linfa-svm one-class fit wrapped as `FittedBoundary`
//!
//! # Failure Strategy
//! A boundary that cannot be fit is fatal to startup. There is no fallback.

pub mod sampling;
pub mod svm;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;

pub use sampling::TrainingSampleSet;
pub use svm::{fit, FittedBoundary};

// ============================================================================
// PROFILE
// ============================================================================

/// Parameters of the safe zone, fixed for the process lifetime
#[derive(Debug, Clone, Serialize)]
pub struct SafeZoneProfile {
    pub reference_latitude: f64,
    pub reference_longitude: f64,

    /// Standard deviation of the training cloud on each axis (degrees)
    pub spread: f64,

    /// Fraction of the training cloud allowed outside the boundary (nu)
    pub boundary_tightness: f64,

    /// RBF kernel gamma; larger values give a more local surface
    pub kernel_scale: f64,

    pub sample_count: usize,

    /// Fixed seed for reproducible training; entropy when unset
    pub seed: Option<u64>,
}

impl Default for SafeZoneProfile {
    fn default() -> Self {
        Self {
            reference_latitude: 18.4575,
            reference_longitude: 73.8508,
            spread: 0.01,
            boundary_tightness: 0.05,
            kernel_scale: 100.0,
            sample_count: 500,
            seed: None,
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error, PartialEq)]
pub enum ModelFitError {
    #[error("training needs at least 2 samples, got {count}")]
    TooFewSamples { count: usize },

    #[error("reference coordinate must be finite, got ({lat}, {long})")]
    InvalidReference { lat: f64, long: f64 },

    #[error("spread must be finite and non-negative, got {0}")]
    InvalidSpread(f64),

    #[error("boundary tightness must be in (0, 1], got {0}")]
    InvalidTightness(f64),

    #[error("kernel scale must be finite and positive, got {0}")]
    InvalidKernelScale(f64),

    #[error("training sample {index} is not a finite coordinate")]
    NonFiniteSample { index: usize },

    #[error("one-class solver failed: {0}")]
    Solver(String),
}

// ============================================================================
// TRAINING
// ============================================================================

/// Train the safe zone boundary from the profile.
///
/// Uses `profile.seed` when present so restarts with the same configuration
/// learn the same boundary.
pub fn train(profile: &SafeZoneProfile) -> Result<FittedBoundary, ModelFitError> {
    let mut rng = match profile.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    train_with_rng(profile, &mut rng)
}

/// Train with a caller-supplied random source
pub fn train_with_rng<R: Rng + ?Sized>(
    profile: &SafeZoneProfile,
    rng: &mut R,
) -> Result<FittedBoundary, ModelFitError> {
    let (lat, long) = (profile.reference_latitude, profile.reference_longitude);
    if !lat.is_finite() || !long.is_finite() {
        return Err(ModelFitError::InvalidReference { lat, long });
    }
    if !profile.spread.is_finite() || profile.spread < 0.0 {
        return Err(ModelFitError::InvalidSpread(profile.spread));
    }

    let samples = TrainingSampleSet::generate(
        lat,
        long,
        profile.spread,
        profile.sample_count,
        rng,
    );

    if let Some([c_lat, c_long]) = samples.centroid() {
        tracing::debug!(
            "Generated {} training samples, centroid ({:.5}, {:.5})",
            samples.len(), c_lat, c_long
        );
    }

    fit(&samples, profile.boundary_tightness, profile.kernel_scale)
}
