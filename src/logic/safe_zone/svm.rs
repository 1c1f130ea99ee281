//! One-Class SVM (nu formulation, RBF kernel)
//!
//! Thin wrapper over `linfa_svm`. The decision value is
//! `sum(a_i * K(x_i, x)) - rho`; non-negative values are inliers.
//!
//! linfa's Gaussian kernel is `exp(-|x - y|^2 / eps)`, so the configured
//! gamma is passed as `eps = 1 / gamma`.

use linfa::prelude::*;
use linfa_svm::{Svm, SvmError};
use ndarray::{arr1, Array1};

use super::{ModelFitError, TrainingSampleSet};

// ============================================================================
// FITTED BOUNDARY
// ============================================================================

/// Decision surface learned from the training cloud. Immutable once built.
#[derive(Debug, Clone)]
pub struct FittedBoundary {
    model: Svm<f64, bool>,
    gamma: f64,
}

impl FittedBoundary {
    /// Signed distance-like score; `>= 0` means inside the safe zone.
    /// Non-finite input yields NaN, which never counts as inside.
    pub fn decision_value(&self, lat: f64, long: f64) -> f64 {
        self.model.weighted_sum(&point(lat, long)) - self.model.rho
    }

    pub fn contains(&self, lat: f64, long: f64) -> bool {
        self.model.predict(point(lat, long))
    }

    pub fn support_vector_count(&self) -> usize {
        self.model.nsupport()
    }

    pub fn rho(&self) -> f64 {
        self.model.rho
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

#[inline]
fn point(lat: f64, long: f64) -> Array1<f64> {
    arr1(&[lat, long])
}

impl From<SvmError> for ModelFitError {
    fn from(err: SvmError) -> Self {
        ModelFitError::Solver(err.to_string())
    }
}

// ============================================================================
// FIT
// ============================================================================

/// Fit a one-class boundary treating `samples` as the inlier distribution.
///
/// `tightness` is nu, `kernel_scale` is the RBF gamma.
pub fn fit(
    samples: &TrainingSampleSet,
    tightness: f64,
    kernel_scale: f64,
) -> Result<FittedBoundary, ModelFitError> {
    let n = samples.len();
    if n < 2 {
        return Err(ModelFitError::TooFewSamples { count: n });
    }
    if !(tightness > 0.0 && tightness <= 1.0) {
        return Err(ModelFitError::InvalidTightness(tightness));
    }
    if !kernel_scale.is_finite() || kernel_scale <= 0.0 {
        return Err(ModelFitError::InvalidKernelScale(kernel_scale));
    }
    if let Some(index) = samples
        .points()
        .iter()
        .position(|p| !p[0].is_finite() || !p[1].is_finite())
    {
        return Err(ModelFitError::NonFiniteSample { index });
    }

    let dataset = DatasetBase::from(samples.to_array());
    let model: Svm<f64, bool> = Svm::<f64, Pr>::params()
        .nu_weight(tightness)
        .gaussian_kernel(1.0 / kernel_scale)
        .fit(&dataset)
        .map_err(|err: SvmError| ModelFitError::from(err))?;

    tracing::debug!("One-class SVM fit: {}, rho={:.6}", model, model.rho);

    Ok(FittedBoundary {
        model,
        gamma: kernel_scale,
    })
}
