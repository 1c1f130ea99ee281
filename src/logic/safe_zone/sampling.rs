//! Synthetic training cloud

use ndarray::Array2;
use rand::Rng;

/// Ordered `(lat, long)` pairs used only while fitting
#[derive(Debug, Clone, Default)]
pub struct TrainingSampleSet {
    points: Vec<[f64; 2]>,
}

impl TrainingSampleSet {
    /// Wrap a pre-generated set of positions
    pub fn from_points(points: Vec<[f64; 2]>) -> Self {
        Self { points }
    }

    /// Scatter `count` positions normally around `(lat, long)` with standard
    /// deviation `spread` on each axis independently.
    pub fn generate<R: Rng + ?Sized>(
        lat: f64,
        long: f64,
        spread: f64,
        count: usize,
        rng: &mut R,
    ) -> Self {
        let points = (0..count)
            .map(|_| {
                [
                    lat + spread * standard_normal(rng),
                    long + spread * standard_normal(rng),
                ]
            })
            .collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    /// Samples as an `n x 2` matrix
    pub fn to_array(&self) -> Array2<f64> {
        let mut array = Array2::zeros((self.points.len(), 2));
        for (i, [lat, long]) in self.points.iter().enumerate() {
            array[[i, 0]] = *lat;
            array[[i, 1]] = *long;
        }
        array
    }

    /// Arithmetic mean of the cloud, `None` when empty
    pub fn centroid(&self) -> Option<[f64; 2]> {
        if self.points.is_empty() {
            return None;
        }
        let n = self.points.len() as f64;
        let (lat_sum, long_sum) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(a, b), [lat, long]| (a + lat, b + long));
        Some([lat_sum / n, long_sum / n])
    }
}

/// Box-Muller draw from N(0, 1)
fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // u1 stays above zero so ln() is finite
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}
