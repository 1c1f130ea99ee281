//! Location check schemas

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::logic::classifier::{LocationSample, Verdict};

#[derive(Debug, Deserialize, Validate)]
pub struct CheckLocationRequest {
    #[validate(required(message = "Missing lat"))]
    pub lat: Option<f64>,

    #[validate(required(message = "Missing long"))]
    pub long: Option<f64>,
}

impl CheckLocationRequest {
    /// Sample for a validated request
    pub fn sample(&self) -> Option<LocationSample> {
        Some(LocationSample {
            lat: self.lat?,
            long: self.long?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CheckLocationResponse {
    pub status: Verdict,
}
