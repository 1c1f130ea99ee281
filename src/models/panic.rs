//! Panic alert schemas

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct PanicAlertRequest {
    #[validate(required(message = "Missing GPS or Image"))]
    pub latitude: Option<f64>,

    pub longitude: Option<f64>,

    /// Data-URL encoded photo
    #[validate(
        required(message = "Missing GPS or Image"),
        length(min = 1, message = "Missing GPS or Image")
    )]
    pub image: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PanicAlertResponse {
    pub status: String,
}

impl PanicAlertResponse {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
        }
    }
}
