//! Inline image payloads (`data:<mime>;base64,<payload>`)

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DataUrlError {
    #[error("image payload has no ',' separator")]
    MissingSeparator,

    #[error("image payload is not valid base64: {0}")]
    InvalidBase64(String),

    #[error("image payload is empty")]
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl DecodedImage {
    /// File extension for the stored evidence
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_deref() {
            Some("image/png") => "png",
            Some("image/gif") => "gif",
            Some("image/webp") => "webp",
            _ => "jpg",
        }
    }
}

/// Decode a data URL. Everything before the first comma is treated as the
/// header; the remainder must be standard base64.
pub fn decode(data_url: &str) -> Result<DecodedImage, DataUrlError> {
    let (header, payload) = data_url
        .split_once(',')
        .ok_or(DataUrlError::MissingSeparator)?;

    let mime_type = header
        .trim()
        .strip_prefix("data:")
        .unwrap_or(header)
        .split(';')
        .next()
        .map(|m| m.trim().to_ascii_lowercase())
        .filter(|m| !m.is_empty());

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| DataUrlError::InvalidBase64(e.to_string()))?;

    if bytes.is_empty() {
        return Err(DataUrlError::Empty);
    }

    Ok(DecodedImage { mime_type, bytes })
}
