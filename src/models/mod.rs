//! Request / response schemas

pub mod location;
pub mod panic;

pub use location::*;
pub use panic::*;

use validator::ValidationErrors;

/// First failing field's message, fields in name order
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("Invalid field: {}", field),
            })
        })
        .next()
        .unwrap_or_else(|| "Invalid request".to_string())
}
