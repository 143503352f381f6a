use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised synchronously while attaching the engine to a field.
///
/// A failed attach installs no field state.
#[derive(Debug, Error, PartialEq)]
pub enum AttachError {
    #[error("invalid number range: min {min} is greater than max {max}")]
    Configuration { min: Decimal, max: Decimal },
    #[error("no text input found to attach to")]
    MissingField,
}

/// Errors arising while loading options from JSON.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("malformed options: {0}")]
    Json(#[from] serde_json::Error),
    #[error("options must be a JSON object")]
    NotAnObject,
    #[error(transparent)]
    Invalid(#[from] AttachError),
}
