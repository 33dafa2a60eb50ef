//! Validation error types

use std::fmt;

use super::DocType;

/// Maximum length for free-text fields (names, cities, states)
pub const MAX_TEXT_LEN: usize = 255;

/// Validation error for domain models
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// String doesn't match required format
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Invalid enum variant
    InvalidVariant { field: &'static str, value: String },

    /// Document digits fail the checksum for the declared type
    InvalidDocument { doc_type: DocType },

    /// Two fields must be supplied together
    Unpaired { field: &'static str, requires: &'static str },

    /// Numeric field below its minimum
    BelowMinimum { field: &'static str, min: i64 },

    /// Area value is negative, NaN or infinite
    InvalidArea { field: &'static str },

    /// Arable plus vegetation area exceeds the farm's total area
    AreaExceeded { total: f64, arable: f64, vegetation: f64 },

    /// Referenced row does not exist
    UnknownReference { field: &'static str },

    /// Request body or query string could not be decoded
    Malformed { message: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
            Self::InvalidVariant { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
            Self::InvalidDocument { doc_type } => {
                write!(f, "document is not a valid {}", doc_type.as_str())
            }
            Self::Unpaired { field, requires } => {
                write!(f, "{} and {} must be sent together", field, requires)
            }
            Self::BelowMinimum { field, min } => {
                write!(f, "{} must be greater than or equal to {}", field, min)
            }
            Self::InvalidArea { field } => {
                write!(f, "{} must be a finite, non-negative number of hectares", field)
            }
            Self::AreaExceeded {
                total,
                arable,
                vegetation,
            } => write!(
                f,
                "the sum of arable area ({}) and vegetation area ({}) cannot exceed the total area ({})",
                arable, vegetation, total
            ),
            Self::UnknownReference { field } => {
                write!(f, "{} references a record that does not exist", field)
            }
            Self::Malformed { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Trim and check a required text field.
pub fn required_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if trimmed.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_TEXT_LEN,
        });
    }
    Ok(trimmed.to_owned())
}

/// Like [`required_text`], but `None` passes through untouched.
pub fn optional_text(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<String>, ValidationError> {
    value.map(|v| required_text(field, v)).transpose()
}

/// Blank filter strings mean "no filter".
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}
