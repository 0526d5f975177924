//! Validation error types

use std::fmt;

/// Validation error for domain models
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Collection has more elements than one statement can carry
    TooMany { field: &'static str, max: usize },

    /// Request body could not be decoded
    Malformed { reason: String },

    /// A batch element failed validation
    Item {
        index: usize,
        source: Box<ValidationError>,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} is required", field),
            Self::TooMany { field, max } => {
                write!(f, "{} exceeds maximum of {} items", field, max)
            }
            Self::Malformed { reason } => write!(f, "malformed body: {}", reason),
            Self::Item { index, source } => write!(f, "item {}: {}", index, source),
        }
    }
}

impl std::error::Error for ValidationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Item { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
