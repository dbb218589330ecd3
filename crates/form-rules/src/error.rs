// File: src/error.rs
// Purpose: Configuration errors raised while building rules, and validation failures

use thiserror::Error;

/// A field description that can never produce working validators
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("unknown pattern key `{0}`")]
    UnknownPatternKey(String),

    #[error("unknown special check `{0}`")]
    UnknownSpecialKey(String),

    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{field} lower bound {lower} is greater than upper bound {upper}")]
    InvertedInterval {
        field: &'static str,
        lower: String,
        upper: String,
    },

    #[error("{field} bounds must be numbers")]
    InvalidBound { field: &'static str },

    #[error("field `{field}`: {source}")]
    Field {
        field: String,
        #[source]
        source: Box<RuleError>,
    },
}

impl RuleError {
    /// Attach the name of the form field this error came from
    pub fn in_field(self, field: impl Into<String>) -> Self {
        RuleError::Field {
            field: field.into(),
            source: Box::new(self),
        }
    }
}

/// A value rejected by a validator; displays as the user-facing message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationFailure {
    pub message: String,
}

impl ValidationFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
