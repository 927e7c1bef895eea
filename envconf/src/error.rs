//! Error types for the envconf library.
//!
//! Filling and validation report failures differently. The filler stops at
//! the first value it cannot coerce and returns [`Error::FieldCoercion`].
//! The validator walks the whole record and returns every violation at once
//! as [`Error::Validation`], wrapping a [`ValidationErrors`] collection.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Result type alias for operations that may fail with an envconf error.
///
/// # Examples
///
/// ```
/// use envconf::{Error, Result};
///
/// fn example_operation() -> Result<u16> {
///     Ok(8080)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the envconf library.
#[derive(Debug, Error)]
pub enum Error {
    /// No configuration was passed to the validator.
    #[error("configuration cannot be nil")]
    ConfigNil,

    /// The configuration was an optional record that is not set.
    #[error("configuration pointer cannot be nil")]
    ConfigPointerNil,

    /// The configuration is not a record.
    #[error("configuration must be a struct, got {kind}")]
    ConfigNotStruct {
        /// The shape that was passed instead.
        kind: &'static str,
    },

    /// A raw value could not be converted into its field's type.
    #[error("cannot set field '{field}' from {key}={value:?}: {reason}")]
    FieldCoercion {
        /// The declared field name.
        field: String,
        /// The environment key the value came from.
        key: String,
        /// The raw value.
        value: String,
        /// Why the conversion failed.
        reason: String,
    },

    /// One or more fields violate their declared constraints.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// A `.env` buffer has invalid syntax.
    ///
    /// Only the byte index is kept so that secrets on the offending line
    /// never end up in logs.
    #[error("failed to parse .env input at position {index}")]
    DotenvParse {
        /// Byte index of the parse failure within the line.
        index: usize,
    },

    /// Any other `.env` failure reported by dotenvy.
    #[error("failed to load .env input: {0}")]
    Dotenv(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the aggregated violations if this is a validation failure.
    #[must_use]
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<dotenvy::Error> for Error {
    fn from(err: dotenvy::Error) -> Self {
        match err {
            dotenvy::Error::LineParse(_, index) => Self::DotenvParse { index },
            dotenvy::Error::Io(io_err) => Self::Io(io_err),
            other => Self::Dotenv(other.to_string()),
        }
    }
}

/// A single constraint violation.
///
/// # Examples
///
/// ```
/// use envconf::ValidationError;
///
/// let err = ValidationError::new("database.host", "field 'database.host' is required");
/// assert_eq!(
///     err.to_string(),
///     "validation error for field 'database.host': field 'database.host' is required"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Dotted, lowercase path from the root record to the field.
    pub field: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl ValidationError {
    /// Creates a new violation for `field`.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "validation error for field '{}': {}",
            self.field, self.message
        )
    }
}

impl std::error::Error for ValidationError {}

/// Every violation found during one validation pass, in traversal order.
///
/// An empty collection means the record is valid; the validator never
/// returns one as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// Creates an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a violation.
    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    /// Appends every violation from `other`, keeping their order.
    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// Number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no violation was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the violations in traversal order.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    /// The field paths of all violations, in order. A path appears once per
    /// violation, so a field failing two checks is listed twice.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.field.as_str()).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("no validation errors");
        }

        write!(f, "validation failed with {} error(s): ", self.0.len())?;
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self(errors)
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
