//! Error types for HostedControlPlane extraction
//!
//! Absence of a field is never an error. Only values that are present with a
//! shape the snapshot cannot hold, or documents that cannot be decoded at all,
//! surface here.

use thiserror::Error;

/// Errors from extracting a `HostedControlPlane` snapshot
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HcpError {
    /// A present field has a value of the wrong shape
    #[error("malformed field {field}: expected {expected}, found {found}")]
    MalformedField {
        /// Dotted path of the offending field (e.g., "spec.tolerations[2].effect")
        field: String,
        /// Shape the extractor needs
        expected: &'static str,
        /// Shape or value actually present
        found: String,
    },

    /// The document root is not a mapping
    #[error("document root must be an object, found {found}")]
    NotAnObject {
        /// JSON kind of the root value
        found: &'static str,
    },

    /// A dynamic object of some other kind was handed to the extractor
    #[error("unexpected kind {kind}, expected HostedControlPlane")]
    UnexpectedKind {
        /// Kind carried by the object's type metadata
        kind: String,
    },

    /// The serialized document could not be decoded
    #[error("decode error: {message}")]
    Decode {
        /// Description of what failed
        message: String,
    },
}

impl HcpError {
    /// Create a malformed field error
    pub fn malformed(
        field: impl Into<String>,
        expected: &'static str,
        found: impl Into<String>,
    ) -> Self {
        Self::MalformedField {
            field: field.into(),
            expected,
            found: found.into(),
        }
    }

    /// Create a decode error with the given message
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode {
            message: msg.into(),
        }
    }

    /// Get the field path if this error is tied to a specific field
    pub fn field(&self) -> Option<&str> {
        match self {
            HcpError::MalformedField { field, .. } => Some(field),
            _ => None,
        }
    }
}
