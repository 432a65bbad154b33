//! EDM error types

use crate::{ErrorCode, Location};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// An error carried by a bad model element
///
/// These are collected, never raised: model construction keeps going and the
/// error travels with the element that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdmError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Where the error was detected
    pub location: Option<Location>,
}

impl EdmError {
    /// Create a new error without a location
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            location: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

impl fmt::Display for EdmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(loc) = &self.location {
            write!(f, " at {loc}")?;
        }
        Ok(())
    }
}

/// Main edmlib error type
///
/// Returned by the fail-fast parts of the library: query AST constructors,
/// type factories called with the wrong primitive kind, and the annotation
/// store's reserved namespace check.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EdmlibError {
    /// A primitive-kind-specific operation was called with an unsupported kind
    #[error("EDM0200: {operation} does not accept primitive kind {kind}")]
    UnexpectedPrimitiveKind {
        operation: &'static str,
        kind: String,
    },

    /// Other API misuse
    #[error("{code}: {message}")]
    Contract { code: ErrorCode, message: String },

    /// Malformed query node
    #[error("{code}: {message}")]
    Query {
        code: ErrorCode,
        message: String,
        context: Option<String>,
    },

    /// Annotation value rejected by the store
    #[error("{code}: {message}")]
    InvalidAnnotationValue { code: ErrorCode, message: String },

    /// Errors escalated from bad model elements
    #[error("model contains {} error(s)", .0.len())]
    Model(Vec<EdmError>),

    /// Multiple errors collected
    #[error("Multiple errors: {}", .0.len())]
    Multiple(Vec<EdmlibError>),
}

impl EdmlibError {
    /// Create an unexpected primitive kind error
    pub fn unexpected_primitive_kind(operation: &'static str, kind: impl fmt::Display) -> Self {
        Self::UnexpectedPrimitiveKind {
            operation,
            kind: kind.to_string(),
        }
    }

    /// Create a contract violation
    pub fn contract(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Contract {
            code,
            message: message.into(),
        }
    }

    /// Create a query construction error
    pub fn query(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Query {
            code,
            message: message.into(),
            context: None,
        }
    }

    /// Create a query construction error with context (usually the offending node)
    pub fn query_with_context(
        code: ErrorCode,
        message: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self::Query {
            code,
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create an annotation error
    pub fn invalid_annotation_value(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::InvalidAnnotationValue {
            code,
            message: message.into(),
        }
    }

    /// Escalate the errors carried by bad elements
    pub fn from_model_errors(errors: impl IntoIterator<Item = EdmError>) -> Self {
        Self::Model(errors.into_iter().collect())
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnexpectedPrimitiveKind { .. } => ErrorCode::UNEXPECTED_PRIMITIVE_KIND,
            Self::Contract { code, .. } => *code,
            Self::Query { code, .. } => *code,
            Self::InvalidAnnotationValue { code, .. } => *code,
            Self::Model(errors) => errors.first().map_or(ErrorCode::new(0), |e| e.code),
            Self::Multiple(errors) => errors.first().map_or(ErrorCode::new(0), Self::code),
        }
    }

    /// Check if this error is a programming contract violation
    pub fn is_contract_violation(&self) -> bool {
        self.code().is_contract_violation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edm_error_display() {
        let err = EdmError::new(ErrorCode::BAD_UNRESOLVED_TYPE, "The type 'NS.Missing' could not be found")
            .with_location(Location::source(4, 12));

        let text = err.to_string();
        assert!(text.starts_with("EDM0001"));
        assert!(text.contains("NS.Missing"));
        assert!(text.ends_with("at 4:12"));
    }

    #[test]
    fn test_error_codes() {
        let err = EdmlibError::unexpected_primitive_kind("get_spatial", "Int32");
        assert_eq!(err.code(), ErrorCode::UNEXPECTED_PRIMITIVE_KIND);
        assert!(err.is_contract_violation());
        assert!(err.to_string().contains("get_spatial"));

        let err = EdmlibError::query(ErrorCode::INCOMPATIBLE_TYPE_CAST, "cast failed");
        assert_eq!(err.code(), ErrorCode::INCOMPATIBLE_TYPE_CAST);
        assert!(!err.is_contract_violation());
    }

    #[test]
    fn test_model_escalation_uses_first_code() {
        let err = EdmlibError::from_model_errors([
            EdmError::new(ErrorCode::BAD_UNRESOLVED_TERM, "first"),
            EdmError::new(ErrorCode::BAD_UNRESOLVED_TYPE, "second"),
        ]);
        assert_eq!(err.code(), ErrorCode::BAD_UNRESOLVED_TERM);
        assert_eq!(err.to_string(), "model contains 2 error(s)");
    }

    #[test]
    fn test_edm_error_serializes() {
        let err = EdmError::new(ErrorCode::BAD_UNRESOLVED_TERM, "missing");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], 6);
        assert_eq!(json["message"], "missing");
    }
}
