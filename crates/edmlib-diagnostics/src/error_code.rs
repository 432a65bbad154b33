//! EDM error codes following a structured numbering system
//!
//! Error code ranges:
//! - EDM0001-EDM0099: Model errors (carried by bad elements, never raised)
//! - EDM0100-EDM0199: Query errors (AST construction)
//! - EDM0200-EDM0299: Contract violations (misuse of the API)
//! - EDM0300-EDM0399: Annotation errors

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    // Model errors
    pub const BAD_UNRESOLVED_TYPE: Self = Self(1);
    pub const BAD_UNRESOLVED_ENTITY_TYPE: Self = Self(2);
    pub const BAD_UNRESOLVED_COMPLEX_TYPE: Self = Self(3);
    pub const BAD_UNRESOLVED_PRIMITIVE_TYPE: Self = Self(4);
    pub const BAD_UNRESOLVED_ENUM_TYPE: Self = Self(5);
    pub const BAD_UNRESOLVED_TERM: Self = Self(6);
    pub const BAD_UNRESOLVED_PROPERTY: Self = Self(7);
    pub const BAD_UNRESOLVED_NAVIGATION_PROPERTY: Self = Self(8);
    pub const BAD_UNRESOLVED_ENTITY_SET: Self = Self(9);
    pub const BAD_UNRESOLVED_OPERATION: Self = Self(10);
    pub const BAD_TYPE_KIND_MISMATCH: Self = Self(11);
    pub const INVALID_DEFAULT_VALUE: Self = Self(12);
    pub const BAD_NAVIGATION_TARGET: Self = Self(13);

    // Query errors
    pub const ENTITY_TYPE_EXPECTED: Self = Self(100);
    pub const NONENTITY_TYPE_EXPECTED: Self = Self(101);
    pub const INCOMPATIBLE_TYPE_CAST: Self = Self(102);
    pub const NAVIGATION_MULTIPLICITY_MISMATCH: Self = Self(103);
    pub const COLLECTION_RETURN_TYPE: Self = Self(104);
    pub const NON_BOOLEAN_EXPRESSION: Self = Self(105);
    pub const PROPERTY_SHAPE_MISMATCH: Self = Self(106);
    pub const EMPTY_KEY_LOOKUP: Self = Self(107);

    // Contract violations
    pub const UNEXPECTED_PRIMITIVE_KIND: Self = Self(200);
    pub const NAVIGATION_TARGET_NOT_ENTITY: Self = Self(201);
    pub const INVALID_ENUM_UNDERLYING_TYPE: Self = Self(202);
    pub const UNSPECIFIED_MULTIPLICITY: Self = Self(203);

    // Annotation errors
    pub const INVALID_DOCUMENTATION_VALUE: Self = Self(300);

    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is a model error (0001-0099)
    pub const fn is_model_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is a query error (0100-0199)
    pub const fn is_query_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is a contract violation (0200-0299)
    pub const fn is_contract_violation(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Check if this is an annotation error (0300-0399)
    pub const fn is_annotation_error(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EDM{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Model errors (0001-0099)
    map.insert(1, ErrorInfo::new("Unresolved type"));
    map.insert(2, ErrorInfo::new("Unresolved entity type"));
    map.insert(3, ErrorInfo::new("Unresolved complex type"));
    map.insert(4, ErrorInfo::new("Unresolved primitive type"));
    map.insert(5, ErrorInfo::new("Unresolved enum type"));
    map.insert(6, ErrorInfo::new("Unresolved term"));
    map.insert(7, ErrorInfo::new("Unresolved property"));
    map.insert(8, ErrorInfo::new("Unresolved navigation property"));
    map.insert(9, ErrorInfo::new("Unresolved entity set"));
    map.insert(10, ErrorInfo::new("Unresolved operation"));
    map.insert(
        11,
        ErrorInfo::new("Name resolves to a different kind of element")
            .with_help("Check that the qualified name refers to the expected kind of type"),
    );
    map.insert(12, ErrorInfo::new("Default value does not match the declared type"));
    map.insert(13, ErrorInfo::new("Navigation target is no longer available"));

    // Query errors (0100-0199)
    map.insert(100, ErrorInfo::new("Entity type expected"));
    map.insert(
        101,
        ErrorInfo::new("Non-entity type expected")
            .with_help("Use an entity range variable for entity-typed collections"),
    );
    map.insert(102, ErrorInfo::new("Type cast target is not related to the source type"));
    map.insert(
        103,
        ErrorInfo::new("Navigation multiplicity mismatch")
            .with_help("Collection-valued navigations need a collection navigation node"),
    );
    map.insert(104, ErrorInfo::new("Single-value function returns a collection"));
    map.insert(105, ErrorInfo::new("Boolean expression expected"));
    map.insert(106, ErrorInfo::new("Property shape mismatch"));
    map.insert(107, ErrorInfo::new("Key lookup without key values"));

    // Contract violations (0200-0299)
    map.insert(200, ErrorInfo::new("Unexpected primitive kind"));
    map.insert(201, ErrorInfo::new("Navigation target must be an entity type"));
    map.insert(202, ErrorInfo::new("Enum underlying type must be integral"));
    map.insert(203, ErrorInfo::new("Navigation multiplicity must be specified"));

    // Annotation errors (0300-0399)
    map.insert(
        300,
        ErrorInfo::new("Invalid documentation annotation value")
            .with_help("The documentation namespace only accepts Documentation values"),
    );

    map
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::BAD_UNRESOLVED_TYPE.to_string(), "EDM0001");
        assert_eq!(ErrorCode::ENTITY_TYPE_EXPECTED.to_string(), "EDM0100");
    }

    #[test]
    fn test_error_categories() {
        assert!(ErrorCode::BAD_UNRESOLVED_TERM.is_model_error());
        assert!(!ErrorCode::BAD_UNRESOLVED_TERM.is_query_error());

        assert!(ErrorCode::INCOMPATIBLE_TYPE_CAST.is_query_error());
        assert!(ErrorCode::UNEXPECTED_PRIMITIVE_KIND.is_contract_violation());
        assert!(ErrorCode::INVALID_DOCUMENTATION_VALUE.is_annotation_error());
    }

    #[test]
    fn test_error_info() {
        assert_eq!(ErrorCode::BAD_UNRESOLVED_TERM.info().description, "Unresolved term");
        assert_eq!(ErrorCode::new(999).info().description, "Unknown error");
    }
}
