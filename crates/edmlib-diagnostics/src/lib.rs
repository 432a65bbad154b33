//! EDM diagnostics and error handling
//!
//! This crate provides the error infrastructure shared by the model and query
//! crates:
//! - Structured error codes with a static description table
//! - `EdmError`, the error record carried by bad model elements
//! - `EdmlibError`, the fail-fast error returned by AST constructors and
//!   contract checks
//! - Source locations for errors reported against schema documents

mod error;
mod error_code;
mod location;

pub use error::*;
pub use error_code::*;
pub use location::*;

/// Result type for fail-fast edmlib operations
pub type Result<T> = std::result::Result<T, EdmlibError>;
