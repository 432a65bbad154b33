//! Query AST for EDM models
//!
//! Nodes are produced by a query binder after every identifier has been
//! resolved against a model. Construction is fail-fast: a node that would be
//! malformed is rejected with an error instead of being built.
//!
//! - Range variables and references to them
//! - Path segments and paths
//! - Single-value and collection nodes, lambdas and function calls
//! - Filter, order-by and select/expand clauses
//! - Visitors and translators dispatching over every node family

mod annotatable;
mod clause;
mod function;
mod lambda;
mod node;
mod range_variable;
mod segment;
mod visitor;

pub use clause::*;
pub use function::*;
pub use lambda::*;
pub use node::*;
pub use range_variable::*;
pub use segment::*;
pub use visitor::*;

use edmlib_diagnostics::{EdmlibError, ErrorCode};

/// Build a query construction error and log the rejection
pub(crate) fn reject(code: ErrorCode, message: impl Into<String>) -> EdmlibError {
    let error = EdmlibError::query(code, message);
    log::debug!("rejected query node: {error}");
    error
}
