//! Calls to functions bound in the model

use crate::{reject, QueryNode};
use edmlib_diagnostics::{ErrorCode, Result};
use edmlib_model::{OperationImport, TypeReference};
use std::sync::Arc;

/// A call to a function producing a single value
#[derive(Debug, Clone)]
pub struct SingleValueFunctionCallNode {
    name: String,
    functions: Vec<Arc<OperationImport>>,
    arguments: Vec<QueryNode>,
    return_type: Option<TypeReference>,
}

impl SingleValueFunctionCallNode {
    /// Create a call to `name`
    ///
    /// `functions` lists the candidate overloads; it may be empty for built-in
    /// functions. Fails when the return type is a collection.
    pub fn new(
        name: impl Into<String>,
        functions: Vec<Arc<OperationImport>>,
        arguments: Vec<QueryNode>,
        return_type: Option<TypeReference>,
    ) -> Result<Self> {
        let name = name.into();
        if let Some(return_type) = return_type.as_ref().filter(|t| t.is_collection()) {
            return Err(reject(
                ErrorCode::COLLECTION_RETURN_TYPE,
                format!(
                    "function '{name}' returns {}; a single-value call cannot return a collection",
                    return_type.full_name()
                ),
            ));
        }
        Ok(Self {
            name,
            functions,
            arguments,
            return_type,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn functions(&self) -> &[Arc<OperationImport>] {
        &self.functions
    }

    pub fn arguments(&self) -> &[QueryNode] {
        &self.arguments
    }

    pub fn return_type(&self) -> Option<&TypeReference> {
        self.return_type.as_ref()
    }
}
