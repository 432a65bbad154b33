//! Functions and actions

use crate::TypeReference;
use edmlib_diagnostics::EdmError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminator of [`Operation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// Side-effect free, may be composed in queries
    Function,
    /// May have side effects
    Action,
}

/// A named, typed operation parameter
#[derive(Debug, Clone, PartialEq)]
pub struct OperationParameter {
    pub name: String,
    pub type_ref: TypeReference,
}

/// A function or action declared in a schema
#[derive(Debug)]
pub struct Operation {
    kind: OperationKind,
    namespace: String,
    name: String,
    return_type: Option<TypeReference>,
    parameters: Vec<OperationParameter>,
    is_bound: bool,
    is_composable: bool,
    entity_set_path: Option<String>,
}

impl Operation {
    /// Create a function returning `return_type`
    pub fn function(namespace: impl Into<String>, name: impl Into<String>, return_type: TypeReference) -> Self {
        Self::new(OperationKind::Function, namespace.into(), name.into(), Some(return_type))
    }

    /// Create an action, optionally returning a value
    pub fn action(
        namespace: impl Into<String>,
        name: impl Into<String>,
        return_type: Option<TypeReference>,
    ) -> Self {
        Self::new(OperationKind::Action, namespace.into(), name.into(), return_type)
    }

    fn new(kind: OperationKind, namespace: String, name: String, return_type: Option<TypeReference>) -> Self {
        Self {
            kind,
            namespace,
            name,
            return_type,
            parameters: Vec::new(),
            is_bound: false,
            is_composable: false,
            entity_set_path: None,
        }
    }

    /// Append a parameter; for bound operations the first one is the binding parameter
    pub fn with_parameter(mut self, name: impl Into<String>, type_ref: TypeReference) -> Self {
        self.parameters.push(OperationParameter {
            name: name.into(),
            type_ref,
        });
        self
    }

    pub fn bound(mut self) -> Self {
        self.is_bound = true;
        self
    }

    pub fn composable(mut self) -> Self {
        self.is_composable = true;
        self
    }

    pub fn with_entity_set_path(mut self, path: impl Into<String>) -> Self {
        self.entity_set_path = Some(path.into());
        self
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    pub fn return_type(&self) -> Option<&TypeReference> {
        self.return_type.as_ref()
    }

    pub fn parameters(&self) -> &[OperationParameter] {
        &self.parameters
    }

    pub fn find_parameter(&self, name: &str) -> Option<&OperationParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn is_bound(&self) -> bool {
        self.is_bound
    }

    pub fn is_composable(&self) -> bool {
        self.is_composable
    }

    pub fn entity_set_path(&self) -> Option<&str> {
        self.entity_set_path.as_deref()
    }

    /// Errors from unresolved parameter or return types
    pub fn errors(&self) -> Vec<EdmError> {
        self.return_type
            .iter()
            .flat_map(TypeReference::errors)
            .chain(self.parameters.iter().flat_map(|p| p.type_ref.errors()))
            .collect()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}
