//! Range variables

use crate::reject;
use edmlib_diagnostics::{ErrorCode, Result};
use edmlib_model::{EntityType, NavigationSource, TypeReference};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Name of the variable a top-level query iterates with
pub const IMPLICIT_RANGE_VARIABLE_NAME: &str = "$it";

/// Discriminator of [`RangeVariable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeVariableKind {
    Entity,
    Nonentity,
}

/// A range variable over entities
#[derive(Debug, Clone)]
pub struct EntityRangeVariable {
    name: String,
    type_ref: TypeReference,
    navigation_source: Option<NavigationSource>,
}

impl EntityRangeVariable {
    /// Create an entity range variable
    ///
    /// Fails unless `type_ref` refers to an entity type.
    pub fn new(
        name: impl Into<String>,
        type_ref: TypeReference,
        navigation_source: Option<NavigationSource>,
    ) -> Result<Self> {
        let name = name.into();
        if !type_ref.is_entity() {
            return Err(reject(
                ErrorCode::ENTITY_TYPE_EXPECTED,
                format!("range variable '{name}' needs an entity type, got {}", type_ref.full_name()),
            ));
        }
        Ok(Self {
            name,
            type_ref,
            navigation_source,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_ref(&self) -> &TypeReference {
        &self.type_ref
    }

    pub fn entity_type(&self) -> Option<&Arc<EntityType>> {
        self.type_ref.as_entity()
    }

    pub fn navigation_source(&self) -> Option<&NavigationSource> {
        self.navigation_source.as_ref()
    }
}

/// A range variable over primitive, complex, enum or untyped values
#[derive(Debug, Clone)]
pub struct NonentityRangeVariable {
    name: String,
    type_ref: Option<TypeReference>,
}

impl NonentityRangeVariable {
    /// Create a non-entity range variable
    ///
    /// An absent type is allowed; an entity type is rejected.
    pub fn new(name: impl Into<String>, type_ref: Option<TypeReference>) -> Result<Self> {
        let name = name.into();
        if let Some(type_ref) = type_ref.as_ref().filter(|t| t.is_entity()) {
            return Err(reject(
                ErrorCode::NONENTITY_TYPE_EXPECTED,
                format!(
                    "range variable '{name}' cannot range over entity type {}",
                    type_ref.full_name()
                ),
            ));
        }
        Ok(Self { name, type_ref })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_ref(&self) -> Option<&TypeReference> {
        self.type_ref.as_ref()
    }
}

/// A variable introduced by a query or lambda
#[derive(Debug, Clone)]
pub enum RangeVariable {
    Entity(Arc<EntityRangeVariable>),
    Nonentity(Arc<NonentityRangeVariable>),
}

impl RangeVariable {
    pub fn kind(&self) -> RangeVariableKind {
        match self {
            Self::Entity(_) => RangeVariableKind::Entity,
            Self::Nonentity(_) => RangeVariableKind::Nonentity,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Entity(v) => v.name(),
            Self::Nonentity(v) => v.name(),
        }
    }

    pub fn type_ref(&self) -> Option<&TypeReference> {
        match self {
            Self::Entity(v) => Some(v.type_ref()),
            Self::Nonentity(v) => v.type_ref(),
        }
    }

    /// Check whether two handles refer to the same variable
    pub fn same_variable(&self, other: &RangeVariable) -> bool {
        match (self, other) {
            (Self::Entity(a), Self::Entity(b)) => Arc::ptr_eq(a, b),
            (Self::Nonentity(a), Self::Nonentity(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<EntityRangeVariable> for RangeVariable {
    fn from(variable: EntityRangeVariable) -> Self {
        Self::Entity(Arc::new(variable))
    }
}

impl From<NonentityRangeVariable> for RangeVariable {
    fn from(variable: NonentityRangeVariable) -> Self {
        Self::Nonentity(Arc::new(variable))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edmlib_model::CoreModel;

    #[test]
    fn test_nonentity_rejects_entity_type() {
        let customer = EntityType::new("NS", "Customer", None, false, false, false);
        let err = NonentityRangeVariable::new("c", Some(TypeReference::entity(&customer, false))).unwrap_err();
        assert_eq!(err.code(), ErrorCode::NONENTITY_TYPE_EXPECTED);
    }

    #[test]
    fn test_nonentity_accepts_absent_or_primitive_type() {
        let untyped = NonentityRangeVariable::new("x", None).unwrap();
        assert!(untyped.type_ref().is_none());

        let int = CoreModel::instance().get_int32(false);
        let typed = NonentityRangeVariable::new("x", Some(int.clone())).unwrap();
        assert_eq!(typed.type_ref(), Some(&int));
    }

    #[test]
    fn test_entity_range_variable_requires_entity() {
        let err = EntityRangeVariable::new("$it", CoreModel::instance().get_string(false), None).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ENTITY_TYPE_EXPECTED);

        let customer = EntityType::new("NS", "Customer", None, false, false, false);
        let variable = RangeVariable::from(
            EntityRangeVariable::new(IMPLICIT_RANGE_VARIABLE_NAME, TypeReference::entity(&customer, false), None)
                .unwrap(),
        );
        assert_eq!(variable.kind(), RangeVariableKind::Entity);
        assert_eq!(variable.name(), "$it");
        assert!(variable.same_variable(&variable.clone()));
    }
}
