//! Bad elements
//!
//! A loader that cannot resolve a name builds a bad element instead of
//! failing. The element carries the errors explaining what went wrong and
//! answers every accessor with a neutral default, so model construction is
//! total and the errors surface later through validation.

use crate::{
    EdmType, EntitySet, EntityType, Multiplicity, NavigationProperty, Operation, StructuralProperty,
    Term, TypeKind, TypeReference,
};
use edmlib_diagnostics::{EdmError, EdmlibError, ErrorCode, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Which element family a bad element stands in for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BadElementKind {
    Type(TypeKind),
    StructuralProperty,
    NavigationProperty,
    Term,
    EntitySet,
    Operation,
    Expression,
}

impl BadElementKind {
    pub fn type_kind(&self) -> Option<TypeKind> {
        match self {
            Self::Type(kind) => Some(*kind),
            _ => None,
        }
    }
}

/// An element that could not be resolved
#[derive(Debug, Clone)]
pub struct BadElement {
    kind: BadElementKind,
    errors: Vec<EdmError>,
}

impl BadElement {
    /// Create a bad element carrying `errors`
    pub fn new(kind: BadElementKind, errors: impl IntoIterator<Item = EdmError>) -> Arc<Self> {
        let errors: Vec<EdmError> = errors.into_iter().collect();
        if let Some(first) = errors.first() {
            log::debug!("bad {:?} element: {}", kind, first);
        }
        Arc::new(Self { kind, errors })
    }

    /// A type that no schema declares
    pub fn unresolved_type(qualified_name: &str, kind: TypeKind) -> Arc<Self> {
        let code = match kind {
            TypeKind::Entity => ErrorCode::BAD_UNRESOLVED_ENTITY_TYPE,
            TypeKind::Complex => ErrorCode::BAD_UNRESOLVED_COMPLEX_TYPE,
            TypeKind::Primitive => ErrorCode::BAD_UNRESOLVED_PRIMITIVE_TYPE,
            TypeKind::Enum => ErrorCode::BAD_UNRESOLVED_ENUM_TYPE,
            _ => ErrorCode::BAD_UNRESOLVED_TYPE,
        };
        Self::new(
            BadElementKind::Type(kind),
            [EdmError::new(
                code,
                format!("The type '{qualified_name}' could not be found."),
            )],
        )
    }

    /// A name that resolves to a type of the wrong kind
    pub fn type_kind_mismatch(qualified_name: &str, expected: TypeKind, found: TypeKind) -> Arc<Self> {
        Self::new(
            BadElementKind::Type(expected),
            [EdmError::new(
                ErrorCode::BAD_TYPE_KIND_MISMATCH,
                format!("The type '{qualified_name}' is a {found} type, expected a {expected} type."),
            )],
        )
    }

    pub fn unresolved_term(qualified_name: &str) -> Arc<Self> {
        Self::new(
            BadElementKind::Term,
            [EdmError::new(
                ErrorCode::BAD_UNRESOLVED_TERM,
                format!("The term '{qualified_name}' could not be found."),
            )],
        )
    }

    pub fn unresolved_property(type_name: &str, property: &str) -> Arc<Self> {
        Self::new(
            BadElementKind::StructuralProperty,
            [EdmError::new(
                ErrorCode::BAD_UNRESOLVED_PROPERTY,
                format!("The property '{property}' could not be found on type '{type_name}'."),
            )],
        )
    }

    pub fn unresolved_navigation_property(type_name: &str, property: &str) -> Arc<Self> {
        Self::new(
            BadElementKind::NavigationProperty,
            [EdmError::new(
                ErrorCode::BAD_UNRESOLVED_NAVIGATION_PROPERTY,
                format!("The navigation property '{property}' could not be found on type '{type_name}'."),
            )],
        )
    }

    pub fn unresolved_entity_set(name: &str) -> Arc<Self> {
        Self::new(
            BadElementKind::EntitySet,
            [EdmError::new(
                ErrorCode::BAD_UNRESOLVED_ENTITY_SET,
                format!("The entity set '{name}' could not be found."),
            )],
        )
    }

    pub fn unresolved_operation(qualified_name: &str) -> Arc<Self> {
        Self::new(
            BadElementKind::Operation,
            [EdmError::new(
                ErrorCode::BAD_UNRESOLVED_OPERATION,
                format!("The operation '{qualified_name}' could not be found."),
            )],
        )
    }

    pub fn kind(&self) -> BadElementKind {
        self.kind
    }

    pub fn errors(&self) -> &[EdmError] {
        &self.errors
    }

    pub fn first_error(&self) -> Option<&EdmError> {
        self.errors.first()
    }

    /// Always empty
    pub fn name(&self) -> &str {
        ""
    }

    /// This element viewed as a type
    pub fn as_type(self: &Arc<Self>) -> EdmType {
        EdmType::Bad(self.clone())
    }

    /// A nullable reference to this element viewed as a type
    pub fn type_reference(self: &Arc<Self>) -> TypeReference {
        TypeReference::new(self.as_type(), true)
    }
}

impl PartialEq for BadElement {
    fn eq(&self, other: &Self) -> bool {
        self.errors == other.errors
    }
}

impl fmt::Display for BadElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.first() {
            Some(error) => write!(f, "{error}"),
            None => write!(f, "bad {:?} element", self.kind),
        }
    }
}

/// A resolved element or the bad element standing in for it
#[derive(Debug, Clone)]
pub enum Checked<T> {
    Valid(T),
    Bad(Arc<BadElement>),
}

impl<T> Checked<T> {
    pub fn is_bad(&self) -> bool {
        matches!(self, Self::Bad(_))
    }

    pub fn valid(&self) -> Option<&T> {
        match self {
            Self::Valid(value) => Some(value),
            Self::Bad(_) => None,
        }
    }

    pub fn into_valid(self) -> Option<T> {
        match self {
            Self::Valid(value) => Some(value),
            Self::Bad(_) => None,
        }
    }

    pub fn as_bad(&self) -> Option<&Arc<BadElement>> {
        match self {
            Self::Valid(_) => None,
            Self::Bad(bad) => Some(bad),
        }
    }

    /// Errors carried by the bad arm; empty when valid
    pub fn errors(&self) -> &[EdmError] {
        match self {
            Self::Valid(_) => &[],
            Self::Bad(bad) => bad.errors(),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Checked<U> {
        match self {
            Self::Valid(value) => Checked::Valid(f(value)),
            Self::Bad(bad) => Checked::Bad(bad),
        }
    }

    /// Escalate a bad element into an error
    pub fn into_result(self) -> Result<T> {
        match self {
            Self::Valid(value) => Ok(value),
            Self::Bad(bad) => Err(EdmlibError::from_model_errors(bad.errors().iter().cloned())),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Checked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid(value) => value.fmt(f),
            Self::Bad(bad) => bad.fmt(f),
        }
    }
}

impl Checked<Arc<NavigationProperty>> {
    pub fn name(&self) -> &str {
        match self {
            Self::Valid(p) => p.name(),
            Self::Bad(bad) => bad.name(),
        }
    }

    pub fn partner(&self) -> Option<Arc<NavigationProperty>> {
        self.valid().and_then(|p| p.partner())
    }

    pub fn target_multiplicity(&self) -> Multiplicity {
        self.valid()
            .map_or(Multiplicity::Unspecified, |p| p.target_multiplicity())
    }

    pub fn type_ref(&self) -> TypeReference {
        match self {
            Self::Valid(p) => p.type_ref(),
            Self::Bad(bad) => bad.type_reference(),
        }
    }

    pub fn target_type(&self) -> Option<Arc<EntityType>> {
        self.valid().and_then(|p| p.target_type())
    }
}

impl Checked<Arc<StructuralProperty>> {
    pub fn name(&self) -> &str {
        match self {
            Self::Valid(p) => p.name(),
            Self::Bad(bad) => bad.name(),
        }
    }

    pub fn type_ref(&self) -> TypeReference {
        match self {
            Self::Valid(p) => p.type_ref().clone(),
            Self::Bad(bad) => bad.type_reference(),
        }
    }
}

impl Checked<Arc<Term>> {
    pub fn namespace(&self) -> &str {
        self.valid().map_or("", |t| t.namespace())
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Valid(t) => t.name(),
            Self::Bad(bad) => bad.name(),
        }
    }

    pub fn type_ref(&self) -> TypeReference {
        match self {
            Self::Valid(t) => t.type_ref().clone(),
            Self::Bad(bad) => bad.type_reference(),
        }
    }

    pub fn default_value(&self) -> Option<&str> {
        self.valid().and_then(|t| t.default_value())
    }
}

impl Checked<Arc<EntitySet>> {
    pub fn name(&self) -> &str {
        match self {
            Self::Valid(set) => set.name(),
            Self::Bad(bad) => bad.name(),
        }
    }

    pub fn entity_type(&self) -> Option<&Arc<EntityType>> {
        self.valid().map(|set| set.entity_type())
    }
}

impl Checked<Arc<Operation>> {
    pub fn name(&self) -> &str {
        match self {
            Self::Valid(op) => op.name(),
            Self::Bad(bad) => bad.name(),
        }
    }

    pub fn return_type(&self) -> Option<TypeReference> {
        match self {
            Self::Valid(op) => op.return_type().cloned(),
            Self::Bad(bad) => Some(bad.type_reference()),
        }
    }
}

impl Checked<Arc<EntityType>> {
    pub fn name(&self) -> &str {
        match self {
            Self::Valid(t) => t.name(),
            Self::Bad(bad) => bad.name(),
        }
    }

    /// The entity type, or the bad type standing in for it
    pub fn as_type(&self) -> EdmType {
        match self {
            Self::Valid(t) => EdmType::Entity(t.clone()),
            Self::Bad(bad) => bad.as_type(),
        }
    }
}
