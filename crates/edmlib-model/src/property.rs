//! Structural properties and the property family

use crate::{ComplexType, EdmType, EntityType, NavigationProperty, TypeReference};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Weak};

/// Optimistic concurrency behavior of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConcurrencyMode {
    #[default]
    None,
    Fixed,
}

/// Discriminator of [`Property`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyKind {
    Structural,
    Navigation,
}

#[derive(Debug, Clone)]
pub(crate) enum DeclaringType {
    Entity(Weak<EntityType>),
    Complex(Weak<ComplexType>),
}

impl DeclaringType {
    fn upgrade(&self) -> Option<EdmType> {
        match self {
            Self::Entity(weak) => weak.upgrade().map(EdmType::Entity),
            Self::Complex(weak) => weak.upgrade().map(EdmType::Complex),
        }
    }
}

/// A property holding a value of a primitive, complex, enum or collection type
pub struct StructuralProperty {
    name: String,
    type_ref: TypeReference,
    default_value: Option<String>,
    concurrency_mode: ConcurrencyMode,
    declaring_type: DeclaringType,
}

impl StructuralProperty {
    pub(crate) fn new(
        declaring_type: DeclaringType,
        name: String,
        type_ref: TypeReference,
        default_value: Option<String>,
        concurrency_mode: ConcurrencyMode,
    ) -> Arc<Self> {
        Arc::new(Self {
            name,
            type_ref,
            default_value,
            concurrency_mode,
            declaring_type,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_ref(&self) -> &TypeReference {
        &self.type_ref
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn concurrency_mode(&self) -> ConcurrencyMode {
        self.concurrency_mode
    }

    /// The type that declares this property, while it is alive
    pub fn declaring_type(&self) -> Option<EdmType> {
        self.declaring_type.upgrade()
    }
}

impl fmt::Debug for StructuralProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuralProperty")
            .field("name", &self.name)
            .field("type_ref", &self.type_ref)
            .field("default_value", &self.default_value)
            .field("concurrency_mode", &self.concurrency_mode)
            .finish()
    }
}

/// A declared property of a structured type
#[derive(Clone)]
pub enum Property {
    Structural(Arc<StructuralProperty>),
    Navigation(Arc<NavigationProperty>),
}

impl Property {
    pub fn name(&self) -> &str {
        match self {
            Self::Structural(p) => p.name(),
            Self::Navigation(p) => p.name(),
        }
    }

    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::Structural(_) => PropertyKind::Structural,
            Self::Navigation(_) => PropertyKind::Navigation,
        }
    }

    pub fn type_ref(&self) -> TypeReference {
        match self {
            Self::Structural(p) => p.type_ref().clone(),
            Self::Navigation(p) => p.type_ref(),
        }
    }

    pub fn declaring_type(&self) -> Option<EdmType> {
        match self {
            Self::Structural(p) => p.declaring_type(),
            Self::Navigation(p) => p.declaring_type().map(EdmType::Entity),
        }
    }

    pub fn as_structural(&self) -> Option<&Arc<StructuralProperty>> {
        match self {
            Self::Structural(p) => Some(p),
            Self::Navigation(_) => None,
        }
    }

    pub fn as_navigation(&self) -> Option<&Arc<NavigationProperty>> {
        match self {
            Self::Structural(_) => None,
            Self::Navigation(p) => Some(p),
        }
    }

    /// Check whether two handles refer to the same property
    pub fn same_property(&self, other: &Property) -> bool {
        match (self, other) {
            (Self::Structural(a), Self::Structural(b)) => Arc::ptr_eq(a, b),
            (Self::Navigation(a), Self::Navigation(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural(p) => p.fmt(f),
            Self::Navigation(p) => p.fmt(f),
        }
    }
}
