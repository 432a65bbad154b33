//! Type references: a type plus nullability and facets

use crate::{
    primitive_type, CollectionType, EdmType, EntityType, PrimitiveTypeKind, TypeKind,
};
use edmlib_diagnostics::{EdmError, EdmlibError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Facets of a string reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct StringFacets {
    pub max_length: Option<u32>,
    pub is_unbounded: bool,
    pub is_unicode: Option<bool>,
}

/// Facets of a binary reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BinaryFacets {
    pub max_length: Option<u32>,
    pub is_unbounded: bool,
}

/// Facets of a decimal reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DecimalFacets {
    pub precision: Option<u32>,
    pub scale: Option<u32>,
}

/// Facets of a DateTimeOffset or Duration reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TemporalFacets {
    pub precision: Option<u32>,
}

/// Facets of a geography or geometry reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SpatialFacets {
    pub srid: Option<i32>,
}

/// Kind-specific facets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facets {
    #[default]
    None,
    String(StringFacets),
    Binary(BinaryFacets),
    Decimal(DecimalFacets),
    Temporal(TemporalFacets),
    Spatial(SpatialFacets),
}

impl Facets {
    /// Facets a fresh reference to `kind` starts with
    pub fn default_for(kind: PrimitiveTypeKind) -> Self {
        match kind {
            PrimitiveTypeKind::String => Self::String(StringFacets::default()),
            PrimitiveTypeKind::Binary => Self::Binary(BinaryFacets::default()),
            PrimitiveTypeKind::Decimal => Self::Decimal(DecimalFacets::default()),
            k if k.is_temporal() => Self::Temporal(TemporalFacets { precision: Some(0) }),
            k if k.is_spatial() => Self::Spatial(SpatialFacets {
                srid: k.default_srid(),
            }),
            _ => Self::None,
        }
    }

    /// Check whether these facets apply to `kind`
    pub fn applies_to(&self, kind: PrimitiveTypeKind) -> bool {
        match self {
            Self::None => true,
            Self::String(_) => kind == PrimitiveTypeKind::String,
            Self::Binary(_) => kind == PrimitiveTypeKind::Binary,
            Self::Decimal(_) => kind == PrimitiveTypeKind::Decimal,
            Self::Temporal(_) => kind.is_temporal(),
            Self::Spatial(_) => kind.is_spatial(),
        }
    }
}

/// A type definition with nullability and facets
#[derive(Clone, PartialEq)]
pub struct TypeReference {
    definition: EdmType,
    nullable: bool,
    facets: Facets,
}

impl TypeReference {
    /// Create a reference without facets
    pub fn new(definition: EdmType, nullable: bool) -> Self {
        let facets = match &definition {
            EdmType::Primitive(p) => Facets::default_for(p.kind()),
            _ => Facets::None,
        };
        Self {
            definition,
            nullable,
            facets,
        }
    }

    /// Create a reference to a primitive kind with its default facets
    pub fn primitive(kind: PrimitiveTypeKind, nullable: bool) -> Self {
        Self::new(EdmType::Primitive(primitive_type(kind)), nullable)
    }

    /// Create a reference to a primitive kind with explicit facets
    ///
    /// Fails when the facets do not belong to `kind`.
    pub fn primitive_with_facets(
        kind: PrimitiveTypeKind,
        facets: Facets,
        nullable: bool,
    ) -> Result<Self> {
        if !facets.applies_to(kind) {
            return Err(EdmlibError::unexpected_primitive_kind(
                "TypeReference::primitive_with_facets",
                kind,
            ));
        }
        Ok(Self {
            definition: EdmType::Primitive(primitive_type(kind)),
            nullable,
            facets,
        })
    }

    /// Reference to an entity type
    pub fn entity(entity_type: &Arc<EntityType>, nullable: bool) -> Self {
        Self::new(EdmType::Entity(entity_type.clone()), nullable)
    }

    pub fn definition(&self) -> &EdmType {
        &self.definition
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    /// Copy with a different nullability
    pub fn with_nullable(&self, nullable: bool) -> Self {
        Self {
            nullable,
            ..self.clone()
        }
    }

    pub fn type_kind(&self) -> TypeKind {
        self.definition.type_kind()
    }

    pub fn primitive_kind(&self) -> Option<PrimitiveTypeKind> {
        self.definition.as_primitive().map(|p| p.kind())
    }

    pub fn full_name(&self) -> String {
        self.definition.full_name()
    }

    pub fn is_bad(&self) -> bool {
        self.definition.is_bad()
    }

    pub fn errors(&self) -> Vec<EdmError> {
        self.definition.errors()
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.definition, EdmType::Primitive(_))
    }

    pub fn is_boolean(&self) -> bool {
        self.primitive_kind() == Some(PrimitiveTypeKind::Boolean)
    }

    pub fn is_entity(&self) -> bool {
        matches!(self.definition, EdmType::Entity(_))
    }

    pub fn is_complex(&self) -> bool {
        matches!(self.definition, EdmType::Complex(_))
    }

    pub fn is_structured(&self) -> bool {
        self.is_entity() || self.is_complex()
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.definition, EdmType::Enum(_))
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.definition, EdmType::Collection(_))
    }

    pub fn is_entity_reference(&self) -> bool {
        matches!(self.definition, EdmType::EntityReference(_))
    }

    pub fn is_untyped(&self) -> bool {
        matches!(self.definition, EdmType::Untyped)
    }

    pub fn as_entity(&self) -> Option<&Arc<EntityType>> {
        self.definition.as_entity()
    }

    /// Element type of a collection reference
    pub fn element_type(&self) -> Option<&TypeReference> {
        self.definition.as_collection().map(|c| c.element_type())
    }

    /// Entity type of an entity or entity collection reference
    pub fn entity_type(&self) -> Option<&Arc<EntityType>> {
        match &self.definition {
            EdmType::Entity(t) => Some(t),
            EdmType::Collection(c) => c.element_type().as_entity(),
            _ => None,
        }
    }

    pub fn string_facets(&self) -> Option<&StringFacets> {
        match &self.facets {
            Facets::String(f) => Some(f),
            _ => None,
        }
    }

    pub fn binary_facets(&self) -> Option<&BinaryFacets> {
        match &self.facets {
            Facets::Binary(f) => Some(f),
            _ => None,
        }
    }

    pub fn decimal_facets(&self) -> Option<&DecimalFacets> {
        match &self.facets {
            Facets::Decimal(f) => Some(f),
            _ => None,
        }
    }

    pub fn temporal_facets(&self) -> Option<&TemporalFacets> {
        match &self.facets {
            Facets::Temporal(f) => Some(f),
            _ => None,
        }
    }

    pub fn spatial_facets(&self) -> Option<&SpatialFacets> {
        match &self.facets {
            Facets::Spatial(f) => Some(f),
            _ => None,
        }
    }

    /// Collection reference over this reference
    ///
    /// A collection of entities or entity references is always nullable;
    /// otherwise the collection takes the element's nullability.
    pub fn into_collection(self) -> Self {
        let nullable = match self.definition {
            EdmType::Entity(_) | EdmType::EntityReference(_) => true,
            _ => self.nullable,
        };
        Self::new(EdmType::Collection(CollectionType::new(self)), nullable)
    }
}

impl fmt::Debug for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeReference")
            .field("definition", &self.definition)
            .field("nullable", &self.nullable)
            .field("facets", &self.facets)
            .finish()
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.definition)?;
        if self.nullable {
            f.write_str(" (nullable)")?;
        }
        Ok(())
    }
}
