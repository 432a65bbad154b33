//! The core model: built-in types and type reference factories

use crate::{
    find_primitive_type, primitive_type, BinaryFacets, DecimalFacets, EdmType, EntityReferenceType,
    EntityType, Facets, PathTypeKind, PrimitiveType, PrimitiveTypeKind, SpatialFacets,
    StringFacets, TemporalFacets, TypeReference, EDM_NAMESPACE,
};
use edmlib_diagnostics::{EdmlibError, Result};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::sync::Arc;

static CORE_MODEL: Lazy<CoreModel> = Lazy::new(CoreModel::build);

/// The process-wide model of built-in `Edm` types
///
/// Holds no external resources; its contents never change after first use.
#[derive(Debug)]
pub struct CoreModel {
    declared_types: IndexMap<String, EdmType>,
}

impl CoreModel {
    /// Get the shared instance
    pub fn instance() -> &'static CoreModel {
        &CORE_MODEL
    }

    fn build() -> Self {
        let mut declared_types = IndexMap::new();
        for kind in PrimitiveTypeKind::ALL {
            let primitive = primitive_type(kind);
            declared_types.insert(primitive.full_name(), EdmType::Primitive(primitive));
        }
        for kind in PathTypeKind::ALL {
            declared_types.insert(format!("{}.{}", EDM_NAMESPACE, kind.name()), EdmType::Path(kind));
        }
        declared_types.insert(format!("{EDM_NAMESPACE}.Untyped"), EdmType::Untyped);
        log::trace!("core model initialised with {} types", declared_types.len());
        Self { declared_types }
    }

    pub fn namespace(&self) -> &'static str {
        EDM_NAMESPACE
    }

    /// All built-in types in declaration order
    pub fn declared_types(&self) -> impl Iterator<Item = &EdmType> {
        self.declared_types.values()
    }

    /// Find a built-in type by qualified name
    pub fn find_declared_type(&self, qualified_name: &str) -> Option<EdmType> {
        self.declared_types.get(qualified_name).cloned()
    }

    /// Find a primitive type by qualified or unqualified name
    pub fn find_primitive_type(&self, name: &str) -> Option<&'static PrimitiveType> {
        find_primitive_type(name)
    }

    pub fn primitive_type(&self, kind: PrimitiveTypeKind) -> &'static PrimitiveType {
        primitive_type(kind)
    }

    /// Reference to a primitive kind with the kind's default facets
    pub fn get_primitive(&self, kind: PrimitiveTypeKind, nullable: bool) -> TypeReference {
        TypeReference::primitive(kind, nullable)
    }

    pub fn get_string(&self, nullable: bool) -> TypeReference {
        self.get_primitive(PrimitiveTypeKind::String, nullable)
    }

    pub fn get_string_with(
        &self,
        max_length: Option<u32>,
        is_unbounded: bool,
        is_unicode: Option<bool>,
        nullable: bool,
    ) -> TypeReference {
        self.with_facets(
            PrimitiveTypeKind::String,
            Facets::String(StringFacets {
                max_length,
                is_unbounded,
                is_unicode,
            }),
            nullable,
        )
    }

    pub fn get_binary(&self, nullable: bool) -> TypeReference {
        self.get_primitive(PrimitiveTypeKind::Binary, nullable)
    }

    pub fn get_binary_with(&self, max_length: Option<u32>, is_unbounded: bool, nullable: bool) -> TypeReference {
        self.with_facets(
            PrimitiveTypeKind::Binary,
            Facets::Binary(BinaryFacets {
                max_length,
                is_unbounded,
            }),
            nullable,
        )
    }

    pub fn get_decimal(&self, precision: Option<u32>, scale: Option<u32>, nullable: bool) -> TypeReference {
        self.with_facets(
            PrimitiveTypeKind::Decimal,
            Facets::Decimal(DecimalFacets { precision, scale }),
            nullable,
        )
    }

    /// Reference to DateTimeOffset or Duration with a precision
    pub fn get_temporal(
        &self,
        kind: PrimitiveTypeKind,
        precision: Option<u32>,
        nullable: bool,
    ) -> Result<TypeReference> {
        if !kind.is_temporal() {
            return Err(EdmlibError::unexpected_primitive_kind("get_temporal", kind));
        }
        Ok(self.with_facets(kind, Facets::Temporal(TemporalFacets { precision }), nullable))
    }

    /// Reference to a geography or geometry kind
    ///
    /// Without an explicit SRID, geography uses 4326 and geometry 0.
    pub fn get_spatial(&self, kind: PrimitiveTypeKind, srid: Option<i32>, nullable: bool) -> Result<TypeReference> {
        if !kind.is_spatial() {
            return Err(EdmlibError::unexpected_primitive_kind("get_spatial", kind));
        }
        let srid = srid.or(kind.default_srid());
        Ok(self.with_facets(kind, Facets::Spatial(SpatialFacets { srid }), nullable))
    }

    /// Collection reference over `element`
    ///
    /// Always nullable for entity and entity reference elements; otherwise
    /// nullable exactly when the element is.
    pub fn get_collection(&self, element: TypeReference) -> TypeReference {
        element.into_collection()
    }

    pub fn get_entity_reference(&self, entity_type: &Arc<EntityType>, nullable: bool) -> TypeReference {
        TypeReference::new(
            EdmType::EntityReference(EntityReferenceType::new(entity_type.clone())),
            nullable,
        )
    }

    pub fn get_path(&self, kind: PathTypeKind, nullable: bool) -> TypeReference {
        TypeReference::new(EdmType::Path(kind), nullable)
    }

    /// Nullable reference to `Edm.Untyped`
    pub fn get_untyped(&self) -> TypeReference {
        TypeReference::new(EdmType::Untyped, true)
    }

    pub fn get_boolean(&self, nullable: bool) -> TypeReference {
        self.get_primitive(PrimitiveTypeKind::Boolean, nullable)
    }

    pub fn get_int32(&self, nullable: bool) -> TypeReference {
        self.get_primitive(PrimitiveTypeKind::Int32, nullable)
    }

    pub fn get_int64(&self, nullable: bool) -> TypeReference {
        self.get_primitive(PrimitiveTypeKind::Int64, nullable)
    }

    pub fn get_guid(&self, nullable: bool) -> TypeReference {
        self.get_primitive(PrimitiveTypeKind::Guid, nullable)
    }

    pub fn get_double(&self, nullable: bool) -> TypeReference {
        self.get_primitive(PrimitiveTypeKind::Double, nullable)
    }

    pub fn get_date(&self, nullable: bool) -> TypeReference {
        self.get_primitive(PrimitiveTypeKind::Date, nullable)
    }

    pub fn get_date_time_offset(&self, nullable: bool) -> TypeReference {
        self.get_primitive(PrimitiveTypeKind::DateTimeOffset, nullable)
    }

    pub fn get_duration(&self, nullable: bool) -> TypeReference {
        self.get_primitive(PrimitiveTypeKind::Duration, nullable)
    }

    pub fn get_stream(&self, nullable: bool) -> TypeReference {
        self.get_primitive(PrimitiveTypeKind::Stream, nullable)
    }

    // Facets built here always match the kind
    fn with_facets(&self, kind: PrimitiveTypeKind, facets: Facets, nullable: bool) -> TypeReference {
        TypeReference::primitive_with_facets(kind, facets, nullable)
            .unwrap_or_else(|_| TypeReference::primitive(kind, nullable))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_find_declared_type() {
        let core = CoreModel::instance();
        assert_eq!(
            core.find_declared_type("Edm.Int32"),
            Some(EdmType::primitive(PrimitiveTypeKind::Int32))
        );
        assert_eq!(
            core.find_declared_type("Edm.NavigationPropertyPath"),
            Some(EdmType::Path(PathTypeKind::NavigationPropertyPath))
        );
        assert_eq!(core.find_declared_type("Edm.Untyped"), Some(EdmType::Untyped));
        assert!(core.find_declared_type("Int32").is_none());
        assert_eq!(core.declared_types().count(), 37);
    }

    #[test]
    fn test_string_facets() {
        let core = CoreModel::instance();
        let string = core.get_string_with(Some(128), false, Some(false), true);
        assert_eq!(
            string.string_facets(),
            Some(&StringFacets {
                max_length: Some(128),
                is_unbounded: false,
                is_unicode: Some(false),
            })
        );
        assert!(string.is_nullable());
    }

    #[test]
    fn test_entity_reference() {
        let core = CoreModel::instance();
        let order = EntityType::new("NS", "Order", None, false, false, false);
        let reference = core.get_entity_reference(&order, false);
        assert!(reference.is_entity_reference());
        assert_eq!(reference.full_name(), "Ref(NS.Order)");
    }
}
