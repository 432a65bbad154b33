//! Primitive type kinds and their process-wide singletons

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Namespace of all built-in types
pub const EDM_NAMESPACE: &str = "Edm";

/// Kind of a primitive type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrimitiveTypeKind {
    Binary,
    Boolean,
    Byte,
    DateTimeOffset,
    Decimal,
    Double,
    Guid,
    Int16,
    Int32,
    Int64,
    SByte,
    Single,
    String,
    Stream,
    Duration,
    Date,
    TimeOfDay,
    Geography,
    GeographyPoint,
    GeographyLineString,
    GeographyPolygon,
    GeographyCollection,
    GeographyMultiPolygon,
    GeographyMultiLineString,
    GeographyMultiPoint,
    Geometry,
    GeometryPoint,
    GeometryLineString,
    GeometryPolygon,
    GeometryCollection,
    GeometryMultiPolygon,
    GeometryMultiLineString,
    GeometryMultiPoint,
}

impl PrimitiveTypeKind {
    /// All kinds in declaration order
    pub const ALL: [Self; 33] = [
        Self::Binary,
        Self::Boolean,
        Self::Byte,
        Self::DateTimeOffset,
        Self::Decimal,
        Self::Double,
        Self::Guid,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::SByte,
        Self::Single,
        Self::String,
        Self::Stream,
        Self::Duration,
        Self::Date,
        Self::TimeOfDay,
        Self::Geography,
        Self::GeographyPoint,
        Self::GeographyLineString,
        Self::GeographyPolygon,
        Self::GeographyCollection,
        Self::GeographyMultiPolygon,
        Self::GeographyMultiLineString,
        Self::GeographyMultiPoint,
        Self::Geometry,
        Self::GeometryPoint,
        Self::GeometryLineString,
        Self::GeometryPolygon,
        Self::GeometryCollection,
        Self::GeometryMultiPolygon,
        Self::GeometryMultiLineString,
        Self::GeometryMultiPoint,
    ];

    /// Unqualified type name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Binary => "Binary",
            Self::Boolean => "Boolean",
            Self::Byte => "Byte",
            Self::DateTimeOffset => "DateTimeOffset",
            Self::Decimal => "Decimal",
            Self::Double => "Double",
            Self::Guid => "Guid",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::SByte => "SByte",
            Self::Single => "Single",
            Self::String => "String",
            Self::Stream => "Stream",
            Self::Duration => "Duration",
            Self::Date => "Date",
            Self::TimeOfDay => "TimeOfDay",
            Self::Geography => "Geography",
            Self::GeographyPoint => "GeographyPoint",
            Self::GeographyLineString => "GeographyLineString",
            Self::GeographyPolygon => "GeographyPolygon",
            Self::GeographyCollection => "GeographyCollection",
            Self::GeographyMultiPolygon => "GeographyMultiPolygon",
            Self::GeographyMultiLineString => "GeographyMultiLineString",
            Self::GeographyMultiPoint => "GeographyMultiPoint",
            Self::Geometry => "Geometry",
            Self::GeometryPoint => "GeometryPoint",
            Self::GeometryLineString => "GeometryLineString",
            Self::GeometryPolygon => "GeometryPolygon",
            Self::GeometryCollection => "GeometryCollection",
            Self::GeometryMultiPolygon => "GeometryMultiPolygon",
            Self::GeometryMultiLineString => "GeometryMultiLineString",
            Self::GeometryMultiPoint => "GeometryMultiPoint",
        }
    }

    pub const fn is_geography(&self) -> bool {
        matches!(
            self,
            Self::Geography
                | Self::GeographyPoint
                | Self::GeographyLineString
                | Self::GeographyPolygon
                | Self::GeographyCollection
                | Self::GeographyMultiPolygon
                | Self::GeographyMultiLineString
                | Self::GeographyMultiPoint
        )
    }

    pub const fn is_geometry(&self) -> bool {
        matches!(
            self,
            Self::Geometry
                | Self::GeometryPoint
                | Self::GeometryLineString
                | Self::GeometryPolygon
                | Self::GeometryCollection
                | Self::GeometryMultiPolygon
                | Self::GeometryMultiLineString
                | Self::GeometryMultiPoint
        )
    }

    pub const fn is_spatial(&self) -> bool {
        self.is_geography() || self.is_geometry()
    }

    /// Kinds that carry a precision facet
    pub const fn is_temporal(&self) -> bool {
        matches!(self, Self::DateTimeOffset | Self::Duration)
    }

    /// Kinds usable as an enum underlying type
    pub const fn is_integral(&self) -> bool {
        matches!(
            self,
            Self::Byte | Self::SByte | Self::Int16 | Self::Int32 | Self::Int64
        )
    }

    pub const fn is_numeric(&self) -> bool {
        self.is_integral() || matches!(self, Self::Decimal | Self::Double | Self::Single)
    }

    /// Default spatial reference identifier
    ///
    /// 4326 (WGS 84) for geography, 0 for geometry, `None` for other kinds.
    pub const fn default_srid(&self) -> Option<i32> {
        if self.is_geography() {
            Some(4326)
        } else if self.is_geometry() {
            Some(0)
        } else {
            None
        }
    }
}

impl fmt::Display for PrimitiveTypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A built-in primitive type
///
/// Exactly one instance exists per kind; obtain it through
/// [`primitive_type`] or the core model.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct PrimitiveType {
    kind: PrimitiveTypeKind,
}

impl PrimitiveType {
    pub fn kind(&self) -> PrimitiveTypeKind {
        self.kind
    }

    pub fn namespace(&self) -> &'static str {
        EDM_NAMESPACE
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn full_name(&self) -> String {
        format!("{}.{}", EDM_NAMESPACE, self.kind.name())
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", EDM_NAMESPACE, self.kind.name())
    }
}

// Indexed by `kind as usize`; ALL is listed in declaration order.
static PRIMITIVE_TYPES: Lazy<Vec<PrimitiveType>> = Lazy::new(|| {
    PrimitiveTypeKind::ALL
        .iter()
        .map(|&kind| PrimitiveType { kind })
        .collect()
});

static PRIMITIVE_TYPES_BY_NAME: Lazy<HashMap<String, &'static PrimitiveType>> = Lazy::new(|| {
    let mut map = HashMap::with_capacity(PrimitiveTypeKind::ALL.len() * 2);
    for primitive in PRIMITIVE_TYPES.iter() {
        map.insert(primitive.name().to_string(), primitive);
        map.insert(primitive.full_name(), primitive);
    }
    map
});

/// Get the singleton for a primitive kind
pub fn primitive_type(kind: PrimitiveTypeKind) -> &'static PrimitiveType {
    &PRIMITIVE_TYPES[kind as usize]
}

/// Find a primitive type by name, qualified (`Edm.Int32`) or not (`Int32`)
pub fn find_primitive_type(name: &str) -> Option<&'static PrimitiveType> {
    PRIMITIVE_TYPES_BY_NAME.get(name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singleton_per_kind() {
        for kind in PrimitiveTypeKind::ALL {
            let primitive = primitive_type(kind);
            assert_eq!(primitive.kind(), kind);
            assert!(std::ptr::eq(primitive, primitive_type(kind)));
        }
    }

    #[test]
    fn test_find_by_name() {
        let qualified = find_primitive_type("Edm.Int32").unwrap();
        let short = find_primitive_type("Int32").unwrap();
        assert!(std::ptr::eq(qualified, short));
        assert_eq!(qualified.full_name(), "Edm.Int32");

        assert!(find_primitive_type("Edm.Int128").is_none());
        assert!(find_primitive_type("edm.int32").is_none());
    }

    #[test]
    fn test_kind_classification() {
        assert!(PrimitiveTypeKind::GeographyPoint.is_spatial());
        assert!(PrimitiveTypeKind::GeometryMultiPoint.is_geometry());
        assert!(!PrimitiveTypeKind::Date.is_temporal());
        assert!(PrimitiveTypeKind::Duration.is_temporal());
        assert!(PrimitiveTypeKind::SByte.is_integral());
        assert!(!PrimitiveTypeKind::Decimal.is_integral());

        assert_eq!(PrimitiveTypeKind::Geography.default_srid(), Some(4326));
        assert_eq!(PrimitiveTypeKind::GeometryPolygon.default_srid(), Some(0));
        assert_eq!(PrimitiveTypeKind::String.default_srid(), None);
    }
}
