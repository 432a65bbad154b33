//! The EDM type family

use crate::{
    primitive_type, BadElement, ComplexType, EntityType, PrimitiveType, PrimitiveTypeKind,
    StructuredType, TypeReference, EDM_NAMESPACE,
};
use edmlib_diagnostics::{EdmError, EdmlibError, ErrorCode, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Discriminator of [`EdmType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Primitive,
    Entity,
    Complex,
    Enum,
    Collection,
    TypeDefinition,
    Path,
    EntityReference,
    Untyped,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Primitive => "primitive",
            Self::Entity => "entity",
            Self::Complex => "complex",
            Self::Enum => "enum",
            Self::Collection => "collection",
            Self::TypeDefinition => "type definition",
            Self::Path => "path",
            Self::EntityReference => "entity reference",
            Self::Untyped => "untyped",
        };
        f.write_str(name)
    }
}

/// Built-in path types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathTypeKind {
    AnnotationPath,
    PropertyPath,
    NavigationPropertyPath,
}

impl PathTypeKind {
    pub const ALL: [Self; 3] = [Self::AnnotationPath, Self::PropertyPath, Self::NavigationPropertyPath];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::AnnotationPath => "AnnotationPath",
            Self::PropertyPath => "PropertyPath",
            Self::NavigationPropertyPath => "NavigationPropertyPath",
        }
    }
}

/// An EDM type definition
///
/// Primitive types are process-wide singletons; every other kind is a shared
/// value built by the model loader. `Bad` stands in for a type that could
/// not be resolved and carries the errors explaining why.
#[derive(Clone)]
pub enum EdmType {
    Primitive(&'static PrimitiveType),
    Entity(Arc<EntityType>),
    Complex(Arc<ComplexType>),
    Enum(Arc<EnumType>),
    Collection(Arc<CollectionType>),
    TypeDefinition(Arc<TypeDefinition>),
    Path(PathTypeKind),
    EntityReference(Arc<EntityReferenceType>),
    Untyped,
    Bad(Arc<BadElement>),
}

impl EdmType {
    /// Primitive type for a kind
    pub fn primitive(kind: PrimitiveTypeKind) -> Self {
        Self::Primitive(primitive_type(kind))
    }

    /// Kind of this type
    ///
    /// A bad type reports the kind it stands in for, so consumers dispatching
    /// on kind take the same branch they would for the resolved type.
    pub fn type_kind(&self) -> TypeKind {
        match self {
            Self::Primitive(_) => TypeKind::Primitive,
            Self::Entity(_) => TypeKind::Entity,
            Self::Complex(_) => TypeKind::Complex,
            Self::Enum(_) => TypeKind::Enum,
            Self::Collection(_) => TypeKind::Collection,
            Self::TypeDefinition(_) => TypeKind::TypeDefinition,
            Self::Path(_) => TypeKind::Path,
            Self::EntityReference(_) => TypeKind::EntityReference,
            Self::Untyped => TypeKind::Untyped,
            Self::Bad(bad) => bad.kind().type_kind().unwrap_or(TypeKind::Untyped),
        }
    }

    /// Namespace of a named type; empty for collections, references and bad types
    pub fn namespace(&self) -> &str {
        match self {
            Self::Primitive(_) | Self::Path(_) | Self::Untyped => EDM_NAMESPACE,
            Self::Entity(t) => t.namespace(),
            Self::Complex(t) => t.namespace(),
            Self::Enum(t) => t.namespace(),
            Self::TypeDefinition(t) => t.namespace(),
            Self::Collection(_) | Self::EntityReference(_) | Self::Bad(_) => "",
        }
    }

    /// Unqualified name; empty for collections, references and bad types
    pub fn name(&self) -> &str {
        match self {
            Self::Primitive(p) => p.name(),
            Self::Entity(t) => t.name(),
            Self::Complex(t) => t.name(),
            Self::Enum(t) => t.name(),
            Self::TypeDefinition(t) => t.name(),
            Self::Path(kind) => kind.name(),
            Self::Untyped => "Untyped",
            Self::Collection(_) | Self::EntityReference(_) | Self::Bad(_) => "",
        }
    }

    /// Qualified name, `Collection(...)` and `Ref(...)` for the wrapping kinds
    pub fn full_name(&self) -> String {
        match self {
            Self::Collection(c) => format!("Collection({})", c.element_type().full_name()),
            Self::EntityReference(r) => format!("Ref({})", r.entity_type().full_name()),
            Self::Bad(_) => String::new(),
            other => format!("{}.{}", other.namespace(), other.name()),
        }
    }

    pub fn is_bad(&self) -> bool {
        matches!(self, Self::Bad(_))
    }

    /// Errors carried by this type or any type it wraps
    pub fn errors(&self) -> Vec<EdmError> {
        match self {
            Self::Bad(bad) => bad.errors().to_vec(),
            Self::Collection(c) => c.element_type().errors(),
            _ => Vec::new(),
        }
    }

    pub fn as_primitive(&self) -> Option<&'static PrimitiveType> {
        match self {
            Self::Primitive(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&Arc<EntityType>> {
        match self {
            Self::Entity(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_complex(&self) -> Option<&Arc<ComplexType>> {
        match self {
            Self::Complex(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&Arc<CollectionType>> {
        match self {
            Self::Collection(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&Arc<EnumType>> {
        match self {
            Self::Enum(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_bad(&self) -> Option<&Arc<BadElement>> {
        match self {
            Self::Bad(bad) => Some(bad),
            _ => None,
        }
    }

    /// View entity and complex types through their common capabilities
    pub fn as_structured(&self) -> Option<&dyn StructuredType> {
        match self {
            Self::Entity(t) => Some(t.as_ref()),
            Self::Complex(t) => Some(t.as_ref()),
            _ => None,
        }
    }

    /// Check whether this type equals `other` or derives from it
    pub fn is_or_inherits_from(&self, other: &EdmType) -> bool {
        match (self, other) {
            (Self::Entity(this), Self::Entity(that)) => this.is_or_inherits_from(that),
            (Self::Complex(this), Self::Complex(that)) => this.is_or_inherits_from(that),
            _ => self == other,
        }
    }

    /// Check whether either type derives from the other
    pub fn is_related_to(&self, other: &EdmType) -> bool {
        self.is_or_inherits_from(other) || other.is_or_inherits_from(self)
    }
}

impl PartialEq for EdmType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Primitive(a), Self::Primitive(b)) => a.kind() == b.kind(),
            (Self::Entity(a), Self::Entity(b)) => Arc::ptr_eq(a, b),
            (Self::Complex(a), Self::Complex(b)) => Arc::ptr_eq(a, b),
            (Self::Enum(a), Self::Enum(b)) => Arc::ptr_eq(a, b),
            (Self::TypeDefinition(a), Self::TypeDefinition(b)) => Arc::ptr_eq(a, b),
            (Self::Collection(a), Self::Collection(b)) => {
                Arc::ptr_eq(a, b) || a.element_type() == b.element_type()
            }
            (Self::EntityReference(a), Self::EntityReference(b)) => {
                Arc::ptr_eq(a.entity_type(), b.entity_type())
            }
            (Self::Path(a), Self::Path(b)) => a == b,
            (Self::Untyped, Self::Untyped) => true,
            (Self::Bad(a), Self::Bad(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for EdmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bad(bad) => f.debug_tuple("Bad").field(&bad.errors()).finish(),
            other => write!(f, "{:?}({})", other.type_kind(), other.full_name()),
        }
    }
}

impl fmt::Display for EdmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bad(bad) => write!(f, "{bad}"),
            other => f.write_str(&other.full_name()),
        }
    }
}

impl From<Arc<EntityType>> for EdmType {
    fn from(t: Arc<EntityType>) -> Self {
        Self::Entity(t)
    }
}

impl From<Arc<ComplexType>> for EdmType {
    fn from(t: Arc<ComplexType>) -> Self {
        Self::Complex(t)
    }
}

impl From<Arc<EnumType>> for EdmType {
    fn from(t: Arc<EnumType>) -> Self {
        Self::Enum(t)
    }
}

impl From<Arc<TypeDefinition>> for EdmType {
    fn from(t: Arc<TypeDefinition>) -> Self {
        Self::TypeDefinition(t)
    }
}

/// A collection over an element type reference
#[derive(Debug)]
pub struct CollectionType {
    element_type: TypeReference,
}

impl CollectionType {
    pub fn new(element_type: TypeReference) -> Arc<Self> {
        Arc::new(Self { element_type })
    }

    pub fn element_type(&self) -> &TypeReference {
        &self.element_type
    }
}

/// A reference to an entity of a given type
#[derive(Debug)]
pub struct EntityReferenceType {
    entity_type: Arc<EntityType>,
}

impl EntityReferenceType {
    pub fn new(entity_type: Arc<EntityType>) -> Arc<Self> {
        Arc::new(Self { entity_type })
    }

    pub fn entity_type(&self) -> &Arc<EntityType> {
        &self.entity_type
    }
}

/// A named member of an enum type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
}

/// An enum type over an integral primitive kind
pub struct EnumType {
    namespace: String,
    name: String,
    underlying_type: PrimitiveTypeKind,
    is_flags: bool,
    members: RwLock<Vec<EnumMember>>,
}

impl EnumType {
    /// Create a new enum type
    ///
    /// Fails when `underlying_type` is not an integral kind.
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        underlying_type: PrimitiveTypeKind,
        is_flags: bool,
    ) -> Result<Arc<Self>> {
        let name = name.into();
        if !underlying_type.is_integral() {
            return Err(EdmlibError::contract(
                ErrorCode::INVALID_ENUM_UNDERLYING_TYPE,
                format!("enum '{name}' cannot use {underlying_type} as its underlying type"),
            ));
        }
        Ok(Arc::new(Self {
            namespace: namespace.into(),
            name,
            underlying_type,
            is_flags,
            members: RwLock::new(Vec::new()),
        }))
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

    pub fn underlying_type(&self) -> PrimitiveTypeKind {
        self.underlying_type
    }

    pub fn is_flags(&self) -> bool {
        self.is_flags
    }

    /// Append a member
    pub fn add_member(&self, name: impl Into<String>, value: i64) -> EnumMember {
        let member = EnumMember {
            name: name.into(),
            value,
        };
        self.members.write().push(member.clone());
        member
    }

    pub fn members(&self) -> Vec<EnumMember> {
        self.members.read().clone()
    }

    pub fn find_member(&self, name: &str) -> Option<EnumMember> {
        self.members.read().iter().find(|m| m.name == name).cloned()
    }
}

impl fmt::Debug for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumType")
            .field("name", &self.full_name())
            .field("underlying_type", &self.underlying_type)
            .field("members", &self.members.read().len())
            .finish()
    }
}

/// A named alias over a primitive type
#[derive(Debug)]
pub struct TypeDefinition {
    namespace: String,
    name: String,
    underlying_type: PrimitiveTypeKind,
}

impl TypeDefinition {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        underlying_type: PrimitiveTypeKind,
    ) -> Arc<Self> {
        Arc::new(Self {
            namespace: namespace.into(),
            name: name.into(),
            underlying_type,
        })
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

    pub fn underlying_type(&self) -> PrimitiveTypeKind {
        self.underlying_type
    }
}
