//! Entity and complex types

use crate::property::DeclaringType;
use crate::{
    ConcurrencyMode, EdmType, NavigationProperty, NavigationPropertyInfo, Property,
    StructuralProperty, TypeReference,
};
use edmlib_diagnostics::{EdmlibError, ErrorCode, Result};
use parking_lot::RwLock;
use std::fmt;
use std::sync::{Arc, Weak};

/// Capabilities shared by entity and complex types
pub trait StructuredType: Send + Sync {
    fn namespace(&self) -> &str;

    fn name(&self) -> &str;

    fn full_name(&self) -> String {
        format!("{}.{}", self.namespace(), self.name())
    }

    fn is_abstract(&self) -> bool;

    fn is_open(&self) -> bool;

    /// The direct base type
    fn base_structured_type(&self) -> Option<Arc<dyn StructuredType>>;

    /// Properties declared on this type, in declaration order
    fn declared_properties(&self) -> Vec<Property>;

    /// Inherited properties first, then declared ones
    fn properties(&self) -> Vec<Property> {
        let mut properties = self
            .base_structured_type()
            .map(|base| base.properties())
            .unwrap_or_default();
        properties.extend(self.declared_properties());
        properties
    }

    /// Find a property by name, searching declared properties before the base chain
    fn find_property(&self, name: &str) -> Option<Property> {
        self.declared_properties()
            .into_iter()
            .find(|p| p.name() == name)
            .or_else(|| self.base_structured_type().and_then(|base| base.find_property(name)))
    }

    fn declared_structural_properties(&self) -> Vec<Arc<StructuralProperty>> {
        self.declared_properties()
            .into_iter()
            .filter_map(|p| p.as_structural().cloned())
            .collect()
    }

    fn structural_properties(&self) -> Vec<Arc<StructuralProperty>> {
        self.properties()
            .into_iter()
            .filter_map(|p| p.as_structural().cloned())
            .collect()
    }
}

/// An entity type: a keyed structured type that can be navigated to
pub struct EntityType {
    namespace: String,
    name: String,
    base_type: Option<Arc<EntityType>>,
    is_abstract: bool,
    is_open: bool,
    has_stream: bool,
    properties: RwLock<Vec<Property>>,
    declared_key: RwLock<Option<Vec<Arc<StructuralProperty>>>>,
    this: Weak<EntityType>,
}

impl EntityType {
    /// Create a new entity type
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        base_type: Option<Arc<EntityType>>,
        is_abstract: bool,
        is_open: bool,
        has_stream: bool,
    ) -> Arc<Self> {
        let (namespace, name) = (namespace.into(), name.into());
        Arc::new_cyclic(|this| Self {
            namespace,
            name,
            base_type,
            is_abstract,
            is_open,
            has_stream,
            properties: RwLock::new(Vec::new()),
            declared_key: RwLock::new(None),
            this: this.clone(),
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

    pub fn base_type(&self) -> Option<&Arc<EntityType>> {
        self.base_type.as_ref()
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Whether this type or any ancestor has a media stream
    pub fn has_stream(&self) -> bool {
        self.has_stream || self.base_type.as_ref().is_some_and(|base| base.has_stream())
    }

    /// Check whether this type is `other` or derives from it
    pub fn is_or_inherits_from(&self, other: &EntityType) -> bool {
        let mut current = Some(self);
        while let Some(entity) = current {
            if std::ptr::eq(entity, other) {
                return true;
            }
            current = entity.base_type.as_deref();
        }
        false
    }

    pub fn as_type(self: &Arc<Self>) -> EdmType {
        EdmType::Entity(self.clone())
    }

    /// Append a structural property
    pub fn add_structural_property(
        &self,
        name: impl Into<String>,
        type_ref: TypeReference,
    ) -> Arc<StructuralProperty> {
        self.add_structural_property_with(name, type_ref, None, ConcurrencyMode::None)
    }

    /// Append a structural property with a default value and concurrency mode
    pub fn add_structural_property_with(
        &self,
        name: impl Into<String>,
        type_ref: TypeReference,
        default_value: Option<String>,
        concurrency_mode: ConcurrencyMode,
    ) -> Arc<StructuralProperty> {
        let property = StructuralProperty::new(
            DeclaringType::Entity(self.this.clone()),
            name.into(),
            type_ref,
            default_value,
            concurrency_mode,
        );
        self.properties.write().push(Property::Structural(property.clone()));
        property
    }

    /// Append properties to the declared key
    ///
    /// Duplicates are kept and membership in this type is not checked.
    pub fn add_keys(&self, keys: impl IntoIterator<Item = Arc<StructuralProperty>>) {
        self.declared_key
            .write()
            .get_or_insert_with(Vec::new)
            .extend(keys);
    }

    /// The key declared on this type, without looking at ancestors
    pub fn declared_key(&self) -> Option<Vec<Arc<StructuralProperty>>> {
        self.declared_key.read().clone()
    }

    /// The nearest declared key along the base chain
    pub fn key(&self) -> Option<Vec<Arc<StructuralProperty>>> {
        self.declared_key()
            .or_else(|| self.base_type.as_ref().and_then(|base| base.key()))
    }

    /// Append a navigation property without a partner
    pub fn add_unidirectional_navigation(&self, info: NavigationPropertyInfo) -> Result<Arc<NavigationProperty>> {
        let this = self.shared()?;
        let property = NavigationProperty::create_unidirectional(&this, info)?;
        self.properties.write().push(Property::Navigation(property.clone()));
        Ok(property)
    }

    /// Append a navigation property here and its partner on the target
    ///
    /// Partner details the caller leaves out default to a name of
    /// `<name>Partner`, this type as target and ZeroOrOne multiplicity.
    pub fn add_bidirectional_navigation(
        &self,
        info: NavigationPropertyInfo,
        partner_info: Option<NavigationPropertyInfo>,
    ) -> Result<(Arc<NavigationProperty>, Arc<NavigationProperty>)> {
        let this = self.shared()?;
        let (forward, partner) = NavigationProperty::create_bidirectional(&this, info, partner_info)?;

        self.properties.write().push(Property::Navigation(forward.clone()));
        if let Some(target) = partner.declaring_type() {
            target.properties.write().push(Property::Navigation(partner.clone()));
        }
        Ok((forward, partner))
    }

    pub fn declared_navigation_properties(&self) -> Vec<Arc<NavigationProperty>> {
        self.properties
            .read()
            .iter()
            .filter_map(|p| p.as_navigation().cloned())
            .collect()
    }

    /// Navigation properties including inherited ones
    pub fn navigation_properties(&self) -> Vec<Arc<NavigationProperty>> {
        let mut properties = self
            .base_type
            .as_ref()
            .map(|base| base.navigation_properties())
            .unwrap_or_default();
        properties.extend(self.declared_navigation_properties());
        properties
    }

    pub fn find_navigation_property(&self, name: &str) -> Option<Arc<NavigationProperty>> {
        StructuredType::find_property(self, name).and_then(|p| p.as_navigation().cloned())
    }

    pub fn find_structural_property(&self, name: &str) -> Option<Arc<StructuralProperty>> {
        StructuredType::find_property(self, name).and_then(|p| p.as_structural().cloned())
    }

    fn shared(&self) -> Result<Arc<Self>> {
        self.this.upgrade().ok_or_else(|| {
            EdmlibError::contract(
                ErrorCode::NAVIGATION_TARGET_NOT_ENTITY,
                format!("entity type '{}' is being dropped", self.full_name()),
            )
        })
    }
}

impl StructuredType for EntityType {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    fn is_open(&self) -> bool {
        self.is_open
    }

    fn base_structured_type(&self) -> Option<Arc<dyn StructuredType>> {
        self.base_type
            .clone()
            .map(|base| base as Arc<dyn StructuredType>)
    }

    fn declared_properties(&self) -> Vec<Property> {
        self.properties.read().clone()
    }
}

impl fmt::Debug for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityType")
            .field("name", &self.full_name())
            .field("base_type", &self.base_type.as_ref().map(|b| b.full_name()))
            .field("properties", &self.properties.read().len())
            .finish()
    }
}

/// A complex type: a keyless structured type used as a property value
pub struct ComplexType {
    namespace: String,
    name: String,
    base_type: Option<Arc<ComplexType>>,
    is_abstract: bool,
    is_open: bool,
    properties: RwLock<Vec<Property>>,
    this: Weak<ComplexType>,
}

impl ComplexType {
    /// Create a new complex type
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        base_type: Option<Arc<ComplexType>>,
        is_abstract: bool,
        is_open: bool,
    ) -> Arc<Self> {
        let (namespace, name) = (namespace.into(), name.into());
        Arc::new_cyclic(|this| Self {
            namespace,
            name,
            base_type,
            is_abstract,
            is_open,
            properties: RwLock::new(Vec::new()),
            this: this.clone(),
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

    pub fn base_type(&self) -> Option<&Arc<ComplexType>> {
        self.base_type.as_ref()
    }

    pub fn is_or_inherits_from(&self, other: &ComplexType) -> bool {
        let mut current = Some(self);
        while let Some(complex) = current {
            if std::ptr::eq(complex, other) {
                return true;
            }
            current = complex.base_type.as_deref();
        }
        false
    }

    pub fn as_type(self: &Arc<Self>) -> EdmType {
        EdmType::Complex(self.clone())
    }

    /// Append a structural property
    pub fn add_structural_property(
        &self,
        name: impl Into<String>,
        type_ref: TypeReference,
    ) -> Arc<StructuralProperty> {
        let property = StructuralProperty::new(
            DeclaringType::Complex(self.this.clone()),
            name.into(),
            type_ref,
            None,
            ConcurrencyMode::None,
        );
        self.properties.write().push(Property::Structural(property.clone()));
        property
    }
}

impl StructuredType for ComplexType {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    fn is_open(&self) -> bool {
        self.is_open
    }

    fn base_structured_type(&self) -> Option<Arc<dyn StructuredType>> {
        self.base_type
            .clone()
            .map(|base| base as Arc<dyn StructuredType>)
    }

    fn declared_properties(&self) -> Vec<Property> {
        self.properties.read().clone()
    }
}

impl fmt::Debug for ComplexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComplexType")
            .field("name", &self.full_name())
            .field("base_type", &self.base_type.as_ref().map(|b| b.full_name()))
            .field("properties", &self.properties.read().len())
            .finish()
    }
}
