//! Path segments and resource paths

use crate::{reject, ConstantValue, PathSegmentHandler, PathSegmentTranslator};
use edmlib_diagnostics::{ErrorCode, Result};
use edmlib_model::{
    CoreModel, EdmType, EntitySet, EntityType, NavigationProperty, NavigationSource, Singleton,
    StructuralProperty, TypeReference,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Discriminator of [`PathSegment`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathSegmentKind {
    EntitySet,
    Singleton,
    Type,
    NavigationProperty,
    Property,
    Key,
    Count,
    Value,
    Metadata,
}

/// One step of a resource path
#[derive(Debug, Clone)]
pub enum PathSegment {
    EntitySet(EntitySetSegment),
    Singleton(SingletonSegment),
    Type(TypeSegment),
    NavigationProperty(NavigationPropertySegment),
    Property(PropertySegment),
    Key(KeySegment),
    Count(CountSegment),
    Value(ValueSegment),
    Metadata(MetadataSegment),
}

impl PathSegment {
    pub fn kind(&self) -> PathSegmentKind {
        match self {
            Self::EntitySet(_) => PathSegmentKind::EntitySet,
            Self::Singleton(_) => PathSegmentKind::Singleton,
            Self::Type(_) => PathSegmentKind::Type,
            Self::NavigationProperty(_) => PathSegmentKind::NavigationProperty,
            Self::Property(_) => PathSegmentKind::Property,
            Self::Key(_) => PathSegmentKind::Key,
            Self::Count(_) => PathSegmentKind::Count,
            Self::Value(_) => PathSegmentKind::Value,
            Self::Metadata(_) => PathSegmentKind::Metadata,
        }
    }

    /// Type of the resource reached by this segment; `None` for `$metadata`
    pub fn edm_type(&self) -> Option<EdmType> {
        match self {
            Self::EntitySet(s) => Some(s.edm_type()),
            Self::Singleton(s) => Some(s.edm_type()),
            Self::Type(s) => Some(s.edm_type().clone()),
            Self::NavigationProperty(s) => Some(s.edm_type()),
            Self::Property(s) => Some(s.edm_type()),
            Self::Key(s) => Some(s.edm_type()),
            Self::Count(s) => Some(s.edm_type()),
            Self::Value(s) => Some(s.edm_type().clone()),
            Self::Metadata(_) => None,
        }
    }

    /// Navigation source reached by this segment, if any
    pub fn navigation_source(&self) -> Option<NavigationSource> {
        match self {
            Self::EntitySet(s) => Some(s.navigation_source()),
            Self::Singleton(s) => Some(s.navigation_source()),
            Self::Type(s) => s.navigation_source().cloned(),
            Self::NavigationProperty(s) => s.navigation_source().cloned(),
            Self::Key(s) => s.navigation_source().cloned(),
            Self::Property(_) | Self::Count(_) | Self::Value(_) | Self::Metadata(_) => None,
        }
    }

    /// Text of the segment as written in a URL
    pub fn identifier(&self) -> String {
        match self {
            Self::EntitySet(s) => s.entity_set().name().to_string(),
            Self::Singleton(s) => s.singleton().name().to_string(),
            Self::Type(s) => s.edm_type().full_name(),
            Self::NavigationProperty(s) => s.navigation_property().name().to_string(),
            Self::Property(s) => s.property().name().to_string(),
            Self::Key(s) => s.to_string(),
            Self::Count(_) => "$count".to_string(),
            Self::Value(_) => "$value".to_string(),
            Self::Metadata(_) => "$metadata".to_string(),
        }
    }

    /// Whether the segment reaches at most one resource
    pub fn is_single_result(&self) -> bool {
        match self {
            Self::EntitySet(_) | Self::Metadata(_) => false,
            Self::Singleton(_) | Self::Key(_) | Self::Count(_) | Self::Value(_) => true,
            Self::Type(s) => !matches!(s.edm_type(), EdmType::Collection(_)),
            Self::NavigationProperty(s) => s.navigation_property().target_multiplicity().is_single(),
            Self::Property(s) => !s.property().type_ref().is_collection(),
        }
    }

    pub fn translate_with<T>(&self, translator: &mut impl PathSegmentTranslator<T>) -> T {
        match self {
            Self::EntitySet(s) => translator.translate_entity_set(s),
            Self::Singleton(s) => translator.translate_singleton(s),
            Self::Type(s) => translator.translate_type(s),
            Self::NavigationProperty(s) => translator.translate_navigation_property(s),
            Self::Property(s) => translator.translate_property(s),
            Self::Key(s) => translator.translate_key(s),
            Self::Count(s) => translator.translate_count(s),
            Self::Value(s) => translator.translate_value(s),
            Self::Metadata(s) => translator.translate_metadata(s),
        }
    }

    pub fn handle_with(&self, handler: &mut impl PathSegmentHandler) {
        match self {
            Self::EntitySet(s) => handler.handle_entity_set(s),
            Self::Singleton(s) => handler.handle_singleton(s),
            Self::Type(s) => handler.handle_type(s),
            Self::NavigationProperty(s) => handler.handle_navigation_property(s),
            Self::Property(s) => handler.handle_property(s),
            Self::Key(s) => handler.handle_key(s),
            Self::Count(s) => handler.handle_count(s),
            Self::Value(s) => handler.handle_value(s),
            Self::Metadata(s) => handler.handle_metadata(s),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EntitySetSegment {
    entity_set: Arc<EntitySet>,
}

impl EntitySetSegment {
    pub fn new(entity_set: Arc<EntitySet>) -> Self {
        Self { entity_set }
    }

    pub fn entity_set(&self) -> &Arc<EntitySet> {
        &self.entity_set
    }

    pub fn edm_type(&self) -> EdmType {
        CoreModel::instance()
            .get_collection(TypeReference::entity(self.entity_set.entity_type(), false))
            .definition()
            .clone()
    }

    pub fn navigation_source(&self) -> NavigationSource {
        NavigationSource::EntitySet(self.entity_set.clone())
    }
}

#[derive(Debug, Clone)]
pub struct SingletonSegment {
    singleton: Arc<Singleton>,
}

impl SingletonSegment {
    pub fn new(singleton: Arc<Singleton>) -> Self {
        Self { singleton }
    }

    pub fn singleton(&self) -> &Arc<Singleton> {
        &self.singleton
    }

    pub fn edm_type(&self) -> EdmType {
        self.singleton.entity_type().as_type()
    }

    pub fn navigation_source(&self) -> NavigationSource {
        NavigationSource::Singleton(self.singleton.clone())
    }
}

/// A cast of the previous segment's resource to a related type
#[derive(Debug, Clone)]
pub struct TypeSegment {
    target_type: EdmType,
    expected_type: EdmType,
    navigation_source: Option<NavigationSource>,
}

impl TypeSegment {
    /// Create a cast from `expected_type` to `target_type`
    ///
    /// Fails when the two types are not related by inheritance, or when the
    /// navigation source holds entities unrelated to the target. Collections
    /// are compared by element type.
    pub fn new(
        target_type: EdmType,
        expected_type: EdmType,
        navigation_source: Option<NavigationSource>,
    ) -> Result<Self> {
        if !element_of(&target_type).is_related_to(&element_of(&expected_type)) {
            return Err(reject(
                ErrorCode::INCOMPATIBLE_TYPE_CAST,
                format!(
                    "type {} is not related to {}",
                    target_type.full_name(),
                    expected_type.full_name()
                ),
            ));
        }
        if let Some(source) = &navigation_source {
            let source_type = source.entity_type().as_type();
            if !element_of(&target_type).is_related_to(&source_type) {
                return Err(reject(
                    ErrorCode::INCOMPATIBLE_TYPE_CAST,
                    format!(
                        "type {} is not related to the entities of '{}'",
                        target_type.full_name(),
                        source.name()
                    ),
                ));
            }
        }
        Ok(Self {
            target_type,
            expected_type,
            navigation_source,
        })
    }

    pub fn edm_type(&self) -> &EdmType {
        &self.target_type
    }

    pub fn expected_type(&self) -> &EdmType {
        &self.expected_type
    }

    pub fn navigation_source(&self) -> Option<&NavigationSource> {
        self.navigation_source.as_ref()
    }
}

fn element_of(edm_type: &EdmType) -> EdmType {
    match edm_type {
        EdmType::Collection(c) => c.element_type().definition().clone(),
        other => other.clone(),
    }
}

#[derive(Debug, Clone)]
pub struct NavigationPropertySegment {
    navigation_property: Arc<NavigationProperty>,
    navigation_source: Option<NavigationSource>,
}

impl NavigationPropertySegment {
    pub fn new(navigation_property: Arc<NavigationProperty>, navigation_source: Option<NavigationSource>) -> Self {
        Self {
            navigation_property,
            navigation_source,
        }
    }

    pub fn navigation_property(&self) -> &Arc<NavigationProperty> {
        &self.navigation_property
    }

    pub fn navigation_source(&self) -> Option<&NavigationSource> {
        self.navigation_source.as_ref()
    }

    pub fn edm_type(&self) -> EdmType {
        self.navigation_property.type_ref().definition().clone()
    }
}

#[derive(Debug, Clone)]
pub struct PropertySegment {
    property: Arc<StructuralProperty>,
}

impl PropertySegment {
    pub fn new(property: Arc<StructuralProperty>) -> Self {
        Self { property }
    }

    pub fn property(&self) -> &Arc<StructuralProperty> {
        &self.property
    }

    pub fn edm_type(&self) -> EdmType {
        self.property.type_ref().definition().clone()
    }
}

/// Key values naming a single entity, in key order
pub type KeyValues = SmallVec<[(String, ConstantValue); 2]>;

#[derive(Debug, Clone)]
pub struct KeySegment {
    keys: KeyValues,
    entity_type: Arc<EntityType>,
    navigation_source: Option<NavigationSource>,
}

impl KeySegment {
    /// Fails when no key value is given
    pub fn new(
        keys: impl IntoIterator<Item = (String, ConstantValue)>,
        entity_type: Arc<EntityType>,
        navigation_source: Option<NavigationSource>,
    ) -> Result<Self> {
        let keys: KeyValues = keys.into_iter().collect();
        if keys.is_empty() {
            return Err(reject(
                ErrorCode::EMPTY_KEY_LOOKUP,
                format!("key lookup on {} has no key values", entity_type.full_name()),
            ));
        }
        Ok(Self {
            keys,
            entity_type,
            navigation_source,
        })
    }

    pub fn keys(&self) -> &[(String, ConstantValue)] {
        &self.keys
    }

    pub fn entity_type(&self) -> &Arc<EntityType> {
        &self.entity_type
    }

    pub fn navigation_source(&self) -> Option<&NavigationSource> {
        self.navigation_source.as_ref()
    }

    pub fn edm_type(&self) -> EdmType {
        self.entity_type.as_type()
    }
}

impl fmt::Display for KeySegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        if let [(_, value)] = self.keys.as_slice() {
            write!(f, "{value}")?;
        } else {
            for (i, (name, value)) in self.keys.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{name}={value}")?;
            }
        }
        f.write_str(")")
    }
}

#[derive(Debug, Clone, Default)]
pub struct CountSegment;

impl CountSegment {
    pub fn edm_type(&self) -> EdmType {
        CoreModel::instance().get_int32(false).definition().clone()
    }
}

/// The raw value of the previous segment's resource
#[derive(Debug, Clone)]
pub struct ValueSegment {
    edm_type: EdmType,
}

impl ValueSegment {
    pub fn new(edm_type: EdmType) -> Self {
        Self { edm_type }
    }

    pub fn edm_type(&self) -> &EdmType {
        &self.edm_type
    }
}

#[derive(Debug, Clone, Default)]
pub struct MetadataSegment;

/// An ordered resource path
#[derive(Debug, Clone, Default)]
pub struct ODataPath {
    segments: Vec<PathSegment>,
}

impl ODataPath {
    pub fn new(segments: impl IntoIterator<Item = PathSegment>) -> Self {
        Self {
            segments: segments.into_iter().collect(),
        }
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    pub fn first_segment(&self) -> Option<&PathSegment> {
        self.segments.first()
    }

    pub fn last_segment(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathSegment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Navigation source of the last segment that reaches one
    pub fn navigation_source(&self) -> Option<NavigationSource> {
        self.segments.iter().rev().find_map(PathSegment::navigation_source)
    }

    /// Type of the resource the whole path reaches
    pub fn edm_type(&self) -> Option<EdmType> {
        self.last_segment().and_then(PathSegment::edm_type)
    }

    /// Translate every segment in order
    pub fn translate_with<T>(&self, translator: &mut impl PathSegmentTranslator<T>) -> Vec<T> {
        self.segments.iter().map(|s| s.translate_with(translator)).collect()
    }

    pub fn walk_with_handler(&self, handler: &mut impl PathSegmentHandler) {
        for segment in &self.segments {
            segment.handle_with(handler);
        }
    }
}

impl<'a> IntoIterator for &'a ODataPath {
    type Item = &'a PathSegment;
    type IntoIter = std::slice::Iter<'a, PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl fmt::Display for ODataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 && !matches!(segment, PathSegment::Key(_)) {
                f.write_str("/")?;
            }
            f.write_str(&segment.identifier())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edmlib_model::{EntityContainer, Multiplicity, NavigationPropertyInfo};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_key_segment_display() {
        let order = EntityType::new("NS", "Order", None, false, false, false);
        let single = KeySegment::new([("Id".to_string(), ConstantValue::Int32(7))], order.clone(), None).unwrap();
        assert_eq!(single.to_string(), "(7)");

        let compound = KeySegment::new(
            [
                ("Id".to_string(), ConstantValue::Int32(7)),
                ("Line".to_string(), ConstantValue::String("a".into())),
            ],
            order,
            None,
        )
        .unwrap();
        assert_eq!(compound.to_string(), "(Id=7,Line='a')");
    }

    #[test]
    fn test_path_display_and_source() {
        let customer = EntityType::new("NS", "Customer", None, false, false, false);
        let order = EntityType::new("NS", "Order", None, false, false, false);
        let (orders_nav, _) = customer
            .add_bidirectional_navigation(NavigationPropertyInfo::new("Orders", &order, Multiplicity::Many), None)
            .unwrap();
        let container = EntityContainer::new("NS", "Default");
        let customers = container.add_entity_set("Customers", customer.clone());
        let orders = container.add_entity_set("Orders", order);
        customers.add_navigation_target(orders_nav.clone(), &NavigationSource::EntitySet(orders.clone()));

        let path = ODataPath::new([
            PathSegment::EntitySet(EntitySetSegment::new(customers.clone())),
            PathSegment::Key(
                KeySegment::new(
                    [("Id".to_string(), ConstantValue::Int32(1))],
                    customer,
                    Some(NavigationSource::EntitySet(customers)),
                )
                .unwrap(),
            ),
            PathSegment::NavigationProperty(NavigationPropertySegment::new(
                orders_nav,
                Some(NavigationSource::EntitySet(orders.clone())),
            )),
            PathSegment::Count(CountSegment),
        ]);

        assert_eq!(path.to_string(), "Customers(1)/Orders/$count");
        assert!(path.last_segment().is_some_and(PathSegment::is_single_result));
        assert!(path
            .navigation_source()
            .is_some_and(|s| s.same_source(&NavigationSource::EntitySet(orders))));
    }
}
