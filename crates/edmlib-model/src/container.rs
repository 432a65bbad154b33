//! Entity containers and navigation sources

use crate::{EntityType, NavigationProperty, Operation};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Weak};

/// Discriminator of [`NavigationSource`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavigationSourceKind {
    EntitySet,
    Singleton,
}

#[derive(Clone)]
enum WeakSource {
    EntitySet(Weak<EntitySet>),
    Singleton(Weak<Singleton>),
}

impl WeakSource {
    fn upgrade(&self) -> Option<NavigationSource> {
        match self {
            Self::EntitySet(weak) => weak.upgrade().map(NavigationSource::EntitySet),
            Self::Singleton(weak) => weak.upgrade().map(NavigationSource::Singleton),
        }
    }
}

/// Binds a navigation property of a source to the source its targets live in
#[derive(Clone)]
pub struct NavigationPropertyBinding {
    navigation_property: Arc<NavigationProperty>,
    target: WeakSource,
}

impl NavigationPropertyBinding {
    pub fn navigation_property(&self) -> &Arc<NavigationProperty> {
        &self.navigation_property
    }

    /// The bound target, while it is alive
    pub fn target(&self) -> Option<NavigationSource> {
        self.target.upgrade()
    }
}

impl fmt::Debug for NavigationPropertyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationPropertyBinding")
            .field("navigation_property", &self.navigation_property.name())
            .field("target", &self.target().map(|t| t.name().to_string()))
            .finish()
    }
}

#[derive(Default)]
struct Bindings(RwLock<Vec<NavigationPropertyBinding>>);

impl Bindings {
    fn add(&self, navigation_property: Arc<NavigationProperty>, target: &NavigationSource) {
        let target = match target {
            NavigationSource::EntitySet(set) => WeakSource::EntitySet(Arc::downgrade(set)),
            NavigationSource::Singleton(single) => WeakSource::Singleton(Arc::downgrade(single)),
        };
        self.0.write().push(NavigationPropertyBinding {
            navigation_property,
            target,
        });
    }

    fn find(&self, navigation_property: &NavigationProperty) -> Option<NavigationSource> {
        self.0
            .read()
            .iter()
            .find(|b| std::ptr::eq(b.navigation_property.as_ref(), navigation_property))
            .and_then(NavigationPropertyBinding::target)
    }

    fn all(&self) -> Vec<NavigationPropertyBinding> {
        self.0.read().clone()
    }
}

/// A named collection of entities
pub struct EntitySet {
    name: String,
    entity_type: Arc<EntityType>,
    bindings: Bindings,
}

impl EntitySet {
    pub fn new(name: impl Into<String>, entity_type: Arc<EntityType>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            entity_type,
            bindings: Bindings::default(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entity_type(&self) -> &Arc<EntityType> {
        &self.entity_type
    }

    /// Bind a navigation property to the source holding its targets
    pub fn add_navigation_target(&self, navigation_property: Arc<NavigationProperty>, target: &NavigationSource) {
        self.bindings.add(navigation_property, target);
    }

    pub fn navigation_bindings(&self) -> Vec<NavigationPropertyBinding> {
        self.bindings.all()
    }
}

impl fmt::Debug for EntitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntitySet")
            .field("name", &self.name)
            .field("entity_type", &self.entity_type.full_name())
            .finish()
    }
}

/// A single named entity
pub struct Singleton {
    name: String,
    entity_type: Arc<EntityType>,
    bindings: Bindings,
}

impl Singleton {
    pub fn new(name: impl Into<String>, entity_type: Arc<EntityType>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            entity_type,
            bindings: Bindings::default(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entity_type(&self) -> &Arc<EntityType> {
        &self.entity_type
    }

    pub fn add_navigation_target(&self, navigation_property: Arc<NavigationProperty>, target: &NavigationSource) {
        self.bindings.add(navigation_property, target);
    }

    pub fn navigation_bindings(&self) -> Vec<NavigationPropertyBinding> {
        self.bindings.all()
    }
}

impl fmt::Debug for Singleton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Singleton")
            .field("name", &self.name)
            .field("entity_type", &self.entity_type.full_name())
            .finish()
    }
}

/// Where entities reached by a query live
#[derive(Clone)]
pub enum NavigationSource {
    EntitySet(Arc<EntitySet>),
    Singleton(Arc<Singleton>),
}

impl NavigationSource {
    pub fn kind(&self) -> NavigationSourceKind {
        match self {
            Self::EntitySet(_) => NavigationSourceKind::EntitySet,
            Self::Singleton(_) => NavigationSourceKind::Singleton,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::EntitySet(set) => set.name(),
            Self::Singleton(single) => single.name(),
        }
    }

    pub fn entity_type(&self) -> &Arc<EntityType> {
        match self {
            Self::EntitySet(set) => set.entity_type(),
            Self::Singleton(single) => single.entity_type(),
        }
    }

    /// The source bound to `navigation_property`, if any
    pub fn find_navigation_target(&self, navigation_property: &NavigationProperty) -> Option<NavigationSource> {
        match self {
            Self::EntitySet(set) => set.bindings.find(navigation_property),
            Self::Singleton(single) => single.bindings.find(navigation_property),
        }
    }

    pub fn navigation_bindings(&self) -> Vec<NavigationPropertyBinding> {
        match self {
            Self::EntitySet(set) => set.navigation_bindings(),
            Self::Singleton(single) => single.navigation_bindings(),
        }
    }

    pub fn same_source(&self, other: &NavigationSource) -> bool {
        match (self, other) {
            (Self::EntitySet(a), Self::EntitySet(b)) => Arc::ptr_eq(a, b),
            (Self::Singleton(a), Self::Singleton(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl PartialEq for NavigationSource {
    fn eq(&self, other: &Self) -> bool {
        self.same_source(other)
    }
}

impl fmt::Debug for NavigationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EntitySet(set) => set.fmt(f),
            Self::Singleton(single) => single.fmt(f),
        }
    }
}

impl From<Arc<EntitySet>> for NavigationSource {
    fn from(set: Arc<EntitySet>) -> Self {
        Self::EntitySet(set)
    }
}

impl From<Arc<Singleton>> for NavigationSource {
    fn from(single: Arc<Singleton>) -> Self {
        Self::Singleton(single)
    }
}

/// An operation exposed at the container level
pub struct OperationImport {
    name: String,
    operation: Arc<Operation>,
    entity_set: Option<String>,
}

impl OperationImport {
    pub fn new(name: impl Into<String>, operation: Arc<Operation>, entity_set: Option<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            operation,
            entity_set,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn operation(&self) -> &Arc<Operation> {
        &self.operation
    }

    /// Name of the entity set returned entities belong to
    pub fn entity_set(&self) -> Option<&str> {
        self.entity_set.as_deref()
    }
}

impl fmt::Debug for OperationImport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationImport")
            .field("name", &self.name)
            .field("operation", &self.operation.full_name())
            .field("entity_set", &self.entity_set)
            .finish()
    }
}

/// Entity sets, singletons and operation imports of a model
pub struct EntityContainer {
    namespace: String,
    name: String,
    entity_sets: RwLock<IndexMap<String, Arc<EntitySet>>>,
    singletons: RwLock<IndexMap<String, Arc<Singleton>>>,
    operation_imports: RwLock<Vec<Arc<OperationImport>>>,
}

impl EntityContainer {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            namespace: namespace.into(),
            name: name.into(),
            entity_sets: RwLock::new(IndexMap::new()),
            singletons: RwLock::new(IndexMap::new()),
            operation_imports: RwLock::new(Vec::new()),
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

    /// Add an entity set; a later set with the same name replaces the earlier one
    pub fn add_entity_set(&self, name: impl Into<String>, entity_type: Arc<EntityType>) -> Arc<EntitySet> {
        let set = EntitySet::new(name, entity_type);
        self.entity_sets
            .write()
            .insert(set.name().to_string(), set.clone());
        set
    }

    pub fn add_singleton(&self, name: impl Into<String>, entity_type: Arc<EntityType>) -> Arc<Singleton> {
        let single = Singleton::new(name, entity_type);
        self.singletons
            .write()
            .insert(single.name().to_string(), single.clone());
        single
    }

    pub fn add_operation_import(
        &self,
        name: impl Into<String>,
        operation: Arc<Operation>,
        entity_set: Option<String>,
    ) -> Arc<OperationImport> {
        let import = OperationImport::new(name, operation, entity_set);
        self.operation_imports.write().push(import.clone());
        import
    }

    pub fn find_entity_set(&self, name: &str) -> Option<Arc<EntitySet>> {
        self.entity_sets.read().get(name).cloned()
    }

    pub fn find_singleton(&self, name: &str) -> Option<Arc<Singleton>> {
        self.singletons.read().get(name).cloned()
    }

    /// Find an entity set or singleton by name
    pub fn find_navigation_source(&self, name: &str) -> Option<NavigationSource> {
        self.find_entity_set(name)
            .map(NavigationSource::EntitySet)
            .or_else(|| self.find_singleton(name).map(NavigationSource::Singleton))
    }

    /// All imports with `name`; overloads share a name
    pub fn find_operation_imports(&self, name: &str) -> Vec<Arc<OperationImport>> {
        self.operation_imports
            .read()
            .iter()
            .filter(|import| import.name() == name)
            .cloned()
            .collect()
    }

    pub fn entity_sets(&self) -> Vec<Arc<EntitySet>> {
        self.entity_sets.read().values().cloned().collect()
    }

    pub fn singletons(&self) -> Vec<Arc<Singleton>> {
        self.singletons.read().values().cloned().collect()
    }

    pub fn operation_imports(&self) -> Vec<Arc<OperationImport>> {
        self.operation_imports.read().clone()
    }
}

impl fmt::Debug for EntityContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityContainer")
            .field("name", &self.full_name())
            .field("entity_sets", &self.entity_sets.read().len())
            .field("singletons", &self.singletons.read().len())
            .field("operation_imports", &self.operation_imports.read().len())
            .finish()
    }
}
