//! The model container and its total resolvers

use crate::{
    BadElement, Checked, CoreModel, EdmType, EntityContainer, EntitySet, EntityType,
    NavigationProperty, Operation, Property, Term, TypeKind, TypeReference,
    VocabularyAnnotation,
};
use edmlib_annotations::{DirectValueAnnotationStore, Element};
use edmlib_diagnostics::EdmError;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// A schema model: declared types, terms, operations, one entity container
/// and the annotations attached to its elements
///
/// Filled by a loader, then read. Lookups that cannot fail come in two
/// flavors: `find_*` returns `None` on a miss, `resolve_*` returns a bad
/// element carrying the reason.
pub struct EdmModel {
    types: RwLock<IndexMap<String, EdmType>>,
    terms: RwLock<IndexMap<String, Arc<Term>>>,
    operations: RwLock<IndexMap<String, Vec<Arc<Operation>>>>,
    entity_container: RwLock<Option<Arc<EntityContainer>>>,
    vocabulary_annotations: RwLock<Vec<Arc<VocabularyAnnotation>>>,
    direct_value_annotations: DirectValueAnnotationStore,
}

impl EdmModel {
    /// Create an empty model
    pub fn new() -> Self {
        Self {
            types: RwLock::new(IndexMap::new()),
            terms: RwLock::new(IndexMap::new()),
            operations: RwLock::new(IndexMap::new()),
            entity_container: RwLock::new(None),
            vocabulary_annotations: RwLock::new(Vec::new()),
            direct_value_annotations: DirectValueAnnotationStore::new(),
        }
    }

    /// Declare a named schema type under its qualified name
    ///
    /// Collections, references and bad types have no name and are ignored.
    pub fn add_type(&self, schema_type: impl Into<EdmType>) {
        let schema_type = schema_type.into();
        match schema_type {
            EdmType::Entity(_) | EdmType::Complex(_) | EdmType::Enum(_) | EdmType::TypeDefinition(_) => {
                self.types.write().insert(schema_type.full_name(), schema_type);
            }
            other => log::debug!("not declaring unnamed type {other:?}"),
        }
    }

    pub fn add_term(&self, term: Arc<Term>) {
        self.terms.write().insert(term.full_name(), term);
    }

    /// Declare an operation; overloads accumulate under one name
    pub fn add_operation(&self, operation: Arc<Operation>) {
        self.operations
            .write()
            .entry(operation.full_name())
            .or_default()
            .push(operation);
    }

    pub fn set_entity_container(&self, container: Arc<EntityContainer>) {
        *self.entity_container.write() = Some(container);
    }

    pub fn add_vocabulary_annotation(&self, annotation: VocabularyAnnotation) -> Arc<VocabularyAnnotation> {
        let annotation = Arc::new(annotation);
        self.vocabulary_annotations.write().push(annotation.clone());
        annotation
    }

    pub fn entity_container(&self) -> Option<Arc<EntityContainer>> {
        self.entity_container.read().clone()
    }

    /// Annotation store for this model's elements
    pub fn direct_value_annotations(&self) -> &DirectValueAnnotationStore {
        &self.direct_value_annotations
    }

    /// Declared schema types in declaration order
    pub fn schema_types(&self) -> Vec<EdmType> {
        self.types.read().values().cloned().collect()
    }

    pub fn terms(&self) -> Vec<Arc<Term>> {
        self.terms.read().values().cloned().collect()
    }

    pub fn operations(&self) -> Vec<Arc<Operation>> {
        self.operations.read().values().flatten().cloned().collect()
    }

    pub fn vocabulary_annotations(&self) -> Vec<Arc<VocabularyAnnotation>> {
        self.vocabulary_annotations.read().clone()
    }

    /// Find a schema or built-in type by qualified name
    pub fn find_type(&self, qualified_name: &str) -> Option<EdmType> {
        self.types
            .read()
            .get(qualified_name)
            .cloned()
            .or_else(|| CoreModel::instance().find_declared_type(qualified_name))
    }

    pub fn find_term(&self, qualified_name: &str) -> Option<Arc<Term>> {
        self.terms.read().get(qualified_name).cloned()
    }

    pub fn find_operations(&self, qualified_name: &str) -> Vec<Arc<Operation>> {
        self.operations
            .read()
            .get(qualified_name)
            .cloned()
            .unwrap_or_default()
    }

    pub fn find_entity_set(&self, name: &str) -> Option<Arc<EntitySet>> {
        self.entity_container()
            .and_then(|container| container.find_entity_set(name))
    }

    /// Annotations whose target is `element`
    pub fn find_vocabulary_annotations(&self, element: impl Into<Element>) -> Vec<Arc<VocabularyAnnotation>> {
        let element = element.into();
        self.vocabulary_annotations
            .read()
            .iter()
            .filter(|a| a.target().same_element(&element))
            .cloned()
            .collect()
    }

    /// Resolve a type, or a bad type if nothing is declared under the name
    pub fn resolve_type(&self, qualified_name: &str) -> EdmType {
        self.find_type(qualified_name)
            .unwrap_or_else(|| BadElement::unresolved_type(qualified_name, TypeKind::Untyped).as_type())
    }

    /// Resolve a type reference, accepting `Collection(...)` names
    pub fn resolve_type_reference(&self, name: &str, nullable: bool) -> TypeReference {
        match name
            .strip_prefix("Collection(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            Some(element) => self.resolve_type_reference(element, nullable).into_collection(),
            None => TypeReference::new(self.resolve_type(name), nullable),
        }
    }

    /// Resolve an entity type, or a bad entity type on a miss or kind mismatch
    pub fn resolve_entity_type(&self, qualified_name: &str) -> Checked<Arc<EntityType>> {
        match self.find_type(qualified_name) {
            Some(EdmType::Entity(entity)) => Checked::Valid(entity),
            Some(other) => Checked::Bad(BadElement::type_kind_mismatch(
                qualified_name,
                TypeKind::Entity,
                other.type_kind(),
            )),
            None => Checked::Bad(BadElement::unresolved_type(qualified_name, TypeKind::Entity)),
        }
    }

    pub fn resolve_term(&self, qualified_name: &str) -> Checked<Arc<Term>> {
        match self.find_term(qualified_name) {
            Some(term) => Checked::Valid(term),
            None => Checked::Bad(BadElement::unresolved_term(qualified_name)),
        }
    }

    pub fn resolve_entity_set(&self, name: &str) -> Checked<Arc<EntitySet>> {
        match self.find_entity_set(name) {
            Some(set) => Checked::Valid(set),
            None => Checked::Bad(BadElement::unresolved_entity_set(name)),
        }
    }

    /// Resolve an operation; with overloads the first declared one wins
    pub fn resolve_operation(&self, qualified_name: &str) -> Checked<Arc<Operation>> {
        match self.find_operations(qualified_name).into_iter().next() {
            Some(operation) => Checked::Valid(operation),
            None => Checked::Bad(BadElement::unresolved_operation(qualified_name)),
        }
    }

    pub fn resolve_navigation_property(
        &self,
        entity_type: &EntityType,
        name: &str,
    ) -> Checked<Arc<NavigationProperty>> {
        match entity_type.find_navigation_property(name) {
            Some(property) => Checked::Valid(property),
            None => Checked::Bad(BadElement::unresolved_navigation_property(&entity_type.full_name(), name)),
        }
    }

    /// Walk the model depth first and collect the errors of every bad element
    pub fn validation_errors(&self) -> Vec<EdmError> {
        let mut errors = Vec::new();

        for schema_type in self.types.read().values() {
            errors.extend(schema_type.errors());
            if let Some(structured) = schema_type.as_structured() {
                for property in structured.declared_properties() {
                    errors.extend(property_errors(&property));
                }
            }
        }
        for term in self.terms.read().values() {
            errors.extend(term.type_ref().errors());
        }
        for operation in self.operations.read().values().flatten() {
            errors.extend(operation.errors());
        }
        for annotation in self.vocabulary_annotations.read().iter() {
            errors.extend(annotation.errors());
        }

        if !errors.is_empty() {
            log::debug!("model validation found {} error(s)", errors.len());
        }
        errors
    }
}

fn property_errors(property: &Property) -> Vec<EdmError> {
    match property {
        Property::Structural(p) => p.type_ref().errors(),
        Property::Navigation(p) => p.type_ref().errors(),
    }
}

impl Default for EdmModel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EdmModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdmModel")
            .field("types", &self.types.read().len())
            .field("terms", &self.terms.read().len())
            .field("operations", &self.operations.read().len())
            .field("entity_container", &self.entity_container.read().as_ref().map(|c| c.full_name()))
            .field("vocabulary_annotations", &self.vocabulary_annotations.read().len())
            .finish()
    }
}
