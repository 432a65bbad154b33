//! Versioned direct value annotation store

use crate::element::ElementComparer;
use crate::tree::VersioningTree;
use crate::{
    AnnotationValue, AnnotationValueGetter, AnnotationValueSetter, DirectValueAnnotation,
    Documentation, Element, DOCUMENTATION_NAMESPACE,
};
use crate::annotation::ElementAnnotations;
use edmlib_diagnostics::{EdmlibError, ErrorCode, Result};
use parking_lot::{Mutex, RwLock};
use std::any::Any;

type AnnotationTree = VersioningTree<Element, ElementAnnotations>;

/// Stores direct value annotations for elements that cannot be mutated
///
/// Writers serialize on a single update lock, build a new version of the
/// map from the published one and publish it in one step. Readers only clone
/// the published root, so a read always sees one complete version and never
/// waits for a writer to finish computing.
pub struct DirectValueAnnotationStore {
    published: RwLock<AnnotationTree>,
    update_lock: Mutex<()>,
    comparer: ElementComparer,
}

impl DirectValueAnnotationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            published: RwLock::new(AnnotationTree::new()),
            update_lock: Mutex::new(()),
            comparer: ElementComparer::new(),
        }
    }

    /// Take a consistent view of the current version
    pub fn snapshot(&self) -> AnnotationSnapshot<'_> {
        AnnotationSnapshot {
            tree: self.published.read().clone(),
            comparer: &self.comparer,
        }
    }

    /// Number of elements with transient annotations
    pub fn annotated_element_count(&self) -> usize {
        self.snapshot().tree.len()
    }

    /// Get all visible annotations of an element
    ///
    /// Immutable annotations come first, minus those overridden or hidden by a
    /// transient binding; then the transient bindings that carry a value.
    pub fn get_direct_value_annotations(&self, element: impl Into<Element>) -> Vec<DirectValueAnnotation> {
        self.snapshot().direct_value_annotations(&element.into())
    }

    /// Get the value bound to (namespace, name) on an element
    pub fn get_annotation_value(
        &self,
        element: impl Into<Element>,
        namespace: &str,
        name: &str,
    ) -> Option<AnnotationValue> {
        self.snapshot().annotation_value(&element.into(), namespace, name)
    }

    /// Get a value downcast to `T`
    pub fn get_annotation<T: Any + Send + Sync>(
        &self,
        element: impl Into<Element>,
        namespace: &str,
        name: &str,
    ) -> Option<std::sync::Arc<T>> {
        self.get_annotation_value(element, namespace, name)
            .and_then(|value| value.downcast::<T>().ok())
    }

    /// Get several values from the same version
    pub fn get_annotation_values(&self, getters: &[AnnotationValueGetter]) -> Vec<Option<AnnotationValue>> {
        let snapshot = self.snapshot();
        getters
            .iter()
            .map(|g| snapshot.annotation_value(&g.element, &g.namespace, &g.name))
            .collect()
    }

    /// Bind, replace or clear (namespace, name) on an element
    ///
    /// Clearing a name that the element carries as an immutable annotation
    /// leaves a tombstone, so the immutable value stays hidden.
    pub fn set_annotation_value(
        &self,
        element: impl Into<Element>,
        namespace: &str,
        name: &str,
        value: Option<AnnotationValue>,
    ) -> Result<()> {
        check_reserved(namespace, name, value.as_ref())?;
        let element = element.into();

        let _guard = self.update_lock.lock();
        let current = self.published.read().clone();
        let next = self.apply(&current, &element, namespace, name, value);
        self.publish(next, 1);
        Ok(())
    }

    /// Apply several updates and publish them as one version
    ///
    /// Nothing is applied when any setter is rejected.
    pub fn set_annotation_values(&self, setters: &[AnnotationValueSetter]) -> Result<()> {
        for setter in setters {
            check_reserved(&setter.namespace, &setter.name, setter.value.as_ref())?;
        }

        let _guard = self.update_lock.lock();
        let mut working = self.published.read().clone();
        for setter in setters {
            working = self.apply(
                &working,
                &setter.element,
                &setter.namespace,
                &setter.name,
                setter.value.clone(),
            );
        }
        self.publish(working, setters.len());
        Ok(())
    }

    /// Attach documentation under the reserved namespace
    pub fn set_documentation(&self, element: impl Into<Element>, documentation: Documentation) -> Result<()> {
        self.set_annotation_value(
            element,
            DOCUMENTATION_NAMESPACE,
            crate::DOCUMENTATION_NAME,
            Some(crate::annotation_value(documentation)),
        )
    }

    /// Read documentation from the reserved namespace
    pub fn get_documentation(&self, element: impl Into<Element>) -> Option<std::sync::Arc<Documentation>> {
        self.get_annotation::<Documentation>(element, DOCUMENTATION_NAMESPACE, crate::DOCUMENTATION_NAME)
    }

    fn apply(
        &self,
        tree: &AnnotationTree,
        element: &Element,
        namespace: &str,
        name: &str,
        value: Option<AnnotationValue>,
    ) -> AnnotationTree {
        let cmp = |a: &Element, b: &Element| self.comparer.compare(a, b);
        let existing = tree.get(element, cmp);

        let updated = match value {
            Some(value) => {
                let annotation = DirectValueAnnotation::new(namespace, name, value);
                Some(match existing {
                    Some(existing) => existing.with(annotation),
                    None => ElementAnnotations::Single(annotation),
                })
            }
            None if has_immutable(element, namespace, name) => {
                let tombstone = DirectValueAnnotation::tombstone(namespace, name);
                Some(match existing {
                    Some(existing) => existing.with(tombstone),
                    None => ElementAnnotations::Single(tombstone),
                })
            }
            None => match existing {
                Some(existing) => existing.without(namespace, name),
                None => return tree.clone(),
            },
        };

        match updated {
            Some(annotations) => tree.insert(element.clone(), annotations, cmp),
            None => tree.remove(element, cmp),
        }
    }

    fn publish(&self, next: AnnotationTree, updates: usize) {
        log::trace!(
            "publishing annotation version: {} update(s), {} annotated element(s)",
            updates,
            next.len()
        );
        // Readers wait only for the swap; the old version is released after unlocking
        let previous = std::mem::replace(&mut *self.published.write(), next);
        drop(previous);
    }
}

impl Default for DirectValueAnnotationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DirectValueAnnotationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectValueAnnotationStore")
            .field("annotated_elements", &self.annotated_element_count())
            .finish()
    }
}

/// One published version of the store
pub struct AnnotationSnapshot<'a> {
    tree: AnnotationTree,
    comparer: &'a ElementComparer,
}

impl AnnotationSnapshot<'_> {
    fn transient(&self, element: &Element) -> Option<&ElementAnnotations> {
        self.tree.get(element, |a, b| self.comparer.compare(a, b))
    }

    /// Get the value bound to (namespace, name) in this version
    pub fn annotation_value(&self, element: &Element, namespace: &str, name: &str) -> Option<AnnotationValue> {
        if let Some(annotation) = self.transient(element).and_then(|t| t.find(namespace, name)) {
            return annotation.value().cloned();
        }

        element
            .get()
            .immutable_annotations()
            .iter()
            .find(|a| a.matches(namespace, name))
            .and_then(|a| a.value().cloned())
    }

    /// Get all visible annotations of an element in this version
    pub fn direct_value_annotations(&self, element: &Element) -> Vec<DirectValueAnnotation> {
        let transient = self.transient(element);

        let mut visible: Vec<DirectValueAnnotation> = element
            .get()
            .immutable_annotations()
            .iter()
            .filter(|a| !a.is_tombstone())
            .filter(|a| transient.and_then(|t| t.find(a.namespace(), a.name())).is_none())
            .cloned()
            .collect();

        if let Some(transient) = transient {
            visible.extend(transient.as_slice().iter().filter(|a| !a.is_tombstone()).cloned());
        }
        visible
    }

    /// Visit every element with transient annotations, in store order
    pub fn for_each_element(&self, mut f: impl FnMut(&Element)) {
        self.tree.for_each(|element, _| f(element));
    }
}

fn has_immutable(element: &Element, namespace: &str, name: &str) -> bool {
    element
        .get()
        .immutable_annotations()
        .iter()
        .any(|a| a.matches(namespace, name))
}

fn check_reserved(namespace: &str, name: &str, value: Option<&AnnotationValue>) -> Result<()> {
    if namespace != DOCUMENTATION_NAMESPACE {
        return Ok(());
    }
    match value {
        Some(value) if !value.is::<Documentation>() => Err(EdmlibError::invalid_annotation_value(
            ErrorCode::INVALID_DOCUMENTATION_VALUE,
            format!("annotation '{name}' in the documentation namespace must hold a Documentation value"),
        )),
        _ => Ok(()),
    }
}
