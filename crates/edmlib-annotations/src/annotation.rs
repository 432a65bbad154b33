//! Direct value annotation bindings

use crate::Element;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Reserved namespace for documentation annotations
///
/// Values stored under this namespace must be [`Documentation`].
pub const DOCUMENTATION_NAMESPACE: &str = "http://schemas.microsoft.com/ado/2011/04/edm/documentation";

/// Local name used for documentation annotations
pub const DOCUMENTATION_NAME: &str = "Documentation";

/// An opaque annotation value
pub type AnnotationValue = Arc<dyn Any + Send + Sync>;

/// Wrap a value for storage in an annotation
pub fn annotation_value<T: Any + Send + Sync>(value: T) -> AnnotationValue {
    Arc::new(value)
}

/// Documentation attached to a model element
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Documentation {
    pub summary: Option<String>,
    pub description: Option<String>,
}

impl Documentation {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: Some(summary.into()),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An (namespace, name, value) binding attached to an element
///
/// A binding without a value is a tombstone: it hides an immutable
/// annotation with the same namespace and name.
#[derive(Clone)]
pub struct DirectValueAnnotation {
    namespace: String,
    name: String,
    value: Option<AnnotationValue>,
}

impl DirectValueAnnotation {
    /// Create a binding with a value
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, value: AnnotationValue) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            value: Some(value),
        }
    }

    /// Create a tombstone for (namespace, name)
    pub fn tombstone(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            value: None,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&AnnotationValue> {
        self.value.as_ref()
    }

    /// Downcast the value
    pub fn value_as<T: Any>(&self) -> Option<&T> {
        self.value.as_ref().and_then(|v| v.downcast_ref::<T>())
    }

    pub fn is_tombstone(&self) -> bool {
        self.value.is_none()
    }

    pub(crate) fn matches(&self, namespace: &str, name: &str) -> bool {
        self.namespace == namespace && self.name == name
    }
}

impl fmt::Debug for DirectValueAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectValueAnnotation")
            .field("namespace", &self.namespace)
            .field("name", &self.name)
            .field("has_value", &self.value.is_some())
            .finish()
    }
}

/// One entry of a batched annotation read
#[derive(Debug, Clone)]
pub struct AnnotationValueGetter {
    pub element: Element,
    pub namespace: String,
    pub name: String,
}

impl AnnotationValueGetter {
    pub fn new(element: impl Into<Element>, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

/// One entry of a batched annotation update
#[derive(Clone)]
pub struct AnnotationValueSetter {
    pub element: Element,
    pub namespace: String,
    pub name: String,
    pub value: Option<AnnotationValue>,
}

impl AnnotationValueSetter {
    pub fn new(
        element: impl Into<Element>,
        namespace: impl Into<String>,
        name: impl Into<String>,
        value: Option<AnnotationValue>,
    ) -> Self {
        Self {
            element: element.into(),
            namespace: namespace.into(),
            name: name.into(),
            value,
        }
    }
}

impl fmt::Debug for AnnotationValueSetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationValueSetter")
            .field("element", &self.element)
            .field("namespace", &self.namespace)
            .field("name", &self.name)
            .field("has_value", &self.value.is_some())
            .finish()
    }
}

/// Annotations stored for one element: a single binding or a short list
#[derive(Debug, Clone)]
pub(crate) enum ElementAnnotations {
    Single(DirectValueAnnotation),
    List(Arc<Vec<DirectValueAnnotation>>),
}

impl ElementAnnotations {
    pub(crate) fn find(&self, namespace: &str, name: &str) -> Option<&DirectValueAnnotation> {
        self.as_slice().iter().find(|a| a.matches(namespace, name))
    }

    pub(crate) fn as_slice(&self) -> &[DirectValueAnnotation] {
        match self {
            Self::Single(annotation) => std::slice::from_ref(annotation),
            Self::List(list) => list.as_slice(),
        }
    }

    /// Copy with `annotation` replacing any binding of the same namespace and name
    pub(crate) fn with(&self, annotation: DirectValueAnnotation) -> Self {
        match self {
            Self::Single(existing) if existing.matches(&annotation.namespace, &annotation.name) => {
                Self::Single(annotation)
            }
            _ => {
                let mut list: Vec<_> = self
                    .as_slice()
                    .iter()
                    .filter(|a| !a.matches(&annotation.namespace, &annotation.name))
                    .cloned()
                    .collect();
                list.push(annotation);
                Self::List(Arc::new(list))
            }
        }
    }

    /// Copy without the binding for (namespace, name); `None` when nothing is left
    pub(crate) fn without(&self, namespace: &str, name: &str) -> Option<Self> {
        let mut remaining: Vec<_> = self
            .as_slice()
            .iter()
            .filter(|a| !a.matches(namespace, name))
            .cloned()
            .collect();
        match remaining.len() {
            0 => None,
            1 => remaining.pop().map(Self::Single),
            _ => Some(Self::List(Arc::new(remaining))),
        }
    }
}
