//! Element identity for the annotation store

use crate::DirectValueAnnotation;
use parking_lot::Mutex;
use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// An element that can carry direct value annotations
///
/// Identity is the address of the shared allocation, so an element is always
/// annotated through the `Arc` it lives in. Implementors may override the
/// hash and name used to order elements inside the store.
pub trait Annotatable: Send + Sync {
    /// Name used to order elements with colliding identity hashes
    fn annotation_name(&self) -> Option<&str> {
        None
    }

    /// Hash used as the primary ordering key in the store
    fn identity_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        (self as *const Self as *const () as usize).hash(&mut hasher);
        hasher.finish()
    }

    /// Annotations attached when the element was built; never changed by the store
    fn immutable_annotations(&self) -> &[DirectValueAnnotation] {
        &[]
    }
}

/// A shared handle to an annotatable element
///
/// Holding an `Element` keeps the underlying allocation alive, which keeps
/// its identity stable for as long as the store references it.
#[derive(Clone)]
pub struct Element(Arc<dyn Annotatable>);

impl Element {
    /// Wrap a shared element
    pub fn new<E: Annotatable + 'static>(element: &Arc<E>) -> Self {
        Self(element.clone())
    }

    /// Wrap an already type-erased element
    pub fn from_dyn(element: Arc<dyn Annotatable>) -> Self {
        Self(element)
    }

    /// The address that identifies this element
    pub fn address(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    /// Check whether two handles refer to the same element
    pub fn same_element(&self, other: &Self) -> bool {
        self.address() == other.address()
    }

    /// Access the element
    pub fn get(&self) -> &dyn Annotatable {
        self.0.as_ref()
    }
}

impl<E: Annotatable + 'static> From<&Arc<E>> for Element {
    fn from(element: &Arc<E>) -> Self {
        Self::new(element)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("address", &format_args!("{:#x}", self.address()))
            .field("name", &self.0.annotation_name())
            .finish()
    }
}

/// Total order over elements
///
/// Elements are compared by identity, then identity hash, then name. Distinct
/// elements that agree on both hash and name are ordered by the position at
/// which the comparer first saw them; that list only grows.
#[derive(Default)]
pub(crate) struct ElementComparer {
    unresolved: Mutex<Vec<Element>>,
}

impl ElementComparer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn compare(&self, a: &Element, b: &Element) -> Ordering {
        if a.same_element(b) {
            return Ordering::Equal;
        }

        let by_hash = a.get().identity_hash().cmp(&b.get().identity_hash());
        if by_hash != Ordering::Equal {
            return by_hash;
        }

        let by_name = a.get().annotation_name().cmp(&b.get().annotation_name());
        if by_name != Ordering::Equal {
            return by_name;
        }

        let mut unresolved = self.unresolved.lock();
        let a_pos = position_or_push(&mut unresolved, a);
        let b_pos = position_or_push(&mut unresolved, b);
        log::trace!(
            "annotation store tie-break between elements at {:#x} and {:#x}",
            a.address(),
            b.address()
        );
        a_pos.cmp(&b_pos)
    }

    #[cfg(test)]
    pub(crate) fn unresolved_len(&self) -> usize {
        self.unresolved.lock().len()
    }
}

fn position_or_push(list: &mut Vec<Element>, element: &Element) -> usize {
    match list.iter().position(|e| e.same_element(element)) {
        Some(pos) => pos,
        None => {
            list.push(element.clone());
            list.len() - 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Anonymous;
    impl Annotatable for Anonymous {}

    struct Colliding(&'static str);
    impl Annotatable for Colliding {
        fn annotation_name(&self) -> Option<&str> {
            Some(self.0)
        }

        fn identity_hash(&self) -> u64 {
            7
        }
    }

    #[test]
    fn test_same_element_is_equal() {
        let comparer = ElementComparer::new();
        let a = Arc::new(Anonymous);
        assert_eq!(comparer.compare(&Element::new(&a), &Element::new(&a)), Ordering::Equal);
    }

    #[test]
    fn test_names_break_hash_ties() {
        let comparer = ElementComparer::new();
        let a = Element::new(&Arc::new(Colliding("Alpha")));
        let b = Element::new(&Arc::new(Colliding("Beta")));

        assert_eq!(comparer.compare(&a, &b), Ordering::Less);
        assert_eq!(comparer.compare(&b, &a), Ordering::Greater);
        assert_eq!(comparer.unresolved_len(), 0);
    }

    #[test]
    fn test_first_seen_breaks_full_collisions() {
        let comparer = ElementComparer::new();
        let a = Element::new(&Arc::new(Colliding("Same")));
        let b = Element::new(&Arc::new(Colliding("Same")));

        let first = comparer.compare(&b, &a);
        assert_eq!(first, Ordering::Less);
        // Stable on later comparisons, whatever the argument order
        assert_eq!(comparer.compare(&a, &b), Ordering::Greater);
        assert_eq!(comparer.compare(&b, &a), Ordering::Less);
        assert_eq!(comparer.unresolved_len(), 2);
    }
}
