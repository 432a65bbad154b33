//! Annotation store behaviour tests
//!
//! Covers:
//! - Set/get round trips and clearing
//! - Immutable annotations and tombstones
//! - Batched reads and writes
//! - Concurrent readers and writers
//! - Elements with colliding hashes and names

use edmlib_annotations::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

const NS: &str = "http://example.org/annotations";

struct Plain;
impl Annotatable for Plain {}

/// An element built by a loader with annotations it already carries
struct Loaded {
    name: &'static str,
    immutable: Vec<DirectValueAnnotation>,
}

impl Loaded {
    fn new(name: &'static str, bindings: &[(&str, &'static str)]) -> Arc<Self> {
        Arc::new(Self {
            name,
            immutable: bindings
                .iter()
                .map(|(n, v)| DirectValueAnnotation::new(NS, *n, annotation_value(*v)))
                .collect(),
        })
    }
}

impl Annotatable for Loaded {
    fn annotation_name(&self) -> Option<&str> {
        Some(self.name)
    }

    fn immutable_annotations(&self) -> &[DirectValueAnnotation] {
        &self.immutable
    }
}

/// Every instance hashes and names the same, forcing the first-seen tie-break
struct Twin;
impl Annotatable for Twin {
    fn annotation_name(&self) -> Option<&str> {
        Some("Twin")
    }

    fn identity_hash(&self) -> u64 {
        42
    }
}

fn read_str(store: &DirectValueAnnotationStore, element: impl Into<Element>, name: &str) -> Option<&'static str> {
    store
        .get_annotation::<&'static str>(element, NS, name)
        .map(|v| *v)
}

#[test]
fn test_set_then_get_returns_value() {
    let store = DirectValueAnnotationStore::new();
    let element = Arc::new(Plain);

    store
        .set_annotation_value(&element, NS, "Label", Some(annotation_value("customer")))
        .unwrap();

    assert_eq!(read_str(&store, &element, "Label"), Some("customer"));
    assert_eq!(read_str(&store, &element, "Other"), None);
}

#[test]
fn test_values_are_per_element() {
    let store = DirectValueAnnotationStore::new();
    let a = Arc::new(Plain);
    let b = Arc::new(Plain);

    store.set_annotation_value(&a, NS, "Label", Some(annotation_value("a"))).unwrap();
    store.set_annotation_value(&b, NS, "Label", Some(annotation_value("b"))).unwrap();

    assert_eq!(read_str(&store, &a, "Label"), Some("a"));
    assert_eq!(read_str(&store, &b, "Label"), Some("b"));
}

#[test]
fn test_clearing_transient_value_makes_it_unobservable() {
    let store = DirectValueAnnotationStore::new();
    let element = Arc::new(Plain);

    store.set_annotation_value(&element, NS, "Label", Some(annotation_value("x"))).unwrap();
    store.set_annotation_value(&element, NS, "Label", None).unwrap();

    assert!(store.get_annotation_value(&element, NS, "Label").is_none());
    assert!(store.get_direct_value_annotations(&element).is_empty());
    assert_eq!(store.annotated_element_count(), 0);
}

#[test]
fn test_immutable_annotation_is_visible_until_cleared() {
    let store = DirectValueAnnotationStore::new();
    let element = Loaded::new("Customer", &[("Origin", "csdl")]);

    assert_eq!(read_str(&store, &element, "Origin"), Some("csdl"));

    store.set_annotation_value(&element, NS, "Origin", None).unwrap();
    assert_eq!(read_str(&store, &element, "Origin"), None);
    assert!(store.get_direct_value_annotations(&element).is_empty());

    // The tombstone keeps the entry alive
    assert_eq!(store.annotated_element_count(), 1);

    // Clearing again keeps it hidden
    store.set_annotation_value(&element, NS, "Origin", None).unwrap();
    assert_eq!(read_str(&store, &element, "Origin"), None);
}

#[test]
fn test_transient_value_overrides_immutable() {
    let store = DirectValueAnnotationStore::new();
    let element = Loaded::new("Customer", &[("Origin", "csdl"), ("Kind", "entity")]);

    store
        .set_annotation_value(&element, NS, "Origin", Some(annotation_value("code")))
        .unwrap();

    assert_eq!(read_str(&store, &element, "Origin"), Some("code"));

    let visible = store.get_direct_value_annotations(&element);
    let names: Vec<_> = visible.iter().map(|a| a.name().to_string()).collect();
    assert_eq!(names, vec!["Kind".to_string(), "Origin".to_string()]);
    assert_eq!(visible[1].value_as::<&'static str>(), Some(&"code"));
}

#[rstest]
#[case::documentation(DOCUMENTATION_NAMESPACE, true)]
#[case::ordinary(NS, false)]
fn test_reserved_namespace_only_rejects_wrong_values(#[case] namespace: &str, #[case] rejected: bool) {
    let store = DirectValueAnnotationStore::new();
    let element = Arc::new(Plain);

    let result = store.set_annotation_value(&element, namespace, "Documentation", Some(annotation_value(17)));
    assert_eq!(result.is_err(), rejected);
}

#[test]
fn test_documentation_round_trip() {
    let store = DirectValueAnnotationStore::new();
    let element = Arc::new(Plain);

    store
        .set_documentation(&element, Documentation::new("A customer").with_description("Long text"))
        .unwrap();

    let doc = store.get_documentation(&element).unwrap();
    assert_eq!(doc.summary.as_deref(), Some("A customer"));
    assert_eq!(doc.description.as_deref(), Some("Long text"));

    // Clearing with no value is always allowed
    store
        .set_annotation_value(&element, DOCUMENTATION_NAMESPACE, DOCUMENTATION_NAME, None)
        .unwrap();
    assert!(store.get_documentation(&element).is_none());
}

#[test]
fn test_batched_set_is_all_or_nothing() {
    let store = DirectValueAnnotationStore::new();
    let element = Arc::new(Plain);

    let result = store.set_annotation_values(&[
        AnnotationValueSetter::new(&element, NS, "First", Some(annotation_value("1"))),
        AnnotationValueSetter::new(&element, DOCUMENTATION_NAMESPACE, "Documentation", Some(annotation_value(3))),
    ]);

    assert!(result.is_err());
    assert!(store.get_annotation_value(&element, NS, "First").is_none());
}

#[test]
fn test_batched_get_reads_each_binding() {
    let store = DirectValueAnnotationStore::new();
    let a = Arc::new(Plain);
    let b = Arc::new(Plain);

    store
        .set_annotation_values(&[
            AnnotationValueSetter::new(&a, NS, "Label", Some(annotation_value("a"))),
            AnnotationValueSetter::new(&b, NS, "Label", Some(annotation_value("b"))),
        ])
        .unwrap();

    let values = store.get_annotation_values(&[
        AnnotationValueGetter::new(&a, NS, "Label"),
        AnnotationValueGetter::new(&b, NS, "Label"),
        AnnotationValueGetter::new(&b, NS, "Missing"),
    ]);

    assert_eq!(values.len(), 3);
    assert_eq!(values[0].as_ref().and_then(|v| v.downcast_ref::<&str>()), Some(&"a"));
    assert_eq!(values[1].as_ref().and_then(|v| v.downcast_ref::<&str>()), Some(&"b"));
    assert!(values[2].is_none());
}

#[test]
fn test_colliding_elements_stay_distinct() {
    let store = DirectValueAnnotationStore::new();
    let twins: Vec<_> = (0..8).map(|_| Arc::new(Twin)).collect();

    for (i, twin) in twins.iter().enumerate() {
        store.set_annotation_value(twin, NS, "Index", Some(annotation_value(i))).unwrap();
    }

    for (i, twin) in twins.iter().enumerate() {
        let value = store.get_annotation::<usize>(twin, NS, "Index").map(|v| *v);
        assert_eq!(value, Some(i));
    }
    assert_eq!(store.annotated_element_count(), 8);
}

#[test]
fn test_type_erased_elements_share_identity() {
    let store = DirectValueAnnotationStore::new();
    let element = Arc::new(Plain);
    let erased: Arc<dyn Annotatable> = element.clone();

    store.set_annotation_value(&element, NS, "Label", Some(annotation_value("x"))).unwrap();
    assert_eq!(read_str(&store, Element::from_dyn(erased), "Label"), Some("x"));
}

#[test]
fn test_snapshot_outlives_later_publishes() {
    let store = DirectValueAnnotationStore::new();
    let element = Arc::new(Plain);
    let handle = Element::from(&element);
    store.set_annotation_value(&element, NS, "Label", Some(annotation_value("old"))).unwrap();

    // A held snapshot keeps no lock, so writers on the same thread proceed
    let snapshot = store.snapshot();
    store.set_annotation_value(&element, NS, "Label", Some(annotation_value("new"))).unwrap();

    let old = snapshot.annotation_value(&handle, NS, "Label");
    assert_eq!(old.as_ref().and_then(|v| v.downcast_ref::<&'static str>()).copied(), Some("old"));
    assert_eq!(read_str(&store, &element, "Label"), Some("new"));
}

#[test]
fn test_concurrent_readers_see_whole_versions() {
    let store = Arc::new(DirectValueAnnotationStore::new());
    let left = Arc::new(Plain);
    let right = Arc::new(Plain);

    let writer = {
        let store = Arc::clone(&store);
        let (left, right) = (Arc::clone(&left), Arc::clone(&right));
        thread::spawn(move || {
            for generation in 0..500u32 {
                store
                    .set_annotation_values(&[
                        AnnotationValueSetter::new(&left, NS, "Generation", Some(annotation_value(generation))),
                        AnnotationValueSetter::new(&right, NS, "Generation", Some(annotation_value(generation))),
                    ])
                    .unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            let (left, right) = (Arc::clone(&left), Arc::clone(&right));
            thread::spawn(move || {
                for _ in 0..500 {
                    let values = store.get_annotation_values(&[
                        AnnotationValueGetter::new(&left, NS, "Generation"),
                        AnnotationValueGetter::new(&right, NS, "Generation"),
                    ]);
                    let read = |i: usize| values[i].as_ref().and_then(|v| v.downcast_ref::<u32>()).copied();
                    assert_eq!(read(0), read(1));
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(store.get_annotation::<u32>(&left, NS, "Generation").map(|v| *v), Some(499));
}

#[test]
fn test_concurrent_writers_do_not_lose_updates() {
    let store = Arc::new(DirectValueAnnotationStore::new());
    let elements: Vec<_> = (0..16).map(|_| Arc::new(Plain)).collect();

    let handles: Vec<_> = elements
        .chunks(4)
        .map(|chunk| {
            let store = Arc::clone(&store);
            let chunk: Vec<_> = chunk.to_vec();
            thread::spawn(move || {
                for element in &chunk {
                    store.set_annotation_value(element, NS, "Seen", Some(annotation_value(true))).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.annotated_element_count(), 16);
    for element in &elements {
        assert_eq!(store.get_annotation::<bool>(element, NS, "Seen").map(|v| *v), Some(true));
    }
}

#[derive(Debug, Clone)]
enum Op {
    Set(usize, u8, u32),
    Clear(usize, u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..6usize, 0..3u8, any::<u32>()).prop_map(|(e, n, v)| Op::Set(e, n, v)),
        (0..6usize, 0..3u8).prop_map(|(e, n)| Op::Clear(e, n)),
    ]
}

proptest! {
    #[test]
    fn prop_store_matches_reference_map(ops in proptest::collection::vec(op(), 0..64)) {
        let store = DirectValueAnnotationStore::new();
        let elements: Vec<_> = (0..6).map(|_| Arc::new(Plain)).collect();
        let mut expected: HashMap<(usize, u8), u32> = HashMap::new();

        for op in &ops {
            match *op {
                Op::Set(e, n, v) => {
                    store.set_annotation_value(&elements[e], NS, &format!("n{n}"), Some(annotation_value(v))).unwrap();
                    expected.insert((e, n), v);
                }
                Op::Clear(e, n) => {
                    store.set_annotation_value(&elements[e], NS, &format!("n{n}"), None).unwrap();
                    expected.remove(&(e, n));
                }
            }
        }

        for e in 0..6 {
            for n in 0..3u8 {
                let actual = store.get_annotation::<u32>(&elements[e], NS, &format!("n{n}")).map(|v| *v);
                prop_assert_eq!(actual, expected.get(&(e, n)).copied());
            }
            let count = store.get_direct_value_annotations(&elements[e]).len();
            prop_assert_eq!(count, expected.keys().filter(|(k, _)| *k == e).count());
        }
    }
}
