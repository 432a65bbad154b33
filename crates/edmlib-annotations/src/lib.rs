//! Direct value annotations for EDM model and query elements
//!
//! This crate provides:
//! - The `Annotatable` trait that gives any shared element an identity
//! - `DirectValueAnnotation` bindings and the reserved documentation namespace
//! - `DirectValueAnnotationStore`, a versioned map from element identity to
//!   annotations; readers take snapshots, writers share a single update lock
//!
//! Elements are never mutated: metadata is attached out of band and the store
//! publishes a new immutable version on every update.

mod annotation;
mod element;
mod store;
mod tree;

pub use annotation::*;
pub use element::*;
pub use store::*;
