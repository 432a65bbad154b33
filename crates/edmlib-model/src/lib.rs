//! Entity Data Model core
//!
//! This crate defines:
//! - Primitive type singletons and the core model type factories
//! - Type references with nullability and facets
//! - Entity, complex, enum and collection types
//! - Navigation properties with partner resolution
//! - Bad elements: error-carrying stand-ins for anything a loader could not resolve
//! - Terms, vocabulary annotations, entity containers and operations
//! - `EdmModel`, the container a loader fills and consumers query

mod annotatable;
mod bad;
mod container;
mod core_model;
mod model;
mod navigation;
mod operation;
mod primitive;
mod property;
mod structured;
mod term;
mod type_ref;
mod types;

pub use bad::*;
pub use container::*;
pub use core_model::*;
pub use model::*;
pub use navigation::*;
pub use operation::*;
pub use primitive::*;
pub use property::*;
pub use structured::*;
pub use term::*;
pub use type_ref::*;
pub use types::*;
