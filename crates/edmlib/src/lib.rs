//! Entity Data Model for Rust
//!
//! This crate bundles:
//! - The EDM type system and the model container a loader fills
//! - Bad elements for names a loader could not resolve
//! - A direct-value annotation store keyed by element identity
//! - The resolved query AST a binder builds against a model
//!
//! # Example
//!
//! ```ignore
//! use edmlib::prelude::*;
//!
//! let model = EdmModel::new();
//! let customer = EntityType::new("Sales", "Customer", None, false, false, false);
//! let id = customer.add_structural_property("Id", CoreModel::instance().get_int32(false));
//! customer.add_keys([id]);
//! model.add_type(customer.clone());
//!
//! let it = EntityRangeVariable::new("$it", TypeReference::entity(&customer, false), None)?;
//! ```

pub use edmlib_annotations as annotations;
pub use edmlib_diagnostics as diagnostics;
pub use edmlib_model as model;
pub use edmlib_query as query;

pub use edmlib_diagnostics::{EdmError, EdmlibError, ErrorCode, Result};
pub use edmlib_model::{CoreModel, EdmModel};

/// The names most callers need
pub mod prelude {
    pub use edmlib_annotations::{annotation_value, DirectValueAnnotationStore, Documentation, Element};
    pub use edmlib_diagnostics::{EdmError, EdmlibError, ErrorCode, Result};
    pub use edmlib_model::{
        BadElement, Checked, ComplexType, CoreModel, EdmModel, EdmType, EntityContainer, EntitySet, EntityType,
        EnumType, Multiplicity, NavigationProperty, NavigationPropertyInfo, NavigationSource, PrimitiveTypeKind,
        StructuralProperty, StructuredType, Term, TypeKind, TypeReference,
    };
    pub use edmlib_query::{
        CollectionNode, EntityRangeVariable, FilterClause, NonentityRangeVariable, ODataPath, OrderByClause,
        PathSegment, QueryNode, QueryNodeVisitor, RangeVariable, SelectExpandClause, SingleValueNode,
    };
}
