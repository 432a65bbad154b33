//! Double dispatch over query nodes, path segments and select items
//!
//! Nodes call back into the visitor with their concrete type:
//!
//! ```ignore
//! struct Depth;
//!
//! impl QueryNodeVisitor<usize> for Depth {
//!     fn visit_binary_operator(&mut self, node: &BinaryOperatorNode) -> usize {
//!         1 + node.left().accept(self).max(node.right().accept(self))
//!     }
//!     // ...
//! }
//! ```

use crate::{
    AllNode, AnyNode, BinaryOperatorNode, CollectionNavigationNode, CollectionPropertyAccessNode, ConstantNode,
    ConvertNode, CountSegment, EntityCollectionCastNode, EntityRangeVariableReferenceNode, EntitySetNode,
    EntitySetSegment, ExpandedNavigationSelectItem, KeySegment, MetadataSegment, NavigationPropertySegment,
    NonentityRangeVariableReferenceNode, ODataPath, PropertySegment, SingleEntityCastNode, SingleNavigationNode,
    SingleValueFunctionCallNode, SingleValueOpenPropertyAccessNode, SingleValuePropertyAccessNode,
    SingletonSegment, TypeSegment, UnaryOperatorNode, ValueSegment,
};

/// Computes a `T` from every kind of query node
pub trait QueryNodeVisitor<T> {
    fn visit_constant(&mut self, node: &ConstantNode) -> T;
    fn visit_convert(&mut self, node: &ConvertNode) -> T;
    fn visit_binary_operator(&mut self, node: &BinaryOperatorNode) -> T;
    fn visit_unary_operator(&mut self, node: &UnaryOperatorNode) -> T;
    fn visit_single_value_property_access(&mut self, node: &SingleValuePropertyAccessNode) -> T;
    fn visit_single_value_open_property_access(&mut self, node: &SingleValueOpenPropertyAccessNode) -> T;
    fn visit_nonentity_range_variable_reference(&mut self, node: &NonentityRangeVariableReferenceNode) -> T;
    fn visit_entity_range_variable_reference(&mut self, node: &EntityRangeVariableReferenceNode) -> T;
    fn visit_single_navigation(&mut self, node: &SingleNavigationNode) -> T;
    fn visit_single_entity_cast(&mut self, node: &SingleEntityCastNode) -> T;
    fn visit_single_value_function_call(&mut self, node: &SingleValueFunctionCallNode) -> T;
    fn visit_any(&mut self, node: &AnyNode) -> T;
    fn visit_all(&mut self, node: &AllNode) -> T;
    fn visit_collection_property_access(&mut self, node: &CollectionPropertyAccessNode) -> T;
    fn visit_collection_navigation(&mut self, node: &CollectionNavigationNode) -> T;
    fn visit_entity_set(&mut self, node: &EntitySetNode) -> T;
    fn visit_entity_collection_cast(&mut self, node: &EntityCollectionCastNode) -> T;
}

/// Computes a `T` from every kind of path segment
pub trait PathSegmentTranslator<T> {
    fn translate_entity_set(&mut self, segment: &EntitySetSegment) -> T;
    fn translate_singleton(&mut self, segment: &SingletonSegment) -> T;
    fn translate_type(&mut self, segment: &TypeSegment) -> T;
    fn translate_navigation_property(&mut self, segment: &NavigationPropertySegment) -> T;
    fn translate_property(&mut self, segment: &PropertySegment) -> T;
    fn translate_key(&mut self, segment: &KeySegment) -> T;
    fn translate_count(&mut self, segment: &CountSegment) -> T;
    fn translate_value(&mut self, segment: &ValueSegment) -> T;
    fn translate_metadata(&mut self, segment: &MetadataSegment) -> T;
}

/// Side-effecting walk over path segments
///
/// Every method defaults to doing nothing; override the segments of interest.
pub trait PathSegmentHandler {
    fn handle_entity_set(&mut self, _segment: &EntitySetSegment) {}

    fn handle_singleton(&mut self, _segment: &SingletonSegment) {}

    fn handle_type(&mut self, _segment: &TypeSegment) {}

    fn handle_navigation_property(&mut self, _segment: &NavigationPropertySegment) {}

    fn handle_property(&mut self, _segment: &PropertySegment) {}

    fn handle_key(&mut self, _segment: &KeySegment) {}

    fn handle_count(&mut self, _segment: &CountSegment) {}

    fn handle_value(&mut self, _segment: &ValueSegment) {}

    fn handle_metadata(&mut self, _segment: &MetadataSegment) {}
}

/// Computes a `T` from every kind of select item
pub trait SelectItemTranslator<T> {
    fn translate_wildcard(&mut self) -> T;
    fn translate_path(&mut self, path: &ODataPath) -> T;
    fn translate_expanded_navigation(&mut self, item: &ExpandedNavigationSelectItem) -> T;
    fn translate_namespace_wildcard(&mut self, namespace: &str) -> T;
}
