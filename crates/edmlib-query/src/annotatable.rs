//! Query nodes as annotation targets

use crate::{
    AllNode, AnyNode, BinaryOperatorNode, CollectionNavigationNode, CollectionPropertyAccessNode, ConstantNode,
    ConvertNode, EntityCollectionCastNode, EntityRangeVariable, EntityRangeVariableReferenceNode, EntitySetNode,
    FilterClause, NonentityRangeVariable, NonentityRangeVariableReferenceNode, OrderByClause, SelectExpandClause,
    SingleEntityCastNode, SingleNavigationNode, SingleValueFunctionCallNode, SingleValueOpenPropertyAccessNode,
    SingleValuePropertyAccessNode, UnaryOperatorNode,
};
use edmlib_annotations::Annotatable;

macro_rules! annotatable {
    ($($ty:ty),+ $(,)?) => {
        $(impl Annotatable for $ty {})+
    };
}

annotatable!(
    ConstantNode,
    ConvertNode,
    BinaryOperatorNode,
    UnaryOperatorNode,
    SingleValuePropertyAccessNode,
    SingleNavigationNode,
    SingleEntityCastNode,
    AnyNode,
    AllNode,
    CollectionPropertyAccessNode,
    CollectionNavigationNode,
    EntitySetNode,
    EntityCollectionCastNode,
    FilterClause,
    OrderByClause,
    SelectExpandClause,
);

macro_rules! named_annotatable {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Annotatable for $ty {
                fn annotation_name(&self) -> Option<&str> {
                    Some(self.name())
                }
            }
        )+
    };
}

named_annotatable!(
    EntityRangeVariable,
    NonentityRangeVariable,
    EntityRangeVariableReferenceNode,
    NonentityRangeVariableReferenceNode,
    SingleValueOpenPropertyAccessNode,
    SingleValueFunctionCallNode,
);

#[cfg(test)]
mod tests {
    use crate::{
        ConstantNode, ConstantValue, EntityRangeVariable, EntitySetNode, FilterClause, RangeVariable, SingleValueNode,
    };
    use edmlib_annotations::{annotation_value, DirectValueAnnotationStore};
    use edmlib_model::{EntityContainer, EntityType, NavigationSource, TypeReference};
    use std::sync::Arc;

    #[test]
    fn test_query_nodes_take_annotations() {
        let customer = EntityType::new("NS", "Customer", None, false, false, false);
        let container = EntityContainer::new("NS", "Default");
        let customers = container.add_entity_set("Customers", customer.clone());

        let set_node = Arc::new(EntitySetNode::new(customers.clone()));
        let it = RangeVariable::from(
            EntityRangeVariable::new(
                "$it",
                TypeReference::entity(&customer, false),
                Some(NavigationSource::EntitySet(customers)),
            )
            .unwrap(),
        );
        let filter = Arc::new(
            FilterClause::new(
                SingleValueNode::Constant(ConstantNode::new(ConstantValue::Boolean(true))),
                it,
            )
            .unwrap(),
        );

        let store = DirectValueAnnotationStore::new();
        store
            .set_annotation_value(&set_node, "urn:test", "Origin", Some(annotation_value("path")))
            .unwrap();
        store
            .set_annotation_value(&filter, "urn:test", "Cost", Some(annotation_value(3_u32)))
            .unwrap();

        assert_eq!(store.get_annotation::<u32>(&filter, "urn:test", "Cost").as_deref(), Some(&3));
        assert!(store.get_annotation_value(&set_node, "urn:test", "Cost").is_none());
        assert_eq!(store.annotated_element_count(), 2);
    }
}
