//! Model elements as annotation targets
//!
//! Named elements order by name inside the annotation store when their
//! identity hashes collide.

use crate::{
    BadElement, CollectionType, ComplexType, EdmModel, EntityContainer, EntitySet, EntityType, EnumType,
    NavigationProperty, Operation, OperationImport, Singleton, StructuralProperty, Term, TypeDefinition,
    VocabularyAnnotation,
};
use edmlib_annotations::Annotatable;

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
    EntityType,
    ComplexType,
    EnumType,
    TypeDefinition,
    StructuralProperty,
    NavigationProperty,
    Term,
    EntityContainer,
    EntitySet,
    Singleton,
    Operation,
    OperationImport,
);

impl Annotatable for CollectionType {}

impl Annotatable for BadElement {}

impl Annotatable for VocabularyAnnotation {
    fn annotation_name(&self) -> Option<&str> {
        self.qualifier()
    }
}

impl Annotatable for EdmModel {}

#[cfg(test)]
mod tests {
    use crate::{CoreModel, EdmModel, EntityType};
    use edmlib_annotations::{annotation_value, Documentation};

    #[test]
    fn test_model_elements_take_annotations() {
        let model = EdmModel::new();
        let customer = EntityType::new("NS", "Customer", None, false, false, false);
        let id = customer.add_structural_property("Id", CoreModel::instance().get_int32(false));

        let store = model.direct_value_annotations();
        store
            .set_annotation_value(&customer, "urn:test", "Label", Some(annotation_value("Customer")))
            .unwrap();
        store
            .set_documentation(&id, Documentation::new("Primary key"))
            .unwrap();

        let label = store.get_annotation::<&'static str>(&customer, "urn:test", "Label");
        assert_eq!(label.as_deref(), Some(&"Customer"));
        assert_eq!(
            store.get_documentation(&id).and_then(|d| d.summary.clone()),
            Some("Primary key".to_string())
        );
        assert!(store.get_annotation_value(&id, "urn:test", "Label").is_none());
        assert_eq!(store.annotated_element_count(), 2);
    }
}
