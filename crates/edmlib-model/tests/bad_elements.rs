//! Error-tolerant model construction
//!
//! Unresolved names never fail: they produce bad elements whose errors
//! surface through validation.

use edmlib_diagnostics::ErrorCode;
use edmlib_model::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::sync::Arc;

fn sales_model() -> (EdmModel, Arc<EntityType>) {
    let model = EdmModel::new();
    let customer = EntityType::new("Sales", "Customer", None, false, false, false);
    let id = customer.add_structural_property("Id", CoreModel::instance().get_int32(false));
    customer.add_keys([id]);
    model.add_type(customer.clone());

    let container = EntityContainer::new("Sales", "Default");
    container.add_entity_set("Customers", customer.clone());
    model.set_entity_container(container);
    (model, customer)
}

#[rstest]
#[case::type_name("Sales.Nope")]
#[case::empty("")]
#[case::core_lookalike("Edm.Int128")]
fn test_unresolved_type_is_bad_with_empty_name(#[case] name: &str) {
    let (model, _) = sales_model();
    let resolved = model.resolve_type(name);

    assert!(resolved.is_bad());
    assert_eq!(resolved.name(), "");
    assert!(!resolved.errors().is_empty());
    assert_eq!(resolved.errors()[0].code, ErrorCode::BAD_UNRESOLVED_TYPE);
}

#[test]
fn test_unresolved_lookups_of_each_family() {
    let (model, customer) = sales_model();

    let term = model.resolve_term("Core.Missing");
    assert_eq!(term.name(), "");
    assert_eq!(term.errors()[0].code, ErrorCode::BAD_UNRESOLVED_TERM);
    assert!(term.type_ref().is_bad());
    assert!(term.default_value().is_none());

    let set = model.resolve_entity_set("Orders");
    assert_eq!(set.name(), "");
    assert!(set.entity_type().is_none());
    assert_eq!(set.errors()[0].code, ErrorCode::BAD_UNRESOLVED_ENTITY_SET);

    let operation = model.resolve_operation("Sales.Refund");
    assert_eq!(operation.name(), "");
    assert!(operation.return_type().is_some_and(|t| t.is_bad()));

    let nav = model.resolve_navigation_property(&customer, "Orders");
    assert_eq!(nav.name(), "");
    assert_eq!(nav.target_multiplicity(), Multiplicity::Unspecified);
    assert!(nav.partner().is_none());
    let type_ref = nav.type_ref();
    assert!(type_ref.is_bad());
    assert_eq!(type_ref.errors(), nav.errors());

    let entity = model.resolve_entity_type("Sales.Order");
    assert_eq!(entity.name(), "");
    assert_eq!(entity.errors()[0].code, ErrorCode::BAD_UNRESOLVED_ENTITY_TYPE);
}

#[test]
fn test_resolved_lookups() {
    let (model, customer) = sales_model();

    let resolved = model.resolve_entity_type("Sales.Customer");
    assert!(resolved.valid().is_some_and(|t| Arc::ptr_eq(t, &customer)));
    assert_eq!(model.resolve_entity_set("Customers").name(), "Customers");
    assert!(model.resolve_type("Edm.Boolean").as_primitive().is_some());
}

#[test]
fn test_bad_element_escalates_on_request() {
    let (model, _) = sales_model();
    let err = model.resolve_term("Core.Missing").into_result().unwrap_err();
    assert_eq!(err.code(), ErrorCode::BAD_UNRESOLVED_TERM);
}

#[test]
fn test_validation_collects_every_bad_element() {
    let (model, customer) = sales_model();

    // A loader that could not resolve property and term types keeps going
    customer.add_structural_property("Address", model.resolve_type_reference("Sales.Address", true));
    customer.add_structural_property("Tags", model.resolve_type_reference("Collection(Sales.Tag)", true));
    model.add_term(Arc::new(Term::new(
        "Sales",
        "Priority",
        model.resolve_type_reference("Sales.Level", true),
    )));

    let errors = model.validation_errors();
    let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
    assert_eq!(
        messages,
        vec![
            "The type 'Sales.Address' could not be found.".to_string(),
            "The type 'Sales.Tag' could not be found.".to_string(),
            "The type 'Sales.Level' could not be found.".to_string(),
        ]
    );
}

#[test]
fn test_valid_model_has_no_errors() {
    let (model, _) = sales_model();
    assert!(model.validation_errors().is_empty());
}

#[test]
fn test_vocabulary_annotation_default_value() {
    let (model, customer) = sales_model();
    let core = CoreModel::instance();
    model.add_term(Arc::new(
        Term::new("Core", "Immutable", core.get_boolean(false)).with_default_value("true"),
    ));
    model.add_term(Arc::new(
        Term::new("Core", "MaxItems", core.get_int32(false)).with_default_value("many"),
    ));

    let immutable = model.add_vocabulary_annotation(VocabularyAnnotation::new(
        &customer,
        model.resolve_term("Core.Immutable"),
        None,
    ));
    assert!(immutable.uses_default());
    assert_eq!(immutable.value(), Some(EdmExpression::Boolean(true)));

    let explicit = model.add_vocabulary_annotation(
        VocabularyAnnotation::new(
            &customer,
            model.resolve_term("Core.Immutable"),
            Some(EdmExpression::Boolean(false)),
        )
        .with_qualifier("Tablet"),
    );
    assert_eq!(explicit.value(), Some(EdmExpression::Boolean(false)));
    assert_eq!(explicit.qualifier(), Some("Tablet"));

    let broken = model.add_vocabulary_annotation(VocabularyAnnotation::new(
        &customer,
        model.resolve_term("Core.MaxItems"),
        None,
    ));
    assert!(broken.value().is_some_and(|v| v.is_bad()));

    let missing = model.add_vocabulary_annotation(VocabularyAnnotation::new(
        &customer,
        model.resolve_term("Core.Missing"),
        None,
    ));
    assert!(missing.value().is_none());

    assert_eq!(model.find_vocabulary_annotations(&customer).len(), 4);
    let codes: Vec<_> = model.validation_errors().iter().map(|e| e.code).collect();
    assert_eq!(
        codes,
        vec![ErrorCode::INVALID_DEFAULT_VALUE, ErrorCode::BAD_UNRESOLVED_TERM]
    );
}

#[rstest]
#[case::byte_overflow(PrimitiveTypeKind::Byte, "300")]
#[case::byte_negative(PrimitiveTypeKind::Byte, "-1")]
#[case::sbyte_underflow(PrimitiveTypeKind::SByte, "-1000")]
#[case::int16_overflow(PrimitiveTypeKind::Int16, "40000")]
#[case::int32_overflow(PrimitiveTypeKind::Int32, "99999999999")]
#[case::int64_overflow(PrimitiveTypeKind::Int64, "9223372036854775808")]
fn test_out_of_range_integral_default_is_bad(#[case] kind: PrimitiveTypeKind, #[case] raw: &str) {
    let type_ref = CoreModel::instance().get_primitive(kind, false);
    let value = EdmExpression::parse_default(raw, &type_ref);
    assert!(value.is_bad());
    assert_eq!(
        value.errors().iter().map(|e| e.code).collect::<Vec<_>>(),
        vec![ErrorCode::INVALID_DEFAULT_VALUE]
    );
}

#[rstest]
#[case::byte_max(PrimitiveTypeKind::Byte, "255", 255)]
#[case::sbyte_min(PrimitiveTypeKind::SByte, "-128", -128)]
#[case::int32_max(PrimitiveTypeKind::Int32, "2147483647", 2_147_483_647)]
fn test_integral_default_at_range_edge(#[case] kind: PrimitiveTypeKind, #[case] raw: &str, #[case] expected: i64) {
    let type_ref = CoreModel::instance().get_primitive(kind, false);
    assert_eq!(EdmExpression::parse_default(raw, &type_ref), EdmExpression::Integer(expected));
}
