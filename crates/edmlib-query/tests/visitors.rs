//! Visitors and translators reach every node and segment kind

use edmlib_model::*;
use edmlib_query::*;
use pretty_assertions::assert_eq;
use std::sync::Arc;

/// Renders nodes as a compact prefix expression
struct Printer;

impl QueryNodeVisitor<String> for Printer {
    fn visit_constant(&mut self, node: &ConstantNode) -> String {
        node.value().to_string()
    }

    fn visit_convert(&mut self, node: &ConvertNode) -> String {
        format!("cast({}, {})", node.source().accept(self), node.type_ref().full_name())
    }

    fn visit_binary_operator(&mut self, node: &BinaryOperatorNode) -> String {
        format!(
            "({} {} {})",
            node.left().accept(self),
            node.operator().as_str(),
            node.right().accept(self)
        )
    }

    fn visit_unary_operator(&mut self, node: &UnaryOperatorNode) -> String {
        match node.operator() {
            UnaryOperatorKind::Negate => format!("-{}", node.operand().accept(self)),
            UnaryOperatorKind::Not => format!("not {}", node.operand().accept(self)),
        }
    }

    fn visit_single_value_property_access(&mut self, node: &SingleValuePropertyAccessNode) -> String {
        format!("{}/{}", node.source().accept(self), node.property().name())
    }

    fn visit_single_value_open_property_access(&mut self, node: &SingleValueOpenPropertyAccessNode) -> String {
        format!("{}/{}", node.source().accept(self), node.name())
    }

    fn visit_nonentity_range_variable_reference(&mut self, node: &NonentityRangeVariableReferenceNode) -> String {
        node.name().to_string()
    }

    fn visit_entity_range_variable_reference(&mut self, node: &EntityRangeVariableReferenceNode) -> String {
        node.name().to_string()
    }

    fn visit_single_navigation(&mut self, node: &SingleNavigationNode) -> String {
        format!("{}/{}", node.source().accept(self), node.navigation_property().name())
    }

    fn visit_single_entity_cast(&mut self, node: &SingleEntityCastNode) -> String {
        format!("{}/{}", node.source().accept(self), node.entity_type().full_name())
    }

    fn visit_single_value_function_call(&mut self, node: &SingleValueFunctionCallNode) -> String {
        let arguments: Vec<_> = node.arguments().iter().map(|a| a.accept(self)).collect();
        format!("{}({})", node.name(), arguments.join(","))
    }

    fn visit_any(&mut self, node: &AnyNode) -> String {
        self.lambda("any", node)
    }

    fn visit_all(&mut self, node: &AllNode) -> String {
        self.lambda("all", node)
    }

    fn visit_collection_property_access(&mut self, node: &CollectionPropertyAccessNode) -> String {
        format!("{}/{}", node.source().accept(self), node.property().name())
    }

    fn visit_collection_navigation(&mut self, node: &CollectionNavigationNode) -> String {
        format!("{}/{}", node.source().accept(self), node.navigation_property().name())
    }

    fn visit_entity_set(&mut self, node: &EntitySetNode) -> String {
        node.entity_set().name().to_string()
    }

    fn visit_entity_collection_cast(&mut self, node: &EntityCollectionCastNode) -> String {
        format!("{}/{}", node.source().accept(self), node.entity_type().full_name())
    }
}

impl Printer {
    fn lambda(&mut self, name: &str, node: &LambdaNode) -> String {
        let variable = node.current_range_variable().map(RangeVariable::name).unwrap_or_default();
        let body = node.body().map(|b| b.accept(self)).unwrap_or_default();
        format!("{}/{name}({variable}:{body})", node.source().accept(self))
    }
}

#[test]
fn test_visitor_reaches_every_node_kind() {
    let core = CoreModel::instance();
    let person = EntityType::new("HR", "Person", None, false, true, false);
    person.add_structural_property("Age", core.get_int32(false));
    person.add_structural_property("Tags", core.get_collection(core.get_string(false)));
    let employee = EntityType::new("HR", "Employee", Some(person.clone()), false, false, false);
    let (reports, manager) = person
        .add_bidirectional_navigation(
            NavigationPropertyInfo::new("Reports", &person, Multiplicity::Many),
            Some(NavigationPropertyInfo {
                name: Some("Manager".to_string()),
                target_multiplicity: Multiplicity::ZeroOrOne,
                ..Default::default()
            }),
        )
        .unwrap();
    let container = EntityContainer::new("HR", "Default");
    let people = container.add_entity_set("People", person.clone());

    let it = Arc::new(EntityRangeVariable::new("$it", TypeReference::entity(&person, false), None).unwrap());
    let it_ref = || SingleValueNode::EntityRangeVariableReference(EntityRangeVariableReferenceNode::new(it.clone()));
    let age = || {
        SingleValueNode::SingleValuePropertyAccess(
            SingleValuePropertyAccessNode::new(it_ref(), person.find_structural_property("Age").unwrap()).unwrap(),
        )
    };

    let tag = Arc::new(NonentityRangeVariable::new("t", Some(core.get_string(false))).unwrap());
    let tags = CollectionNode::CollectionPropertyAccess(
        CollectionPropertyAccessNode::new(it_ref(), person.find_structural_property("Tags").unwrap()).unwrap(),
    );
    let any_tag = AnyNode::new(
        [RangeVariable::Nonentity(tag.clone())],
        Some(RangeVariable::Nonentity(tag.clone())),
        tags,
        Some(SingleValueNode::BinaryOperator(BinaryOperatorNode::new(
            BinaryOperatorKind::Equal,
            SingleValueNode::NonentityRangeVariableReference(NonentityRangeVariableReferenceNode::new(tag)),
            SingleValueNode::Constant(ConstantNode::new(ConstantValue::String("x".into()))),
        ))),
    )
    .unwrap();

    let all_reports = AllNode::new(
        [],
        None,
        CollectionNode::CollectionNavigation(CollectionNavigationNode::new(it_ref(), reports).unwrap()),
        None,
    )
    .unwrap();

    let managers_age = SingleValueNode::SingleValueOpenPropertyAccess(SingleValueOpenPropertyAccessNode::new(
        SingleValueNode::SingleEntityCast(
            SingleEntityCastNode::new(
                SingleValueNode::SingleNavigation(SingleNavigationNode::new(it_ref(), manager).unwrap()),
                employee.clone(),
            )
            .unwrap(),
        ),
        "Level",
    ));

    let call = SingleValueNode::SingleValueFunctionCall(
        SingleValueFunctionCallNode::new(
            "round",
            Vec::new(),
            vec![QueryNode::Single(SingleValueNode::Convert(ConvertNode::new(
                SingleValueNode::UnaryOperator(UnaryOperatorNode::new(UnaryOperatorKind::Negate, age())),
                core.get_double(false),
            )))],
            Some(core.get_double(false)),
        )
        .unwrap(),
    );

    let expression = SingleValueNode::BinaryOperator(BinaryOperatorNode::new(
        BinaryOperatorKind::And,
        SingleValueNode::Any(any_tag),
        SingleValueNode::BinaryOperator(BinaryOperatorNode::new(
            BinaryOperatorKind::Or,
            SingleValueNode::UnaryOperator(UnaryOperatorNode::new(
                UnaryOperatorKind::Not,
                SingleValueNode::All(all_reports),
            )),
            SingleValueNode::BinaryOperator(BinaryOperatorNode::new(
                BinaryOperatorKind::GreaterThan,
                managers_age,
                call,
            )),
        )),
    ));

    assert_eq!(
        expression.accept(&mut Printer),
        "($it/Tags/any(t:(t eq 'x')) and (not $it/Reports/all(:) or \
         ($it/Manager/HR.Employee/Level gt round(cast(-$it/Age, Edm.Double)))))"
    );

    let cast = CollectionNode::EntityCollectionCast(
        EntityCollectionCastNode::new(CollectionNode::EntitySet(EntitySetNode::new(people)), employee).unwrap(),
    );
    assert_eq!(QueryNode::Collection(cast.clone()).accept(&mut Printer), "People/HR.Employee");
    assert_eq!(cast.kind(), QueryNodeKind::EntityCollectionCast);
}

/// Counts key values and casts
#[derive(Default)]
struct SegmentLog {
    keys: usize,
    casts: usize,
}

impl PathSegmentHandler for SegmentLog {
    fn handle_key(&mut self, segment: &KeySegment) {
        self.keys += segment.keys().len();
    }

    fn handle_type(&mut self, _segment: &TypeSegment) {
        self.casts += 1;
    }
}

struct Describe;

impl PathSegmentTranslator<String> for Describe {
    fn translate_entity_set(&mut self, segment: &EntitySetSegment) -> String {
        format!("set:{}", segment.entity_set().name())
    }

    fn translate_singleton(&mut self, segment: &SingletonSegment) -> String {
        format!("singleton:{}", segment.singleton().name())
    }

    fn translate_type(&mut self, segment: &TypeSegment) -> String {
        format!("cast:{}", segment.edm_type().full_name())
    }

    fn translate_navigation_property(&mut self, segment: &NavigationPropertySegment) -> String {
        format!("nav:{}", segment.navigation_property().name())
    }

    fn translate_property(&mut self, segment: &PropertySegment) -> String {
        format!("prop:{}", segment.property().name())
    }

    fn translate_key(&mut self, segment: &KeySegment) -> String {
        format!("key:{segment}")
    }

    fn translate_count(&mut self, _segment: &CountSegment) -> String {
        "count".to_string()
    }

    fn translate_value(&mut self, segment: &ValueSegment) -> String {
        format!("value:{}", segment.edm_type().full_name())
    }

    fn translate_metadata(&mut self, _segment: &MetadataSegment) -> String {
        "metadata".to_string()
    }
}

#[test]
fn test_path_translator_and_handler() {
    let core = CoreModel::instance();
    let person = EntityType::new("HR", "Person", None, false, false, false);
    let name = person.add_structural_property("Name", core.get_string(false));
    let employee = EntityType::new("HR", "Employee", Some(person.clone()), false, false, false);
    let container = EntityContainer::new("HR", "Default");
    let people = container.add_entity_set("People", person.clone());
    let ceo = container.add_singleton("Ceo", employee.clone());
    let source = Some(NavigationSource::EntitySet(people.clone()));

    let path = ODataPath::new([
        PathSegment::EntitySet(EntitySetSegment::new(people)),
        PathSegment::Type(TypeSegment::new(employee.as_type(), person.as_type(), source.clone()).unwrap()),
        PathSegment::Key(KeySegment::new([("Id".to_string(), ConstantValue::Int32(4))], employee, source).unwrap()),
        PathSegment::Property(PropertySegment::new(name)),
        PathSegment::Value(ValueSegment::new(core.get_string(false).definition().clone())),
    ]);

    assert_eq!(
        path.translate_with(&mut Describe),
        vec!["set:People", "cast:HR.Employee", "key:(4)", "prop:Name", "value:Edm.String"]
    );
    assert_eq!(path.to_string(), "People/HR.Employee(4)/Name/$value");

    let mut log = SegmentLog::default();
    path.walk_with_handler(&mut log);
    assert_eq!((log.keys, log.casts), (1, 1));
    assert_eq!(path.first_segment().map(PathSegment::kind), Some(PathSegmentKind::EntitySet));

    let singleton = ODataPath::new([
        PathSegment::Singleton(SingletonSegment::new(ceo)),
        PathSegment::Metadata(MetadataSegment),
        PathSegment::Count(CountSegment),
    ]);
    assert_eq!(singleton.translate_with(&mut Describe), vec!["singleton:Ceo", "metadata", "count"]);
    assert!(singleton.first_segment().is_some_and(PathSegment::is_single_result));
    assert!(singleton.edm_type().is_some_and(|t| t.full_name() == "Edm.Int32"));
}

#[test]
fn test_type_segment_rejects_unrelated_cast() {
    let person = EntityType::new("HR", "Person", None, false, false, false);
    let building = EntityType::new("HR", "Building", None, false, false, false);
    let err = TypeSegment::new(building.as_type(), person.as_type(), None).unwrap_err();
    assert_eq!(err.code(), edmlib_diagnostics::ErrorCode::INCOMPATIBLE_TYPE_CAST);

    let int = EdmType::primitive(PrimitiveTypeKind::Int32);
    assert!(TypeSegment::new(int.clone(), int, None).is_ok());
}

struct CountExpanded;

impl SelectItemTranslator<usize> for CountExpanded {
    fn translate_wildcard(&mut self) -> usize {
        0
    }

    fn translate_path(&mut self, _path: &ODataPath) -> usize {
        0
    }

    fn translate_expanded_navigation(&mut self, item: &ExpandedNavigationSelectItem) -> usize {
        1 + item
            .select_expand()
            .translate_with(self)
            .into_iter()
            .sum::<usize>()
    }

    fn translate_namespace_wildcard(&mut self, _namespace: &str) -> usize {
        0
    }
}

#[test]
fn test_select_item_translator_recurses() {
    let person = EntityType::new("HR", "Person", None, false, false, false);
    let (reports, _) = person
        .add_bidirectional_navigation(NavigationPropertyInfo::new("Reports", &person, Multiplicity::Many), None)
        .unwrap();
    let expand = |inner: SelectExpandClause| {
        SelectItem::ExpandedNavigation(ExpandedNavigationSelectItem::new(
            ODataPath::default(),
            reports.clone(),
            None,
            inner,
        ))
    };
    let nested = SelectExpandClause::new(vec![expand(SelectExpandClause::default())], true);
    let clause = SelectExpandClause::new(vec![SelectItem::Wildcard, expand(nested)], false);

    assert_eq!(clause.translate_with(&mut CountExpanded), vec![0, 2]);
}
