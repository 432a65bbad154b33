//! Single-value and collection query nodes

use crate::{
    reject, AllNode, AnyNode, EntityRangeVariable, NonentityRangeVariable, QueryNodeVisitor,
    SingleValueFunctionCallNode,
};
use edmlib_diagnostics::{ErrorCode, Result};
use edmlib_model::{
    CoreModel, EntitySet, EntityType, NavigationProperty, NavigationSource, PrimitiveTypeKind,
    StructuralProperty, TypeReference,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Discriminator over every query node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryNodeKind {
    Constant,
    Convert,
    BinaryOperator,
    UnaryOperator,
    SingleValuePropertyAccess,
    SingleValueOpenPropertyAccess,
    NonentityRangeVariableReference,
    EntityRangeVariableReference,
    SingleNavigationNode,
    SingleEntityCast,
    SingleValueFunctionCall,
    Any,
    All,
    CollectionPropertyAccess,
    CollectionNavigationNode,
    EntitySet,
    EntityCollectionCast,
}

/// Any query node
#[derive(Debug, Clone)]
pub enum QueryNode {
    Single(SingleValueNode),
    Collection(CollectionNode),
}

impl QueryNode {
    pub fn kind(&self) -> QueryNodeKind {
        match self {
            Self::Single(node) => node.kind(),
            Self::Collection(node) => node.kind(),
        }
    }

    pub fn accept<T>(&self, visitor: &mut impl QueryNodeVisitor<T>) -> T {
        match self {
            Self::Single(node) => node.accept(visitor),
            Self::Collection(node) => node.accept(visitor),
        }
    }
}

impl From<SingleValueNode> for QueryNode {
    fn from(node: SingleValueNode) -> Self {
        Self::Single(node)
    }
}

impl From<CollectionNode> for QueryNode {
    fn from(node: CollectionNode) -> Self {
        Self::Collection(node)
    }
}

/// A node producing a single value
#[derive(Debug, Clone)]
pub enum SingleValueNode {
    Constant(ConstantNode),
    Convert(ConvertNode),
    BinaryOperator(BinaryOperatorNode),
    UnaryOperator(UnaryOperatorNode),
    SingleValuePropertyAccess(SingleValuePropertyAccessNode),
    SingleValueOpenPropertyAccess(SingleValueOpenPropertyAccessNode),
    NonentityRangeVariableReference(NonentityRangeVariableReferenceNode),
    EntityRangeVariableReference(EntityRangeVariableReferenceNode),
    SingleNavigation(SingleNavigationNode),
    SingleEntityCast(SingleEntityCastNode),
    SingleValueFunctionCall(SingleValueFunctionCallNode),
    Any(AnyNode),
    All(AllNode),
}

impl SingleValueNode {
    pub fn kind(&self) -> QueryNodeKind {
        match self {
            Self::Constant(_) => QueryNodeKind::Constant,
            Self::Convert(_) => QueryNodeKind::Convert,
            Self::BinaryOperator(_) => QueryNodeKind::BinaryOperator,
            Self::UnaryOperator(_) => QueryNodeKind::UnaryOperator,
            Self::SingleValuePropertyAccess(_) => QueryNodeKind::SingleValuePropertyAccess,
            Self::SingleValueOpenPropertyAccess(_) => QueryNodeKind::SingleValueOpenPropertyAccess,
            Self::NonentityRangeVariableReference(_) => QueryNodeKind::NonentityRangeVariableReference,
            Self::EntityRangeVariableReference(_) => QueryNodeKind::EntityRangeVariableReference,
            Self::SingleNavigation(_) => QueryNodeKind::SingleNavigationNode,
            Self::SingleEntityCast(_) => QueryNodeKind::SingleEntityCast,
            Self::SingleValueFunctionCall(_) => QueryNodeKind::SingleValueFunctionCall,
            Self::Any(_) => QueryNodeKind::Any,
            Self::All(_) => QueryNodeKind::All,
        }
    }

    /// Type of the produced value; `None` for null literals and open properties
    pub fn type_ref(&self) -> Option<TypeReference> {
        match self {
            Self::Constant(n) => n.type_ref().cloned(),
            Self::Convert(n) => Some(n.type_ref().clone()),
            Self::BinaryOperator(n) => n.type_ref().cloned(),
            Self::UnaryOperator(n) => n.type_ref().cloned(),
            Self::SingleValuePropertyAccess(n) => Some(n.type_ref().clone()),
            Self::SingleValueOpenPropertyAccess(_) => None,
            Self::NonentityRangeVariableReference(n) => n.type_ref().cloned(),
            Self::EntityRangeVariableReference(n) => Some(n.type_ref().clone()),
            Self::SingleNavigation(n) => Some(n.type_ref()),
            Self::SingleEntityCast(n) => Some(n.type_ref()),
            Self::SingleValueFunctionCall(n) => n.return_type().cloned(),
            Self::Any(n) => Some(n.type_ref()),
            Self::All(n) => Some(n.type_ref()),
        }
    }

    /// Where the entity produced by this node lives, for entity-valued nodes
    pub fn navigation_source(&self) -> Option<NavigationSource> {
        match self {
            Self::EntityRangeVariableReference(n) => n.navigation_source().cloned(),
            Self::SingleNavigation(n) => n.navigation_source().cloned(),
            Self::SingleEntityCast(n) => n.navigation_source(),
            _ => None,
        }
    }

    /// Entity type of entity-valued nodes
    pub fn entity_type(&self) -> Option<Arc<EntityType>> {
        self.type_ref().and_then(|t| t.as_entity().cloned())
    }

    pub fn accept<T>(&self, visitor: &mut impl QueryNodeVisitor<T>) -> T {
        match self {
            Self::Constant(n) => visitor.visit_constant(n),
            Self::Convert(n) => visitor.visit_convert(n),
            Self::BinaryOperator(n) => visitor.visit_binary_operator(n),
            Self::UnaryOperator(n) => visitor.visit_unary_operator(n),
            Self::SingleValuePropertyAccess(n) => visitor.visit_single_value_property_access(n),
            Self::SingleValueOpenPropertyAccess(n) => visitor.visit_single_value_open_property_access(n),
            Self::NonentityRangeVariableReference(n) => visitor.visit_nonentity_range_variable_reference(n),
            Self::EntityRangeVariableReference(n) => visitor.visit_entity_range_variable_reference(n),
            Self::SingleNavigation(n) => visitor.visit_single_navigation(n),
            Self::SingleEntityCast(n) => visitor.visit_single_entity_cast(n),
            Self::SingleValueFunctionCall(n) => visitor.visit_single_value_function_call(n),
            Self::Any(n) => visitor.visit_any(n),
            Self::All(n) => visitor.visit_all(n),
        }
    }
}

/// A node producing a collection
#[derive(Debug, Clone)]
pub enum CollectionNode {
    CollectionPropertyAccess(CollectionPropertyAccessNode),
    CollectionNavigation(CollectionNavigationNode),
    EntitySet(EntitySetNode),
    EntityCollectionCast(EntityCollectionCastNode),
}

impl CollectionNode {
    pub fn kind(&self) -> QueryNodeKind {
        match self {
            Self::CollectionPropertyAccess(_) => QueryNodeKind::CollectionPropertyAccess,
            Self::CollectionNavigation(_) => QueryNodeKind::CollectionNavigationNode,
            Self::EntitySet(_) => QueryNodeKind::EntitySet,
            Self::EntityCollectionCast(_) => QueryNodeKind::EntityCollectionCast,
        }
    }

    /// Type of each item
    pub fn item_type(&self) -> TypeReference {
        match self {
            Self::CollectionPropertyAccess(n) => n.item_type(),
            Self::CollectionNavigation(n) => n.item_type(),
            Self::EntitySet(n) => n.item_type(),
            Self::EntityCollectionCast(n) => n.item_type(),
        }
    }

    /// Type of the collection as a whole
    pub fn collection_type(&self) -> TypeReference {
        match self {
            Self::CollectionPropertyAccess(n) => n.property().type_ref().clone(),
            other => CoreModel::instance().get_collection(other.item_type()),
        }
    }

    pub fn navigation_source(&self) -> Option<NavigationSource> {
        match self {
            Self::CollectionPropertyAccess(_) => None,
            Self::CollectionNavigation(n) => n.navigation_source().cloned(),
            Self::EntitySet(n) => Some(NavigationSource::EntitySet(n.entity_set().clone())),
            Self::EntityCollectionCast(n) => n.navigation_source(),
        }
    }

    pub fn accept<T>(&self, visitor: &mut impl QueryNodeVisitor<T>) -> T {
        match self {
            Self::CollectionPropertyAccess(n) => visitor.visit_collection_property_access(n),
            Self::CollectionNavigation(n) => visitor.visit_collection_navigation(n),
            Self::EntitySet(n) => visitor.visit_entity_set(n),
            Self::EntityCollectionCast(n) => visitor.visit_entity_collection_cast(n),
        }
    }
}

/// A literal value
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Null,
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Decimal(Decimal),
    Double(f64),
    String(String),
}

impl ConstantValue {
    /// Natural type of the literal; `None` for null
    pub fn type_ref(&self) -> Option<TypeReference> {
        let kind = match self {
            Self::Null => return None,
            Self::Boolean(_) => PrimitiveTypeKind::Boolean,
            Self::Int32(_) => PrimitiveTypeKind::Int32,
            Self::Int64(_) => PrimitiveTypeKind::Int64,
            Self::Decimal(_) => PrimitiveTypeKind::Decimal,
            Self::Double(_) => PrimitiveTypeKind::Double,
            Self::String(_) => PrimitiveTypeKind::String,
        };
        Some(CoreModel::instance().get_primitive(kind, false))
    }
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}L"),
            Self::Decimal(v) => write!(f, "{v}M"),
            Self::Double(v) => write!(f, "{v}D"),
            Self::String(v) => write!(f, "'{}'", v.replace('\'', "''")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConstantNode {
    value: ConstantValue,
    type_ref: Option<TypeReference>,
}

impl ConstantNode {
    /// Literal typed by its value
    pub fn new(value: ConstantValue) -> Self {
        let type_ref = value.type_ref();
        Self { value, type_ref }
    }

    /// Literal with an explicit type, such as a typed null
    pub fn with_type(value: ConstantValue, type_ref: TypeReference) -> Self {
        Self {
            value,
            type_ref: Some(type_ref),
        }
    }

    pub fn value(&self) -> &ConstantValue {
        &self.value
    }

    pub fn type_ref(&self) -> Option<&TypeReference> {
        self.type_ref.as_ref()
    }
}

/// An implicit conversion of a value to another type
#[derive(Debug, Clone)]
pub struct ConvertNode {
    source: Box<SingleValueNode>,
    type_ref: TypeReference,
}

impl ConvertNode {
    pub fn new(source: SingleValueNode, type_ref: TypeReference) -> Self {
        Self {
            source: Box::new(source),
            type_ref,
        }
    }

    pub fn source(&self) -> &SingleValueNode {
        &self.source
    }

    pub fn type_ref(&self) -> &TypeReference {
        &self.type_ref
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperatorKind {
    Or,
    And,
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Has,
}

impl BinaryOperatorKind {
    pub fn is_logical(&self) -> bool {
        matches!(self, Self::Or | Self::And)
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::NotEqual
                | Self::GreaterThan
                | Self::GreaterThanOrEqual
                | Self::LessThan
                | Self::LessThanOrEqual
                | Self::Has
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Or => "or",
            Self::And => "and",
            Self::Equal => "eq",
            Self::NotEqual => "ne",
            Self::GreaterThan => "gt",
            Self::GreaterThanOrEqual => "ge",
            Self::LessThan => "lt",
            Self::LessThanOrEqual => "le",
            Self::Add => "add",
            Self::Subtract => "sub",
            Self::Multiply => "mul",
            Self::Divide => "div",
            Self::Modulo => "mod",
            Self::Has => "has",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BinaryOperatorNode {
    operator: BinaryOperatorKind,
    left: Box<SingleValueNode>,
    right: Box<SingleValueNode>,
    type_ref: Option<TypeReference>,
}

impl BinaryOperatorNode {
    /// Combine two operands
    ///
    /// Logical and comparison operators give a Boolean that is nullable when
    /// either operand may be null. Arithmetic takes the left operand's type.
    pub fn new(operator: BinaryOperatorKind, left: SingleValueNode, right: SingleValueNode) -> Self {
        let (left_type, right_type) = (left.type_ref(), right.type_ref());
        let type_ref = if operator.is_logical() || operator.is_comparison() {
            let nullable = [left_type.as_ref(), right_type.as_ref()]
                .into_iter()
                .any(|t| t.is_none_or(TypeReference::is_nullable));
            Some(CoreModel::instance().get_boolean(nullable))
        } else {
            left_type.or(right_type)
        };
        Self {
            operator,
            left: Box::new(left),
            right: Box::new(right),
            type_ref,
        }
    }

    pub fn operator(&self) -> BinaryOperatorKind {
        self.operator
    }

    pub fn left(&self) -> &SingleValueNode {
        &self.left
    }

    pub fn right(&self) -> &SingleValueNode {
        &self.right
    }

    pub fn type_ref(&self) -> Option<&TypeReference> {
        self.type_ref.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperatorKind {
    Negate,
    Not,
}

#[derive(Debug, Clone)]
pub struct UnaryOperatorNode {
    operator: UnaryOperatorKind,
    operand: Box<SingleValueNode>,
    type_ref: Option<TypeReference>,
}

impl UnaryOperatorNode {
    pub fn new(operator: UnaryOperatorKind, operand: SingleValueNode) -> Self {
        let type_ref = operand.type_ref();
        Self {
            operator,
            operand: Box::new(operand),
            type_ref,
        }
    }

    pub fn operator(&self) -> UnaryOperatorKind {
        self.operator
    }

    pub fn operand(&self) -> &SingleValueNode {
        &self.operand
    }

    pub fn type_ref(&self) -> Option<&TypeReference> {
        self.type_ref.as_ref()
    }
}

/// Access to a single-valued declared property
#[derive(Debug, Clone)]
pub struct SingleValuePropertyAccessNode {
    source: Box<SingleValueNode>,
    property: Arc<StructuralProperty>,
}

impl SingleValuePropertyAccessNode {
    /// Fails for collection-valued properties
    pub fn new(source: SingleValueNode, property: Arc<StructuralProperty>) -> Result<Self> {
        if property.type_ref().is_collection() {
            return Err(reject(
                ErrorCode::PROPERTY_SHAPE_MISMATCH,
                format!(
                    "property '{}' is collection-valued; use a collection property access",
                    property.name()
                ),
            ));
        }
        Ok(Self {
            source: Box::new(source),
            property,
        })
    }

    pub fn source(&self) -> &SingleValueNode {
        &self.source
    }

    pub fn property(&self) -> &Arc<StructuralProperty> {
        &self.property
    }

    pub fn type_ref(&self) -> &TypeReference {
        self.property.type_ref()
    }
}

/// Access to a dynamic property of an open type
#[derive(Debug, Clone)]
pub struct SingleValueOpenPropertyAccessNode {
    source: Box<SingleValueNode>,
    name: String,
}

impl SingleValueOpenPropertyAccessNode {
    pub fn new(source: SingleValueNode, name: impl Into<String>) -> Self {
        Self {
            source: Box::new(source),
            name: name.into(),
        }
    }

    pub fn source(&self) -> &SingleValueNode {
        &self.source
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Access to a collection-valued declared property
#[derive(Debug, Clone)]
pub struct CollectionPropertyAccessNode {
    source: Box<SingleValueNode>,
    property: Arc<StructuralProperty>,
}

impl CollectionPropertyAccessNode {
    /// Fails for single-valued properties
    pub fn new(source: SingleValueNode, property: Arc<StructuralProperty>) -> Result<Self> {
        if !property.type_ref().is_collection() {
            return Err(reject(
                ErrorCode::PROPERTY_SHAPE_MISMATCH,
                format!(
                    "property '{}' is single-valued; use a single-value property access",
                    property.name()
                ),
            ));
        }
        Ok(Self {
            source: Box::new(source),
            property,
        })
    }

    pub fn source(&self) -> &SingleValueNode {
        &self.source
    }

    pub fn property(&self) -> &Arc<StructuralProperty> {
        &self.property
    }

    pub fn item_type(&self) -> TypeReference {
        match self.property.type_ref().element_type() {
            Some(element) => element.clone(),
            None => self.property.type_ref().clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NonentityRangeVariableReferenceNode {
    range_variable: Arc<NonentityRangeVariable>,
}

impl NonentityRangeVariableReferenceNode {
    pub fn new(range_variable: Arc<NonentityRangeVariable>) -> Self {
        Self { range_variable }
    }

    pub fn name(&self) -> &str {
        self.range_variable.name()
    }

    pub fn range_variable(&self) -> &Arc<NonentityRangeVariable> {
        &self.range_variable
    }

    pub fn type_ref(&self) -> Option<&TypeReference> {
        self.range_variable.type_ref()
    }
}

#[derive(Debug, Clone)]
pub struct EntityRangeVariableReferenceNode {
    range_variable: Arc<EntityRangeVariable>,
}

impl EntityRangeVariableReferenceNode {
    pub fn new(range_variable: Arc<EntityRangeVariable>) -> Self {
        Self { range_variable }
    }

    pub fn name(&self) -> &str {
        self.range_variable.name()
    }

    pub fn range_variable(&self) -> &Arc<EntityRangeVariable> {
        &self.range_variable
    }

    pub fn type_ref(&self) -> &TypeReference {
        self.range_variable.type_ref()
    }

    pub fn navigation_source(&self) -> Option<&NavigationSource> {
        self.range_variable.navigation_source()
    }
}

/// Navigation to a single related entity
#[derive(Debug, Clone)]
pub struct SingleNavigationNode {
    source: Box<SingleValueNode>,
    navigation_property: Arc<NavigationProperty>,
    navigation_source: Option<NavigationSource>,
}

impl SingleNavigationNode {
    /// Fails when the property reaches many entities
    ///
    /// The target source comes from the source node's navigation bindings.
    pub fn new(source: SingleValueNode, navigation_property: Arc<NavigationProperty>) -> Result<Self> {
        if !navigation_property.target_multiplicity().is_single() {
            return Err(reject(
                ErrorCode::NAVIGATION_MULTIPLICITY_MISMATCH,
                format!(
                    "navigation property '{}' has multiplicity {}; a single navigation needs One or ZeroOrOne",
                    navigation_property.name(),
                    navigation_property.target_multiplicity()
                ),
            ));
        }
        let navigation_source = source
            .navigation_source()
            .and_then(|s| s.find_navigation_target(&navigation_property));
        Ok(Self {
            source: Box::new(source),
            navigation_property,
            navigation_source,
        })
    }

    pub fn source(&self) -> &SingleValueNode {
        &self.source
    }

    pub fn navigation_property(&self) -> &Arc<NavigationProperty> {
        &self.navigation_property
    }

    pub fn navigation_source(&self) -> Option<&NavigationSource> {
        self.navigation_source.as_ref()
    }

    pub fn type_ref(&self) -> TypeReference {
        self.navigation_property.type_ref()
    }
}

/// Navigation to many related entities
#[derive(Debug, Clone)]
pub struct CollectionNavigationNode {
    source: Box<SingleValueNode>,
    navigation_property: Arc<NavigationProperty>,
    navigation_source: Option<NavigationSource>,
}

impl CollectionNavigationNode {
    /// Fails unless the property reaches many entities
    pub fn new(source: SingleValueNode, navigation_property: Arc<NavigationProperty>) -> Result<Self> {
        if navigation_property.target_multiplicity().is_single() {
            return Err(reject(
                ErrorCode::NAVIGATION_MULTIPLICITY_MISMATCH,
                format!(
                    "navigation property '{}' reaches a single entity; use a single navigation",
                    navigation_property.name()
                ),
            ));
        }
        let navigation_source = source
            .navigation_source()
            .and_then(|s| s.find_navigation_target(&navigation_property));
        Ok(Self {
            source: Box::new(source),
            navigation_property,
            navigation_source,
        })
    }

    pub fn source(&self) -> &SingleValueNode {
        &self.source
    }

    pub fn navigation_property(&self) -> &Arc<NavigationProperty> {
        &self.navigation_property
    }

    pub fn navigation_source(&self) -> Option<&NavigationSource> {
        self.navigation_source.as_ref()
    }

    pub fn item_type(&self) -> TypeReference {
        let type_ref = self.navigation_property.type_ref();
        match type_ref.element_type() {
            Some(element) => element.clone(),
            None => type_ref,
        }
    }
}

/// A cast of a single entity to a related entity type
#[derive(Debug, Clone)]
pub struct SingleEntityCastNode {
    source: Box<SingleValueNode>,
    entity_type: Arc<EntityType>,
}

impl SingleEntityCastNode {
    /// Fails when the source is not an entity related to the target.
    /// Null literals, open properties and untyped values are cast unchecked.
    pub fn new(source: SingleValueNode, entity_type: Arc<EntityType>) -> Result<Self> {
        match source.type_ref() {
            None => {}
            Some(source_type) if source_type.is_untyped() => {}
            Some(source_type) => match source_type.as_entity() {
                Some(source_entity) => check_related(source_entity, &entity_type)?,
                None => {
                    return Err(reject(
                        ErrorCode::ENTITY_TYPE_EXPECTED,
                        format!(
                            "cannot cast a value of {} to entity type {}",
                            source_type.full_name(),
                            entity_type.full_name()
                        ),
                    ));
                }
            },
        }
        Ok(Self {
            source: Box::new(source),
            entity_type,
        })
    }

    pub fn source(&self) -> &SingleValueNode {
        &self.source
    }

    pub fn entity_type(&self) -> &Arc<EntityType> {
        &self.entity_type
    }

    pub fn navigation_source(&self) -> Option<NavigationSource> {
        self.source.navigation_source()
    }

    pub fn type_ref(&self) -> TypeReference {
        TypeReference::entity(&self.entity_type, false)
    }
}

/// The entities of an entity set
#[derive(Debug, Clone)]
pub struct EntitySetNode {
    entity_set: Arc<EntitySet>,
}

impl EntitySetNode {
    pub fn new(entity_set: Arc<EntitySet>) -> Self {
        Self { entity_set }
    }

    pub fn entity_set(&self) -> &Arc<EntitySet> {
        &self.entity_set
    }

    pub fn item_type(&self) -> TypeReference {
        TypeReference::entity(self.entity_set.entity_type(), false)
    }
}

/// A cast of an entity collection to a related entity type
#[derive(Debug, Clone)]
pub struct EntityCollectionCastNode {
    source: Box<CollectionNode>,
    entity_type: Arc<EntityType>,
}

impl EntityCollectionCastNode {
    /// Fails when the source items are not entities related to the target
    pub fn new(source: CollectionNode, entity_type: Arc<EntityType>) -> Result<Self> {
        let item_type = source.item_type();
        match item_type.as_entity() {
            Some(source_type) => check_related(source_type, &entity_type)?,
            None => {
                return Err(reject(
                    ErrorCode::ENTITY_TYPE_EXPECTED,
                    format!(
                        "cannot cast a collection of {} to entity type {}",
                        item_type.full_name(),
                        entity_type.full_name()
                    ),
                ));
            }
        }
        Ok(Self {
            source: Box::new(source),
            entity_type,
        })
    }

    pub fn source(&self) -> &CollectionNode {
        &self.source
    }

    pub fn entity_type(&self) -> &Arc<EntityType> {
        &self.entity_type
    }

    pub fn navigation_source(&self) -> Option<NavigationSource> {
        self.source.navigation_source()
    }

    pub fn item_type(&self) -> TypeReference {
        TypeReference::entity(&self.entity_type, false)
    }
}

fn check_related(source: &Arc<EntityType>, target: &Arc<EntityType>) -> Result<()> {
    if source.is_or_inherits_from(target) || target.is_or_inherits_from(source) {
        return Ok(());
    }
    Err(reject(
        ErrorCode::INCOMPATIBLE_TYPE_CAST,
        format!(
            "type {} is not related to {}",
            target.full_name(),
            source.full_name()
        ),
    ))
}

