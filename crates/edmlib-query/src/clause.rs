//! Query option clauses

use crate::{reject, ODataPath, RangeVariable, SelectItemTranslator, SingleValueNode};
use edmlib_diagnostics::{ErrorCode, Result};
use edmlib_model::{NavigationProperty, NavigationSource, TypeReference};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

fn check_boolean(clause: &str, expression: &SingleValueNode) -> Result<()> {
    match expression.type_ref() {
        Some(type_ref) if !type_ref.is_boolean() && !type_ref.is_untyped() => Err(reject(
            ErrorCode::NON_BOOLEAN_EXPRESSION,
            format!("{clause} expression must be Boolean, got {}", type_ref.full_name()),
        )),
        _ => Ok(()),
    }
}

/// A `$filter` clause
#[derive(Debug, Clone)]
pub struct FilterClause {
    expression: SingleValueNode,
    range_variable: RangeVariable,
}

impl FilterClause {
    /// Fails unless the expression is Boolean, untyped or a null literal
    pub fn new(expression: SingleValueNode, range_variable: RangeVariable) -> Result<Self> {
        check_boolean("filter", &expression)?;
        Ok(Self {
            expression,
            range_variable,
        })
    }

    pub fn expression(&self) -> &SingleValueNode {
        &self.expression
    }

    pub fn range_variable(&self) -> &RangeVariable {
        &self.range_variable
    }

    /// Type of the items being filtered
    pub fn item_type(&self) -> Option<&TypeReference> {
        self.range_variable.type_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderByDirection {
    #[default]
    Ascending,
    Descending,
}

/// One `$orderby` key, chained to the keys that follow it
#[derive(Debug, Clone)]
pub struct OrderByClause {
    expression: SingleValueNode,
    direction: OrderByDirection,
    range_variable: RangeVariable,
    then_by: Option<Box<OrderByClause>>,
}

impl OrderByClause {
    pub fn new(
        expression: SingleValueNode,
        direction: OrderByDirection,
        range_variable: RangeVariable,
        then_by: Option<OrderByClause>,
    ) -> Self {
        Self {
            expression,
            direction,
            range_variable,
            then_by: then_by.map(Box::new),
        }
    }

    pub fn expression(&self) -> &SingleValueNode {
        &self.expression
    }

    pub fn direction(&self) -> OrderByDirection {
        self.direction
    }

    pub fn range_variable(&self) -> &RangeVariable {
        &self.range_variable
    }

    pub fn then_by(&self) -> Option<&OrderByClause> {
        self.then_by.as_deref()
    }

    pub fn item_type(&self) -> Option<&TypeReference> {
        self.range_variable.type_ref()
    }

    /// This clause followed by every then-by clause
    pub fn iter(&self) -> impl Iterator<Item = &OrderByClause> {
        std::iter::successors(Some(self), |clause| clause.then_by())
    }
}

/// A navigation property expanded in `$expand`, with its nested options
#[derive(Debug, Clone)]
pub struct ExpandedNavigationSelectItem {
    path: ODataPath,
    navigation_property: Arc<NavigationProperty>,
    navigation_source: Option<NavigationSource>,
    select_expand: SelectExpandClause,
    filter: Option<FilterClause>,
    order_by: Option<OrderByClause>,
    top: Option<u64>,
    skip: Option<u64>,
}

impl ExpandedNavigationSelectItem {
    pub fn new(
        path: ODataPath,
        navigation_property: Arc<NavigationProperty>,
        navigation_source: Option<NavigationSource>,
        select_expand: SelectExpandClause,
    ) -> Self {
        Self {
            path,
            navigation_property,
            navigation_source,
            select_expand,
            filter: None,
            order_by: None,
            top: None,
            skip: None,
        }
    }

    pub fn with_filter(mut self, filter: FilterClause) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_order_by(mut self, order_by: OrderByClause) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn with_top(mut self, top: u64) -> Self {
        self.top = Some(top);
        self
    }

    pub fn with_skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn path(&self) -> &ODataPath {
        &self.path
    }

    pub fn navigation_property(&self) -> &Arc<NavigationProperty> {
        &self.navigation_property
    }

    pub fn navigation_source(&self) -> Option<&NavigationSource> {
        self.navigation_source.as_ref()
    }

    pub fn select_expand(&self) -> &SelectExpandClause {
        &self.select_expand
    }

    pub fn filter(&self) -> Option<&FilterClause> {
        self.filter.as_ref()
    }

    pub fn order_by(&self) -> Option<&OrderByClause> {
        self.order_by.as_ref()
    }

    pub fn top(&self) -> Option<u64> {
        self.top
    }

    pub fn skip(&self) -> Option<u64> {
        self.skip
    }
}

/// One item of a `$select` or `$expand` list
#[derive(Debug, Clone)]
pub enum SelectItem {
    /// `*`
    Wildcard,
    /// A selected property or type-cast path
    Path(ODataPath),
    ExpandedNavigation(ExpandedNavigationSelectItem),
    /// `Namespace.*`
    NamespaceQualifiedWildcard(String),
}

impl SelectItem {
    pub fn translate_with<T>(&self, translator: &mut impl SelectItemTranslator<T>) -> T {
        match self {
            Self::Wildcard => translator.translate_wildcard(),
            Self::Path(path) => translator.translate_path(path),
            Self::ExpandedNavigation(item) => translator.translate_expanded_navigation(item),
            Self::NamespaceQualifiedWildcard(namespace) => translator.translate_namespace_wildcard(namespace),
        }
    }
}

/// Combined `$select` and `$expand`
#[derive(Debug, Clone, Default)]
pub struct SelectExpandClause {
    selected_items: Vec<SelectItem>,
    all_selected: bool,
}

impl SelectExpandClause {
    /// `all_selected` is true when no `$select` narrows the properties
    pub fn new(selected_items: Vec<SelectItem>, all_selected: bool) -> Self {
        Self {
            selected_items,
            all_selected,
        }
    }

    pub fn selected_items(&self) -> &[SelectItem] {
        &self.selected_items
    }

    pub fn all_selected(&self) -> bool {
        self.all_selected || self.selected_items.iter().any(|i| matches!(i, SelectItem::Wildcard))
    }

    /// The expanded navigation items, in declaration order
    pub fn expansion(&self) -> Expansion<'_> {
        Expansion {
            items: self
                .selected_items
                .iter()
                .filter_map(|item| match item {
                    SelectItem::ExpandedNavigation(expanded) => Some(expanded),
                    _ => None,
                })
                .collect(),
        }
    }

    pub fn translate_with<T>(&self, translator: &mut impl SelectItemTranslator<T>) -> Vec<T> {
        self.selected_items.iter().map(|i| i.translate_with(translator)).collect()
    }
}

/// A read-only view over the expanded items of a [`SelectExpandClause`]
#[derive(Debug, Clone)]
pub struct Expansion<'a> {
    items: Vec<&'a ExpandedNavigationSelectItem>,
}

impl<'a> Expansion<'a> {
    pub fn items(&self) -> &[&'a ExpandedNavigationSelectItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&'a ExpandedNavigationSelectItem> {
        self.items.iter().copied().find(|i| i.navigation_property().name() == name)
    }
}

/// A resolved request: resource path plus system query options
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    path: ODataPath,
    filter: Option<FilterClause>,
    order_by: Option<OrderByClause>,
    select_expand: Option<SelectExpandClause>,
    top: Option<u64>,
    skip: Option<u64>,
    count: bool,
}

impl QueryOptions {
    pub fn new(path: ODataPath) -> Self {
        Self {
            path,
            ..Default::default()
        }
    }

    pub fn with_filter(mut self, filter: FilterClause) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_order_by(mut self, order_by: OrderByClause) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn with_select_expand(mut self, select_expand: SelectExpandClause) -> Self {
        self.select_expand = Some(select_expand);
        self
    }

    pub fn with_top(mut self, top: u64) -> Self {
        self.top = Some(top);
        self
    }

    pub fn with_skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn with_count(mut self, count: bool) -> Self {
        self.count = count;
        self
    }

    pub fn path(&self) -> &ODataPath {
        &self.path
    }

    pub fn filter(&self) -> Option<&FilterClause> {
        self.filter.as_ref()
    }

    pub fn order_by(&self) -> Option<&OrderByClause> {
        self.order_by.as_ref()
    }

    pub fn select_expand(&self) -> Option<&SelectExpandClause> {
        self.select_expand.as_ref()
    }

    pub fn top(&self) -> Option<u64> {
        self.top
    }

    pub fn skip(&self) -> Option<u64> {
        self.skip
    }

    pub fn count(&self) -> bool {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConstantNode, ConstantValue, NonentityRangeVariable};
    use edmlib_model::CoreModel;

    fn it() -> RangeVariable {
        NonentityRangeVariable::new("$it", Some(CoreModel::instance().get_string(false)))
            .unwrap()
            .into()
    }

    #[test]
    fn test_filter_rejects_non_boolean() {
        let expression = SingleValueNode::Constant(ConstantNode::new(ConstantValue::String("x".into())));
        let err = FilterClause::new(expression, it()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::NON_BOOLEAN_EXPRESSION);
    }

    #[test]
    fn test_order_by_chain() {
        let key = |v| SingleValueNode::Constant(ConstantNode::new(ConstantValue::Int32(v)));
        let last = OrderByClause::new(key(2), OrderByDirection::Descending, it(), None);
        let first = OrderByClause::new(key(1), OrderByDirection::Ascending, it(), Some(last));

        let directions: Vec<_> = first.iter().map(OrderByClause::direction).collect();
        assert_eq!(directions, vec![OrderByDirection::Ascending, OrderByDirection::Descending]);
    }

    #[test]
    fn test_wildcard_selects_all() {
        let clause = SelectExpandClause::new(vec![SelectItem::Wildcard], false);
        assert!(clause.all_selected());
        assert!(clause.expansion().is_empty());
    }
}
