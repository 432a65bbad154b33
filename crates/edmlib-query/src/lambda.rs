//! `any` and `all` lambda nodes

use crate::{reject, CollectionNode, RangeVariable, SingleValueNode};
use edmlib_diagnostics::{ErrorCode, Result};
use edmlib_model::{CoreModel, TypeReference};
use smallvec::SmallVec;

/// Range variables in scope inside a lambda body, innermost last
pub type LambdaParameters = SmallVec<[RangeVariable; 2]>;

/// Shared state of `any` and `all`
#[derive(Debug, Clone)]
pub struct LambdaNode {
    parameters: LambdaParameters,
    current_range_variable: Option<RangeVariable>,
    source: Box<CollectionNode>,
    body: Option<Box<SingleValueNode>>,
}

impl LambdaNode {
    fn new(
        parameters: impl IntoIterator<Item = RangeVariable>,
        current_range_variable: Option<RangeVariable>,
        source: CollectionNode,
        body: Option<SingleValueNode>,
    ) -> Result<Self> {
        if let Some(body_type) = body.as_ref().and_then(SingleValueNode::type_ref) {
            if !body_type.is_boolean() && !body_type.is_untyped() {
                return Err(reject(
                    ErrorCode::NON_BOOLEAN_EXPRESSION,
                    format!("lambda body must be Boolean, got {}", body_type.full_name()),
                ));
            }
        }
        Ok(Self {
            parameters: parameters.into_iter().collect(),
            current_range_variable,
            source: Box::new(source),
            body: body.map(Box::new),
        })
    }

    pub fn parameters(&self) -> &[RangeVariable] {
        &self.parameters
    }

    /// The variable bound by this lambda; absent for `any()` without arguments
    pub fn current_range_variable(&self) -> Option<&RangeVariable> {
        self.current_range_variable.as_ref()
    }

    pub fn source(&self) -> &CollectionNode {
        &self.source
    }

    pub fn body(&self) -> Option<&SingleValueNode> {
        self.body.as_deref()
    }

    pub fn type_ref(&self) -> TypeReference {
        CoreModel::instance().get_boolean(false)
    }
}

macro_rules! lambda_node {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone)]
        pub struct $name(LambdaNode);

        impl $name {
            /// Fails when the body is neither Boolean nor untyped
            pub fn new(
                parameters: impl IntoIterator<Item = RangeVariable>,
                current_range_variable: Option<RangeVariable>,
                source: CollectionNode,
                body: Option<SingleValueNode>,
            ) -> Result<Self> {
                LambdaNode::new(parameters, current_range_variable, source, body).map(Self)
            }
        }

        impl std::ops::Deref for $name {
            type Target = LambdaNode;

            fn deref(&self) -> &LambdaNode {
                &self.0
            }
        }
    };
}

lambda_node!(AnyNode, "True when the body holds for at least one item of the source");
lambda_node!(AllNode, "True when the body holds for every item of the source");
