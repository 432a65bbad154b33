//! Terms and vocabulary annotations

use crate::{BadElement, BadElementKind, Checked, EdmType, PrimitiveTypeKind, TypeReference};
use edmlib_annotations::Element;
use edmlib_diagnostics::{EdmError, ErrorCode};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A vocabulary term
#[derive(Debug)]
pub struct Term {
    namespace: String,
    name: String,
    type_ref: TypeReference,
    applies_to: Vec<String>,
    default_value: Option<String>,
}

impl Term {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, type_ref: TypeReference) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            type_ref,
            applies_to: Vec::new(),
            default_value: None,
        }
    }

    /// Set the value used by annotations that omit one
    pub fn with_default_value(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    /// Restrict the element kinds this term applies to
    pub fn with_applies_to(mut self, applies_to: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.applies_to = applies_to.into_iter().map(Into::into).collect();
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    pub fn type_ref(&self) -> &TypeReference {
        &self.type_ref
    }

    pub fn applies_to(&self) -> &[String] {
        &self.applies_to
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

/// A constant annotation value expression
#[derive(Debug, Clone, PartialEq)]
pub enum EdmExpression {
    Null,
    Boolean(bool),
    Integer(i64),
    Decimal(Decimal),
    Float(f64),
    String(String),
    EnumMember(String),
    Path(String),
    Collection(Vec<EdmExpression>),
    Bad(Arc<BadElement>),
}

impl EdmExpression {
    /// Interpret a default value string against the declared type
    ///
    /// A value that does not parse as the declared type gives a bad expression.
    pub fn parse_default(raw: &str, type_ref: &TypeReference) -> Self {
        let parsed = match type_ref.definition() {
            EdmType::Primitive(p) => match p.kind() {
                PrimitiveTypeKind::Boolean => parse_bool(raw).map(Self::Boolean),
                k if k.is_integral() => parse_integral(raw, k).map(Self::Integer),
                PrimitiveTypeKind::Decimal => Decimal::from_str(raw.trim()).ok().map(Self::Decimal),
                PrimitiveTypeKind::Double | PrimitiveTypeKind::Single => {
                    raw.trim().parse::<f64>().ok().map(Self::Float)
                }
                _ => Some(Self::String(raw.to_string())),
            },
            EdmType::Enum(_) => Some(Self::EnumMember(raw.to_string())),
            EdmType::Path(_) => Some(Self::Path(raw.to_string())),
            _ => Some(Self::String(raw.to_string())),
        };

        parsed.unwrap_or_else(|| {
            Self::Bad(BadElement::new(
                BadElementKind::Expression,
                [EdmError::new(
                    ErrorCode::INVALID_DEFAULT_VALUE,
                    format!("The default value '{raw}' is not a valid {}.", type_ref.full_name()),
                )],
            ))
        })
    }

    pub fn is_bad(&self) -> bool {
        matches!(self, Self::Bad(_))
    }

    pub fn errors(&self) -> Vec<EdmError> {
        match self {
            Self::Bad(bad) => bad.errors().to_vec(),
            Self::Collection(items) => items.iter().flat_map(Self::errors).collect(),
            _ => Vec::new(),
        }
    }
}

/// Parses in the width of `kind`, so out-of-range values fail
fn parse_integral(raw: &str, kind: PrimitiveTypeKind) -> Option<i64> {
    let raw = raw.trim();
    match kind {
        PrimitiveTypeKind::Byte => raw.parse::<u8>().ok().map(i64::from),
        PrimitiveTypeKind::SByte => raw.parse::<i8>().ok().map(i64::from),
        PrimitiveTypeKind::Int16 => raw.parse::<i16>().ok().map(i64::from),
        PrimitiveTypeKind::Int32 => raw.parse::<i32>().ok().map(i64::from),
        _ => raw.parse::<i64>().ok(),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        s if s.eq_ignore_ascii_case("true") => Some(true),
        s if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

/// A term applied to a target element
pub struct VocabularyAnnotation {
    target: Element,
    term: Checked<Arc<Term>>,
    qualifier: Option<String>,
    value: Option<EdmExpression>,
}

impl VocabularyAnnotation {
    /// Annotate `target` with `term`; `None` uses the term's default value
    pub fn new(target: impl Into<Element>, term: Checked<Arc<Term>>, value: Option<EdmExpression>) -> Self {
        Self {
            target: target.into(),
            term,
            qualifier: None,
            value,
        }
    }

    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    pub fn target(&self) -> &Element {
        &self.target
    }

    pub fn term(&self) -> &Checked<Arc<Term>> {
        &self.term
    }

    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// Whether the value comes from the term's default
    pub fn uses_default(&self) -> bool {
        self.value.is_none()
    }

    /// The explicit value, else the term's default interpreted by the term type
    pub fn value(&self) -> Option<EdmExpression> {
        if let Some(value) = &self.value {
            return Some(value.clone());
        }
        let term = self.term.valid()?;
        term.default_value()
            .map(|raw| EdmExpression::parse_default(raw, term.type_ref()))
    }

    /// Errors from a bad term or a bad value
    pub fn errors(&self) -> Vec<EdmError> {
        let mut errors = self.term.errors().to_vec();
        if let Some(value) = self.value() {
            errors.extend(value.errors());
        }
        errors
    }
}

impl fmt::Debug for VocabularyAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VocabularyAnnotation")
            .field("target", &self.target)
            .field("term", &self.term.name())
            .field("qualifier", &self.qualifier)
            .field("value", &self.value)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoreModel;
    use rstest::rstest;

    #[rstest]
    #[case::boolean(PrimitiveTypeKind::Boolean, "True", EdmExpression::Boolean(true))]
    #[case::int(PrimitiveTypeKind::Int16, " 42 ", EdmExpression::Integer(42))]
    #[case::decimal(PrimitiveTypeKind::Decimal, "3.50", EdmExpression::Decimal(Decimal::new(350, 2)))]
    #[case::double(PrimitiveTypeKind::Double, "1.5", EdmExpression::Float(1.5))]
    #[case::string(PrimitiveTypeKind::String, "abc", EdmExpression::String("abc".to_string()))]
    fn test_parse_default(#[case] kind: PrimitiveTypeKind, #[case] raw: &str, #[case] expected: EdmExpression) {
        let type_ref = CoreModel::instance().get_primitive(kind, false);
        assert_eq!(EdmExpression::parse_default(raw, &type_ref), expected);
    }

    #[test]
    fn test_invalid_default_is_bad() {
        let type_ref = CoreModel::instance().get_int32(false);
        let value = EdmExpression::parse_default("forty", &type_ref);
        assert!(value.is_bad());
        assert_eq!(value.errors()[0].code, ErrorCode::INVALID_DEFAULT_VALUE);
    }
}
