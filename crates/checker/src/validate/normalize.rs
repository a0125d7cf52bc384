//! Expansion of shorthand rule types into a base type plus checks.

use optcheck_value::TypeTag;

use crate::rule::{Instance, Rule, RuleType};

/// What the type check compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Expected {
    /// `any`: no type or shape checks, no coercion.
    Any,
    Type(TypeTag),
    /// Non-macro rule without a type; every value fails the type check.
    Undeclared,
}

impl Expected {
    pub(crate) fn describe(self) -> String {
        match self {
            Self::Any => "any".to_owned(),
            Self::Type(tag) => tag.name().to_owned(),
            Self::Undeclared => "unspecified".to_owned(),
        }
    }
}

/// A rule's type after shorthand expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Normalized {
    pub(crate) expected: Expected,
    /// `null` shorthand: the value must be `null`.
    pub(crate) must_be_null: bool,
    /// `arraylike` shorthand.
    pub(crate) array_like: bool,
    /// `array` shorthand forces `Array`, overriding a declared instance.
    pub(crate) instance: Option<Instance>,
    pub(crate) not_float: bool,
}

impl Normalized {
    pub(crate) fn from_rule(rule: &Rule) -> Self {
        let mut normalized = Self {
            expected: Expected::Undeclared,
            must_be_null: false,
            array_like: false,
            instance: rule.instance.clone(),
            not_float: rule.not_float.unwrap_or(false),
        };
        match rule.rule_type {
            None => {}
            Some(RuleType::Any) => normalized.expected = Expected::Any,
            Some(RuleType::Base(tag)) => normalized.expected = Expected::Type(tag),
            Some(RuleType::Array) => {
                normalized.expected = Expected::Type(TypeTag::Object);
                normalized.instance = Some(Instance::Array);
            }
            Some(RuleType::ArrayLike) => {
                normalized.expected = Expected::Type(TypeTag::Object);
                normalized.array_like = true;
            }
            Some(RuleType::Null) => {
                normalized.expected = Expected::Type(TypeTag::Object);
                normalized.must_be_null = true;
            }
            Some(RuleType::Int) => {
                normalized.expected = Expected::Type(TypeTag::Number);
                normalized.not_float = true;
            }
        }
        normalized
    }

    /// Base type representation coercion converts to, if any.
    pub(crate) fn coercion_target(&self) -> Option<TypeTag> {
        match self.expected {
            Expected::Type(tag) if tag.is_coercible() => Some(tag),
            _ => None,
        }
    }
}
