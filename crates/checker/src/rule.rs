//! Per-option rules.
//!
//! A [`Rule`] is the declarative contract for one option. Every field is
//! optional: an unset field is what lets a rule inherit it through a
//! `reference` chain (see [`Rule::merged_over`]).

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use optcheck_value::{TypeTag, UnknownType, Value};
use serde::{Deserialize, Serialize};

// ============================================================================
// RULE TYPE
// ============================================================================

/// Declared type of a rule: a base type or one of the shorthand types
/// that expand into a base type plus extra checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RuleType {
    Base(TypeTag),
    /// Skips every type and shape check.
    Any,
    /// `object` that is an `Array` instance.
    Array,
    /// `object` that is exactly `null`.
    Null,
    /// `number` without a fractional part.
    Int,
    /// `object` that is array-like.
    ArrayLike,
}

impl RuleType {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Base(tag) => tag.name(),
            Self::Any => "any",
            Self::Array => "array",
            Self::Null => "null",
            Self::Int => "int",
            Self::ArrayLike => "arraylike",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RuleType {
    type Err = UnknownType;

    /// Parses a declared type name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "any" => Ok(Self::Any),
            "array" => Ok(Self::Array),
            "null" => Ok(Self::Null),
            "int" => Ok(Self::Int),
            "arraylike" => Ok(Self::ArrayLike),
            _ => s.parse().map(Self::Base),
        }
    }
}

impl TryFrom<String> for RuleType {
    type Error = UnknownType;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RuleType> for String {
    fn from(t: RuleType) -> Self {
        t.name().to_owned()
    }
}

impl From<TypeTag> for RuleType {
    fn from(tag: TypeTag) -> Self {
        Self::Base(tag)
    }
}

// ============================================================================
// INSTANCE
// ============================================================================

/// Constructor an `object`/`function` value must be an instance of.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Instance {
    /// Any non-null object, functions included.
    Object,
    Array,
    /// Any typed array regardless of element kind.
    TypedArray,
    Map,
    Set,
    Function,
    /// A class name, matched against an object's class or a typed array's
    /// kind (`Uint8Array` and so on).
    Named(String),
}

impl Instance {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Object => "Object",
            Self::Array => "Array",
            Self::TypedArray => "TypedArray",
            Self::Map => "Map",
            Self::Set => "Set",
            Self::Function => "Function",
            Self::Named(name) => name,
        }
    }

    /// Whether `value` is an instance of this constructor.
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Object, v) => v.is_object_like(),
            (Self::Array, Value::Array(_))
            | (Self::TypedArray, Value::TypedArray(_))
            | (Self::Map, Value::Map(_))
            | (Self::Set, Value::Set(_))
            | (Self::Function, Value::Function(_)) => true,
            (Self::Named(name), Value::Object(obj)) => obj.class() == Some(name.as_str()),
            (Self::Named(name), Value::TypedArray(arr)) => arr.kind().name() == name,
            _ => false,
        }
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for Instance {
    fn from(name: String) -> Self {
        match name.as_str() {
            "Object" => Self::Object,
            "Array" => Self::Array,
            "TypedArray" => Self::TypedArray,
            "Map" => Self::Map,
            "Set" => Self::Set,
            "Function" => Self::Function,
            _ => Self::Named(name),
        }
    }
}

impl From<&str> for Instance {
    fn from(name: &str) -> Self {
        Self::from(name.to_owned())
    }
}

impl From<Instance> for String {
    fn from(instance: Instance) -> Self {
        match instance {
            Instance::Named(name) => name,
            other => other.name().to_owned(),
        }
    }
}

// ============================================================================
// HOOKS
// ============================================================================

/// Value-rewriting hook (`on_wrong_type`, `transform_fn`).
#[derive(Clone)]
pub struct Transform(Arc<dyn Fn(Value) -> Value + Send + Sync>);

impl Transform {
    pub fn new(f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, value: Value) -> Value {
        (self.0)(value)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transform(..)")
    }
}

/// Hooks compare by identity.
impl PartialEq for Transform {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Acceptance predicate (`pass_test`).
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn(&Value) -> bool + Send + Sync>);

impl Predicate {
    pub fn new(f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn test(&self, value: &Value) -> bool {
        (self.0)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

// ============================================================================
// RULE
// ============================================================================

/// Contract for one option.
///
/// Built fluently or loaded from JSON (snake_case keys, camelCase
/// accepted as aliases). Hooks cannot be expressed in JSON and are
/// attached afterwards.
///
/// ```
/// use optcheck::{Rule, RuleType};
///
/// let port = Rule::new(RuleType::Int).required().min(1.0).max(65535.0);
/// let alias = Rule::macro_for("port");
/// assert!(port.is_required());
/// assert!(alias.is_macro());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Rule {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<RuleType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(
        alias = "defaultValue",
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_value: Option<Value>,
    #[serde(skip)]
    pub on_wrong_type: Option<Transform>,
    #[serde(skip)]
    pub transform_fn: Option<Transform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(alias = "minLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(alias = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<Instance>,
    #[serde(alias = "notFloat", skip_serializing_if = "Option::is_none")]
    pub not_float: Option<bool>,
    #[serde(alias = "notNaN", skip_serializing_if = "Option::is_none")]
    pub not_nan: Option<bool>,
    #[serde(alias = "notInfinite", skip_serializing_if = "Option::is_none")]
    pub not_infinite: Option<bool>,
    #[serde(alias = "coerceType", skip_serializing_if = "Option::is_none")]
    pub coerce_type: Option<bool>,
    #[serde(skip)]
    pub pass_test: Option<Predicate>,
    #[serde(alias = "testFullValue", skip_serializing_if = "Option::is_none")]
    pub test_full_value: Option<bool>,
    #[serde(alias = "allowPartialPass", skip_serializing_if = "Option::is_none")]
    pub allow_partial_pass: Option<bool>,
    #[serde(alias = "compactArrayLike", skip_serializing_if = "Option::is_none")]
    pub compact_array_like: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(alias = "macroFor", skip_serializing_if = "Option::is_none")]
    pub macro_for: Option<String>,
    #[serde(alias = "mapTo", skip_serializing_if = "Option::is_none")]
    pub map_to: Option<String>,
    #[serde(alias = "allowOverride", skip_serializing_if = "Option::is_none")]
    pub allow_override: Option<bool>,
}

/// A present `default_value` of `null` is a `null` default, not an unset one.
fn present<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl Rule {
    /// Creates a rule of the given type.
    pub fn new(rule_type: impl Into<RuleType>) -> Self {
        Self {
            rule_type: Some(rule_type.into()),
            ..Self::default()
        }
    }

    /// Creates a macro rule redirecting its value into `target`'s slot.
    pub fn macro_for(target: impl Into<String>) -> Self {
        Self {
            macro_for: Some(target.into()),
            ..Self::default()
        }
    }

    /// Creates a rule inheriting every field of `target`.
    pub fn reference(target: impl Into<String>) -> Self {
        Self {
            reference: Some(target.into()),
            ..Self::default()
        }
    }

    // ------------------------------------------------------------------------
    // Builder
    // ------------------------------------------------------------------------

    #[must_use = "builder methods must be chained or built"]
    pub fn with_type(mut self, rule_type: impl Into<RuleType>) -> Self {
        self.rule_type = Some(rule_type.into());
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_reference(mut self, target: impl Into<String>) -> Self {
        self.reference = Some(target.into());
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn required(mut self) -> Self {
        self.required = Some(true);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn on_wrong_type(mut self, f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        self.on_wrong_type = Some(Transform::new(f));
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn transform(mut self, f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        self.transform_fn = Some(Transform::new(f));
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn min_length(mut self, len: usize) -> Self {
        self.min_length = Some(len);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn max_length(mut self, len: usize) -> Self {
        self.max_length = Some(len);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn instance(mut self, instance: impl Into<Instance>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn not_float(mut self) -> Self {
        self.not_float = Some(true);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn not_nan(mut self) -> Self {
        self.not_nan = Some(true);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn not_infinite(mut self) -> Self {
        self.not_infinite = Some(true);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn coerce(mut self) -> Self {
        self.coerce_type = Some(true);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn pass_test(mut self, f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        self.pass_test = Some(Predicate::new(f));
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn test_full_value(mut self) -> Self {
        self.test_full_value = Some(true);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn allow_partial_pass(mut self) -> Self {
        self.allow_partial_pass = Some(true);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn compact_array_like(mut self) -> Self {
        self.compact_array_like = Some(true);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn map_to(mut self, key: impl Into<String>) -> Self {
        self.map_to = Some(key.into());
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn allow_override(mut self, allow: bool) -> Self {
        self.allow_override = Some(allow);
        self
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }

    /// Whether this rule redirects its value into another option's slot.
    #[must_use]
    pub fn is_macro(&self) -> bool {
        self.macro_for.is_some()
    }

    /// Whether the option writes somewhere other than its own key.
    #[must_use]
    pub fn is_redirected(&self) -> bool {
        self.macro_for.is_some() || self.map_to.is_some()
    }

    /// Field-wise merge: every field set on `self` wins, unset fields are
    /// taken from `base`.
    #[must_use]
    pub fn merged_over(&self, base: &Self) -> Self {
        macro_rules! pick {
            ($($field:ident),* $(,)?) => {
                Self {
                    $($field: self.$field.clone().or_else(|| base.$field.clone()),)*
                }
            };
        }
        pick!(
            rule_type,
            required,
            default_value,
            on_wrong_type,
            transform_fn,
            min,
            max,
            min_length,
            max_length,
            instance,
            not_float,
            not_nan,
            not_infinite,
            coerce_type,
            pass_test,
            test_full_value,
            allow_partial_pass,
            compact_array_like,
            reference,
            macro_for,
            map_to,
            allow_override,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use optcheck_value::{Function, Object, TypedArray, TypedArrayKind};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("number", RuleType::Base(TypeTag::Number))]
    #[case("Number", RuleType::Base(TypeTag::Number))]
    #[case("ANY", RuleType::Any)]
    #[case("arrayLike", RuleType::ArrayLike)]
    #[case("Int", RuleType::Int)]
    #[case("null", RuleType::Null)]
    #[case("array", RuleType::Array)]
    fn parses_rule_types(#[case] input: &str, #[case] expected: RuleType) {
        assert_eq!(input.parse::<RuleType>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_rule_type() {
        assert!("integer".parse::<RuleType>().is_err());
    }

    #[test]
    fn instance_matching() {
        let point = Value::from(Object::with_class("Point"));
        assert!(Instance::Object.matches(&point));
        assert!(Instance::from("Point").matches(&point));
        assert!(!Instance::from("Line").matches(&point));
        assert!(!Instance::Object.matches(&Value::Null));
        assert!(Instance::Object.matches(&Value::from(Function::new("f", 0))));
        assert!(Instance::Array.matches(&Value::array([1])));
        assert!(!Instance::Array.matches(&Value::object([("length", 0)])));

        let bytes = Value::from(TypedArray::zeroed(TypedArrayKind::Uint8, 2));
        assert!(Instance::TypedArray.matches(&bytes));
        assert!(Instance::from("Uint8Array").matches(&bytes));
        assert!(!Instance::from("Int8Array").matches(&bytes));
    }

    #[test]
    fn nearer_fields_win_in_merge() {
        let base = Rule::new(RuleType::Base(TypeTag::Number))
            .min(1.0)
            .max(2.0)
            .default_value(1);
        let near = Rule::new(RuleType::Int).max(5.0).with_reference("base");

        let merged = near.merged_over(&base);
        assert_eq!(merged.rule_type, Some(RuleType::Int));
        assert_eq!(merged.min, Some(1.0));
        assert_eq!(merged.max, Some(5.0));
        assert_eq!(merged.default_value, Some(Value::from(1)));
        assert_eq!(merged.reference.as_deref(), Some("base"));
    }

    #[test]
    fn merge_inherits_macro_target() {
        let merged = Rule::reference("m").merged_over(&Rule::macro_for("target"));
        assert!(merged.is_macro());
    }

    #[test]
    fn hooks_survive_merge_by_identity() {
        let base = Rule::default().pass_test(|v| v.truthy());
        let merged = Rule::default().merged_over(&base);
        assert_eq!(merged.pass_test, base.pass_test);
        assert!(merged.pass_test.is_some_and(|p| p.test(&Value::from(1))));
    }

    #[test]
    fn deserializes_snake_and_camel_case() {
        let rule: Rule = serde_json::from_str(
            r#"{"type": "Number", "required": true, "defaultValue": 3, "min_length": 2, "macroFor": "x"}"#,
        )
        .unwrap();
        assert_eq!(rule.rule_type, Some(RuleType::Base(TypeTag::Number)));
        assert!(rule.is_required());
        assert_eq!(rule.default_value, Some(Value::from(3)));
        assert_eq!(rule.min_length, Some(2));
        assert_eq!(rule.macro_for.as_deref(), Some("x"));
    }

    #[test]
    fn null_default_is_kept() {
        let rule: Rule = serde_json::from_str(r#"{"type": "any", "default_value": null}"#).unwrap();
        assert_eq!(rule.default_value, Some(Value::Null));
        let rule: Rule = serde_json::from_str(r#"{"type": "any"}"#).unwrap();
        assert_eq!(rule.default_value, None);
    }

    #[test]
    fn rejects_unknown_fields_and_types() {
        assert!(serde_json::from_str::<Rule>(r#"{"type": "number", "maximum": 3}"#).is_err());
        assert!(serde_json::from_str::<Rule>(r#"{"type": "integer"}"#).is_err());
    }

    #[test]
    fn serializes_only_set_fields() {
        let rule = Rule::new(RuleType::Array).min_length(1).instance("Array");
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "array", "min_length": 1, "instance": "Array"})
        );
    }
}
