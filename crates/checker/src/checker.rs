//! Holder for a validated options object.

use optcheck_value::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::declaration::Declaration;
use crate::error::Result;
use crate::options::Options;
use crate::validate::validate;

/// Property name used when the declaration does not set `opt_var_name`.
pub const DEFAULT_VAR_NAME: &str = "options";

/// Validated options stored under a configurable property name.
///
/// The name comes from the declaration's `opt_var_name` when it is a
/// non-empty string, else [`DEFAULT_VAR_NAME`]. Serializes as a one-entry
/// map `{ var_name: options }`.
///
/// ```
/// use optcheck::{Declaration, OptionChecker, Options, Rule, RuleType};
///
/// let decl = Declaration::new()
///     .with_rule("verbose", Rule::new(RuleType::Any).default_value(false))
///     .opt_var_name("config");
/// let checker = OptionChecker::new(&decl, &Options::new()).unwrap();
/// assert_eq!(checker.var_name(), "config");
/// assert_eq!(checker.options().get_bool("verbose"), Some(false));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OptionChecker {
    var_name: String,
    options: Options,
}

impl OptionChecker {
    /// Validates `options` and stores the result.
    pub fn new(declaration: &Declaration, options: &Options) -> Result<Self> {
        let var_name = match declaration.opt_var_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => DEFAULT_VAR_NAME.to_owned(),
        };
        Ok(Self {
            var_name,
            options: validate(declaration, options)?,
        })
    }

    /// Name the validated options are stored under.
    #[must_use]
    pub fn var_name(&self) -> &str {
        &self.var_name
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The validated options if `name` is the storage name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Options> {
        (name == self.var_name).then_some(&self.options)
    }

    #[must_use]
    pub fn into_options(self) -> Options {
        self.options
    }

    /// The checker as an object value: `{ var_name: options }`.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::object([(self.var_name.clone(), self.options.clone().into_value())])
    }
}

impl Serialize for OptionChecker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.var_name, &self.options)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{Rule, RuleType};
    use pretty_assertions::assert_eq;

    fn decl() -> Declaration {
        Declaration::new().with_rule("x", Rule::new(RuleType::Any))
    }

    #[test]
    fn defaults_to_options() {
        let checker = OptionChecker::new(&decl(), &Options::new().with("x", 1)).unwrap();
        assert_eq!(checker.var_name(), DEFAULT_VAR_NAME);
        assert_eq!(checker.get("options").and_then(|o| o.get_f64("x")), Some(1.0));
        assert!(checker.get("other").is_none());
    }

    #[test]
    fn empty_var_name_falls_back() {
        let checker = OptionChecker::new(&decl().opt_var_name(""), &Options::new()).unwrap();
        assert_eq!(checker.var_name(), "options");
    }

    #[test]
    fn serializes_under_var_name() {
        let checker =
            OptionChecker::new(&decl().opt_var_name("cfg"), &Options::new().with("x", "y")).unwrap();
        assert_eq!(
            serde_json::to_value(&checker).unwrap(),
            serde_json::json!({"cfg": {"x": "y"}})
        );
        assert_eq!(
            checker.to_value(),
            Value::object([("cfg", Value::object([("x", "y")]))])
        );
        assert_eq!(checker.into_options().len(), 1);
    }

    #[test]
    fn propagates_validation_errors() {
        let decl = Declaration::new().with_rule("x", Rule::new(RuleType::Any).required());
        let err = OptionChecker::new(&decl, &Options::new()).unwrap_err();
        assert_eq!(err.code(), "MISSING");
    }
}
