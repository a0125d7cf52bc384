//! Option declarations: the rule set plus global switches.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::Result;
use crate::rule::Rule;

/// Shared handle to the sink a declaration reports warnings to.
#[derive(Clone)]
struct Sink(Arc<dyn DiagnosticSink>);

impl Default for Sink {
    fn default() -> Self {
        Self(Arc::new(TracingSink))
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DiagnosticSink")
    }
}

const fn enabled() -> bool {
    true
}

/// Ordered rules keyed by option name, plus the switches that govern
/// unrecognized keys, broken references and output overrides.
///
/// Rule order matters: options are processed in declaration order, with
/// mapped and macro options deferred to the end.
///
/// ```
/// use optcheck::{Declaration, Rule, RuleType};
/// use optcheck_value::TypeTag;
///
/// let decl = Declaration::new()
///     .with_rule("port", Rule::new(TypeTag::Number).required())
///     .with_rule("p", Rule::macro_for("port"))
///     .throw_on_unrecognized(true);
/// assert_eq!(decl.len(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Declaration {
    options: IndexMap<String, Rule>,
    /// Raise on raw keys that have no rule.
    #[serde(alias = "throwOnUnrecognized")]
    pub throw_on_unrecognized: bool,
    /// Raise on `reference`/`macro_for` targets that do not exist.
    #[serde(alias = "throwOnReferenceError")]
    pub throw_on_reference_error: bool,
    /// Raise on `reference`/`macro_for` cycles.
    #[serde(alias = "throwOnCircularReference")]
    pub throw_on_circular_reference: bool,
    /// Emit diagnostics for conditions that are not raised.
    #[serde(alias = "printWarnings", default = "enabled")]
    pub print_warnings: bool,
    /// Default for rules without their own `allow_override`.
    #[serde(alias = "allowOverride", default = "enabled")]
    pub allow_override: bool,
    /// Property name the [`OptionChecker`](crate::OptionChecker) stores
    /// its output under.
    #[serde(alias = "optVarName", skip_serializing_if = "Option::is_none")]
    pub opt_var_name: Option<String>,
    #[serde(skip)]
    sink: Sink,
}

impl Default for Declaration {
    fn default() -> Self {
        Self {
            options: IndexMap::new(),
            throw_on_unrecognized: false,
            throw_on_reference_error: false,
            throw_on_circular_reference: false,
            print_warnings: true,
            allow_override: true,
            opt_var_name: None,
            sink: Sink::default(),
        }
    }
}

impl Declaration {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a declaration from JSON. Hooks are attached afterwards with
    /// [`rule_mut`](Self::rule_mut).
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    // ------------------------------------------------------------------------
    // Builder
    // ------------------------------------------------------------------------

    /// Adds (or replaces) the rule for `key`, keeping its original position.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_rule(mut self, key: impl Into<String>, rule: Rule) -> Self {
        self.options.insert(key.into(), rule);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn throw_on_unrecognized(mut self, on: bool) -> Self {
        self.throw_on_unrecognized = on;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn throw_on_reference_error(mut self, on: bool) -> Self {
        self.throw_on_reference_error = on;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn throw_on_circular_reference(mut self, on: bool) -> Self {
        self.throw_on_circular_reference = on;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn print_warnings(mut self, on: bool) -> Self {
        self.print_warnings = on;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn allow_override(mut self, on: bool) -> Self {
        self.allow_override = on;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn opt_var_name(mut self, name: impl Into<String>) -> Self {
        self.opt_var_name = Some(name.into());
        self
    }

    /// Routes warnings to `sink` instead of `tracing`.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Sink(Arc::new(sink));
        self
    }

    // ------------------------------------------------------------------------
    // Rules
    // ------------------------------------------------------------------------

    pub fn insert(&mut self, key: impl Into<String>, rule: Rule) -> Option<Rule> {
        self.options.insert(key.into(), rule)
    }

    #[must_use]
    pub fn rule(&self, key: &str) -> Option<&Rule> {
        self.options.get(key)
    }

    pub fn rule_mut(&mut self, key: &str) -> Option<&mut Rule> {
        self.options.get_mut(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.options.iter().map(|(k, r)| (k.as_str(), r))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.options.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub(crate) fn sink(&self) -> &dyn DiagnosticSink {
        self.sink.0.as_ref()
    }

    /// Same switches and sink, different rules.
    pub(crate) fn with_rules(&self, options: IndexMap<String, Rule>) -> Self {
        Self {
            options,
            throw_on_unrecognized: self.throw_on_unrecognized,
            throw_on_reference_error: self.throw_on_reference_error,
            throw_on_circular_reference: self.throw_on_circular_reference,
            print_warnings: self.print_warnings,
            allow_override: self.allow_override,
            opt_var_name: self.opt_var_name.clone(),
            sink: self.sink.clone(),
        }
    }
}
