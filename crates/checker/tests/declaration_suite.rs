//! Reference and macro resolution under a strict declaration.
//!
//! Every case installs one rule under test next to a fixed set of helper
//! rules (a number target, a macro onto it, and rules that point back at
//! the rule under test) with all `throw_on_*` switches set.

use optcheck::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

const NUM_TARGET: &str = "__numRefTarget";
const NUM_TARGET_MACRO: &str = "__numRefTargetMacro";
const SELF_MACRO: &str = "__selfMacro";
const SELF_REFERENCE: &str = "__selfReference";

fn suite(key: &str, rule: Rule) -> Declaration {
    let self_reference = match rule.rule_type {
        Some(rule_type) => Rule::reference(key).with_type(rule_type),
        None => Rule::reference(key),
    };

    Declaration::new()
        .throw_on_circular_reference(true)
        .throw_on_reference_error(true)
        .throw_on_unrecognized(true)
        .with_rule(key, rule)
        .with_rule(
            NUM_TARGET,
            Rule::new(TypeTag::Number).min(1.0).max(2.0).default_value(1),
        )
        .with_rule(NUM_TARGET_MACRO, Rule::macro_for(NUM_TARGET))
        .with_rule(SELF_MACRO, Rule::macro_for(key))
        .with_rule(SELF_REFERENCE, self_reference)
}

fn run(key: &str, rule: Rule, arg: Option<Value>) -> Result<Options, OptionError> {
    let mut options = Options::new();
    if let Some(arg) = arg {
        options.set(key, arg);
    }
    validate(&suite(key, rule), &options)
}

#[test]
fn basic_any() {
    let out = run("basic", Rule::new(RuleType::Any), Some(Value::from("abc"))).unwrap();
    assert_eq!(out.get_str("basic"), Some("abc"));
}

#[test]
fn optional_missing_is_absent() {
    let out = run("missing", Rule::new(RuleType::Any), None).unwrap();
    assert!(!out.contains("missing"));
}

#[test]
fn required_missing_raises() {
    let err = run("missingRequired", Rule::new(RuleType::Any).required(), None).unwrap_err();
    assert_eq!(err.code(), "MISSING");
}

#[test]
fn reference_inherits_target_constraints() {
    let out = run(
        "reference",
        Rule::new(TypeTag::Number).with_reference(NUM_TARGET),
        Some(Value::from(2)),
    )
    .unwrap();
    assert_eq!(out.get_f64("reference"), Some(2.0));

    // The inherited range applies: 5 falls back to the inherited default.
    let out = run(
        "reference",
        Rule::new(TypeTag::Number).with_reference(NUM_TARGET),
        Some(Value::from(5)),
    )
    .unwrap();
    assert_eq!(out.get_f64("reference"), Some(1.0));
}

#[test]
fn macro_fills_target_slot() {
    let out = run("macro", Rule::macro_for(NUM_TARGET), Some(Value::from(2))).unwrap();
    assert_eq!(out.get_f64(NUM_TARGET), Some(2.0));
    assert!(!out.contains("macro"));
}

#[test]
fn reference_to_macro_acts_as_macro() {
    let out = run(
        "macroReference",
        Rule::new(TypeTag::Number).with_reference(NUM_TARGET_MACRO),
        Some(Value::from(2)),
    )
    .unwrap();
    assert_eq!(out.get_f64(NUM_TARGET), Some(2.0));
    assert!(!out.contains("macroReference"));
}

#[rstest]
#[case::self_reference("circularSelfReference", Rule::new(RuleType::Any).with_reference("circularSelfReference"), "CIRCULAR_REFERENCE")]
#[case::reference_to_macro("circularReferenceToMacro", Rule::new(RuleType::Any).with_reference(SELF_MACRO), "CIRCULAR_REFERENCE")]
#[case::reference_to_reference("circularReferenceToReference", Rule::new(RuleType::Any).with_reference(SELF_REFERENCE), "CIRCULAR_REFERENCE")]
#[case::macro_cycle("circularMacro", Rule::macro_for("circularMacro"), "CIRCULAR_REFERENCE")]
#[case::dangling_reference("referenceErrorReference", Rule::new(RuleType::Any).with_reference("ruleThatDoesNotExist"), "REFERENCE_ERROR")]
#[case::dangling_macro("referenceErrorMacro", Rule::macro_for("ruleThatDoesNotExist"), "REFERENCE_ERROR")]
fn broken_chains_raise(#[case] key: &str, #[case] rule: Rule, #[case] code: &str) {
    let err = run(key, rule, None).unwrap_err();
    assert_eq!(err.code(), code, "{err}");
}

#[rstest]
#[case::array(Value::array([1, 2, 3]))]
#[case::typed_array(Value::from(TypedArray::new(TypedArrayKind::Uint8, [1.0, 2.0, 3.0])))]
#[case::array_like_object(Value::from(
    Object::new()
        .with("0", 1)
        .with("1", 2)
        .with("2", 3)
        .with("length", 3)
        .with_iterator()
))]
fn array_like_inputs_are_accepted(#[case] arg: Value) {
    let out = run("arraylike", Rule::new(RuleType::ArrayLike), Some(arg.clone())).unwrap();
    assert_eq!(out["arraylike"], arg);
}

#[test]
fn broken_chains_degrade_without_switches() {
    let sink = CollectedDiagnostics::new();
    let decl = Declaration::new()
        .with_rule("a", Rule::new(RuleType::Any).with_reference("missing"))
        .with_rule("m", Rule::macro_for("m"))
        .with_rule("ok", Rule::new(RuleType::Any))
        .with_sink(sink.clone());

    let raw = Options::new().with("a", 1).with("m", 2).with("ok", 3);
    let out = validate(&decl, &raw).unwrap();
    assert_eq!(out, Options::new().with("ok", 3));

    let kinds: Vec<DiagnosticKind> = sink.take().into_iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![DiagnosticKind::ReferenceError, DiagnosticKind::CircularReference]
    );
}
