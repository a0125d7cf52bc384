//! Property-based tests for optcheck.

use optcheck::prelude::*;
use optcheck::resolve::{MAX_REFERENCE_DEPTH, resolve_reference};
use proptest::prelude::*;

/// Scalar values with well-behaved equality (no NaN).
fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Undefined),
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-1.0e9..1.0e9f64).prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        ".{0,12}".prop_map(Value::from),
    ]
}

fn number_rule() -> Rule {
    Rule::new(TypeTag::Number).min(0.0).max(100.0).not_float()
}

// ============================================================================
// FALLBACK: optional options never fail the call
// ============================================================================

proptest! {
    #[test]
    fn optional_without_default_is_value_or_absent(v in scalar()) {
        let decl = Declaration::new().with_rule("x", number_rule());
        let out = validate(&decl, &Options::new().with("x", v.clone())).unwrap();
        if let Some(kept) = out.get("x") {
            prop_assert_eq!(kept, &v);
        }
    }

    #[test]
    fn optional_with_default_is_always_present(v in scalar()) {
        let decl = Declaration::new().with_rule("x", number_rule().default_value(7));
        let out = validate(&decl, &Options::new().with("x", v.clone())).unwrap();
        let kept = out.get("x").cloned();
        prop_assert!(kept == Some(v) || kept == Some(Value::from(7)));
    }

    #[test]
    fn required_fails_exactly_when_optional_is_absent(v in scalar()) {
        let optional = Declaration::new().with_rule("x", number_rule());
        let required = Declaration::new().with_rule("x", number_rule().required());
        let raw = Options::new().with("x", v);

        let lenient = validate(&optional, &raw).unwrap();
        let strict = validate(&required, &raw);
        prop_assert_eq!(lenient.contains("x"), strict.is_ok());
    }
}

// ============================================================================
// PASS-THROUGH: accepted values come back unchanged
// ============================================================================

proptest! {
    #[test]
    fn in_range_integer_is_unchanged(n in 0u32..=100) {
        let decl = Declaration::new().with_rule("x", number_rule().required());
        let out = validate(&decl, &Options::new().with("x", n)).unwrap();
        prop_assert_eq!(out.get_f64("x"), Some(f64::from(n)));
    }

    #[test]
    fn out_of_range_integer_is_rejected(n in 101i64..1_000_000) {
        let decl = Declaration::new().with_rule("x", number_rule().required());
        let err = validate(&decl, &Options::new().with("x", n)).unwrap_err();
        prop_assert_eq!(err.code(), "OUT_OF_RANGE");
    }

    #[test]
    fn partial_pass_is_idempotent(items in prop::collection::vec("[ab]{0,2}", 1..12)) {
        let decl = Declaration::new().with_rule(
            "tags",
            Rule::new(RuleType::Array)
                .pass_test(|v| v.as_str().is_some_and(|s| !s.is_empty()))
                .allow_partial_pass()
                .compact_array_like(),
        );
        let first = validate(&decl, &Options::new().with("tags", Value::array(items))).unwrap();
        let second = validate(&decl, &first).unwrap();
        prop_assert_eq!(first, second);
    }
}

// ============================================================================
// RESOLUTION: chains flatten nearest-first, cycles terminate
// ============================================================================

proptest! {
    #[test]
    fn reference_chain_flattens_nearest_first(len in 1..MAX_REFERENCE_DEPTH) {
        // r0 -> r1 -> ... -> r{len}; every link sets `min`, only the tail sets `max`.
        let mut decl = Declaration::new();
        for i in 0..len {
            decl.insert(
                format!("r{i}"),
                Rule::new(TypeTag::Number).min(i as f64).with_reference(format!("r{}", i + 1)),
            );
        }
        decl.insert(format!("r{len}"), Rule::new(TypeTag::Number).min(len as f64).max(1000.0));

        let resolved = resolve_reference("r0", &decl).unwrap().unwrap();
        prop_assert_eq!(resolved.min, Some(0.0));
        prop_assert_eq!(resolved.max, Some(1000.0));
        prop_assert_eq!(resolved.reference, None);
    }

    #[test]
    fn reference_cycles_terminate(len in 1usize..24) {
        let sink = CollectedDiagnostics::new();
        let mut decl = Declaration::new().with_sink(sink.clone());
        for i in 0..len {
            decl.insert(
                format!("c{i}"),
                Rule::new(RuleType::Any).with_reference(format!("c{}", (i + 1) % len)),
            );
        }
        let out = validate(&decl, &Options::new().with("c0", 1)).unwrap();
        prop_assert_eq!(out.get_f64("c0"), Some(1.0));
        prop_assert!(!sink.is_empty());
    }

    #[test]
    fn macro_cycles_terminate(len in 1usize..24) {
        let sink = CollectedDiagnostics::new();
        let mut decl = Declaration::new().with_sink(sink.clone());
        for i in 0..len {
            decl.insert(format!("m{i}"), Rule::macro_for(format!("m{}", (i + 1) % len)));
        }
        let out = validate(&decl, &Options::new().with("m0", 1)).unwrap();
        prop_assert!(out.is_empty());
        prop_assert_eq!(sink.len(), len);
    }
}
