//! The per-value check sequence.

use std::cmp::Ordering;

use optcheck_value::{TypeTag, Value};

use super::normalize::{Expected, Normalized};
use super::predicate;
use crate::failure::Failure;
use crate::rule::Rule;

/// Converts `value` to the representation of `target`.
///
/// Bigint conversion goes through the numeric value and yields `null` when
/// that is not an integer.
pub(crate) fn coerce(value: Value, target: TypeTag) -> Value {
    match target {
        TypeTag::BigInt => match value {
            Value::BigInt(_) => value,
            other => Value::Number(other.to_number())
                .to_bigint()
                .map_or(Value::Null, Value::BigInt),
        },
        TypeTag::Boolean => Value::Bool(value.truthy()),
        TypeTag::Number => Value::Number(value.to_number()),
        TypeTag::String => Value::String(value.to_js_string()),
        _ => value,
    }
}

/// Runs one present raw value through every check of `rule`.
///
/// Hooks run in order `on_wrong_type`, `transform_fn`; the first failing
/// check decides the [`Failure`].
pub(crate) fn run(rule: &Rule, normalized: &Normalized, raw: Value) -> Result<Value, Failure> {
    let mut value = raw;

    if let Expected::Type(tag) = normalized.expected {
        if rule.coerce_type.unwrap_or(false) {
            if let Some(target) = normalized.coercion_target() {
                value = coerce(value, target);
            }
        }
        if value.type_of() != tag {
            if let Some(hook) = &rule.on_wrong_type {
                value = hook.call(value);
            }
        }
    }
    if let Some(hook) = &rule.transform_fn {
        value = hook.call(value);
    }

    let actual = value.type_of();
    match normalized.expected {
        Expected::Any => {}
        Expected::Undeclared => return Err(Failure::WrongType { actual }),
        Expected::Type(tag) if tag != actual => return Err(Failure::WrongType { actual }),
        Expected::Type(_) => {}
    }

    if normalized.must_be_null && !value.is_null() {
        return Err(Failure::UnexpectedValue);
    }
    if normalized.array_like && !value.is_array_like() {
        return Err(Failure::NotArrayLike);
    }
    if let Some(instance) = &normalized.instance {
        if !instance.matches(&value) {
            return Err(Failure::InvalidInstance);
        }
    }

    check_range(rule, &value)?;
    check_length(rule, &value)?;
    if let Value::Number(n) = value {
        check_number(rule, normalized, n)?;
    }

    predicate::evaluate(value, rule).ok_or(Failure::TestFailed)
}

fn check_range(rule: &Rule, value: &Value) -> Result<(), Failure> {
    if !value.type_of().is_numeric() {
        return Ok(());
    }
    let (below, above) = match value {
        Value::BigInt(i) => (
            rule.min.is_some_and(|min| compare_bigint(*i, min) == Some(Ordering::Less)),
            rule.max.is_some_and(|max| compare_bigint(*i, max) == Some(Ordering::Greater)),
        ),
        _ => {
            let n = value.to_number();
            (
                rule.min.is_some_and(|min| min > n),
                rule.max.is_some_and(|max| max < n),
            )
        }
    };
    if below || above {
        return Err(Failure::OutOfRange);
    }
    Ok(())
}

/// Exact ordering of a bigint against a numeric bound; `None` for NaN.
fn compare_bigint(i: i128, bound: f64) -> Option<Ordering> {
    // 2^127, the first magnitude outside i128.
    const LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;
    if bound.is_nan() {
        return None;
    }
    if bound >= LIMIT {
        return Some(Ordering::Less);
    }
    if bound < -LIMIT {
        return Some(Ordering::Greater);
    }
    let floor = bound.floor() as i128;
    Some(match i.cmp(&floor) {
        Ordering::Equal if bound.fract() != 0.0 => Ordering::Less,
        other => other,
    })
}

fn check_length(rule: &Rule, value: &Value) -> Result<(), Failure> {
    if rule.min_length.is_none() && rule.max_length.is_none() {
        return Ok(());
    }
    if !matches!(value.type_of(), TypeTag::String | TypeTag::Object) {
        return Ok(());
    }
    let Some(length) = value.length() else {
        return Err(Failure::LengthOutOfRange { length: None });
    };
    let short = rule.min_length.is_some_and(|min| length < min);
    let long = rule.max_length.is_some_and(|max| length > max);
    if short || long {
        return Err(Failure::LengthOutOfRange {
            length: Some(length),
        });
    }
    Ok(())
}

/// `not_nan`, then `not_infinite`, then `not_float`.
fn check_number(rule: &Rule, normalized: &Normalized, n: f64) -> Result<(), Failure> {
    if rule.not_nan.unwrap_or(false) && n.is_nan() {
        return Err(Failure::NotANumber);
    }
    if rule.not_infinite.unwrap_or(false) && !n.is_finite() {
        return Err(Failure::NotFinite);
    }
    if normalized.not_float && !(n.is_finite() && n.fract() == 0.0) {
        return Err(Failure::NotInteger);
    }
    Ok(())
}
