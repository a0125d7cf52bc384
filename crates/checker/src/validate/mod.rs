//! The validation driver.
//!
//! [`validate`] resolves the declaration, then runs every option through
//! the check pipeline in a deferred order: options that write somewhere
//! other than their own key (`map_to`, `macro_for`) go last, so a direct
//! value always claims its slot first.

mod normalize;
mod pipeline;
mod predicate;

use optcheck_value::Value;

use crate::declaration::Declaration;
use crate::diagnostics::report;
use crate::error::{OptionError, OptionLabel, Redirect, Result};
use crate::failure::Failure;
use crate::options::Options;
use crate::resolve::{parse_declaration, root_macro};
use crate::rule::Rule;

use normalize::Normalized;

/// Validates `options` against `declaration` and returns the sanitized
/// output.
///
/// Optional options that are missing or fail fall back to their default
/// or are left out. A failing required option, or a declaration problem
/// whose `throw_on_*` switch is set, aborts the whole call.
///
/// ```
/// use optcheck::{Declaration, Options, Rule, validate};
/// use optcheck_value::TypeTag;
///
/// let decl = Declaration::new()
///     .with_rule("x", Rule::new(TypeTag::Number).required().min(1.0).max(2.0));
/// let out = validate(&decl, &Options::new().with("x", 2)).unwrap();
/// assert_eq!(out.get_f64("x"), Some(2.0));
/// ```
pub fn validate(declaration: &Declaration, options: &Options) -> Result<Options> {
    tracing::debug!(
        rules = declaration.len(),
        options = options.len(),
        "validating options"
    );

    if declaration.throw_on_unrecognized {
        for key in options.keys() {
            if !declaration.contains(key) {
                report(
                    declaration,
                    OptionError::UnrecognizedOption {
                        key: key.to_owned(),
                    },
                )?;
            }
        }
    }

    let effective = parse_declaration(declaration)?;
    let mut out = Options::new();
    for key in processing_order(&effective) {
        process(key, &effective, options, &mut out)?;
    }
    Ok(out)
}

/// Like [`validate`], taking the raw options as a single value. A missing
/// or non-object value counts as an empty options object.
pub fn validate_value(declaration: &Declaration, options: Option<&Value>) -> Result<Options> {
    let options = options.and_then(Options::from_value).unwrap_or_default();
    validate(declaration, &options)
}

/// Declared keys, with redirected options moved to the end (stable).
fn processing_order(declaration: &Declaration) -> Vec<&str> {
    let (direct, redirected): (Vec<_>, Vec<_>) = declaration
        .rules()
        .partition(|(_, rule)| !rule.is_redirected());
    direct
        .into_iter()
        .chain(redirected)
        .map(|(key, _)| key)
        .collect()
}

/// Where one option's value lands and which rule checks it.
struct Target<'d> {
    slot: &'d str,
    label: OptionLabel,
    rule: &'d Rule,
}

fn target<'d>(key: &'d str, rule: &'d Rule, declaration: &'d Declaration) -> Result<Option<Target<'d>>> {
    if rule.is_macro() {
        let Some(root) = root_macro(key, declaration)? else {
            return Ok(None);
        };
        let Some(root_rule) = declaration.rule(root) else {
            return Ok(None);
        };
        return Ok(Some(Target {
            slot: root,
            label: OptionLabel::new(key).with_redirect(Redirect::MacroFor(root.to_owned())),
            rule: root_rule,
        }));
    }
    let target = match rule.map_to.as_deref() {
        Some(mapped) => Target {
            slot: mapped,
            label: OptionLabel::new(key).with_redirect(Redirect::MapTo(mapped.to_owned())),
            rule,
        },
        None => Target {
            slot: key,
            label: OptionLabel::new(key),
            rule,
        },
    };
    Ok(Some(target))
}

fn process(key: &str, declaration: &Declaration, raw: &Options, out: &mut Options) -> Result<()> {
    let Some(rule) = declaration.rule(key) else {
        return Ok(());
    };
    let Some(target) = target(key, rule, declaration)? else {
        tracing::trace!(option = key, "skipped: unresolved macro");
        return Ok(());
    };

    if rule.is_redirected()
        && out.contains(target.slot)
        && !rule.allow_override.unwrap_or(declaration.allow_override)
    {
        tracing::trace!(option = key, slot = target.slot, "skipped: slot occupied");
        return Ok(());
    }

    let normalized = Normalized::from_rule(target.rule);
    let occupied = rule.is_redirected() && out.contains(target.slot);
    let outcome = match raw.get(key) {
        None if rule.is_macro() || occupied => return Ok(()),
        None => Err(Failure::Missing),
        Some(value) => pipeline::run(target.rule, &normalized, value.clone()),
    };

    match outcome {
        Ok(value) => {
            tracing::trace!(option = key, slot = target.slot, "accepted");
            out.set(target.slot, value);
            Ok(())
        }
        Err(failure) => {
            tracing::trace!(option = key, reason = %failure, "rejected");
            if target.rule.is_required() {
                return Err(raise(failure, target.label, target.rule, &normalized));
            }
            // A fallback never displaces a value already in the slot.
            if occupied {
                return Ok(());
            }
            if let Some(default) = &target.rule.default_value {
                out.set(target.slot, default.clone());
            }
            Ok(())
        }
    }
}

/// The error a required option raises for `failure`.
fn raise(failure: Failure, option: OptionLabel, rule: &Rule, normalized: &Normalized) -> OptionError {
    match failure {
        Failure::Missing => OptionError::Missing { option },
        Failure::WrongType { actual } => OptionError::WrongType {
            option,
            expected: normalized.expected.describe(),
            actual,
        },
        Failure::OutOfRange => OptionError::OutOfRange {
            option,
            min: rule.min,
            max: rule.max,
        },
        Failure::LengthOutOfRange {
            length: Some(length),
        } => OptionError::LengthOutOfRange {
            option,
            length,
            min: rule.min_length,
            max: rule.max_length,
        },
        Failure::LengthOutOfRange { length: None } => OptionError::MissingLength { option },
        Failure::NotANumber => OptionError::NotANumber { option },
        Failure::NotFinite => OptionError::NotFinite { option },
        Failure::NotInteger => OptionError::NotInteger { option },
        Failure::InvalidInstance => OptionError::InvalidInstance {
            option,
            instance: normalized
                .instance
                .as_ref()
                .map_or_else(|| "the declared instance".to_owned(), |i| i.name().to_owned()),
        },
        Failure::UnexpectedValue => OptionError::UnexpectedValue { option },
        Failure::NotArrayLike => OptionError::NotArrayLike { option },
        Failure::TestFailed => OptionError::TestFailed { option },
    }
}
