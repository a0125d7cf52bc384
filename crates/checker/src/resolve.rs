//! Flattening of `reference` and `macro_for` chains.
//!
//! Both chains are walked at most [`MAX_REFERENCE_DEPTH`] hops. A key seen
//! twice, or a chain that is still going when the bound is hit, is a
//! circular reference; a target missing from the declaration is a
//! reference error. Either is raised or reported through
//! [`diagnostics`](crate::diagnostics) according to the declaration's
//! switches.

use indexmap::IndexMap;

use crate::declaration::Declaration;
use crate::diagnostics::report;
use crate::error::{OptionError, Result};
use crate::rule::Rule;

/// Longest `reference` or `macro_for` chain that is followed.
pub const MAX_REFERENCE_DEPTH: usize = 16;

fn dangling(rule: &str, target: &str) -> OptionError {
    OptionError::DanglingReference {
        rule: rule.to_owned(),
        target: target.to_owned(),
    }
}

fn circular(rule: &str, target: &str) -> OptionError {
    OptionError::CircularReference {
        rule: rule.to_owned(),
        target: target.to_owned(),
    }
}

/// Effective rule for `key`, with every field inherited along its
/// `reference` chain and the `reference` field itself removed.
///
/// Rules nearer to `key` win. A dangling target discards the rule (`None`).
/// A cycle keeps what was merged before the repeated key was reached.
/// Returns `None` when `key` has no rule at all.
pub fn resolve_reference(key: &str, declaration: &Declaration) -> Result<Option<Rule>> {
    let Some(origin) = declaration.rule(key) else {
        return Ok(None);
    };

    let mut chain: Vec<(&str, &Rule)> = vec![(key, origin)];
    let mut current = origin;
    while let Some(target) = current.reference.as_deref() {
        if chain.len() > MAX_REFERENCE_DEPTH {
            report(declaration, circular(key, target))?;
            break;
        }
        let Some(next) = declaration.rule(target) else {
            report(declaration, dangling(key, target))?;
            return Ok(None);
        };
        if chain.iter().any(|(seen, _)| *seen == target) {
            report(declaration, circular(key, target))?;
            break;
        }
        chain.push((target, next));
        current = next;
    }

    let mut rules = chain.into_iter().rev().map(|(_, rule)| rule);
    let farthest = rules.next().cloned().unwrap_or_default();
    let mut merged = rules.fold(farthest, |acc, nearer| nearer.merged_over(&acc));
    merged.reference = None;

    tracing::trace!(rule = key, "resolved reference chain");
    Ok(Some(merged))
}

/// Terminal non-macro key of `key`'s `macro_for` chain.
///
/// Returns `Some(key)` when the rule is not a macro, and `None` after a
/// reference error or cycle that was not raised: such an option is
/// skipped.
pub fn root_macro<'d>(key: &'d str, declaration: &'d Declaration) -> Result<Option<&'d str>> {
    let Some(rule) = declaration.rule(key) else {
        return Ok(None);
    };
    let Some(mut current) = rule.macro_for.as_deref() else {
        return Ok(Some(key));
    };

    let mut visited: Vec<&str> = vec![key];
    for _ in 0..MAX_REFERENCE_DEPTH {
        let Some(target) = declaration.rule(current) else {
            report(declaration, dangling(key, current))?;
            return Ok(None);
        };
        if visited.contains(&current) {
            report(declaration, circular(key, current))?;
            return Ok(None);
        }
        match target.macro_for.as_deref() {
            None => return Ok(Some(current)),
            Some(next) => {
                visited.push(current);
                current = next;
            }
        }
    }

    report(declaration, circular(key, current))?;
    Ok(None)
}

/// Effective declaration: every non-macro rule with a `reference` is
/// replaced by its resolved rule, or dropped when resolution discards it.
///
/// Order and switches carry over. The input is never modified.
pub fn parse_declaration(declaration: &Declaration) -> Result<Declaration> {
    let mut options = IndexMap::with_capacity(declaration.len());
    for (key, rule) in declaration.rules() {
        if rule.reference.is_some() && !rule.is_macro() {
            if let Some(resolved) = resolve_reference(key, declaration)? {
                options.insert(key.to_owned(), resolved);
            }
        } else {
            options.insert(key.to_owned(), rule.clone());
        }
    }
    Ok(declaration.with_rules(options))
}
