//! Predicate evaluation with optional partial acceptance.
//!
//! Iterable values are tested entry by entry. With partial pass enabled,
//! failing entries are dropped and a container of the same kind is rebuilt
//! from the rest.

use optcheck_value::{EntryKey, Object, TypedArray, TypedArrayKind, Value};

use crate::rule::Rule;

/// Runs the rule's `pass_test` against `value`.
///
/// Returns the accepted value (possibly rebuilt from passing entries), or
/// `None` when the value fails.
pub(crate) fn evaluate(value: Value, rule: &Rule) -> Option<Value> {
    let Some(predicate) = &rule.pass_test else {
        return Some(value);
    };

    let whole = rule.test_full_value.unwrap_or(false)
        || matches!(value, Value::Undefined | Value::Null | Value::Symbol(_));
    let entries = match value.entries() {
        Some(entries) if !whole => entries,
        _ => return predicate.test(&value).then_some(value),
    };

    if !rule.allow_partial_pass.unwrap_or(false) {
        return entries
            .iter()
            .all(|(_, entry)| predicate.test(entry))
            .then_some(value);
    }

    let mut rebuild = Rebuild::for_value(&value);
    let mut passed = 0usize;
    for (key, entry) in entries {
        if predicate.test(&entry) {
            rebuild.push(key, entry);
            passed += 1;
        }
    }
    if passed == 0 {
        return None;
    }
    Some(rebuild.finish(rule.compact_array_like.unwrap_or(false)))
}

/// Builder for the container a partial pass produces.
enum Rebuild {
    Text(String),
    /// Passing array entries by index.
    Sequence(Vec<(usize, Value)>),
    Typed {
        kind: TypedArrayKind,
        len: usize,
        kept: Vec<(usize, f64)>,
    },
    Map(Vec<(Value, Value)>),
    Set(Vec<Value>),
    /// Same class and iterability as the source object.
    Keyed(Object),
}

impl Rebuild {
    fn for_value(value: &Value) -> Self {
        match value {
            Value::String(_) => Self::Text(String::new()),
            Value::TypedArray(arr) => Self::Typed {
                kind: arr.kind(),
                len: arr.len(),
                kept: Vec::new(),
            },
            Value::Map(_) => Self::Map(Vec::new()),
            Value::Set(_) => Self::Set(Vec::new()),
            Value::Object(obj) => Self::Keyed(obj.empty_like()),
            _ => Self::Sequence(Vec::new()),
        }
    }

    fn push(&mut self, key: EntryKey, entry: Value) {
        match (self, key) {
            (Self::Text(text), _) => text.push_str(&entry.to_js_string()),
            (Self::Sequence(items), EntryKey::Index(i)) => items.push((i, entry)),
            (Self::Typed { kept, .. }, EntryKey::Index(i)) => kept.push((i, entry.to_number())),
            (Self::Map(pairs), EntryKey::Value(k)) => pairs.push((k, entry)),
            (Self::Set(members), _) => members.push(entry),
            (Self::Keyed(obj), EntryKey::Name(k)) => {
                obj.insert(k, entry);
            }
            _ => {}
        }
    }

    /// `compact` closes the holes left in arrays and typed arrays.
    fn finish(self, compact: bool) -> Value {
        match self {
            Self::Text(text) => Value::String(text),
            Self::Sequence(items) if compact => {
                Value::Array(items.into_iter().map(|(_, v)| v).collect())
            }
            Self::Sequence(items) => {
                let len = items.last().map_or(0, |(i, _)| i + 1);
                let mut out = vec![Value::Undefined; len];
                for (i, v) in items {
                    out[i] = v;
                }
                Value::Array(out)
            }
            Self::Typed { kind, kept, .. } if compact => {
                Value::TypedArray(TypedArray::new(kind, kept.into_iter().map(|(_, n)| n)))
            }
            Self::Typed { kind, len, kept } => {
                let mut out = TypedArray::zeroed(kind, len);
                for (i, n) in kept {
                    out.set(i, n);
                }
                Value::TypedArray(out)
            }
            Self::Map(pairs) => Value::Map(pairs),
            Self::Set(members) => Value::Set(members),
            Self::Keyed(obj) => Value::Object(obj),
        }
    }
}
