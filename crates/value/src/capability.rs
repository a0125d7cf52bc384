//! Structural capabilities: length, array-likeness and entry iteration.

use crate::value::Value;

/// Key half of an entry produced by [`Value::entries`].
#[derive(Debug, Clone, PartialEq)]
pub enum EntryKey {
    /// Position in a string, array or typed array.
    Index(usize),
    /// Own key of an iterable object.
    Name(String),
    /// Key of a map entry, or the member itself for sets.
    Value(Value),
}

impl Value {
    /// Numeric `length` of the value, if it has one.
    ///
    /// Strings count chars, functions report their arity, and objects
    /// expose an own `length` entry when it is a non-negative integer.
    /// Maps, sets and primitives have no length.
    #[must_use]
    pub fn length(&self) -> Option<usize> {
        match self {
            Self::String(s) => Some(s.chars().count()),
            Self::Array(items) => Some(items.len()),
            Self::TypedArray(arr) => Some(arr.len()),
            Self::Function(func) => Some(func.arity()),
            Self::Object(obj) => match obj.get("length") {
                Some(Self::Number(n)) if n.is_finite() && *n >= 0.0 && n.fract() == 0.0 => {
                    Some(*n as usize)
                }
                _ => None,
            },
            _ => None,
        }
    }

    /// Whether the value is an iterable object with a numeric length.
    #[must_use]
    pub fn is_array_like(&self) -> bool {
        match self {
            Self::Array(_) | Self::TypedArray(_) => true,
            Self::Object(obj) => obj.is_iterable() && self.length().is_some(),
            _ => false,
        }
    }

    /// Whether [`entries`](Self::entries) yields anything for this value.
    #[must_use]
    pub fn is_iterable(&self) -> bool {
        match self {
            Self::String(_)
            | Self::Array(_)
            | Self::TypedArray(_)
            | Self::Map(_)
            | Self::Set(_) => true,
            Self::Object(obj) => obj.is_iterable(),
            _ => false,
        }
    }

    /// Ordered `(key, value)` pairs of an iterable value.
    ///
    /// Sets pair each member with itself. Returns `None` for values that
    /// are not iterable.
    #[must_use]
    pub fn entries(&self) -> Option<Vec<(EntryKey, Value)>> {
        let entries = match self {
            Self::String(s) => s
                .chars()
                .enumerate()
                .map(|(i, c)| (EntryKey::Index(i), Self::String(c.to_string())))
                .collect(),
            Self::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (EntryKey::Index(i), v.clone()))
                .collect(),
            Self::TypedArray(arr) => arr
                .elements()
                .iter()
                .enumerate()
                .map(|(i, n)| (EntryKey::Index(i), Self::Number(*n)))
                .collect(),
            Self::Map(pairs) => pairs
                .iter()
                .map(|(k, v)| (EntryKey::Value(k.clone()), v.clone()))
                .collect(),
            Self::Set(members) => members
                .iter()
                .map(|m| (EntryKey::Value(m.clone()), m.clone()))
                .collect(),
            Self::Object(obj) if obj.is_iterable() => obj
                .iter()
                .map(|(k, v)| (EntryKey::Name(k.to_owned()), v.clone()))
                .collect(),
            _ => return None,
        };
        Some(entries)
    }
}
