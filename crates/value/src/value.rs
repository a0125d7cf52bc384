//! The dynamic [`Value`] enum and its compound payloads.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;

use crate::kind::TypeTag;

// ============================================================================
// VALUE
// ============================================================================

/// A loosely-typed value as found in a caller-supplied options object.
///
/// The variant set is closed: every capability the validator relies on
/// (runtime type, length, array-likeness, iteration) is answered by matching
/// on the variant instead of probing the value at runtime.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// Absent value.
    #[default]
    Undefined,
    /// The `null` value. Reports [`TypeTag::Object`].
    Null,
    Bool(bool),
    /// IEEE-754 double; NaN and infinities are valid numbers.
    Number(f64),
    BigInt(i128),
    String(String),
    Symbol(Symbol),
    /// Ordered sequence; array-like and iterable.
    Array(Vec<Value>),
    TypedArray(TypedArray),
    /// Insertion-ordered key/value pairs; iterable, no `length`.
    Map(Vec<(Value, Value)>),
    /// Insertion-ordered members; iterable, no `length`.
    Set(Vec<Value>),
    Object(Object),
    Function(Function),
}

impl Value {
    /// Creates an array value from anything convertible to values.
    pub fn array<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Array(items.into_iter().map(Into::into).collect())
    }

    /// Creates a plain object from key/value pairs.
    pub fn object<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Creates a map value from key/value pairs.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Creates a set value, dropping later duplicates.
    pub fn set<I, V>(members: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut out: Vec<Value> = Vec::new();
        for member in members {
            let member = member.into();
            if !out.contains(&member) {
                out.push(member);
            }
        }
        Self::Set(out)
    }

    /// The runtime type of this value.
    #[must_use]
    pub fn type_of(&self) -> TypeTag {
        match self {
            Self::Undefined => TypeTag::Undefined,
            Self::Bool(_) => TypeTag::Boolean,
            Self::Number(_) => TypeTag::Number,
            Self::BigInt(_) => TypeTag::BigInt,
            Self::String(_) => TypeTag::String,
            Self::Symbol(_) => TypeTag::Symbol,
            Self::Function(_) => TypeTag::Function,
            Self::Null
            | Self::Array(_)
            | Self::TypedArray(_)
            | Self::Map(_)
            | Self::Set(_)
            | Self::Object(_) => TypeTag::Object,
        }
    }

    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether this is an object-like value other than `null` (functions
    /// included).
    #[must_use]
    pub fn is_object_like(&self) -> bool {
        matches!(
            self,
            Self::Array(_)
                | Self::TypedArray(_)
                | Self::Map(_)
                | Self::Set(_)
                | Self::Object(_)
                | Self::Function(_)
        )
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

// ============================================================================
// SYMBOL
// ============================================================================

static NEXT_SYMBOL_ID: AtomicU64 = AtomicU64::new(1);

/// A unique token with an optional description.
///
/// Two symbols are equal only when they are clones of the same original,
/// even if their descriptions match.
#[derive(Debug, Clone)]
pub struct Symbol {
    id: u64,
    description: Option<Arc<str>>,
}

impl Symbol {
    /// Creates a fresh symbol with a description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
            description: Some(Arc::from(description.into())),
        }
    }

    /// Creates a fresh symbol without a description.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            id: NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
            description: None,
        }
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl std::hash::Hash for Symbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description().unwrap_or_default())
    }
}

// ============================================================================
// FUNCTION
// ============================================================================

/// A callable value, described by its name and declared parameter count.
///
/// Options objects only ever hand functions through; the validator checks
/// their type, instance and length (the arity), never calls them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Function {
    name: Option<String>,
    arity: usize,
}

impl Function {
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: Some(name.into()),
            arity,
        }
    }

    #[must_use]
    pub fn anonymous(arity: usize) -> Self {
        Self { name: None, arity }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.arity
    }
}

// ============================================================================
// TYPED ARRAY
// ============================================================================

/// Element type of a [`TypedArray`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypedArrayKind {
    Int8,
    Uint8,
    Uint8Clamped,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float32,
    Float64,
}

impl TypedArrayKind {
    /// Constructor-style name, e.g. `Uint8Array`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int8 => "Int8Array",
            Self::Uint8 => "Uint8Array",
            Self::Uint8Clamped => "Uint8ClampedArray",
            Self::Int16 => "Int16Array",
            Self::Uint16 => "Uint16Array",
            Self::Int32 => "Int32Array",
            Self::Uint32 => "Uint32Array",
            Self::Float32 => "Float32Array",
            Self::Float64 => "Float64Array",
        }
    }

    /// Converts a number to what an element of this kind would store.
    #[must_use]
    pub fn store(self, n: f64) -> f64 {
        match self {
            Self::Float64 => n,
            Self::Float32 => f64::from(n as f32),
            Self::Uint8Clamped => {
                if n.is_nan() {
                    0.0
                } else {
                    n.clamp(0.0, 255.0).round_ties_even()
                }
            }
            Self::Int8 => wrap_integer(n, 8, true),
            Self::Uint8 => wrap_integer(n, 8, false),
            Self::Int16 => wrap_integer(n, 16, true),
            Self::Uint16 => wrap_integer(n, 16, false),
            Self::Int32 => wrap_integer(n, 32, true),
            Self::Uint32 => wrap_integer(n, 32, false),
        }
    }
}

fn wrap_integer(n: f64, bits: i32, signed: bool) -> f64 {
    if !n.is_finite() {
        return 0.0;
    }
    let modulus = 2f64.powi(bits);
    let wrapped = n.trunc().rem_euclid(modulus);
    if signed && wrapped >= modulus / 2.0 {
        wrapped - modulus
    } else {
        wrapped
    }
}

/// Fixed-kind numeric sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedArray {
    kind: TypedArrayKind,
    elements: Vec<f64>,
}

impl TypedArray {
    /// Creates a typed array, converting every element to the storage of `kind`.
    pub fn new(kind: TypedArrayKind, elements: impl IntoIterator<Item = f64>) -> Self {
        Self {
            kind,
            elements: elements.into_iter().map(|n| kind.store(n)).collect(),
        }
    }

    /// Creates a zero-filled typed array.
    #[must_use]
    pub fn zeroed(kind: TypedArrayKind, len: usize) -> Self {
        Self {
            kind,
            elements: vec![0.0; len],
        }
    }

    #[must_use]
    pub fn kind(&self) -> TypedArrayKind {
        self.kind
    }

    #[must_use]
    pub fn elements(&self) -> &[f64] {
        &self.elements
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Stores `n` at `index`; out-of-bounds writes are ignored.
    pub fn set(&mut self, index: usize, n: f64) {
        if let Some(slot) = self.elements.get_mut(index) {
            *slot = self.kind.store(n);
        }
    }
}

// ============================================================================
// OBJECT
// ============================================================================

/// Keyed entries with an optional class name.
///
/// Plain objects are not iterable. An object built with
/// [`with_iterator`](Object::with_iterator) exposes its own entries for
/// iteration and, when it also has a numeric `length` entry, counts as
/// array-like.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    class: Option<String>,
    entries: IndexMap<String, Value>,
    iterable: bool,
}

impl Object {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty instance of a named class.
    pub fn with_class(class: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
            ..Self::default()
        }
    }

    /// Marks the object as exposing an iterator over its own entries.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_iterator(mut self) -> Self {
        self.iterable = true;
        self
    }

    /// Adds an entry (builder-style, consuming).
    #[must_use = "builder methods must be chained or built"]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Inserts an entry, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The class name, if this is not a plain object.
    #[must_use]
    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    #[must_use]
    pub fn is_iterable(&self) -> bool {
        self.iterable
    }

    /// An empty object of the same class and capabilities.
    #[must_use]
    pub fn empty_like(&self) -> Self {
        Self {
            class: self.class.clone(),
            entries: IndexMap::new(),
            iterable: self.iterable,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            ..Self::default()
        }
    }
}

// ============================================================================
// CONVERSIONS INTO VALUE
// ============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Number(v as f64)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Self::Number(v as f64)
    }
}

/// 128-bit integers become big integers, not numbers.
impl From<i128> for Value {
    fn from(v: i128) -> Self {
        Self::BigInt(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<Symbol> for Value {
    fn from(v: Symbol) -> Self {
        Self::Symbol(v)
    }
}

impl From<Function> for Value {
    fn from(v: Function) -> Self {
        Self::Function(v)
    }
}

impl From<TypedArray> for Value {
    fn from(v: TypedArray) -> Self {
        Self::TypedArray(v)
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Self::Object(v)
    }
}

/// `None` maps to `null`.
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_of_covers_every_variant() {
        assert_eq!(Value::Undefined.type_of(), TypeTag::Undefined);
        assert_eq!(Value::Null.type_of(), TypeTag::Object);
        assert_eq!(Value::from(true).type_of(), TypeTag::Boolean);
        assert_eq!(Value::from(1.5).type_of(), TypeTag::Number);
        assert_eq!(Value::from(7i128).type_of(), TypeTag::BigInt);
        assert_eq!(Value::from("x").type_of(), TypeTag::String);
        assert_eq!(Value::from(Symbol::new("s")).type_of(), TypeTag::Symbol);
        assert_eq!(Value::array([1, 2]).type_of(), TypeTag::Object);
        assert_eq!(Value::set([1]).type_of(), TypeTag::Object);
        assert_eq!(Value::map([("a", 1)]).type_of(), TypeTag::Object);
        assert_eq!(Value::object([("a", 1)]).type_of(), TypeTag::Object);
        assert_eq!(
            Value::from(Function::new("f", 0)).type_of(),
            TypeTag::Function
        );
    }

    #[test]
    fn accessors_match_variant() {
        assert!(Value::Undefined.is_undefined());
        assert!(!Value::Null.is_undefined());
        assert_eq!(
            Value::array([1, 2]).as_array(),
            Some(&[Value::from(1), Value::from(2)][..])
        );
        assert_eq!(Value::set([1]).as_array(), None);
    }

    #[test]
    fn anonymous_functions_have_no_name() {
        let f = Function::anonymous(2);
        assert_eq!(f.name(), None);
        assert_eq!(f.arity(), 2);
        assert_eq!(Value::from(f).to_string(), "function () { [native code] }");
    }

    #[test]
    fn symbols_compare_by_identity() {
        let a = Symbol::new("token");
        let b = Symbol::new("token");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_eq!(a.to_string(), "Symbol(token)");
        assert_eq!(Symbol::anonymous().to_string(), "Symbol()");
    }

    #[test]
    fn set_drops_duplicates() {
        assert_eq!(Value::set([1, 2, 1, 3]), Value::set([1, 2, 3]));
    }

    #[test]
    fn typed_array_stores_per_kind() {
        let bytes = TypedArray::new(TypedArrayKind::Uint8, [300.0, -1.0, 2.7]);
        assert_eq!(bytes.elements(), &[44.0, 255.0, 2.0]);

        let signed = TypedArray::new(TypedArrayKind::Int8, [200.0]);
        assert_eq!(signed.elements(), &[-56.0]);

        let clamped = TypedArray::new(TypedArrayKind::Uint8Clamped, [300.0, -5.0, 2.5]);
        assert_eq!(clamped.elements(), &[255.0, 0.0, 2.0]);

        let floats = TypedArray::new(TypedArrayKind::Float64, [f64::NAN]);
        assert!(floats.elements()[0].is_nan());
    }

    #[test]
    fn typed_array_ignores_out_of_bounds_writes() {
        let mut arr = TypedArray::zeroed(TypedArrayKind::Int16, 2);
        arr.set(1, 5.0);
        arr.set(9, 5.0);
        assert_eq!(arr.elements(), &[0.0, 5.0]);
    }

    #[test]
    fn object_builder_keeps_order_and_class() {
        let obj = Object::with_class("Point").with("y", 2).with("x", 1);
        let keys: Vec<&str> = obj.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["y", "x"]);
        assert_eq!(obj.class(), Some("Point"));
        assert!(!obj.is_iterable());
        assert_eq!(obj.empty_like().class(), Some("Point"));
    }

    #[test]
    fn option_none_is_null() {
        assert_eq!(Value::from(None::<bool>), Value::Null);
        assert_eq!(Value::from(Some(1)), Value::Number(1.0));
    }
}
