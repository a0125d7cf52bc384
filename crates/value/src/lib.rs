//! # optcheck-value
//!
//! Dynamic value model for option validation.
//!
//! Options objects arrive loosely typed. [`Value`] is the closed set of
//! shapes such an object can hold: primitives, sequences, maps, sets,
//! keyed objects and function descriptors. Each value answers the
//! questions a validator asks of it directly:
//!
//! - [`Value::type_of`] returns the [`TypeTag`] a type check compares against
//! - [`Value::length`], [`Value::is_array_like`] and [`Value::entries`]
//!   expose structure without reflection
//! - [`Value::to_number`], [`Value::to_bigint`], [`Value::truthy`] and the
//!   [`Display`](std::fmt::Display) impl perform representation coercion
//!
//! ```
//! use optcheck_value::{TypeTag, Value};
//!
//! let v = Value::from(" 42 ");
//! assert_eq!(v.type_of(), TypeTag::String);
//! assert_eq!(v.to_number(), 42.0);
//! assert_eq!(Value::array([1, 2]).to_js_string(), "1,2");
//! ```

#![forbid(unsafe_code)]

mod capability;
mod convert;
mod json;
mod kind;
mod value;

pub use capability::EntryKey;
pub use convert::format_number;
pub use kind::{TypeTag, UnknownType};
pub use value::{Function, Object, Symbol, TypedArray, TypedArrayKind, Value};
