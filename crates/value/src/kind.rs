//! Runtime type tags.
//!
//! Every [`Value`](crate::Value) reports exactly one [`TypeTag`]. Option rules
//! compare against these tags, so the set mirrors the eight base types an
//! options object can carry rather than the richer variant set of `Value`
//! (arrays, maps, sets and `null` all report [`TypeTag::Object`]).

use std::fmt;
use std::str::FromStr;

/// The base type of a value, as seen by type checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Object,
    Function,
    Number,
    BigInt,
    String,
    Undefined,
    Boolean,
    Symbol,
}

impl TypeTag {
    /// All base types, in declaration order.
    pub const ALL: [TypeTag; 8] = [
        Self::Object,
        Self::Function,
        Self::Number,
        Self::BigInt,
        Self::String,
        Self::Undefined,
        Self::Boolean,
        Self::Symbol,
    ];

    /// Lower-case name used in rules and error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Function => "function",
            Self::Number => "number",
            Self::BigInt => "bigint",
            Self::String => "string",
            Self::Undefined => "undefined",
            Self::Boolean => "boolean",
            Self::Symbol => "symbol",
        }
    }

    /// Whether values of this type can be produced by representation coercion.
    #[must_use]
    pub const fn is_coercible(self) -> bool {
        matches!(
            self,
            Self::BigInt | Self::Boolean | Self::Number | Self::String
        )
    }

    /// Whether this type carries a numeric magnitude (range checks apply).
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Number | Self::BigInt)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string does not name a base type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown type `{0}`")]
pub struct UnknownType(pub String);

impl FromStr for TypeTag {
    type Err = UnknownType;

    /// Parses a type name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|tag| tag.name() == lowered)
            .ok_or_else(|| UnknownType(s.to_owned()))
    }
}
