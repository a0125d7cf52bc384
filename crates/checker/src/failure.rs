//! Classified reasons an option value is rejected.

use std::fmt;

use optcheck_value::TypeTag;

/// Why a single option failed validation.
///
/// Failures are recovered locally for optional options (default or
/// omission) and turned into an [`OptionError`](crate::OptionError) for
/// required ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Failure {
    /// The key is absent from the raw options.
    Missing,
    /// Runtime type does not match the normalized type.
    WrongType { actual: TypeTag },
    /// Number or bigint outside `min`/`max`.
    OutOfRange,
    /// Length outside `min_length`/`max_length`, or no length at all.
    LengthOutOfRange { length: Option<usize> },
    NotANumber,
    NotFinite,
    NotInteger,
    InvalidInstance,
    /// A `null` rule saw something other than `null`.
    UnexpectedValue,
    NotArrayLike,
    /// The predicate rejected the value, or every entry of it.
    TestFailed,
}

impl Failure {
    /// Stable upper-case name of the reason.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Missing => "MISSING",
            Self::WrongType { .. } => "WRONG_TYPE",
            Self::OutOfRange => "OUT_OF_RANGE",
            Self::LengthOutOfRange { .. } => "LENGTH_OUT_OF_RANGE",
            Self::NotANumber => "NAN",
            Self::NotFinite => "NOT_FINITE",
            Self::NotInteger => "NOT_INTEGER",
            Self::InvalidInstance => "INVALID_INSTANCE",
            Self::UnexpectedValue => "UNEXPECTED_VALUE",
            Self::NotArrayLike => "NOT_ARRAY_LIKE",
            Self::TestFailed => "TEST_FAIL",
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
