//! Errors raised by option validation.

use std::fmt;

use optcheck_value::{TypeTag, format_number};

use crate::failure::Failure;

/// Result alias used throughout the crate.
pub type Result<T, E = OptionError> = std::result::Result<T, E>;

// ============================================================================
// OPTION LABEL
// ============================================================================

/// Where a redirected option writes its value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Redirect {
    /// `map_to`: an alternate output key.
    MapTo(String),
    /// `macro_for`: the slot of the terminal target option.
    MacroFor(String),
}

/// Names an option in error messages, together with its redirect target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OptionLabel {
    key: String,
    redirect: Option<Redirect>,
}

impl OptionLabel {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            redirect: None,
        }
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_redirect(mut self, redirect: Redirect) -> Self {
        self.redirect = Some(redirect);
        self
    }

    /// The option's own key in the raw options.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn redirect(&self) -> Option<&Redirect> {
        self.redirect.as_ref()
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "option '{}'", self.key)?;
        match &self.redirect {
            Some(Redirect::MapTo(target)) => write!(f, " (mapped to '{target}')"),
            Some(Redirect::MacroFor(target)) => write!(f, " (macro for '{target}')"),
            None => Ok(()),
        }
    }
}

// ============================================================================
// ERROR KIND
// ============================================================================

/// Broad error class, for callers that only distinguish the family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Something named does not exist: a missing option, a dangling rule
    /// target, or a length bound on a value without a length.
    Reference,
    /// The value has the wrong shape.
    Type,
    /// The value is outside its allowed bounds.
    Range,
    Generic,
}

impl ErrorKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::Type => "type",
            Self::Range => "range",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// OPTION ERROR
// ============================================================================

/// Error type for option validation.
///
/// Per-option variants are raised only for required options; the
/// declaration-level variants are raised when the matching `throw_on_*`
/// switch is set.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum OptionError {
    #[error("{option} is required, but is not present")]
    Missing { option: OptionLabel },

    #[error("{option} must be of type {expected}, got {actual}")]
    WrongType {
        option: OptionLabel,
        expected: String,
        actual: TypeTag,
    },

    #[error("{option} is not within its allowed range [{}]", range_text(.min, .max))]
    OutOfRange {
        option: OptionLabel,
        min: Option<f64>,
        max: Option<f64>,
    },

    #[error(
        "{option} has an invalid length {length}, the allowed range is [{}]",
        length_text(.min, .max)
    )]
    LengthOutOfRange {
        option: OptionLabel,
        length: usize,
        min: Option<usize>,
        max: Option<usize>,
    },

    /// A length bound is declared but the value has no length.
    #[error("{option} has a length bound but its value lacks a length")]
    MissingLength { option: OptionLabel },

    #[error("{option} must not be NaN")]
    NotANumber { option: OptionLabel },

    #[error("{option} is not a finite number")]
    NotFinite { option: OptionLabel },

    #[error("{option} is not an integer")]
    NotInteger { option: OptionLabel },

    #[error("{option} is not an instance of {instance}")]
    InvalidInstance {
        option: OptionLabel,
        instance: String,
    },

    #[error("{option} has an unexpected value")]
    UnexpectedValue { option: OptionLabel },

    #[error("{option} is not an array-like object")]
    NotArrayLike { option: OptionLabel },

    #[error("{option} failed to validate")]
    TestFailed { option: OptionLabel },

    #[error("options object contains unrecognized option '{key}'")]
    UnrecognizedOption { key: String },

    #[error("rule '{rule}' was discarded because it references non-existent rule '{target}'")]
    DanglingReference { rule: String, target: String },

    #[error("{}", cycle_text(.rule, .target))]
    CircularReference { rule: String, target: String },

    /// The declaration could not be loaded.
    #[error("invalid declaration: {reason}")]
    InvalidDeclaration { reason: String },
}

fn bounds_text(min: Option<String>, max: Option<String>, var: &str) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("{min} <= {var} <= {max}"),
        (Some(min), None) => format!("{var} >= {min}"),
        (None, Some(max)) => format!("{var} <= {max}"),
        (None, None) => var.to_owned(),
    }
}

fn range_text(min: &Option<f64>, max: &Option<f64>) -> String {
    bounds_text(min.map(format_number), max.map(format_number), "x")
}

fn length_text(min: &Option<usize>, max: &Option<usize>) -> String {
    bounds_text(
        min.map(|n| n.to_string()),
        max.map(|n| n.to_string()),
        "length",
    )
}

fn cycle_text(rule: &str, target: &str) -> String {
    if rule == target {
        format!("rule '{rule}' references itself")
    } else {
        format!("rule '{rule}' forms a circular reference after rule '{target}'")
    }
}

impl OptionError {
    /// Broad error class.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Missing { .. } | Self::MissingLength { .. } | Self::DanglingReference { .. } => {
                ErrorKind::Reference
            }
            Self::WrongType { .. }
            | Self::NotANumber { .. }
            | Self::NotInteger { .. }
            | Self::InvalidInstance { .. } => ErrorKind::Type,
            Self::OutOfRange { .. } | Self::LengthOutOfRange { .. } | Self::NotFinite { .. } => {
                ErrorKind::Range
            }
            Self::UnexpectedValue { .. }
            | Self::NotArrayLike { .. }
            | Self::TestFailed { .. }
            | Self::UnrecognizedOption { .. }
            | Self::CircularReference { .. }
            | Self::InvalidDeclaration { .. } => ErrorKind::Generic,
        }
    }

    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnrecognizedOption { .. } => "UNRECOGNIZED_OPTION",
            Self::DanglingReference { .. } => "REFERENCE_ERROR",
            Self::CircularReference { .. } => "CIRCULAR_REFERENCE",
            Self::InvalidDeclaration { .. } => "INVALID_DECLARATION",
            _ => self.reason().map_or("UNKNOWN", Failure::code),
        }
    }

    /// The per-option failure behind this error, if it is one.
    #[must_use]
    pub fn reason(&self) -> Option<Failure> {
        let failure = match self {
            Self::Missing { .. } => Failure::Missing,
            Self::WrongType { actual, .. } => Failure::WrongType { actual: *actual },
            Self::OutOfRange { .. } => Failure::OutOfRange,
            Self::LengthOutOfRange { length, .. } => Failure::LengthOutOfRange {
                length: Some(*length),
            },
            Self::MissingLength { .. } => Failure::LengthOutOfRange { length: None },
            Self::NotANumber { .. } => Failure::NotANumber,
            Self::NotFinite { .. } => Failure::NotFinite,
            Self::NotInteger { .. } => Failure::NotInteger,
            Self::InvalidInstance { .. } => Failure::InvalidInstance,
            Self::UnexpectedValue { .. } => Failure::UnexpectedValue,
            Self::NotArrayLike { .. } => Failure::NotArrayLike,
            Self::TestFailed { .. } => Failure::TestFailed,
            Self::UnrecognizedOption { .. }
            | Self::DanglingReference { .. }
            | Self::CircularReference { .. }
            | Self::InvalidDeclaration { .. } => return None,
        };
        Some(failure)
    }

    /// The option this error names, for per-option failures.
    #[must_use]
    pub fn option(&self) -> Option<&OptionLabel> {
        match self {
            Self::Missing { option }
            | Self::WrongType { option, .. }
            | Self::OutOfRange { option, .. }
            | Self::LengthOutOfRange { option, .. }
            | Self::MissingLength { option }
            | Self::NotANumber { option }
            | Self::NotFinite { option }
            | Self::NotInteger { option }
            | Self::InvalidInstance { option, .. }
            | Self::UnexpectedValue { option }
            | Self::NotArrayLike { option }
            | Self::TestFailed { option } => Some(option),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for OptionError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidDeclaration {
            reason: err.to_string(),
        }
    }
}
