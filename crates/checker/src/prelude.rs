//! Prelude module for convenient imports.
//!
//! `use optcheck::prelude::*;` brings in the declaration builders, the
//! entry points and the value model.

// ============================================================================
// DECLARATIONS
// ============================================================================

pub use crate::{Declaration, Instance, Rule, RuleType};

// ============================================================================
// ENTRY POINTS
// ============================================================================

pub use crate::{OptionChecker, Options, validate, validate_value};

// ============================================================================
// ERRORS AND DIAGNOSTICS
// ============================================================================

pub use crate::{
    CollectedDiagnostics, Diagnostic, DiagnosticKind, ErrorKind, Failure, OptionError,
};

// ============================================================================
// VALUES
// ============================================================================

pub use optcheck_value::{Function, Object, Symbol, TypeTag, TypedArray, TypedArrayKind, Value};
