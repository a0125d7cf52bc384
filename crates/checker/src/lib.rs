//! # optcheck
//!
//! Declarative validation and normalization of options objects.
//!
//! A [`Declaration`] maps option keys to [`Rule`]s. [`validate`] checks a
//! raw [`Options`] object against it and returns the sanitized output:
//! coerced, transformed and filtered values for options that pass,
//! defaults or omissions for optional options that do not, and an
//! [`OptionError`] for required options that fail.
//!
//! ## Composition
//!
//! - **reference**: a rule inherits every field it does not set from the
//!   rule it references, transitively
//! - **macro_for**: an option writes its value into another option's slot,
//!   validated by that option's rule
//! - **map_to**: an option writes under a different output key
//!
//! Chains are bounded by [`MAX_REFERENCE_DEPTH`]. Dangling targets and
//! cycles are raised or reported to a [`DiagnosticSink`] depending on the
//! declaration's switches.
//!
//! ## Quick Start
//!
//! ```
//! use optcheck::prelude::*;
//!
//! let decl = Declaration::new()
//!     .with_rule("level", Rule::new(RuleType::Int).min(0.0).max(9.0).default_value(6))
//!     .with_rule("l", Rule::macro_for("level"))
//!     .with_rule("name", Rule::new(TypeTag::String).coerce().required());
//!
//! let out = validate(&decl, &Options::new().with("l", 3).with("name", 42)).unwrap();
//! assert_eq!(out.get_f64("level"), Some(3.0));
//! assert_eq!(out.get_str("name"), Some("42"));
//! assert!(!out.contains("l"));
//! ```

#![forbid(unsafe_code)]

mod checker;
mod declaration;
pub mod diagnostics;
mod error;
mod failure;
mod options;
pub mod prelude;
pub mod resolve;
mod rule;
mod validate;

pub use checker::{DEFAULT_VAR_NAME, OptionChecker};
pub use declaration::Declaration;
pub use diagnostics::{CollectedDiagnostics, Diagnostic, DiagnosticKind, DiagnosticSink, TracingSink};
pub use error::{ErrorKind, OptionError, OptionLabel, Redirect, Result};
pub use failure::Failure;
pub use options::Options;
pub use resolve::MAX_REFERENCE_DEPTH;
pub use rule::{Instance, Predicate, Rule, RuleType, Transform};
pub use validate::{validate, validate_value};
