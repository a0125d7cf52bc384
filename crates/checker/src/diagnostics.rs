//! Warnings about declaration problems, and the warn-or-raise policy.
//!
//! Declaration-level conditions (an unrecognized option, a dangling rule
//! target, a reference cycle) either abort the call or degrade gracefully.
//! When they degrade, a [`Diagnostic`] goes to the declaration's
//! [`DiagnosticSink`] unless warnings are switched off.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::declaration::Declaration;
use crate::error::{OptionError, Result};

/// Class of a declaration-level condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    UnrecognizedOption,
    ReferenceError,
    CircularReference,
}

impl DiagnosticKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UnrecognizedOption => "unrecognized-option",
            Self::ReferenceError => "reference-error",
            Self::CircularReference => "circular-reference",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A non-fatal report about the declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// The rule (or raw option key) the condition was found on.
    pub rule: String,
    /// The rule it pointed at, when there is one.
    pub target: Option<String>,
    pub message: String,
}

impl Diagnostic {
    /// Describes a declaration-level error; `None` for per-option errors.
    #[must_use]
    pub fn from_error(error: &OptionError) -> Option<Self> {
        let (kind, rule, target) = match error {
            OptionError::UnrecognizedOption { key } => {
                (DiagnosticKind::UnrecognizedOption, key, None)
            }
            OptionError::DanglingReference { rule, target } => {
                (DiagnosticKind::ReferenceError, rule, Some(target))
            }
            OptionError::CircularReference { rule, target } => {
                (DiagnosticKind::CircularReference, rule, Some(target))
            }
            _ => return None,
        };
        Some(Self {
            kind,
            rule: rule.clone(),
            target: target.cloned(),
            message: error.to_string(),
        })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// ============================================================================
// SINKS
// ============================================================================

/// Receiver of declaration warnings.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: &Diagnostic);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&Diagnostic) + Send + Sync,
{
    fn emit(&self, diagnostic: &Diagnostic) {
        self(diagnostic);
    }
}

/// Logs every diagnostic with `tracing::warn!`. The default sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        tracing::warn!(
            kind = %diagnostic.kind,
            rule = %diagnostic.rule,
            target = ?diagnostic.target,
            "{}",
            diagnostic.message
        );
    }
}

/// Keeps every diagnostic in memory.
///
/// Cloning shares the underlying buffer, so a clone can be handed to a
/// declaration while the original is kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct CollectedDiagnostics {
    inner: Arc<Mutex<Vec<Diagnostic>>>,
}

impl CollectedDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains and returns everything collected so far.
    #[must_use]
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.inner.lock())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl DiagnosticSink for CollectedDiagnostics {
    fn emit(&self, diagnostic: &Diagnostic) {
        self.inner.lock().push(diagnostic.clone());
    }
}

// ============================================================================
// POLICY
// ============================================================================

/// Raises `error` when the declaration's matching `throw_on_*` switch is
/// set; otherwise emits it as a warning (if enabled) and returns `Ok`.
///
/// Unrecognized options never produce a warning.
pub(crate) fn report(declaration: &Declaration, error: OptionError) -> Result<()> {
    let Some(diagnostic) = Diagnostic::from_error(&error) else {
        return Err(error);
    };
    let (raise, warn) = match diagnostic.kind {
        DiagnosticKind::UnrecognizedOption => (declaration.throw_on_unrecognized, false),
        DiagnosticKind::ReferenceError => (
            declaration.throw_on_reference_error,
            declaration.print_warnings,
        ),
        DiagnosticKind::CircularReference => (
            declaration.throw_on_circular_reference,
            declaration.print_warnings,
        ),
    };
    if raise {
        return Err(error);
    }
    if warn {
        declaration.sink().emit(&diagnostic);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn circular() -> OptionError {
        OptionError::CircularReference {
            rule: "a".into(),
            target: "a".into(),
        }
    }

    fn dangling() -> OptionError {
        OptionError::DanglingReference {
            rule: "a".into(),
            target: "b".into(),
        }
    }

    #[test]
    fn raises_when_switch_set() {
        let decl = Declaration::new().throw_on_circular_reference(true);
        assert_eq!(report(&decl, circular()), Err(circular()));
        assert_eq!(
            report(&Declaration::new().throw_on_reference_error(true), dangling()),
            Err(dangling())
        );
    }

    #[test]
    fn warns_when_not_raising() {
        let sink = CollectedDiagnostics::new();
        let decl = Declaration::new().with_sink(sink.clone());

        assert_eq!(report(&decl, dangling()), Ok(()));
        let collected = sink.take();
        assert_eq!(collected.len(), 1);
        assert_eq!(collected[0].kind, DiagnosticKind::ReferenceError);
        assert_eq!(collected[0].target.as_deref(), Some("b"));
        assert_eq!(
            collected[0].message,
            "rule 'a' was discarded because it references non-existent rule 'b'"
        );
        assert!(sink.is_empty());
    }

    #[test]
    fn silent_when_warnings_disabled() {
        let sink = CollectedDiagnostics::new();
        let decl = Declaration::new()
            .print_warnings(false)
            .with_sink(sink.clone());
        assert_eq!(report(&decl, circular()), Ok(()));
        assert!(sink.is_empty());
    }

    #[test]
    fn unrecognized_never_warns() {
        let sink = CollectedDiagnostics::new();
        let decl = Declaration::new().with_sink(sink.clone());
        let err = OptionError::UnrecognizedOption { key: "z".into() };
        assert_eq!(report(&decl, err.clone()), Ok(()));
        assert!(sink.is_empty());

        let decl = decl.throw_on_unrecognized(true);
        assert_eq!(report(&decl, err.clone()), Err(err));
    }

    #[test]
    fn closures_are_sinks() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let decl = Declaration::new().with_sink(move |_: &Diagnostic| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        report(&decl, circular()).unwrap();
        report(&decl, dangling()).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn tracing_sink_logs_warnings() {
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::fmt().with_test_writer().finish(),
        );
        let decl = Declaration::new();
        assert_eq!(report(&decl, circular()), Ok(()));
    }
}
