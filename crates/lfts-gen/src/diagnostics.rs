// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Non-fatal diagnostics and the best-effort result type that carries them.
//!
//! Emission never stops on malformed input. Each emitter returns an
//! [`Emitted`] value: the output it could produce (with placeholders where
//! the input was unusable) together with every [`Diagnostic`] raised on the
//! way. Callers absorb nested results into their own list, so a whole program
//! pass yields one ordered diagnostic log.
//!
//! # Example
//!
//! ```
//! use lfts_gen::diagnostics::{Diagnostic, DiagnosticKind, Emitted};
//!
//! let mut log = Vec::new();
//! let text = Emitted::new(
//!     "undefined".to_owned(),
//!     vec![Diagnostic::new(DiagnosticKind::MissingDefaultValue, "Counter.count", "no default")],
//! )
//! .absorb_into(&mut log);
//!
//! assert_eq!(text, "undefined");
//! assert_eq!(log.len(), 1);
//! ```

use std::fmt;

/// How bad a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Output is complete but may not be what the author intended.
    Warning,
    /// Output contains a placeholder or an arbitrary choice.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Classification of diagnostics raised during emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A parameter has an empty initializer list; a placeholder was emitted.
    MissingDefaultValue,
    /// A reactor is marked both main and federated; main was chosen.
    AmbiguousRole,
    /// A main parameter's type cannot be parsed from the command line.
    UnsupportedCommandLineType,
    /// A connection's two sides list different numbers of ports.
    ConnectionArity,
}

impl DiagnosticKind {
    /// Severity implied by the kind.
    pub const fn severity(self) -> Severity {
        match self {
            Self::UnsupportedCommandLineType => Severity::Warning,
            Self::MissingDefaultValue | Self::AmbiguousRole | Self::ConnectionArity => {
                Severity::Error
            }
        }
    }

    /// Stable kebab-case code for logs and tests.
    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingDefaultValue => "missing-default-value",
            Self::AmbiguousRole => "ambiguous-role",
            Self::UnsupportedCommandLineType => "unsupported-command-line-type",
            Self::ConnectionArity => "connection-arity",
        }
    }
}

/// One reported problem, attributed to an IR node path such as `Counter.count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// Severity (derived from `kind`).
    pub severity: Severity,
    /// Dotted path of the offending IR node.
    pub node: String,
    /// Human-readable message.
    pub message: String,
}

impl Diagnostic {
    /// Build a diagnostic with the kind's default severity.
    pub fn new(kind: DiagnosticKind, node: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            node: node.into(),
            message: message.into(),
        }
    }

    /// Whether this diagnostic is error-level.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] {}: {}",
            self.severity,
            self.kind.code(),
            self.node,
            self.message
        )
    }
}

/// Best-effort output plus the diagnostics raised while producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emitted<T> {
    /// Output, possibly containing placeholders.
    pub value: T,
    /// Diagnostics in the order they were raised.
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Emitted<T> {
    /// Wrap a value with diagnostics.
    pub fn new(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { value, diagnostics }
    }

    /// Wrap a value that raised nothing.
    pub fn clean(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    /// Transform the value, keeping diagnostics.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Emitted<U> {
        Emitted {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }

    /// Move diagnostics into `log` and return the value.
    pub fn absorb_into(self, log: &mut Vec<Diagnostic>) -> T {
        log.extend(self.diagnostics);
        self.value
    }

    /// Whether any error-level diagnostic was raised.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]
    use super::*;

    #[test]
    fn severity_follows_kind() {
        assert_eq!(
            DiagnosticKind::MissingDefaultValue.severity(),
            Severity::Error
        );
        assert_eq!(
            DiagnosticKind::UnsupportedCommandLineType.severity(),
            Severity::Warning
        );
    }

    #[test]
    fn display_names_kind_and_node() {
        let d = Diagnostic::new(DiagnosticKind::AmbiguousRole, "Top", "both main and federated");
        assert_eq!(
            d.to_string(),
            "error[ambiguous-role] Top: both main and federated"
        );
    }

    #[test]
    fn absorb_preserves_order() {
        let mut log = vec![Diagnostic::new(DiagnosticKind::ConnectionArity, "a", "first")];
        let value = Emitted::new(
            7,
            vec![Diagnostic::new(
                DiagnosticKind::UnsupportedCommandLineType,
                "b",
                "second",
            )],
        )
        .map(|v| v * 2)
        .absorb_into(&mut log);
        assert_eq!(value, 14);
        let nodes: Vec<_> = log.iter().map(|d| d.node.as_str()).collect();
        assert_eq!(nodes, ["a", "b"]);
    }

    #[test]
    fn warnings_alone_are_not_errors() {
        let e = Emitted::new(
            (),
            vec![Diagnostic::new(
                DiagnosticKind::UnsupportedCommandLineType,
                "Main.p",
                "object",
            )],
        );
        assert!(!e.has_errors());
        assert!(!Emitted::clean(()).has_errors());
    }
}
