//! Error taxonomy of the rewrite and the diagnostics it reports.
//!
//! A matcher that does not apply returns `None`; that is never an error.
//! Everything else the rewrite cannot handle becomes a [`RewriteError`],
//! which is attached to the node it concerns as a [`Diagnostic`]. Only
//! [`RewriteError::StructuralInvariantViolation`] is fatal, and even that
//! aborts just the unit being rewritten.

use crate::core::NodePath;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    /// An expectation or context reference that cannot be tied to a known mock
    #[error("unresolved binding: {0}")]
    UnresolvedBinding(String),

    /// An expectation argument that is neither a literal nor a known matcher
    #[error("argument `{argument}` is neither a literal nor a recognized matcher")]
    AmbiguousArgumentMix { argument: String },

    /// More than one mock-context field in one class
    #[error("class declares {count} mock-context fields, expected exactly one")]
    AmbiguousContext { count: usize },

    /// A construct inside a recognized pattern that has no safe translation
    #[error("unsupported construct: {0}")]
    Unsupported(String),

    #[error("structural invariant violated: {0}")]
    StructuralInvariantViolation(String),
}

impl RewriteError {
    /// Stable short code for programmatic filtering
    pub fn code(&self) -> &'static str {
        match self {
            RewriteError::UnresolvedBinding(_) => "unresolved-binding",
            RewriteError::AmbiguousArgumentMix { .. } => "ambiguous-argument-mix",
            RewriteError::AmbiguousContext { .. } => "ambiguous-context",
            RewriteError::Unsupported(_) => "unsupported",
            RewriteError::StructuralInvariantViolation(_) => "structural-invariant-violation",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            RewriteError::StructuralInvariantViolation(_) => Severity::Fatal,
            _ => Severity::Skipped,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The fragment was left untouched; the rest of the unit was rewritten
    Skipped,
    /// The whole unit was returned unchanged
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Skipped => write!(f, "skipped"),
            Severity::Fatal => write!(f, "fatal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    pub class_name: String,
    pub location: NodePath,
    pub message: String,
}

impl Diagnostic {
    pub fn new(class_name: impl Into<String>, location: NodePath, error: &RewriteError) -> Self {
        Self {
            severity: error.severity(),
            code: error.code().to_string(),
            class_name: class_name.into(),
            location,
            message: error.to_string(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {} at {}: {}",
            self.severity, self.code, self.class_name, self.location, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Step;

    #[test]
    fn test_only_structural_violation_is_fatal() {
        assert_eq!(
            RewriteError::UnresolvedBinding("x".into()).severity(),
            Severity::Skipped
        );
        assert_eq!(
            RewriteError::AmbiguousContext { count: 2 }.severity(),
            Severity::Skipped
        );
        assert_eq!(
            RewriteError::StructuralInvariantViolation("dup".into()).severity(),
            Severity::Fatal
        );
    }

    #[test]
    fn test_diagnostic_display() {
        let location = NodePath::root().child(Step::Type(0)).child(Step::Member(2));
        let diagnostic = Diagnostic::new(
            "ListTest",
            location,
            &RewriteError::AmbiguousArgumentMix {
                argument: "a + b".into(),
            },
        );
        assert_eq!(
            diagnostic.to_string(),
            "skipped [ambiguous-argument-mix] ListTest at types[0].members[2]: \
             argument `a + b` is neither a literal nor a recognized matcher"
        );
    }

    #[test]
    fn test_diagnostic_serializes_severity_lowercase() {
        let diagnostic = Diagnostic::new(
            "A",
            NodePath::root(),
            &RewriteError::StructuralInvariantViolation("x".into()),
        );
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["severity"], "fatal");
        assert_eq!(json["code"], "structural-invariant-violation");
    }
}
