use std::fmt::{Display, Formatter};

use groupbind_core::AppError;
use thiserror::Error;

/// Category of a diagnostic reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// The configured authentication mode cannot run the operation.
    Capability,
    /// The desired or recorded state is invalid.
    Validation,
    /// The management API call failed.
    RemoteApi,
}

impl DiagnosticKind {
    /// Returns a stable label for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Capability => "capability",
            Self::Validation => "validation",
            Self::RemoteApi => "remote_api",
        }
    }

    fn from_error(error: &AppError) -> Self {
        match error {
            AppError::Unsupported(_) => Self::Capability,
            AppError::Validation(_) => Self::Validation,
            _ => Self::RemoteApi,
        }
    }
}

/// Whether a diagnostic fails the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    /// Operation failed.
    Error,
    /// Operation completed, but something went wrong on the way.
    Warning,
}

/// One host-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Diagnostic category.
    pub kind: DiagnosticKind,
    /// Error or warning.
    pub severity: DiagnosticSeverity,
    /// Short summary line.
    pub summary: String,
    /// Human-readable detail.
    pub detail: String,
}

impl Diagnostic {
    /// Creates an error diagnostic.
    #[must_use]
    pub fn error(
        kind: DiagnosticKind,
        summary: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity: DiagnosticSeverity::Error,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    /// Creates an error diagnostic whose kind follows the error category.
    #[must_use]
    pub fn from_app_error(summary: impl Into<String>, error: &AppError) -> Self {
        Self::error(DiagnosticKind::from_error(error), summary, error.to_string())
    }

    /// Prefixes the detail with the action and identifiers involved.
    #[must_use]
    pub fn with_context(mut self, context: impl Display) -> Self {
        self.detail = format!("{context}: {}", self.detail);
        self
    }

    /// Downgrades the diagnostic to a warning.
    #[must_use]
    pub fn into_warning(mut self) -> Self {
        self.severity = DiagnosticSeverity::Warning;
        self
    }
}

impl Display for Diagnostic {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
        };
        write!(
            formatter,
            "{severity} [{}] {}: {}",
            self.kind.as_str(),
            self.summary,
            self.detail
        )
    }
}

/// Diagnostics returned by a failed lifecycle operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render(.0))]
pub struct Diagnostics(Vec<Diagnostic>);

fn render(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Diagnostics {
    /// Returns the contained diagnostics.
    #[must_use]
    pub fn as_slice(&self) -> &[Diagnostic] {
        self.0.as_slice()
    }

    /// Returns true when any diagnostic is an error.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.0
            .iter()
            .any(|diagnostic| diagnostic.severity == DiagnosticSeverity::Error)
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(value: Diagnostic) -> Self {
        Self(vec![value])
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use groupbind_core::AppError;

    use super::{Diagnostic, DiagnosticKind, DiagnosticSeverity, Diagnostics};

    #[test]
    fn kind_follows_error_category() {
        let capability = Diagnostic::from_app_error(
            "Unable to read project group",
            &AppError::Unsupported("machine identity required".to_owned()),
        );
        let remote = Diagnostic::from_app_error(
            "Error reading project group membership",
            &AppError::Remote("status 500".to_owned()),
        );

        assert_eq!(capability.kind, DiagnosticKind::Capability);
        assert_eq!(remote.kind, DiagnosticKind::RemoteApi);
    }

    #[test]
    fn context_prefixes_detail() {
        let diagnostic = Diagnostic::from_app_error(
            "Error deleting project group",
            &AppError::Remote("status 500".to_owned()),
        )
        .with_context("couldn't delete group 'platform' from project 'web'")
        .into_warning();

        assert_eq!(diagnostic.severity, DiagnosticSeverity::Warning);
        assert_eq!(
            diagnostic.detail,
            "couldn't delete group 'platform' from project 'web': remote error: status 500"
        );
        assert!(!Diagnostics::from(diagnostic).has_error());
    }
}
