//! Error handling for the shader cross-compiler
//!
//! This module defines common error types and the diagnostic reporter
//! used throughout the compiler. Back-end passes record recoverable
//! problems as diagnostics and keep going; fatal conditions surface as
//! `CompilerError` values.

use crate::source_loc::SourceSpan;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main compiler error type that encompasses all phases of compilation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    #[error("Conversion error at {span}: {message}")]
    ConvertError { span: SourceSpan, message: String },

    #[error("Code generation error at {span}: {message}")]
    CodegenError { span: SourceSpan, message: String },

    #[error("Extension error: {message}")]
    ExtensionError { message: String },

    #[error("{message}")]
    GenerationFailed { message: String },

    #[error("Internal compiler error: {message}")]
    InternalError { message: String },
}

impl CompilerError {
    /// Create a conversion error
    pub fn convert_error(message: String, span: SourceSpan) -> Self {
        CompilerError::ConvertError { span, message }
    }

    /// Create a codegen error
    pub fn codegen_error(message: String, span: SourceSpan) -> Self {
        CompilerError::CodegenError { span, message }
    }

    /// Create an extension error
    pub fn extension_error(message: String) -> Self {
        CompilerError::ExtensionError { message }
    }

    /// Create a generation failure summary
    pub fn generation_failed(message: String) -> Self {
        CompilerError::GenerationFailed { message }
    }

    /// Create an internal error
    pub fn internal_error(message: String) -> Self {
        CompilerError::InternalError { message }
    }
}

/// Convert from String (for simple error cases)
impl From<String> for CompilerError {
    fn from(message: String) -> Self {
        CompilerError::InternalError { message }
    }
}

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A diagnostic message with optional source attribution
///
/// The span is optional because back-end diagnostics may refer to
/// synthesized AST nodes that have no position in the original source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: Option<SourceSpan>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: String, span: Option<SourceSpan>) -> Self {
        Self {
            severity: Severity::Error,
            message,
            span,
            notes: Vec::new(),
        }
    }

    pub fn warning(message: String, span: Option<SourceSpan>) -> Self {
        Self {
            severity: Severity::Warning,
            message,
            span,
            notes: Vec::new(),
        }
    }

    pub fn note(message: String, span: Option<SourceSpan>) -> Self {
        Self {
            severity: Severity::Note,
            message,
            span,
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.span {
            Some(span) => write!(f, "{} at {}: {}", self.severity, span, self.message)?,
            None => write!(f, "{}: {}", self.severity, self.message)?,
        }

        for note in &self.notes {
            write!(f, "\n  note: {}", note)?;
        }

        Ok(())
    }
}

/// Collects the diagnostics submitted by the back-end passes
///
/// The reporter is a flat log; severity counts are derived from it on
/// demand, so submission stays a single push.
#[derive(Debug, Default)]
pub struct Reporter {
    diagnostics: Vec<Diagnostic>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(
        &mut self,
        severity: Severity,
        message: String,
        span: Option<SourceSpan>,
    ) -> &mut Diagnostic {
        self.diagnostics.push(Diagnostic {
            severity,
            message,
            span,
            notes: Vec::new(),
        });
        self.diagnostics.last_mut().unwrap()
    }

    fn count_of(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }

    /// Record an error
    pub fn error(&mut self, message: String, span: Option<SourceSpan>) -> &mut Diagnostic {
        self.push(Severity::Error, message, span)
    }

    /// Record a warning
    pub fn warning(&mut self, message: String, span: Option<SourceSpan>) -> &mut Diagnostic {
        self.push(Severity::Warning, message, span)
    }

    /// Record an informational note
    pub fn note(&mut self, message: String, span: Option<SourceSpan>) -> &mut Diagnostic {
        self.push(Severity::Note, message, span)
    }

    /// True when at least one error was recorded
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == Severity::Error)
    }

    /// Number of recorded errors
    pub fn error_count(&self) -> usize {
        self.count_of(Severity::Error)
    }

    /// Number of recorded warnings
    pub fn warning_count(&self) -> usize {
        self.count_of(Severity::Warning)
    }

    /// All recorded diagnostics, in submission order
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Drop everything recorded so far
    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }

    /// Dump every diagnostic to stderr
    pub fn print_diagnostics(&self) {
        self.diagnostics.iter().for_each(|diag| eprintln!("{}", diag));
    }

    /// Short human-readable tally, e.g. `2 errors and 1 warning`
    pub fn summary(&self) -> String {
        let tally = |count: usize, what: &str| {
            if count == 1 {
                format!("1 {}", what)
            } else {
                format!("{} {}s", count, what)
            }
        };

        match (self.error_count(), self.warning_count()) {
            (0, 0) => "No errors or warnings".to_string(),
            (0, warnings) => tally(warnings, "warning"),
            (errors, 0) => tally(errors, "error"),
            (errors, warnings) => {
                format!("{} and {}", tally(errors, "error"), tally(warnings, "warning"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_loc::SourceLocation;

    fn span() -> SourceSpan {
        SourceSpan::new(
            SourceLocation::new("shader.hlsl", 1, 1),
            SourceLocation::new("shader.hlsl", 1, 5),
        )
    }

    #[test]
    fn test_diagnostic_creation() {
        let diag = Diagnostic::error("Test error".to_string(), Some(span()));
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.message, "Test error");
        assert_eq!(diag.span, Some(span()));
    }

    #[test]
    fn test_reporter() {
        let mut reporter = Reporter::new();

        assert!(!reporter.has_errors());
        assert_eq!(reporter.error_count(), 0);

        reporter.error("Test error".to_string(), Some(span()));
        assert!(reporter.has_errors());
        assert_eq!(reporter.error_count(), 1);

        reporter.warning("Test warning".to_string(), None);
        assert_eq!(reporter.warning_count(), 1);
        assert_eq!(reporter.error_count(), 1);
    }

    #[test]
    fn test_diagnostic_with_notes() {
        let diag = Diagnostic::error("Test error".to_string(), Some(span()))
            .with_note("This is a note".to_string())
            .with_note("This is another note".to_string());

        assert_eq!(diag.notes.len(), 2);
        assert_eq!(diag.notes[0], "This is a note");
    }

    #[test]
    fn test_summary() {
        let mut reporter = Reporter::new();
        assert_eq!(reporter.summary(), "No errors or warnings");

        reporter.error("Error 1".to_string(), Some(span()));
        assert_eq!(reporter.summary(), "1 error");

        reporter.error("Error 2".to_string(), Some(span()));
        assert_eq!(reporter.summary(), "2 errors");

        reporter.warning("Warning 1".to_string(), None);
        assert_eq!(reporter.summary(), "2 errors and 1 warning");
    }

    #[test]
    fn test_diagnostic_display_without_span() {
        let diag = Diagnostic::warning("unreferenced function".to_string(), None);
        assert_eq!(format!("{}", diag), "warning: unreferenced function");
    }
}
