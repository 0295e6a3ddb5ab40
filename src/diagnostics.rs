//! Source-position-anchored compiler diagnostics.
//!
//! Every fatal error and every warning the compiler can produce is a
//! [`Diagnostic`]: a closed [`DiagnosticKind`] tag, a message, and the
//! `(line, column)` in the original source it refers to. Diagnostics are
//! plain data, not `std::error::Error` values — they are rendered straight
//! to stderr in the format described by the CLI contract.

use std::fmt;

/// A 1-based `(line, column)` location within the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The closed set of diagnostic kinds from the error handling design.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    LexError,
    SyntaxError,
    TypeError,
    UnresolvedLabel,
    NestingError,
    RangeError,
    UnsupportedFeature,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DiagnosticKind::LexError => "LexError",
            DiagnosticKind::SyntaxError => "SyntaxError",
            DiagnosticKind::TypeError => "TypeError",
            DiagnosticKind::UnresolvedLabel => "UnresolvedLabel",
            DiagnosticKind::NestingError => "NestingError",
            DiagnosticKind::RangeError => "RangeError",
            DiagnosticKind::UnsupportedFeature => "UnsupportedFeature",
        };
        f.write_str(text)
    }
}

/// A single compiler diagnostic: either a fatal error (aborts compilation)
/// or a warning (printed, does not affect the exit code).
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub position: Position,
    pub kind: Option<DiagnosticKind>,
    pub message: String,
    pub fatal: bool,
}

impl Diagnostic {
    pub fn fatal(position: Position, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            position,
            kind: Some(kind),
            message: message.into(),
            fatal: true,
        }
    }

    pub fn warning(position: Position, message: impl Into<String>) -> Self {
        Self {
            position,
            kind: None,
            message: message.into(),
            fatal: false,
        }
    }

    /// Render this diagnostic as `<file>:<line>:<column>: <kind>: <message>`,
    /// or with `warning:` in place of the kind for non-fatal diagnostics.
    pub fn render(&self, file: &str) -> String {
        let tag = match &self.kind {
            Some(kind) => kind.to_string(),
            None => "warning".to_string(),
        };
        format!("{file}:{}: {tag}: {}", self.position, self.message)
    }
}
