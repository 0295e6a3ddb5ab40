//! The crate's umbrella error type.
//!
//! [`Diagnostic`] values describe facts about the BASIC program being
//! compiled; [`CompileError`] is what the library's public entry point
//! actually returns, distinguishing a bad program from a failed I/O
//! operation or a bad invocation so `main` can pick the right exit code.

use thiserror::Error;

use crate::diagnostics::Diagnostic;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("{0}")]
    Diagnostic(Box<Diagnostic>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("usage error: {0}")]
    Usage(String),
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render("<source>"))
    }
}

impl From<Diagnostic> for CompileError {
    fn from(diagnostic: Diagnostic) -> Self {
        CompileError::Diagnostic(Box::new(diagnostic))
    }
}

pub type CompileResult<T> = Result<T, CompileError>;
