use std::fmt;

use thiserror::Error;

/// Represents a byte span within an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

impl SourceSpan {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `offset`, used for "expected ... here" errors.
    pub const fn point(offset: usize) -> Self {
        Self::new(offset, offset)
    }
}

/// Classification of an evaluation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A character outside `0-9 + - * / ( )` was found by the lexer.
    MalformedInput,
    /// The token sequence does not match the expression grammar.
    MalformedExpression,
    UnbalancedParentheses,
    DivisionByZero,
    /// A literal or an intermediate result does not fit in an `i64`.
    Overflow,
}

/// Error raised by any stage of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Option<SourceSpan>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            span: None,
            notes: Vec::new(),
        }
    }

    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Renders the diagnostic under `expression` with a caret marker
    /// beneath the offending span. Falls back to `Display` when there is
    /// no span.
    pub fn render(&self, expression: &str) -> String {
        let Some(span) = self.span else {
            return self.to_string();
        };
        let start = span.start.min(expression.len());
        let end = span.end.clamp(start, expression.len());
        let (Some(before), Some(marked)) = (expression.get(..start), expression.get(start..end))
        else {
            return self.to_string();
        };
        let offset = before.chars().count();
        let width = marked.chars().count().max(1);
        format!(
            "{expression}\n{}{} {self}",
            " ".repeat(offset),
            "^".repeat(width)
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)?;
        if let Some(span) = self.span {
            write!(f, " ({}..{})", span.start, span.end)?;
        }
        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}

/// Unified error type for the driver layer (CLI and REPL).
#[derive(Debug, Error)]
pub enum TallyError {
    #[error("{0}")]
    Diagnostic(#[from] Diagnostic),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TallyError {
    /// The evaluation error kind, if this error came from the pipeline.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            TallyError::Diagnostic(diag) => Some(diag.kind),
            TallyError::Io(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TallyError>;
