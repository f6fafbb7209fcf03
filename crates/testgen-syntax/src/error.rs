//! Error types for the syntax layer
//!
//! - Parse errors (parser setup and syntax diagnostics)
//! - The uniform extraction rejection

use std::fmt;

/// Syntax diagnostic anchored at the first offending node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxDiagnostic {
    /// Parser message
    pub message: String,
    /// 1-based line
    pub line: usize,
    /// 1-based column (bytes)
    pub column: usize,
}

impl SyntaxDiagnostic {
    /// Create diagnostic from a 0-based tree-sitter point
    #[inline]
    #[must_use]
    pub fn at(message: impl Into<String>, point: tree_sitter::Point) -> Self {
        Self {
            message: message.into(),
            line: point.row + 1,
            column: point.column + 1,
        }
    }
}

impl fmt::Display for SyntaxDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (line {}, column {})", self.message, self.line, self.column)
    }
}

/// Errors while turning text into a syntax tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Grammar could not be loaded into the parser
    #[error("parser initialization failed: {0}")]
    ParserInit(String),

    /// Parser returned no tree
    #[error("parse failed")]
    ParseFailed,

    /// Source is not valid Python
    #[error("{0}")]
    Syntax(SyntaxDiagnostic),
}

/// Extraction rejection
///
/// Deliberately carries no detail: callers cannot learn which structural
/// rule an input broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[error("input is not a single function definition")]
pub struct Rejected;
