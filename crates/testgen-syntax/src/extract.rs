//! Single-function extraction
//!
//! Accepts a module made of exactly one function definition, optionally
//! preceded by a module docstring, and returns the function's verbatim
//! source. Everything else is rejected with the same opaque signal.

use crate::error::{ParseError, Rejected};
use crate::parser::ParsedModule;
use crate::render::{line_end, line_start};
use crate::statement::{FunctionDef, TopLevel};
use crate::tokens::{TokenKind, Tokens};
use std::fmt;

/// Verbatim source of one top-level function definition
///
/// Decorators are included; surrounding whitespace is trimmed. Only
/// [`extract`] produces values of this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionSlice(String);

impl FunctionSlice {
    /// Get source text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take source text
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for FunctionSlice {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FunctionSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why an input was rejected; logged, never returned
#[derive(Debug, thiserror::Error)]
enum RejectCause {
    #[error("empty input")]
    Empty,

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("disallowed top-level statement: {0}")]
    Disallowed(&'static str),

    #[error("expected exactly one function definition, found {0}")]
    FunctionCount(usize),
}

/// Extract the single function definition from source text
///
/// # Errors
/// Returns [`Rejected`] if the text is empty, is not valid Python, or is not
/// exactly one top-level function (after an optional leading string literal).
pub fn extract(source: &str) -> Result<FunctionSlice, Rejected> {
    match locate(source) {
        Ok(slice) => Ok(FunctionSlice(slice)),
        Err(cause) => {
            tracing::debug!(%cause, "extraction rejected");
            Err(Rejected)
        }
    }
}

fn locate(source: &str) -> Result<String, RejectCause> {
    if source.trim().is_empty() {
        return Err(RejectCause::Empty);
    }

    let module = ParsedModule::parse(source)?;

    let mut functions: Vec<FunctionDef<'_>> = Vec::new();
    for (index, statement) in module.statements().enumerate() {
        match statement {
            TopLevel::Function(function) => functions.push(function),
            TopLevel::StringLiteral if index == 0 => {}
            other => return Err(RejectCause::Disallowed(other.kind_name())),
        }
    }

    let [function] = functions.as_slice() else {
        return Err(RejectCause::FunctionCount(functions.len()));
    };

    let start = line_start(source, function.node.start_byte());
    let end = line_end(source, last_code_byte(function, source));
    let slice = source.get(start..end).unwrap_or("").trim();

    if slice.is_empty() {
        return Err(RejectCause::Empty);
    }
    Ok(slice.to_string())
}

/// End of the last non-comment token of the definition
///
/// Comments after the final body statement may be attached to the
/// function's block; they do not extend the slice.
fn last_code_byte(function: &FunctionDef<'_>, source: &str) -> usize {
    Tokens::new(function.node, source)
        .filter(|token| token.kind != TokenKind::Comment)
        .last()
        .map_or(function.node.end_byte(), |token| token.span.end)
}
