//! Function source normalization
//!
//! Three passes, always in this order:
//!
//! 1. comment tokens are dropped from the token stream
//! 2. the function's leading docstring statement is removed
//! 3. trailing whitespace is stripped and the text ends in one newline
//!
//! Comments and docstrings carry no runtime behavior, so the output runs
//! exactly like the input. Normalization never fails: any pass that cannot
//! complete hands its input through unchanged.

use crate::extract::FunctionSlice;
use crate::parser::ParsedModule;
use crate::render::{line_start, SourceRewriter};
use crate::statement::{is_string_statement, TopLevel};
use crate::tokens::TokenKind;
use std::fmt;

/// Function source with comments and docstring removed
///
/// Always ends with exactly one newline.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedSource(String);

impl NormalizedSource {
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

impl AsRef<str> for NormalizedSource {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize an extracted function
#[must_use]
pub fn normalize(function: &FunctionSlice) -> NormalizedSource {
    let without_comments = strip_comments(function.as_str());
    let without_docstring = strip_docstring(&without_comments);
    NormalizedSource(canonical_whitespace(&without_docstring))
}

/// Drop every comment token
///
/// The text is rebuilt from the remaining tokens and the gaps between them,
/// so spacing and line structure survive. Text that does not parse is
/// returned unchanged.
#[must_use]
pub fn strip_comments(source: &str) -> String {
    let module = match ParsedModule::parse(source) {
        Ok(module) => module,
        Err(err) => {
            tracing::debug!(error = %err, "comment stripping skipped");
            return source.to_string();
        }
    };

    let mut out = String::with_capacity(source.len());
    let mut last = 0;
    for token in module.tokens() {
        out.push_str(source.get(last..token.span.start).unwrap_or(""));
        last = token.span.end;
        if token.kind != TokenKind::Comment {
            out.push_str(token.text);
        }
    }
    out.push_str(source.get(last..).unwrap_or(""));
    out
}

/// Remove the function's leading docstring
///
/// Literal statements that open the body after the docstring is gone are
/// removed too; none of them has any effect at runtime.
#[must_use]
pub fn strip_docstring(source: &str) -> String {
    let mut current = source.to_string();
    while let Some(next) = remove_leading_docstring(&current) {
        current = next;
    }
    current
}

/// One removal step; `None` when there is nothing to remove or the edit
/// could not be rendered into a well-formed function.
fn remove_leading_docstring(source: &str) -> Option<String> {
    let module = ParsedModule::parse(source).ok()?;
    let Some(TopLevel::Function(function)) = module.statements().next() else {
        return None;
    };

    let body = function.body_statements();
    let first = *body.first()?;
    if !is_string_statement(first, source) {
        return None;
    }

    let mut rewriter = SourceRewriter::new(source);
    match body.get(1) {
        // `"doc"; return x`, or a multi-line docstring closing on the next statement's line
        Some(next) if next.start_position().row == first.end_position().row => {
            rewriter.delete(first.start_byte()..next.start_byte());
        }
        Some(next) if owns_its_line(source, first.start_byte()) => {
            rewriter.delete(line_start(source, first.start_byte())..line_start(source, next.start_byte()));
        }
        Some(next) => {
            rewriter.delete(first.start_byte()..next.start_byte());
        }
        // Docstring is the whole body
        None => {
            rewriter.replace(first.byte_range(), "pass");
        }
    }

    let rendered = match rewriter.render() {
        Ok(rendered) => rendered,
        Err(err) => {
            tracing::debug!(error = %err, "docstring removal kept original text");
            return None;
        }
    };

    if is_single_function(&rendered) {
        Some(rendered)
    } else {
        tracing::debug!("docstring removal produced malformed source; kept original text");
        None
    }
}

fn owns_its_line(source: &str, offset: usize) -> bool {
    source
        .get(line_start(source, offset)..offset)
        .is_some_and(|indent| indent.trim().is_empty())
}

fn is_single_function(source: &str) -> bool {
    let Ok(module) = ParsedModule::parse(source) else {
        return false;
    };
    let statements: Vec<_> = module.statements().collect();
    matches!(statements.as_slice(), [TopLevel::Function(_)])
}

/// Strip trailing whitespace per line; end with exactly one newline
fn canonical_whitespace(text: &str) -> String {
    let joined = text.lines().map(str::trim_end).collect::<Vec<_>>().join("\n");
    format!("{}\n", joined.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract;
    use pretty_assertions::assert_eq;

    fn normalized(source: &str) -> String {
        normalize(&extract(source).unwrap()).into_string()
    }

    #[test]
    fn plain_function_is_unchanged() {
        assert_eq!(normalized("def add(a, b):\n    return a + b\n"), "def add(a, b):\n    return a + b\n");
    }

    #[test]
    fn strips_inline_and_full_line_comments() {
        let source = "def add(a, b):\n    # leading comment\n    total = a + b  # inline comment\n    return total\n";
        assert_eq!(normalized(source), "def add(a, b):\n\n    total = a + b\n    return total\n");
    }

    #[test]
    fn hash_inside_string_survives() {
        let source = "def tag(x):\n    return '#' + x  # real comment\n";
        assert_eq!(normalized(source), "def tag(x):\n    return '#' + x\n");
    }

    #[test]
    fn strips_docstring_lines() {
        let source = "def greet(name):\n    \"\"\"Return greeting text.\n\n    More.\n    \"\"\"\n    return \"hi \" + name\n";
        assert_eq!(normalized(source), "def greet(name):\n    return \"hi \" + name\n");
    }

    #[test]
    fn docstring_sharing_a_line() {
        assert_eq!(normalized("def f(x): \"doc\"; return x\n"), "def f(x): return x\n");
    }

    #[test]
    fn multiline_docstring_ending_on_statement_line() {
        let source = "def f(x):\n    \"\"\"a\n    b\"\"\"; y = x\n    return y\n";
        assert_eq!(normalized(source), "def f(x):\n    y = x\n    return y\n");
    }

    #[test]
    fn docstring_only_body_becomes_pass() {
        assert_eq!(normalized("def f():\n    '''Nothing here.'''\n"), "def f():\n    pass\n");
    }

    #[test]
    fn non_leading_string_is_kept() {
        let source = "def f():\n    x = 1\n    'not a docstring'\n    return x\n";
        assert_eq!(normalized(source), source);
    }

    #[test]
    fn fstring_is_not_a_docstring() {
        let source = "def f(x):\n    f\"{x}\"\n    return x\n";
        assert_eq!(normalized(source), source);
    }

    #[test]
    fn decorated_function_docstring() {
        let source = "@cache\ndef f():\n    \"doc\"\n    return 1\n";
        assert_eq!(normalized(source), "@cache\ndef f():\n    return 1\n");
    }

    #[test]
    fn nested_function_docstring_is_kept() {
        let source = "def outer():\n    def inner():\n        \"inner doc\"\n        return 1\n    return inner\n";
        assert_eq!(normalized(source), source);
    }

    #[test]
    fn consecutive_leading_literals_are_removed() {
        let source = "def f():\n    \"one\"\n    \"two\"\n    return 2\n";
        assert_eq!(normalized(source), "def f():\n    return 2\n");
    }

    #[test]
    fn trailing_whitespace_is_stripped() {
        assert_eq!(normalized("def f():   \n    return 1   \n\n\n"), "def f():\n    return 1\n");
    }

    #[test]
    fn strip_comments_on_unparseable_text_is_identity() {
        assert_eq!(strip_comments("def (: # c"), "def (: # c");
    }

    #[test]
    fn strip_docstring_without_function_is_identity() {
        assert_eq!(strip_docstring("x = 1\n"), "x = 1\n");
    }

    #[test]
    fn idempotent() {
        let source = "def f(a):\n    \"\"\"Doc.\"\"\"\n    # c\n    return a  # d\n";
        let once = normalized(source);
        let twice = normalize(&extract(&once).unwrap());
        assert_eq!(twice.as_str(), once);
    }
}
