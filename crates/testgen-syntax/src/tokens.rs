//! Lazy token stream
//!
//! Tokens are the leaves of the syntax tree, produced on demand by a tree
//! cursor walk. String literals and comments are atomic: their inner
//! structure (escapes, interpolations) is never split into separate tokens,
//! so comment-like text inside a string can never surface as a comment.
//!
//! The stream is finite and cannot be restarted; build a new one to walk
//! again.

use crate::parser::node_text;
use std::iter::FusedIterator;
use std::ops::Range;
use tree_sitter::{Node, Point, TreeCursor};

/// Node kinds emitted as a single token even though they have children
const ATOMIC_KINDS: &[&str] = &["string", "comment"];

/// Token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `# ...` up to the end of the line
    Comment,
    /// Complete string literal, prefix and quotes included
    String,
    /// Name
    Identifier,
    /// Backslash line continuation
    LineContinuation,
    /// Keywords, operators, punctuation, numbers
    Other,
}

impl TokenKind {
    fn of(node: Node<'_>) -> Self {
        match node.kind() {
            "comment" => TokenKind::Comment,
            "string" => TokenKind::String,
            "identifier" => TokenKind::Identifier,
            "line_continuation" => TokenKind::LineContinuation,
            _ => TokenKind::Other,
        }
    }
}

/// Token record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'t> {
    /// Classification
    pub kind: TokenKind,
    /// Exact source text
    pub text: &'t str,
    /// Byte range in source
    pub span: Range<usize>,
    /// 0-based row/column of the first byte
    pub start: Point,
}

/// Pull-based token sequence over a subtree
pub struct Tokens<'t> {
    cursor: TreeCursor<'t>,
    source: &'t str,
    finished: bool,
}

impl<'t> Tokens<'t> {
    /// Stream the tokens under `node`
    #[must_use]
    pub fn new(node: Node<'t>, source: &'t str) -> Self {
        Self {
            cursor: node.walk(),
            source,
            finished: false,
        }
    }

    /// Step to the next node that is not a descendant of the current one
    fn skip_subtree(&mut self) {
        loop {
            if self.cursor.goto_next_sibling() {
                return;
            }
            if !self.cursor.goto_parent() {
                self.finished = true;
                return;
            }
        }
    }
}

impl<'t> Iterator for Tokens<'t> {
    type Item = Token<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            let node = self.cursor.node();
            let atomic = ATOMIC_KINDS.contains(&node.kind());
            if !atomic && self.cursor.goto_first_child() {
                continue;
            }
            self.skip_subtree();

            // Zero-width leaves (recovered MISSING nodes) carry no text
            if node.start_byte() < node.end_byte() {
                return Some(Token {
                    kind: TokenKind::of(node),
                    text: node_text(node, self.source),
                    span: node.byte_range(),
                    start: node.start_position(),
                });
            }
        }
        None
    }
}

impl FusedIterator for Tokens<'_> {}

impl std::fmt::Debug for Tokens<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokens")
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}
