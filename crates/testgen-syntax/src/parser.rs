//! Python parsing
//!
//! Thin wrapper over tree-sitter-python. A fresh `tree_sitter::Parser` is
//! built per call so every entry point stays free of shared state.

use crate::error::{ParseError, SyntaxDiagnostic};
use crate::statement::{self, TopLevel};
use crate::tokens::{TokenKind, Tokens};
use tree_sitter::{Node, Parser, Tree};

/// Statements only the Python 2 grammar accepts; tree-sitter-python still
/// parses them without error nodes.
const LEGACY_STATEMENTS: &[(&str, &str)] = &[("print_statement", "print"), ("exec_statement", "exec")];

/// Well-formed trees the Python compiler still refuses, keyed by node kind
const SEMANTIC_CHECKS: &[(&str, fn(Node<'_>) -> Option<&'static str>)] = &[
    ("argument_list", argument_order_error),
    ("delete_statement", delete_target_error),
];

/// Deepest bracket nesting the Python tokenizer accepts
pub const MAX_NESTING: usize = 200;

const OPENING_BRACKETS: &[&str] = &["(", "[", "{"];
const CLOSING_BRACKETS: &[&str] = &[")", "]", "}"];

/// Parsed Python module: source text plus its concrete syntax tree
#[derive(Debug)]
pub struct ParsedModule<'s> {
    source: &'s str,
    tree: Tree,
}

impl<'s> ParsedModule<'s> {
    /// Parse source and require it to be free of syntax errors
    ///
    /// # Errors
    /// Returns `ParseError::Syntax` with the first offending location when the
    /// source is not valid Python.
    pub fn parse(source: &'s str) -> Result<Self, ParseError> {
        let module = Self::parse_lenient(source)?;
        match module.first_error() {
            Some(diagnostic) => Err(ParseError::Syntax(diagnostic)),
            None => Ok(module),
        }
    }

    /// Parse source, keeping error-recovered trees
    ///
    /// # Errors
    /// Returns error only if the parser cannot be set up or produces no tree.
    pub fn parse_lenient(source: &'s str) -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| ParseError::ParserInit(e.to_string()))?;

        let tree = parser.parse(source, None).ok_or(ParseError::ParseFailed)?;

        Ok(Self { source, tree })
    }

    /// Get source text
    #[inline]
    #[must_use]
    pub fn source(&self) -> &'s str {
        self.source
    }

    /// Get module node
    #[inline]
    #[must_use]
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Source text covered by a node
    #[inline]
    #[must_use]
    pub fn text(&self, node: Node<'_>) -> &'s str {
        node_text(node, self.source)
    }

    /// Classified top-level statements, in source order
    ///
    /// Comments are not statements and are skipped.
    pub fn statements(&self) -> impl Iterator<Item = TopLevel<'_>> + '_ {
        let root = self.root();
        let mut cursor = root.walk();
        let children: Vec<Node<'_>> = root
            .named_children(&mut cursor)
            .filter(|child| !child.is_extra())
            .collect();
        children
            .into_iter()
            .map(move |node| statement::classify(node, self.source))
    }

    /// Token stream over the whole module
    #[inline]
    #[must_use]
    pub fn tokens(&self) -> Tokens<'_> {
        Tokens::new(self.root(), self.source)
    }

    /// First syntax problem in document order, if any
    #[must_use]
    ///
    /// Tree errors are reported before excessive bracket nesting.
    pub fn first_error(&self) -> Option<SyntaxDiagnostic> {
        self.first_tree_error().or_else(|| self.nesting_error())
    }

    fn first_tree_error(&self) -> Option<SyntaxDiagnostic> {
        // Iterative pre-order walk; generated input can nest arbitrarily deep.
        let mut cursor = self.tree.walk();
        loop {
            let node = cursor.node();
            if let Some(message) = error_message(node) {
                return Some(SyntaxDiagnostic::at(message, node.start_position()));
            }
            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return None;
                }
            }
        }
    }

    fn nesting_error(&self) -> Option<SyntaxDiagnostic> {
        let mut depth = 0usize;
        for token in self.tokens().filter(|token| token.kind == TokenKind::Other) {
            if OPENING_BRACKETS.contains(&token.text) {
                if depth == MAX_NESTING {
                    return Some(SyntaxDiagnostic::at("too many nested parentheses", token.start));
                }
                depth += 1;
            } else if CLOSING_BRACKETS.contains(&token.text) {
                depth = depth.saturating_sub(1);
            }
        }
        None
    }
}

/// Source text covered by a node, empty if the range is not addressable
#[inline]
pub(crate) fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or("")
}

fn error_message(node: Node<'_>) -> Option<String> {
    if node.is_missing() {
        let message = if node.is_named() {
            format!("expected {}", node.kind())
        } else {
            format!("expected '{}'", node.kind())
        };
        return Some(message);
    }
    if node.is_error() {
        return Some("invalid syntax".to_string());
    }
    if let Some((_, keyword)) = LEGACY_STATEMENTS.iter().find(|(kind, _)| *kind == node.kind()) {
        return Some(format!("Missing parentheses in call to '{keyword}'"));
    }
    SEMANTIC_CHECKS
        .iter()
        .find(|(kind, _)| *kind == node.kind())
        .and_then(|(_, check)| check(node))
        .map(str::to_string)
}

/// Positional arguments must precede keywords; `*args` must precede `**kwargs`
fn argument_order_error(node: Node<'_>) -> Option<&'static str> {
    let mut seen_keyword = false;
    let mut seen_mapping_unpack = false;
    let mut cursor = node.walk();
    for argument in node.named_children(&mut cursor).filter(|child| !child.is_extra()) {
        match argument.kind() {
            "keyword_argument" => seen_keyword = true,
            "dictionary_splat" => seen_mapping_unpack = true,
            "list_splat" if seen_mapping_unpack => {
                return Some("iterable argument unpacking follows keyword argument unpacking");
            }
            "list_splat" => {}
            _ if seen_mapping_unpack => return Some("positional argument follows keyword argument unpacking"),
            _ if seen_keyword => return Some("positional argument follows keyword argument"),
            _ => {}
        }
    }
    None
}

fn delete_target_error(node: Node<'_>) -> Option<&'static str> {
    let mut cursor = node.walk();
    let targets: Vec<Node<'_>> = node
        .named_children(&mut cursor)
        .flat_map(|child| {
            if child.kind() == "expression_list" {
                let mut inner = child.walk();
                let items: Vec<Node<'_>> = child.named_children(&mut inner).collect();
                items
            } else {
                vec![child]
            }
        })
        .collect();
    targets
        .iter()
        .any(|target| target.kind() == "call")
        .then_some("cannot delete function call")
}
