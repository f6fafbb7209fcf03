//! Top-level statement classification
//!
//! Every module-level node is folded into the closed [`TopLevel`] enum.
//! Anything the rules of this crate do not name explicitly lands in
//! [`TopLevel::Other`] together with its Python AST class name, which is
//! what rejection reasons report.

use crate::parser::node_text;
use tree_sitter::Node;

/// Module-level statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopLevel<'t> {
    /// `def` or `async def`, decorated or not
    Function(FunctionDef<'t>),
    /// `import x`, `from x import y`, `from __future__ import z`
    Import,
    /// Expression statement consisting of exactly one plain `str` literal
    StringLiteral,
    /// Anything else, tagged with its Python AST class name
    Other(&'static str),
}

impl TopLevel<'_> {
    /// Python AST class name of the statement
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            TopLevel::Function(function) if function.is_async => "AsyncFunctionDef",
            TopLevel::Function(_) => "FunctionDef",
            TopLevel::Import => "Import",
            TopLevel::StringLiteral => "Expr",
            TopLevel::Other(kind) => kind,
        }
    }
}

/// Function definition found at module level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef<'t> {
    /// Outermost node, decorators included
    pub node: Node<'t>,
    /// The `function_definition` node itself
    pub definition: Node<'t>,
    /// Function name
    pub name: &'t str,
    /// Decorator expressions, without the `@`
    pub decorators: Vec<Node<'t>>,
    /// `async def`
    pub is_async: bool,
}

impl<'t> FunctionDef<'t> {
    /// Statements of the function body, comments excluded
    #[must_use]
    pub fn body_statements(&self) -> Vec<Node<'t>> {
        self.definition
            .child_by_field_name("body")
            .map(named_statements)
            .unwrap_or_default()
    }
}

/// Classify one module-level node
pub(crate) fn classify<'t>(node: Node<'t>, source: &'t str) -> TopLevel<'t> {
    match node.kind() {
        "function_definition" => TopLevel::Function(function_def(node, node, Vec::new(), source)),
        "decorated_definition" => match node.child_by_field_name("definition") {
            Some(definition) if definition.kind() == "function_definition" => {
                TopLevel::Function(function_def(node, definition, decorators(node), source))
            }
            Some(definition) => TopLevel::Other(ast_name(definition)),
            None => TopLevel::Other(ast_name(node)),
        },
        "import_statement" | "import_from_statement" | "future_import_statement" => TopLevel::Import,
        "expression_statement" if is_string_statement(node, source) => TopLevel::StringLiteral,
        _ => TopLevel::Other(ast_name(node)),
    }
}

/// Whether a statement node is a bare plain string literal
pub(crate) fn is_string_statement(node: Node<'_>, source: &str) -> bool {
    if node.kind() != "expression_statement" {
        return false;
    }
    match named_statements(node).as_slice() {
        [expression] => is_plain_string(*expression, source),
        _ => false,
    }
}

/// Named, non-comment children of a node
pub(crate) fn named_statements(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect()
}

fn function_def<'t>(
    node: Node<'t>,
    definition: Node<'t>,
    decorators: Vec<Node<'t>>,
    source: &'t str,
) -> FunctionDef<'t> {
    let name = definition
        .child_by_field_name("name")
        .map(|n| node_text(n, source))
        .unwrap_or("");

    FunctionDef {
        node,
        definition,
        name,
        decorators,
        is_async: starts_with_async(definition),
    }
}

fn decorators(node: Node<'_>) -> Vec<Node<'_>> {
    named_statements(node)
        .into_iter()
        .filter(|child| child.kind() == "decorator")
        .filter_map(|decorator| named_statements(decorator).into_iter().next())
        .collect()
}

fn starts_with_async(node: Node<'_>) -> bool {
    let mut cursor = node.walk();
    let first = node.children(&mut cursor).next();
    first.is_some_and(|child| child.kind() == "async")
}

fn is_plain_string(node: Node<'_>, source: &str) -> bool {
    // Unwrapped iteratively; parentheses can nest arbitrarily deep.
    let mut node = node;
    while node.kind() == "parenthesized_expression" {
        match named_statements(node).as_slice() {
            [inner] => node = *inner,
            _ => return false,
        }
    }
    match node.kind() {
        "string" => has_plain_prefix(node, source),
        "concatenated_string" => named_statements(node)
            .into_iter()
            .all(|part| part.kind() == "string" && has_plain_prefix(part, source)),
        _ => false,
    }
}

/// `str` literal prefix check: bytes, f-strings and t-strings are not `str` constants
fn has_plain_prefix(node: Node<'_>, source: &str) -> bool {
    let mut cursor = node.walk();
    let Some(start) = node.children(&mut cursor).find(|c| c.kind() == "string_start") else {
        return false;
    };
    let prefix = node_text(start, source).trim_end_matches(['"', '\'']);
    !prefix
        .chars()
        .any(|c| matches!(c.to_ascii_lowercase(), 'b' | 'f' | 't'))
}

fn ast_name(node: Node<'_>) -> &'static str {
    match node.kind() {
        "class_definition" => "ClassDef",
        "function_definition" if starts_with_async(node) => "AsyncFunctionDef",
        "function_definition" => "FunctionDef",
        "decorated_definition" => "Decorated",
        "expression_statement" => expression_name(node),
        "import_statement" => "Import",
        "import_from_statement" | "future_import_statement" => "ImportFrom",
        "if_statement" => "If",
        "for_statement" if starts_with_async(node) => "AsyncFor",
        "for_statement" => "For",
        "while_statement" => "While",
        "try_statement" => "Try",
        "with_statement" if starts_with_async(node) => "AsyncWith",
        "with_statement" => "With",
        "match_statement" => "Match",
        "return_statement" => "Return",
        "pass_statement" => "Pass",
        "break_statement" => "Break",
        "continue_statement" => "Continue",
        "delete_statement" => "Delete",
        "raise_statement" => "Raise",
        "global_statement" => "Global",
        "nonlocal_statement" => "Nonlocal",
        "assert_statement" => "Assert",
        "type_alias_statement" => "TypeAlias",
        other => other,
    }
}

fn expression_name(node: Node<'_>) -> &'static str {
    match named_statements(node).as_slice() {
        [assignment] if assignment.kind() == "assignment" => {
            if assignment.child_by_field_name("type").is_some() {
                "AnnAssign"
            } else {
                "Assign"
            }
        }
        [augmented] if augmented.kind() == "augmented_assignment" => "AugAssign",
        _ => "Expr",
    }
}
