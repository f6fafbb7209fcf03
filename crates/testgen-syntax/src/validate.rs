//! Generated test validation
//!
//! Decides whether untrusted generated text is an acceptable pytest module.
//! The text is parsed, never executed. Checks run cheapest first and the
//! first failing check is the only one reported:
//!
//! 1. empty text
//! 2. markdown fences anywhere
//! 3. conversational preamble
//! 4. syntax
//! 5. top-level structure: imports, `test_*` functions, and fixtures only,
//!    with at least one test function

use crate::parser::ParsedModule;
use crate::statement::{FunctionDef, TopLevel};
use tree_sitter::Node;

/// Name prefix that marks a test function
pub const TEST_PREFIX: &str = "test_";

/// Markdown code fence delimiter
pub const FENCE: &str = "```";

/// Lowercase openings that identify prose rather than code
pub const PROSE_PREAMBLES: &[&str] = &[
    "here are",
    "sure,",
    "certainly",
    "i can",
    "below is",
    "these tests",
    "explanation",
];

/// Decorator name that marks a fixture
const FIXTURE_MARKER: &str = "fixture";

/// Test framework module owning the fixture decorator
const FRAMEWORK_MODULE: &str = "pytest";

/// Reason a candidate was rejected
///
/// The `Display` text is the stable reason string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// Nothing but whitespace
    #[error("empty output")]
    Empty,

    /// A fence delimiter appears somewhere in the text
    #[error("markdown fences are not allowed")]
    MarkdownFence,

    /// Text opens like a chat answer
    #[error("output appears to contain prose")]
    Prose,

    /// Parser diagnostic, passed through verbatim
    #[error("syntax error: {0}")]
    Syntax(String),

    /// Function that is neither a test nor a fixture
    #[error("non-test function not allowed: {0}")]
    NonTestFunction(String),

    /// Top-level statement of a disallowed kind
    #[error("disallowed top-level node: {0}")]
    DisallowedNode(&'static str),

    /// Structure is fine but there is nothing to run
    #[error("no test function found")]
    NoTestFunction,
}

/// What an accepted module contains
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteSummary {
    /// Test function names, in source order
    pub tests: Vec<String>,
    /// Fixture function names, in source order
    pub fixtures: Vec<String>,
    /// Number of import statements
    pub imports: usize,
}

/// Accept/reject decision with its reason
///
/// `reason` is empty exactly when the candidate was accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    accepted: bool,
    reason: String,
}

impl Verdict {
    /// Accepting verdict
    #[inline]
    #[must_use]
    pub fn accept() -> Self {
        Self {
            accepted: true,
            reason: String::new(),
        }
    }

    /// Rejecting verdict
    #[inline]
    #[must_use]
    pub fn reject(rejection: &Rejection) -> Self {
        Self {
            accepted: false,
            reason: rejection.to_string(),
        }
    }

    /// Whether the candidate was accepted
    #[inline]
    #[must_use]
    pub fn accepted(&self) -> bool {
        self.accepted
    }

    /// Rejection reason, empty when accepted
    #[inline]
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl<T> From<Result<T, Rejection>> for Verdict {
    fn from(result: Result<T, Rejection>) -> Self {
        match result {
            Ok(_) => Verdict::accept(),
            Err(rejection) => Verdict::reject(&rejection),
        }
    }
}

/// Validate generated test code
#[must_use]
pub fn validate(output: &str) -> Verdict {
    validate_suite(output).into()
}

/// Validate generated test code, returning what it contains on success
///
/// # Errors
/// Returns the first [`Rejection`] found.
pub fn validate_suite(output: &str) -> Result<SuiteSummary, Rejection> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return Err(Rejection::Empty);
    }

    if output.contains(FENCE) {
        return Err(Rejection::MarkdownFence);
    }

    let lowered = trimmed.to_lowercase();
    if PROSE_PREAMBLES.iter().any(|preamble| lowered.starts_with(preamble)) {
        return Err(Rejection::Prose);
    }

    let module = ParsedModule::parse(output).map_err(|err| Rejection::Syntax(err.to_string()))?;

    check_structure(&module)
}

fn check_structure(module: &ParsedModule<'_>) -> Result<SuiteSummary, Rejection> {
    let mut summary = SuiteSummary::default();

    for statement in module.statements() {
        match statement {
            TopLevel::Import => summary.imports += 1,
            TopLevel::Function(function) if function.name.starts_with(TEST_PREFIX) => {
                summary.tests.push(function.name.to_string());
            }
            TopLevel::Function(function) if is_fixture(&function, module) => {
                summary.fixtures.push(function.name.to_string());
            }
            TopLevel::Function(function) => {
                return Err(Rejection::NonTestFunction(function.name.to_string()));
            }
            other => return Err(Rejection::DisallowedNode(other.kind_name())),
        }
    }

    if summary.tests.is_empty() {
        return Err(Rejection::NoTestFunction);
    }
    Ok(summary)
}

/// `@fixture`, `@pytest.fixture`, or either one called with arguments
fn is_fixture(function: &FunctionDef<'_>, module: &ParsedModule<'_>) -> bool {
    function.decorators.iter().any(|decorator| match decorator.kind() {
        "call" => decorator
            .child_by_field_name("function")
            .is_some_and(|callee| is_fixture_marker(callee, module)),
        _ => is_fixture_marker(*decorator, module),
    })
}

fn is_fixture_marker(node: Node<'_>, module: &ParsedModule<'_>) -> bool {
    match node.kind() {
        "identifier" => module.text(node) == FIXTURE_MARKER,
        "attribute" => {
            let object = node.child_by_field_name("object");
            let attribute = node.child_by_field_name("attribute");
            match (object, attribute) {
                (Some(object), Some(attribute)) => {
                    object.kind() == "identifier"
                        && module.text(object) == FRAMEWORK_MODULE
                        && module.text(attribute) == FIXTURE_MARKER
                }
                _ => false,
            }
        }
        _ => false,
    }
}
