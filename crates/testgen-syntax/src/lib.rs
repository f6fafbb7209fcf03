//! testgen Syntax Layer
//!
//! The structural core of testgen. Three independent, pure components:
//!
//! - **Extractor** ([`extract`]): accepts text that is exactly one top-level
//!   Python function (after an optional module docstring) and returns its
//!   verbatim source
//! - **Normalizer** ([`normalize`]): removes comments and the docstring
//!   without changing behavior
//! - **Validator** ([`validate`]): decides whether untrusted generated text is
//!   an acceptable pytest module, without ever running it
//!
//! # Architecture
//!
//! ```text
//! source ─→ extract ─→ FunctionSlice ─→ normalize ─→ NormalizedSource ─→ (generator)
//!                                                                           │
//!                                          Verdict ←─ validate ←─ candidate ┘
//! ```
//!
//! All parsing goes through tree-sitter-python. Nothing here performs I/O,
//! holds global state, or executes the code it inspects.
//!
//! # Example
//!
//! ```rust
//! use testgen_syntax::{extract, normalize, validate};
//!
//! let slice = extract("def add(a, b):\n    return a + b\n").unwrap();
//! let normalized = normalize(&slice);
//! assert_eq!(normalized.as_str(), "def add(a, b):\n    return a + b\n");
//!
//! let verdict = validate("def test_add():\n    assert add(1, 2) == 3\n");
//! assert!(verdict.accepted());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod extract;
pub mod normalize;
pub mod parser;
pub mod render;
pub mod statement;
pub mod tokens;
pub mod validate;

// Re-exports for convenience
pub use error::{ParseError, Rejected, SyntaxDiagnostic};
pub use extract::{extract, FunctionSlice};
pub use normalize::{normalize, strip_comments, strip_docstring, NormalizedSource};
pub use parser::ParsedModule;
pub use statement::{FunctionDef, TopLevel};
pub use tokens::{Token, TokenKind, Tokens};
pub use validate::{validate, validate_suite, Rejection, SuiteSummary, Verdict};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for the extraction/normalization/validation pipeline
    pub use crate::{extract, normalize, validate};
    pub use crate::{FunctionSlice, NormalizedSource, Rejected, Rejection, Verdict};
}
