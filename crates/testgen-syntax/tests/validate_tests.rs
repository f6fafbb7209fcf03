//! Validator Tests
//!
//! Acceptance grammar for generated pytest modules.

use testgen_syntax::{validate, validate_suite, Rejection};

#[test]
fn test_accepts_valid_pytest_tests() {
    let output = "\nimport pytest\n\ndef test_addition():\n    assert 1 + 1 == 2\n";
    let verdict = validate(output);
    assert!(verdict.accepted());
    assert_eq!(verdict.reason(), "");
}

#[test]
fn test_accepts_single_prefixed_test() {
    let verdict = validate("def test_add():\n    assert add(1, 2) == 3\n");
    assert!(verdict.accepted());
    assert!(verdict.reason().is_empty());
}

#[test]
fn test_accepts_parametrized_tests_and_fixtures() {
    let output = r#"
import pytest
from mod import clamp

@pytest.fixture(scope="module")
def bounds():
    return (0, 10)

@pytest.mark.parametrize("value,expected", [(-1, 0), (5, 5), (11, 10)])
def test_clamp(value, expected, bounds):
    low, high = bounds
    assert clamp(value, low, high) == expected

def test_clamp_raises_on_bad_bounds():
    with pytest.raises(ValueError):
        clamp(1, 10, 0)
"#;
    let summary = validate_suite(output).unwrap();
    assert_eq!(summary.tests, vec!["test_clamp", "test_clamp_raises_on_bad_bounds"]);
    assert_eq!(summary.fixtures, vec!["bounds"]);
}

#[test]
fn test_rejects_markdown_fences() {
    let output = "```python\ndef test_x():\n    assert True\n```";
    let verdict = validate(output);
    assert!(!verdict.accepted());
    assert!(verdict.reason().contains("markdown fences"));
}

#[test]
fn test_rejects_prose() {
    let output = "\nHere are tests for your function:\ndef test_x():\n    assert True\n";
    let verdict = validate(output);
    assert!(!verdict.accepted());
    assert!(verdict.reason().contains("prose"));
}

#[test]
fn test_every_preamble_is_prose() {
    for preamble in ["here are", "sure,", "certainly", "i can", "below is", "these tests", "explanation"] {
        let output = format!("{preamble} something\n");
        assert_eq!(validate_suite(&output), Err(Rejection::Prose), "{preamble}");
    }
}

#[test]
fn test_rejects_syntax_errors() {
    let output = "\ndef test_bad(\n    assert True\n";
    let verdict = validate(output);
    assert!(!verdict.accepted());
    assert!(verdict.reason().starts_with("syntax error: "));
}

#[test]
fn test_rejects_output_with_no_test_function() {
    let output = "\nimport pytest\n\n@pytest.fixture\ndef sample_data():\n    return 123\n";
    let verdict = validate(output);
    assert!(!verdict.accepted());
    assert_eq!(verdict.reason(), "no test function found");
}

#[test]
fn test_rejects_non_test_top_level_function() {
    let output = "\ndef add(a, b):\n    return a + b\n\ndef test_add():\n    assert add(1, 2) == 3\n";
    let verdict = validate(output);
    assert!(!verdict.accepted());
    assert_eq!(verdict.reason(), "non-test function not allowed: add");
}

#[test]
fn test_rejects_top_level_call() {
    let output = "import pytest\n\ndef test_x():\n    assert True\n\npytest.main()\n";
    assert_eq!(validate(output).reason(), "disallowed top-level node: Expr");
}

#[test]
fn test_rejects_main_guard() {
    let output = "def test_x():\n    assert True\n\nif __name__ == '__main__':\n    test_x()\n";
    assert_eq!(validate(output).reason(), "disallowed top-level node: If");
}

#[test]
fn test_prefix_is_case_sensitive() {
    let output = "def Test_upper():\n    assert True\n";
    assert_eq!(validate(output).reason(), "non-test function not allowed: Test_upper");
}

#[test]
fn test_adversarial_input_never_panics() {
    let deep = format!("def test_x():\n    assert {}1{}\n", "(".repeat(500), ")".repeat(500));
    let deep_literal = format!(
        "{}'x'{}\ndef test_x():\n    assert True\n",
        "(".repeat(50_000),
        ")".repeat(50_000)
    );
    let inputs = [
        deep_literal.as_str(),
        "\0\0\0",
        "def test_x():\n\tassert True\n        assert False\n",
        "\u{feff}def test_x():\n    assert True\n",
        "def test_ü():\n    assert 'ß'\n",
        deep.as_str(),
        "'''",
    ];
    for input in inputs {
        let verdict = validate(input);
        assert_eq!(verdict.accepted(), verdict.reason().is_empty());
    }
}

#[test]
fn test_rejects_positional_after_keyword_argument() {
    let verdict = validate("def test_x():\n    f(a=1, 2)\n");
    assert!(!verdict.accepted());
    assert_eq!(
        verdict.reason(),
        "syntax error: positional argument follows keyword argument (line 2, column 6)"
    );
}

#[test]
fn test_rejects_deleting_a_call() {
    let verdict = validate("def test_x():\n    del f()\n");
    assert!(!verdict.accepted());
    assert!(verdict.reason().contains("cannot delete function call"));
}

#[test]
fn test_rejects_nesting_beyond_tokenizer_limit() {
    let nested = |depth: usize| format!("def test_x():\n    assert {}1{}\n", "(".repeat(depth), ")".repeat(depth));
    assert!(validate(&nested(200)).accepted());

    let verdict = validate(&nested(50_000));
    assert!(!verdict.accepted());
    assert!(verdict.reason().contains("too many nested parentheses"));
}
