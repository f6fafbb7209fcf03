//! Pipeline Tests
//!
//! One-shot repair behavior end to end, with a scripted generator.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use testgen_core::{GenerationStage, Pipeline, PipelineError, USER_ERROR_MESSAGE};
use testgen_test_utils::{samples, Call, ScriptedGenerator};

async fn run(generator: &Arc<ScriptedGenerator>, source: &str) -> Result<testgen_core::GeneratedTests, PipelineError> {
    Pipeline::new(generator.clone()).run(source).await
}

#[tokio::test]
async fn test_repair_after_prose_is_accepted() {
    let generator = Arc::new(ScriptedGenerator::with_outputs([
        samples::PROSE_TESTS,
        samples::ACCEPTED_TESTS,
    ]));

    let tests = run(&generator, samples::SIMPLE_FUNCTION).await.unwrap();
    assert!(tests.repaired);
    assert_eq!(tests.code, samples::ACCEPTED_TESTS);

    assert_eq!(
        generator.calls(),
        vec![
            Call::Generate {
                source: samples::SIMPLE_FUNCTION.to_string()
            },
            Call::Repair {
                source: samples::SIMPLE_FUNCTION.to_string(),
                prior: samples::PROSE_TESTS.to_string(),
                reason: "output appears to contain prose".to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn test_repair_reason_names_offending_function() {
    let generator = Arc::new(ScriptedGenerator::with_outputs([
        samples::NON_TEST_FUNCTION_TESTS,
        samples::ACCEPTED_TESTS,
    ]));
    run(&generator, samples::SIMPLE_FUNCTION).await.unwrap();

    match &generator.calls()[1] {
        Call::Repair { reason, .. } => assert_eq!(reason, "non-test function not allowed: add"),
        other => panic!("expected repair, got {other:?}"),
    }
}

#[tokio::test]
async fn test_second_rejection_is_final() {
    let generator = Arc::new(ScriptedGenerator::with_outputs([
        samples::FENCED_TESTS,
        samples::PROSE_TESTS,
        samples::ACCEPTED_TESTS,
    ]));

    let err = run(&generator, samples::SIMPLE_FUNCTION).await.unwrap_err();
    assert!(matches!(&err, PipelineError::InvalidOutput { reason } if reason == "output appears to contain prose"));
    assert_eq!(err.user_message(), USER_ERROR_MESSAGE);

    // never a third call
    assert_eq!(generator.calls().len(), 2);
    assert_eq!(generator.remaining(), 1);
}

#[tokio::test]
async fn test_repair_failure_reports_repair_stage() {
    let generator = Arc::new(
        ScriptedGenerator::with_outputs(["def helper():\n    pass\n"]).then_fail("timeout"),
    );

    let err = run(&generator, samples::DECORATED_FUNCTION).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Generation {
            stage: GenerationStage::Repair,
            ..
        }
    ));
    assert!(!err.is_structural());
}

#[tokio::test]
async fn test_decorated_function_reaches_generator_with_decorator() {
    let generator = Arc::new(ScriptedGenerator::with_outputs([samples::ACCEPTED_TESTS]));
    run(&generator, samples::DECORATED_FUNCTION).await.unwrap();

    match &generator.calls()[0] {
        Call::Generate { source } => {
            assert!(source.starts_with("@functools.lru_cache(maxsize=None)\ndef fib(n):"));
        }
        other => panic!("expected generate, got {other:?}"),
    }
}

#[tokio::test]
async fn test_structural_rejection_uses_same_message() {
    let generator = Arc::new(ScriptedGenerator::new());
    let err = run(&generator, "class A:\n    pass\n").await.unwrap_err();
    assert!(err.is_structural());
    assert_eq!(err.user_message(), USER_ERROR_MESSAGE);
}
