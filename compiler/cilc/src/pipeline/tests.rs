use super::*;
use cil_eval::buffer_handler;
use pretty_assertions::assert_eq;

fn document(body: &str) -> String {
    format!(r#"{{"version": "coreil-1.10", "ambiguities": [], "body": {body}}}"#)
}

fn run_source(source: &str) -> (String, Result<(), PipelineError>) {
    let output = buffer_handler();
    let result = run(source, None, &RunOptions::default(), output.clone());
    (output.output(), result)
}

#[test]
fn runs_a_valid_document() {
    let source = document(
        r#"[
            {"type": "Let", "name": "x", "value": {"type": "Literal", "value": 5}},
            {"type": "Print", "args": [{"type": "Binary", "op": "+",
                "left": {"type": "Var", "name": "x"},
                "right": {"type": "Literal", "value": 1}}]}
        ]"#,
    );
    let (output, result) = run_source(&source);
    result.unwrap();
    assert_eq!(output, "6\n");
}

#[test]
fn rejected_documents_never_start_running() {
    let source = document(
        r#"[
            {"type": "Print", "args": [{"type": "Literal", "value": "side effect"}]},
            {"type": "Print", "args": [{"type": "Var", "name": "nope"}]}
        ]"#,
    );
    let (output, result) = run_source(&source);
    assert_eq!(output, "");
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(
        err.to_string(),
        "$.body[1].args[0]: variable 'nope' used before definition"
    );
}

#[test]
fn undecodable_json_is_a_validation_failure() {
    let err = check("{not json", None).unwrap_err();
    assert!(matches!(err, PipelineError::Json(_)));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().starts_with("invalid JSON: "));
}

#[test]
fn runtime_errors_keep_their_kind() {
    let source = document(
        r#"[
            {"type": "Print", "args": [{"type": "Literal", "value": "first"}]},
            {"type": "Print", "args": [{"type": "Binary", "op": "%",
                "left": {"type": "Literal", "value": 1},
                "right": {"type": "Literal", "value": 0}}]}
        ]"#,
    );
    let (output, result) = run_source(&source);
    assert_eq!(output, "first\n");
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Division);
    assert_eq!(err.to_string(), "modulo by zero");
}

#[test]
fn lowered_output_has_no_sugared_loops() {
    let source = document(
        r#"[{"type": "For", "var": "i",
            "iter": {"type": "Range", "from": {"type": "Literal", "value": 0},
                     "to": {"type": "Literal", "value": 2}},
            "body": [{"type": "Print", "args": [{"type": "Var", "name": "i"}]}]}]"#,
    );
    let lowered = lower(&source, None).unwrap();
    assert!(!lowered.contains("\"For\""));
    assert!(lowered.contains("\"While\""));
    assert!(lowered.contains("\"update\""));

    // The lowered text is itself a valid document that runs the same way.
    let (output, result) = run_source(&lowered);
    result.unwrap();
    assert_eq!(output, "0\n1\n");
}
