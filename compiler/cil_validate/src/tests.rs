use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;

fn doc(version: &str, body: Json) -> Json {
    json!({ "version": version, "ambiguities": [], "body": body })
}

fn lit(value: Json) -> Json {
    json!({ "type": "Literal", "value": value })
}

fn var(name: &str) -> Json {
    json!({ "type": "Var", "name": name })
}

fn messages(doc: &Json) -> Vec<(String, String)> {
    validate(doc)
        .into_iter()
        .map(|v| (v.path, v.message))
        .collect()
}

fn one(path: &str, message: &str) -> Vec<(String, String)> {
    vec![(path.to_string(), message.to_string())]
}

#[test]
fn accepts_well_formed_document() {
    let d = doc(
        "coreil-1.10",
        json!([
            { "type": "Let", "name": "x", "value": lit(json!(5)) },
            { "type": "Print", "args": [
                { "type": "Binary", "op": "+", "left": var("x"), "right": lit(json!(1)) }
            ]},
        ]),
    );
    assert_eq!(validate(&d), vec![]);
    assert!(check(&d).is_ok());
}

#[test]
fn document_envelope() {
    assert_eq!(messages(&json!([])), one("$", "document must be an object"));

    let d = json!({ "version": "coreil-0.1", "body": {} });
    assert_eq!(messages(&d), one("$.body", "body must be a list"));

    let d = json!({ "version": "coreil-2.0", "body": [] });
    let got = messages(&d);
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].0, "$.version");
    assert!(got[0].1.starts_with("version must be one of: 'coreil-0.1', "));
    assert!(got[0].1.ends_with("'coreil-1.10.5'"));
}

#[test]
fn ambiguity_entries() {
    let d = json!({
        "version": "coreil-1.0",
        "ambiguities": [
            { "question": "which?", "options": ["a", "b"], "default": 1 },
            { "question": "", "options": ["a", ""], "default": 2 },
            3,
        ],
        "body": [],
    });
    assert_eq!(
        messages(&d),
        vec![
            ("$.ambiguities[1].question".into(), "missing or invalid question".into()),
            ("$.ambiguities[1].options[1]".into(), "option must be a non-empty string".into()),
            ("$.ambiguities[1].default".into(), "default must be a valid option index".into()),
            ("$.ambiguities[2]".into(), "ambiguity item must be an object".into()),
        ]
    );
}

#[test]
fn node_shape_errors() {
    let d = doc("coreil-1.10", json!([5, { "name": "x" }, { "type": "Frobnicate" }]));
    assert_eq!(
        messages(&d),
        vec![
            ("$.body[0]".into(), "node must be an object".into()),
            ("$.body[1].type".into(), "missing type".into()),
            ("$.body[2].type".into(), "unknown type 'Frobnicate'".into()),
        ]
    );
}

#[test]
fn role_mismatches() {
    let d = doc(
        "coreil-1.10",
        json!([
            { "type": "Print", "args": [{ "type": "Break" }] },
            { "type": "Literal", "value": 1 },
        ]),
    );
    assert_eq!(
        messages(&d),
        vec![
            ("$.body[0].args[0]".into(), "unexpected expression type 'Break'".into()),
            ("$.body[1]".into(), "unexpected statement type 'Literal'".into()),
        ]
    );
}

#[test]
fn dual_role_set_is_split_by_fields() {
    let d = doc(
        "coreil-1.10",
        json!([
            { "type": "Let", "name": "m", "value": { "type": "Map", "items": [] } },
            { "type": "Set", "base": var("m"), "key": lit(json!("k")), "value": lit(json!(1)) },
            { "type": "Let", "name": "s", "value": { "type": "Set", "items": [lit(json!(1))] } },
            { "type": "Set", "items": [] },
            { "type": "Print", "args": [
                { "type": "Set", "base": var("m"), "key": lit(json!(1)), "value": lit(json!(1)) }
            ]},
        ]),
    );
    assert_eq!(
        messages(&d),
        vec![
            ("$.body[3]".into(), "'Set' with items is an expression, not a statement".into()),
            ("$.body[4].args[0]".into(), "'Set' with base is a statement, not an expression".into()),
        ]
    );
}

#[test]
fn version_gating() {
    let d = doc(
        "coreil-1.0",
        json!([
            { "type": "Let", "name": "s", "value": { "type": "Set", "items": [] } },
            { "type": "Let", "name": "m", "value": { "type": "Map", "items": [] } },
            { "type": "Set", "base": var("m"), "key": lit(json!(1)), "value": lit(json!(2)) },
        ]),
    );
    assert_eq!(
        messages(&d),
        one("$.body[0].value", "'Set' requires coreil-1.1 or later")
    );

    let d = doc("coreil-1.9", json!([{ "type": "Switch", "test": lit(json!(1)), "cases": [] }]));
    assert_eq!(messages(&d), one("$.body[0]", "'Switch' requires coreil-1.10 or later"));
}

#[test]
fn unsupported_version_skips_gating() {
    let d = json!({
        "version": "coreil-9",
        "body": [{ "type": "Switch", "test": lit(json!(1)), "cases": [] }],
    });
    let got = messages(&d);
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].0, "$.version");
}

#[test]
fn use_before_definition() {
    let d = doc(
        "coreil-1.10",
        json!([
            { "type": "Print", "args": [var("y")] },
            { "type": "Let", "name": "x", "value": var("x") },
            { "type": "Let", "name": "y", "value": lit(json!(1)) },
        ]),
    );
    assert_eq!(
        messages(&d),
        vec![
            ("$.body[0].args[0]".into(), "variable 'y' used before definition".into()),
            ("$.body[1].value".into(), "variable 'x' used before definition".into()),
        ]
    );
}

#[test]
fn params_are_scoped_to_the_function_body() {
    let d = doc(
        "coreil-1.10",
        json!([
            { "type": "FuncDef", "name": "f", "params": ["a"], "body": [
                { "type": "Return", "value": var("a") }
            ]},
            { "type": "Print", "args": [var("a")] },
        ]),
    );
    assert_eq!(
        messages(&d),
        one("$.body[1].args[0]", "variable 'a' used before definition")
    );
}

#[test]
fn binders_cover_the_following_blocks() {
    let d = doc(
        "coreil-1.10",
        json!([
            { "type": "For", "var": "i",
              "iter": { "type": "Range", "from": lit(json!(0)), "to": lit(json!(3)) },
              "body": [{ "type": "Print", "args": [var("i")] }] },
            { "type": "TryCatch",
              "body": [{ "type": "Throw", "message": lit(json!("boom")) }],
              "catch_var": "e",
              "catch_body": [{ "type": "Print", "args": [var("e")] }] },
            { "type": "Let", "name": "d", "value": { "type": "DequeNew" } },
            { "type": "PushBack", "base": var("d"), "value": lit(json!(1)) },
            { "type": "PopFront", "base": var("d"), "target": "first" },
            { "type": "Print", "args": [var("first")] },
        ]),
    );
    assert_eq!(validate(&d), vec![]);
}

#[test]
fn context_rules() {
    let d = doc(
        "coreil-1.10",
        json!([
            { "type": "Return" },
            { "type": "Break" },
            { "type": "While", "test": lit(json!(true)),
              "body": [{ "type": "If", "test": lit(json!(true)), "then": [{ "type": "Continue" }] }],
              "update": [{ "type": "Break" }] },
            { "type": "While", "test": lit(json!(true)), "body": [
                { "type": "FuncDef", "name": "g", "params": [], "body": [{ "type": "Break" }] }
            ]},
        ]),
    );
    assert_eq!(
        messages(&d),
        vec![
            ("$.body[0]".into(), "Return is only allowed inside FuncDef".into()),
            ("$.body[1]".into(), "Break is only allowed inside a loop".into()),
            ("$.body[2].update[0]".into(), "Break is only allowed inside a loop".into()),
            ("$.body[3].body[0].body[0]".into(), "Break is only allowed inside a loop".into()),
        ]
    );
}

#[test]
fn calls_are_checked_against_the_whole_document() {
    let d = doc(
        "coreil-1.10",
        json!([
            { "type": "Call", "name": "later", "args": [lit(json!(1))] },
            { "type": "Call", "name": "later", "args": [] },
            { "type": "Call", "name": "missing", "args": [] },
            { "type": "FuncDef", "name": "later", "params": ["x"], "body": [] },
        ]),
    );
    assert_eq!(
        messages(&d),
        vec![
            ("$.body[1]".into(), "function 'later' expects 1 argument(s), got 0".into()),
            ("$.body[2]".into(), "call to undefined function 'missing'".into()),
        ]
    );
}

#[test]
fn sealed_documents_reject_helper_calls() {
    let body = json!([
        { "type": "FuncDef", "name": "keys", "params": [], "body": [] },
        { "type": "Call", "name": "keys", "args": [] },
    ]);
    assert_eq!(validate(&doc("coreil-0.4", body.clone())), vec![]);
    assert_eq!(
        messages(&doc("coreil-0.5", body)),
        one(
            "$.body[1].name",
            "helper function 'keys' is not allowed in v0.5; use explicit primitives (GetDefault, Keys, Push, Tuple)"
        )
    );
}

#[test]
fn literal_indices() {
    let index = |i: Json| {
        json!([
            { "type": "Let", "name": "a", "value": { "type": "Array", "items": [] } },
            { "type": "Print", "args": [{ "type": "Index", "base": var("a"), "index": lit(i) }] },
        ])
    };
    assert_eq!(
        messages(&doc("coreil-1.4", index(json!(-1)))),
        one("$.body[1].args[0].index", "index must be a non-negative integer")
    );
    assert_eq!(validate(&doc("coreil-1.5", index(json!(-1)))), vec![]);
    assert_eq!(
        messages(&doc("coreil-1.5", index(json!("0")))),
        one("$.body[1].args[0].index", "index must be an integer")
    );
    assert_eq!(
        messages(&doc("coreil-1.5", index(json!(true)))),
        one("$.body[1].args[0].index", "index must be an integer")
    );
}

#[test]
fn field_shapes() {
    let d = doc(
        "coreil-1.10",
        json!([
            { "type": "Let", "name": "" , "value": lit(json!(1)) },
            { "type": "If", "test": lit(json!(true)), "then": [], "else": 3 },
            { "type": "Print", "args": [{ "type": "Binary", "op": "**", "left": lit(json!(1)) }] },
            { "type": "FuncDef", "name": "f", "params": ["ok", 7], "body": [] },
            { "type": "Print", "args": [{ "type": "Literal", "value": [1] }] },
            { "type": "Print", "args": [{ "type": "Map", "items": [1] }] },
            { "type": "Print", "args": [{ "type": "Record", "fields": [{ "value": lit(json!(1)) }] }] },
        ]),
    );
    assert_eq!(
        messages(&d),
        vec![
            ("$.body[0].name".into(), "missing or invalid name".into()),
            ("$.body[1].else".into(), "invalid else".into()),
            ("$.body[2].args[0].op".into(), "missing or invalid op".into()),
            ("$.body[2].args[0].right".into(), "missing right".into()),
            ("$.body[3].params[1]".into(), "param must be a non-empty string".into()),
            (
                "$.body[4].args[0].value".into(),
                "literal value must be null, a boolean, a number, or a string".into()
            ),
            ("$.body[5].args[0].items[0]".into(), "item must be an object".into()),
            ("$.body[6].args[0].fields[0].name".into(), "missing or invalid field name".into()),
        ]
    );
}

#[test]
fn range_placement() {
    let range = json!({ "type": "Range", "from": lit(json!(0)), "to": lit(json!(1)) });
    let d = doc(
        "coreil-1.10",
        json!([
            { "type": "Print", "args": [range] },
            { "type": "For", "var": "i", "iter": { "type": "Array", "items": [] }, "body": [] },
            { "type": "For", "var": "i",
              "iter": { "type": "Range", "from": lit(json!(0)), "to": lit(json!(1)), "inclusive": 1 },
              "body": [] },
        ]),
    );
    assert_eq!(
        messages(&d),
        vec![
            ("$.body[0].args[0]".into(), "Range is only allowed as a For iter".into()),
            ("$.body[1].iter".into(), "For iter must be a Range".into()),
            ("$.body[2].iter.inclusive".into(), "inclusive must be a boolean".into()),
        ]
    );
}

#[test]
fn switch_cases() {
    let d = doc(
        "coreil-1.10",
        json!([
            { "type": "Switch", "test": lit(json!(1)), "cases": [
                { "value": lit(json!(1)), "body": [{ "type": "Break" }] },
                { "value": var("x"), "body": [] },
                "nope",
            ], "default": [] },
        ]),
    );
    assert_eq!(
        messages(&d),
        vec![
            ("$.body[0].cases[0].body[0]".into(), "Break is only allowed inside a loop".into()),
            ("$.body[0].cases[1].value".into(), "case value must be a Literal".into()),
            ("$.body[0].cases[2]".into(), "case must be an object".into()),
        ]
    );
}

#[test]
fn regex_nodes_take_optional_flags() {
    let s = || lit(json!("a,b"));
    let p = || lit(json!(","));
    let body = json!([{ "type": "Print", "args": [
        { "type": "RegexMatch", "string": s(), "pattern": p() },
        { "type": "RegexFindAll", "string": s(), "pattern": p(), "flags": lit(json!("i")) },
        { "type": "RegexReplace", "string": s(), "pattern": p(), "replacement": lit(json!(";")) },
        { "type": "RegexSplit", "string": s(), "pattern": p(), "maxsplit": lit(json!(1)) },
    ]}]);
    assert_eq!(validate(&doc("coreil-1.3", body.clone())), vec![]);
    assert_eq!(
        messages(&doc("coreil-1.2", body))[0],
        ("$.body[0].args[0]".to_string(), "'RegexMatch' requires coreil-1.3 or later".to_string())
    );

    let missing = json!([{ "type": "Print", "args": [
        { "type": "RegexReplace", "string": s(), "pattern": p() },
    ]}]);
    assert_eq!(
        messages(&doc("coreil-1.3", missing)),
        one("$.body[0].args[0].replacement", "missing replacement")
    );
}

#[test]
fn imports_are_top_level_with_dotted_paths() {
    let body = json!([
        { "type": "Import", "path": "lib.math_helpers" },
        { "type": "Import", "path": "utils", "alias": "u" },
        { "type": "Print", "args": [
            { "type": "Call", "name": "math_helpers.square", "args": [lit(json!(3))] },
            { "type": "Call", "name": "u.anything", "args": [] },
        ]},
    ]);
    assert_eq!(validate(&doc("coreil-1.10.5", body.clone())), vec![]);
    assert_eq!(
        messages(&doc("coreil-1.10", body)),
        vec![
            ("$.body[0]".to_string(), "'Import' requires coreil-1.10.5 or later".to_string()),
            ("$.body[1]".to_string(), "'Import' requires coreil-1.10.5 or later".to_string()),
        ]
    );

    let bad = json!([
        { "type": "Import", "path": "lib..math" },
        { "type": "Import", "path": "utils", "alias": "u.v" },
        { "type": "If", "test": lit(json!(true)), "then": [{ "type": "Import", "path": "utils" }] },
        { "type": "Call", "name": "other.f", "args": [] },
    ]);
    assert_eq!(
        messages(&doc("coreil-1.10.5", bad)),
        vec![
            ("$.body[0].path".to_string(), "missing or invalid path".to_string()),
            ("$.body[1].alias".to_string(), "invalid alias".to_string()),
            ("$.body[2].then[0]".to_string(), "Import is only allowed at the top level".to_string()),
            ("$.body[3]".to_string(), "call to undefined function 'other.f'".to_string()),
        ]
    );
}

#[test]
fn violations_error_reports_count() {
    let err = check(&json!({ "version": "nope", "body": 1 })).unwrap_err();
    assert_eq!(err.to_string(), "document rejected with 2 violation(s)");
    assert_eq!(err.first().map(|v| v.path.as_str()), Some("$.version"));
    assert_eq!(err.iter().count(), 2);
}
