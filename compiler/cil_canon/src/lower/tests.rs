use super::*;
use cil_ir::parse_document;
use pretty_assertions::assert_eq;
use serde_json::{json, Value as Json};

fn doc(body: Json) -> Document {
    parse_document(&json!({ "version": "coreil-1.10", "body": body })).unwrap()
}

fn lit(value: Json) -> Json {
    json!({ "type": "Literal", "value": value })
}

fn var(name: &str) -> Json {
    json!({ "type": "Var", "name": name })
}

fn body_json(doc: &Document) -> Json {
    serde_json::to_value(&doc.body).unwrap()
}

#[test]
fn counted_loop_becomes_while_with_update() {
    let lowered = lower(doc(json!([
        { "type": "For", "var": "i",
          "iter": { "type": "Range", "from": lit(json!(0)), "to": lit(json!(3)) },
          "body": [{ "type": "Print", "args": [var("i")] }] },
    ])));
    assert_eq!(
        body_json(&lowered),
        json!([
            { "type": "Let", "name": "__for_i0", "value": lit(json!(0)) },
            { "type": "Let", "name": "__for_end0", "value": lit(json!(3)) },
            { "type": "While",
              "test": { "type": "Binary", "op": "<", "left": var("__for_i0"), "right": var("__for_end0") },
              "body": [
                  { "type": "Let", "name": "i", "value": var("__for_i0") },
                  { "type": "Print", "args": [var("i")] },
              ],
              "update": [
                  { "type": "Assign", "name": "__for_i0",
                    "value": { "type": "Binary", "op": "+", "left": var("__for_i0"), "right": lit(json!(1)) } },
              ] },
        ])
    );
}

#[test]
fn inclusive_range_compares_with_lt_eq() {
    let lowered = lower(doc(json!([
        { "type": "For", "var": "i",
          "iter": { "type": "Range", "from": lit(json!(1)), "to": lit(json!(2)), "inclusive": true },
          "body": [] },
    ])));
    let Stmt::While { test, .. } = &lowered.body[2] else {
        panic!("expected While, got {:?}", lowered.body[2]);
    };
    assert_eq!(
        *test,
        Expr::binary(BinaryOp::LtEq, Expr::var("__for_i0"), Expr::var("__for_end0"))
    );
}

#[test]
fn collection_loop_indexes_a_single_evaluation() {
    let lowered = lower(doc(json!([
        { "type": "ForEach", "var": "x",
          "iter": { "type": "Array", "items": [lit(json!(10))] },
          "body": [{ "type": "Continue" }] },
    ])));
    assert_eq!(
        body_json(&lowered),
        json!([
            { "type": "Let", "name": "__each_seq0",
              "value": { "type": "Array", "items": [lit(json!(10))] } },
            { "type": "Let", "name": "__each_idx0", "value": lit(json!(0)) },
            { "type": "While",
              "test": { "type": "Binary", "op": "<", "left": var("__each_idx0"),
                        "right": { "type": "Length", "base": var("__each_seq0") } },
              "body": [
                  { "type": "Let", "name": "x",
                    "value": { "type": "Index", "base": var("__each_seq0"), "index": var("__each_idx0") } },
                  { "type": "Continue" },
              ],
              "update": [
                  { "type": "Assign", "name": "__each_idx0",
                    "value": { "type": "Binary", "op": "+", "left": var("__each_idx0"), "right": lit(json!(1)) } },
              ] },
        ])
    );
}

#[test]
fn lowering_reaches_every_nested_block() {
    let each = |v: &str| {
        json!({ "type": "ForEach", "var": v, "iter": { "type": "Array", "items": [] }, "body": [] })
    };
    let lowered = lower(doc(json!([
        { "type": "FuncDef", "name": "f", "params": [], "body": [each("a")] },
        { "type": "If", "test": lit(json!(true)), "then": [each("b")], "else": [each("c")] },
        { "type": "TryCatch", "body": [each("d")], "catch_var": "e",
          "catch_body": [each("f")], "finally_body": [each("g")] },
        { "type": "Switch", "test": lit(json!(1)),
          "cases": [{ "value": lit(json!(1)), "body": [each("h")] }], "default": [each("i")] },
        { "type": "While", "test": lit(json!(false)), "body": [each("j")] },
    ])));
    let text = body_json(&lowered).to_string();
    assert!(!text.contains("\"ForEach\""), "{text}");
    assert!(!text.contains("\"For\""), "{text}");
    assert_eq!(text.matches("\"__each_seq").count(), 9 * 3);
}

#[test]
fn nested_loops_get_distinct_temporaries() {
    let lowered = lower(doc(json!([
        { "type": "For", "var": "i",
          "iter": { "type": "Range", "from": lit(json!(0)), "to": lit(json!(2)) },
          "body": [
              { "type": "For", "var": "j",
                "iter": { "type": "Range", "from": lit(json!(0)), "to": var("i") },
                "body": [] },
          ] },
    ])));
    let text = body_json(&lowered).to_string();
    assert!(text.contains("__for_i0"));
    assert!(text.contains("__for_i1"));
    assert!(text.contains("__for_end1"));
}

#[test]
fn temporaries_avoid_document_names() {
    let lowered = lower(doc(json!([
        { "type": "Let", "name": "__for_i0", "value": lit(json!(7)) },
        { "type": "For", "var": "k",
          "iter": { "type": "Range", "from": lit(json!(0)), "to": var("__for_i0") },
          "body": [] },
    ])));
    let Stmt::Let { name, .. } = &lowered.body[1] else {
        panic!("expected Let, got {:?}", lowered.body[1]);
    };
    assert_eq!(name, "__for_i1");
}

#[test]
fn lowering_is_idempotent() {
    let once = lower(doc(json!([
        { "type": "ForEach", "var": "x", "iter": { "type": "Array", "items": [] },
          "body": [{ "type": "Print", "args": [var("x")] }] },
    ])));
    let twice = lower(once.clone());
    assert_eq!(once, twice);
}

#[test]
fn lowered_document_still_validates() {
    let source = json!({
        "version": "coreil-1.10",
        "body": [
            { "type": "Let", "name": "total", "value": lit(json!(0)) },
            { "type": "For", "var": "i",
              "iter": { "type": "Range", "from": lit(json!(0)), "to": lit(json!(3)) },
              "body": [
                  { "type": "If", "test": { "type": "Binary", "op": "==", "left": var("i"), "right": lit(json!(1)) },
                    "then": [{ "type": "Continue" }] },
                  { "type": "Assign", "name": "total",
                    "value": { "type": "Binary", "op": "+", "left": var("total"), "right": var("i") } },
              ] },
            { "type": "ForEach", "var": "c", "iter": lit(json!("ab")),
              "body": [{ "type": "Break" }] },
        ],
    });
    assert_eq!(cil_validate::validate(&source), vec![]);

    let lowered = lower(parse_document(&source).unwrap());
    let json = serde_json::to_value(&lowered).unwrap();
    assert_eq!(cil_validate::validate(&json), vec![]);
}

#[test]
fn other_fields_pass_through() {
    let mut source = doc(json!([{ "type": "Print", "args": [lit(json!("hi"))] }]));
    source.ambiguities = json!([{ "question": "q", "options": ["a"], "default": 0 }]);
    let lowered = lower(source.clone());
    assert_eq!(lowered, source);
}
