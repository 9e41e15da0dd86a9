use super::collections::{index, join, length, slice};
use super::convert::{to_float, to_int, to_string};
use super::json::{parse, stringify};
use super::maps::{get, get_field, insert, keys, set_add, set_remove, set_size};
use super::numeric::{constant, math, pow};
use super::queues::{deque_pop, deque_push, heap_pop, heap_push, End};
use super::regex::{find_all, is_match, replace as regex_replace, split as regex_split};
use super::strings::{char_at_index, replace, split, string_length, substring};
use super::{resolve_index, slice_bounds};
use cil_ir::{MathConst, MathOp};
use cil_value::{EvalResult, OrderedMap, OrderedSet, Record, Value};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn int(n: i64) -> Value {
    Value::Int(n)
}

fn s(text: &str) -> Value {
    Value::string(text)
}

fn list(items: Vec<Value>) -> Value {
    Value::array(items)
}

fn shown(result: EvalResult) -> String {
    match result {
        Ok(v) => v.repr(),
        Err(e) => e.to_string(),
    }
}

// Sequences

#[test]
fn negative_indices_count_from_the_end() {
    let xs = list(vec![int(10), int(20), int(30)]);
    assert_eq!(shown(index(&xs, &int(-1))), "30");
    assert_eq!(shown(index(&xs, &int(-3))), "10");
    assert_eq!(
        shown(index(&xs, &int(-4))),
        "IndexError: index -4 out of range for length 3"
    );
    assert_eq!(
        shown(index(&xs, &int(3))),
        "IndexError: index 3 out of range for length 3"
    );
}

#[test]
fn bool_is_not_an_index() {
    let xs = list(vec![int(1)]);
    assert_eq!(
        shown(index(&xs, &Value::Bool(false))),
        "TypeError: Index expects an int, got bool"
    );
}

#[test]
fn slices_clamp_and_accept_open_bounds() {
    let xs = list(vec![int(1), int(2), int(3), int(4)]);
    assert_eq!(shown(slice(&xs, &int(1), &int(3))), "[2, 3]");
    assert_eq!(shown(slice(&xs, &int(-2), &Value::Null)), "[3, 4]");
    assert_eq!(shown(slice(&xs, &Value::Null, &int(100))), "[1, 2, 3, 4]");
    assert_eq!(shown(slice(&xs, &int(3), &int(1))), "[]");
    assert_eq!(shown(slice(&s("hello"), &int(1), &int(-1))), "'ell'");
    let pair = Value::tuple(vec![int(1), int(2)]);
    assert_eq!(shown(slice(&pair, &int(1), &Value::Null)), "(2,)");
}

#[test]
fn slices_are_copies() {
    let xs = list(vec![int(1), int(2)]);
    let copy = slice(&xs, &Value::Null, &Value::Null).unwrap();
    let Value::Array(items) = &copy else {
        panic!("expected a list");
    };
    items.borrow_mut().push(int(3));
    assert_eq!(xs.repr(), "[1, 2]");
}

#[test]
fn length_counts_characters_and_entries() {
    assert_eq!(shown(length(&s("héllo"))), "5");
    assert_eq!(shown(length(&Value::heap())), "0");
    assert_eq!(
        shown(length(&int(3))),
        "TypeError: Length expects a collection or str, got int"
    );
}

#[test]
fn join_formats_items_like_print() {
    let xs = list(vec![int(1), s("a"), Value::Null, Value::Float(2.0)]);
    assert_eq!(shown(join(&s(", "), &xs)), "'1, a, None, 2.0'");
}

// Text

#[test]
fn substring_clamps_but_char_at_does_not() {
    assert_eq!(shown(substring(&s("héllo"), &int(1), &int(3))), "'él'");
    assert_eq!(shown(substring(&s("abc"), &int(-10), &int(10))), "'abc'");
    assert_eq!(shown(char_at_index(&s("abc"), &int(-1))), "'c'");
    assert_eq!(
        shown(char_at_index(&s("abc"), &int(3))),
        "IndexError: index 3 out of range for length 3"
    );
}

#[test]
fn split_keeps_empty_fields() {
    assert_eq!(
        shown(split(&s("a,b,,c"), &s(","))),
        "['a', 'b', '', 'c']"
    );
    assert_eq!(
        shown(split(&s("abc"), &s(""))),
        "ValueError: empty separator"
    );
}

#[test]
fn replace_is_global() {
    assert_eq!(shown(replace(&s("a-b-c"), &s("-"), &s("+"))), "'a+b+c'");
    assert_eq!(shown(string_length(&s(""))), "0");
}

// Regular expressions

#[test]
fn regex_match_searches_anywhere() {
    assert_eq!(shown(is_match(&s("Hello World"), &s("wor"), None)), "False");
    assert_eq!(shown(is_match(&s("Hello World"), &s("wor"), Some(&s("i")))), "True");
    assert_eq!(shown(is_match(&s("a\nb"), &s("^b$"), Some(&s("m")))), "True");
    assert_eq!(shown(is_match(&s("a\nb"), &s("a.b"), Some(&Value::Null))), "False");
    assert_eq!(shown(is_match(&s("a\nb"), &s("a.b"), Some(&s("s")))), "True");
}

#[test]
fn find_all_collects_groups_when_present() {
    assert_eq!(
        shown(find_all(&s("a1b22c333"), &s("[0-9]+"), None)),
        "['1', '22', '333']"
    );
    assert_eq!(shown(find_all(&s("a1b2"), &s("([a-z])[0-9]"), None)), "['a', 'b']");
    assert_eq!(
        shown(find_all(&s("a=1 b=2"), &s("(\\w)=(\\d)"), None)),
        "[('a', '1'), ('b', '2')]"
    );
    assert_eq!(shown(find_all(&s("abc"), &s("x"), None)), "[]");
}

#[test]
fn regex_replace_is_global_and_literal() {
    assert_eq!(shown(regex_replace(&s("a1b22"), &s("[0-9]+"), &s("#"), None)), "'a#b#'");
    assert_eq!(shown(regex_replace(&s("ab"), &s("(a)"), &s("$1"), None)), "'$1b'");
    assert_eq!(
        shown(regex_replace(&s("Cat cat"), &s("cat"), &s("dog"), Some(&s("i")))),
        "'dog dog'"
    );
}

#[test]
fn regex_split_honours_maxsplit_and_groups() {
    let text = s("a, b,c");
    let sep = s(",\\s*");
    assert_eq!(shown(regex_split(&text, &sep, None, None)), "['a', 'b', 'c']");
    assert_eq!(shown(regex_split(&text, &sep, None, Some(&int(1)))), "['a', 'b,c']");
    assert_eq!(shown(regex_split(&text, &sep, None, Some(&int(0)))), "['a', 'b', 'c']");
    assert_eq!(shown(regex_split(&text, &sep, None, Some(&int(-1)))), "['a, b,c']");
    assert_eq!(shown(regex_split(&s("a,b"), &s("(,)"), None, None)), "['a', ',', 'b']");
    assert_eq!(shown(regex_split(&s(",a"), &s(","), None, None)), "['', 'a']");
}

#[test]
fn regex_errors() {
    let bad = shown(is_match(&s("x"), &s("a("), None));
    assert!(bad.starts_with("ValueError: invalid regex pattern 'a(': "), "{bad}");
    assert!(!bad.contains('\n'), "{bad}");
    assert_eq!(
        shown(is_match(&s("x"), &s("x"), Some(&s("iq")))),
        "ValueError: unknown regex flag 'q'"
    );
    assert_eq!(
        shown(is_match(&int(1), &s("x"), None)),
        "TypeError: RegexMatch expects a str, got int"
    );
    assert_eq!(
        shown(regex_split(&s("a"), &s(","), None, Some(&s("1")))),
        "TypeError: RegexSplit expects an int, got str"
    );
}

// Numbers

#[test]
fn floor_and_ceil_produce_ints() {
    assert_eq!(shown(math(MathOp::Floor, &Value::Float(-2.5))), "-3");
    assert_eq!(shown(math(MathOp::Ceil, &Value::Float(2.1))), "3");
    assert_eq!(shown(math(MathOp::Floor, &int(7))), "7");
    assert_eq!(
        shown(math(MathOp::Floor, &Value::Float(f64::INFINITY))),
        "OverflowError: cannot convert float infinity to integer"
    );
    assert_eq!(
        shown(math(MathOp::Ceil, &Value::Float(f64::NAN))),
        "ValueError: cannot convert float NaN to integer"
    );
}

#[test]
fn abs_keeps_the_operand_type() {
    assert_eq!(shown(math(MathOp::Abs, &int(-4))), "4");
    assert_eq!(shown(math(MathOp::Abs, &Value::Float(-2.5))), "2.5");
    assert_eq!(
        shown(math(MathOp::Abs, &int(i64::MIN))),
        "OverflowError: integer overflow in abs"
    );
}

#[test]
fn domain_and_range_errors() {
    assert_eq!(
        shown(math(MathOp::Sqrt, &int(-1))),
        "ValueError: math domain error"
    );
    assert_eq!(
        shown(math(MathOp::Log, &int(0))),
        "ValueError: math domain error"
    );
    assert_eq!(
        shown(math(MathOp::Exp, &int(1000))),
        "OverflowError: math range error"
    );
    assert_eq!(shown(math(MathOp::Sqrt, &int(16))), "4.0");
    assert_eq!(
        shown(math(MathOp::Log, &s("1"))),
        "TypeError: Math expects a number, got str"
    );
}

#[test]
fn pow_stays_exact_for_int_operands() {
    assert_eq!(shown(pow(&int(2), &int(10))), "1024");
    assert_eq!(shown(pow(&int(2), &int(-1))), "0.5");
    assert_eq!(
        shown(pow(&int(2), &int(63))),
        "OverflowError: integer overflow in power"
    );
    assert_eq!(shown(pow(&int(1), &int(1 << 40))), "1");
    assert_eq!(shown(pow(&int(-1), &int((1 << 33) + 1))), "-1");
}

#[test]
fn pow_float_edge_cases() {
    assert_eq!(
        shown(pow(&Value::Float(0.0), &int(-1))),
        "DivisionError: 0.0 cannot be raised to a negative power"
    );
    assert_eq!(
        shown(pow(&int(-8), &Value::Float(0.5))),
        "ValueError: math domain error"
    );
    assert_eq!(
        shown(pow(&Value::Float(10.0), &int(400))),
        "OverflowError: math range error"
    );
    assert_eq!(shown(pow(&Value::Float(2.0), &int(3))), "8.0");
}

#[test]
fn constants() {
    assert_eq!(constant(MathConst::Pi).repr(), "3.141592653589793");
    assert_eq!(constant(MathConst::E).repr(), "2.718281828459045");
}

// Conversions

#[test]
fn to_int_truncates_and_parses() {
    assert_eq!(shown(to_int(&Value::Float(-3.9))), "-3");
    assert_eq!(shown(to_int(&s(" 42 "))), "42");
    assert_eq!(shown(to_int(&s("-1_000"))), "-1000");
    assert_eq!(
        shown(to_int(&s("4.5"))),
        "ValueError: invalid literal for int() with base 10: '4.5'"
    );
    assert_eq!(
        shown(to_int(&s("99999999999999999999"))),
        "OverflowError: integer overflow in int()"
    );
    assert_eq!(
        shown(to_int(&Value::Bool(true))),
        "TypeError: ToInt expects a number or str, got bool"
    );
}

#[test]
fn to_float_parses_text() {
    assert_eq!(shown(to_float(&s("2.5"))), "2.5");
    assert_eq!(shown(to_float(&int(3))), "3.0");
    assert_eq!(
        shown(to_float(&s("abc"))),
        "ValueError: invalid literal for float(): 'abc'"
    );
}

#[test]
fn to_string_matches_print() {
    let xs = list(vec![int(1), s("a")]);
    assert_eq!(to_string(&xs).repr(), "\"[1, 'a']\"");
    assert_eq!(to_string(&Value::Float(1e16)).repr(), "'1e+16'");
}

// Keyed collections

#[test]
fn maps_keep_insertion_order() {
    let map = Value::map(OrderedMap::new());
    insert(&map, s("b"), int(1)).unwrap();
    insert(&map, s("a"), int(2)).unwrap();
    insert(&map, s("b"), int(3)).unwrap();
    assert_eq!(map.repr(), "{'b': 3, 'a': 2}");
    assert_eq!(shown(keys(&map)), "['b', 'a']");
    assert_eq!(shown(get(&map, &s("zzz"))), "None");
    assert_eq!(
        shown(insert(&map, list(vec![]), int(1)).map(|()| Value::Null)),
        "TypeError: unhashable type: 'list'"
    );
}

#[test]
fn removing_an_absent_set_member_is_a_no_op() {
    let set = Value::set(OrderedSet::new());
    set_add(&set, int(1)).unwrap();
    set_remove(&set, &int(2)).unwrap();
    assert_eq!(shown(set_size(&set)), "1");
}

#[test]
fn missing_record_field_is_a_name_error() {
    let record = Value::record(Record::new());
    assert_eq!(
        shown(get_field(&record, "x")),
        "NameError: record has no field 'x'"
    );
}

// Queues

#[test]
fn heap_breaks_ties_in_insertion_order() {
    let heap = Value::heap();
    heap_push(&heap, &int(1), s("a")).unwrap();
    heap_push(&heap, &int(0), s("b")).unwrap();
    heap_push(&heap, &Value::Float(1.0), s("c")).unwrap();
    let popped: Vec<String> = (0..3).map(|_| shown(heap_pop(&heap))).collect();
    assert_eq!(popped, vec!["'b'", "'a'", "'c'"]);
    assert_eq!(
        shown(heap_pop(&heap)),
        "EmptyCollectionError: pop from an empty heap"
    );
    assert_eq!(
        shown(heap_push(&heap, &Value::Bool(true), int(1)).map(|()| Value::Null)),
        "TypeError: HeapPush expects a numeric priority, got bool"
    );
}

#[test]
fn deque_pops_from_either_end() {
    let deque = Value::deque(std::collections::VecDeque::new());
    deque_push(&deque, End::Back, int(1)).unwrap();
    deque_push(&deque, End::Front, int(0)).unwrap();
    assert_eq!(deque.repr(), "deque([0, 1])");
    assert_eq!(shown(deque_pop(&deque, End::Back)), "1");
    assert_eq!(shown(deque_pop(&deque, End::Front)), "0");
    assert_eq!(
        shown(deque_pop(&deque, End::Front)),
        "EmptyCollectionError: pop from an empty deque"
    );
}

// JSON

#[test]
fn json_parse_preserves_key_order() {
    let parsed = parse(&s(r#"{"b": 1, "a": [true, null, 1.5, 10000000000000000000]}"#));
    assert_eq!(shown(parsed), "{'b': 1, 'a': [True, None, 1.5, 1e+19]}");
    assert_eq!(shown(parse(&s("{"))).split(':').next(), Some("ValueError"));
}

#[test]
fn json_stringify_matches_python_dumps() {
    let map = Value::map(OrderedMap::new());
    insert(&map, s("a"), list(vec![int(1), Value::Float(2.5), Value::Null])).unwrap();
    insert(&map, s("b"), Value::Bool(true)).unwrap();
    insert(&map, int(1), Value::tuple(vec![s("é😀")])).unwrap();
    insert(&map, Value::Null, Value::Float(f64::NAN)).unwrap();
    assert_eq!(
        shown(stringify(&map, false)),
        r#"'{"a": [1, 2.5, null], "b": true, "1": ["\\u00e9\\ud83d\\ude00"], "null": NaN}'"#
    );
}

#[test]
fn json_stringify_pretty_indents_by_two() {
    let inner = Value::map(OrderedMap::new());
    insert(&inner, s("k"), s("v")).unwrap();
    let xs = list(vec![int(1), inner, list(vec![])]);
    let Value::Str(text) = stringify(&xs, true).unwrap() else {
        panic!("expected text");
    };
    assert_eq!(&*text, "[\n  1,\n  {\n    \"k\": \"v\"\n  },\n  []\n]");
}

#[test]
fn json_stringify_rejects_what_json_cannot_hold() {
    assert_eq!(
        shown(stringify(&Value::set(OrderedSet::new()), false)),
        "TypeError: Object of type set is not JSON serializable"
    );
    let map = Value::map(OrderedMap::new());
    insert(&map, Value::tuple(vec![int(1)]), int(1)).unwrap();
    assert_eq!(
        shown(stringify(&map, false)),
        "TypeError: keys must be str, int, float, bool or None, not tuple"
    );
    let xs = list(vec![]);
    let Value::Array(items) = &xs else {
        panic!("expected a list");
    };
    items.borrow_mut().push(xs.clone());
    assert_eq!(
        shown(stringify(&xs, false)),
        "ValueError: Circular reference detected"
    );
}

proptest! {
    #[test]
    fn resolved_indices_are_in_bounds(index in -100i64..100, len in 0usize..50) {
        if let Ok(at) = resolve_index(index, len) {
            prop_assert!(at < len);
            let at = i64::try_from(at).unwrap();
            let len = i64::try_from(len).unwrap();
            prop_assert!(at == index || at == index + len);
        }
    }

    #[test]
    fn slice_bounds_never_fail_for_int_bounds(start in any::<i64>(), end in any::<i64>(), len in 0usize..50) {
        let (s, e) = slice_bounds("Slice", &Value::Int(start), &Value::Int(end), len).unwrap();
        prop_assert!(s <= e && e <= len);
    }
}
