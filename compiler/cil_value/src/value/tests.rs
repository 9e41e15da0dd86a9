use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn ints(xs: &[i64]) -> Vec<Value> {
    xs.iter().map(|&n| Value::Int(n)).collect()
}

// Formatting

#[test]
fn scalars_use_canonical_spelling() {
    assert_eq!(Value::Null.to_string(), "None");
    assert_eq!(Value::Bool(true).to_string(), "True");
    assert_eq!(Value::Int(-7).to_string(), "-7");
    assert_eq!(Value::string("hi").to_string(), "hi");
}

#[test]
fn floats_use_shortest_round_trip_form() {
    assert_eq!(format_float(1.0), "1.0");
    assert_eq!(format_float(-2.5), "-2.5");
    assert_eq!(format_float(0.1), "0.1");
    assert_eq!(format_float(1e16), "1e+16");
    assert_eq!(format_float(1.5e-5), "1.5e-05");
    assert_eq!(format_float(0.0001), "0.0001");
    assert_eq!(format_float(123_456_789.0), "123456789.0");
    assert_eq!(format_float(1e15), "1000000000000000.0");
    assert_eq!(format_float(f64::NAN), "nan");
    assert_eq!(format_float(f64::NEG_INFINITY), "-inf");
    assert_eq!(format_float(2.0_f64.sqrt()), "1.4142135623730951");
}

#[test]
fn containers_quote_nested_text() {
    let xs = Value::array(vec![Value::Int(1), Value::string("a"), Value::Null]);
    assert_eq!(xs.to_string(), "[1, 'a', None]");
    assert_eq!(Value::tuple(ints(&[1])).to_string(), "(1,)");
    assert_eq!(Value::tuple(ints(&[1, 2])).to_string(), "(1, 2)");
    assert_eq!(Value::tuple(vec![]).to_string(), "()");
    assert_eq!(Value::string("it's").repr(), "\"it's\"");
}

#[test]
fn collection_formats() {
    let mut map = OrderedMap::new();
    map.insert(Value::string("k"), Value::Int(1)).unwrap();
    map.insert(Value::Int(2), Value::Float(0.5)).unwrap();
    assert_eq!(Value::map(map).to_string(), "{'k': 1, 2: 0.5}");

    assert_eq!(Value::set(OrderedSet::new()).to_string(), "set()");
    let mut set = OrderedSet::new();
    set.insert(Value::Int(3)).unwrap();
    set.insert(Value::Int(1)).unwrap();
    assert_eq!(Value::set(set).to_string(), "{3, 1}");

    let mut record = Record::new();
    record.set("x", Value::Int(1));
    assert_eq!(Value::record(record).to_string(), "{'x': 1}");

    let deque = Value::deque(ints(&[1, 2]).into());
    assert_eq!(deque.to_string(), "deque([1, 2])");
    assert_eq!(Value::heap().to_string(), "<heap>");
}

#[test]
fn self_containing_array_prints_ellipsis() {
    let xs = Value::array(vec![Value::Int(1)]);
    if let Value::Array(items) = &xs {
        items.borrow_mut().push(xs.clone());
    }
    assert_eq!(xs.to_string(), "[1, [...]]");
}

// Truthiness and equality

#[test]
fn truthiness() {
    assert!(!Value::Null.is_truthy());
    assert!(!Value::Int(0).is_truthy());
    assert!(!Value::Float(0.0).is_truthy());
    assert!(!Value::string("").is_truthy());
    assert!(!Value::array(vec![]).is_truthy());
    assert!(!Value::heap().is_truthy());
    assert!(Value::record(Record::new()).is_truthy());
    assert!(Value::string("0").is_truthy());
}

#[test]
fn numeric_equality_crosses_types() {
    assert!(Value::Int(1).equals(&Value::Float(1.0)));
    assert!(Value::Bool(true).equals(&Value::Int(1)));
    assert!(!Value::Int(1).equals(&Value::string("1")));
    assert!(!Value::array(ints(&[1])).equals(&Value::tuple(ints(&[1]))));
    assert!(Value::array(ints(&[1, 2])).equals(&Value::array(ints(&[1, 2]))));
}

#[test]
fn mixed_number_comparison_is_exact() {
    let big = Value::Int(9_007_199_254_740_993);
    let near = Value::Float(9_007_199_254_740_992.0);
    assert!(!big.equals(&near));
    assert!(!near.equals(&big));
    assert_eq!(near.compare(&big).unwrap(), Some(Ordering::Less));
    assert_eq!(big.compare(&near).unwrap(), Some(Ordering::Greater));

    assert!(Value::Int(9_007_199_254_740_992).equals(&near));
    assert!(Value::Int(0).equals(&Value::Float(-0.0)));
    assert_eq!(Value::Int(2).compare(&Value::Float(2.5)).unwrap(), Some(Ordering::Less));
    assert_eq!(Value::Int(-2).compare(&Value::Float(-2.5)).unwrap(), Some(Ordering::Greater));
    assert_eq!(Value::Int(i64::MAX).compare(&Value::Float(9.3e18)).unwrap(), Some(Ordering::Less));
    assert_eq!(Value::Int(i64::MIN).compare(&Value::Float(-9.3e18)).unwrap(), Some(Ordering::Greater));
    assert_eq!(Value::Int(i64::MIN).compare(&Value::Float(-9_223_372_036_854_775_808.0)).unwrap(), Some(Ordering::Equal));
    assert_eq!(Value::Int(1).compare(&Value::Float(f64::INFINITY)).unwrap(), Some(Ordering::Less));
    assert_eq!(Value::Int(1).compare(&Value::Float(f64::NAN)).unwrap(), None);
}

#[test]
fn map_equality_ignores_order() {
    let mut a = OrderedMap::new();
    a.insert(Value::Int(1), Value::Int(10)).unwrap();
    a.insert(Value::Int(2), Value::Int(20)).unwrap();
    let mut b = OrderedMap::new();
    b.insert(Value::Int(2), Value::Int(20)).unwrap();
    b.insert(Value::Int(1), Value::Int(10)).unwrap();
    assert!(Value::map(a).equals(&Value::map(b)));
}

#[test]
fn ordering_rejects_mixed_kinds() {
    let err = Value::Int(1).compare(&Value::string("a")).unwrap_err();
    assert_eq!(err.message, "cannot compare int and str");
    assert_eq!(
        Value::string("a").compare(&Value::string("b")).unwrap(),
        Some(Ordering::Less)
    );
    assert_eq!(Value::Float(f64::NAN).compare(&Value::Int(1)).unwrap(), None);
}

#[test]
fn aliasing_is_observable() {
    let a = Value::array(ints(&[1]));
    let b = a.clone();
    if let Value::Array(items) = &b {
        items.borrow_mut().push(Value::Int(2));
    }
    assert_eq!(a.to_string(), "[1, 2]");
}

// Keys

#[test]
fn keys_are_type_tagged() {
    let key = |v: &Value| MapKey::of(v).unwrap();
    assert_ne!(key(&Value::Int(1)), key(&Value::string("1")));
    assert_ne!(key(&Value::Int(1)), key(&Value::Float(1.0)));
    assert_ne!(key(&Value::Int(1)), key(&Value::Bool(true)));
    assert_eq!(key(&Value::Float(0.0)), key(&Value::Float(-0.0)));
    assert_eq!(key(&Value::Null).to_string(), "N");
    assert_eq!(key(&Value::string("ab")).to_string(), "S2:ab");
    assert_eq!(
        key(&Value::tuple(vec![Value::Int(1), Value::string("x")])).to_string(),
        "T2(I1,S1:x)"
    );
}

#[test]
fn reference_types_are_unhashable() {
    let err = MapKey::of(&Value::array(vec![])).unwrap_err();
    assert_eq!(err.kind, crate::ErrorKind::Type);
    assert_eq!(err.message, "unhashable type: 'list'");
    assert!(MapKey::of(&Value::tuple(vec![Value::array(vec![])])).is_err());
}

// Collections

#[test]
fn set_remove_keeps_order_and_ignores_absent() {
    let mut set = OrderedSet::new();
    for n in [5, 6, 7, 8] {
        set.insert(Value::Int(n)).unwrap();
    }
    set.remove(&Value::Int(6)).unwrap();
    set.remove(&Value::Int(42)).unwrap();
    let left: Vec<_> = set.iter().map(ToString::to_string).collect();
    assert_eq!(left, ["5", "7", "8"]);
    assert!(set.contains(&Value::Int(8)).unwrap());
    set.insert(Value::Int(6)).unwrap();
    assert_eq!(Value::set(set).to_string(), "{5, 7, 8, 6}");
}

#[test]
fn heap_pops_lowest_priority_first() {
    let mut heap = PriorityHeap::new();
    heap.push(Priority::Int(3), Value::string("c"));
    heap.push(Priority::Float(0.5), Value::string("a"));
    heap.push(Priority::Int(1), Value::string("b"));
    assert_eq!(heap.peek().map(ToString::to_string).as_deref(), Some("a"));
    let order: Vec<_> = std::iter::from_fn(|| heap.pop()).map(|v| v.to_string()).collect();
    assert_eq!(order, ["a", "b", "c"]);
}

#[test]
fn signed_zero_priorities_tie_in_insertion_order() {
    let mut heap = PriorityHeap::new();
    heap.push(Priority::Float(0.0), Value::string("a"));
    heap.push(Priority::Float(0.0 - 0.0), Value::string("b0"));
    heap.push(Priority::Float(-1.0 * 0.0), Value::string("b"));
    heap.push(Priority::Int(0), Value::string("c"));
    let order: Vec<_> = std::iter::from_fn(|| heap.pop()).map(|v| v.to_string()).collect();
    assert_eq!(order, ["a", "b0", "b", "c"]);
}

#[test]
fn nan_priorities_pop_last() {
    let mut heap = PriorityHeap::new();
    heap.push(Priority::Float(f64::NAN), Value::string("n1"));
    heap.push(Priority::Int(5), Value::string("five"));
    heap.push(Priority::Float(f64::NAN), Value::string("n2"));
    heap.push(Priority::Float(-1.5), Value::string("low"));
    let order: Vec<_> = std::iter::from_fn(|| heap.pop()).map(|v| v.to_string()).collect();
    assert_eq!(order, ["low", "five", "n1", "n2"]);
}

#[test]
fn large_int_priorities_are_not_rounded() {
    let mut heap = PriorityHeap::new();
    heap.push(Priority::Int(9_007_199_254_740_993), Value::string("int"));
    heap.push(Priority::Float(9_007_199_254_740_992.0), Value::string("float"));
    let order: Vec<_> = std::iter::from_fn(|| heap.pop()).map(|v| v.to_string()).collect();
    assert_eq!(order, ["float", "int"]);
}

proptest! {
    #[test]
    fn reinserting_a_key_keeps_its_position(
        keys in prop::collection::vec(-20i64..20, 1..30),
        pick in any::<prop::sample::Index>(),
        replacement in any::<i64>(),
    ) {
        let mut map = OrderedMap::new();
        for &k in &keys {
            map.insert(Value::Int(k), Value::Int(0)).unwrap();
        }
        let before: Vec<String> = map.keys().map(ToString::to_string).collect();
        let target = Value::Int(keys[pick.index(keys.len())]);

        map.insert(target.clone(), Value::Int(replacement)).unwrap();

        let after: Vec<String> = map.keys().map(ToString::to_string).collect();
        prop_assert_eq!(before, after);
        prop_assert!(map.get(&target).unwrap().is_some_and(|v| v.equals(&Value::Int(replacement))));
    }

    #[test]
    fn equal_priorities_pop_in_insertion_order(
        priorities in prop::collection::vec(0i64..4, 0..40),
    ) {
        let mut heap = PriorityHeap::new();
        for (seq, &p) in priorities.iter().enumerate() {
            heap.push(Priority::Int(p), Value::tuple(vec![Value::Int(p), Value::Int(seq as i64)]));
        }
        let mut expected: Vec<(i64, i64)> = priorities
            .iter()
            .enumerate()
            .map(|(seq, &p)| (p, seq as i64))
            .collect();
        expected.sort_unstable();

        let mut popped = Vec::new();
        while let Some(Value::Tuple(pair)) = heap.pop() {
            if let (Value::Int(p), Value::Int(s)) = (&pair[0], &pair[1]) {
                popped.push((*p, *s));
            }
        }
        prop_assert_eq!(popped, expected);
    }

    #[test]
    fn format_float_round_trips(x in any::<f64>().prop_filter("finite", |x| x.is_finite())) {
        let text = format_float(x);
        let parsed: f64 = text.parse().unwrap();
        prop_assert_eq!(parsed.to_bits(), x.to_bits());
    }
}
