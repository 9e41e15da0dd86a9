use super::*;
use pretty_assertions::assert_eq;

fn int(v: Option<Value>) -> Option<i64> {
    match v {
        Some(Value::Int(n)) => Some(n),
        _ => None,
    }
}

#[test]
fn top_level_binds_globally() {
    let mut env = Environment::new();
    env.bind("x", Value::Int(1));
    assert_eq!(int(env.lookup("x")), Some(1));
    assert!(env.lookup("y").is_none());
}

#[test]
fn frame_shadows_and_falls_back_to_globals() {
    let mut env = Environment::new();
    env.bind("x", Value::Int(1));
    env.bind("g", Value::Int(9));
    env.push_frame([("x".to_string(), Value::Int(2))]);
    assert_eq!(int(env.lookup("x")), Some(2));
    assert_eq!(int(env.lookup("g")), Some(9));

    env.bind("g", Value::Int(10));
    env.pop_frame();
    assert_eq!(int(env.lookup("x")), Some(1));
    assert_eq!(int(env.lookup("g")), Some(9));
}

#[test]
fn frames_do_not_see_each_other() {
    let mut env = Environment::new();
    env.push_frame([("a".to_string(), Value::Int(1))]);
    env.push_frame(Vec::new());
    assert!(env.lookup("a").is_none());
    env.pop_frame();
    assert_eq!(int(env.lookup("a")), Some(1));
}
