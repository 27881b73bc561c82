//! Overload resolution through constructors and methods

mod common;

use common::*;
use refract::{matcher, Describe, IntoValue, ObjectHandle, ReflectError, Signature, TypeKind, Value};

fn call(name: &str, args: Vec<Value>) -> Result<Value, ReflectError> {
    ObjectHandle::of(person("Ada", 36)).invoke_method(name, args)
}

fn text(s: &str) -> Value {
    Value::Str(s.to_string())
}

#[test]
fn test_text_argument_prefers_text_parameter() {
    assert_eq!(call("describe", vec![text("x")]).unwrap(), text("text"));
}

#[test]
fn test_other_argument_falls_back_to_any() {
    assert_eq!(call("describe", vec![Value::Int(1)]).unwrap(), text("value"));
    let point = Point { x: 0, y: 0 }.into_value();
    assert_eq!(call("describe", vec![point]).unwrap(), text("value"));
}

#[test]
fn test_null_argument_does_not_decide() {
    match call("describe", vec![Value::Null]) {
        Err(ReflectError::AmbiguousMatch { target, candidates }) => {
            assert_eq!(target, "Person.describe");
            assert_eq!(candidates.len(), 2);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_crossed_overloads_are_ambiguous() {
    match call("pair", vec![text("a"), text("b")]) {
        Err(ReflectError::AmbiguousMatch { candidates, .. }) => {
            assert!(candidates.contains(&"Person.pair(String, Value)".to_string()));
            assert!(candidates.contains(&"Person.pair(Value, String)".to_string()));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_crossed_overloads_resolve_when_one_side_differs() {
    assert_eq!(call("pair", vec![text("a"), Value::Int(1)]).unwrap(), text("left"));
    assert_eq!(call("pair", vec![Value::Int(1), text("b")]).unwrap(), text("right"));
}

#[test]
fn test_subclass_argument_prefers_ancestor_parameter() {
    let other = person("Charles", 41).into_value();
    assert_eq!(call("adopt", vec![other]).unwrap(), text("being"));
    let being = Being {
        species: "cat".into(),
    }
    .into_value();
    assert_eq!(call("adopt", vec![being]).unwrap(), text("being"));
    assert_eq!(call("adopt", vec![Value::Bool(true)]).unwrap(), text("anything"));
}

#[test]
fn test_interface_parameter_accepts_implementors() {
    let other = person("Charles", 41).into_value();
    assert_eq!(call("classify", vec![other]).unwrap(), text("living"));
    assert_eq!(call("classify", vec![text("x")]).unwrap(), text("text"));
    assert!(matches!(
        call("classify", vec![Point { x: 0, y: 0 }.into_value()]),
        Err(ReflectError::NoMatchingSignature { .. })
    ));
}

#[test]
fn test_narrower_primitive_wins() {
    assert_eq!(call("widen", vec![Value::Int(1)]).unwrap(), text("long"));
    assert_eq!(call("widen", vec![Value::Long(1)]).unwrap(), text("long"));
    assert_eq!(call("widen", vec![Value::Float(1.0)]).unwrap(), text("double"));
    assert!(matches!(
        call("widen", vec![Value::Bool(true)]),
        Err(ReflectError::NoMatchingSignature { .. })
    ));
}

#[test]
fn test_no_match_message_lists_argument_types() {
    let err = call("describe", vec![text("a"), Value::Int(1)]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "No matching signature for Person.describe(String, i32)"
    );
}

#[test]
fn test_select_over_constructors() {
    let ty = Person::descriptor();
    let chosen = matcher::select("Person", ty.constructors(), &[text("x")]).unwrap();
    assert_eq!(chosen.params(), &[TypeKind::Str]);
    assert_eq!(chosen.describe(), "Person(String)");

    let chosen = matcher::select("Person", ty.constructors(), &[text("x"), Value::Byte(3)]).unwrap();
    assert_eq!(chosen.params(), &[TypeKind::Str, TypeKind::INT]);

    let chosen = matcher::select("Person", ty.constructors(), &[Value::Null]).unwrap();
    assert_eq!(chosen.params(), &[TypeKind::Str]);
}

#[test]
fn test_select_exact_ignores_arguments() {
    let ty = Person::descriptor();
    let chosen = matcher::select_exact("Person", ty.constructors(), &[TypeKind::BOOL]).unwrap();
    assert_eq!(chosen.describe(), "Person(bool)");
    assert!(matcher::select_exact("Person", ty.constructors(), &[TypeKind::Any]).is_err());
}

#[test]
fn test_resolution_is_stable() {
    for _ in 0..10 {
        assert_eq!(call("describe", vec![text("x")]).unwrap(), text("text"));
        assert!(call("pair", vec![text("a"), text("b")]).is_err());
    }
}
