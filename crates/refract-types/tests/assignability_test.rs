use refract_types::{
    accepts_null, check_assignable, is_assignable, is_strictly_narrower, ClassType, PrimitiveType,
    TypeError, TypeKind,
};

fn shape(name: &str) -> ClassType {
    ClassType::new(name, format!("zoo::{}", name))
}

fn dog() -> TypeKind {
    let mut ty = shape("Dog");
    ty.ancestors = vec!["zoo::Mammal".to_string(), "zoo::Animal".to_string()];
    ty.interfaces = vec!["Named".to_string()];
    TypeKind::Class(ty)
}

#[test]
fn test_primitive_names() {
    assert_eq!(PrimitiveType::Int.type_name(), "i32");
    assert_eq!(PrimitiveType::Double.type_name(), "f64");
    assert_eq!(PrimitiveType::Char.type_name(), "char");
    assert!(PrimitiveType::Byte.is_numeric());
    assert!(!PrimitiveType::Bool.is_numeric());
}

#[test]
fn test_every_widening_step_is_assignable() {
    let chain = [
        TypeKind::BYTE,
        TypeKind::SHORT,
        TypeKind::INT,
        TypeKind::LONG,
        TypeKind::FLOAT,
        TypeKind::DOUBLE,
    ];
    for (i, narrow) in chain.iter().enumerate() {
        for wide in &chain[i + 1..] {
            assert!(
                is_strictly_narrower(narrow, wide),
                "{} should be strictly narrower than {}",
                narrow,
                wide
            );
        }
    }
}

#[test]
fn test_bool_is_isolated() {
    assert!(!is_assignable(&TypeKind::BOOL, &TypeKind::INT));
    assert!(!is_assignable(&TypeKind::INT, &TypeKind::BOOL));
    assert!(!is_assignable(&TypeKind::BOOL, &TypeKind::Str));
}

#[test]
fn test_transitive_ancestors() {
    let animal = TypeKind::Class(shape("Animal"));
    let mammal = TypeKind::Class(shape("Mammal"));
    assert!(is_assignable(&dog(), &animal));
    assert!(is_assignable(&dog(), &mammal));
    assert!(!is_assignable(&animal, &dog()));
}

#[test]
fn test_interface_conformance() {
    let named = TypeKind::Interface("Named".to_string());
    let other = TypeKind::Interface("Sized".to_string());
    assert!(is_assignable(&dog(), &named));
    assert!(!is_assignable(&dog(), &other));
    assert!(!is_assignable(&TypeKind::Str, &named));
}

#[test]
fn test_str_and_any_are_not_equally_specific() {
    assert!(is_strictly_narrower(&TypeKind::Str, &TypeKind::Any));
    assert!(!is_strictly_narrower(&TypeKind::Any, &TypeKind::Str));
    assert!(!is_strictly_narrower(&TypeKind::Str, &TypeKind::Str));
}

#[test]
fn test_null_acceptance() {
    assert!(accepts_null(&TypeKind::Any));
    assert!(accepts_null(&TypeKind::Str));
    assert!(accepts_null(&TypeKind::List));
    assert!(accepts_null(&dog()));
    assert!(!accepts_null(&TypeKind::BOOL));
}

#[test]
fn test_check_assignable_messages() {
    let err = check_assignable(Some(&TypeKind::Str), &TypeKind::LONG).unwrap_err();
    assert_eq!(
        err,
        TypeError::NotAssignable {
            from: "String".to_string(),
            to: "i64".to_string()
        }
    );
    assert_eq!(
        err.to_string(),
        "Type mismatch: String is not assignable to i64"
    );
}
