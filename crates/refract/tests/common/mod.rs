#![allow(dead_code)]

use refract::{
    impl_structural, BoxError, Describe, FromValue, IntoValue, Object, TypeDescriptor, TypeKind,
    Value,
};

// ============================================================================
// Points and lines
// ============================================================================

#[derive(Clone)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Describe for Point {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Point>("Point")
            .field_mut(
                "x",
                TypeKind::INT,
                |p| p.x.into_value(),
                |p, v| {
                    p.x = i32::from_value(v)?;
                    Ok(())
                },
            )
            .field_mut(
                "y",
                TypeKind::INT,
                |p| p.y.into_value(),
                |p, v| {
                    p.y = i32::from_value(v)?;
                    Ok(())
                },
            )
            .constructor(vec![TypeKind::INT, TypeKind::INT], |args| {
                Ok(Point {
                    x: args.take()?,
                    y: args.take()?,
                })
            })
            .build()
    }
}

#[derive(Clone)]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

impl Describe for Line {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Line>("Line")
            .field("start", Point::value_kind(), |l| l.start.clone().into_value())
            .field("end", Point::value_kind(), |l| l.end.clone().into_value())
            .build()
    }
}

/// A point that may be missing
#[derive(Clone)]
pub struct Marker {
    pub label: String,
    pub anchor: Option<Point>,
}

impl Describe for Marker {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Marker>("Marker")
            .field("label", TypeKind::Str, |m| m.label.clone().into_value())
            .field(
                "anchor",
                TypeKind::optional(Point::value_kind()),
                |m| m.anchor.clone().into_value(),
            )
            .build()
    }
}

// ============================================================================
// Beings and persons
// ============================================================================

#[derive(Clone)]
pub struct Being {
    pub species: String,
}

impl Describe for Being {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Being>("Being")
            .field_mut(
                "species",
                TypeKind::Str,
                |b| b.species.clone().into_value(),
                |b, v| {
                    b.species = String::from_value(v)?;
                    Ok(())
                },
            )
            .static_field("KINGDOM", TypeKind::Str, || Value::Str("animalia".into()))
            .implements("Living")
            .constructor(vec![TypeKind::Str], |args| {
                Ok(Being {
                    species: args.take()?,
                })
            })
            .method("describe_species", vec![], |b, _| {
                Ok(Value::Str(b.species.clone()))
            })
            .method("sound", vec![], |_, _| Ok("silence".into_value()))
            .build()
    }
}

#[derive(Clone)]
pub struct Person {
    pub being: Being,
    pub name: String,
    pub age: i32,
    pub nickname: Option<String>,
    pub friend: Option<Object>,
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct Refusal(pub String);

fn refuse(message: &str) -> BoxError {
    Box::new(Refusal(message.to_string()))
}

impl Describe for Person {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Person>("Person")
            .extends(Being::descriptor(), |p| &p.being, |p| &mut p.being)
            .field_mut(
                "name",
                TypeKind::Str,
                |p| p.name.clone().into_value(),
                |p, v| {
                    p.name = String::from_value(v)?;
                    Ok(())
                },
            )
            .field_mut(
                "age",
                TypeKind::INT,
                |p| p.age.into_value(),
                |p, v| {
                    p.age = i32::from_value(v)?;
                    Ok(())
                },
            )
            .field_mut(
                "nickname",
                TypeKind::optional(TypeKind::Str),
                |p| p.nickname.clone().into_value(),
                |p, v| {
                    p.nickname = Option::<String>::from_value(v)?;
                    Ok(())
                },
            )
            .field_mut(
                "friend",
                TypeKind::Any,
                |p| p.friend.clone().into_value(),
                |p, v| {
                    p.friend = Option::<Object>::from_value(v)?;
                    Ok(())
                },
            )
            .synthetic_field("generation", TypeKind::LONG, |_| Value::Long(1))
            .static_field("POPULATION", TypeKind::LONG, || Value::Long(8))
            .constructor(vec![], |_| Ok(person("", 0)))
            .constructor(vec![TypeKind::Str], |args| Ok(person(&args.take::<String>()?, 0)))
            .constructor(vec![TypeKind::Str, TypeKind::INT], |args| {
                let name: String = args.take()?;
                Ok(person(&name, args.take()?))
            })
            .constructor(vec![TypeKind::BOOL], |_| {
                Err(refuse("person refuses to be built from a flag"))
            })
            .method("greet", vec![], |p, _| {
                Ok(Value::Str(format!("Hello, {}", p.name)))
            })
            .method("rename", vec![TypeKind::Str], |p, args| {
                p.name = args.take()?;
                Ok(Value::Null)
            })
            .method("describe", vec![TypeKind::Str], |_, _| Ok("text".into_value()))
            .method("describe", vec![TypeKind::Any], |_, _| Ok("value".into_value()))
            .method("pair", vec![TypeKind::Str, TypeKind::Any], |_, _| {
                Ok("left".into_value())
            })
            .method("pair", vec![TypeKind::Any, TypeKind::Str], |_, _| {
                Ok("right".into_value())
            })
            .method("adopt", vec![Being::value_kind()], |_, _| Ok("being".into_value()))
            .method("adopt", vec![TypeKind::Any], |_, _| Ok("anything".into_value()))
            .method(
                "classify",
                vec![TypeKind::Interface("Living".into())],
                |_, _| Ok("living".into_value()),
            )
            .method("classify", vec![TypeKind::Str], |_, _| Ok("text".into_value()))
            .method("widen", vec![TypeKind::LONG], |_, _| Ok("long".into_value()))
            .method("widen", vec![TypeKind::DOUBLE], |_, _| Ok("double".into_value()))
            .method("sound", vec![], |p, _| {
                Ok(Value::Str(format!("{} says hello", p.name)))
            })
            .method("same_name", vec![TypeKind::Any], |p, args| {
                let other: Object = args.take()?;
                let name = other.with(|s| {
                    s.as_any().downcast_ref::<Person>().map(|o| o.name.clone())
                });
                Ok(Value::Bool(name.as_deref() == Some(p.name.as_str())))
            })
            .method("fail", vec![], |_, _| Err(refuse("greeting budget exhausted")))
            .static_method("create", vec![TypeKind::Str], |args| {
                Ok(person(&args.take::<String>()?, 0).into_value())
            })
            .build()
    }
}

pub fn person(name: &str, age: i32) -> Person {
    Person {
        being: Being {
            species: "human".into(),
        },
        name: name.to_string(),
        age,
        nickname: None,
        friend: None,
    }
}

// ============================================================================
// Linked nodes (cycles)
// ============================================================================

#[derive(Clone)]
pub struct Node {
    pub label: String,
    pub next: Option<Object>,
}

impl Describe for Node {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Node>("Node")
            .field("label", TypeKind::Str, |n| n.label.clone().into_value())
            .field_mut(
                "next",
                TypeKind::Any,
                |n| n.next.clone().into_value(),
                |n, v| {
                    n.next = Option::<Object>::from_value(v)?;
                    Ok(())
                },
            )
            .build()
    }
}

/// A node whose `next` points at itself
pub fn self_loop(label: &str) -> Object {
    let node = Object::new(Node {
        label: label.to_string(),
        next: None,
    });
    let back = node.clone();
    node.with_mut(|s| {
        if let Some(n) = s.as_any_mut().downcast_mut::<Node>() {
            n.next = Some(back);
        }
    });
    node
}

impl_structural!(Point, Line, Marker, Being, Person, Node);
