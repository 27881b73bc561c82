//! Refract - structural introspection for Rust values
//!
//! Types describe their shape once (fields with accessors, constructors,
//! methods, a parent, interfaces) and the rest comes for free:
//!
//! - an ordered, inheritance-flattened [field catalog](catalog)
//! - [`ObjectHandle`] for dynamic field access, construction, and invocation
//! - overload resolution by [signature matching](matcher)
//! - [structural](structural) equality, hashing, and printing
//! - a small [tuple family](tuple) built on the same machinery
//!
//! # Example
//!
//! ```ignore
//! use refract::{impl_structural, Describe, IntoValue, ObjectHandle, TypeDescriptor, TypeKind};
//!
//! #[derive(Clone)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! impl Describe for Point {
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::builder::<Point>("Point")
//!             .field("x", TypeKind::INT, |p| p.x.into_value())
//!             .field("y", TypeKind::INT, |p| p.y.into_value())
//!             .build()
//!     }
//! }
//!
//! impl_structural!(Point);
//!
//! assert_eq!(Point { x: 1, y: 2 }.to_string(), "Point {\n  x: 1\n  y: 2\n}");
//! let handle = ObjectHandle::of(Point { x: 1, y: 2 });
//! assert_eq!(handle.field_value("y")?, 2.into_value());
//! ```

#![warn(missing_docs)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod handle;
pub mod matcher;
pub mod registry;
pub mod shape;
pub mod structural;
pub mod tuple;
pub mod value;

pub use config::{Config, ConfigError, RenderConfig};
pub use error::{BoxError, ReflectError, ReflectResult};
pub use handle::{FieldSelector, ObjectHandle};
pub use matcher::Signature;
pub use shape::{
    Args, Constructor, Describe, FieldDescriptor, FieldFlags, Method, ShapeBuilder, Structural,
    TypeDescriptor,
};
pub use structural::StructuralEquatable;
pub use tuple::{AbstractTuple, NullableSinglet, Pair, Singlet, Triplet};
pub use value::{FromValue, IntoValue, Object, Value};

pub use refract_types::{ClassType, PrimitiveType, TypeError, TypeKind};

/// Derive `PartialEq`, `Eq`, `Hash`, `Display`, `Debug`, `IntoValue`, and
/// `FromValue` from a type's [`Describe`] shape. `Debug` uses the single-line
/// rendering.
///
/// The types must implement [`Describe`] and `Clone`.
///
/// ```ignore
/// impl_structural!(Point, Line);
/// ```
#[macro_export]
macro_rules! impl_structural {
    ($($ty:ty),+ $(,)?) => {$(
        impl ::core::cmp::PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                $crate::structural::equals(self, other)
            }
        }

        impl ::core::cmp::Eq for $ty {}

        impl ::core::hash::Hash for $ty {
            fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
                $crate::structural::hash_into(self, state)
            }
        }

        impl ::core::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&$crate::structural::print_object(self))
            }
        }

        impl ::core::fmt::Debug for $ty {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&$crate::structural::inline(self))
            }
        }

        impl $crate::IntoValue for $ty {
            fn into_value(self) -> $crate::Value {
                $crate::Value::Object($crate::Object::new(self))
            }

            fn value_kind() -> $crate::TypeKind {
                <$ty as $crate::Describe>::descriptor().kind()
            }
        }

        impl $crate::FromValue for $ty {
            fn from_value(value: $crate::Value) -> $crate::ReflectResult<Self> {
                let found = value.type_name();
                value
                    .as_object()
                    .and_then($crate::Object::downcast_clone::<$ty>)
                    .ok_or_else(|| {
                        $crate::TypeError::NotAssignable {
                            from: found,
                            to: ::std::string::ToString::to_string(
                                <$ty as $crate::Describe>::descriptor().name(),
                            ),
                        }
                        .into()
                    })
            }
        }
    )+};
}
