//! Core type kind definitions

use std::fmt;

/// Primitive value types.
///
/// Primitives never accept `null`; use [`TypeKind::Optional`] to declare a
/// nullable numeric slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveType {
    /// `bool`
    Bool,
    /// `char`
    Char,
    /// `i8`
    Byte,
    /// `i16`
    Short,
    /// `i32`
    Int,
    /// `i64`
    Long,
    /// `f32`
    Float,
    /// `f64`
    Double,
}

impl PrimitiveType {
    /// Rust spelling of the primitive
    pub const fn type_name(&self) -> &'static str {
        match self {
            PrimitiveType::Bool => "bool",
            PrimitiveType::Char => "char",
            PrimitiveType::Byte => "i8",
            PrimitiveType::Short => "i16",
            PrimitiveType::Int => "i32",
            PrimitiveType::Long => "i64",
            PrimitiveType::Float => "f32",
            PrimitiveType::Double => "f64",
        }
    }

    /// Check if this is a numeric type (excludes `bool` and `char`)
    pub const fn is_numeric(&self) -> bool {
        self.rank().is_some()
    }

    // Position in the widening lattice byte < short < int < long < float < double
    const fn rank(&self) -> Option<u8> {
        match self {
            PrimitiveType::Byte => Some(0),
            PrimitiveType::Short => Some(1),
            PrimitiveType::Int => Some(2),
            PrimitiveType::Long => Some(3),
            PrimitiveType::Float => Some(4),
            PrimitiveType::Double => Some(5),
            PrimitiveType::Bool | PrimitiveType::Char => None,
        }
    }

    /// Check whether a value of this type converts to `target` without loss
    /// of magnitude (identity or numeric widening).
    ///
    /// `char` widens to `i32` and anything wider, never to `i8`/`i16`.
    pub fn widens_to(&self, target: PrimitiveType) -> bool {
        if *self == target {
            return true;
        }
        if *self == PrimitiveType::Char {
            return matches!(
                target,
                PrimitiveType::Int | PrimitiveType::Long | PrimitiveType::Float | PrimitiveType::Double
            );
        }
        match (self.rank(), target.rank()) {
            (Some(from), Some(to)) => from < to,
            _ => false,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Nominal class type.
///
/// Carries its own ancestor chain and implemented interfaces so that
/// subclass and interface conformance can be decided without a registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassType {
    /// Simple name (`Person`)
    pub name: String,
    /// Fully qualified name (`app::model::Person`)
    pub qualified_name: String,
    /// Qualified names of ancestors, nearest first
    pub ancestors: Vec<String>,
    /// Names of implemented interfaces, including inherited ones
    pub interfaces: Vec<String>,
}

impl ClassType {
    /// Create a class type with no ancestors and no interfaces
    pub fn new(name: impl Into<String>, qualified_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qualified_name: qualified_name.into(),
            ancestors: Vec::new(),
            interfaces: Vec::new(),
        }
    }

    /// Check if this class is `qualified_name` or descends from it
    pub fn is_subclass_of(&self, qualified_name: &str) -> bool {
        self.qualified_name == qualified_name || self.ancestors.iter().any(|a| a == qualified_name)
    }

    /// Check if this class (or one of its ancestors) implements `interface`
    pub fn implements(&self, interface: &str) -> bool {
        self.interfaces.iter().any(|i| i == interface)
    }
}

/// Declared kind of a field, parameter, or runtime value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Top type: accepts every value, including null
    Any,
    /// Primitive value type
    Primitive(PrimitiveType),
    /// Owned text
    Str,
    /// Ordered sequence of values
    List,
    /// Associative container
    Map,
    /// Nominal structural class
    Class(ClassType),
    /// Any class implementing the named interface
    Interface(String),
    /// Nullable wrapper around another kind
    Optional(Box<TypeKind>),
}

impl TypeKind {
    /// `bool`
    pub const BOOL: TypeKind = TypeKind::Primitive(PrimitiveType::Bool);
    /// `char`
    pub const CHAR: TypeKind = TypeKind::Primitive(PrimitiveType::Char);
    /// `i8`
    pub const BYTE: TypeKind = TypeKind::Primitive(PrimitiveType::Byte);
    /// `i16`
    pub const SHORT: TypeKind = TypeKind::Primitive(PrimitiveType::Short);
    /// `i32`
    pub const INT: TypeKind = TypeKind::Primitive(PrimitiveType::Int);
    /// `i64`
    pub const LONG: TypeKind = TypeKind::Primitive(PrimitiveType::Long);
    /// `f32`
    pub const FLOAT: TypeKind = TypeKind::Primitive(PrimitiveType::Float);
    /// `f64`
    pub const DOUBLE: TypeKind = TypeKind::Primitive(PrimitiveType::Double);

    /// Wrap a kind as nullable
    pub fn optional(inner: TypeKind) -> Self {
        match inner {
            TypeKind::Optional(_) => inner,
            other => TypeKind::Optional(Box::new(other)),
        }
    }

    /// Check if this is a primitive kind
    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeKind::Primitive(_))
    }

    /// Get the class type if this is a class kind
    pub fn as_class(&self) -> Option<&ClassType> {
        match self {
            TypeKind::Class(class) => Some(class),
            _ => None,
        }
    }

    /// Short human-readable name
    pub fn type_name(&self) -> String {
        match self {
            TypeKind::Any => "Value".to_string(),
            TypeKind::Primitive(p) => p.type_name().to_string(),
            TypeKind::Str => "String".to_string(),
            TypeKind::List => "Vec".to_string(),
            TypeKind::Map => "Map".to_string(),
            TypeKind::Class(class) => class.name.clone(),
            TypeKind::Interface(name) => name.clone(),
            TypeKind::Optional(inner) => format!("Option<{}>", inner.type_name()),
        }
    }

    /// Fully qualified name, used by the case-insensitive field lookup fallback
    pub fn qualified_name(&self) -> String {
        match self {
            TypeKind::Any => "refract::value::Value".to_string(),
            TypeKind::Primitive(p) => p.type_name().to_string(),
            TypeKind::Str => "std::string::String".to_string(),
            TypeKind::List => "std::vec::Vec".to_string(),
            TypeKind::Map => "refract::value::Map".to_string(),
            TypeKind::Class(class) => class.qualified_name.clone(),
            TypeKind::Interface(name) => name.clone(),
            TypeKind::Optional(inner) => format!("core::option::Option<{}>", inner.qualified_name()),
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_name())
    }
}

impl From<PrimitiveType> for TypeKind {
    fn from(p: PrimitiveType) -> Self {
        TypeKind::Primitive(p)
    }
}

impl From<ClassType> for TypeKind {
    fn from(class: ClassType) -> Self {
        TypeKind::Class(class)
    }
}
