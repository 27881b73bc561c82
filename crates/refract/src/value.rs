//! Dynamic values
//!
//! `Value` is what field reads return and what writes and invocations take.
//! The signature matcher works on its runtime kind.
//!
//! # Objects
//!
//! Structural instances travel as [`Object`], a shared reference to a boxed
//! [`Structural`] value. Cloning an `Object` clones the reference, never the
//! instance, so an `Object` has a stable identity (its allocation address)
//! that recursive traversals use to detect cycles.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};
use refract_types::TypeKind;

use crate::error::{ReflectError, ReflectResult};
use crate::shape::{Structural, TypeDescriptor};
use crate::structural;

/// Dynamically typed value
#[derive(Clone)]
pub enum Value {
    /// Absent value
    Null,
    /// Boolean
    Bool(bool),
    /// Unicode scalar
    Char(char),
    /// 8-bit integer
    Byte(i8),
    /// 16-bit integer
    Short(i16),
    /// 32-bit integer
    Int(i32),
    /// 64-bit integer
    Long(i64),
    /// 32-bit float
    Float(f32),
    /// 64-bit float
    Double(f64),
    /// Owned text
    Str(String),
    /// Ordered sequence
    List(Vec<Value>),
    /// Associative container, insertion ordered
    Map(Vec<(Value, Value)>),
    /// Shared structural instance
    Object(Object),
}

impl Value {
    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Runtime kind of this value; `None` for null
    pub fn runtime_kind(&self) -> Option<TypeKind> {
        Some(match self {
            Value::Null => return None,
            Value::Bool(_) => TypeKind::BOOL,
            Value::Char(_) => TypeKind::CHAR,
            Value::Byte(_) => TypeKind::BYTE,
            Value::Short(_) => TypeKind::SHORT,
            Value::Int(_) => TypeKind::INT,
            Value::Long(_) => TypeKind::LONG,
            Value::Float(_) => TypeKind::FLOAT,
            Value::Double(_) => TypeKind::DOUBLE,
            Value::Str(_) => TypeKind::Str,
            Value::List(_) => TypeKind::List,
            Value::Map(_) => TypeKind::Map,
            Value::Object(obj) => obj.shape().kind(),
        })
    }

    /// Get type name for diagnostics
    pub fn type_name(&self) -> String {
        match self.runtime_kind() {
            Some(kind) => kind.type_name(),
            None => "null".to_string(),
        }
    }

    /// Get the object if this is an object value
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Get the text if this is a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get any integral value widened to i64
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(i) => Some(*i as i64),
            Value::Short(i) => Some(*i as i64),
            Value::Int(i) => Some(*i as i64),
            Value::Long(i) => Some(*i),
            Value::Char(c) => Some(*c as i64),
            _ => None,
        }
    }

    /// Get any numeric value widened to f64
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f as f64),
            Value::Double(f) => Some(*f),
            other => other.as_i64().map(|i| i as f64),
        }
    }

    fn mismatch(&self, expected: &str) -> ReflectError {
        refract_types::TypeError::NotAssignable {
            from: self.type_name(),
            to: expected.to_string(),
        }
        .into()
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        structural::values_equal(self, other)
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        structural::hash_value(self, state)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&structural::render_value(self))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Value::Null"),
            Value::Bool(b) => write!(f, "Value::Bool({})", b),
            Value::Char(c) => write!(f, "Value::Char({:?})", c),
            Value::Byte(i) => write!(f, "Value::Byte({})", i),
            Value::Short(i) => write!(f, "Value::Short({})", i),
            Value::Int(i) => write!(f, "Value::Int({})", i),
            Value::Long(i) => write!(f, "Value::Long({})", i),
            Value::Float(x) => write!(f, "Value::Float({})", x),
            Value::Double(x) => write!(f, "Value::Double({})", x),
            Value::Str(s) => write!(f, "Value::Str({:?})", s),
            Value::List(items) => f.debug_tuple("Value::List").field(items).finish(),
            Value::Map(entries) => f.debug_tuple("Value::Map").field(entries).finish(),
            Value::Object(obj) => write!(f, "Value::Object({:?})", obj),
        }
    }
}

// ============================================================================
// Object
// ============================================================================

/// Shared, identity-bearing structural instance.
///
/// # Thread Safety
///
/// Reads take a shared lock; field writes and method invocations take the
/// exclusive lock. The exclusive lock is not re-entrant: while a method body
/// runs, neither reads nor writes of its receiver through another `Object`
/// can proceed. [`ObjectHandle::invoke_method`](crate::ObjectHandle::invoke_method)
/// refuses arguments that reach the receiver for this reason.
#[derive(Clone)]
pub struct Object {
    inner: Arc<RwLock<Box<dyn Structural>>>,
}

impl Object {
    /// Move a structural value into a new shared object
    pub fn new<T: Structural>(value: T) -> Self {
        Self::from_boxed(Box::new(value))
    }

    pub(crate) fn from_boxed(value: Box<dyn Structural>) -> Self {
        Object {
            inner: Arc::new(RwLock::new(value)),
        }
    }

    /// Identity of the underlying allocation
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }

    /// Check if two objects are the same instance
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Type descriptor of the wrapped instance
    pub fn shape(&self) -> Arc<TypeDescriptor> {
        let guard = self.inner.read_recursive();
        (**guard).shape()
    }

    /// Check if the wrapped instance is a `T`
    pub fn is<T: 'static>(&self) -> bool {
        let guard = self.inner.read_recursive();
        (**guard).as_any().is::<T>()
    }

    /// Clone the wrapped instance out if it is a `T`
    pub fn downcast_clone<T: Clone + 'static>(&self) -> Option<T> {
        let guard = self.inner.read_recursive();
        (**guard).as_any().downcast_ref::<T>().cloned()
    }

    /// Run `f` with shared access to the instance
    pub fn with<R>(&self, f: impl FnOnce(&dyn Structural) -> R) -> R {
        let guard = self.inner.read_recursive();
        f(&**guard)
    }

    /// Run `f` with exclusive access to the instance
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut dyn Structural) -> R) -> R {
        let mut guard = self.inner.write();
        f(&mut **guard)
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Box<dyn Structural>> {
        self.inner.read_recursive()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:#x}", self.shape().name(), self.id())
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        structural::values_equal(&Value::Object(self.clone()), &Value::Object(other.clone()))
    }
}

// ============================================================================
// Conversion Traits
// ============================================================================

/// Convert a Rust value into a [`Value`].
///
/// Implement this trait to allow your type to be stored in a structural slot
/// or passed as an invocation argument.
pub trait IntoValue {
    /// Convert into a dynamic value
    fn into_value(self) -> Value;

    /// Declared kind of slots holding this type
    fn value_kind() -> TypeKind
    where
        Self: Sized,
    {
        TypeKind::Any
    }
}

/// Convert a [`Value`] back into a Rust value.
///
/// Numeric targets accept any value that widens to them.
pub trait FromValue: Sized {
    /// Convert from a dynamic value, failing if the kind doesn't fit
    fn from_value(value: Value) -> ReflectResult<Self>;
}

macro_rules! primitive_conversions {
    ($($ty:ty => $variant:ident, $kind:ident);* $(;)?) => {
        $(
            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                fn value_kind() -> TypeKind {
                    TypeKind::$kind
                }
            }
        )*
    };
}

primitive_conversions! {
    bool => Bool, BOOL;
    char => Char, CHAR;
    i8 => Byte, BYTE;
    i16 => Short, SHORT;
    i32 => Int, INT;
    i64 => Long, LONG;
    f32 => Float, FLOAT;
    f64 => Double, DOUBLE;
}

impl FromValue for bool {
    fn from_value(value: Value) -> ReflectResult<Self> {
        value.as_bool().ok_or_else(|| value.mismatch("bool"))
    }
}

impl FromValue for char {
    fn from_value(value: Value) -> ReflectResult<Self> {
        match value {
            Value::Char(c) => Ok(c),
            other => Err(other.mismatch("char")),
        }
    }
}

impl FromValue for i8 {
    fn from_value(value: Value) -> ReflectResult<Self> {
        match value {
            Value::Byte(i) => Ok(i),
            other => Err(other.mismatch("i8")),
        }
    }
}

impl FromValue for i16 {
    fn from_value(value: Value) -> ReflectResult<Self> {
        match value {
            Value::Byte(i) => Ok(i as i16),
            Value::Short(i) => Ok(i),
            other => Err(other.mismatch("i16")),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: Value) -> ReflectResult<Self> {
        match value {
            Value::Byte(i) => Ok(i as i32),
            Value::Short(i) => Ok(i as i32),
            Value::Int(i) => Ok(i),
            Value::Char(c) => Ok(c as i32),
            other => Err(other.mismatch("i32")),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> ReflectResult<Self> {
        value.as_i64().ok_or_else(|| value.mismatch("i64"))
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> ReflectResult<Self> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Double(_) => Err(value.mismatch("f32")),
            other => other.as_i64().map(|i| i as f32).ok_or_else(|| other.mismatch("f32")),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> ReflectResult<Self> {
        value.as_f64().ok_or_else(|| value.mismatch("f64"))
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Str(self)
    }

    fn value_kind() -> TypeKind {
        TypeKind::Str
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Str(self.to_string())
    }

    fn value_kind() -> TypeKind {
        TypeKind::Str
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> ReflectResult<Self> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(other.mismatch("String")),
        }
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> ReflectResult<Self> {
        Ok(value)
    }
}

impl IntoValue for Object {
    fn into_value(self) -> Value {
        Value::Object(self)
    }
}

impl FromValue for Object {
    fn from_value(value: Value) -> ReflectResult<Self> {
        match value {
            Value::Object(obj) => Ok(obj),
            other => Err(other.mismatch("Object")),
        }
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => Value::Null,
        }
    }

    fn value_kind() -> TypeKind {
        TypeKind::optional(T::value_kind())
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> ReflectResult<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }

    fn value_kind() -> TypeKind {
        TypeKind::List
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> ReflectResult<Self> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(other.mismatch("Vec")),
        }
    }
}

impl<K: IntoValue, V: IntoValue> IntoValue for BTreeMap<K, V> {
    fn into_value(self) -> Value {
        Value::Map(
            self.into_iter()
                .map(|(k, v)| (k.into_value(), v.into_value()))
                .collect(),
        )
    }

    fn value_kind() -> TypeKind {
        TypeKind::Map
    }
}

impl<K: FromValue + Ord, V: FromValue> FromValue for BTreeMap<K, V> {
    fn from_value(value: Value) -> ReflectResult<Self> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
                .collect(),
            other => Err(other.mismatch("Map")),
        }
    }
}

impl<K: IntoValue, V: IntoValue, S> IntoValue for HashMap<K, V, S> {
    fn into_value(self) -> Value {
        Value::Map(
            self.into_iter()
                .map(|(k, v)| (k.into_value(), v.into_value()))
                .collect(),
        )
    }

    fn value_kind() -> TypeKind {
        TypeKind::Map
    }
}

impl<K, V, S> FromValue for HashMap<K, V, S>
where
    K: FromValue + Eq + std::hash::Hash,
    V: FromValue,
    S: std::hash::BuildHasher + Default,
{
    fn from_value(value: Value) -> ReflectResult<Self> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
                .collect(),
            other => Err(other.mismatch("Map")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_kinds() {
        assert_eq!(Value::Null.runtime_kind(), None);
        assert_eq!(Value::Int(1).runtime_kind(), Some(TypeKind::INT));
        assert_eq!(Value::Str("a".into()).runtime_kind(), Some(TypeKind::Str));
        assert_eq!(Value::List(vec![]).runtime_kind(), Some(TypeKind::List));
    }

    #[test]
    fn test_numeric_widening_on_extract() {
        assert_eq!(i64::from_value(Value::Int(7)).unwrap(), 7);
        assert_eq!(i32::from_value(Value::Byte(-3)).unwrap(), -3);
        assert_eq!(f64::from_value(Value::Long(2)).unwrap(), 2.0);
        assert!(i32::from_value(Value::Long(2)).is_err());
        assert!(f32::from_value(Value::Double(1.5)).is_err());
    }

    #[test]
    fn test_option_round_trip_through_null() {
        assert_eq!(Option::<i32>::from_value(Value::Null).unwrap(), None);
        assert!(None::<String>.into_value().is_null());
        assert_eq!(
            Option::<String>::value_kind(),
            TypeKind::optional(TypeKind::Str)
        );
    }

    #[test]
    fn test_mismatch_message() {
        let err = String::from_value(Value::Bool(true)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid field access: Type mismatch: bool is not assignable to String"
        );
    }

    #[test]
    fn test_map_equality_ignores_order() {
        let a = Value::Map(vec![
            (Value::Str("a".into()), Value::Int(1)),
            (Value::Str("b".into()), Value::Int(2)),
        ]);
        let b = Value::Map(vec![
            (Value::Str("b".into()), Value::Int(2)),
            (Value::Str("a".into()), Value::Int(1)),
        ]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_display_natural_form() {
        let v = Value::List(vec![Value::Int(1), Value::Str("x".into()), Value::Null]);
        assert_eq!(v.to_string(), "[1, x, null]");
    }
}
