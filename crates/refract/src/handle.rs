//! Object handles
//!
//! An [`ObjectHandle`] pairs a (possibly null) value with its static type
//! descriptor and exposes field lookup, field reads and writes, construction
//! through the signature matcher, and method invocation.
//!
//! ```ignore
//! let person = ObjectHandle::construct(&Person::descriptor(), vec!["Ada".into_value()])?;
//! let name = person.field_value("name")?;
//! person.set_field("age", Value::Int(36))?;
//! let greeting = person.invoke_method("greet", vec![])?;
//! ```

use std::fmt;
use std::sync::Arc;

use refract_types::{check_assignable, TypeKind};
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::catalog;
use crate::config::RenderConfig;
use crate::error::{BoxError, ReflectError, ReflectResult};
use crate::matcher;
use crate::registry;
use crate::shape::{Constructor, Describe, FieldDescriptor, Structural, TypeDescriptor};
use crate::structural;
use crate::value::{Object, Value};

// ============================================================================
// Field Selectors
// ============================================================================

/// How to pick a field out of a catalog
#[derive(Clone)]
pub enum FieldSelector {
    /// Exact field name; falls back to a case-insensitive match on the
    /// field's declared type name
    Name(String),
    /// Exactly this declared kind
    Kind(TypeKind),
    /// Any custom condition
    Predicate(Arc<dyn Fn(&FieldDescriptor) -> bool + Send + Sync>),
}

impl FieldSelector {
    /// Select by name
    pub fn name(name: impl Into<String>) -> Self {
        FieldSelector::Name(name.into())
    }

    /// Select by declared kind
    pub fn kind(kind: TypeKind) -> Self {
        FieldSelector::Kind(kind)
    }

    /// Select by predicate
    pub fn matching<F>(predicate: F) -> Self
    where
        F: Fn(&FieldDescriptor) -> bool + Send + Sync + 'static,
    {
        FieldSelector::Predicate(Arc::new(predicate))
    }

    fn describe(&self) -> String {
        match self {
            FieldSelector::Name(name) => format!("name '{}'", name),
            FieldSelector::Kind(kind) => format!("type {}", kind),
            FieldSelector::Predicate(_) => "predicate".to_string(),
        }
    }
}

impl fmt::Debug for FieldSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl From<&str> for FieldSelector {
    fn from(name: &str) -> Self {
        FieldSelector::Name(name.to_string())
    }
}

impl From<String> for FieldSelector {
    fn from(name: String) -> Self {
        FieldSelector::Name(name)
    }
}

impl From<TypeKind> for FieldSelector {
    fn from(kind: TypeKind) -> Self {
        FieldSelector::Kind(kind)
    }
}

fn kind_named(kind: &TypeKind, name: &str) -> bool {
    let kind = match kind {
        TypeKind::Optional(inner) => inner.as_ref(),
        other => other,
    };
    kind.qualified_name().eq_ignore_ascii_case(name) || kind.type_name().eq_ignore_ascii_case(name)
}

/// Check if `target` is `value` or reachable from it through fields
fn reaches(value: &Value, target: &Object, visited: &mut FxHashSet<usize>) -> bool {
    match value {
        Value::Object(obj) => {
            if obj.ptr_eq(target) {
                return true;
            }
            if !visited.insert(obj.id()) {
                return false;
            }
            let fields: Vec<Value> = obj.with(|s| {
                catalog::fields(&s.shape())
                    .iter()
                    .filter_map(|f| f.read(s).ok())
                    .collect()
            });
            fields.iter().any(|f| reaches(f, target, visited))
        }
        Value::List(items) => items.iter().any(|item| reaches(item, target, visited)),
        Value::Map(entries) => entries
            .iter()
            .any(|(k, v)| reaches(k, target, visited) || reaches(v, target, visited)),
        _ => false,
    }
}

// ============================================================================
// Handle
// ============================================================================

/// A value together with its static type
#[derive(Clone)]
pub struct ObjectHandle {
    value: Value,
    ty: Option<Arc<TypeDescriptor>>,
}

impl ObjectHandle {
    /// Wrap a value; objects carry their own type
    pub fn new(value: Value) -> Self {
        let ty = value.as_object().map(Object::shape);
        Self { value, ty }
    }

    /// Move a structural value into a new handle
    pub fn of<T: Structural>(value: T) -> Self {
        Self::new(Value::Object(Object::new(value)))
    }

    /// Handle with neither a value nor a type
    pub fn null() -> Self {
        Self {
            value: Value::Null,
            ty: None,
        }
    }

    /// Null handle that still knows its type
    pub fn of_type(ty: Arc<TypeDescriptor>) -> Self {
        Self {
            value: Value::Null,
            ty: Some(ty),
        }
    }

    /// Null handle typed as `T`
    pub fn for_type<T: Describe>() -> Self {
        Self::of_type(T::descriptor())
    }

    /// Wrap `value` under the static type `ty`.
    ///
    /// `value` must be null or an instance of `ty` or one of its descendants.
    pub fn with_type(value: Value, ty: Arc<TypeDescriptor>) -> ReflectResult<Self> {
        match &value {
            Value::Null => {}
            Value::Object(obj) if obj.shape().is_subtype_of(&ty) => {}
            other => {
                return Err(ReflectError::access(format!(
                    "{} is not an instance of {}",
                    other.type_name(),
                    ty.name()
                )))
            }
        }
        Ok(Self {
            value,
            ty: Some(ty),
        })
    }

    /// The wrapped value
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Unwrap the value
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Check if the handle wraps null
    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    /// Static type, if known
    pub fn type_descriptor(&self) -> Option<&Arc<TypeDescriptor>> {
        self.ty.as_ref()
    }

    /// The wrapped object, if any
    pub fn object(&self) -> Option<&Object> {
        self.value.as_object()
    }

    /// Clone the wrapped instance out as a `T`
    pub fn downcast<T: Clone + 'static>(&self) -> Option<T> {
        self.object().and_then(Object::downcast_clone::<T>)
    }

    fn owner_label(&self) -> String {
        match &self.ty {
            Some(ty) => ty.name().to_string(),
            None if self.value.is_null() => "null".to_string(),
            None => self.value.type_name(),
        }
    }

    fn instance(&self, action: &str) -> ReflectResult<&Object> {
        self.value.as_object().ok_or_else(|| {
            ReflectError::access(format!(
                "cannot {} on {}: no instance",
                action,
                self.owner_label()
            ))
        })
    }

    // ------------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------------

    /// Construct `ty` with the constructor that best fits `args`
    pub fn construct(ty: &Arc<TypeDescriptor>, args: Vec<Value>) -> ReflectResult<Self> {
        let ctor = matcher::select(ty.name(), ty.constructors(), &args)?;
        Self::instantiate(ty, ctor, args)
    }

    /// Construct `ty` with the constructor declared with exactly `params`
    pub fn construct_exact(
        ty: &Arc<TypeDescriptor>,
        params: &[TypeKind],
        args: Vec<Value>,
    ) -> ReflectResult<Self> {
        let ctor = matcher::select_exact(ty.name(), ty.constructors(), params)?;
        for (param, arg) in params.iter().zip(&args) {
            check_assignable(arg.runtime_kind().as_ref(), param)?;
        }
        if params.len() != args.len() {
            return Err(ReflectError::NoMatchingSignature {
                target: ty.name().to_string(),
                arg_types: args.iter().map(Value::type_name).collect(),
            });
        }
        Self::instantiate(ty, ctor, args)
    }

    /// Construct a registered type looked up by qualified or simple name
    pub fn construct_by_name(name: &str, args: Vec<Value>) -> ReflectResult<Self> {
        match registry::lookup(name)? {
            Some(ty) => Self::construct(&ty, args),
            None => Err(ReflectError::NoMatchingSignature {
                target: name.to_string(),
                arg_types: args.iter().map(Value::type_name).collect(),
            }),
        }
    }

    fn instantiate(
        ty: &Arc<TypeDescriptor>,
        ctor: &Constructor,
        args: Vec<Value>,
    ) -> ReflectResult<Self> {
        match ctor.call(args) {
            Ok(instance) => {
                debug!(ty = ty.name(), params = ctor.params().len(), "constructed instance");
                Ok(Self {
                    value: Value::Object(Object::from_boxed(instance)),
                    ty: Some(ty.clone()),
                })
            }
            Err(source) => {
                warn!(ty = ty.name(), error = %source, "constructor failed");
                Err(ReflectError::ConstructionFailed {
                    type_name: ty.name().to_string(),
                    source,
                })
            }
        }
    }

    // ------------------------------------------------------------------------
    // Fields
    // ------------------------------------------------------------------------

    /// Catalogued fields of the static type; empty when the type is unknown
    pub fn fields(&self) -> Vec<FieldDescriptor> {
        match &self.ty {
            Some(ty) => catalog::fields(ty).to_vec(),
            None => Vec::new(),
        }
    }

    /// Static fields of the static type and its ancestors
    pub fn static_fields(&self) -> Vec<FieldDescriptor> {
        match &self.ty {
            Some(ty) => ty.static_fields(),
            None => Vec::new(),
        }
    }

    /// Find one field in the catalog.
    ///
    /// Name selectors try the exact field name first (derived fields shadow
    /// inherited ones) and fall back to a case-insensitive match against the
    /// declared type name of each field. Kind and predicate selectors, and
    /// the fallback, must match exactly one field.
    pub fn field(&self, selector: impl Into<FieldSelector>) -> ReflectResult<FieldDescriptor> {
        let selector = selector.into();
        let not_found = || ReflectError::FieldNotFound {
            owner: self.owner_label(),
            selector: selector.describe(),
        };
        let ty = self.ty.as_ref().ok_or_else(not_found)?;
        let catalog = catalog::fields(ty);

        let matches: Vec<&FieldDescriptor> = match &selector {
            FieldSelector::Name(name) => {
                if let Some(exact) = catalog.iter().find(|f| f.name() == name) {
                    return Ok(exact.clone());
                }
                catalog.iter().filter(|f| kind_named(f.kind(), name)).collect()
            }
            FieldSelector::Kind(kind) => catalog.iter().filter(|f| f.kind() == kind).collect(),
            FieldSelector::Predicate(predicate) => catalog.iter().filter(|f| predicate(*f)).collect(),
        };

        match matches.as_slice() {
            [] => Err(not_found()),
            [only] => Ok((*only).clone()),
            many => Err(ReflectError::AmbiguousMatch {
                target: format!("{} field by {}", ty.name(), selector.describe()),
                candidates: many.iter().map(|f| f.to_string()).collect(),
            }),
        }
    }

    /// Read `field` from the wrapped instance; static fields need no instance
    pub fn get(&self, field: &FieldDescriptor) -> ReflectResult<Value> {
        if field.is_static() {
            return field.read_static();
        }
        let obj = self.instance(&format!("read {}", field.name()))?;
        let own = catalog::fields(&obj.shape())
            .iter()
            .find(|f| *f == field)
            .cloned();
        obj.with(|s| own.as_ref().unwrap_or(field).read(s))
    }

    /// Select a field and read it
    pub fn field_value(&self, selector: impl Into<FieldSelector>) -> ReflectResult<Value> {
        let field = self.field(selector)?;
        self.get(&field)
    }

    /// Select a field and wrap its value in a handle typed by the field
    pub fn field_handle(&self, selector: impl Into<FieldSelector>) -> ReflectResult<ObjectHandle> {
        let field = self.field(selector)?;
        let value = self.get(&field)?;
        if !value.is_null() {
            return Ok(ObjectHandle::new(value));
        }
        let declared = match field.kind() {
            TypeKind::Optional(inner) => inner.as_ref(),
            other => other,
        };
        let ty = match declared.as_class() {
            Some(class) => registry::lookup(&class.qualified_name).ok().flatten(),
            None => None,
        };
        Ok(Self { value, ty })
    }

    /// Write `value` into `field` of the wrapped instance.
    ///
    /// The field must belong to this handle's catalog, be writable, and
    /// declare a kind that accepts the value.
    pub fn set(&self, field: &FieldDescriptor, value: Value) -> ReflectResult<()> {
        let obj = self.instance(&format!("write {}", field.name()))?;
        let ty = obj.shape();
        let Some(own) = catalog::fields(&ty).iter().find(|f| *f == field).cloned() else {
            return Err(ReflectError::FieldNotFound {
                owner: ty.name().to_string(),
                selector: format!("name '{}'", field.name()),
            });
        };
        if !own.is_writable() {
            return Err(ReflectError::access(format!(
                "{}.{} is read-only",
                field.owner(),
                field.name()
            )));
        }
        check_assignable(value.runtime_kind().as_ref(), own.kind())?;
        obj.with_mut(|s| own.write(s, value))
    }

    /// Select a field and write it
    pub fn set_field(&self, selector: impl Into<FieldSelector>, value: Value) -> ReflectResult<()> {
        let field = self.field(selector)?;
        self.set(&field, value)
    }

    // ------------------------------------------------------------------------
    // Methods
    // ------------------------------------------------------------------------

    /// Invoke the overload of `name` that best fits `args`.
    ///
    /// Overloads are looked up on the instance's own type, so a handle typed
    /// as an ancestor still reaches the derived overrides. Without an
    /// instance only static methods of the handle's type can run.
    ///
    /// The instance is locked exclusively for the duration of the call, so
    /// an argument that reaches the receiver is refused.
    pub fn invoke_method(&self, name: &str, args: Vec<Value>) -> ReflectResult<Value> {
        let instance = self.value.as_object();
        let ty = match (instance, self.ty.as_ref()) {
            (Some(obj), _) => obj.shape(),
            (None, Some(ty)) => Arc::clone(ty),
            (None, None) => {
                return Err(ReflectError::access(format!(
                    "cannot invoke {} on null: no type",
                    name
                )))
            }
        };
        let target = format!("{}.{}", ty.name(), name);
        let methods = ty.methods_named(name);
        let method = matcher::select(&target, &methods, &args)?;

        let result: Result<Value, BoxError> = if method.is_static() {
            method.call(None, args)
        } else {
            let obj = self.instance(&format!("invoke {}", name))?;
            let mut visited = FxHashSet::default();
            if args.iter().any(|arg| reaches(arg, obj, &mut visited)) {
                Err(ReflectError::access(format!(
                    "{} receives its own receiver as an argument",
                    target
                ))
                .into())
            } else {
                obj.with_mut(|s| method.call(Some(s.as_any_mut()), args))
            }
        };

        result.map_err(|source| {
            warn!(method = %target, error = %source, "method invocation failed");
            ReflectError::InvocationFailed {
                method: target,
                source,
            }
        })
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    /// Multi-line rendering with explicit settings
    pub fn render_with(&self, config: &RenderConfig) -> String {
        structural::render_value_with(&self.value, config)
    }

    /// JSON-like rendering of the wrapped value
    pub fn to_json(&self) -> String {
        structural::to_json(&self.value)
    }
}

impl From<Value> for ObjectHandle {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl PartialEq for ObjectHandle {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&structural::render_value(&self.value))
    }
}

impl fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectHandle")
            .field("value", &self.value)
            .field("ty", &self.ty.as_ref().map(|ty| ty.name()))
            .finish()
    }
}
