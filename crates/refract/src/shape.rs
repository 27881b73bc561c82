//! Type descriptors
//!
//! A [`TypeDescriptor`] is the runtime shape of a structural type: its name,
//! its declared fields with accessors, its constructors and methods, the
//! parent it extends and the interfaces it implements.
//!
//! Descriptors are assembled once per type through [`ShapeBuilder`] and
//! interned in the [registry](crate::registry), so every call to
//! [`Describe::descriptor`] for the same type returns the same `Arc`.
//!
//! # Example
//!
//! ```ignore
//! impl Describe for Point {
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::builder::<Point>("Point")
//!             .field("x", TypeKind::INT, |p| p.x.into_value())
//!             .field("y", TypeKind::INT, |p| p.y.into_value())
//!             .constructor(vec![TypeKind::INT, TypeKind::INT], |args| {
//!                 Ok(Point { x: args.take()?, y: args.take()? })
//!             })
//!             .build()
//!     }
//! }
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use refract_types::{ClassType, TypeKind};

use crate::error::{BoxError, ReflectError, ReflectResult};
use crate::registry;
use crate::value::{FromValue, Value};

// ============================================================================
// Structural Traits
// ============================================================================

/// A value whose fields can be enumerated and read at runtime.
///
/// Implemented for every [`Describe`] type; use `dyn Structural` to hold
/// instances of different types side by side.
pub trait Structural: Send + Sync + 'static {
    /// Interned descriptor of the concrete type
    fn shape(&self) -> Arc<TypeDescriptor>;

    /// Upcast for downcasting by accessors
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for setters and method receivers
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Static shape declaration for a type
pub trait Describe: Sized + Send + Sync + 'static {
    /// Build the descriptor. Called at most once per type by the registry.
    fn describe() -> TypeDescriptor;

    /// Interned descriptor for this type
    fn descriptor() -> Arc<TypeDescriptor> {
        registry::intern::<Self>(Self::describe)
    }
}

impl<T: Describe> Structural for T {
    fn shape(&self) -> Arc<TypeDescriptor> {
        T::descriptor()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ============================================================================
// Field Descriptors
// ============================================================================

/// Field flags (bitflags)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FieldFlags(u8);

impl FieldFlags {
    /// Ordinary instance field
    pub const NONE: Self = Self(0x00);
    /// Belongs to the type, not to instances
    pub const STATIC: Self = Self(0x01);
    /// Generated bookkeeping, hidden from catalogs
    pub const SYNTHETIC: Self = Self(0x02);
    /// Positional tuple slot
    pub const SLOT: Self = Self(0x04);

    /// Get raw bits
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Check if all flags in `other` are set
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Combine two flag sets
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl std::ops::BitOr for FieldFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

type Getter = Arc<dyn Fn(&dyn Any) -> ReflectResult<Value> + Send + Sync>;
type Setter = Arc<dyn Fn(&mut dyn Any, Value) -> ReflectResult<()> + Send + Sync>;
type Projection = Arc<dyn for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync>;
type ProjectionMut =
    Arc<dyn for<'a> Fn(&'a mut dyn Any) -> Option<&'a mut dyn Any> + Send + Sync>;
type ConstructorFn = Arc<dyn Fn(&mut Args) -> Result<Box<dyn Structural>, BoxError> + Send + Sync>;
type MethodFn =
    Arc<dyn Fn(Option<&mut dyn Any>, &mut Args) -> Result<Value, BoxError> + Send + Sync>;

fn projection<F>(f: F) -> Projection
where
    F: for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn projection_mut<F>(f: F) -> ProjectionMut
where
    F: for<'a> Fn(&'a mut dyn Any) -> Option<&'a mut dyn Any> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn wrong_receiver(owner: &str, member: &str) -> ReflectError {
    ReflectError::access(format!("{}.{} read from a value of another type", owner, member))
}

/// A declared field and its accessors
#[derive(Clone)]
pub struct FieldDescriptor {
    name: String,
    kind: TypeKind,
    owner: String,
    flags: FieldFlags,
    getter: Getter,
    setter: Option<Setter>,
}

impl FieldDescriptor {
    /// Field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared kind
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// Simple name of the declaring type
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Field flags
    pub fn flags(&self) -> FieldFlags {
        self.flags
    }

    /// Check if this is a static field
    pub fn is_static(&self) -> bool {
        self.flags.contains(FieldFlags::STATIC)
    }

    /// Check if this is a synthetic field
    pub fn is_synthetic(&self) -> bool {
        self.flags.contains(FieldFlags::SYNTHETIC)
    }

    /// Check if this is a positional tuple slot
    pub fn is_slot(&self) -> bool {
        self.flags.contains(FieldFlags::SLOT)
    }

    /// Check if the field accepts writes
    pub fn is_writable(&self) -> bool {
        self.setter.is_some() && !self.is_static()
    }

    /// Read the field from `target`
    pub fn read(&self, target: &dyn Structural) -> ReflectResult<Value> {
        (self.getter)(target.as_any())
    }

    /// Read a static field; instance fields fail
    pub fn read_static(&self) -> ReflectResult<Value> {
        if !self.is_static() {
            return Err(ReflectError::access(format!(
                "{}.{} is an instance field",
                self.owner, self.name
            )));
        }
        (self.getter)(&())
    }

    /// Write the field on `target`.
    ///
    /// Performs no assignability check; callers go through
    /// [`ObjectHandle::set`](crate::ObjectHandle::set) for that.
    pub fn write(&self, target: &mut dyn Structural, value: Value) -> ReflectResult<()> {
        match &self.setter {
            Some(setter) if !self.is_static() => setter(target.as_any_mut(), value),
            _ => Err(ReflectError::access(format!(
                "{}.{} is read-only",
                self.owner, self.name
            ))),
        }
    }

    /// Re-root accessors on a parent reached through `project`
    pub(crate) fn inherited(&self, project: &Projection, project_mut: &ProjectionMut) -> Self {
        let getter = self.getter.clone();
        let project = project.clone();
        let (owner, name) = (self.owner.clone(), self.name.clone());
        let inherited_getter: Getter = Arc::new(move |any: &dyn Any| match project(any) {
            Some(parent) => getter(parent),
            None => Err(wrong_receiver(&owner, &name)),
        });

        let inherited_setter = self.setter.clone().map(|setter| {
            let project_mut = project_mut.clone();
            let (owner, name) = (self.owner.clone(), self.name.clone());
            let setter: Setter = Arc::new(move |any: &mut dyn Any, value: Value| match project_mut(any) {
                Some(parent) => setter(parent, value),
                None => Err(wrong_receiver(&owner, &name)),
            });
            setter
        });

        FieldDescriptor {
            name: self.name.clone(),
            kind: self.kind.clone(),
            owner: self.owner.clone(),
            flags: self.flags,
            getter: inherited_getter,
            setter: inherited_setter,
        }
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("owner", &self.owner)
            .field("flags", &self.flags)
            .field("writable", &self.is_writable())
            .finish()
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {}", self.owner, self.name, self.kind)
    }
}

impl PartialEq for FieldDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && self.name == other.name && self.kind == other.kind
    }
}

// ============================================================================
// Arguments
// ============================================================================

/// Positional argument cursor handed to constructor and method bodies
#[derive(Debug)]
pub struct Args {
    values: std::vec::IntoIter<Value>,
    position: usize,
}

impl Args {
    /// Wrap argument values
    pub fn new(values: Vec<Value>) -> Self {
        Self {
            values: values.into_iter(),
            position: 0,
        }
    }

    /// Number of arguments not yet taken
    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    /// Take the next argument, converting it to `T`
    pub fn take<T: FromValue>(&mut self) -> ReflectResult<T> {
        let position = self.position;
        self.position += 1;
        match self.values.next() {
            Some(value) => T::from_value(value),
            None => Err(ReflectError::access(format!("missing argument {}", position))),
        }
    }

    /// Take the next argument as a raw value
    pub fn take_value(&mut self) -> ReflectResult<Value> {
        self.take::<Value>()
    }
}

// ============================================================================
// Constructors and Methods
// ============================================================================

/// A constructor signature with its body
#[derive(Clone)]
pub struct Constructor {
    owner: String,
    params: Vec<TypeKind>,
    body: ConstructorFn,
}

impl Constructor {
    /// Name of the constructed type
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Declared parameter kinds
    pub fn params(&self) -> &[TypeKind] {
        &self.params
    }

    pub(crate) fn call(&self, args: Vec<Value>) -> Result<Box<dyn Structural>, BoxError> {
        (self.body)(&mut Args::new(args))
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("owner", &self.owner)
            .field("params", &self.params)
            .finish()
    }
}

/// A method signature with its body
#[derive(Clone)]
pub struct Method {
    name: String,
    owner: String,
    params: Vec<TypeKind>,
    is_static: bool,
    body: MethodFn,
}

impl Method {
    /// Method name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Simple name of the declaring type
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Declared parameter kinds
    pub fn params(&self) -> &[TypeKind] {
        &self.params
    }

    /// Check if the method is unbound
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub(crate) fn call(
        &self,
        receiver: Option<&mut dyn Any>,
        args: Vec<Value>,
    ) -> Result<Value, BoxError> {
        (self.body)(receiver, &mut Args::new(args))
    }

    fn inherited(&self, project_mut: &ProjectionMut) -> Self {
        let body = self.body.clone();
        let project_mut = project_mut.clone();
        let (owner, name) = (self.owner.clone(), self.name.clone());
        let inherited: MethodFn = Arc::new(move |receiver: Option<&mut dyn Any>, args: &mut Args| match receiver {
            Some(any) => match project_mut(any) {
                Some(parent) => body(Some(parent), args),
                None => Err(wrong_receiver(&owner, &name).into()),
            },
            None => body(None, args),
        });
        Method {
            body: inherited,
            ..self.clone()
        }
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("owner", &self.owner)
            .field("params", &self.params)
            .field("is_static", &self.is_static)
            .finish()
    }
}

// ============================================================================
// Type Descriptor
// ============================================================================

struct ParentLink {
    descriptor: Arc<TypeDescriptor>,
    project: Projection,
    project_mut: ProjectionMut,
}

/// Runtime shape of a structural type
pub struct TypeDescriptor {
    name: String,
    qualified_name: String,
    type_id: TypeId,
    parent: Option<ParentLink>,
    fields: Vec<FieldDescriptor>,
    constructors: Vec<Constructor>,
    methods: Vec<Method>,
    interfaces: Vec<String>,
    pub(crate) catalog: OnceCell<Arc<[FieldDescriptor]>>,
}

impl TypeDescriptor {
    /// Start describing `T`
    pub fn builder<T: Send + Sync + 'static>(name: impl Into<String>) -> ShapeBuilder<T> {
        ShapeBuilder {
            name: name.into(),
            qualified_name: std::any::type_name::<T>().to_string(),
            parent: None,
            fields: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
            interfaces: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Simple name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fully qualified name
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Rust type id of the described type
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Direct parent, if any
    pub fn parent(&self) -> Option<&Arc<TypeDescriptor>> {
        self.parent.as_ref().map(|link| &link.descriptor)
    }

    /// Ancestors, nearest first
    pub fn ancestors(&self) -> impl Iterator<Item = &Arc<TypeDescriptor>> {
        std::iter::successors(self.parent(), |ty| ty.parent())
    }

    /// Fields declared directly on this type, in declaration order.
    ///
    /// Includes static and synthetic fields; see [`crate::catalog`] for the
    /// flattened instance view.
    pub fn declared_fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Constructors declared on this type
    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }

    /// Methods declared directly on this type
    pub fn declared_methods(&self) -> &[Method] {
        &self.methods
    }

    /// Methods named `name`, including inherited ones.
    ///
    /// An inherited method with the same parameter list as one already
    /// collected is overridden and left out.
    pub fn methods_named(&self, name: &str) -> Vec<Method> {
        let mut found: Vec<Method> = self
            .methods
            .iter()
            .filter(|m| m.name == name)
            .cloned()
            .collect();
        if let Some(link) = &self.parent {
            for method in link.descriptor.methods_named(name) {
                if !found.iter().any(|m| m.params == method.params) {
                    found.push(method.inherited(&link.project_mut));
                }
            }
        }
        found
    }

    /// Static fields of this type and its ancestors
    pub fn static_fields(&self) -> Vec<FieldDescriptor> {
        let mut statics: Vec<FieldDescriptor> =
            self.fields.iter().filter(|f| f.is_static()).cloned().collect();
        if let Some(parent) = self.parent() {
            statics.extend(parent.static_fields());
        }
        statics
    }

    /// Interfaces implemented by this type or its ancestors
    pub fn interfaces(&self) -> Vec<String> {
        let mut all = self.interfaces.clone();
        for ancestor in self.ancestors() {
            for iface in &ancestor.interfaces {
                if !all.contains(iface) {
                    all.push(iface.clone());
                }
            }
        }
        all
    }

    /// Class kind of instances of this type
    pub fn kind(&self) -> TypeKind {
        let mut class = ClassType::new(self.name.clone(), self.qualified_name.clone());
        class.ancestors = self
            .ancestors()
            .map(|a| a.qualified_name.clone())
            .collect();
        class.interfaces = self.interfaces();
        TypeKind::Class(class)
    }

    /// Check if this type is `other` or descends from it
    pub fn is_subtype_of(&self, other: &TypeDescriptor) -> bool {
        self.type_id == other.type_id || self.ancestors().any(|a| a.type_id == other.type_id)
    }

    pub(crate) fn parent_projections(&self) -> Option<(&Projection, &ProjectionMut)> {
        self.parent
            .as_ref()
            .map(|link| (&link.project, &link.project_mut))
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("qualified_name", &self.qualified_name)
            .field("parent", &self.parent().map(|p| p.name()))
            .field("fields", &self.fields)
            .field("constructors", &self.constructors.len())
            .field("methods", &self.methods.len())
            .field("interfaces", &self.interfaces)
            .finish()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for a [`TypeDescriptor`] of `T`
pub struct ShapeBuilder<T> {
    name: String,
    qualified_name: String,
    parent: Option<ParentLink>,
    fields: Vec<FieldDescriptor>,
    constructors: Vec<Constructor>,
    methods: Vec<Method>,
    interfaces: Vec<String>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> ShapeBuilder<T> {
    /// Override the qualified name (defaults to the Rust type name)
    pub fn qualified_name(mut self, qualified_name: impl Into<String>) -> Self {
        self.qualified_name = qualified_name.into();
        self
    }

    fn push_field(
        mut self,
        name: &str,
        kind: TypeKind,
        flags: FieldFlags,
        getter: Getter,
        setter: Option<Setter>,
    ) -> Self {
        self.fields.push(FieldDescriptor {
            name: name.to_string(),
            kind,
            owner: self.name.clone(),
            flags,
            getter,
            setter,
        });
        self
    }

    fn typed_getter<G>(&self, name: &str, get: G) -> Getter
    where
        G: Fn(&T) -> Value + Send + Sync + 'static,
    {
        let (owner, name) = (self.name.clone(), name.to_string());
        Arc::new(move |any: &dyn Any| match any.downcast_ref::<T>() {
            Some(this) => Ok(get(this)),
            None => Err(wrong_receiver(&owner, &name)),
        })
    }

    fn typed_setter<S>(&self, name: &str, set: S) -> Setter
    where
        S: Fn(&mut T, Value) -> ReflectResult<()> + Send + Sync + 'static,
    {
        let (owner, name) = (self.name.clone(), name.to_string());
        Arc::new(move |any: &mut dyn Any, value: Value| match any.downcast_mut::<T>() {
            Some(this) => set(this, value),
            None => Err(wrong_receiver(&owner, &name)),
        })
    }

    /// Declare a read-only instance field
    pub fn field<G>(self, name: &str, kind: TypeKind, get: G) -> Self
    where
        G: Fn(&T) -> Value + Send + Sync + 'static,
    {
        let getter = self.typed_getter(name, get);
        self.push_field(name, kind, FieldFlags::NONE, getter, None)
    }

    /// Declare a writable instance field
    pub fn field_mut<G, S>(self, name: &str, kind: TypeKind, get: G, set: S) -> Self
    where
        G: Fn(&T) -> Value + Send + Sync + 'static,
        S: Fn(&mut T, Value) -> ReflectResult<()> + Send + Sync + 'static,
    {
        let getter = self.typed_getter(name, get);
        let setter = self.typed_setter(name, set);
        self.push_field(name, kind, FieldFlags::NONE, getter, Some(setter))
    }

    /// Declare a positional tuple slot
    pub fn slot<G>(self, name: &str, kind: TypeKind, get: G) -> Self
    where
        G: Fn(&T) -> Value + Send + Sync + 'static,
    {
        let getter = self.typed_getter(name, get);
        self.push_field(name, kind, FieldFlags::SLOT, getter, None)
    }

    /// Declare a synthetic field, readable but never catalogued
    pub fn synthetic_field<G>(self, name: &str, kind: TypeKind, get: G) -> Self
    where
        G: Fn(&T) -> Value + Send + Sync + 'static,
    {
        let getter = self.typed_getter(name, get);
        self.push_field(name, kind, FieldFlags::SYNTHETIC, getter, None)
    }

    /// Declare a static field
    pub fn static_field<F>(self, name: &str, kind: TypeKind, get: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        let getter: Getter = Arc::new(move |_: &dyn Any| Ok(get()));
        self.push_field(name, kind, FieldFlags::STATIC, getter, None)
    }

    /// Extend `parent`, reached from `T` through the given projections
    pub fn extends<P, R, M>(mut self, parent: Arc<TypeDescriptor>, project: R, project_mut: M) -> Self
    where
        P: 'static,
        R: for<'a> Fn(&'a T) -> &'a P + Send + Sync + 'static,
        M: for<'a> Fn(&'a mut T) -> &'a mut P + Send + Sync + 'static,
    {
        self.parent = Some(ParentLink {
            descriptor: parent,
            project: projection(move |any| {
                any.downcast_ref::<T>().map(|this| project(this) as &dyn Any)
            }),
            project_mut: projection_mut(move |any| {
                any.downcast_mut::<T>()
                    .map(|this| project_mut(this) as &mut dyn Any)
            }),
        });
        self
    }

    /// Declare an implemented interface
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Declare a constructor
    pub fn constructor<F>(mut self, params: Vec<TypeKind>, body: F) -> Self
    where
        T: Structural,
        F: Fn(&mut Args) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        let body: ConstructorFn = Arc::new(move |args: &mut Args| {
            body(args).map(|value| Box::new(value) as Box<dyn Structural>)
        });
        self.constructors.push(Constructor {
            owner: self.name.clone(),
            params,
            body,
        });
        self
    }

    /// Declare an instance method
    pub fn method<F>(mut self, name: &str, params: Vec<TypeKind>, body: F) -> Self
    where
        F: Fn(&mut T, &mut Args) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        let (owner, method) = (self.name.clone(), name.to_string());
        let body: MethodFn = Arc::new(move |receiver: Option<&mut dyn Any>, args: &mut Args| {
            match receiver.and_then(|any| any.downcast_mut::<T>()) {
                Some(this) => body(this, args),
                None => Err(wrong_receiver(&owner, &method).into()),
            }
        });
        self.methods.push(Method {
            name: name.to_string(),
            owner: self.name.clone(),
            params,
            is_static: false,
            body,
        });
        self
    }

    /// Declare a static method
    pub fn static_method<F>(mut self, name: &str, params: Vec<TypeKind>, body: F) -> Self
    where
        F: Fn(&mut Args) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        let body: MethodFn = Arc::new(move |_receiver: Option<&mut dyn Any>, args: &mut Args| body(args));
        self.methods.push(Method {
            name: name.to_string(),
            owner: self.name.clone(),
            params,
            is_static: true,
            body,
        });
        self
    }

    /// Finish the descriptor
    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor {
            name: self.name,
            qualified_name: self.qualified_name,
            type_id: TypeId::of::<T>(),
            parent: self.parent,
            fields: self.fields,
            constructors: self.constructors,
            methods: self.methods,
            interfaces: self.interfaces,
            catalog: OnceCell::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::IntoValue;

    #[derive(Clone)]
    struct Base {
        id: i64,
    }

    impl Describe for Base {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::builder::<Base>("Base")
                .field("id", TypeKind::LONG, |b| b.id.into_value())
                .static_field("VERSION", TypeKind::INT, || Value::Int(3))
                .implements("Identified")
                .method("bump", vec![], |b, _| {
                    b.id += 1;
                    Ok(Value::Long(b.id))
                })
                .build()
        }
    }

    #[derive(Clone)]
    struct Derived {
        base: Base,
        label: String,
    }

    impl Describe for Derived {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::builder::<Derived>("Derived")
                .extends(Base::descriptor(), |d| &d.base, |d| &mut d.base)
                .field_mut(
                    "label",
                    TypeKind::Str,
                    |d| d.label.clone().into_value(),
                    |d, v| {
                        d.label = String::from_value(v)?;
                        Ok(())
                    },
                )
                .synthetic_field("hidden", TypeKind::BOOL, |_| Value::Bool(true))
                .build()
        }
    }

    #[test]
    fn test_flags() {
        let flags = FieldFlags::STATIC | FieldFlags::SLOT;
        assert!(flags.contains(FieldFlags::STATIC));
        assert!(!flags.contains(FieldFlags::SYNTHETIC));
        assert_eq!(flags.bits(), 0x05);
    }

    #[test]
    fn test_kind_carries_ancestors_and_interfaces() {
        let kind = Derived::descriptor().kind();
        let class = kind.as_class().unwrap();
        assert_eq!(class.name, "Derived");
        assert_eq!(class.ancestors, vec![Base::descriptor().qualified_name().to_string()]);
        assert!(class.implements("Identified"));
    }

    #[test]
    fn test_read_and_write_declared_field() {
        let mut d = Derived {
            base: Base { id: 1 },
            label: "a".into(),
        };
        let ty = Derived::descriptor();
        let label = &ty.declared_fields()[0];
        assert!(label.is_writable());
        label.write(&mut d, Value::Str("b".into())).unwrap();
        assert_eq!(label.read(&d).unwrap(), Value::Str("b".into()));
    }

    #[test]
    fn test_getter_rejects_foreign_receiver() {
        let base = Base { id: 1 };
        let ty = Derived::descriptor();
        assert!(ty.declared_fields()[0].read(&base).is_err());
    }

    #[test]
    fn test_static_field_reads_without_instance() {
        let statics = Derived::descriptor().static_fields();
        assert_eq!(statics.len(), 1);
        assert_eq!(statics[0].read_static().unwrap(), Value::Int(3));
        assert!(Base::descriptor().declared_fields()[0].read_static().is_err());
    }

    #[test]
    fn test_inherited_method_runs_on_parent() {
        let mut d = Derived {
            base: Base { id: 41 },
            label: String::new(),
        };
        let methods = Derived::descriptor().methods_named("bump");
        assert_eq!(methods.len(), 1);
        let result = methods[0].call(Some(d.as_any_mut()), vec![]).unwrap();
        assert_eq!(result, Value::Long(42));
        assert_eq!(d.base.id, 42);
    }

    #[test]
    fn test_args_cursor() {
        let mut args = Args::new(vec![Value::Int(1), Value::Str("x".into())]);
        assert_eq!(args.take::<i64>().unwrap(), 1);
        assert_eq!(args.take::<String>().unwrap(), "x");
        assert_eq!(args.remaining(), 0);
        assert!(args.take::<i32>().is_err());
    }
}
