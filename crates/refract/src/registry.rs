//! Shape registry
//!
//! Process-wide intern table for [`TypeDescriptor`]s, keyed by `TypeId`,
//! plus a name index used by by-name construction.
//!
//! Descriptors are built outside any lock so that a `describe()` body may
//! itself intern other types (a parent, a slot kind). When two threads race
//! on the same type both may build, but only the first published descriptor
//! is ever handed out.

use std::any::TypeId;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::error::{ReflectError, ReflectResult};
use crate::shape::{Describe, TypeDescriptor};

static SHAPES: Lazy<DashMap<TypeId, Arc<TypeDescriptor>>> = Lazy::new(DashMap::new);

/// Qualified and simple names to descriptors
static NAMES: Lazy<DashMap<String, Vec<Arc<TypeDescriptor>>>> = Lazy::new(DashMap::new);

/// Get the interned descriptor of `T`, building it with `build` on first use
pub fn intern<T: 'static>(build: fn() -> TypeDescriptor) -> Arc<TypeDescriptor> {
    let id = TypeId::of::<T>();
    if let Some(found) = SHAPES.get(&id) {
        return found.value().clone();
    }

    let built = Arc::new(build());
    let published = SHAPES
        .entry(id)
        .or_insert_with(|| built.clone())
        .value()
        .clone();

    if Arc::ptr_eq(&published, &built) {
        index(&published);
        debug!(
            name = published.name(),
            qualified = published.qualified_name(),
            fields = published.declared_fields().len(),
            "registered shape"
        );
    }
    published
}

fn index(ty: &Arc<TypeDescriptor>) {
    NAMES
        .entry(ty.qualified_name().to_string())
        .or_default()
        .push(ty.clone());
    if ty.name() != ty.qualified_name() {
        NAMES.entry(ty.name().to_string()).or_default().push(ty.clone());
    }
}

/// Register `T` so it can be found by name
pub fn register<T: Describe>() -> Arc<TypeDescriptor> {
    T::descriptor()
}

/// Look up a registered type by qualified or simple name.
///
/// Returns `Ok(None)` for unknown names and [`ReflectError::AmbiguousMatch`]
/// when a simple name is shared by several types.
pub fn lookup(name: &str) -> ReflectResult<Option<Arc<TypeDescriptor>>> {
    let Some(entry) = NAMES.get(name) else {
        return Ok(None);
    };
    if let Some(exact) = entry.iter().find(|ty| ty.qualified_name() == name) {
        return Ok(Some(exact.clone()));
    }
    match entry.as_slice() {
        [single] => Ok(Some(single.clone())),
        [] => Ok(None),
        many => Err(ReflectError::AmbiguousMatch {
            target: name.to_string(),
            candidates: many.iter().map(|ty| ty.qualified_name().to_string()).collect(),
        }),
    }
}

/// Get the descriptor for a `TypeId`, if that type has been interned
pub fn get(id: TypeId) -> Option<Arc<TypeDescriptor>> {
    SHAPES.get(&id).map(|entry| entry.value().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use refract_types::TypeKind;

    struct Probe;

    impl Describe for Probe {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::builder::<Probe>("RegistryProbe")
                .field("n", TypeKind::INT, |_| crate::Value::Int(0))
                .build()
        }
    }

    struct First;
    struct Second;

    impl Describe for First {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::builder::<First>("Twin")
                .qualified_name("registry::a::Twin")
                .build()
        }
    }

    impl Describe for Second {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::builder::<Second>("Twin")
                .qualified_name("registry::b::Twin")
                .build()
        }
    }

    #[test]
    fn test_intern_returns_same_descriptor() {
        let a = Probe::descriptor();
        let b = Probe::descriptor();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&get(TypeId::of::<Probe>()).unwrap(), &a));
    }

    #[test]
    fn test_lookup_by_simple_and_qualified_name() {
        let ty = register::<Probe>();
        let by_simple = lookup("RegistryProbe").unwrap().unwrap();
        assert!(Arc::ptr_eq(&ty, &by_simple));
        let by_qualified = lookup(ty.qualified_name()).unwrap().unwrap();
        assert!(Arc::ptr_eq(&ty, &by_qualified));
        assert!(lookup("NoSuchType").unwrap().is_none());
    }

    #[test]
    fn test_shared_simple_name_is_ambiguous() {
        register::<First>();
        register::<Second>();
        assert!(matches!(
            lookup("Twin"),
            Err(ReflectError::AmbiguousMatch { .. })
        ));
        let a = lookup("registry::a::Twin").unwrap().unwrap();
        assert_eq!(a.qualified_name(), "registry::a::Twin");
    }

    #[test]
    fn test_concurrent_intern_publishes_one_descriptor() {
        struct Raced;
        impl Describe for Raced {
            fn describe() -> TypeDescriptor {
                TypeDescriptor::builder::<Raced>("Raced").build()
            }
        }

        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(Raced::descriptor))
            .collect();
        let all: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(all.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }
}
