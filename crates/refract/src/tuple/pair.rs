use refract_types::TypeKind;

use super::AbstractTuple;
use crate::shape::{Describe, TypeDescriptor};
use crate::value::IntoValue;

/// Tuple with `key` and `value` slots
#[derive(Clone)]
pub struct Pair<K, V> {
    key: Option<K>,
    value: Option<V>,
}

impl<K, V> Pair<K, V> {
    /// Pair with both slots filled
    pub fn new(key: K, value: V) -> Self {
        Self {
            key: Some(key),
            value: Some(value),
        }
    }

    /// Contents of the key slot
    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    /// Contents of the value slot
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Fill the key slot
    pub fn set_key(&mut self, key: K) -> &mut Self {
        self.key = Some(key);
        self
    }

    /// Fill the value slot
    pub fn set_value(&mut self, value: V) -> &mut Self {
        self.value = Some(value);
        self
    }

    /// Fill both slots
    pub fn set(&mut self, key: K, value: V) -> &mut Self {
        self.set_key(key).set_value(value)
    }

    /// Check if the key slot holds a value
    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }

    /// Check if the value slot holds a value
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Check if the key slot holds `key`
    pub fn contains_key(&self, key: &K) -> bool
    where
        K: PartialEq,
    {
        self.key.as_ref() == Some(key)
    }

    /// Check if the value slot holds `value`
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.value.as_ref() == Some(value)
    }

    /// Unwrap both slots
    pub fn into_parts(self) -> (Option<K>, Option<V>) {
        (self.key, self.value)
    }
}

impl<K, V> Default for Pair<K, V> {
    fn default() -> Self {
        Self {
            key: None,
            value: None,
        }
    }
}

impl<K, V> From<(K, V)> for Pair<K, V> {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

impl<K, V> Describe for Pair<K, V>
where
    K: IntoValue + Clone + Send + Sync + 'static,
    V: IntoValue + Clone + Send + Sync + 'static,
{
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("Pair")
            .slot("key", TypeKind::optional(K::value_kind()), |p| {
                p.key.clone().into_value()
            })
            .slot("value", TypeKind::optional(V::value_kind()), |p| {
                p.value.clone().into_value()
            })
            .build()
    }
}

impl<K, V> AbstractTuple for Pair<K, V>
where
    K: IntoValue + Clone + Send + Sync + 'static,
    V: IntoValue + Clone + Send + Sync + 'static,
{
    type Refs<'a> = (&'a K, &'a V) where Self: 'a;

    fn refs(&self) -> Option<(&K, &V)> {
        Some((self.key.as_ref()?, self.value.as_ref()?))
    }
}

tuple_impls!(Pair<K, V>);
