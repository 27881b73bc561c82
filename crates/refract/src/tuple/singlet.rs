use refract_types::TypeKind;

use super::AbstractTuple;
use crate::shape::{Describe, TypeDescriptor};
use crate::value::IntoValue;

/// Tuple with a single `value` slot
#[derive(Clone)]
pub struct Singlet<A> {
    pub(super) value: Option<A>,
}

impl<A> Singlet<A> {
    /// Singlet holding `value`
    pub fn new(value: A) -> Self {
        Self { value: Some(value) }
    }

    /// Contents of the slot
    pub fn value(&self) -> Option<&A> {
        self.value.as_ref()
    }

    /// Fill the slot
    pub fn set_value(&mut self, value: A) -> &mut Self {
        self.value = Some(value);
        self
    }

    /// Empty the slot, returning what it held
    pub fn take_value(&mut self) -> Option<A> {
        self.value.take()
    }

    /// Check if the slot holds a value
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Check if the slot holds `value`
    pub fn contains_value(&self, value: &A) -> bool
    where
        A: PartialEq,
    {
        self.value.as_ref() == Some(value)
    }

    /// Unwrap the slot
    pub fn into_inner(self) -> Option<A> {
        self.value
    }
}

impl<A> Default for Singlet<A> {
    fn default() -> Self {
        Self { value: None }
    }
}

impl<A> From<A> for Singlet<A> {
    fn from(value: A) -> Self {
        Self::new(value)
    }
}

impl<A> Describe for Singlet<A>
where
    A: IntoValue + Clone + Send + Sync + 'static,
{
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("Singlet")
            .slot("value", TypeKind::optional(A::value_kind()), |s| {
                s.value.clone().into_value()
            })
            .build()
    }
}

impl<A> AbstractTuple for Singlet<A>
where
    A: IntoValue + Clone + Send + Sync + 'static,
{
    type Refs<'a> = &'a A where Self: 'a;

    fn refs(&self) -> Option<&A> {
        self.value.as_ref()
    }
}

tuple_impls!(Singlet<A>);
