use refract_types::TypeKind;

use super::AbstractTuple;
use crate::shape::{Describe, TypeDescriptor};
use crate::value::IntoValue;

/// Tuple with `first`, `second`, and `third` slots
#[derive(Clone)]
pub struct Triplet<A, B, C> {
    first: Option<A>,
    second: Option<B>,
    third: Option<C>,
}

impl<A, B, C> Triplet<A, B, C> {
    /// Triplet with every slot filled
    pub fn new(first: A, second: B, third: C) -> Self {
        Self {
            first: Some(first),
            second: Some(second),
            third: Some(third),
        }
    }

    /// Contents of the first slot
    pub fn first(&self) -> Option<&A> {
        self.first.as_ref()
    }

    /// Contents of the second slot
    pub fn second(&self) -> Option<&B> {
        self.second.as_ref()
    }

    /// Contents of the third slot
    pub fn third(&self) -> Option<&C> {
        self.third.as_ref()
    }

    /// Fill the first slot
    pub fn set_first(&mut self, first: A) -> &mut Self {
        self.first = Some(first);
        self
    }

    /// Fill the second slot
    pub fn set_second(&mut self, second: B) -> &mut Self {
        self.second = Some(second);
        self
    }

    /// Fill the third slot
    pub fn set_third(&mut self, third: C) -> &mut Self {
        self.third = Some(third);
        self
    }

    /// Fill every slot
    pub fn set(&mut self, first: A, second: B, third: C) -> &mut Self {
        self.set_first(first).set_second(second).set_third(third)
    }

    /// Check if the first slot holds a value
    pub fn has_first(&self) -> bool {
        self.first.is_some()
    }

    /// Check if the second slot holds a value
    pub fn has_second(&self) -> bool {
        self.second.is_some()
    }

    /// Check if the third slot holds a value
    pub fn has_third(&self) -> bool {
        self.third.is_some()
    }

    /// Check if the first slot holds `value`
    pub fn contains_first(&self, value: &A) -> bool
    where
        A: PartialEq,
    {
        self.first.as_ref() == Some(value)
    }

    /// Check if the second slot holds `value`
    pub fn contains_second(&self, value: &B) -> bool
    where
        B: PartialEq,
    {
        self.second.as_ref() == Some(value)
    }

    /// Check if the third slot holds `value`
    pub fn contains_third(&self, value: &C) -> bool
    where
        C: PartialEq,
    {
        self.third.as_ref() == Some(value)
    }

    /// Unwrap every slot
    pub fn into_parts(self) -> (Option<A>, Option<B>, Option<C>) {
        (self.first, self.second, self.third)
    }
}

impl<A, B, C> Default for Triplet<A, B, C> {
    fn default() -> Self {
        Self {
            first: None,
            second: None,
            third: None,
        }
    }
}

impl<A, B, C> From<(A, B, C)> for Triplet<A, B, C> {
    fn from((first, second, third): (A, B, C)) -> Self {
        Self::new(first, second, third)
    }
}

impl<A, B, C> Describe for Triplet<A, B, C>
where
    A: IntoValue + Clone + Send + Sync + 'static,
    B: IntoValue + Clone + Send + Sync + 'static,
    C: IntoValue + Clone + Send + Sync + 'static,
{
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("Triplet")
            .slot("first", TypeKind::optional(A::value_kind()), |t| {
                t.first.clone().into_value()
            })
            .slot("second", TypeKind::optional(B::value_kind()), |t| {
                t.second.clone().into_value()
            })
            .slot("third", TypeKind::optional(C::value_kind()), |t| {
                t.third.clone().into_value()
            })
            .build()
    }
}

impl<A, B, C> AbstractTuple for Triplet<A, B, C>
where
    A: IntoValue + Clone + Send + Sync + 'static,
    B: IntoValue + Clone + Send + Sync + 'static,
    C: IntoValue + Clone + Send + Sync + 'static,
{
    type Refs<'a> = (&'a A, &'a B, &'a C) where Self: 'a;

    fn refs(&self) -> Option<(&A, &B, &C)> {
        Some((
            self.first.as_ref()?,
            self.second.as_ref()?,
            self.third.as_ref()?,
        ))
    }
}

tuple_impls!(Triplet<A, B, C>);
