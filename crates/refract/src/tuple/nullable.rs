use refract_types::TypeKind;

use super::{AbstractTuple, Singlet};
use crate::shape::{Describe, TypeDescriptor};
use crate::value::{IntoValue, Value};

/// A [`Singlet`] that remembers whether it was ever set.
///
/// Setting the slot to `None` still counts as present; only
/// [`unset_value`](Self::unset_value) or the default make it absent.
#[derive(Clone)]
pub struct NullableSinglet<A> {
    inner: Singlet<A>,
    present: bool,
}

impl<A> NullableSinglet<A> {
    /// Present singlet holding `value`, which may be nothing
    pub fn new(value: Option<A>) -> Self {
        Self {
            inner: Singlet { value },
            present: true,
        }
    }

    /// Present singlet holding `value`
    pub fn of(value: A) -> Self {
        Self::new(Some(value))
    }

    /// Contents of the slot
    pub fn get(&self) -> Option<&A> {
        self.inner.value()
    }

    /// Set the slot, marking it present even for `None`
    pub fn set_value(&mut self, value: Option<A>) -> &mut Self {
        self.inner.value = value;
        self.present = true;
        self
    }

    /// Clear the slot and mark it absent
    pub fn unset_value(&mut self) -> &mut Self {
        self.inner.value = None;
        self.present = false;
        self
    }

    /// Check if the slot has been set
    pub fn has_value(&self) -> bool {
        self.present
    }

    /// View as a plain singlet
    pub fn as_singlet(&self) -> &Singlet<A> {
        &self.inner
    }
}

impl<A> Default for NullableSinglet<A> {
    fn default() -> Self {
        Self {
            inner: Singlet::default(),
            present: false,
        }
    }
}

impl<A> Describe for NullableSinglet<A>
where
    A: IntoValue + Clone + Send + Sync + 'static,
{
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>("NullableSinglet")
            .extends(Singlet::<A>::descriptor(), |n| &n.inner, |n| &mut n.inner)
            .field("present", TypeKind::BOOL, |n| Value::Bool(n.present))
            .build()
    }
}

impl<A> AbstractTuple for NullableSinglet<A>
where
    A: IntoValue + Clone + Send + Sync + 'static,
{
    type Refs<'a> = Option<&'a A> where Self: 'a;

    fn refs(&self) -> Option<Option<&A>> {
        self.present.then(|| self.inner.value())
    }

    fn is_present(&self) -> bool {
        self.present
    }

    fn is_empty(&self) -> bool {
        !self.present
    }
}

tuple_impls!(NullableSinglet<A>);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn test_explicit_nothing_is_present() {
        let mut n = NullableSinglet::<String>::default();
        assert!(!n.is_present());
        n.set_value(None);
        assert!(n.is_present());
        assert!(n.get().is_none());
        n.unset_value();
        assert!(!n.is_present());
    }

    #[test]
    fn test_catalog_lists_own_field_before_inherited_slot() {
        let ty = NullableSinglet::<i32>::descriptor();
        assert_eq!(catalog::field_names(&ty), vec!["present", "value"]);
        assert_eq!(catalog::slots(&ty).len(), 1);
    }

    #[test]
    fn test_if_present_passes_possibly_empty_value() {
        let mut seen = Some(Some(0));
        NullableSinglet::<i32>::new(None).if_present(|v| seen = Some(v.copied()));
        assert_eq!(seen, Some(None));
    }

    #[test]
    fn test_display_and_equality() {
        let a = NullableSinglet::of(1);
        let b = NullableSinglet::of(1);
        assert_eq!(a, b);
        assert_ne!(a, NullableSinglet::new(None));
        assert_eq!(a.to_string(), "NullableSinglet{present: true, value: 1}");
    }

    #[test]
    fn test_kind_descends_from_singlet() {
        let kind = NullableSinglet::<i32>::value_kind();
        let class = kind.as_class().unwrap();
        assert_eq!(
            class.ancestors,
            vec![Singlet::<i32>::descriptor().qualified_name().to_string()]
        );
    }
}
