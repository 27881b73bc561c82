//! Tuple family
//!
//! Small structural containers with positional slots, each slot possibly
//! empty:
//!
//! - [`Singlet`]: one slot, `value`
//! - [`Pair`]: `key` and `value`
//! - [`Triplet`]: `first`, `second`, `third`
//! - [`NullableSinglet`]: a `Singlet` that distinguishes "explicitly set to
//!   nothing" from "never set"
//!
//! All of them share the [`AbstractTuple`] operations. Slots are catalogued
//! fields flagged [`FieldFlags::SLOT`](crate::FieldFlags::SLOT), so tuples
//! compare, hash, and print like any other structural value.

/// Structural trait wiring shared by the generic tuple types
macro_rules! tuple_impls {
    ($ty:ident < $($param:ident),+ >) => {
        impl<$($param),+> ::core::cmp::PartialEq for $ty<$($param),+>
        where
            $ty<$($param),+>: $crate::Describe,
        {
            fn eq(&self, other: &Self) -> bool {
                $crate::structural::equals(self, other)
            }
        }

        impl<$($param),+> ::core::cmp::Eq for $ty<$($param),+> where $ty<$($param),+>: $crate::Describe {}

        impl<$($param),+> ::core::hash::Hash for $ty<$($param),+>
        where
            $ty<$($param),+>: $crate::Describe,
        {
            fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
                $crate::structural::hash_into(self, state)
            }
        }

        impl<$($param),+> ::core::fmt::Display for $ty<$($param),+>
        where
            $ty<$($param),+>: $crate::Describe,
        {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&$crate::structural::inline(self))
            }
        }

        impl<$($param),+> ::core::fmt::Debug for $ty<$($param),+>
        where
            $ty<$($param),+>: $crate::Describe,
        {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&$crate::structural::inline(self))
            }
        }

        impl<$($param),+> $crate::IntoValue for $ty<$($param),+>
        where
            $ty<$($param),+>: $crate::Describe,
        {
            fn into_value(self) -> $crate::Value {
                $crate::Value::Object($crate::Object::new(self))
            }

            fn value_kind() -> $crate::TypeKind {
                <Self as $crate::Describe>::descriptor().kind()
            }
        }

        impl<$($param),+> $crate::FromValue for $ty<$($param),+>
        where
            $ty<$($param),+>: $crate::Describe + Clone,
        {
            fn from_value(value: $crate::Value) -> $crate::ReflectResult<Self> {
                let found = value.type_name();
                value
                    .as_object()
                    .and_then($crate::Object::downcast_clone::<Self>)
                    .ok_or_else(|| {
                        $crate::TypeError::NotAssignable {
                            from: found,
                            to: stringify!($ty).to_string(),
                        }
                        .into()
                    })
            }
        }
    };
}

mod nullable;
mod pair;
mod singlet;
mod triplet;

pub use nullable::NullableSinglet;
pub use pair::Pair;
pub use singlet::Singlet;
pub use triplet::Triplet;

use crate::catalog;
use crate::shape::Describe;
use crate::value::Value;

/// Operations shared by every tuple type
pub trait AbstractTuple: Describe + Clone + Default {
    /// Borrowed view of all slot contents, handed to presence callbacks
    type Refs<'a>
    where
        Self: 'a;

    /// Borrow all slots, or `None` if any slot is empty
    fn refs(&self) -> Option<Self::Refs<'_>>;

    /// Slot values in declaration order, `Null` for empty slots
    fn slot_values(&self) -> Vec<Value> {
        catalog::slots(&Self::descriptor())
            .iter()
            .map(|slot| slot.read(self).unwrap_or(Value::Null))
            .collect()
    }

    /// Check if every slot holds a value
    fn is_present(&self) -> bool {
        self.slot_values().iter().all(|v| !v.is_null())
    }

    /// Check if every slot is empty
    fn is_empty(&self) -> bool {
        self.slot_values().iter().all(Value::is_null)
    }

    /// Shallow copy: slot contents are cloned, shared objects stay shared
    fn copy(&self) -> Self {
        self.clone()
    }

    /// A tuple of this type with every slot empty
    fn empty() -> Self {
        Self::default()
    }

    /// Run `action` with the slot contents if the tuple is present
    fn if_present<'a, F>(&'a self, action: F) -> &'a Self
    where
        F: FnOnce(Self::Refs<'a>),
    {
        if self.is_present() {
            if let Some(refs) = self.refs() {
                action(refs);
            }
        }
        self
    }

    /// Run `action` if every slot is empty
    fn or_else<F: FnOnce()>(&self, action: F) -> &Self {
        if self.is_empty() {
            action();
        }
        self
    }

    /// [`if_present`](Self::if_present) then [`or_else`](Self::or_else);
    /// a partially filled tuple runs neither
    fn if_present_or_else<'a, F, G>(&'a self, present: F, absent: G) -> &'a Self
    where
        F: FnOnce(Self::Refs<'a>),
        G: FnOnce(),
    {
        self.if_present(present).or_else(absent)
    }

    /// A copy of this tuple if it is present and satisfies `predicate`,
    /// otherwise an empty tuple
    fn filter<'a, P>(&'a self, predicate: P) -> Self
    where
        P: FnOnce(Self::Refs<'a>) -> bool,
    {
        if !self.is_present() {
            return Self::empty();
        }
        match self.refs() {
            Some(refs) => {
                if predicate(refs) {
                    self.copy()
                } else {
                    Self::empty()
                }
            }
            None => Self::empty(),
        }
    }
}
