//! Assignability rules
//!
//! Implements the relation `from ⊑ to`: a value whose runtime kind is `from`
//! may be passed where `to` is declared. The relation covers:
//!
//! - exact matches (reflexivity)
//! - numeric widening between primitives
//! - nominal subclassing through the ancestor chain
//! - interface conformance
//! - nullable wrappers (`Option<T>` accepts anything `T` accepts)
//!
//! `null` has no kind; [`accepts_null`] decides whether a declared kind may
//! receive it.

use crate::error::TypeError;
use crate::ty::TypeKind;

/// Check if a value of kind `from` can be used where `to` is declared
pub fn is_assignable(from: &TypeKind, to: &TypeKind) -> bool {
    // Reflexivity
    if from == to {
        return true;
    }

    match (from, to) {
        (_, TypeKind::Any) => true,

        (TypeKind::Optional(from_inner), TypeKind::Optional(to_inner)) => {
            is_assignable(from_inner, to_inner)
        }
        (_, TypeKind::Optional(to_inner)) => is_assignable(from, to_inner),
        // A nullable value may be absent, so it never fits a non-nullable slot
        (TypeKind::Optional(_), _) => false,

        (TypeKind::Primitive(p1), TypeKind::Primitive(p2)) => p1.widens_to(*p2),

        (TypeKind::Class(sub), TypeKind::Class(sup)) => sub.is_subclass_of(&sup.qualified_name),
        (TypeKind::Class(class), TypeKind::Interface(name)) => class.implements(name),

        _ => false,
    }
}

/// Check if a declared kind may receive `null`
pub fn accepts_null(to: &TypeKind) -> bool {
    !to.is_primitive()
}

/// Check if `narrow` is assignable to `wide` but not the other way round
pub fn is_strictly_narrower(narrow: &TypeKind, wide: &TypeKind) -> bool {
    is_assignable(narrow, wide) && !is_assignable(wide, narrow)
}

/// Like [`is_assignable`], but `None` stands for a null value and the failure
/// is reported as a [`TypeError`].
pub fn check_assignable(from: Option<&TypeKind>, to: &TypeKind) -> Result<(), TypeError> {
    match from {
        None if accepts_null(to) => Ok(()),
        None => Err(TypeError::NullToPrimitive {
            to: to.type_name(),
        }),
        Some(from) if is_assignable(from, to) => Ok(()),
        Some(from) => Err(TypeError::NotAssignable {
            from: from.type_name(),
            to: to.type_name(),
        }),
    }
}
