//! Refract Type Kinds
//!
//! The vocabulary used to describe declared field and parameter types, and the
//! assignability relation that signature matching is built on.

#![warn(missing_docs)]

pub mod assignability;
pub mod error;
pub mod ty;

pub use assignability::{accepts_null, check_assignable, is_assignable, is_strictly_narrower};
pub use error::TypeError;
pub use ty::{ClassType, PrimitiveType, TypeKind};
