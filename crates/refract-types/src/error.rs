//! Type system errors

use thiserror::Error;

/// Errors produced when checking a value kind against a declared kind
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TypeError {
    /// The source kind cannot be used where the target kind is declared
    #[error("Type mismatch: {from} is not assignable to {to}")]
    NotAssignable {
        /// Kind of the supplied value
        from: String,
        /// Declared kind
        to: String,
    },

    /// A null value was supplied for a primitive slot
    #[error("Cannot assign null to primitive type {to}")]
    NullToPrimitive {
        /// Declared primitive kind
        to: String,
    },
}
