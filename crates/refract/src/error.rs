//! Error types for introspection operations

use thiserror::Error;

/// Boxed error raised by author-supplied constructor and method bodies
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for introspection calls
pub type ReflectResult<T> = Result<T, ReflectError>;

/// Introspection error kinds
#[derive(Debug, Error)]
pub enum ReflectError {
    /// No field matched the selector, or there was no value/type to search
    #[error("Field not found: no field matching {selector} in {owner}")]
    FieldNotFound {
        /// Type that was searched (`null` if the handle wraps nothing)
        owner: String,
        /// Description of the selector
        selector: String,
    },

    /// A selector or signature matched more than one candidate
    #[error("Ambiguous match for {target}: candidates {}", .candidates.join(", "))]
    AmbiguousMatch {
        /// What was being resolved
        target: String,
        /// Descriptions of the conflicting candidates
        candidates: Vec<String>,
    },

    /// No constructor or method accepts the supplied arguments
    #[error("No matching signature for {target}({})", .arg_types.join(", "))]
    NoMatchingSignature {
        /// Constructor or method being resolved
        target: String,
        /// Runtime kinds of the supplied arguments
        arg_types: Vec<String>,
    },

    /// Type-incompatible write, unreadable field, or no wrapped value
    #[error("Invalid field access: {0}")]
    InvalidFieldAccess(String),

    /// The constructor body failed
    #[error("Construction of {type_name} failed: {source}")]
    ConstructionFailed {
        /// Type being constructed
        type_name: String,
        /// Underlying failure
        #[source]
        source: BoxError,
    },

    /// The method body failed
    #[error("Invocation of {method} failed: {source}")]
    InvocationFailed {
        /// Qualified method name
        method: String,
        /// Underlying failure
        #[source]
        source: BoxError,
    },
}

impl ReflectError {
    pub(crate) fn access(message: impl Into<String>) -> Self {
        ReflectError::InvalidFieldAccess(message.into())
    }
}

impl From<refract_types::TypeError> for ReflectError {
    fn from(err: refract_types::TypeError) -> Self {
        ReflectError::InvalidFieldAccess(err.to_string())
    }
}
