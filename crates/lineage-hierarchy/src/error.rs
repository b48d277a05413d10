use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    /// A required argument is absent: a handle with no definition in the environment, a blank
    /// annotation name, or a stop class that is not an ancestor. Raised before any work is done.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Something the Java type system guarantees does not hold for the given environment, e.g.
    /// resolving type arguments against a class that is not a supertype. Indicates misuse or
    /// inconsistent metadata; callers are not expected to recover.
    #[error("internal consistency violation: {0}")]
    InternalConsistency(String),
}

pub type Result<T, E = HierarchyError> = std::result::Result<T, E>;
