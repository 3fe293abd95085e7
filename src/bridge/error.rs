use thiserror::Error;

/// Failures raised while building or querying a method registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("method already registered: {0}")]
    DuplicateMethod(String),
    #[error("unknown method: {0}")]
    UnknownMethod(String),
    #[error("invalid method name: {0:?}")]
    InvalidMethodName(String),
}

/// An argument bag that does not satisfy a method's schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required argument: {0}")]
    Missing(String),
    #[error("argument {name} must be {expected}, got {actual}")]
    WrongKind {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("unexpected argument: {0}")]
    Unexpected(String),
}

/// A host-platform query that could not be answered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("platform query failed: {0}")]
    Query(String),
    #[error("platform query timed out: {0}")]
    Timeout(String),
}

/// A failure reported by a handler itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    #[error("{0}")]
    Failed(String),
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

impl HandlerError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}
