use thiserror::Error;

/// Failure kinds of audit operations.
///
/// Every failure is terminal for the action that produced it: nothing is
/// retried, and the state the action was applied to is left as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuditError {
    /// A required field is missing or a value does not fit its target.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The referenced template or node no longer exists.
    #[error("not found: {0}")]
    NotFound(String),

    /// The action needs a capability the caller does not hold.
    #[error("not permitted: {0}")]
    NotPermitted(String),

    /// The document store could not be reached or rejected the operation.
    #[error("persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    /// An imported snapshot does not have the expected shape.
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),

    /// Result export could not be produced.
    #[error("export failed: {0}")]
    Export(String),
}

impl AuditError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AuditError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AuditError::NotFound(msg.into())
    }
}

pub type AuditResult<T> = Result<T, AuditError>;
