use thiserror::Error;

/// Errors from authenticated map operations.
#[derive(Debug, Error)]
pub enum BucketMapError {
    /// The requested key is not present in the map. Recoverable.
    #[error("key not found: {0}")]
    KeyNotFound(String),
    /// An internal consistency check failed, e.g. a digest scheduled for
    /// removal was absent from its bucket. The authenticated structure can no
    /// longer be trusted; this signals a core bug or a violated representation
    /// precondition, not a recoverable condition.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
    /// Construction-time parameter validation failure.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
