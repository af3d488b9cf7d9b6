use thiserror::Error;

/// Errors reported by [`Done::try_resume`](crate::Done::try_resume).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinuationError {
    /// The step already has a result; this invocation had no effect.
    #[error("continuation for step {index} was already settled")]
    AlreadySettled { index: usize },
}

/// Result type for continuation operations
pub type ContinuationResult<T> = Result<T, ContinuationError>;
