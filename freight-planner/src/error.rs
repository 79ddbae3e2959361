use freight_core::ProviderError;
use thiserror::Error;

/// Errors returned by [`AssignmentPlanner::submit`](crate::AssignmentPlanner::submit).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    /// Validation failed, so nothing was sent to the backend.
    #[error("assignment has {count} validation error(s)")]
    Invalid {
        /// Number of errors now exposed by the planner.
        count: usize,
    },
    /// The backend refused the request; nothing was created.
    #[error("assignment was not created: {message}")]
    Rejected {
        /// Message shown to the user: the backend's own text when it sent
        /// one, otherwise a generic fallback.
        message: String,
        /// Underlying collaborator failure.
        #[source]
        source: ProviderError,
    },
}

/// Errors returned by split-row editing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RowEditError {
    /// Adding a row would exceed the split limit.
    #[error("a split can have at most {max} rows")]
    TooManyRows {
        /// Largest allowed row count.
        max: usize,
    },
    /// Removing a row would go below the split minimum.
    #[error("a split needs at least {min} rows")]
    TooFewRows {
        /// Smallest allowed row count.
        min: usize,
    },
    /// The row index is out of range.
    #[error("row {index} does not exist (the split has {len} rows)")]
    NoSuchRow {
        /// Requested index.
        index: usize,
        /// Current row count.
        len: usize,
    },
}
