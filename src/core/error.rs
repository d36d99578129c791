//! Domain errors that callers need to tell apart

use thiserror::Error;

/// Errors with a meaning beyond "something went wrong". Anything not
/// covered here travels as a plain `anyhow::Error` and is treated as
/// a persistence failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeetError {
    /// Missing or invalid input. Never retried.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Backend unreachable or a write was rejected
    #[error("Persistence failure: {0}")]
    Persistence(String),
}

impl MeetError {
    /// Find a `MeetError` anywhere in an `anyhow` error chain
    pub fn find(err: &anyhow::Error) -> Option<&MeetError> {
        err.chain().find_map(|cause| cause.downcast_ref::<MeetError>())
    }

    pub fn is_validation(err: &anyhow::Error) -> bool {
        matches!(Self::find(err), Some(MeetError::Validation(_)))
    }

    pub fn is_not_found(err: &anyhow::Error) -> bool {
        matches!(Self::find(err), Some(MeetError::NotFound(_)))
    }
}
