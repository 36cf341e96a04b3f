//! Error taxonomy for scheduling runs.

use thiserror::Error;

/// Persistence collaborator failure, surfaced verbatim to the caller.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Failures a scheduling run can surface.
///
/// Per-route scoring problems are not represented here: the engine logs
/// them and continues with a smaller candidate set.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Rejected before any read or write happened.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// Hard stop: no candidate officers, no partial schedule is produced.
    #[error("no available officers found")]
    NoOfficersAvailable,
    /// Persistence failure; the run aborts at the failure point.
    #[error(transparent)]
    Store(#[from] StoreError),
}
