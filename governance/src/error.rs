//! Error taxonomy for governance operations.
//!
//! Every error is reported synchronously to the caller; the engine
//! retries nothing itself. Chat-log sink failures never surface here
//! at all (best-effort, swallowed at the call site).

use thiserror::Error;

use crate::proposal::{ProposalState, TransitionError};
use crate::store::StoreError;

/// Errors returned by the orchestration facade.
#[derive(Debug, Error)]
pub enum GovernanceError {
    /// Malformed creation input. Never partially applied.
    #[error("missing required field: {field}")]
    Validation { field: &'static str },

    /// Unknown proposal identifier.
    #[error("proposal not found: {id}")]
    NotFound { id: String },

    /// Operation attempted in a state that forbids it.
    #[error("{operation} not allowed while proposal is {state}")]
    InvalidState {
        operation: &'static str,
        state: ProposalState,
    },

    /// Second vote from the same participant. Votes are not revocable.
    #[error("participant {participant} already voted")]
    DuplicateVote { participant: String },

    /// Storage-layer failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// State-machine violation. Indicates an engine bug, not caller error.
    #[error("transition error: {0}")]
    Transition(#[from] TransitionError),
}

/// Result type for governance operations.
pub type GovernanceResult<T> = Result<T, GovernanceError>;
