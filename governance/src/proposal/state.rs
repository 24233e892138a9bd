//! Proposal state machine: states, transitions, and transition history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a governance proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalState {
    /// Created, waiting in the debate queue.
    Draft,
    /// Actively debated; messages reveal on a paced schedule.
    Debating,
    /// Transcript complete; collecting votes.
    Voting,
    /// Resolved with enough approvals.
    Approved,
    /// Resolved without enough approvals.
    Rejected,
    /// Moved out of the active set.
    Archived,
}

impl ProposalState {
    /// Whether the proposal has been resolved (voting finished).
    pub fn is_resolved(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Whether the proposal still moves through the lifecycle.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Draft | Self::Debating | Self::Voting)
    }

    /// Valid transitions from this state.
    ///
    /// Archiving is legal from every non-archived state: an archive
    /// request mid-debate or mid-voting freezes further reveals/votes.
    pub fn valid_transitions(self) -> &'static [ProposalState] {
        match self {
            Self::Draft => &[Self::Debating, Self::Archived],
            Self::Debating => &[Self::Voting, Self::Archived],
            Self::Voting => &[Self::Approved, Self::Rejected, Self::Archived],
            Self::Approved | Self::Rejected => &[Self::Archived],
            Self::Archived => &[],
        }
    }

    /// Whether `to` is a legal next state.
    pub fn can_transition_to(self, to: ProposalState) -> bool {
        self.valid_transitions().contains(&to)
    }
}

impl std::fmt::Display for ProposalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Debating => write!(f, "debating"),
            Self::Voting => write!(f, "voting"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
            Self::Archived => write!(f, "archived"),
        }
    }
}

/// A recorded state transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    /// Previous state.
    pub from: ProposalState,
    /// New state.
    pub to: ProposalState,
    /// When the transition occurred.
    pub at: DateTime<Utc>,
}

/// Error for invalid state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionError {
    pub from: ProposalState,
    pub to: ProposalState,
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid transition {} -> {} (allowed: {:?})",
            self.from,
            self.to,
            self.from.valid_transitions()
        )
    }
}

impl std::error::Error for TransitionError {}
