//! Proposal data model and lifecycle state machine.
//!
//! # Lifecycle
//!
//! ```text
//! (create) → Draft → Debating → Voting → Approved ─┐
//!              │         │         │  └─ Rejected ─┤
//!              │         │         │               ▼
//!              └─────────┴─────────┴─────────► Archived
//! ```
//!
//! A proposal owns its pending message queue, its revealed transcript,
//! and its vote set. `debate_started_at` is written exactly once, on
//! the first entry into `Debating`; every pacing computation anchors
//! on it.

pub mod state;
pub mod types;

pub use state::{ProposalState, StateTransition, TransitionError};
pub use types::{
    DebateMessage, ImpactLevel, MessageCategory, MessageSpec, Priority, Proposal,
    ProposalCategory, ProposalDraft, ProposalId,
};
