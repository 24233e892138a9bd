//! Governance Orchestration Library
//!
//! This library provides the proposal debate and voting orchestration
//! engine behind the AI-governed ledger's governance surface:
//!
//! - Proposal lifecycle state machine (draft, debating, voting,
//!   approved/rejected, archived) with a single-active-debate queue
//! - Timestamp-anchored message pacing: "how many messages are visible
//!   now" is recomputed purely from elapsed wall-clock time, so the
//!   engine survives teardown and resume between any two requests
//! - Per-participant vote collection with threshold/deadline resolution
//! - Broadcast event fan-out for activity feeds and UIs
//!
//! Content generation (persona prompts, model calls) and the chat
//! activity log are external collaborators behind the
//! [`generator::ContentGenerator`] and [`sink::ChatLogSink`] traits.
//! The HTTP layer holds a [`SharedEngine`] and calls the facade.
//!
//! # Usage
//!
//! ```ignore
//! use governance::{GovernanceConfig, GovernanceEngine, MemoryStore, SystemClock};
//!
//! let engine = GovernanceEngine::new(
//!     &GovernanceConfig::default(),
//!     MemoryStore::new().shared(),
//!     generator,
//!     sink,
//!     std::sync::Arc::new(SystemClock),
//! )?;
//!
//! let proposal = engine.create_proposal(draft).await?;
//! engine.start_debate(&proposal.id).await?;
//! // later, from any fresh invocation:
//! let status = engine.poll(&proposal.id).await?;
//! ```

#![allow(clippy::uninlined_format_args)]

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod generator;
pub mod lifecycle;
pub mod pacer;
pub mod participant;
pub mod proposal;
pub mod queue;
pub mod sink;
pub mod store;
pub mod tally;

// Re-export key engine types
pub use engine::{DebateQueueStatus, GovernanceEngine, ProposalStatus, SharedEngine};

// Re-export key proposal types
pub use proposal::{
    DebateMessage, ImpactLevel, MessageCategory, MessageSpec, Priority, Proposal,
    ProposalCategory, ProposalDraft, ProposalId, ProposalState,
};

// Re-export configuration and errors
pub use config::{ConfigError, GovernanceConfig, PacingConfig, VotingConfig};
pub use error::{GovernanceError, GovernanceResult};

// Re-export collaborator boundaries
pub use generator::{ContentGenerator, ScriptedGenerator};
pub use sink::{ChatLogSink, NullChatSink, TracingChatSink};

// Re-export store types
pub use store::{MemoryStore, ProposalStore, SharedStore, StoreError, StoreResult};

// Re-export supporting types
pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use events::{EventBus, GovernanceEvent, SharedEventBus};
pub use lifecycle::LifecycleController;
pub use pacer::Pacer;
pub use participant::{default_roster, Participant, ParticipantId, PersonaRole};
pub use queue::DebateQueue;
pub use tally::{TallyDecision, TallyOutcome, TallyPolicy, VoteSet, VoteValue};
