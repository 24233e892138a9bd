//! Governance event types.
//!
//! Everything observable about orchestration is published as one of
//! these, so the activity feed and the terminal UI can follow along
//! without polling the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::participant::ParticipantId;
use crate::proposal::{MessageCategory, ProposalId};
use crate::tally::VoteValue;

/// All governance orchestration events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GovernanceEvent {
    /// A proposal was created and queued for debate.
    ProposalCreated {
        proposal_id: ProposalId,
        title: String,
        queue_position: usize,
        timestamp: DateTime<Utc>,
    },

    /// A proposal took the current-debate slot.
    DebateStarted {
        proposal_id: ProposalId,
        message_count: usize,
        timestamp: DateTime<Utc>,
    },

    /// A pending message moved into the visible transcript.
    MessageRevealed {
        proposal_id: ProposalId,
        seq: u32,
        author: ParticipantId,
        category: MessageCategory,
        timestamp: DateTime<Utc>,
    },

    /// The transcript completed and vote collection opened.
    VotingOpened {
        proposal_id: ProposalId,
        expected_voters: usize,
        timestamp: DateTime<Utc>,
    },

    /// A participant cast a vote.
    VoteCast {
        proposal_id: ProposalId,
        participant: ParticipantId,
        value: VoteValue,
        timestamp: DateTime<Utc>,
    },

    /// The proposal resolved to approved or rejected.
    ProposalResolved {
        proposal_id: ProposalId,
        approved: bool,
        approval_rate: f64,
        votes_cast: usize,
        timestamp: DateTime<Utc>,
    },

    /// The proposal was archived.
    ProposalArchived {
        proposal_id: ProposalId,
        timestamp: DateTime<Utc>,
    },
}

impl GovernanceEvent {
    /// Event type tag, matching the serialized form.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ProposalCreated { .. } => "proposal_created",
            Self::DebateStarted { .. } => "debate_started",
            Self::MessageRevealed { .. } => "message_revealed",
            Self::VotingOpened { .. } => "voting_opened",
            Self::VoteCast { .. } => "vote_cast",
            Self::ProposalResolved { .. } => "proposal_resolved",
            Self::ProposalArchived { .. } => "proposal_archived",
        }
    }

    /// The proposal this event concerns.
    pub fn proposal_id(&self) -> &str {
        match self {
            Self::ProposalCreated { proposal_id, .. }
            | Self::DebateStarted { proposal_id, .. }
            | Self::MessageRevealed { proposal_id, .. }
            | Self::VotingOpened { proposal_id, .. }
            | Self::VoteCast { proposal_id, .. }
            | Self::ProposalResolved { proposal_id, .. }
            | Self::ProposalArchived { proposal_id, .. } => proposal_id,
        }
    }

    /// When the event occurred.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::ProposalCreated { timestamp, .. }
            | Self::DebateStarted { timestamp, .. }
            | Self::MessageRevealed { timestamp, .. }
            | Self::VotingOpened { timestamp, .. }
            | Self::VoteCast { timestamp, .. }
            | Self::ProposalResolved { timestamp, .. }
            | Self::ProposalArchived { timestamp, .. } => *timestamp,
        }
    }
}
