//! Core proposal and debate-message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::state::{ProposalState, StateTransition, TransitionError};
use crate::error::GovernanceError;
use crate::participant::ParticipantId;
use crate::tally::VoteSet;

/// Unique identifier for proposals, sequence-derived (`gip-0001`, ...).
pub type ProposalId = String;

/// Subject area of a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalCategory {
    Protocol,
    Economic,
    Governance,
    Technical,
    Community,
}

impl std::fmt::Display for ProposalCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Protocol => write!(f, "protocol"),
            Self::Economic => write!(f, "economic"),
            Self::Governance => write!(f, "governance"),
            Self::Technical => write!(f, "technical"),
            Self::Community => write!(f, "community"),
        }
    }
}

/// Author-assigned priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Kind of contribution a debate message makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageCategory {
    Debate,
    Question,
    Challenge,
    Support,
    Vote,
    Implementation,
}

impl std::fmt::Display for MessageCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debate => write!(f, "debate"),
            Self::Question => write!(f, "question"),
            Self::Challenge => write!(f, "challenge"),
            Self::Support => write!(f, "support"),
            Self::Vote => write!(f, "vote"),
            Self::Implementation => write!(f, "implementation"),
        }
    }
}

/// How consequential a message is for the proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Message content as supplied by the content generator.
///
/// The engine assigns the per-proposal sequence number and the reveal
/// timestamp; everything else arrives populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSpec {
    pub author: ParticipantId,
    pub body: String,
    pub category: MessageCategory,
    pub impact: ImpactLevel,
    pub rationale: String,
}

/// A single debate message owned by a proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateMessage {
    /// Sequence number, unique within the proposal.
    pub seq: u32,
    /// Authoring participant.
    pub author: ParticipantId,
    /// Message body, opaque to the engine.
    pub body: String,
    /// Contribution kind.
    pub category: MessageCategory,
    /// Impact label.
    pub impact: ImpactLevel,
    /// Free-text rationale.
    pub rationale: String,
    /// Assigned at reveal, not at generation. `None` while pending.
    pub revealed_at: Option<DateTime<Utc>>,
}

impl DebateMessage {
    /// Build a pending message from generator output.
    pub fn from_spec(seq: u32, spec: MessageSpec) -> Self {
        Self {
            seq,
            author: spec.author,
            body: spec.body,
            category: spec.category,
            impact: spec.impact,
            rationale: spec.rationale,
            revealed_at: None,
        }
    }
}

/// Author-supplied input for creating a proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalDraft {
    pub author: String,
    pub title: String,
    pub summary: String,
    pub full_text: String,
    pub category: ProposalCategory,
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ProposalDraft {
    /// Reject drafts with missing required fields, naming the first
    /// missing one. Creation is all-or-nothing; a failed draft never
    /// produces a record.
    pub fn validate(&self) -> Result<(), GovernanceError> {
        for (field, value) in [
            ("author", &self.author),
            ("title", &self.title),
            ("summary", &self.summary),
            ("full_text", &self.full_text),
        ] {
            if value.trim().is_empty() {
                return Err(GovernanceError::Validation { field });
            }
        }
        Ok(())
    }
}

/// A governance proposal and everything it owns: the pending message
/// queue, the revealed transcript, the vote set, and timing anchors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    /// Sequence-derived identifier, unique for the system's lifetime.
    pub id: ProposalId,
    pub author: String,
    pub title: String,
    pub summary: String,
    pub full_text: String,
    pub category: ProposalCategory,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Current lifecycle state.
    pub state: ProposalState,
    /// Transition history.
    pub transitions: Vec<StateTransition>,
    /// Set exactly once, on the first entry into `Debating`. This is
    /// the anchor for all pacing reconstruction and never mutates.
    pub debate_started_at: Option<DateTime<Utc>>,
    /// Generated messages not yet revealed, in reveal order.
    pub pending: Vec<DebateMessage>,
    /// The visible transcript, in reveal order.
    pub revealed: Vec<DebateMessage>,
    /// When the transcript completed and voting opened.
    pub voting_started_at: Option<DateTime<Utc>>,
    /// Roster snapshot taken when voting opened.
    pub expected_voters: Vec<ParticipantId>,
    /// Collected votes. Immutable once the proposal leaves `Voting`.
    pub votes: VoteSet,
    /// When the proposal resolved to approved/rejected.
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Proposal {
    /// Create a draft-state proposal from validated input.
    pub fn new(id: ProposalId, draft: ProposalDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            author: draft.author,
            title: draft.title,
            summary: draft.summary,
            full_text: draft.full_text,
            category: draft.category,
            priority: draft.priority,
            tags: draft.tags,
            created_at: now,
            updated_at: now,
            state: ProposalState::Draft,
            transitions: Vec::new(),
            debate_started_at: None,
            pending: Vec::new(),
            revealed: Vec::new(),
            voting_started_at: None,
            expected_voters: Vec::new(),
            votes: VoteSet::new(),
            resolved_at: None,
        }
    }

    /// Transition to a new state, recording the step.
    pub fn transition(
        &mut self,
        to: ProposalState,
        now: DateTime<Utc>,
    ) -> Result<(), TransitionError> {
        if !self.state.can_transition_to(to) {
            return Err(TransitionError {
                from: self.state,
                to,
            });
        }
        self.transitions.push(StateTransition {
            from: self.state,
            to,
            at: now,
        });
        self.state = to;
        self.updated_at = now;
        Ok(())
    }

    /// Record the pacing anchor. A no-op when already set: the anchor
    /// is written exactly once and never mutated afterwards.
    pub fn mark_debate_started(&mut self, now: DateTime<Utc>) {
        if self.debate_started_at.is_none() {
            self.debate_started_at = Some(now);
        }
    }

    /// Total messages generated for this debate.
    pub fn total_messages(&self) -> usize {
        self.pending.len() + self.revealed.len()
    }

    /// Messages currently visible.
    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }

    /// Messages still waiting for their scheduled reveal.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Compact status line for logs.
    pub fn status_line(&self) -> String {
        format!(
            "[{}] {} | revealed {}/{} | votes {}",
            self.state,
            self.id,
            self.revealed_count(),
            self.total_messages(),
            self.votes.total_cast()
        )
    }
}
