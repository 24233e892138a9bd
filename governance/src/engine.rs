//! Orchestration facade: the single entry point for external callers.
//!
//! HTTP handlers (out of scope here) hold a [`SharedEngine`] and call
//! these methods; everything else in the crate sits behind it. The
//! facade translates proposals into status views and delegates every
//! rule to the [`LifecycleController`].

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::clock::SharedClock;
use crate::config::{ConfigError, GovernanceConfig};
use crate::error::GovernanceResult;
use crate::events::{EventBus, GovernanceEvent, SharedEventBus};
use crate::generator::ContentGenerator;
use crate::lifecycle::LifecycleController;
use crate::participant::{Participant, ParticipantId};
use crate::proposal::{DebateMessage, Proposal, ProposalDraft, ProposalId, ProposalState};
use crate::sink::ChatLogSink;
use crate::store::SharedStore;
use crate::tally::VoteValue;

/// Shared reference to the engine.
pub type SharedEngine = Arc<GovernanceEngine>;

/// Point-in-time view of one proposal.
#[derive(Debug, Clone, Serialize)]
pub struct ProposalStatus {
    pub id: ProposalId,
    pub title: String,
    pub state: ProposalState,
    /// The visible transcript, in reveal order.
    pub revealed_messages: Vec<DebateMessage>,
    /// Messages still waiting for their scheduled reveal.
    pub pending_count: usize,
    pub votes: HashMap<ParticipantId, VoteValue>,
    pub approval_rate: f64,
    pub debate_started_at: Option<DateTime<Utc>>,
    pub voting_started_at: Option<DateTime<Utc>>,
}

impl ProposalStatus {
    fn from_proposal(proposal: &Proposal) -> Self {
        Self {
            id: proposal.id.clone(),
            title: proposal.title.clone(),
            state: proposal.state,
            revealed_messages: proposal.revealed.clone(),
            pending_count: proposal.pending_count(),
            votes: proposal.votes.votes().clone(),
            approval_rate: proposal.votes.approval_rate(),
            debate_started_at: proposal.debate_started_at,
            voting_started_at: proposal.voting_started_at,
        }
    }
}

/// Point-in-time view of the debate queue.
#[derive(Debug, Clone, Serialize)]
pub struct DebateQueueStatus {
    pub current_id: Option<ProposalId>,
    pub queue_length: usize,
    pub queue_order: Vec<ProposalId>,
}

/// The orchestration engine.
pub struct GovernanceEngine {
    controller: LifecycleController,
}

impl GovernanceEngine {
    /// Build an engine with its own event bus. Configuration problems
    /// are fatal here, before any request is served.
    pub fn new(
        config: &GovernanceConfig,
        store: SharedStore,
        generator: Arc<dyn ContentGenerator>,
        sink: Arc<dyn ChatLogSink>,
        clock: SharedClock,
    ) -> Result<Self, ConfigError> {
        Self::with_bus(config, store, generator, sink, EventBus::new().shared(), clock)
    }

    /// Build an engine publishing to an existing bus.
    pub fn with_bus(
        config: &GovernanceConfig,
        store: SharedStore,
        generator: Arc<dyn ContentGenerator>,
        sink: Arc<dyn ChatLogSink>,
        bus: SharedEventBus,
        clock: SharedClock,
    ) -> Result<Self, ConfigError> {
        let controller = LifecycleController::new(config, store, generator, sink, bus, clock)?;
        Ok(Self { controller })
    }

    /// Create a shared reference to this engine.
    pub fn shared(self) -> SharedEngine {
        Arc::new(self)
    }

    /// Validate, persist, and queue a new proposal.
    pub async fn create_proposal(&self, draft: ProposalDraft) -> GovernanceResult<Proposal> {
        self.controller.create(draft).await
    }

    /// Start or queue a debate. Idempotent.
    pub async fn start_debate(&self, id: &str) -> GovernanceResult<()> {
        self.controller.start_debate(id).await
    }

    /// Advance time-based behaviour for one proposal, then report its
    /// status. This is what periodic external callers invoke.
    pub async fn poll(&self, id: &str) -> GovernanceResult<ProposalStatus> {
        self.controller.poll(id).await?;
        self.get_status(id)
    }

    /// Report a proposal's status without advancing anything.
    pub fn get_status(&self, id: &str) -> GovernanceResult<ProposalStatus> {
        let proposal = self.controller.get(id)?;
        Ok(ProposalStatus::from_proposal(&proposal))
    }

    /// Cast a participant's vote.
    pub async fn cast_vote(
        &self,
        id: &str,
        participant: &str,
        value: VoteValue,
    ) -> GovernanceResult<()> {
        self.controller.cast_vote(id, participant, value).await
    }

    /// Archive a proposal.
    pub async fn archive(&self, id: &str) -> GovernanceResult<()> {
        self.controller.archive(id).await
    }

    /// The current debate slot and queue, in debate order.
    pub fn current_debate(&self) -> GovernanceResult<DebateQueueStatus> {
        let (current_id, queue_order) = self.controller.queue_snapshot()?;
        Ok(DebateQueueStatus {
            current_id,
            queue_length: queue_order.len(),
            queue_order,
        })
    }

    /// Subscribe to orchestration events.
    pub fn subscribe(&self) -> broadcast::Receiver<GovernanceEvent> {
        self.controller.bus().subscribe()
    }

    /// The configured voter roster.
    pub fn roster(&self) -> &[Participant] {
        self.controller.roster()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::generator::ScriptedGenerator;
    use crate::proposal::{Priority, ProposalCategory};
    use crate::sink::NullChatSink;
    use crate::store::MemoryStore;
    use chrono::Duration;

    fn engine(messages: usize) -> (GovernanceEngine, Arc<ManualClock>) {
        let clock = ManualClock::new(Utc::now()).shared();
        let engine = GovernanceEngine::new(
            &GovernanceConfig::default(),
            MemoryStore::new().shared(),
            Arc::new(ScriptedGenerator::new(messages)),
            Arc::new(NullChatSink),
            clock.clone(),
        )
        .unwrap();
        (engine, clock)
    }

    fn draft(title: &str) -> ProposalDraft {
        ProposalDraft {
            author: "aria".to_string(),
            title: title.to_string(),
            summary: "summary".to_string(),
            full_text: "text".to_string(),
            category: ProposalCategory::Governance,
            priority: Priority::High,
            tags: vec!["test".to_string()],
        }
    }

    #[test]
    fn test_bad_config_is_fatal_at_construction() {
        let mut config = GovernanceConfig::default();
        config.pacing.interval_secs = 0;
        let clock = ManualClock::new(Utc::now()).shared();
        let result = GovernanceEngine::new(
            &config,
            MemoryStore::new().shared(),
            Arc::new(ScriptedGenerator::new(1)),
            Arc::new(NullChatSink),
            clock,
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_status_reports_transcript_and_votes() {
        let (engine, clock) = engine(2);
        let p = engine.create_proposal(draft("Status")).await.unwrap();
        engine.start_debate(&p.id).await.unwrap();

        clock.advance(Duration::seconds(31));
        let status = engine.poll(&p.id).await.unwrap();
        assert_eq!(status.state, ProposalState::Debating);
        assert_eq!(status.revealed_messages.len(), 1);
        assert_eq!(status.pending_count, 1);
        assert!(status.votes.is_empty());

        clock.advance(Duration::seconds(60));
        let status = engine.poll(&p.id).await.unwrap();
        assert_eq!(status.state, ProposalState::Voting);
        assert_eq!(status.pending_count, 0);

        engine
            .cast_vote(&p.id, "aria", VoteValue::Approve)
            .await
            .unwrap();
        let status = engine.get_status(&p.id).unwrap();
        assert_eq!(status.votes.len(), 1);
        assert_eq!(status.approval_rate, 1.0);
    }

    #[tokio::test]
    async fn test_current_debate_snapshot() {
        let (engine, _clock) = engine(1);
        let a = engine.create_proposal(draft("A")).await.unwrap();
        let b = engine.create_proposal(draft("B")).await.unwrap();

        let status = engine.current_debate().unwrap();
        assert_eq!(status.current_id, None);
        assert_eq!(status.queue_length, 2);

        engine.start_debate(&a.id).await.unwrap();
        let status = engine.current_debate().unwrap();
        assert_eq!(status.current_id.as_deref(), Some(a.id.as_str()));
        assert_eq!(status.queue_order, vec![b.id]);
        assert_eq!(status.queue_length, 1);
    }

    #[tokio::test]
    async fn test_subscribers_see_lifecycle_events() {
        let (engine, _clock) = engine(0);
        let mut rx = engine.subscribe();

        let p = engine.create_proposal(draft("Events")).await.unwrap();
        engine.start_debate(&p.id).await.unwrap();

        assert_eq!(rx.recv().await.unwrap().event_type(), "proposal_created");
        assert_eq!(rx.recv().await.unwrap().event_type(), "debate_started");
    }

    #[tokio::test]
    async fn test_status_serializes() {
        let (engine, _clock) = engine(0);
        let p = engine.create_proposal(draft("Json")).await.unwrap();
        let status = engine.get_status(&p.id).unwrap();
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("\"state\":\"draft\""));
    }
}
