//! Lifecycle controller: drives proposals through draft, debate,
//! voting, and resolution.
//!
//! All time-based behaviour is recomputed from stored timestamps on
//! each invocation; the controller owns no background task and sets no
//! timer. External callers re-invoke `poll` (directly or through the
//! facade) and each call reveals exactly the messages that are due,
//! applies any elapsed voting deadline, then returns.

use std::sync::{Arc, Mutex as StdMutex, MutexGuard};

use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

use crate::clock::SharedClock;
use crate::config::{ConfigError, GovernanceConfig};
use crate::error::{GovernanceError, GovernanceResult};
use crate::events::{GovernanceEvent, SharedEventBus};
use crate::generator::ContentGenerator;
use crate::pacer::Pacer;
use crate::participant::Participant;
use crate::proposal::{DebateMessage, Proposal, ProposalDraft, ProposalId, ProposalState};
use crate::queue::DebateQueue;
use crate::sink::ChatLogSink;
use crate::store::{SharedStore, StoreError};
use crate::tally::{TallyDecision, TallyOutcome, TallyPolicy, VoteValue};

/// Drives the proposal state machine against the store, the debate
/// queue, the pacer, and the tally policy.
pub struct LifecycleController {
    store: SharedStore,
    queue: StdMutex<DebateQueue>,
    pacer: Pacer,
    policy: TallyPolicy,
    roster: Vec<Participant>,
    generator: Arc<dyn ContentGenerator>,
    sink: Arc<dyn ChatLogSink>,
    bus: SharedEventBus,
    clock: SharedClock,
    /// Serializes compound read-modify-write operations on proposal
    /// state. Covers the same-proposal reveal race and the duplicate
    /// vote race; pure reads do not take it.
    op_lock: AsyncMutex<()>,
}

impl LifecycleController {
    /// Build a controller. Configuration problems are fatal here.
    pub fn new(
        config: &GovernanceConfig,
        store: SharedStore,
        generator: Arc<dyn ContentGenerator>,
        sink: Arc<dyn ChatLogSink>,
        bus: SharedEventBus,
        clock: SharedClock,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let pacer = Pacer::new(config.pacing.initial_delay(), config.pacing.interval())?;
        let policy = TallyPolicy::new(
            config.voting.approval_threshold,
            config.voting.deadline(),
        )?;
        Ok(Self {
            store,
            queue: StdMutex::new(DebateQueue::new()),
            pacer,
            policy,
            roster: config.participants.clone(),
            generator,
            sink,
            bus,
            clock,
            op_lock: AsyncMutex::new(()),
        })
    }

    /// Validate and persist a new proposal, then queue it for debate.
    pub async fn create(&self, draft: ProposalDraft) -> GovernanceResult<Proposal> {
        let _guard = self.op_lock.lock().await;
        draft.validate()?;

        let now = self.clock.now();
        let id = self.store.next_id()?;
        let proposal = Proposal::new(id.clone(), draft, now);
        self.store.insert(proposal.clone())?;

        let queue_position = {
            let mut queue = self.queue_guard()?;
            queue.enqueue(&id);
            queue.len()
        };

        info!(proposal_id = %id, title = %proposal.title, "proposal created");
        self.bus.publish(GovernanceEvent::ProposalCreated {
            proposal_id: id,
            title: proposal.title.clone(),
            queue_position,
            timestamp: now,
        });
        Ok(proposal)
    }

    /// Start (or queue) a debate. Idempotent: a proposal already
    /// debating is a no-op, and a proposal queued behind a live debate
    /// stays queued. With a free slot this activates the queue head,
    /// so repeated calls drain the queue in FIFO order.
    pub async fn start_debate(&self, id: &str) -> GovernanceResult<()> {
        let _guard = self.op_lock.lock().await;
        let proposal = self.load(id)?;

        {
            let queue = self.queue_guard()?;
            if queue.is_current(id) {
                return Ok(());
            }
        }
        if proposal.state != ProposalState::Draft {
            // Debate already happened; nothing to start.
            return Ok(());
        }

        let next = {
            let mut queue = self.queue_guard()?;
            if queue.current_id().is_some() {
                // A different debate holds the slot: stay queued.
                queue.enqueue(id);
                return Ok(());
            }
            queue.enqueue(id);
            queue.take_next()
        };
        if let Some(next_id) = next {
            self.activate(&next_id).await?;
        }
        Ok(())
    }

    /// The external re-invocation trigger: reveal due messages, move
    /// to voting when the transcript completes, apply the voting
    /// deadline. Cheap and side-effect-bounded; safe to call at any
    /// cadence.
    pub async fn poll(&self, id: &str) -> GovernanceResult<()> {
        let _guard = self.op_lock.lock().await;
        let proposal = self.load(id)?;
        match proposal.state {
            ProposalState::Debating => self.advance_debate(proposal).await,
            ProposalState::Voting => self.advance_voting(proposal).await,
            _ => Ok(()),
        }
    }

    /// Record a vote. Only legal while voting; one vote per
    /// participant, first vote wins. Resolves the proposal as soon as
    /// the expected roster has voted in full.
    pub async fn cast_vote(
        &self,
        id: &str,
        participant: &str,
        value: VoteValue,
    ) -> GovernanceResult<()> {
        let _guard = self.op_lock.lock().await;
        let mut proposal = self.load(id)?;
        if proposal.state != ProposalState::Voting {
            return Err(GovernanceError::InvalidState {
                operation: "cast_vote",
                state: proposal.state,
            });
        }

        proposal.votes.cast(participant, value)?;
        let now = self.clock.now();
        proposal.updated_at = now;
        self.store.update(proposal.clone())?;

        debug!(proposal_id = %id, participant, value = %value, "vote cast");
        self.bus.publish(GovernanceEvent::VoteCast {
            proposal_id: id.to_string(),
            participant: participant.to_string(),
            value,
            timestamp: now,
        });

        if let Some(opened) = proposal.voting_started_at {
            let outcome =
                self.policy
                    .evaluate(&proposal.votes, &proposal.expected_voters, opened, now);
            if let TallyOutcome::Decided(decision) = outcome {
                self.resolve(proposal, decision).await?;
            }
        }
        Ok(())
    }

    /// Archive a proposal. Legal from any non-archived state; an
    /// archive mid-debate or mid-voting freezes further reveals and
    /// votes immediately and hands the slot to the next queued debate.
    pub async fn archive(&self, id: &str) -> GovernanceResult<()> {
        let _guard = self.op_lock.lock().await;
        let mut proposal = self.load(id)?;
        if proposal.state == ProposalState::Archived {
            return Ok(());
        }

        let now = self.clock.now();
        proposal.transition(ProposalState::Archived, now)?;
        self.store.update(proposal)?;

        info!(proposal_id = %id, "proposal archived");
        self.bus.publish(GovernanceEvent::ProposalArchived {
            proposal_id: id.to_string(),
            timestamp: now,
        });

        let next = {
            let mut queue = self.queue_guard()?;
            let was_current = queue.is_current(id);
            queue.remove(id);
            if was_current {
                queue.take_next()
            } else {
                None
            }
        };
        if let Some(next_id) = next {
            self.activate(&next_id).await?;
        }
        Ok(())
    }

    /// Fetch a proposal without advancing anything.
    pub fn get(&self, id: &str) -> GovernanceResult<Proposal> {
        self.load(id)
    }

    /// Current debate slot and queued ids, in debate order.
    pub fn queue_snapshot(&self) -> GovernanceResult<(Option<ProposalId>, Vec<ProposalId>)> {
        let queue = self.queue_guard()?;
        Ok((queue.current_id().map(str::to_string), queue.queue_order()))
    }

    /// The configured voter roster.
    pub fn roster(&self) -> &[Participant] {
        &self.roster
    }

    /// The event bus this controller publishes to.
    pub fn bus(&self) -> &SharedEventBus {
        &self.bus
    }

    // ------------------------------------------------------------------
    // Internals. All callers hold `op_lock`.
    // ------------------------------------------------------------------

    /// Move a drafted proposal into the current-debate slot: set the
    /// pacing anchor, generate the full message batch, and install it
    /// as the pending queue in one store update.
    async fn activate(&self, id: &str) -> GovernanceResult<()> {
        let mut proposal = self.load(id)?;
        let now = self.clock.now();

        let batch = self.generator.generate(&proposal, &self.roster).await;
        proposal.transition(ProposalState::Debating, now)?;
        proposal.mark_debate_started(now);
        proposal.pending = batch
            .into_iter()
            .enumerate()
            .map(|(i, spec)| DebateMessage::from_spec(i as u32, spec))
            .collect();
        let message_count = proposal.pending.len();
        self.store.update(proposal)?;

        info!(proposal_id = %id, messages = message_count, "debate started");
        self.bus.publish(GovernanceEvent::DebateStarted {
            proposal_id: id.to_string(),
            message_count,
            timestamp: now,
        });
        Ok(())
    }

    /// Reveal every message whose scheduled time has passed, in
    /// original order, then open voting once the transcript is
    /// complete. Idempotent for a fixed clock reading.
    async fn advance_debate(&self, mut proposal: Proposal) -> GovernanceResult<()> {
        let Some(anchor) = proposal.debate_started_at else {
            // Written on entry into Debating; absent means there is
            // nothing to pace yet.
            return Ok(());
        };
        let now = self.clock.now();
        let total = proposal.total_messages();
        let target = self.pacer.visible_count(anchor, now, total);

        let mut newly_revealed = Vec::new();
        while proposal.revealed_count() < target && !proposal.pending.is_empty() {
            let mut message = proposal.pending.remove(0);
            message.revealed_at = Some(self.pacer.reveal_time(anchor, proposal.revealed_count()));
            proposal.revealed.push(message.clone());
            newly_revealed.push(message);
        }
        if !newly_revealed.is_empty() {
            proposal.updated_at = now;
            debug!(
                proposal_id = %proposal.id,
                revealed = newly_revealed.len(),
                visible = proposal.revealed_count(),
                total,
                "messages revealed"
            );
        }

        let transcript_complete = proposal.revealed_count() == total;
        if transcript_complete {
            proposal.transition(ProposalState::Voting, now)?;
            proposal.voting_started_at = Some(now);
            proposal.expected_voters = self.roster.iter().map(|p| p.id.clone()).collect();
            info!(
                proposal_id = %proposal.id,
                voters = proposal.expected_voters.len(),
                "transcript complete, voting opened"
            );
        }

        let id = proposal.id.clone();
        let expected_voters = proposal.expected_voters.len();
        self.store.update(proposal)?;

        // Forward reveals only after the store write: the activity log
        // is observational, and a sink failure must never roll back a
        // reveal.
        for message in &newly_revealed {
            if let Err(err) = self.sink.log_message(&id, message).await {
                warn!(proposal_id = %id, seq = message.seq, "chat sink failed: {:#}", err);
            }
            self.bus.publish(GovernanceEvent::MessageRevealed {
                proposal_id: id.clone(),
                seq: message.seq,
                author: message.author.clone(),
                category: message.category,
                timestamp: message.revealed_at.unwrap_or(now),
            });
        }
        if transcript_complete {
            self.bus.publish(GovernanceEvent::VotingOpened {
                proposal_id: id,
                expected_voters,
                timestamp: now,
            });
        }
        Ok(())
    }

    /// Apply the voting deadline; completion-triggered resolution runs
    /// directly from `cast_vote`.
    async fn advance_voting(&self, proposal: Proposal) -> GovernanceResult<()> {
        let Some(opened) = proposal.voting_started_at else {
            return Ok(());
        };
        let now = self.clock.now();
        let outcome = self
            .policy
            .evaluate(&proposal.votes, &proposal.expected_voters, opened, now);
        match outcome {
            TallyOutcome::Decided(decision) => self.resolve(proposal, decision).await,
            TallyOutcome::Pending => Ok(()),
        }
    }

    /// Finalize the vote, release the debate slot, and start the next
    /// queued debate (FIFO).
    async fn resolve(
        &self,
        mut proposal: Proposal,
        decision: TallyDecision,
    ) -> GovernanceResult<()> {
        let now = self.clock.now();
        let to = if decision.approved {
            ProposalState::Approved
        } else {
            ProposalState::Rejected
        };
        proposal.transition(to, now)?;
        proposal.resolved_at = Some(now);

        let id = proposal.id.clone();
        let votes_cast = proposal.votes.total_cast();
        self.store.update(proposal)?;

        info!(
            proposal_id = %id,
            approved = decision.approved,
            rate = decision.approval_rate,
            votes_cast,
            "proposal resolved"
        );
        self.bus.publish(GovernanceEvent::ProposalResolved {
            proposal_id: id.clone(),
            approved: decision.approved,
            approval_rate: decision.approval_rate,
            votes_cast,
            timestamp: now,
        });

        let next = {
            let mut queue = self.queue_guard()?;
            if queue.is_current(&id) {
                queue.clear_current();
            }
            queue.take_next()
        };
        if let Some(next_id) = next {
            self.activate(&next_id).await?;
        }
        Ok(())
    }

    fn load(&self, id: &str) -> GovernanceResult<Proposal> {
        self.store
            .get(id)?
            .ok_or_else(|| GovernanceError::NotFound { id: id.to_string() })
    }

    fn queue_guard(&self) -> GovernanceResult<MutexGuard<'_, DebateQueue>> {
        Ok(self.queue.lock().map_err(|_| StoreError::LockPoisoned)?)
    }
}
