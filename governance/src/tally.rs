//! Vote collection and resolution.
//!
//! One vote per participant per proposal, first vote wins; there is no
//! last-write overwrite, so concurrent flip-flopping cannot change a
//! recorded vote. Resolution compares the approval rate against a
//! configured threshold once every expected voter has voted or the
//! voting deadline has elapsed, whichever comes first.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::error::GovernanceError;
use crate::participant::ParticipantId;

/// A participant's vote on a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteValue {
    Approve,
    Reject,
    Abstain,
}

impl std::fmt::Display for VoteValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approve => write!(f, "approve"),
            Self::Reject => write!(f, "reject"),
            Self::Abstain => write!(f, "abstain"),
        }
    }
}

/// Collected votes for one proposal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoteSet {
    votes: HashMap<ParticipantId, VoteValue>,
}

impl VoteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a vote. A second vote from the same participant is
    /// rejected; the first stands.
    pub fn cast(&mut self, participant: &str, value: VoteValue) -> Result<(), GovernanceError> {
        if self.votes.contains_key(participant) {
            return Err(GovernanceError::DuplicateVote {
                participant: participant.to_string(),
            });
        }
        self.votes.insert(participant.to_string(), value);
        Ok(())
    }

    pub fn has_voted(&self, participant: &str) -> bool {
        self.votes.contains_key(participant)
    }

    pub fn get(&self, participant: &str) -> Option<VoteValue> {
        self.votes.get(participant).copied()
    }

    pub fn total_cast(&self) -> usize {
        self.votes.len()
    }

    pub fn approve_count(&self) -> usize {
        self.count(VoteValue::Approve)
    }

    pub fn reject_count(&self) -> usize {
        self.count(VoteValue::Reject)
    }

    pub fn abstain_count(&self) -> usize {
        self.count(VoteValue::Abstain)
    }

    fn count(&self, value: VoteValue) -> usize {
        self.votes.values().filter(|v| **v == value).count()
    }

    /// Fraction of cast votes that are `approve`. Zero when nothing
    /// has been cast; never divides by zero.
    pub fn approval_rate(&self) -> f64 {
        if self.votes.is_empty() {
            return 0.0;
        }
        self.approve_count() as f64 / self.votes.len() as f64
    }

    /// Whether every expected participant has voted.
    pub fn is_complete(&self, expected: &[ParticipantId]) -> bool {
        !expected.is_empty() && expected.iter().all(|id| self.votes.contains_key(id))
    }

    pub fn votes(&self) -> &HashMap<ParticipantId, VoteValue> {
        &self.votes
    }
}

/// Final decision for a resolved proposal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TallyDecision {
    pub approved: bool,
    pub approval_rate: f64,
}

/// Outcome of evaluating a vote set against the policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TallyOutcome {
    /// Keep collecting votes.
    Pending,
    /// Resolve now.
    Decided(TallyDecision),
}

/// Resolution policy: approval threshold plus voting deadline.
#[derive(Debug, Clone, Copy)]
pub struct TallyPolicy {
    threshold: f64,
    voting_window: Duration,
}

impl TallyPolicy {
    /// Build a policy. A threshold outside `(0, 1]` or a non-positive
    /// window is a configuration error.
    pub fn new(threshold: f64, voting_window: Duration) -> Result<Self, ConfigError> {
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::ThresholdOutOfRange { value: threshold });
        }
        if voting_window <= Duration::zero() {
            return Err(ConfigError::NonPositive {
                field: "deadline_secs",
            });
        }
        Ok(Self {
            threshold,
            voting_window,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Decide from the votes cast so far. Zero votes resolve to
    /// rejected, since the approval rate is zero.
    pub fn decide(&self, votes: &VoteSet) -> TallyDecision {
        let rate = votes.approval_rate();
        TallyDecision {
            approved: rate >= self.threshold,
            approval_rate: rate,
        }
    }

    /// Whether the proposal should resolve now: all expected voters
    /// have voted, or the deadline (measured from `voting_started_at`)
    /// has elapsed.
    pub fn evaluate(
        &self,
        votes: &VoteSet,
        expected: &[ParticipantId],
        voting_started_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> TallyOutcome {
        let deadline_passed = now - voting_started_at >= self.voting_window;
        if votes.is_complete(expected) || deadline_passed {
            TallyOutcome::Decided(self.decide(votes))
        } else {
            TallyOutcome::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> TallyPolicy {
        TallyPolicy::new(0.6, Duration::seconds(600)).unwrap()
    }

    fn voters(n: usize) -> Vec<ParticipantId> {
        (0..n).map(|i| format!("p{}", i)).collect()
    }

    fn cast_all(set: &mut VoteSet, ids: &[ParticipantId], values: &[VoteValue]) {
        for (id, value) in ids.iter().zip(values) {
            set.cast(id, *value).unwrap();
        }
    }

    #[test]
    fn test_policy_validation() {
        assert!(TallyPolicy::new(0.0, Duration::seconds(1)).is_err());
        assert!(TallyPolicy::new(1.5, Duration::seconds(1)).is_err());
        assert!(TallyPolicy::new(0.5, Duration::zero()).is_err());
        assert!(TallyPolicy::new(1.0, Duration::seconds(1)).is_ok());
    }

    #[test]
    fn test_four_of_six_approves() {
        let ids = voters(6);
        let mut set = VoteSet::new();
        cast_all(
            &mut set,
            &ids,
            &[
                VoteValue::Approve,
                VoteValue::Approve,
                VoteValue::Approve,
                VoteValue::Approve,
                VoteValue::Reject,
                VoteValue::Reject,
            ],
        );
        let decision = policy().decide(&set);
        assert!(decision.approved);
        assert!((decision.approval_rate - 4.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_three_of_six_rejects() {
        let ids = voters(6);
        let mut set = VoteSet::new();
        cast_all(
            &mut set,
            &ids,
            &[
                VoteValue::Approve,
                VoteValue::Approve,
                VoteValue::Approve,
                VoteValue::Reject,
                VoteValue::Reject,
                VoteValue::Reject,
            ],
        );
        let decision = policy().decide(&set);
        assert!(!decision.approved);
        assert!((decision.approval_rate - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_vote_keeps_first() {
        let mut set = VoteSet::new();
        set.cast("aria", VoteValue::Approve).unwrap();
        let err = set.cast("aria", VoteValue::Reject).unwrap_err();
        assert!(matches!(err, GovernanceError::DuplicateVote { .. }));
        assert_eq!(set.get("aria"), Some(VoteValue::Approve));
        assert_eq!(set.total_cast(), 1);
    }

    #[test]
    fn test_empty_set_rate_is_zero() {
        let set = VoteSet::new();
        assert_eq!(set.approval_rate(), 0.0);
        assert!(!policy().decide(&set).approved);
    }

    #[test]
    fn test_abstain_dilutes_rate() {
        let mut set = VoteSet::new();
        set.cast("a", VoteValue::Approve).unwrap();
        set.cast("b", VoteValue::Abstain).unwrap();
        assert!((set.approval_rate() - 0.5).abs() < 1e-9);
        assert_eq!(set.abstain_count(), 1);
    }

    #[test]
    fn test_evaluate_pending_before_deadline() {
        let ids = voters(3);
        let mut set = VoteSet::new();
        set.cast(&ids[0], VoteValue::Approve).unwrap();

        let opened = Utc::now();
        let now = opened + Duration::seconds(10);
        assert_eq!(
            policy().evaluate(&set, &ids, opened, now),
            TallyOutcome::Pending
        );
    }

    #[test]
    fn test_evaluate_resolves_when_complete() {
        let ids = voters(2);
        let mut set = VoteSet::new();
        set.cast(&ids[0], VoteValue::Approve).unwrap();
        set.cast(&ids[1], VoteValue::Approve).unwrap();

        let opened = Utc::now();
        let now = opened + Duration::seconds(1);
        match policy().evaluate(&set, &ids, opened, now) {
            TallyOutcome::Decided(decision) => assert!(decision.approved),
            TallyOutcome::Pending => panic!("expected decision"),
        }
    }

    #[test]
    fn test_deadline_with_zero_votes_rejects() {
        let ids = voters(4);
        let set = VoteSet::new();
        let opened = Utc::now();
        let now = opened + Duration::seconds(600);
        match policy().evaluate(&set, &ids, opened, now) {
            TallyOutcome::Decided(decision) => {
                assert!(!decision.approved);
                assert_eq!(decision.approval_rate, 0.0);
            }
            TallyOutcome::Pending => panic!("deadline must resolve"),
        }
    }

    #[test]
    fn test_vote_value_serde() {
        let json = serde_json::to_string(&VoteValue::Approve).unwrap();
        assert_eq!(json, "\"approve\"");
    }
}
