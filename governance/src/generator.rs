//! Content generator boundary.
//!
//! Debate content comes from outside the engine: persona prompts,
//! language-model calls, and any styling live behind this trait. The
//! engine asks for the full batch once, at the moment a debate starts,
//! and paces the reveal itself.

use async_trait::async_trait;

use crate::participant::Participant;
use crate::proposal::{ImpactLevel, MessageCategory, MessageSpec, Proposal};

/// Supplies the ordered message batch for a debate.
///
/// Implementations should degrade to an empty batch when generation
/// fails; a zero-message debate moves straight to voting on the next
/// poll rather than wedging the queue.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, proposal: &Proposal, roster: &[Participant]) -> Vec<MessageSpec>;
}

/// Deterministic generator for tests and simulations: cycles the
/// roster round-robin through a fixed category/impact rotation.
pub struct ScriptedGenerator {
    count: usize,
}

const CATEGORY_CYCLE: [MessageCategory; 5] = [
    MessageCategory::Debate,
    MessageCategory::Question,
    MessageCategory::Challenge,
    MessageCategory::Support,
    MessageCategory::Implementation,
];

const IMPACT_CYCLE: [ImpactLevel; 3] = [
    ImpactLevel::Medium,
    ImpactLevel::High,
    ImpactLevel::Low,
];

impl ScriptedGenerator {
    pub fn new(count: usize) -> Self {
        Self { count }
    }
}

#[async_trait]
impl ContentGenerator for ScriptedGenerator {
    async fn generate(&self, proposal: &Proposal, roster: &[Participant]) -> Vec<MessageSpec> {
        if roster.is_empty() {
            return Vec::new();
        }
        (0..self.count)
            .map(|i| {
                let participant = &roster[i % roster.len()];
                let category = CATEGORY_CYCLE[i % CATEGORY_CYCLE.len()];
                MessageSpec {
                    author: participant.id.clone(),
                    body: format!(
                        "{} take {} on \"{}\"",
                        participant.name,
                        i + 1,
                        proposal.title
                    ),
                    category,
                    impact: IMPACT_CYCLE[i % IMPACT_CYCLE.len()],
                    rationale: format!("{}: {}", participant.role, participant.role.description()),
                }
            })
            .collect()
    }
}
