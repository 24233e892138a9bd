//! Participant roster: the identities eligible to debate and vote.
//!
//! Persona prompt text and any model-backed behaviour live outside this
//! crate; a participant here is just an identity plus a role tag used
//! for transcripts and vote collection.

use serde::{Deserialize, Serialize};

/// Unique identifier for a participant.
pub type ParticipantId = String;

/// Role a persona plays in governance debates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaRole {
    /// Protocol design and technical feasibility.
    Architect,
    /// Economic and incentive analysis.
    Analyst,
    /// Challenges assumptions and stress-tests proposals.
    Skeptic,
    /// Argues for community benefit and adoption.
    Advocate,
    /// Operational and long-term maintenance concerns.
    Steward,
}

impl PersonaRole {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Architect => "Protocol design, technical feasibility",
            Self::Analyst => "Economic modelling, incentive analysis",
            Self::Skeptic => "Adversarial review, assumption testing",
            Self::Advocate => "Community benefit, adoption",
            Self::Steward => "Operations, long-term maintenance",
        }
    }
}

impl std::fmt::Display for PersonaRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Architect => write!(f, "architect"),
            Self::Analyst => write!(f, "analyst"),
            Self::Skeptic => write!(f, "skeptic"),
            Self::Advocate => write!(f, "advocate"),
            Self::Steward => write!(f, "steward"),
        }
    }
}

/// A participant eligible to author debate messages and cast votes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Stable identifier used in transcripts and vote sets.
    pub id: ParticipantId,
    /// Display name.
    pub name: String,
    /// Debate role.
    pub role: PersonaRole,
}

impl Participant {
    pub fn new(id: &str, name: &str, role: PersonaRole) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            role,
        }
    }
}

/// Default five-persona roster used when no roster is configured.
pub fn default_roster() -> Vec<Participant> {
    vec![
        Participant::new("aria", "Aria", PersonaRole::Architect),
        Participant::new("kestrel", "Kestrel", PersonaRole::Analyst),
        Participant::new("morrow", "Morrow", PersonaRole::Skeptic),
        Participant::new("sable", "Sable", PersonaRole::Advocate),
        Participant::new("vigil", "Vigil", PersonaRole::Steward),
    ]
}
