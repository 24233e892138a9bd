//! Engine configuration: pacing, voting policy, and the voter roster.
//!
//! Validation happens once, at engine construction. A bad value
//! (non-positive spacing or deadline, threshold outside `(0, 1]`,
//! empty roster) is fatal at startup, never deferred to first use.

use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::participant::{default_roster, Participant};

/// Configuration error. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be positive")]
    NonPositive { field: &'static str },

    #[error("approval_threshold must be in (0, 1], got {value}")]
    ThresholdOutOfRange { value: f64 },

    #[error("participant roster is empty")]
    EmptyRoster,

    #[error("duplicate participant id: {id}")]
    DuplicateParticipant { id: String },

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Message reveal spacing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Seconds before the first message of a debate appears.
    pub initial_delay_secs: u64,
    /// Seconds between subsequent messages.
    pub interval_secs: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            initial_delay_secs: 30,
            interval_secs: 60,
        }
    }
}

impl PacingConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::seconds(self.initial_delay_secs as i64)
    }

    pub fn interval(&self) -> Duration {
        Duration::seconds(self.interval_secs as i64)
    }
}

/// Vote resolution policy inputs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VotingConfig {
    /// Approval rate required for `Approved`.
    pub approval_threshold: f64,
    /// Seconds after voting opens before the deadline resolves the
    /// proposal with whatever votes were cast.
    pub deadline_secs: u64,
}

impl Default for VotingConfig {
    fn default() -> Self {
        Self {
            approval_threshold: 0.6,
            deadline_secs: 3600,
        }
    }
}

impl VotingConfig {
    pub fn deadline(&self) -> Duration {
        Duration::seconds(self.deadline_secs as i64)
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernanceConfig {
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub voting: VotingConfig,
    /// Voter roster. Defaults to the built-in persona roster.
    #[serde(default = "default_roster")]
    pub participants: Vec<Participant>,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            pacing: PacingConfig::default(),
            voting: VotingConfig::default(),
            participants: default_roster(),
        }
    }
}

impl GovernanceConfig {
    /// Parse from TOML text. Validation is separate; the engine calls
    /// `validate` during construction.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject configurations the engine must not run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pacing.initial_delay_secs == 0 {
            return Err(ConfigError::NonPositive {
                field: "initial_delay_secs",
            });
        }
        if self.pacing.interval_secs == 0 {
            return Err(ConfigError::NonPositive {
                field: "interval_secs",
            });
        }
        if self.voting.deadline_secs == 0 {
            return Err(ConfigError::NonPositive {
                field: "deadline_secs",
            });
        }
        let threshold = self.voting.approval_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::ThresholdOutOfRange { value: threshold });
        }
        if self.participants.is_empty() {
            return Err(ConfigError::EmptyRoster);
        }
        let mut seen = std::collections::HashSet::new();
        for participant in &self.participants {
            if !seen.insert(participant.id.as_str()) {
                return Err(ConfigError::DuplicateParticipant {
                    id: participant.id.clone(),
                });
            }
        }
        Ok(())
    }
}
