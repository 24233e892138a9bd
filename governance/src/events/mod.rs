//! Governance event fan-out.

pub mod bus;
pub mod types;

pub use bus::{EventBus, ProposalReceiver, SharedEventBus};
pub use types::GovernanceEvent;
