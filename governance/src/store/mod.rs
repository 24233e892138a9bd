//! Proposal storage behind a swappable interface.
//!
//! The orchestration layer only ever talks to [`ProposalStore`], so an
//! in-memory backend (the default, [`MemoryStore`]) and a persistent
//! one are interchangeable without touching lifecycle logic. Stores do
//! pure data access; every business rule lives in the controller.

pub mod memory;

use std::sync::Arc;

use thiserror::Error;

use crate::proposal::{Proposal, ProposalId};

pub use memory::MemoryStore;

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("proposal not found: {0}")]
    NotFound(String),

    #[error("duplicate proposal id: {0}")]
    DuplicateId(String),

    #[error("lock poisoned")]
    LockPoisoned,
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Shared reference to a proposal store.
pub type SharedStore = Arc<dyn ProposalStore>;

/// Data access for proposal records.
pub trait ProposalStore: Send + Sync {
    /// Issue the next proposal identifier. Monotonic for the store's
    /// lifetime; never reused.
    fn next_id(&self) -> StoreResult<ProposalId>;

    /// Insert a new record. Fails on id collision.
    fn insert(&self, proposal: Proposal) -> StoreResult<()>;

    /// Fetch a record by id.
    fn get(&self, id: &str) -> StoreResult<Option<Proposal>>;

    /// Replace an existing record. Fails when the id is unknown.
    fn update(&self, proposal: Proposal) -> StoreResult<()>;

    /// All proposal ids in insertion order.
    fn list_ids(&self) -> StoreResult<Vec<ProposalId>>;

    /// All non-archived proposals in insertion order.
    fn list_active(&self) -> StoreResult<Vec<Proposal>>;
}
