//! In-memory proposal store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::proposal::{Proposal, ProposalId};

use super::{ProposalStore, SharedStore, StoreError, StoreResult};

#[derive(Default)]
struct Inner {
    records: HashMap<ProposalId, Proposal>,
    /// Insertion order, so listings are stable.
    order: Vec<ProposalId>,
}

/// `HashMap`-backed store. The default backend; survives for the
/// process lifetime only.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    seq: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a shared trait-object reference to this store.
    pub fn shared(self) -> SharedStore {
        std::sync::Arc::new(self)
    }
}

impl ProposalStore for MemoryStore {
    fn next_id(&self) -> StoreResult<ProposalId> {
        let n = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("gip-{:04}", n))
    }

    fn insert(&self, proposal: Proposal) -> StoreResult<()> {
        let mut inner = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        if inner.records.contains_key(&proposal.id) {
            return Err(StoreError::DuplicateId(proposal.id));
        }
        inner.order.push(proposal.id.clone());
        inner.records.insert(proposal.id.clone(), proposal);
        Ok(())
    }

    fn get(&self, id: &str) -> StoreResult<Option<Proposal>> {
        let inner = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(inner.records.get(id).cloned())
    }

    fn update(&self, proposal: Proposal) -> StoreResult<()> {
        let mut inner = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        match inner.records.get_mut(&proposal.id) {
            Some(slot) => {
                *slot = proposal;
                Ok(())
            }
            None => Err(StoreError::NotFound(proposal.id)),
        }
    }

    fn list_ids(&self) -> StoreResult<Vec<ProposalId>> {
        let inner = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(inner.order.clone())
    }

    fn list_active(&self) -> StoreResult<Vec<Proposal>> {
        let inner = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.records.get(id))
            .filter(|p| p.state != crate::proposal::ProposalState::Archived)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proposal::{Priority, ProposalCategory, ProposalDraft, ProposalState};
    use chrono::Utc;

    fn proposal(store: &MemoryStore) -> Proposal {
        let id = store.next_id().unwrap();
        Proposal::new(
            id,
            ProposalDraft {
                author: "aria".to_string(),
                title: "Test".to_string(),
                summary: "Summary".to_string(),
                full_text: "Body".to_string(),
                category: ProposalCategory::Technical,
                priority: Priority::Low,
                tags: vec![],
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_ids_are_monotonic() {
        let store = MemoryStore::new();
        assert_eq!(store.next_id().unwrap(), "gip-0001");
        assert_eq!(store.next_id().unwrap(), "gip-0002");
        assert_eq!(store.next_id().unwrap(), "gip-0003");
    }

    #[test]
    fn test_insert_get_update() {
        let store = MemoryStore::new();
        let mut p = proposal(&store);
        let id = p.id.clone();
        store.insert(p.clone()).unwrap();

        let loaded = store.get(&id).unwrap().unwrap();
        assert_eq!(loaded.state, ProposalState::Draft);

        p.transition(ProposalState::Debating, Utc::now()).unwrap();
        store.update(p).unwrap();
        let loaded = store.get(&id).unwrap().unwrap();
        assert_eq!(loaded.state, ProposalState::Debating);
    }

    #[test]
    fn test_insert_duplicate_rejected() {
        let store = MemoryStore::new();
        let p = proposal(&store);
        store.insert(p.clone()).unwrap();
        assert!(matches!(
            store.insert(p),
            Err(StoreError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_update_unknown_rejected() {
        let store = MemoryStore::new();
        let p = proposal(&store);
        assert!(matches!(store.update(p), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_get_unknown_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("gip-9999").unwrap().is_none());
    }

    #[test]
    fn test_listing_preserves_insertion_order() {
        let store = MemoryStore::new();
        let a = proposal(&store);
        let b = proposal(&store);
        let ids = vec![a.id.clone(), b.id.clone()];
        store.insert(a).unwrap();
        store.insert(b).unwrap();
        assert_eq!(store.list_ids().unwrap(), ids);
        assert_eq!(store.list_active().unwrap().len(), 2);
    }

    #[test]
    fn test_list_active_skips_archived() {
        let store = MemoryStore::new();
        let mut p = proposal(&store);
        p.transition(ProposalState::Archived, Utc::now()).unwrap();
        store.insert(p).unwrap();
        assert!(store.list_active().unwrap().is_empty());
        assert_eq!(store.list_ids().unwrap().len(), 1);
    }
}
