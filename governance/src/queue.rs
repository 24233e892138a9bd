//! Debate queue: FIFO of proposals awaiting debate plus the single
//! "current debate" slot.
//!
//! Invariant: a proposal id is either queued or current, never both,
//! and never queued twice. At most one id occupies the current slot.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::proposal::ProposalId;

/// FIFO queue with a single active slot. All operations are total.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebateQueue {
    queue: VecDeque<ProposalId>,
    current: Option<ProposalId>,
}

impl DebateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an id to the back of the queue. No-op (returns false) when
    /// the id is already queued or currently debating.
    pub fn enqueue(&mut self, id: &str) -> bool {
        if self.is_current(id) || self.contains(id) {
            return false;
        }
        self.queue.push_back(id.to_string());
        true
    }

    /// Pop the head of the queue into the current slot. Returns the
    /// newly-current id, or `None` when the queue is empty. The slot
    /// must be free; an occupied slot leaves the queue untouched.
    pub fn take_next(&mut self) -> Option<ProposalId> {
        if self.current.is_some() {
            return None;
        }
        let next = self.queue.pop_front()?;
        self.current = Some(next.clone());
        Some(next)
    }

    /// Release the current slot. Returns the id that held it.
    pub fn clear_current(&mut self) -> Option<ProposalId> {
        self.current.take()
    }

    /// Drop an id from the queue or the current slot (for archival).
    /// Returns false when the id was in neither.
    pub fn remove(&mut self, id: &str) -> bool {
        if self.is_current(id) {
            self.current = None;
            return true;
        }
        let before = self.queue.len();
        self.queue.retain(|queued| queued != id);
        self.queue.len() != before
    }

    pub fn is_current(&self, id: &str) -> bool {
        self.current.as_deref() == Some(id)
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.queue.iter().any(|queued| queued == id)
    }

    /// Queued ids in debate order, excluding the current slot.
    pub fn queue_order(&self) -> Vec<ProposalId> {
        self.queue.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut q = DebateQueue::new();
        assert!(q.enqueue("gip-0001"));
        assert!(q.enqueue("gip-0002"));
        assert!(q.enqueue("gip-0003"));

        assert_eq!(q.take_next().as_deref(), Some("gip-0001"));
        assert!(q.is_current("gip-0001"));
        assert_eq!(q.queue_order(), vec!["gip-0002", "gip-0003"]);
    }

    #[test]
    fn test_enqueue_duplicate_is_noop() {
        let mut q = DebateQueue::new();
        assert!(q.enqueue("gip-0001"));
        assert!(!q.enqueue("gip-0001"));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_enqueue_current_is_noop() {
        let mut q = DebateQueue::new();
        q.enqueue("gip-0001");
        q.take_next();
        assert!(!q.enqueue("gip-0001"));
        assert!(q.is_empty());
    }

    #[test]
    fn test_take_next_requires_free_slot() {
        let mut q = DebateQueue::new();
        q.enqueue("gip-0001");
        q.enqueue("gip-0002");
        q.take_next();
        // Slot occupied: queue untouched.
        assert_eq!(q.take_next(), None);
        assert_eq!(q.len(), 1);

        q.clear_current();
        assert_eq!(q.take_next().as_deref(), Some("gip-0002"));
    }

    #[test]
    fn test_take_next_empty() {
        let mut q = DebateQueue::new();
        assert_eq!(q.take_next(), None);
        assert_eq!(q.current_id(), None);
    }

    #[test]
    fn test_remove_queued() {
        let mut q = DebateQueue::new();
        q.enqueue("gip-0001");
        q.enqueue("gip-0002");
        assert!(q.remove("gip-0001"));
        assert!(!q.remove("gip-0001"));
        assert_eq!(q.queue_order(), vec!["gip-0002"]);
    }

    #[test]
    fn test_remove_current_frees_slot() {
        let mut q = DebateQueue::new();
        q.enqueue("gip-0001");
        q.enqueue("gip-0002");
        q.take_next();
        assert!(q.remove("gip-0001"));
        assert_eq!(q.current_id(), None);
        assert_eq!(q.take_next().as_deref(), Some("gip-0002"));
    }

    #[test]
    fn test_never_queued_and_current() {
        let mut q = DebateQueue::new();
        q.enqueue("gip-0001");
        q.take_next();
        q.enqueue("gip-0001");
        assert!(q.is_current("gip-0001"));
        assert!(!q.contains("gip-0001"));
    }
}
