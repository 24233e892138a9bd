//! Broadcast event bus.
//!
//! Publishing is fire-and-forget over a Tokio broadcast channel;
//! having no subscribers is normal, and a slow subscriber that lags
//! off the end of the buffer only loses events for itself.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::debug;

use super::types::GovernanceEvent;

/// Channel capacity for broadcast.
const CHANNEL_CAPACITY: usize = 256;

/// Shared reference to an event bus.
pub type SharedEventBus = Arc<EventBus>;

/// Pub/sub fan-out for governance events.
pub struct EventBus {
    sender: broadcast::Sender<GovernanceEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Create a shared reference to this bus.
    pub fn shared(self) -> SharedEventBus {
        Arc::new(self)
    }

    /// Publish an event to all subscribers. Never fails; no receivers
    /// is fine.
    pub fn publish(&self, event: GovernanceEvent) {
        let event_type = event.event_type();
        match self.sender.send(event) {
            Ok(count) => debug!(event_type, receivers = count, "event published"),
            Err(_) => debug!(event_type, "event published (no receivers)"),
        }
    }

    /// Subscribe to receive all events.
    pub fn subscribe(&self) -> broadcast::Receiver<GovernanceEvent> {
        self.sender.subscribe()
    }

    /// Subscribe to events for one proposal.
    pub fn subscribe_proposal(&self, proposal_id: &str) -> ProposalReceiver {
        ProposalReceiver {
            receiver: self.subscribe(),
            proposal_id: proposal_id.to_string(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiver that only yields events for a single proposal.
pub struct ProposalReceiver {
    receiver: broadcast::Receiver<GovernanceEvent>,
    proposal_id: String,
}

impl ProposalReceiver {
    /// Receive the next event for the filtered proposal.
    pub async fn recv(&mut self) -> Result<GovernanceEvent, broadcast::error::RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if event.proposal_id() == self.proposal_id {
                return Ok(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn created(id: &str) -> GovernanceEvent {
        GovernanceEvent::ProposalCreated {
            proposal_id: id.to_string(),
            title: "t".to_string(),
            queue_position: 0,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_publish_subscribe() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(created("gip-0001"));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type(), "proposal_created");
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.publish(created("gip-0001"));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let bus = EventBus::new().shared();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(created("gip-0001"));
        assert_eq!(rx1.recv().await.unwrap().proposal_id(), "gip-0001");
        assert_eq!(rx2.recv().await.unwrap().proposal_id(), "gip-0001");
    }

    #[tokio::test]
    async fn test_proposal_filter() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe_proposal("gip-0002");

        bus.publish(created("gip-0001"));
        bus.publish(created("gip-0002"));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.proposal_id(), "gip-0002");
    }
}
