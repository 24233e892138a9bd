//! Chat log sink boundary.
//!
//! Each revealed message is forwarded to a general activity log. The
//! log is observational, not authoritative: a sink failure is logged
//! and swallowed at the call site, and never fails or rolls back a
//! reveal.

use async_trait::async_trait;
use tracing::info;

use crate::proposal::DebateMessage;

/// Receives revealed debate messages, best-effort.
#[async_trait]
pub trait ChatLogSink: Send + Sync {
    async fn log_message(&self, proposal_id: &str, message: &DebateMessage) -> anyhow::Result<()>;
}

/// Sink that writes revealed messages to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingChatSink;

#[async_trait]
impl ChatLogSink for TracingChatSink {
    async fn log_message(&self, proposal_id: &str, message: &DebateMessage) -> anyhow::Result<()> {
        info!(
            proposal_id,
            seq = message.seq,
            author = %message.author,
            category = %message.category,
            impact = %message.impact,
            "chat: {}",
            message.body
        );
        Ok(())
    }
}

/// Sink that drops everything. Useful when no activity feed is wired.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullChatSink;

#[async_trait]
impl ChatLogSink for NullChatSink {
    async fn log_message(&self, _proposal_id: &str, _message: &DebateMessage) -> anyhow::Result<()> {
        Ok(())
    }
}
