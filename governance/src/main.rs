//! Governance engine demo driver.
//!
//! Runs a complete simulated governance session against a manually
//! advanced clock: creates proposals, drains the debate queue, paces
//! message reveals, collects scripted votes, and prints the event
//! stream. No sleeps; simulated time moves in fixed steps and every
//! poll recomputes from timestamps, exactly as a request-driven host
//! would.
//!
//! ```bash
//! governance --proposals 3 --messages 5 --step-secs 15
//! RUST_LOG=governance=debug governance --config governance.toml
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::{Duration, Utc};
use clap::Parser;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::info;

use governance::{
    GovernanceConfig, GovernanceEngine, GovernanceEvent, ManualClock, MemoryStore, Priority,
    ProposalCategory, ProposalDraft, ProposalState, ScriptedGenerator, TracingChatSink, VoteValue,
};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of proposals to push through the pipeline
    #[arg(long, default_value_t = 2)]
    proposals: usize,

    /// Debate messages generated per proposal
    #[arg(long, default_value_t = 5)]
    messages: usize,

    /// Simulated seconds per polling step
    #[arg(long, default_value_t = 15)]
    step_secs: i64,

    /// Path to a TOML config file (defaults baked in otherwise)
    #[arg(long)]
    config: Option<PathBuf>,
}

const TITLES: [&str; 4] = [
    "Raise block gas limit",
    "Rebalance validator rewards",
    "Adopt quadratic vote weighting",
    "Fund protocol audit round",
];

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    if args.proposals == 0 {
        println!("nothing to do: --proposals 0");
        return Ok(());
    }
    let config = match &args.config {
        Some(path) => GovernanceConfig::load(path)?,
        None => GovernanceConfig::default(),
    };

    let clock = ManualClock::new(Utc::now()).shared();
    let engine = GovernanceEngine::new(
        &config,
        MemoryStore::new().shared(),
        Arc::new(ScriptedGenerator::new(args.messages)),
        Arc::new(TracingChatSink),
        clock.clone(),
    )?;
    let mut events = engine.subscribe();

    info!(
        proposals = args.proposals,
        messages = args.messages,
        step_secs = args.step_secs,
        "starting simulated session"
    );

    let mut ids = Vec::new();
    for i in 0..args.proposals {
        let proposal = engine
            .create_proposal(ProposalDraft {
                author: "operator".to_string(),
                title: TITLES[i % TITLES.len()].to_string(),
                summary: format!("Simulated proposal {}", i + 1),
                full_text: "Full proposal text for the simulated session.".to_string(),
                category: ProposalCategory::Protocol,
                priority: Priority::Medium,
                tags: vec!["simulation".to_string()],
            })
            .await?;
        ids.push(proposal.id);
    }
    engine.start_debate(&ids[0]).await?;

    let step = Duration::seconds(args.step_secs);
    let mut voted: Vec<bool> = vec![false; ids.len()];
    // Generous upper bound so a config with a long deadline still ends.
    let max_steps = 100_000;

    for _ in 0..max_steps {
        clock.advance(step);

        for (i, id) in ids.iter().enumerate() {
            let status = engine.poll(id).await?;
            if status.state == ProposalState::Voting && !voted[i] {
                voted[i] = true;
                cast_scripted_votes(&engine, id, i).await?;
            }
        }
        drain_events(&mut events);

        let all_done = ids
            .iter()
            .all(|id| matches!(engine.get_status(id), Ok(s) if s.state.is_resolved()));
        if all_done {
            break;
        }
    }

    println!("\n=== final state ===");
    for id in &ids {
        let status = engine.get_status(id)?;
        println!(
            "{} [{}] rate={:.2} transcript={} msgs",
            status.id,
            status.state,
            status.approval_rate,
            status.revealed_messages.len()
        );
    }
    Ok(())
}

/// Every roster member votes; even-numbered proposals lean approve,
/// odd-numbered lean reject, so both outcomes show up.
async fn cast_scripted_votes(engine: &GovernanceEngine, id: &str, proposal_index: usize) -> Result<()> {
    let roster: Vec<_> = engine.roster().to_vec();
    for (i, participant) in roster.iter().enumerate() {
        let approve = if proposal_index % 2 == 0 {
            i % 3 != 2
        } else {
            i % 3 == 2
        };
        let value = if approve {
            VoteValue::Approve
        } else {
            VoteValue::Reject
        };
        engine.cast_vote(id, &participant.id, value).await?;
        // The last vote may already have resolved the proposal.
        if engine.get_status(id)?.state.is_resolved() {
            break;
        }
    }
    Ok(())
}

fn drain_events(events: &mut tokio::sync::broadcast::Receiver<GovernanceEvent>) {
    loop {
        match events.try_recv() {
            Ok(event) => match &event {
                GovernanceEvent::MessageRevealed {
                    proposal_id,
                    seq,
                    author,
                    category,
                    ..
                } => println!("{} #{} <{}> [{}]", proposal_id, seq, author, category),
                GovernanceEvent::ProposalResolved {
                    proposal_id,
                    approved,
                    approval_rate,
                    ..
                } => println!(
                    "{} resolved: {} (rate {:.2})",
                    proposal_id,
                    if *approved { "APPROVED" } else { "REJECTED" },
                    approval_rate
                ),
                other => println!("event: {}", other.event_type()),
            },
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            Err(TryRecvError::Lagged(_)) => continue,
        }
    }
}
