//! Message pacer: deterministic elapsed-time reveal reconstruction.
//!
//! The host may tear the process down between any two requests, so the
//! pacer never keeps a counter. "How many messages are visible now" is
//! a pure function of the debate anchor, the current time, and two
//! fixed spacing parameters. Call it as often as you like; the answer
//! only moves when the wall clock does.

use chrono::{DateTime, Duration, Utc};

use crate::config::ConfigError;

/// Pure reveal-schedule computation.
///
/// The first message becomes visible `initial_delay` after the debate
/// anchor; each subsequent message follows `interval` later.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    initial_delay: Duration,
    interval: Duration,
}

impl Pacer {
    /// Build a pacer. Non-positive spacing is a configuration error,
    /// rejected here rather than tolerated at reveal time.
    pub fn new(initial_delay: Duration, interval: Duration) -> Result<Self, ConfigError> {
        if initial_delay <= Duration::zero() {
            return Err(ConfigError::NonPositive {
                field: "initial_delay_secs",
            });
        }
        if interval <= Duration::zero() {
            return Err(ConfigError::NonPositive {
                field: "interval_secs",
            });
        }
        Ok(Self {
            initial_delay,
            interval,
        })
    }

    /// How many of `total` messages should be visible at `now`.
    ///
    /// Pure and side-effect free; monotonic in `now` for a fixed
    /// anchor, and never exceeds `total`.
    pub fn visible_count(
        &self,
        debate_started_at: DateTime<Utc>,
        now: DateTime<Utc>,
        total: usize,
    ) -> usize {
        if total == 0 {
            return 0;
        }
        let elapsed = now - debate_started_at;
        if elapsed < self.initial_delay {
            return 0;
        }
        let past_first = elapsed - self.initial_delay;
        let extra = (past_first.num_milliseconds() / self.interval.num_milliseconds()) as usize;
        (1 + extra).min(total)
    }

    /// Scheduled reveal instant of the `index`-th message (0-based).
    ///
    /// Revealed messages are stamped with this instant rather than the
    /// poll's arrival time, so a catch-up reveal after a long gap still
    /// produces a strictly increasing, cadence-plausible transcript.
    pub fn reveal_time(&self, debate_started_at: DateTime<Utc>, index: usize) -> DateTime<Utc> {
        debate_started_at + self.initial_delay + self.interval * (index as i32)
    }
}
