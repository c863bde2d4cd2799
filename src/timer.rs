//! Per-question countdown timer
//!
//! `TimerState` is the pure countdown arithmetic the state machine keeps on
//! the session. `CountdownTimer` is the async driver that produces one
//! signal per elapsed unit and exactly one expiry per start.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Remaining/total units for the active question. `{0, 0}` when idle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub remaining: u32,
    pub total: u32,
}

/// Display band for the remaining time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Normal,
    /// 30% or less remaining
    Warning,
    /// 10% or less remaining
    Danger,
}

impl TimerState {
    pub fn started(total: u32) -> Self {
        Self {
            remaining: total,
            total,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// Decrement by one unit. Returns true when this tick reached zero.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    /// Overwrite remaining from an external tick, clamped to `total`
    pub fn set_remaining(&mut self, remaining: u32) {
        self.remaining = remaining.min(self.total);
    }

    pub fn urgency(&self) -> Urgency {
        if self.total == 0 {
            return Urgency::Normal;
        }
        // Integer form of remaining/total <= 10% and <= 30%
        let remaining = u64::from(self.remaining) * 10;
        let total = u64::from(self.total);
        if remaining <= total {
            Urgency::Danger
        } else if remaining <= total * 3 {
            Urgency::Warning
        } else {
            Urgency::Normal
        }
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.remaining / 60, self.remaining % 60)
    }
}

/// Signals emitted by a running countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSignal {
    Tick { question_index: usize, remaining: u32 },
    Expired { question_index: usize },
}

/// Async countdown driver.
///
/// Each `start` cancels any previous run. Signals carry the question index
/// so stale signals from an earlier question can be told apart.
pub struct CountdownTimer {
    unit: Duration,
    cancel: Option<CancellationToken>,
}

impl CountdownTimer {
    pub fn new(unit: Duration) -> Self {
        Self { unit, cancel: None }
    }

    pub fn start(
        &mut self,
        question_index: usize,
        duration_units: u32,
        signal_tx: mpsc::Sender<TimerSignal>,
    ) {
        self.stop();

        let token = CancellationToken::new();
        self.cancel = Some(token.clone());
        let unit = self.unit;

        tokio::spawn(async move {
            let mut state = TimerState::started(duration_units);
            let mut ticker = interval_at(Instant::now() + unit, unit);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            while !state.is_expired() {
                tokio::select! {
                    biased;
                    () = token.cancelled() => return,
                    _ = ticker.tick() => {}
                }
                state.tick();
                let signal = TimerSignal::Tick {
                    question_index,
                    remaining: state.remaining,
                };
                if signal_tx.send(signal).await.is_err() {
                    return;
                }
            }

            if token.is_cancelled() {
                return;
            }
            tracing::debug!(question_index, "Countdown expired");
            let _ = signal_tx
                .send(TimerSignal::Expired { question_index })
                .await;
        });
    }

    /// Halt ticking without firing expiry
    pub fn stop(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
