//! Timer engine implementation.
//!
//! The timer engine is a tick-driven state machine. It owns no clock and no
//! thread: elapsed time only advances when the caller feeds it `tick()`
//! events, normally forwarded from a [`TickSource`](super::TickSource).
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!   ^        |          |
//!   +--------+----------+   (stop)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(45);
//! engine.start();
//! // For every tick delivered by the tick source:
//! engine.tick();
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::events::Event;

/// Largest target the signed remaining-time math can represent.
const MAX_TARGET_SECS: u64 = i64::MAX as u64;

fn minutes_to_secs(minutes: u64) -> u64 {
    minutes.saturating_mul(60).min(MAX_TARGET_SECS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
}

/// Core timer engine.
///
/// Commands return `None` when they are not valid in the current state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    status: TimerStatus,
    /// Configured focus length in seconds.
    target_secs: u64,
    /// Seconds counted while Running. Only `tick`, `stop`, `reset` and
    /// `set_duration` touch it.
    elapsed_secs: u64,
}

impl TimerEngine {
    /// Create an idle engine with a target of `minutes`.
    pub fn new(minutes: u64) -> Self {
        Self {
            status: TimerStatus::Idle,
            target_secs: minutes_to_secs(minutes),
            elapsed_secs: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn target_secs(&self) -> u64 {
        self.target_secs
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Seconds left until the target. Negative once in overtime.
    pub fn remaining_secs(&self) -> i64 {
        self.target_secs as i64 - self.elapsed_secs as i64
    }

    pub fn is_overtime(&self) -> bool {
        self.remaining_secs() < 0
    }

    pub fn is_active(&self) -> bool {
        self.status == TimerStatus::Running
    }

    /// `MM:SS` of the remaining (or overflow) time.
    pub fn time_display(&self) -> String {
        format_time(self.remaining_secs())
    }

    /// Ring fraction: shrinks from 1.0 towards 0.0 while running inside the
    /// target, and sits at 1.0 when idle, paused or in overtime.
    pub fn progress(&self) -> f64 {
        if !self.is_active() || self.is_overtime() || self.target_secs == 0 {
            return 1.0;
        }
        (self.remaining_secs() as f64 / self.target_secs as f64).max(0.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            status: self.status,
            time_display: self.time_display(),
            is_active: self.is_active(),
            is_overtime: self.is_overtime(),
            elapsed_secs: self.elapsed_secs,
            target_secs: self.target_secs,
            progress: self.progress(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        match self.status {
            TimerStatus::Idle | TimerStatus::Paused => {
                let resumed = self.status == TimerStatus::Paused;
                self.status = TimerStatus::Running;
                debug!(elapsed = self.elapsed_secs, resumed, "timer running");
                Some(Event::TimerStarted {
                    elapsed_secs: self.elapsed_secs,
                    target_secs: self.target_secs,
                    resumed,
                    at: Utc::now(),
                })
            }
            TimerStatus::Running => None,
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        match self.status {
            TimerStatus::Running => {
                self.status = TimerStatus::Paused;
                debug!(elapsed = self.elapsed_secs, "timer paused");
                Some(Event::TimerPaused {
                    elapsed_secs: self.elapsed_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Valid from any state. Discards elapsed time; read it first.
    pub fn stop(&mut self) -> Option<Event> {
        let discarded = self.elapsed_secs;
        self.status = TimerStatus::Idle;
        self.elapsed_secs = 0;
        debug!(discarded, "timer stopped");
        Some(Event::TimerStopped {
            elapsed_secs: discarded,
            at: Utc::now(),
        })
    }

    /// Extend (or grow) the target. Valid in any state.
    pub fn add_duration(&mut self, delta_secs: u64) -> Option<Event> {
        self.target_secs = self.target_secs.saturating_add(delta_secs).min(MAX_TARGET_SECS);
        Some(Event::DurationChanged {
            target_secs: self.target_secs,
            at: Utc::now(),
        })
    }

    /// Pick a new focus length. Only allowed during setup (Idle).
    pub fn set_duration(&mut self, minutes: u64) -> Option<Event> {
        if self.status != TimerStatus::Idle {
            return None;
        }
        self.target_secs = minutes_to_secs(minutes);
        self.elapsed_secs = 0;
        Some(Event::DurationChanged {
            target_secs: self.target_secs,
            at: Utc::now(),
        })
    }

    /// Zero the elapsed counter, leaving status and target alone.
    pub fn reset(&mut self) -> Option<Event> {
        self.elapsed_secs = 0;
        Some(Event::TimerReset { at: Utc::now() })
    }

    /// Apply one elapsed second. Ignored unless Running.
    pub fn tick(&mut self) -> Option<Event> {
        if self.status != TimerStatus::Running {
            return None;
        }
        let was_overtime = self.is_overtime();
        self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        if !was_overtime && self.is_overtime() {
            return Some(Event::OvertimeStarted {
                target_secs: self.target_secs,
                at: Utc::now(),
            });
        }
        Some(Event::Ticked {
            elapsed_secs: self.elapsed_secs,
            remaining_secs: self.remaining_secs(),
            at: Utc::now(),
        })
    }
}

/// Format `|total_secs|` as zero-padded `MM:SS`. Minutes are not wrapped
/// into hours, so an hour reads `60:00`.
pub fn format_time(total_secs: i64) -> String {
    let abs = total_secs.unsigned_abs();
    format!("{:02}:{:02}", abs / 60, abs % 60)
}
