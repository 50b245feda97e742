//! Session finalization.
//!
//! Turns the elapsed/target pair of a stopped run into the base and
//! overtime parts of a history record, and decides whether the run is long
//! enough to keep at all.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::storage::SessionRecord;

/// Runs must last strictly longer than this to be recorded.
pub const MIN_QUALIFYING_SECS: u64 = 60;

/// Label used when the user did not name the session.
pub const DEFAULT_SESSION_LABEL: &str = "Focus Session";

/// Split of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub elapsed_secs: u64,
    /// Portion inside the target.
    pub base_secs: u64,
    /// Portion beyond the target.
    pub overtime_secs: u64,
    pub qualifies: bool,
}

pub fn finalize(elapsed_secs: u64, target_secs: u64) -> SessionOutcome {
    let is_overtime = elapsed_secs > target_secs;
    let (base_secs, overtime_secs) = if is_overtime {
        (target_secs, elapsed_secs - target_secs)
    } else {
        (elapsed_secs, 0)
    };
    SessionOutcome {
        elapsed_secs,
        base_secs,
        overtime_secs,
        qualifies: elapsed_secs > MIN_QUALIFYING_SECS,
    }
}

pub fn resolve_label(label: &str) -> String {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        DEFAULT_SESSION_LABEL.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Result of a finalize-and-stop.
#[derive(Debug, Clone)]
pub struct FinishedSession {
    pub outcome: SessionOutcome,
    /// The stored record, if the run qualified.
    pub record: Option<SessionRecord>,
    /// Events in the order they happened, ending with `TimerStopped`.
    pub events: Vec<Event>,
}

impl FinishedSession {
    pub fn saved(&self) -> bool {
        self.record.is_some()
    }

    pub(crate) fn outcome_event(outcome: &SessionOutcome, record: Option<&SessionRecord>) -> Event {
        match record {
            Some(r) => Event::SessionSaved {
                id: r.id,
                duration_secs: r.duration,
                overtime_secs: r.overtime,
                label: r.label.clone(),
                at: Utc::now(),
            },
            None => Event::SessionDiscarded {
                elapsed_secs: outcome.elapsed_secs,
                at: Utc::now(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn overtime_run_is_split_at_target() {
        let outcome = finalize(2800, 2700);
        assert_eq!(outcome.base_secs, 2700);
        assert_eq!(outcome.overtime_secs, 100);
        assert!(outcome.qualifies);
    }

    #[test]
    fn short_run_does_not_qualify() {
        assert!(!finalize(30, 2700).qualifies);
        assert!(!finalize(30, 10).qualifies);
        assert!(!finalize(60, 2700).qualifies);
        assert!(finalize(61, 2700).qualifies);
    }

    #[test]
    fn run_inside_target_has_no_overtime() {
        let outcome = finalize(1200, 2700);
        assert_eq!(outcome.base_secs, 1200);
        assert_eq!(outcome.overtime_secs, 0);
    }

    #[test]
    fn exact_target_is_not_overtime() {
        let outcome = finalize(1500, 1500);
        assert_eq!(outcome.base_secs, 1500);
        assert_eq!(outcome.overtime_secs, 0);
    }

    #[test]
    fn blank_label_falls_back() {
        assert_eq!(resolve_label(""), DEFAULT_SESSION_LABEL);
        assert_eq!(resolve_label("   "), DEFAULT_SESSION_LABEL);
        assert_eq!(resolve_label("  Write report "), "Write report");
    }

    proptest! {
        #[test]
        fn parts_add_up_to_elapsed(elapsed in 0u64..100_000, target in 0u64..100_000) {
            let outcome = finalize(elapsed, target);
            prop_assert_eq!(outcome.base_secs + outcome.overtime_secs, elapsed);
            prop_assert!(outcome.base_secs <= target);
        }
    }
}
