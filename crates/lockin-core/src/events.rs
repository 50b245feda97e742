use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerStatus;

/// Every state change in the focus timer produces an Event.
/// Front ends render them; the CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Timer entered Running, either fresh from Idle or resumed from Paused.
    TimerStarted {
        elapsed_secs: u64,
        target_secs: u64,
        resumed: bool,
        at: DateTime<Utc>,
    },
    TimerPaused {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    /// Timer returned to Idle. `elapsed_secs` is the value that was discarded.
    TimerStopped {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    DurationChanged {
        target_secs: u64,
        at: DateTime<Utc>,
    },
    Ticked {
        elapsed_secs: u64,
        remaining_secs: i64,
        at: DateTime<Utc>,
    },
    /// The tick that carried elapsed time past the target.
    OvertimeStarted {
        target_secs: u64,
        at: DateTime<Utc>,
    },
    SessionSaved {
        id: i64,
        duration_secs: u64,
        overtime_secs: u64,
        label: String,
        at: DateTime<Utc>,
    },
    /// Run was too short to keep.
    SessionDiscarded {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        status: TimerStatus,
        time_display: String,
        is_active: bool,
        is_overtime: bool,
        elapsed_secs: u64,
        target_secs: u64,
        progress: f64,
        at: DateTime<Utc>,
    },
}
