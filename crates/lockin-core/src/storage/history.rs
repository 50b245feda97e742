//! Bounded, newest-first session history.
//!
//! The whole history lives under one key as a JSON array:
//!
//! ```text
//! [{"id": 1760860800000, "date": "2026-10-19T08:00:00Z",
//!   "duration": 2700, "overtime": 100, "label": "Focus Session"}, ...]
//! ```
//!
//! The in-memory list is the source of truth. Backend failures and corrupt
//! blobs are logged and otherwise ignored so a broken disk never costs the
//! user the session they are in.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::blob::BlobStore;

/// Key the history blob is stored under.
pub const HISTORY_KEY: &str = "lockin_sessions";

/// Only the most recent sessions are kept.
pub const MAX_SESSIONS: usize = 50;

/// Label for records saved without one.
pub const DEFAULT_RECORD_LABEL: &str = "Focus";

/// One completed focus run. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Creation time in epoch milliseconds, bumped to stay unique.
    pub id: i64,
    pub date: DateTime<Utc>,
    /// Seconds inside the target.
    pub duration: u64,
    /// Seconds beyond the target.
    #[serde(default)]
    pub overtime: u64,
    #[serde(default = "default_label")]
    pub label: String,
}

fn default_label() -> String {
    DEFAULT_RECORD_LABEL.to_string()
}

impl SessionRecord {
    pub fn total_secs(&self) -> u64 {
        self.duration.saturating_add(self.overtime)
    }

    /// Calendar day of the record in the local timezone.
    pub fn local_day(&self) -> NaiveDate {
        self.date.with_timezone(&Local).date_naive()
    }
}

/// Aggregate over one calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub count: u64,
    pub total_seconds: u64,
}

pub struct History<S> {
    store: S,
    sessions: Vec<SessionRecord>,
}

impl<S: BlobStore> History<S> {
    /// Read persisted history from `store`. Missing or unreadable data
    /// yields an empty history.
    pub fn load(store: S) -> Self {
        let sessions = load_sessions(&store);
        debug!(count = sessions.len(), "history loaded");
        Self { store, sessions }
    }

    /// Newest first.
    pub fn sessions(&self) -> &[SessionRecord] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Record a finished run and persist the capped list.
    pub fn save(&mut self, duration_secs: u64, overtime_secs: u64, label: Option<&str>) -> SessionRecord {
        let now = Utc::now();
        let id = match self.sessions.first() {
            Some(newest) => now.timestamp_millis().max(newest.id.saturating_add(1)),
            None => now.timestamp_millis(),
        };
        let label = label
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_RECORD_LABEL)
            .to_string();

        let record = SessionRecord {
            id,
            date: now,
            duration: duration_secs,
            overtime: overtime_secs,
            label,
        };

        self.sessions.insert(0, record.clone());
        self.sessions.truncate(MAX_SESSIONS);
        self.persist();
        debug!(id, duration_secs, overtime_secs, "session saved");
        record
    }

    /// Forget every record, in memory and on disk.
    pub fn clear(&mut self) {
        self.sessions.clear();
        if let Err(e) = self.store.remove(HISTORY_KEY) {
            warn!(error = %e, "failed to clear persisted history");
        }
    }

    pub fn today_stats(&self) -> DailyStats {
        self.stats_on(Local::now().date_naive())
    }

    pub fn stats_on(&self, day: NaiveDate) -> DailyStats {
        self.sessions
            .iter()
            .filter(|s| s.local_day() == day)
            .fold(DailyStats::default(), |acc, s| DailyStats {
                count: acc.count.saturating_add(1),
                total_seconds: acc.total_seconds.saturating_add(s.total_secs()),
            })
    }

    /// Up to `limit` newest records.
    pub fn recent(&self, limit: usize) -> &[SessionRecord] {
        &self.sessions[..self.sessions.len().min(limit)]
    }

    /// How many records `recent(limit)` leaves out.
    pub fn older_count(&self, limit: usize) -> usize {
        self.sessions.len().saturating_sub(limit)
    }

    fn persist(&self) {
        let blob = match serde_json::to_string(&self.sessions) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "failed to serialize history");
                return;
            }
        };
        if let Err(e) = self.store.set(HISTORY_KEY, &blob) {
            warn!(error = %e, "failed to persist history, keeping it in memory");
        }
    }
}

/// Read the persisted list, newest first. Corruption and read failures
/// are logged and reported as an empty list.
pub fn load_sessions<S: BlobStore>(store: &S) -> Vec<SessionRecord> {
    let blob = match store.get(HISTORY_KEY) {
        Ok(Some(blob)) => blob,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(error = %e, "failed to read history");
            return Vec::new();
        }
    };
    match serde_json::from_str::<Vec<SessionRecord>>(&blob) {
        Ok(mut sessions) => {
            sessions.truncate(MAX_SESSIONS);
            sessions
        }
        Err(e) => {
            warn!(error = %e, "failed to parse history, starting empty");
            Vec::new()
        }
    }
}
