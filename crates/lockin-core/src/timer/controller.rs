use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

use super::engine::{TimerEngine, TimerStatus};
use super::ticker::{Tick, TickSource};
use crate::events::Event;
use crate::session::{finalize, resolve_label, FinishedSession};
use crate::storage::{BlobStore, History};

/// Single owner of the timer state.
///
/// Couples a [`TimerEngine`] with its [`TickSource`]: every command that
/// changes the running state also starts or stops the tick worker, and ticks
/// only ever reach the engine through this type. Commands return the events
/// they produced, oldest first.
pub struct TimerController {
    engine: TimerEngine,
    ticker: TickSource,
    ticks: UnboundedReceiver<Tick>,
}

impl TimerController {
    /// Spawns the tick worker, so this must run inside a tokio runtime.
    pub fn new(minutes: u64, tick_interval: Duration) -> Self {
        let (ticker, ticks) = TickSource::spawn(tick_interval);
        Self {
            engine: TimerEngine::new(minutes),
            ticker,
            ticks,
        }
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn status(&self) -> TimerStatus {
        self.engine.status()
    }

    pub fn snapshot(&self) -> Event {
        self.engine.snapshot()
    }

    pub fn start(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if self.engine.status() != TimerStatus::Running {
            // Anything that slipped in after a pause or stop is stale.
            self.discard_pending();
        }
        if let Some(ev) = self.engine.start() {
            self.ticker.start();
            events.push(ev);
        }
        events
    }

    pub fn pause(&mut self) -> Vec<Event> {
        let mut events = self.pump();
        if let Some(ev) = self.engine.pause() {
            self.ticker.stop();
            events.push(ev);
        }
        events
    }

    /// Pause when running, resume when paused.
    pub fn toggle_pause(&mut self) -> Vec<Event> {
        match self.engine.status() {
            TimerStatus::Running => self.pause(),
            TimerStatus::Paused => self.start(),
            TimerStatus::Idle => Vec::new(),
        }
    }

    /// Stop without recording anything. Use [`finish`](Self::finish) to keep
    /// the run.
    pub fn stop(&mut self) -> Vec<Event> {
        self.ticker.stop();
        self.discard_pending();
        self.engine.stop().into_iter().collect()
    }

    pub fn add_duration(&mut self, delta_secs: u64) -> Vec<Event> {
        self.engine.add_duration(delta_secs).into_iter().collect()
    }

    pub fn set_duration(&mut self, minutes: u64) -> Vec<Event> {
        self.engine.set_duration(minutes).into_iter().collect()
    }

    pub fn reset(&mut self) -> Vec<Event> {
        let mut events = self.pump();
        events.extend(self.engine.reset());
        events
    }

    /// Apply every tick already delivered, without waiting.
    pub fn pump(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(Tick) = self.ticks.try_recv() {
            events.extend(self.engine.tick());
        }
        events
    }

    /// Wait for the next tick that advances the timer and apply it.
    ///
    /// Returns `None` once the tick worker has gone away. Cancel-safe: a
    /// received tick is applied before this returns.
    pub async fn next_tick(&mut self) -> Option<Event> {
        loop {
            match self.ticks.recv().await {
                Some(Tick) => {
                    if let Some(ev) = self.engine.tick() {
                        return Some(ev);
                    }
                }
                None => {
                    warn!("tick source is gone, timer can no longer advance");
                    return None;
                }
            }
        }
    }

    /// Finalize the current run and stop the timer, in that order.
    ///
    /// Qualifying runs are written to `history` under `label` (or the
    /// default label when blank). Valid from any state.
    pub fn finish<S: BlobStore>(&mut self, history: &mut History<S>, label: &str) -> FinishedSession {
        let mut events = self.pump();
        let outcome = finalize(self.engine.elapsed_secs(), self.engine.target_secs());

        let record = if outcome.qualifies {
            let label = resolve_label(label);
            Some(history.save(outcome.base_secs, outcome.overtime_secs, Some(&label)))
        } else {
            info!(elapsed = outcome.elapsed_secs, "run too short, not recorded");
            None
        };
        events.push(FinishedSession::outcome_event(&outcome, record.as_ref()));
        events.extend(self.stop());

        FinishedSession {
            outcome,
            record,
            events,
        }
    }

    fn discard_pending(&mut self) {
        while self.ticks.try_recv().is_ok() {}
    }
}
