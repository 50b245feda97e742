//! Background tick source.
//!
//! A tokio task that, once started, emits one [`Tick`] per interval until
//! stopped. It only talks to its owner through two channels: commands in,
//! ticks out. Stalls in the consuming side never delay the interval and a
//! slow consumer simply finds several ticks queued in order.

use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::debug;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// One elapsed interval. Carries no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickCommand {
    Start,
    Stop,
}

/// Handle to the tick worker. Dropping it shuts the worker down.
#[derive(Debug)]
pub struct TickSource {
    commands: UnboundedSender<TickCommand>,
}

impl TickSource {
    /// Spawn the worker on the current tokio runtime.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn spawn(period: Duration) -> (Self, UnboundedReceiver<Tick>) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(period, cmd_rx, tick_tx));
        (Self { commands: cmd_tx }, tick_rx)
    }

    /// Begin ticking. No-op if already ticking.
    pub fn start(&self) {
        let _ = self.commands.send(TickCommand::Start);
    }

    /// Stop ticking. No-op if not ticking.
    pub fn stop(&self) {
        let _ = self.commands.send(TickCommand::Stop);
    }
}

async fn run_worker(
    period: Duration,
    mut commands: UnboundedReceiver<TickCommand>,
    ticks: UnboundedSender<Tick>,
) {
    let mut interval: Option<Interval> = None;

    loop {
        tokio::select! {
            // Commands first, so a due tick never overtakes a queued stop.
            biased;
            cmd = commands.recv() => match cmd {
                Some(TickCommand::Start) => {
                    if interval.is_none() {
                        // First tick one full period after start.
                        let mut iv = time::interval_at(Instant::now() + period, period);
                        iv.set_missed_tick_behavior(MissedTickBehavior::Delay);
                        interval = Some(iv);
                        debug!(?period, "tick source started");
                    }
                }
                Some(TickCommand::Stop) => {
                    if interval.take().is_some() {
                        debug!("tick source stopped");
                    }
                }
                None => break,
            },
            _ = next_tick(&mut interval), if interval.is_some() => {
                if ticks.send(Tick).is_err() {
                    break;
                }
            }
        }
    }
    debug!("tick source shut down");
}

async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(iv) => {
            iv.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
