mod controller;
mod engine;
mod ticker;

pub use controller::TimerController;
pub use engine::{format_time, TimerEngine, TimerStatus};
pub use ticker::{Tick, TickSource, DEFAULT_TICK_INTERVAL};
