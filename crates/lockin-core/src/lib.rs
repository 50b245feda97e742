//! # LockIN Core Library
//!
//! This library provides the core logic for the LockIN focus timer: a single
//! countdown that may run into overtime, a background tick source, and a
//! small local history of completed sessions. Front ends (the `lockin` CLI,
//! or any GUI) only render what this crate produces and forward user intents
//! into it.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a tick-driven state machine (Idle, Running, Paused)
//!   tracking target and elapsed seconds, overtime and display values
//! - **Tick Source**: a tokio task emitting one tick per second over a
//!   channel, started and stopped in lock-step with the engine
//! - **Session Finalizer**: splits a stopped run into base and overtime and
//!   filters out runs of a minute or less
//! - **Storage**: a bounded JSON history in a key-value blob store (SQLite)
//!   and TOML-based configuration
//! - **Boundaries**: ambient sound generation and a screen wake-lock
//!   coordinator behind small traits
//!
//! ## Key Components
//!
//! - [`TimerController`]: engine + tick source, with finalize-and-stop
//! - [`History`]: session records and daily statistics
//! - [`Config`]: application configuration management

pub mod audio;
pub mod error;
pub mod events;
pub mod session;
pub mod storage;
pub mod timer;
pub mod wake_lock;

pub use audio::{AmbientMixer, AmbientSound};
pub use error::{ConfigError, CoreError, StorageError, ValidationError, WakeLockError};
pub use events::Event;
pub use session::{finalize, FinishedSession, SessionOutcome};
pub use storage::{BlobStore, Config, DailyStats, Database, History, MemoryStore, SessionRecord};
pub use timer::{format_time, TimerController, TimerEngine, TimerStatus};
pub use wake_lock::{WakeLock, WakeLockPlatform};
