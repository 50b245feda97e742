//! End-to-end focus runs against a SQLite-backed history.
//!
//! Time is paused so one-second ticks run instantly and deterministically.

use std::time::Duration;

use chrono::Local;
use lockin_core::storage::{Database, History, MAX_SESSIONS};
use lockin_core::timer::{TimerController, TimerStatus, DEFAULT_TICK_INTERVAL};
use lockin_core::{DailyStats, Event};
use tempfile::TempDir;

async fn run_for(secs: u64) {
    tokio::time::sleep(Duration::from_millis(secs * 1000 + 500)).await;
}

#[tokio::test(start_paused = true)]
async fn overtime_session_is_split_and_survives_restart() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("lockin.db");

    {
        let mut history = History::load(Database::open_at(&db_path).unwrap());
        let mut timer = TimerController::new(1, DEFAULT_TICK_INTERVAL);
        timer.start();
        run_for(100).await;

        let snapshot = timer.pump();
        assert!(snapshot.iter().any(|e| matches!(e, Event::OvertimeStarted { .. })));
        assert!(timer.engine().is_overtime());
        assert_eq!(timer.engine().time_display(), "00:40");

        let finished = timer.finish(&mut history, "Write chapter");
        assert_eq!(finished.outcome.base_secs, 60);
        assert_eq!(finished.outcome.overtime_secs, 40);
    }

    let history = History::load(Database::open_at(&db_path).unwrap());
    assert_eq!(history.len(), 1);
    let record = &history.sessions()[0];
    assert_eq!(record.duration, 60);
    assert_eq!(record.overtime, 40);
    assert_eq!(record.label, "Write chapter");
    assert_eq!(
        history.today_stats(),
        DailyStats {
            count: 1,
            total_seconds: 100
        }
    );
}

#[tokio::test(start_paused = true)]
async fn extend_pause_resume_then_finish() {
    let mut history = History::load(Database::open_memory().unwrap());
    let mut timer = TimerController::new(1, DEFAULT_TICK_INTERVAL);

    timer.start();
    run_for(50).await;
    timer.add_duration(5 * 60);
    timer.pause();
    assert_eq!(timer.status(), TimerStatus::Paused);
    run_for(600).await;
    timer.start();
    run_for(40).await;

    let finished = timer.finish(&mut history, "");
    assert_eq!(finished.outcome.elapsed_secs, 90);
    assert_eq!(finished.outcome.base_secs, 90);
    assert_eq!(finished.outcome.overtime_secs, 0);
    assert_eq!(history.sessions()[0].label, "Focus Session");
    assert_eq!(timer.engine().target_secs(), 360);
}

#[tokio::test(start_paused = true)]
async fn history_keeps_fifty_newest_runs() {
    let mut history = History::load(Database::open_memory().unwrap());
    let mut timer = TimerController::new(45, DEFAULT_TICK_INTERVAL);

    for _ in 0..55 {
        timer.start();
        run_for(61).await;
        let finished = timer.finish(&mut history, "loop");
        assert!(finished.saved());
    }
    assert_eq!(history.len(), MAX_SESSIONS);
    let today = history.stats_on(Local::now().date_naive());
    assert!(today.count <= MAX_SESSIONS as u64);
}

#[tokio::test(start_paused = true)]
async fn setup_phase_duration_changes() {
    let mut timer = TimerController::new(45, DEFAULT_TICK_INTERVAL);
    assert_eq!(timer.set_duration(25).len(), 1);
    assert_eq!(timer.engine().time_display(), "25:00");

    timer.start();
    run_for(3).await;
    assert!(timer.set_duration(90).is_empty());
    timer.pump();
    assert_eq!(timer.engine().time_display(), "24:57");
}
