use std::io::Write;
use std::time::Duration;

use clap::Args;
use lockin_core::storage::{Database, History};
use lockin_core::audio::{AmbientMixer, AmbientSound, SAMPLE_RATE};
use lockin_core::timer::TimerController;
use lockin_core::wake_lock::{NoopPlatform, WakeLock};
use lockin_core::{Config, Event, FinishedSession};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

#[derive(Args)]
pub struct RunArgs {
    /// Focus length in minutes (defaults to timer.default_duration_min)
    #[arg(short, long)]
    minutes: Option<u64>,
    /// What you are locking in on
    #[arg(short, long, default_value = "")]
    label: String,
    /// Print every event as a JSON line instead of a status line
    #[arg(long)]
    json: bool,
}

const HELP: &str = "commands: p = pause/resume, + = extend, r = reset, a = ambient sound, s = stop";

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run_session(args, config));
    // A pending stdin read would otherwise hold the runtime open.
    runtime.shutdown_background();
    result
}

async fn run_session(args: RunArgs, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut history = History::load(Database::open()?);
    let mut timer = TimerController::new(
        config.timer.default_duration_min,
        config.timer.tick_interval(),
    );
    if let Some(minutes) = args.minutes {
        timer.set_duration(minutes);
    }
    let mut wake_lock = WakeLock::new(NoopPlatform);
    let extend_secs = config.timer.extend_step_secs();
    let mut sound = AmbientMixer::new(
        SAMPLE_RATE,
        config.sound.volume,
        Duration::from_millis(config.sound.smoothing_ms),
    )?;
    if config.sound.enabled {
        sound.enable();
    }

    eprintln!("{HELP}");
    report_sound(&sound);
    let started = timer.start();
    render(&args, &timer, &started)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let finished = loop {
        wake_lock.set_should_lock(config.wake_lock.enabled && timer.engine().is_active());

        let events = tokio::select! {
            tick = timer.next_tick() => match tick {
                Some(ev) => vec![ev],
                None => {
                    warn!("timer stopped advancing, finishing session");
                    break timer.finish(&mut history, &args.label);
                }
            },
            line = lines.next_line() => match line? {
                Some(cmd) => match cmd.trim() {
                    "p" => timer.toggle_pause(),
                    "+" => timer.add_duration(extend_secs),
                    "r" => timer.reset(),
                    "a" => {
                        sound.toggle();
                        report_sound(&sound);
                        Vec::new()
                    }
                    "s" | "q" => break timer.finish(&mut history, &args.label),
                    "" => Vec::new(),
                    other => {
                        eprintln!("unknown command '{other}'. {HELP}");
                        Vec::new()
                    }
                },
                None => break timer.finish(&mut history, &args.label),
            },
            _ = tokio::signal::ctrl_c() => break timer.finish(&mut history, &args.label),
        };
        render(&args, &timer, &events)?;
    };
    wake_lock.set_should_lock(false);

    report(&args, &finished)
}

fn report_sound(sound: &impl AmbientSound) {
    let state = if sound.is_enabled() { "on" } else { "off" };
    eprintln!("ambient sound: {state} (volume {:.2})", sound.volume());
}

fn render(args: &RunArgs, timer: &TimerController, events: &[Event]) -> Result<(), Box<dyn std::error::Error>> {
    let mut out = std::io::stdout().lock();
    if args.json {
        for ev in events {
            writeln!(out, "{}", serde_json::to_string(ev)?)?;
        }
        return Ok(());
    }

    let engine = timer.engine();
    let sign = if engine.is_overtime() { "+" } else { " " };
    let state = if engine.is_active() { "" } else { " [paused]" };
    let label = if args.label.trim().is_empty() {
        lockin_core::session::DEFAULT_SESSION_LABEL
    } else {
        args.label.trim()
    };
    write!(out, "\r{sign}{}  {label}{state}\x1b[K", engine.time_display())?;
    out.flush()?;
    Ok(())
}

fn report(args: &RunArgs, finished: &FinishedSession) -> Result<(), Box<dyn std::error::Error>> {
    if args.json {
        for ev in &finished.events {
            println!("{}", serde_json::to_string(ev)?);
        }
        return Ok(());
    }

    println!();
    match &finished.record {
        Some(record) => {
            let overtime = if record.overtime > 0 {
                format!(" +{}m", record.overtime / 60)
            } else {
                String::new()
            };
            println!("Saved: {}m{overtime} {}", record.duration / 60, record.label);
        }
        None => println!(
            "Not saved: run lasted {}s, sessions must exceed a minute",
            finished.outcome.elapsed_secs
        ),
    }
    Ok(())
}
