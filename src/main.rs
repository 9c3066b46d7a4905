//! Headless shared-field runner (default binary).
//!
//! Registers scripted controllers that issue random commands, runs the scheduler for a
//! fixed number of ticks and prints one JSON line per tick with activity, then the final snapshot.
//! Logs go to stderr so stdout stays machine readable.
//!
//! Environment:
//!
//! - `COOP_TETRIS_CONFIG`: path to a JSON [`GameConfig`] (otherwise `COOP_TETRIS_*` vars)
//! - `COOP_TETRIS_CONTROLLERS`: number of scripted controllers (default 2)
//! - `COOP_TETRIS_TICKS`: ticks to run (default 2000)
//! - `COOP_TETRIS_LOG`: log level filter (default `info`)

use std::io::Write;
use std::str::FromStr;

use anyhow::{Context, Result};
use log::{info, warn, LevelFilter, Log, Metadata, Record};

use coop_tetris::core::SimpleRng;
use coop_tetris::engine::{Game, GameConfig};
use coop_tetris::types::{Command, Direction, TICK_MS};

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[coop-tetris] {} {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging() -> Result<()> {
    let level = env_or("COOP_TETRIS_LOG", LevelFilter::Info);
    log::set_logger(&LOGGER).map_err(|e| anyhow::anyhow!("installing logger: {e}"))?;
    log::set_max_level(level);
    Ok(())
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn load_config() -> Result<GameConfig> {
    let config = match std::env::var("COOP_TETRIS_CONFIG") {
        Ok(path) => {
            let text =
                std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            GameConfig::from_json_str(&text).with_context(|| format!("loading {path}"))?
        }
        Err(_) => GameConfig::from_env(),
    };
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Random command for a scripted controller, or nothing this tick.
fn scripted_command(rng: &mut SimpleRng) -> Option<Command> {
    match rng.next_range(8) {
        0 => Some(Command::Move(Direction::Left)),
        1 => Some(Command::Move(Direction::Right)),
        2 => Some(Command::Rotate),
        3 => Some(Command::Move(Direction::Down)),
        _ => None,
    }
}

fn main() -> Result<()> {
    init_logging()?;

    let config = load_config()?;
    let controller_count: usize = env_or("COOP_TETRIS_CONTROLLERS", 2);
    let ticks: u64 = env_or("COOP_TETRIS_TICKS", 2000);
    let mut rng = SimpleRng::new(config.seed.wrapping_add(1));

    let mut game = Game::new(config).context("creating game")?;
    let controllers: Vec<_> = (0..controller_count)
        .map(|_| game.register_controller())
        .collect();
    if !game.is_running() {
        warn!(
            "{} controllers registered but {} required; nothing will move",
            controller_count,
            game.config().min_controllers
        );
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for _ in 0..ticks {
        for &controller in &controllers {
            if let Some(command) = scripted_command(&mut rng) {
                game.submit(controller, command);
            }
        }

        let report = game.tick(TICK_MS);
        if !report.is_quiet() {
            serde_json::to_writer(&mut out, &report)?;
            writeln!(out)?;
        }

        if report.game_over {
            break;
        }
    }

    serde_json::to_writer_pretty(&mut out, &game.snapshot())?;
    writeln!(out)?;

    info!(
        "finished after {} ticks: score {}, lines {}, game over: {}",
        game.ticks(),
        game.score(),
        game.lines(),
        game.is_game_over()
    );
    Ok(())
}
