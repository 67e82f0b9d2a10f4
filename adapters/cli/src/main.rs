#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Unblock Jam in a terminal.

mod config;
mod intent;
mod render;
mod session;

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use unblock_jam_core::{LevelIndex, ScoreBook};
use unblock_jam_levels::load_levels;
use unblock_jam_scores::{FileBlobStore, ScoreStore};
use unblock_jam_system_auto_advance::{AutoAdvance, Config as AutoAdvanceConfig};
use unblock_jam_system_bootstrap::Bootstrap;
use unblock_jam_world::{LevelRegistry, World};

use crate::{config::Settings, session::Session};

const DEFAULT_LOG_FILTER: &str = "warn";

/// Sliding block puzzles in the terminal.
#[derive(Debug, Parser)]
#[command(name = "unblock-jam", version, about)]
struct Cli {
    /// Configuration file to read instead of `unblock-jam.toml`.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Level definition file.
    #[arg(long, global = true, value_name = "PATH")]
    levels: Option<PathBuf>,
    /// Directory holding the stored best scores.
    #[arg(long, global = true, value_name = "DIR")]
    scores_dir: Option<PathBuf>,
    /// Pause between solving a puzzle and loading the next, in milliseconds.
    #[arg(long, global = true, value_name = "MS")]
    advance_delay_ms: Option<u64>,
    #[command(subcommand)]
    command: Option<Mode>,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Play puzzles interactively (default).
    Play {
        /// Puzzle number to start on, counting from 1.
        #[arg(long, value_name = "N")]
        level: Option<u32>,
    },
    /// List the available puzzles.
    Levels,
    /// Print the stored best scores.
    Scores,
}

/// Entry point for the Unblock Jam command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?.with_overrides(
        cli.levels,
        cli.scores_dir,
        cli.advance_delay_ms,
    );

    match cli.command.unwrap_or(Mode::Play { level: None }) {
        Mode::Play { level } => play(&settings, level),
        Mode::Levels => list_levels(&settings),
        Mode::Scores => print_scores(&settings),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_registry(settings: &Settings) -> Result<LevelRegistry> {
    let levels = load_levels(&settings.levels)
        .with_context(|| format!("failed to load levels from {}", settings.levels.display()))?;
    LevelRegistry::new(levels).context("level file cannot be played")
}

fn score_store(settings: &Settings) -> ScoreStore<FileBlobStore> {
    ScoreStore::new(FileBlobStore::new(&settings.scores_dir))
}

fn play(settings: &Settings, level: Option<u32>) -> Result<()> {
    let registry = load_registry(settings)?;
    let scores = score_store(settings);
    let book = scores.stats().unwrap_or_else(|error| {
        tracing::error!(error = %error, "failed to read stored scores, starting empty");
        ScoreBook::new()
    });

    let bootstrap = Bootstrap;
    let world = match level {
        Some(number) => World::starting_at(registry, LevelIndex::new(number.saturating_sub(1))),
        None => bootstrap.start(registry, &book),
    };
    let auto_advance = AutoAdvance::new(AutoAdvanceConfig::new(settings.advance_delay()));
    let mut session = Session::new(world, auto_advance, scores, book);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", bootstrap.welcome_banner(session.world()))?;
    writeln!(out, "Type `help` for the list of commands.")?;
    session
        .run(stdin.lock(), &mut out)
        .context("terminal session failed")
}

fn list_levels(settings: &Settings) -> Result<()> {
    let registry = load_registry(settings)?;
    let book = score_store(settings)
        .stats()
        .context("failed to read stored scores")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (index, level) in registry.iter() {
        let dimension = level.dimension();
        let best = book
            .best_score(index)
            .map_or_else(|| "-".to_owned(), |score| score.to_string());
        writeln!(
            out,
            "{:>4}  {}x{}  {:>2} blocks  optimal {:>3}  best {best:>3}",
            index.get() + 1,
            dimension.width(),
            dimension.height(),
            level.blocks().len(),
            level.optimal_moves(),
        )?;
    }
    Ok(())
}

fn print_scores(settings: &Settings) -> Result<()> {
    let book = score_store(settings)
        .stats()
        .context("failed to read stored scores")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if book.is_empty() {
        writeln!(out, "No puzzles solved yet.")?;
        return Ok(());
    }
    for (key, stats) in book.iter() {
        let puzzle = key
            .parse::<u32>()
            .map_or_else(|_| key.to_owned(), |index| (index + 1).to_string());
        writeln!(out, "Puzzle {puzzle:>4}  best {}", stats.best_score)?;
    }
    Ok(())
}
