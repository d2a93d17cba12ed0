//! Terminal front end.
//!
//! Reads one key per line from stdin (`w a s d`, `h j k l`, or arrow names),
//! `r` restarts, `c` keeps playing after a win, `q` quits. With `--moves`
//! a script such as `"LLURD"` is played instead and the final grid printed.

use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use rust_2048::input::command_for_key;
use rust_2048::{
    Command, CommandQueue, FileStorage, GameSession, PersistenceAdapter, SessionConfig, StorageManager,
    TextRenderer,
};

/// Sliding-tile merge game in the terminal
#[derive(Parser, Debug)]
#[command(name = "rust-2048")]
#[command(about = "Play 2048 in the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML file with session settings (size, seed, win_value)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid side length (overrides the config file)
    #[arg(long)]
    size: Option<usize>,

    /// RNG seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Where the best score and unfinished game are kept
    #[arg(long, default_value = "rust-2048.json")]
    state_file: PathBuf,

    /// Play a scripted sequence (U R D L, r restart, c keep playing) and exit
    #[arg(long)]
    moves: Option<String>,
}

fn load_config(cli: &Cli) -> Result<SessionConfig> {
    let mut config: SessionConfig = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SessionConfig::default(),
    };

    if let Some(size) = cli.size {
        config.size = size;
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    config.validate().context("checking session settings")?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    debug!(?config, "configuration loaded");

    let storage = FileStorage::open(&cli.state_file)
        .with_context(|| format!("opening state file {}", cli.state_file.display()))?;
    let rng = config.rng();
    info!(seed = rng.seed(), "seeded spawn rng");

    let mut session = GameSession::new(config, rng, StorageManager::new(storage), TextRenderer::new(io::stdout()));

    if let Some(script) = &cli.moves {
        let mut queue = CommandQueue::from_script(script)
            .map_err(|ch| anyhow::anyhow!("unknown move {ch:?} in script"))?;
        let handled = session.run(&mut queue);
        info!(handled, score = session.score(), "script finished");
        return Ok(());
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        let key = line.trim();
        if key.is_empty() {
            continue;
        }

        match command_for_key(key) {
            Some(Command::Quit) => break,
            Some(command) => {
                session.handle(command);
            }
            None => eprintln!("unknown key {key:?}"),
        }
    }

    info!(
        score = session.score(),
        best = session.persistence().best_score(),
        "session closed"
    );
    Ok(())
}
