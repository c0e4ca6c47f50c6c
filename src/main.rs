//! subtext - text-substitution command engine.
//!
//! Minimal line-oriented host: reads text from stdin, runs each line through
//! the engine, and prints the (possibly substituted) result. The real host
//! delivers text-field change notifications the same way, one at a time.

use std::io::{self, BufRead, Write};
use std::path::Path;
use subtext::Config;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "subtext.toml";

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration; an explicit path must parse, the default path may
    // simply be absent.
    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path).map_err(|e| {
            error!(path = %path, error = %e, "Failed to load config");
            e
        })?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => Config::load(DEFAULT_CONFIG_PATH)?,
        None => Config::default(),
    };

    info!(
        scripts = %config.scripts.dir.display(),
        timeout_ms = config.engine.timeout_ms,
        "Starting subtext"
    );

    let (executor, loader) = subtext::bootstrap(&config);
    let loaded = loader.load_scripts();
    info!(modules = loaded, "Script modules loaded");

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        writeln!(stdout, "{}", executor.on_text_changed(&line))?;
        stdout.flush()?;
    }

    Ok(())
}
