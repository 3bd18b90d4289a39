//! mdsync - A terminal markdown editor with scroll-synced preview.
//!
//! # Usage
//!
//! ```bash
//! mdsync notes.md
//! mdsync --sync-delay 250 notes.md
//! mdsync --no-sync --export out/notes.html notes.md
//! ```

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mdsync::app::App;
use mdsync::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use mdsync::sync::DEFAULT_DELAY;

/// A terminal markdown editor with a scroll-synced live preview
#[derive(Parser, Debug)]
#[command(name = "mdsync", version, about, long_about = None)]
struct Cli {
    /// Markdown file to edit (created on first save)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Start with scroll sync turned off
    #[arg(long)]
    no_sync: bool,

    /// Quiet period after the last scroll before the other pane follows
    #[arg(long, value_name = "MS")]
    sync_delay: Option<u64>,

    /// Do not open exports in the browser
    #[arg(long)]
    no_open: bool,

    /// Where Ctrl+P writes the printable page (default: FILE.print.html)
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Write diagnostics to a file (filter with RUST_LOG)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

/// Route `tracing` output to `path`. The terminal belongs to the UI, so
/// without a log file nothing is installed.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let log_path = effective
        .log_file
        .clone()
        .or_else(|| std::env::var_os("MDSYNC_LOG").map(PathBuf::from));
    if let Err(err) = init_logging(log_path.as_deref()) {
        eprintln!("[warn] {err:#}");
    }

    if cli.file.is_dir() {
        anyhow::bail!("Not a file: {}", cli.file.display());
    }

    let sync_delay = effective
        .sync_delay_ms
        .map_or(DEFAULT_DELAY, Duration::from_millis);

    // Run the application
    let mut app = App::new(cli.file)
        .with_sync(!effective.no_sync)
        .with_sync_delay(sync_delay)
        .with_export_path(effective.export.clone())
        .with_open_export(!effective.no_open)
        .with_config_paths(
            Some(global_path.clone()),
            if local_path.exists() {
                Some(local_path.clone())
            } else {
                None
            },
        );

    app.run().context("Application error")
}
