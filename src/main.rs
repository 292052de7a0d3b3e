//! crude-manager binary entry point.
//!
//! Parses flags, loads configuration, sets up file logging, starts the
//! backend worker, then runs the TUI with the terminal in raw mode and
//! restores it on exit.
//!
use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use anyhow::Context as _;
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

use crude_manager::app::config::AppConfig;
use crude_manager::app::keymap::Keymap;
use crude_manager::app::theme::Theme;
use crude_manager::app::{self, AppState};
use crude_manager::error::Result;
use crude_manager::{HttpUserService, worker};

/// Terminal front-end for a remote user REST API.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of the users API (overrides `api_base_url` in the config file).
    #[arg(long, env = "CRUDE_API_URL")]
    base_url: Option<String>,
    /// Path to the configuration file.
    #[arg(short, long, default_value = "crude.conf")]
    config: String,
    /// Path to the theme file.
    #[arg(long, default_value = "theme.conf")]
    theme: String,
    /// Path to the keybindings file.
    #[arg(long, default_value = "keybinds.conf")]
    keybinds: String,
    /// Write logs to this file (overrides `log_file` in the config file).
    #[arg(long, env = "CRUDE_LOG_FILE")]
    log_file: Option<String>,
}

/// Send tracing output to `path`; `RUST_LOG` wins over the configured level.
fn init_logging(path: &str, level: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {path}"))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_thread_names(true)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("init logging: {e}"))?;
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load_or_init(&args.config);
    if let Some(url) = args.base_url {
        config.api_base_url = url;
    }
    if let Some(path) = args.log_file {
        config.log_file = Some(path);
    }
    if let Some(path) = &config.log_file {
        init_logging(path, &config.log_level)?;
    }
    tracing::info!(api = %config.api_base_url, "starting crude-manager");

    let service = Arc::new(HttpUserService::new(config.api_base_url.clone()));
    let worker = worker::spawn(service)?;
    let mut state = AppState::new(Theme::load_or_init(&args.theme), Keymap::load_or_init(&args.keybinds));

    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, &mut state, &worker);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(%err, "application error");
        eprintln!("application error: {err:#}");
    }
    Ok(())
}
