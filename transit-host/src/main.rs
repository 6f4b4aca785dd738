//! Transit Board host runner
//!
//! Runs the departures pipeline on a desktop machine: feeds are fetched
//! with reqwest and each frame is printed to the terminal as a text grid.
//!
//! The configuration file path comes from `TRANSIT_BOARD_CONFIG`
//! (default `board.toml`). Log verbosity follows `RUST_LOG`.

mod delay;
mod net;
mod terminal;

use std::env;
use std::error::Error;
use std::fs;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use transit_core::{parse_config, Orchestrator, Scheduler, TickOutcome};
use transit_hal::LinkConfig;

use delay::StdDelay;
use net::{HostLink, ReqwestClient};
use terminal::TerminalSurface;

/// Environment variable naming the config file
const CONFIG_ENV: &str = "TRANSIT_BOARD_CONFIG";

/// Config file used when the variable is unset
const DEFAULT_CONFIG_PATH: &str = "board.toml";

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let path = env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let text = fs::read_to_string(&path).map_err(|e| {
        error!(path = %path, error = %e, "cannot read config");
        e
    })?;
    let config = parse_config(&text).map_err(|e| {
        error!(path = %path, error = %e, "invalid config");
        format!("{path}: {e}")
    })?;

    let url = config.feed_url();
    info!(
        url = %url,
        kind = ?config.feed.kind,
        period_s = config.schedule.period_s,
        "starting transit board"
    );

    let link = HostLink::for_url(&url, LinkConfig::default())?;
    let client = ReqwestClient::new(config.feed.connect_timeout_ms)?;
    let mut orchestrator = Orchestrator::new(&config, link, client, TerminalSurface::stdout());

    let mut scheduler = Scheduler::new(config.schedule.period_ms());
    let mut delay = StdDelay;
    scheduler.run(&mut delay, |delay| match orchestrator.tick(delay) {
        TickOutcome::Rendered { rows, pages } => info!(rows, pages, "frame rendered"),
        TickOutcome::Skipped(reason) => warn!(%reason, "refresh skipped, keeping previous frame"),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
