//! Entry point for the headless page tracker.
//!
//! Responsibilities here are intentionally minimal:
//! - Parse command-line arguments.
//! - Load user configuration from `conf/config.toml`.
//! - Load the rendered page, the replay session, and the sidebar markup.
//! - Replay the session and print the resulting sidebar.

mod config;
mod replay;
mod report;
mod session;

use crate::config::{load_config, serialize_config};
use crate::replay::Replay;
use crate::report::render_sidebar;
use crate::session::load_session;
use anyhow::{Context, Result, anyhow};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

const USAGE: &str = "Usage: pagetoc <page.html> <session.toml> [--json]";

struct Args {
    page: PathBuf,
    session: PathBuf,
    json: bool,
}

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let args = parse_args()?;
    let config = load_config(Path::new("conf/config.toml"));
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(
        page = %args.page.display(),
        session = %args.session.display(),
        level = %config.log_level,
        "Starting page tracker replay"
    );
    info!(
        down_threshold_px = config.down_threshold_px,
        up_threshold_px = config.up_threshold_px,
        suspend_ms = config.suspend_ms,
        fold_level = config.fold_level,
        "Active tracking configuration"
    );
    if let Ok(text) = serialize_config(&config) {
        debug!("Effective configuration:\n{text}");
    }

    let page_html = fs::read_to_string(&args.page)
        .with_context(|| format!("Failed to read page {}", args.page.display()))?;
    let session = load_session(&args.session)?;
    let toc_html = match &session.toc {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read sidebar {}", path.display()))?,
        ),
        None => None,
    };

    let mut replay = Replay::prepare(&page_html, toc_html.as_deref(), &session, &config)
        .context("Failed to prepare replay")?;
    let outcomes = replay.run(&session.events);
    info!(events = outcomes.len(), "Replay finished");

    let view = replay.view();
    if args.json {
        let json = serde_json::to_string_pretty(&view).context("Failed to encode view")?;
        println!("{json}");
    } else {
        for outcome in &outcomes {
            let active = outcome
                .active
                .as_ref()
                .map(|id| id.as_str())
                .unwrap_or("-");
            println!(
                "{:>6}ms  {:<28} active={active} threshold={:.1}",
                outcome.at.as_millis(),
                outcome.event,
                outcome.threshold
            );
        }
        println!();
        let sidebar = render_sidebar(&view).context("Failed to render sidebar")?;
        print!("{sidebar}");
    }
    Ok(())
}

fn parse_args() -> Result<Args> {
    let mut positional = Vec::new();
    let mut json = false;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            flag if flag.starts_with("--") => {
                return Err(anyhow!("Unknown flag {flag}\n{USAGE}"));
            }
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    let mut positional = positional.into_iter();
    let (Some(page), Some(session), None) =
        (positional.next(), positional.next(), positional.next())
    else {
        return Err(anyhow!(USAGE));
    };
    for path in [&page, &session] {
        if !path.exists() {
            return Err(anyhow!("File not found: {}", path.display()));
        }
    }
    Ok(Args {
        page,
        session,
        json,
    })
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    warn!("Logging initialized; override level with config log_level or RUST_LOG");
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = handle.modify(|filter| *filter = parsed.clone()) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}
