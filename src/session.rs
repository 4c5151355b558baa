//! Replay session files.
//!
//! A session describes the geometry of one rendered page (viewport, document
//! height, heading positions in document coordinates) and a timed list of
//! user events. The format is TOML:
//!
//! ```toml
//! page_path = "architecture/game-loop.html"
//! path_to_root = "../"
//! toc = "toc.html"
//! viewport_height = 800.0
//! document_height = 5200.0
//!
//! [[headings]]
//! id = "overview"
//! top = 120.0
//! height = 32.0
//!
//! [[events]]
//! kind = "scroll"
//! at_ms = 0
//! scroll_top = 400.0
//! ```

use anyhow::{Context, Result, anyhow};
use pagetoc_core::{HeadingId, PlacedHeading};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct SessionFile {
    /// Current page relative to the book root.
    pub page_path: String,
    #[serde(default)]
    pub path_to_root: String,
    /// Sidebar chapter list markup, relative to the session file.
    #[serde(default)]
    pub toc: Option<PathBuf>,
    pub viewport_height: f64,
    pub document_height: f64,
    #[serde(default)]
    pub headings: Vec<PlacedHeading>,
    #[serde(default)]
    pub events: Vec<SessionEvent>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEvent {
    Scroll { at_ms: u64, scroll_top: f64 },
    Click { at_ms: u64, id: HeadingId },
    ToggleFold { at_ms: u64, id: HeadingId },
    EnableDebug { at_ms: u64 },
}

impl SessionEvent {
    pub fn at(&self) -> Duration {
        let at_ms = match self {
            SessionEvent::Scroll { at_ms, .. }
            | SessionEvent::Click { at_ms, .. }
            | SessionEvent::ToggleFold { at_ms, .. }
            | SessionEvent::EnableDebug { at_ms } => *at_ms,
        };
        Duration::from_millis(at_ms)
    }
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::Scroll { scroll_top, .. } => write!(f, "scroll to {scroll_top:.0}"),
            SessionEvent::Click { id, .. } => write!(f, "click #{id}"),
            SessionEvent::ToggleFold { id, .. } => write!(f, "toggle #{id}"),
            SessionEvent::EnableDebug { .. } => write!(f, "enable threshold debug"),
        }
    }
}

pub fn parse_session(contents: &str) -> Result<SessionFile> {
    let mut session: SessionFile =
        toml::from_str(contents).context("failed to parse session TOML")?;
    if !(session.viewport_height.is_finite() && session.viewport_height > 0.0) {
        return Err(anyhow!(
            "viewport_height must be positive, got {}",
            session.viewport_height
        ));
    }
    if !session.document_height.is_finite() || session.document_height < 0.0 {
        return Err(anyhow!(
            "document_height must not be negative, got {}",
            session.document_height
        ));
    }

    let in_order = session.events.windows(2).all(|pair| pair[0].at() <= pair[1].at());
    if !in_order {
        warn!("Session events are out of order; replaying them sorted by time");
        session.events.sort_by_key(SessionEvent::at);
    }
    Ok(session)
}

/// Load a session and resolve its `toc` path against the session's directory.
pub fn load_session(path: &Path) -> Result<SessionFile> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read session {}", path.display()))?;
    let mut session =
        parse_session(&contents).with_context(|| format!("Invalid session {}", path.display()))?;
    if let (Some(toc), Some(dir)) = (session.toc.as_mut(), path.parent()) {
        if toc.is_relative() {
            *toc = dir.join(&*toc);
        }
    }
    debug!(
        path = %path.display(),
        headings = session.headings.len(),
        events = session.events.len(),
        "Loaded replay session"
    );
    Ok(session)
}
