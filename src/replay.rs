//! Drives a [`HeadingTracker`] through a recorded session.
//!
//! The replay stands in for the browser: it owns the page geometry, moves the
//! scroll offset, and advances a manual clock to each event's timestamp.

use crate::config::AppConfig;
use crate::session::{SessionEvent, SessionFile};
use anyhow::Result;
use pagetoc_core::{
    Clock, HeadingId, HeadingTracker, ManualClock, Sidebar, StaticPage, TrackerView,
    extract_headings,
};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub at: Duration,
    pub event: String,
    pub active: Option<HeadingId>,
    pub threshold: f64,
}

pub struct Replay {
    tracker: HeadingTracker,
    page: StaticPage,
    sidebar: Option<Sidebar>,
    clock: ManualClock,
}

impl Replay {
    /// Build the page model and run the initial, load-time tracking pass.
    pub fn prepare(
        page_html: &str,
        toc_html: Option<&str>,
        session: &SessionFile,
        config: &AppConfig,
    ) -> Result<Self> {
        let headings = extract_headings(page_html)?;
        let page = StaticPage::new(
            session.headings.clone(),
            session.viewport_height,
            session.document_height,
        );
        for heading in &headings {
            if !page.headings().iter().any(|placed| placed.id == heading.id) {
                warn!(id = %heading.id, "Heading has no geometry in session; it is never selected");
            }
        }

        let sidebar = match toc_html {
            Some(html) => {
                let mut sidebar = Sidebar::parse(html)?;
                sidebar.resolve(&session.page_path, &session.path_to_root);
                Some(sidebar)
            }
            None => None,
        };

        let mut tracker = HeadingTracker::new(config.tracker_settings());
        // Headings hang off the active chapter; without one there is nowhere
        // to show them.
        let has_anchor = sidebar
            .as_ref()
            .is_none_or(|sidebar| sidebar.active().is_some());
        if has_anchor {
            tracker.initialize(headings);
        } else {
            warn!(page = %session.page_path, "Page is not in the sidebar; heading tracking disabled");
        }

        let mut replay = Self {
            tracker,
            page,
            sidebar,
            clock: ManualClock::new(),
        };
        if config.threshold_overlay {
            replay.tracker.enable_threshold_debug(&replay.page);
        }
        replay.tracker.on_scroll(&replay.page, &replay.clock);
        info!(
            headings = replay.tracker.outline().map_or(0, |outline| outline.len()),
            active = ?replay.tracker.active_heading_id().map(HeadingId::as_str),
            "Page loaded"
        );
        Ok(replay)
    }

    pub fn run(&mut self, events: &[SessionEvent]) -> Vec<StepOutcome> {
        events.iter().map(|event| self.apply(event)).collect()
    }

    pub fn apply(&mut self, event: &SessionEvent) -> StepOutcome {
        if event.at() >= self.clock.now() {
            self.clock.set(event.at());
        } else {
            debug!(%event, "Event timestamp is in the past; keeping clock");
        }

        match event {
            SessionEvent::Scroll { scroll_top, .. } => {
                self.page.scroll_to(*scroll_top);
                self.tracker.on_scroll(&self.page, &self.clock);
            }
            SessionEvent::Click { id, .. } => {
                self.tracker
                    .on_nav_entry_click(&mut self.page, &self.clock, id);
                // The browser reports the jump as an ordinary scroll.
                self.tracker.on_scroll(&self.page, &self.clock);
            }
            SessionEvent::ToggleFold { id, .. } => {
                if self.tracker.toggle_fold(id).is_none() {
                    debug!(%id, "Heading has no fold toggle");
                }
            }
            SessionEvent::EnableDebug { .. } => {
                self.tracker.enable_threshold_debug(&self.page);
            }
        }

        let outcome = StepOutcome {
            at: self.clock.now(),
            event: event.to_string(),
            active: self.tracker.active_heading_id().cloned(),
            threshold: self.tracker.threshold(),
        };
        info!(
            at_ms = outcome.at.as_millis() as u64,
            event = %outcome.event,
            active = ?outcome.active.as_ref().map(HeadingId::as_str),
            threshold = outcome.threshold,
            "Replayed event"
        );
        outcome
    }

    pub fn view(&self) -> TrackerView {
        TrackerView::capture(&self.tracker, self.sidebar.as_ref(), &self.clock)
    }
}
