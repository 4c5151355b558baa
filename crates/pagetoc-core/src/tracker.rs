//! Scroll and click handling for the "on this page" heading list.

use crate::clock::Clock;
use crate::host::PageHost;
use crate::outline::{DEFAULT_FOLD_LEVEL, Heading, HeadingId, Outline};
use crate::selector::select_current;
use crate::threshold::{
    DEFAULT_DOWN_THRESHOLD_PX, DEFAULT_UP_THRESHOLD_PX, ThresholdCalculator, ThresholdSample,
};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, trace};
use ts_rs::TS;

/// How long scroll events are ignored after a heading link is clicked.
pub const DEFAULT_SUSPEND_WINDOW: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerSettings {
    pub down_threshold_px: f64,
    pub up_threshold_px: f64,
    pub suspend_for: Duration,
    pub fold_level: u8,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            down_threshold_px: DEFAULT_DOWN_THRESHOLD_PX,
            up_threshold_px: DEFAULT_UP_THRESHOLD_PX,
            suspend_for: DEFAULT_SUSPEND_WINDOW,
            fold_level: DEFAULT_FOLD_LEVEL,
        }
    }
}

/// Diagnostic marker drawn at the threshold line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct DebugOverlay {
    /// Marker position in px from the viewport top.
    pub line_top: f64,
    pub sample: Option<ThresholdSample>,
}

/// Tracks which heading is current for one page view.
#[derive(Debug, Clone)]
pub struct HeadingTracker {
    settings: TrackerSettings,
    calculator: ThresholdCalculator,
    outline: Option<Outline>,
    suspended_until: Option<Duration>,
    debug_enabled: bool,
    last_sample: Option<ThresholdSample>,
}

impl Default for HeadingTracker {
    fn default() -> Self {
        Self::new(TrackerSettings::default())
    }
}

impl HeadingTracker {
    pub fn new(settings: TrackerSettings) -> Self {
        Self {
            settings,
            calculator: ThresholdCalculator::new(
                settings.down_threshold_px,
                settings.up_threshold_px,
            ),
            outline: None,
            suspended_until: None,
            debug_enabled: false,
            last_sample: None,
        }
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    /// Store the page's headings. An empty list leaves the tracker inert.
    pub fn initialize(&mut self, headings: Vec<Heading>) {
        if headings.is_empty() {
            debug!("No headings on page; heading tracking stays off");
            return;
        }
        self.outline = Some(Outline::build(headings, self.settings.fold_level));
    }

    pub fn is_initialized(&self) -> bool {
        self.outline.is_some()
    }

    pub fn outline(&self) -> Option<&Outline> {
        self.outline.as_ref()
    }

    pub fn threshold(&self) -> f64 {
        self.calculator.threshold()
    }

    pub fn active_heading_id(&self) -> Option<&HeadingId> {
        self.outline.as_ref().and_then(Outline::current_id)
    }

    pub fn is_suspended(&self, clock: &dyn Clock) -> bool {
        self.suspended_until
            .is_some_and(|deadline| clock.now() < deadline)
    }

    /// Recompute the threshold and the current heading after a scroll.
    pub fn on_scroll<H>(&mut self, host: &H, clock: &dyn Clock) -> Option<&HeadingId>
    where
        H: PageHost + ?Sized,
    {
        if self.outline.is_none() {
            trace!("Scroll before headings were initialized");
            return None;
        }
        if self.is_suspended(clock) {
            trace!(now_ms = clock.now().as_millis() as u64, "Scroll ignored during jump");
            return self.active_heading_id();
        }

        let sample = self.calculator.update(host.metrics());
        if self.debug_enabled {
            self.last_sample = Some(sample);
        }
        self.reselect(host);
        self.active_heading_id()
    }

    /// Make the clicked heading current without waiting for the jump's
    /// scroll events, which are ignored for the suspension window.
    pub fn on_nav_entry_click<H>(
        &mut self,
        host: &mut H,
        clock: &dyn Clock,
        id: &HeadingId,
    ) -> Option<&HeadingId>
    where
        H: PageHost + ?Sized,
    {
        self.suspended_until = Some(clock.now() + self.settings.suspend_for);

        let known = self
            .outline
            .as_ref()
            .is_some_and(|outline| outline.position(id).is_some());
        if !known {
            debug!(%id, "Ignoring click on a link without a tracked heading");
            return self.active_heading_id();
        }

        if !host.jump_to(id) {
            debug!(%id, "Host could not jump to heading");
        }
        match host.heading_bounds(id) {
            Some(bounds) => {
                self.calculator.set_threshold(bounds.bottom);
                self.reselect(host);
                debug!(%id, threshold = bounds.bottom, "Pinned threshold to clicked heading");
            }
            None => debug!(%id, "Clicked heading has no layout"),
        }
        self.active_heading_id()
    }

    /// Flip the fold toggle of an outline entry.
    pub fn toggle_fold(&mut self, id: &HeadingId) -> Option<bool> {
        let outline = self.outline.as_mut()?;
        let idx = outline.position(id)?;
        outline.toggle(idx)
    }

    /// Turn on the threshold overlay. The threshold is recomputed so the
    /// overlay starts from fresh data.
    pub fn enable_threshold_debug<H>(&mut self, host: &H) -> DebugOverlay
    where
        H: PageHost + ?Sized,
    {
        self.debug_enabled = true;
        self.last_sample = Some(self.calculator.update(host.metrics()));
        DebugOverlay {
            line_top: self.calculator.threshold(),
            sample: self.last_sample,
        }
    }

    pub fn debug_overlay(&self) -> Option<DebugOverlay> {
        self.debug_enabled.then(|| DebugOverlay {
            line_top: self.calculator.threshold(),
            sample: self.last_sample,
        })
    }

    fn reselect<H>(&mut self, host: &H)
    where
        H: PageHost + ?Sized,
    {
        let threshold = self.calculator.threshold();
        let Some(outline) = self.outline.as_mut() else {
            return;
        };
        let selected = select_current(outline, host, threshold);
        let changed = selected != outline.current();
        outline.mark_current(selected);
        if changed {
            debug!(
                threshold,
                current = ?outline.current_id().map(HeadingId::as_str),
                "Current heading changed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::host::{PlacedHeading, StaticPage};

    const HEADING_HEIGHT: f64 = 40.0;

    fn page(tops: &[(&str, f64)], viewport_height: f64, document_height: f64) -> StaticPage {
        let placed = tops
            .iter()
            .map(|(id, top)| PlacedHeading {
                id: (*id).into(),
                top: *top,
                height: HEADING_HEIGHT,
            })
            .collect();
        StaticPage::new(placed, viewport_height, document_height)
    }

    fn tracker(ids: &[&str]) -> HeadingTracker {
        let mut tracker = HeadingTracker::default();
        tracker.initialize(ids.iter().map(|id| Heading::new(*id, 2, *id)).collect());
        tracker
    }

    fn active(tracker: &HeadingTracker) -> Option<&str> {
        tracker.active_heading_id().map(HeadingId::as_str)
    }

    #[test]
    fn reversing_at_a_boundary_keeps_the_crossed_heading() {
        let mut page = page(&[("a", 0.0), ("b", 1000.0), ("c", 2000.0)], 600.0, 4000.0);
        let mut tracker = tracker(&["a", "b", "c"]);
        let clock = ManualClock::new();

        let mut scroll_top = 0.0;
        while active(&tracker) != Some("b") {
            scroll_top += 10.0;
            assert!(scroll_top <= 1000.0, "never crossed into b");
            page.scroll_to(scroll_top);
            tracker.on_scroll(&page, &clock);
        }
        assert_eq!(scroll_top, 850.0);

        for back in [840.0, 850.0, 840.0] {
            page.scroll_to(back);
            tracker.on_scroll(&page, &clock);
            assert_eq!(active(&tracker), Some("b"), "flickered at {back}");
        }
    }

    #[test]
    fn short_document_uses_zero_threshold() {
        let page = page(&[("a", 0.0), ("b", 300.0)], 800.0, 600.0);
        let mut tracker = tracker(&["a", "b"]);
        tracker.on_scroll(&page, &ManualClock::new());
        assert_eq!(tracker.threshold(), 0.0);
        assert_eq!(active(&tracker), Some("a"));
    }

    #[test]
    fn short_document_heading_past_viewport_selects_none() {
        let page = page(&[("a", 800.0)], 800.0, 600.0);
        let mut tracker = tracker(&["a"]);
        tracker.on_scroll(&page, &ManualClock::new());
        assert_eq!(active(&tracker), None);
    }

    #[test]
    fn top_of_page_with_distant_first_heading_selects_none() {
        let page = page(&[("a", 900.0), ("b", 1800.0)], 600.0, 4000.0);
        let mut tracker = tracker(&["a", "b"]);
        tracker.on_scroll(&page, &ManualClock::new());
        assert_eq!(active(&tracker), None);
    }

    #[test]
    fn click_selects_target_immediately() {
        let mut page = page(&[("a", 0.0), ("b", 800.0), ("c", 1600.0)], 600.0, 3000.0);
        let mut tracker = tracker(&["a", "b", "c"]);
        let clock = ManualClock::new();
        tracker.on_scroll(&page, &clock);
        assert_eq!(active(&tracker), Some("a"));

        let selected = tracker
            .on_nav_entry_click(&mut page, &clock, &"b".into())
            .map(HeadingId::as_str);
        assert_eq!(selected, Some("b"));
        assert_eq!(tracker.threshold(), HEADING_HEIGHT);
        assert_eq!(page.scroll_top(), 800.0);
    }

    #[test]
    fn scroll_inside_suspension_window_is_ignored() {
        let mut page = page(&[("a", 0.0), ("b", 800.0), ("c", 1600.0)], 600.0, 3000.0);
        let mut tracker = tracker(&["a", "b", "c"]);
        let clock = ManualClock::new();
        tracker.on_nav_entry_click(&mut page, &clock, &"b".into());

        clock.advance(Duration::from_millis(50));
        page.scroll_to(1600.0);
        tracker.on_scroll(&page, &clock);
        assert!(tracker.is_suspended(&clock));
        assert_eq!(active(&tracker), Some("b"));

        clock.advance(Duration::from_millis(60));
        tracker.on_scroll(&page, &clock);
        assert!(!tracker.is_suspended(&clock));
        assert_eq!(active(&tracker), Some("c"));
    }

    #[test]
    fn suspension_ends_exactly_at_window() {
        let mut page = page(&[("a", 0.0), ("b", 800.0), ("c", 1600.0)], 600.0, 3000.0);
        let mut tracker = tracker(&["a", "b", "c"]);
        let clock = ManualClock::new();
        tracker.on_nav_entry_click(&mut page, &clock, &"b".into());
        page.scroll_to(1600.0);

        clock.set(DEFAULT_SUSPEND_WINDOW - Duration::from_millis(1));
        tracker.on_scroll(&page, &clock);
        assert!(tracker.is_suspended(&clock));
        assert_eq!(active(&tracker), Some("b"));

        clock.set(DEFAULT_SUSPEND_WINDOW);
        assert!(!tracker.is_suspended(&clock));
        tracker.on_scroll(&page, &clock);
        assert_eq!(active(&tracker), Some("c"));
    }

    #[test]
    fn unknown_click_target_is_ignored() {
        let mut page = page(&[("a", 0.0), ("b", 800.0)], 600.0, 3000.0);
        let mut tracker = tracker(&["a", "b"]);
        let clock = ManualClock::new();
        tracker.on_scroll(&page, &clock);

        tracker.on_nav_entry_click(&mut page, &clock, &"nope".into());
        assert_eq!(active(&tracker), Some("a"));
        assert_eq!(page.scroll_top(), 0.0);
    }

    #[test]
    fn uninitialized_tracker_is_inert() {
        let mut page = page(&[("a", 0.0)], 600.0, 3000.0);
        let mut tracker = HeadingTracker::default();
        tracker.initialize(Vec::new());
        let clock = ManualClock::new();

        assert!(!tracker.is_initialized());
        assert_eq!(tracker.on_scroll(&page, &clock), None);
        assert_eq!(tracker.on_nav_entry_click(&mut page, &clock, &"a".into()), None);
        assert_eq!(tracker.threshold(), DEFAULT_DOWN_THRESHOLD_PX);
    }

    #[test]
    fn debug_overlay_follows_threshold() {
        let mut page = page(&[("a", 0.0), ("b", 800.0)], 600.0, 3000.0);
        let mut tracker = tracker(&["a", "b"]);
        let clock = ManualClock::new();
        assert_eq!(tracker.debug_overlay(), None);

        let overlay = tracker.enable_threshold_debug(&page);
        assert_eq!(overlay.line_top, DEFAULT_DOWN_THRESHOLD_PX);

        page.scroll_to(2400.0);
        tracker.on_scroll(&page, &clock);
        let overlay = tracker.debug_overlay().expect("overlay enabled");
        let sample = overlay.sample.expect("sample recorded");
        assert_eq!(sample.scroll_top, 2400.0);
        assert_eq!(overlay.line_top, tracker.threshold());
        assert_eq!(tracker.threshold(), 600.0);
    }
}
