//! The page environment seen by the tracker.
//!
//! A browser binding would back [`PageHost`] with `scrollTop`,
//! `innerHeight`, `scrollHeight` and `getBoundingClientRect`. [`StaticPage`]
//! is a fixed layout in document coordinates for replays and tests.

use crate::outline::HeadingId;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Scroll position and sizes, all in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub viewport_height: f64,
    pub document_height: f64,
}

/// Vertical extent of a heading relative to the viewport top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingBounds {
    pub top: f64,
    pub bottom: f64,
}

pub trait PageHost {
    fn metrics(&self) -> ScrollMetrics;

    /// Current viewport-relative bounds of the heading, if it is laid out.
    fn heading_bounds(&self, id: &HeadingId) -> Option<HeadingBounds>;

    /// Scroll so the heading's anchor is reached. Returns `false` when the
    /// heading is unknown to the host.
    fn jump_to(&mut self, id: &HeadingId) -> bool;
}

/// Heading position in document coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedHeading {
    pub id: HeadingId,
    pub top: f64,
    #[serde(default)]
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaticPage {
    headings: Vec<PlacedHeading>,
    scroll_top: f64,
    viewport_height: f64,
    document_height: f64,
}

impl StaticPage {
    pub fn new(headings: Vec<PlacedHeading>, viewport_height: f64, document_height: f64) -> Self {
        let sanitize = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            headings,
            scroll_top: 0.0,
            viewport_height: sanitize(viewport_height),
            document_height: sanitize(document_height),
        }
    }

    pub fn max_scroll_top(&self) -> f64 {
        (self.document_height - self.viewport_height).max(0.0)
    }

    /// Set the scroll offset, clamped to the scrollable range like a browser.
    pub fn scroll_to(&mut self, scroll_top: f64) {
        self.scroll_top = if scroll_top.is_finite() {
            scroll_top.clamp(0.0, self.max_scroll_top())
        } else {
            0.0
        };
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    pub fn headings(&self) -> &[PlacedHeading] {
        &self.headings
    }

    fn placed(&self, id: &HeadingId) -> Option<&PlacedHeading> {
        self.headings.iter().find(|placed| &placed.id == id)
    }
}

impl PageHost for StaticPage {
    fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            scroll_top: self.scroll_top,
            viewport_height: self.viewport_height,
            document_height: self.document_height,
        }
    }

    fn heading_bounds(&self, id: &HeadingId) -> Option<HeadingBounds> {
        let placed = self.placed(id)?;
        let top = placed.top - self.scroll_top;
        Some(HeadingBounds {
            top,
            bottom: top + placed.height.max(0.0),
        })
    }

    fn jump_to(&mut self, id: &HeadingId) -> bool {
        match self.placed(id).map(|placed| placed.top) {
            Some(top) => {
                self.scroll_to(top);
                true
            }
            None => false,
        }
    }
}
