//! Adaptive decision line for the current heading.
//!
//! The threshold is a virtual horizontal line measured from the viewport top;
//! a heading at or above it counts as passed. Scrolling down eases the line
//! toward the down default and scrolling up eases it toward the larger up
//! default, so reversing at a heading boundary does not flip the selection
//! back. Near the end of the document the line is pushed down so the last
//! headings can still become current.

use crate::host::ScrollMetrics;
use serde::Serialize;
use ts_rs::TS;

/// Line position in px from the viewport top while scrolling down.
pub const DEFAULT_DOWN_THRESHOLD_PX: f64 = 150.0;
/// Line position in px from the viewport top while scrolling up.
pub const DEFAULT_UP_THRESHOLD_PX: f64 = 300.0;

/// Every intermediate value of one update, for the debug overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct ThresholdSample {
    pub document_height: f64,
    pub viewport_height: f64,
    pub scroll_top: f64,
    pub pixels_above: f64,
    pub pixels_below: f64,
    pub bottom_add: f64,
    pub adjusted_bottom_add: f64,
    pub scrolling_down: bool,
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdCalculator {
    down_default: f64,
    up_default: f64,
    threshold: f64,
    last_scroll_top: f64,
}

impl Default for ThresholdCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_DOWN_THRESHOLD_PX, DEFAULT_UP_THRESHOLD_PX)
    }
}

impl ThresholdCalculator {
    pub fn new(down_default: f64, up_default: f64) -> Self {
        Self {
            down_default,
            up_default,
            threshold: down_default,
            last_scroll_top: 0.0,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn last_scroll_top(&self) -> f64 {
        self.last_scroll_top
    }

    /// Pin the line, e.g. to the bottom edge of a heading jumped to.
    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
    }

    pub fn update(&mut self, metrics: ScrollMetrics) -> ThresholdSample {
        let ScrollMetrics {
            scroll_top,
            viewport_height,
            document_height,
        } = metrics;

        let pixels_below = (document_height - (scroll_top + viewport_height)).max(0.0);
        let pixels_above = (self.down_default - scroll_top).max(0.0);
        let bottom_add = (viewport_height - pixels_below - self.down_default).max(0.0);

        // The bottom offset assumes at least two viewports of content; shrink
        // it for shorter documents in proportion to how far down we are.
        let mut adjusted_bottom_add = bottom_add;
        if document_height < viewport_height * 2.0 {
            let max_pixels_below = document_height - viewport_height;
            let t = 1.0 - pixels_below / max_pixels_below.max(1.0);
            adjusted_bottom_add *= t.clamp(0.0, 1.0);
        }

        let scrolling_down = scroll_top >= self.last_scroll_top;
        if scrolling_down {
            let scrolled = scroll_top - self.last_scroll_top;
            let target = self.down_default + adjusted_bottom_add;
            self.threshold = target.max(self.threshold - scrolled);
        } else {
            let scrolled = self.last_scroll_top - scroll_top;
            let target = self.up_default - pixels_above
                + (adjusted_bottom_add - self.down_default).max(0.0);
            self.threshold = target.min(self.threshold + scrolled);
        }

        if document_height <= viewport_height {
            self.threshold = 0.0;
        }
        self.last_scroll_top = scroll_top;

        ThresholdSample {
            document_height,
            viewport_height,
            scroll_top,
            pixels_above,
            pixels_below,
            bottom_add,
            adjusted_bottom_add,
            scrolling_down,
            threshold: self.threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(scroll_top: f64, viewport_height: f64, document_height: f64) -> ScrollMetrics {
        ScrollMetrics {
            scroll_top,
            viewport_height,
            document_height,
        }
    }

    #[test]
    fn scrolling_down_settles_on_down_default() {
        let mut calc = ThresholdCalculator::default();
        calc.set_threshold(400.0);
        let sample = calc.update(metrics(100.0, 600.0, 5000.0));
        assert!(sample.scrolling_down);
        assert_eq!(sample.threshold, 300.0);
        let sample = calc.update(metrics(400.0, 600.0, 5000.0));
        assert_eq!(sample.threshold, DEFAULT_DOWN_THRESHOLD_PX);
    }

    #[test]
    fn scrolling_up_eases_toward_up_default() {
        let mut calc = ThresholdCalculator::default();
        calc.update(metrics(1000.0, 600.0, 5000.0));
        let sample = calc.update(metrics(960.0, 600.0, 5000.0));
        assert!(!sample.scrolling_down);
        assert_eq!(sample.threshold, 190.0);
        let sample = calc.update(metrics(500.0, 600.0, 5000.0));
        assert_eq!(sample.threshold, DEFAULT_UP_THRESHOLD_PX);
    }

    #[test]
    fn up_target_eases_back_near_top() {
        let mut calc = ThresholdCalculator::default();
        calc.update(metrics(1000.0, 600.0, 5000.0));
        let sample = calc.update(metrics(50.0, 600.0, 5000.0));
        assert_eq!(sample.pixels_above, 100.0);
        assert_eq!(sample.threshold, 200.0);
    }

    #[test]
    fn bottom_of_page_pushes_line_down() {
        let mut calc = ThresholdCalculator::default();
        let sample = calc.update(metrics(4400.0, 600.0, 5000.0));
        assert_eq!(sample.pixels_below, 0.0);
        assert_eq!(sample.bottom_add, 450.0);
        assert_eq!(sample.adjusted_bottom_add, 450.0);
        assert_eq!(sample.threshold, 600.0);
    }

    #[test]
    fn scrolling_up_at_bottom_keeps_bottom_offset() {
        let mut calc = ThresholdCalculator::default();
        assert_eq!(calc.update(metrics(4400.0, 600.0, 5000.0)).threshold, 600.0);
        let sample = calc.update(metrics(4390.0, 600.0, 5000.0));
        assert!(!sample.scrolling_down);
        assert_eq!(sample.pixels_below, 10.0);
        assert_eq!(sample.adjusted_bottom_add, 440.0);
        // Up default plus the part of the bottom offset beyond the down default.
        assert_eq!(sample.threshold, 590.0);
    }

    #[test]
    fn scrolling_up_in_short_document_uses_scaled_offset() {
        let mut calc = ThresholdCalculator::default();
        // 512px scrollable in a 600px viewport.
        assert_eq!(calc.update(metrics(512.0, 600.0, 1112.0)).threshold, 600.0);
        let sample = calc.update(metrics(384.0, 600.0, 1112.0));
        assert_eq!(sample.pixels_below, 128.0);
        assert_eq!(sample.bottom_add, 322.0);
        assert_eq!(sample.adjusted_bottom_add, 241.5);
        assert_eq!(sample.threshold, 391.5);
    }

    #[test]
    fn short_document_scales_bottom_add() {
        let mut calc = ThresholdCalculator::default();
        // 900px document in a 600px viewport: 300px scrollable, halfway down.
        let sample = calc.update(metrics(150.0, 600.0, 900.0));
        assert_eq!(sample.pixels_below, 150.0);
        assert_eq!(sample.bottom_add, 300.0);
        assert_eq!(sample.adjusted_bottom_add, 150.0);
        assert_eq!(sample.threshold, 300.0);
    }

    #[test]
    fn document_within_viewport_forces_zero() {
        let mut calc = ThresholdCalculator::default();
        for top in [0.0, 10.0, 0.0] {
            let sample = calc.update(metrics(top, 800.0, 800.0));
            assert_eq!(sample.threshold, 0.0);
        }
    }

    #[test]
    fn update_records_last_scroll_top() {
        let mut calc = ThresholdCalculator::default();
        calc.update(metrics(320.0, 600.0, 5000.0));
        assert_eq!(calc.last_scroll_top(), 320.0);
    }
}
