//! Scroll-synchronized "on this page" tracking for rendered documentation pages.
//!
//! The crate is split so the tracking algorithm never touches a rendering
//! environment directly:
//! - [`threshold`] moves the virtual decision line as the page scrolls.
//! - [`selector`] picks the current heading relative to that line.
//! - [`outline`] owns the heading tree and its current/expanded marking.
//! - [`tracker`] wires the pieces to scroll and click events.
//! - [`host`] and [`clock`] are the narrow seams a page environment implements.
//! - [`extract`] and [`sidebar`] read headings and the chapter list from HTML.

pub mod clock;
pub mod extract;
pub mod host;
pub mod outline;
pub mod selector;
pub mod sidebar;
pub mod threshold;
pub mod tracker;
pub mod view;

pub use clock::{Clock, ManualClock, SystemClock};
pub use extract::extract_headings;
pub use host::{HeadingBounds, PageHost, PlacedHeading, ScrollMetrics, StaticPage};
pub use outline::{DEFAULT_FOLD_LEVEL, Heading, HeadingId, Outline, OutlineEntry};
pub use selector::{select_by_tops, select_current};
pub use sidebar::{ChapterEntry, Sidebar};
pub use threshold::{
    DEFAULT_DOWN_THRESHOLD_PX, DEFAULT_UP_THRESHOLD_PX, ThresholdCalculator, ThresholdSample,
};
pub use tracker::{DEFAULT_SUSPEND_WINDOW, DebugOverlay, HeadingTracker, TrackerSettings};
pub use view::{ChapterView, OutlineEntryView, TrackerView, export_ts_bindings};
