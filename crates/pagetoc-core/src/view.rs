//! Serializable snapshots for front-ends, with TypeScript bindings.

use crate::clock::Clock;
use crate::host::ScrollMetrics;
use crate::outline::HeadingId;
use crate::sidebar::Sidebar;
use crate::threshold::ThresholdSample;
use crate::tracker::{DebugOverlay, HeadingTracker};
use serde::Serialize;
use std::fs;
use std::path::Path;
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct OutlineEntryView {
    pub id: HeadingId,
    pub label: String,
    pub level: u8,
    pub depth: usize,
    pub foldable: bool,
    pub expanded: bool,
    pub visible: bool,
    pub current: bool,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct ChapterView {
    pub title: String,
    pub href: Option<String>,
    pub depth: usize,
    pub expanded: bool,
    pub visible: bool,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct TrackerView {
    pub threshold: f64,
    pub suspended: bool,
    pub active: Option<HeadingId>,
    pub headings: Vec<OutlineEntryView>,
    pub chapters: Vec<ChapterView>,
    pub overlay: Option<DebugOverlay>,
}

impl TrackerView {
    pub fn capture(tracker: &HeadingTracker, sidebar: Option<&Sidebar>, clock: &dyn Clock) -> Self {
        let headings = tracker
            .outline()
            .map(|outline| {
                outline
                    .entries()
                    .iter()
                    .enumerate()
                    .map(|(idx, entry)| OutlineEntryView {
                        id: entry.heading.id.clone(),
                        label: entry.heading.label.clone(),
                        level: entry.heading.level,
                        depth: entry.depth,
                        foldable: entry.foldable,
                        expanded: entry.expanded,
                        visible: outline.is_visible(idx),
                        current: entry.current,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let chapters = sidebar
            .map(|sidebar| {
                sidebar
                    .entries()
                    .iter()
                    .enumerate()
                    .map(|(idx, entry)| ChapterView {
                        title: entry.title.clone(),
                        href: entry.href.clone(),
                        depth: entry.depth,
                        expanded: entry.expanded,
                        visible: sidebar.is_visible(idx),
                        active: entry.active,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            threshold: tracker.threshold(),
            suspended: tracker.is_suspended(clock),
            active: tracker.active_heading_id().cloned(),
            headings,
            chapters,
            overlay: tracker.debug_overlay(),
        }
    }
}

fn export_single_type<T: TS + 'static>(out_dir: &Path) -> Result<(), String> {
    T::export_all_to(out_dir).map_err(|err| err.to_string())
}

/// Write `.ts` declarations for every view type into `out_dir`, replacing
/// stale ones.
pub fn export_ts_bindings(out_dir: &Path) -> Result<(), String> {
    fs::create_dir_all(out_dir)
        .map_err(|err| format!("Failed to create {}: {err}", out_dir.display()))?;

    for entry in fs::read_dir(out_dir)
        .map_err(|err| format!("Failed to list {}: {err}", out_dir.display()))?
    {
        let entry = entry.map_err(|err| format!("Failed to read entry: {err}"))?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("ts") {
            fs::remove_file(&path)
                .map_err(|err| format!("Failed to remove {}: {err}", path.display()))?;
        }
    }

    export_single_type::<HeadingId>(out_dir)?;
    export_single_type::<ScrollMetrics>(out_dir)?;
    export_single_type::<ThresholdSample>(out_dir)?;
    export_single_type::<DebugOverlay>(out_dir)?;
    export_single_type::<OutlineEntryView>(out_dir)?;
    export_single_type::<ChapterView>(out_dir)?;
    export_single_type::<TrackerView>(out_dir)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::host::{PlacedHeading, StaticPage};
    use crate::outline::Heading;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after epoch")
            .as_nanos();
        std::env::temp_dir().join(format!("pagetoc_test_{name}_{nanos}"))
    }

    #[test]
    fn capture_reflects_tracker_state() {
        let mut tracker = HeadingTracker::default();
        tracker.initialize(vec![
            Heading::new("setup", 2, "Setup"),
            Heading::new("details", 3, "Details"),
        ]);
        let page = StaticPage::new(
            vec![
                PlacedHeading {
                    id: "setup".into(),
                    top: 20.0,
                    height: 30.0,
                },
                PlacedHeading {
                    id: "details".into(),
                    top: 900.0,
                    height: 30.0,
                },
            ],
            600.0,
            3000.0,
        );
        let clock = ManualClock::new();
        tracker.on_scroll(&page, &clock);

        let view = TrackerView::capture(&tracker, None, &clock);
        assert_eq!(view.active, Some(HeadingId::from("setup")));
        assert_eq!(view.headings.len(), 2);
        assert!(view.headings[0].current);
        assert_eq!(view.headings[1].depth, 1);
        assert!(view.chapters.is_empty());
        assert!(view.overlay.is_none());
    }

    #[test]
    fn capture_of_uninitialized_tracker_is_empty() {
        let tracker = HeadingTracker::default();
        let view = TrackerView::capture(&tracker, None, &ManualClock::new());
        assert!(view.headings.is_empty());
        assert_eq!(view.active, None);
        assert!(!view.suspended);
    }

    #[test]
    fn export_replaces_stale_bindings() {
        let out_dir = unique_temp_dir("bindings");
        fs::create_dir_all(&out_dir).expect("create out dir");
        fs::write(out_dir.join("Removed.ts"), "export type Removed = never;\n")
            .expect("write stale binding");
        fs::write(out_dir.join("README.md"), "generated\n").expect("write readme");

        export_ts_bindings(&out_dir).expect("bindings export");

        assert!(!out_dir.join("Removed.ts").exists());
        assert!(out_dir.join("README.md").exists());
        for name in ["HeadingId", "ThresholdSample", "DebugOverlay", "TrackerView"] {
            assert!(out_dir.join(format!("{name}.ts")).exists(), "missing {name}.ts");
        }
        let tracker_view =
            fs::read_to_string(out_dir.join("TrackerView.ts")).expect("read TrackerView.ts");
        assert!(tracker_view.contains("headings"));

        let _ = fs::remove_dir_all(&out_dir);
    }
}
