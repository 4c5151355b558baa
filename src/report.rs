//! Plain-text rendering of the sidebar for terminal output.

use pagetoc_core::{OutlineEntryView, TrackerView};
use std::fmt::{self, Write};

const ACTIVE_MARK: &str = "* ";
const CURRENT_MARK: &str = "> ";
const PLAIN_MARK: &str = "  ";

pub fn render_sidebar(view: &TrackerView) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let active_chapter = view.chapters.iter().position(|chapter| chapter.active);

    for (idx, chapter) in view.chapters.iter().enumerate() {
        if !chapter.visible {
            continue;
        }
        let mark = if chapter.active { ACTIVE_MARK } else { PLAIN_MARK };
        writeln!(out, "{}{mark}{}", indent(chapter.depth), chapter.title)?;
        if Some(idx) == active_chapter {
            render_headings(&mut out, &view.headings, chapter.depth + 1)?;
        }
    }
    if active_chapter.is_none() {
        render_headings(&mut out, &view.headings, 0)?;
    }

    if let Some(overlay) = &view.overlay {
        writeln!(out)?;
        writeln!(out, "threshold line at {:.1}px", overlay.line_top)?;
        if let Some(sample) = &overlay.sample {
            let rows = [
                ("documentHeight", sample.document_height),
                ("windowHeight", sample.viewport_height),
                ("scrollTop", sample.scroll_top),
                ("pixelsAbove", sample.pixels_above),
                ("pixelsBelow", sample.pixels_below),
                ("bottomAdd", sample.bottom_add),
                ("adjustedBottomAdd", sample.adjusted_bottom_add),
            ];
            for (name, value) in rows {
                writeln!(out, "  {name:<18} {value:.1}")?;
            }
            writeln!(out, "  {:<18} {}", "scrollingDown", sample.scrolling_down)?;
            writeln!(out, "  {:<18} {:.1}", "threshold", sample.threshold)?;
        }
    }
    Ok(out)
}

fn render_headings(
    out: &mut String,
    headings: &[OutlineEntryView],
    base_depth: usize,
) -> fmt::Result {
    if headings.is_empty() {
        return Ok(());
    }
    writeln!(out, "{}{PLAIN_MARK}On this page", indent(base_depth))?;
    for heading in headings.iter().filter(|heading| heading.visible) {
        let mark = if heading.current { CURRENT_MARK } else { PLAIN_MARK };
        let fold = match (heading.foldable, heading.expanded) {
            (true, true) => " [-]",
            (true, false) => " [+]",
            (false, _) => "",
        };
        writeln!(
            out,
            "{}{mark}{}{fold}",
            indent(base_depth + 1 + heading.depth),
            heading.label
        )?;
    }
    Ok(())
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagetoc_core::{ChapterView, DebugOverlay, HeadingId};

    fn heading(id: &str, depth: usize, current: bool, visible: bool) -> OutlineEntryView {
        OutlineEntryView {
            id: HeadingId::from(id),
            label: id.to_uppercase(),
            level: 2 + depth as u8,
            depth,
            foldable: false,
            expanded: true,
            visible,
            current,
        }
    }

    fn chapter(title: &str, depth: usize, active: bool) -> ChapterView {
        ChapterView {
            title: title.to_string(),
            href: None,
            depth,
            expanded: true,
            visible: true,
            active,
        }
    }

    #[test]
    fn headings_render_under_active_chapter() {
        let view = TrackerView {
            threshold: 150.0,
            suspended: false,
            active: Some(HeadingId::from("b")),
            headings: vec![
                heading("a", 0, false, true),
                heading("b", 1, true, true),
                heading("hidden", 2, false, false),
            ],
            chapters: vec![chapter("Intro", 0, false), chapter("Guide", 0, true)],
            overlay: None,
        };
        let text = render_sidebar(&view).expect("sidebar renders");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "  Intro",
                "* Guide",
                "    On this page",
                "      A",
                "      > B",
            ]
        );
    }

    #[test]
    fn headings_render_alone_without_sidebar() {
        let view = TrackerView {
            threshold: 0.0,
            suspended: false,
            active: None,
            headings: vec![heading("a", 0, false, true)],
            chapters: Vec::new(),
            overlay: None,
        };
        assert_eq!(
            render_sidebar(&view).expect("sidebar renders"),
            "  On this page\n    A\n"
        );
    }

    #[test]
    fn overlay_table_follows_headings() {
        let view = TrackerView {
            threshold: 150.0,
            suspended: false,
            active: None,
            headings: Vec::new(),
            chapters: Vec::new(),
            overlay: Some(DebugOverlay {
                line_top: 150.0,
                sample: None,
            }),
        };
        let text = render_sidebar(&view).expect("sidebar renders");
        assert_eq!(text, "\nthreshold line at 150.0px\n");
    }
}
