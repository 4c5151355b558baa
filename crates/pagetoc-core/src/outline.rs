//! Heading tree shown in the "on this page" section of the sidebar.
//!
//! The tree is built once from the page's headings. Parent links are computed
//! up front so marking the current heading never has to walk a render tree.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use ts_rs::TS;

/// Depth at which deeply nested headings start to fold.
pub const DEFAULT_FOLD_LEVEL: u8 = 3;

const MIN_LEVEL: u8 = 2;
const MAX_LEVEL: u8 = 6;

/// Anchor id of a heading, without the leading `#`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct HeadingId(String);

impl HeadingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fragment form used by sidebar links.
    pub fn href(&self) -> String {
        format!("#{}", self.0)
    }
}

impl fmt::Display for HeadingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HeadingId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for HeadingId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A section heading in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub id: HeadingId,
    /// Heading rank, `2` for `<h2>` through `6` for `<h6>`.
    pub level: u8,
    pub label: String,
}

impl Heading {
    pub fn new(id: impl Into<HeadingId>, level: u8, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            level,
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub heading: Heading,
    pub parent: Option<usize>,
    /// Nesting depth of the list holding this entry; `0` is the top list.
    pub depth: usize,
    /// Whether the entry carries a fold toggle for its children.
    pub foldable: bool,
    pub expanded: bool,
    pub current: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Outline {
    entries: Vec<OutlineEntry>,
    toggles: Vec<usize>,
    current: Option<usize>,
}

/// One open list while building the tree.
struct OpenList {
    level: u8,
    /// Entry that owns this list, if any.
    owner: Option<usize>,
    last_item: Option<usize>,
}

impl Outline {
    /// Build the tree from headings in document order.
    ///
    /// Skipped levels (an `h2` followed by an `h4`) nest the deeper heading
    /// under the last item of the shallower list. A page whose first heading
    /// is deeper than `h2` opens empty lists down to that level.
    pub fn build(headings: Vec<Heading>, fold_level: u8) -> Self {
        let mut entries: Vec<OutlineEntry> = Vec::with_capacity(headings.len());
        let mut toggles = Vec::new();
        let Some(first) = headings.first() else {
            return Self::default();
        };

        let mut stack = vec![OpenList {
            level: MIN_LEVEL,
            owner: None,
            last_item: None,
        }];
        for level in (MIN_LEVEL + 1)..=normalize_level(first.level) {
            stack.push(OpenList {
                level,
                owner: None,
                last_item: None,
            });
        }

        let levels: Vec<u8> = headings.iter().map(|h| normalize_level(h.level)).collect();
        for (idx, heading) in headings.into_iter().enumerate() {
            let level = levels[idx];
            let current_level = stack.last().map(|list| list.level).unwrap_or(MIN_LEVEL);

            if level > current_level {
                for next_level in (current_level + 1)..=level {
                    let owner = stack
                        .last()
                        .and_then(|list| list.last_item.or(list.owner));
                    stack.push(OpenList {
                        level: next_level,
                        owner,
                        last_item: None,
                    });
                }
            } else if level < current_level {
                while stack.len() > 1 && stack.last().is_some_and(|list| list.level > level) {
                    stack.pop();
                }
            }

            let foldable = levels
                .get(idx + 1)
                .is_some_and(|next| *next > level && level >= fold_level);
            if foldable {
                toggles.push(idx);
            }

            let depth = stack.len().saturating_sub(1);
            entries.push(OutlineEntry {
                heading,
                parent: stack.last().and_then(|list| list.owner),
                depth,
                foldable,
                expanded: true,
                current: false,
            });
            if let Some(list) = stack.last_mut() {
                list.last_item = Some(idx);
            }
        }

        debug!(
            headings = entries.len(),
            toggles = toggles.len(),
            fold_level,
            "Built heading outline"
        );
        Self {
            entries,
            toggles,
            current: None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[OutlineEntry] {
        &self.entries
    }

    pub fn get(&self, idx: usize) -> Option<&OutlineEntry> {
        self.entries.get(idx)
    }

    pub fn position(&self, id: &HeadingId) -> Option<usize> {
        self.entries.iter().position(|entry| &entry.heading.id == id)
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn current_id(&self) -> Option<&HeadingId> {
        self.current
            .and_then(|idx| self.entries.get(idx))
            .map(|entry| &entry.heading.id)
    }

    /// Indices from `idx` up to the root, `idx` first.
    pub fn ancestry(&self, idx: usize) -> Vec<usize> {
        let mut chain = Vec::new();
        let mut next = Some(idx).filter(|idx| *idx < self.entries.len());
        while let Some(idx) = next {
            chain.push(idx);
            next = self.entries[idx].parent;
        }
        chain
    }

    /// Replace the current marking.
    ///
    /// Every fold toggle collapses first; the new current entry and its whole
    /// ancestor chain are then expanded so the entry is visible.
    pub fn mark_current(&mut self, selected: Option<usize>) {
        if let Some(previous) = self.current.take() {
            if let Some(entry) = self.entries.get_mut(previous) {
                entry.current = false;
            }
        }
        for &idx in &self.toggles {
            self.entries[idx].expanded = false;
        }

        let Some(selected) = selected.filter(|idx| *idx < self.entries.len()) else {
            return;
        };
        self.entries[selected].current = true;
        for idx in self.ancestry(selected) {
            self.entries[idx].expanded = true;
        }
        self.current = Some(selected);
    }

    /// Flip a fold toggle. Returns the new expanded state, or `None` when the
    /// entry has no toggle.
    pub fn toggle(&mut self, idx: usize) -> Option<bool> {
        let entry = self.entries.get_mut(idx).filter(|entry| entry.foldable)?;
        entry.expanded = !entry.expanded;
        Some(entry.expanded)
    }

    /// Whether every ancestor of the entry is expanded.
    pub fn is_visible(&self, idx: usize) -> bool {
        self.ancestry(idx)
            .into_iter()
            .skip(1)
            .all(|ancestor| self.entries[ancestor].expanded)
    }
}

fn normalize_level(level: u8) -> u8 {
    level.clamp(MIN_LEVEL, MAX_LEVEL)
}
