//! Chapter list of the book sidebar.
//!
//! The sidebar markup lists every page of the book as nested
//! `li.chapter-item` entries. Links are written relative to the book root and
//! are rebased onto the current page with `path_to_root`. The entry for the
//! current page is marked active and all of its ancestors are expanded.

use anyhow::{Result, anyhow};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

static CHAPTER_LIST_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("ol.chapter").unwrap());
/// Absolute or protocol-relative links are never rebased.
static RE_EXTERNAL_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[a-z+]+:)?//").unwrap());
static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterEntry {
    pub title: String,
    /// Link as written in the sidebar, relative to the book root.
    pub target: Option<String>,
    /// Link rebased onto the current page.
    pub href: Option<String>,
    pub parent: Option<usize>,
    pub depth: usize,
    pub expanded: bool,
    pub active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Sidebar {
    entries: Vec<ChapterEntry>,
    active: Option<usize>,
}

impl Sidebar {
    /// Parse the first `ol.chapter` list found in `html`.
    pub fn parse(html: &str) -> Result<Self> {
        let fragment = Html::parse_fragment(html);
        let root = fragment
            .select(&CHAPTER_LIST_SELECTOR)
            .next()
            .ok_or_else(|| anyhow!("sidebar markup has no <ol class=\"chapter\"> list"))?;

        let mut entries = Vec::new();
        collect_items(root, None, 0, &mut entries);
        debug!(chapters = entries.len(), "Parsed sidebar chapter list");
        Ok(Self {
            entries,
            active: None,
        })
    }

    pub fn entries(&self) -> &[ChapterEntry] {
        &self.entries
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn active_entry(&self) -> Option<&ChapterEntry> {
        self.active.and_then(|idx| self.entries.get(idx))
    }

    /// Rebase relative links onto the current page and mark it active.
    ///
    /// `page` is the current page path relative to the book root; a query or
    /// fragment is ignored and a trailing `/` means its `index.html`. The
    /// book's `index.html` aliases the first chapter.
    pub fn resolve(&mut self, page: &str, path_to_root: &str) -> Option<usize> {
        for entry in &mut self.entries {
            entry.href = entry.target.as_deref().map(|target| {
                if target.starts_with('#') || RE_EXTERNAL_LINK.is_match(target) {
                    target.to_string()
                } else {
                    format!("{path_to_root}{target}")
                }
            });
            entry.active = false;
        }

        let page = normalize_page(page);
        let is_index = page == "index.html" || page.ends_with("/index.html");
        let mut active = None;
        // The first link in the list stands in for the book index.
        for (link_idx, idx) in self.linked_indices().into_iter().enumerate() {
            let target = self.entries[idx].target.as_deref();
            if target == Some(page.as_str()) || (link_idx == 0 && path_to_root.is_empty() && is_index)
            {
                active = Some(idx);
                self.mark_active(idx);
            }
        }

        self.active = active;
        match self.active_entry() {
            Some(entry) => info!(page = %page, chapter = %entry.title, "Resolved active chapter"),
            None => debug!(page = %page, "No sidebar chapter matches the current page"),
        }
        self.active
    }

    /// Flip the fold state of a chapter entry.
    pub fn toggle(&mut self, idx: usize) -> Option<bool> {
        let entry = self.entries.get_mut(idx)?;
        entry.expanded = !entry.expanded;
        Some(entry.expanded)
    }

    pub fn is_visible(&self, idx: usize) -> bool {
        let mut next = self.entries.get(idx).and_then(|entry| entry.parent);
        while let Some(parent) = next {
            if !self.entries[parent].expanded {
                return false;
            }
            next = self.entries[parent].parent;
        }
        true
    }

    fn linked_indices(&self) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.target.is_some())
            .map(|(idx, _)| idx)
            .collect()
    }

    fn mark_active(&mut self, idx: usize) {
        self.entries[idx].active = true;
        let mut next = Some(idx);
        while let Some(current) = next {
            self.entries[current].expanded = true;
            next = self.entries[current].parent;
        }
    }
}

fn collect_items(
    list: ElementRef<'_>,
    parent: Option<usize>,
    depth: usize,
    entries: &mut Vec<ChapterEntry>,
) {
    for item in list.children().filter_map(ElementRef::wrap) {
        if item.value().name() != "li" || !has_class(item, "chapter-item") {
            continue;
        }
        let Some(wrapper) = child_with_class(item, "span", "chapter-link-wrapper") else {
            continue;
        };

        let anchor = wrapper
            .children()
            .filter_map(ElementRef::wrap)
            .find(|child| child.value().name() == "a" && !has_class(*child, "chapter-fold-toggle"));
        let title_source = anchor.unwrap_or(wrapper);
        let title = RE_WHITESPACE
            .replace_all(title_source.text().collect::<String>().trim(), " ")
            .into_owned();
        let target = anchor
            .and_then(|a| a.value().attr("href"))
            .filter(|href| !href.is_empty())
            .map(str::to_string);

        let idx = entries.len();
        entries.push(ChapterEntry {
            title,
            target,
            href: None,
            parent,
            depth,
            expanded: has_class(item, "expanded"),
            active: false,
        });

        if let Some(section) = child_with_class(item, "ol", "section") {
            collect_items(section, Some(idx), depth + 1, entries);
        }
    }
}

fn child_with_class<'a>(element: ElementRef<'a>, tag: &str, class: &str) -> Option<ElementRef<'a>> {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().name() == tag && has_class(*child, class))
}

fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

fn normalize_page(page: &str) -> String {
    let end = page.find(['#', '?']).unwrap_or(page.len());
    let mut page = page[..end].trim_start_matches("./").to_string();
    if page.is_empty() || page.ends_with('/') {
        page.push_str("index.html");
    }
    page
}
