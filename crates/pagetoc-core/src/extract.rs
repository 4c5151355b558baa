//! Heading discovery in rendered page HTML.
//!
//! Only `h2`–`h6` inside `<main>` are tracked, and only those that carry an
//! `id` and whose first child element is the heading's self-link anchor.
//! Search highlighting (`<mark>`) inside the anchor is dropped from labels.

use crate::outline::Heading;
use anyhow::{Result, anyhow};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

static MAIN_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("main").unwrap());
static HEADING_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h2, h3, h4, h5, h6").unwrap());
static RE_HEADING_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^h([1-6])$").unwrap());
static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Collect trackable headings from a rendered page, in document order.
pub fn extract_headings(html: &str) -> Result<Vec<Heading>> {
    let document = Html::parse_document(html);
    let main = document
        .select(&MAIN_SELECTOR)
        .next()
        .ok_or_else(|| anyhow!("page has no <main> element"))?;

    let mut headings = Vec::new();
    let mut skipped = 0usize;
    for element in main.select(&HEADING_SELECTOR) {
        match heading_from_element(element) {
            Some(heading) => headings.push(heading),
            None => skipped += 1,
        }
    }

    debug!(
        headings = headings.len(),
        skipped, "Extracted page headings"
    );
    Ok(headings)
}

fn heading_from_element(element: ElementRef<'_>) -> Option<Heading> {
    let id = element.value().id().filter(|id| !id.is_empty())?;
    let anchor = element.children().find_map(ElementRef::wrap)?;
    if anchor.value().name() != "a" {
        return None;
    }
    let level = heading_level(element.value().name())?;
    Some(Heading::new(id, level, anchor_label(anchor)))
}

fn heading_level(tag: &str) -> Option<u8> {
    RE_HEADING_TAG
        .captures(tag)
        .and_then(|caps| caps.get(1))
        .and_then(|level| level.as_str().parse().ok())
}

fn anchor_label(anchor: ElementRef<'_>) -> String {
    let text: String = anchor.text().collect();
    RE_WHITESPACE.replace_all(text.trim(), " ").into_owned()
}
