//! Picks the current heading relative to the threshold line.

use crate::host::PageHost;
use crate::outline::Outline;

/// Select from viewport-relative heading tops in document order.
///
/// The last top at or above `threshold` wins; scanning stops at the first top
/// below it. When nothing has been passed yet the first heading is used as
/// long as it starts inside the viewport (`top < viewport_height`).
pub fn select_by_tops<I>(tops: I, threshold: f64, viewport_height: f64) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
{
    scan(tops.into_iter().map(Some), threshold, viewport_height)
}

/// Select the current outline entry using live bounds from the host.
///
/// Bounds are queried one entry at a time and not past the first miss.
/// Entries the host cannot place are skipped, except that an unplaced first
/// entry never serves as the fallback.
pub fn select_current<H>(outline: &Outline, host: &H, threshold: f64) -> Option<usize>
where
    H: PageHost + ?Sized,
{
    let viewport_height = host.metrics().viewport_height;
    let tops = outline
        .entries()
        .iter()
        .map(|entry| host.heading_bounds(&entry.heading.id).map(|bounds| bounds.top));
    scan(tops, threshold, viewport_height)
}

fn scan<I>(tops: I, threshold: f64, viewport_height: f64) -> Option<usize>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut first_top = None;
    let mut last_passed = None;
    for (idx, top) in tops.into_iter().enumerate() {
        if idx == 0 {
            first_top = top;
        }
        let Some(top) = top else {
            continue;
        };
        if top <= threshold {
            last_passed = Some(idx);
        } else {
            break;
        }
    }

    match (last_passed, first_top) {
        (Some(idx), _) => Some(idx),
        (None, Some(top)) if top < viewport_height => Some(0),
        _ => None,
    }
}
