//! Interval annotations for rendering
//!
//! Turns narrowed views into labeled intervals ("Slope", "Flat", "HMD")
//! and computes the parts of a plotting window that no labeled interval
//! covers, which a renderer shades out.

use crate::error::EdaResult;
use crate::index::Pattern;
use crate::signal::types::span_micros;
use crate::signal::{TimeBounds, MICROS_PER_SEC};
use crate::view::SegmentView;
use serde::Serialize;

/// A named span of the recording
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledInterval {
    pub label: String,
    pub bounds: TimeBounds,
}

impl LabeledInterval {
    pub fn new(label: impl Into<String>, bounds: TimeBounds) -> Self {
        Self {
            label: label.into(),
            bounds,
        }
    }
}

/// Narrow `view` once per group and label the resulting run bounds
///
/// # Errors
/// Fails if a pattern has the wrong arity or matches no runs.
pub fn label_groups<R, L, I>(view: &SegmentView<R>, groups: I) -> EdaResult<Vec<LabeledInterval>>
where
    I: IntoIterator<Item = (L, Pattern)>,
    L: Into<String>,
{
    groups
        .into_iter()
        .map(|(label, pattern)| -> EdaResult<LabeledInterval> {
            let label: String = label.into();
            let bounds = view.narrow(&pattern)?.tag_bounds()?;
            tracing::debug!(label = %label, pattern = %pattern, bounds = %bounds, "Labeled group");
            Ok(LabeledInterval { label, bounds })
        })
        .collect()
}

/// Parts of `window` not covered by any interval, sorted by start
///
/// Intervals may overlap, arrive in any order, or extend past the window.
pub fn shaded_regions(window: TimeBounds, intervals: &[LabeledInterval]) -> Vec<TimeBounds> {
    let mut covered: Vec<TimeBounds> = intervals
        .iter()
        .map(|i| i.bounds)
        .filter(|b| b.end() >= window.start() && b.start() <= window.end())
        .collect();
    covered.sort_by_key(|b| b.start());

    let mut regions = Vec::new();
    let mut cursor = window.start();

    for bounds in covered {
        if bounds.start() > cursor {
            regions.push(TimeBounds::from_ordered(cursor, bounds.start()));
        }
        cursor = cursor.max(bounds.end());
    }

    if cursor < window.end() {
        regions.push(TimeBounds::from_ordered(cursor, window.end()));
    }

    regions
}

/// Seconds elapsed from `origin` to `timestamp`
pub fn offset_secs(timestamp: i64, origin: i64) -> f64 {
    span_micros(origin, timestamp) / MICROS_PER_SEC
}
