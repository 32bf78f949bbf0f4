//! Reduction of each box group to one enclosing box.

use indexmap::IndexMap;
use tracing::debug;

use crate::error::Result;
use crate::geometry::{Point, merge_boxes};
use crate::grouping::{BoxGroups, TimeKey};

/// Time value -> merged box in `[top-left, top-right, bottom-left,
/// bottom-right]` order.
pub type MergedBoxes = IndexMap<TimeKey, Vec<Point>>;

/// Merges every group independently.
///
/// Fails with `MalformedBox` if any coordinate list has fewer than four
/// points.
pub fn merge_groups(groups: &BoxGroups<'_>) -> Result<MergedBoxes> {
    let mut merged = MergedBoxes::with_capacity(groups.len());
    for (time, boxes) in groups {
        if let Some(coordinates) = merge_boxes(boxes.iter().copied())? {
            merged.insert(*time, coordinates);
        }
    }
    debug!(boxes = merged.len(), "merged box groups");
    Ok(merged)
}
