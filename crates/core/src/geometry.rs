//! Axis-aligned box geometry.
//!
//! Provides the point and rectangle types shared by the pipeline and the
//! min/max accumulator that reduces many boxes to one enclosing box.
//!
//! Boxes arrive as four corner points in image coordinates, where y grows
//! downward. Position 0 is the top-left corner and position 3 the
//! bottom-right; positions 1 and 2 are derived and never read.

use crate::error::{BoxcatError, Result};

/// A 2D point (x, y).
pub type Point = (f64, f64);

/// A rectangle defined by (x0, y0, x1, y1) where (x0, y0) is the top-left
/// corner and (x1, y1) the bottom-right.
pub type Rect = (f64, f64, f64, f64);

/// Index of the top-left corner in a coordinate list.
pub const TOP_LEFT: usize = 0;

/// Index of the bottom-right corner in a coordinate list.
pub const BOTTOM_RIGHT: usize = 3;

/// Number of corner points in a well-formed box.
pub const CORNER_COUNT: usize = 4;

/// Returns the (top-left, bottom-right) corners of a coordinate list.
pub fn corners(coordinates: &[Point]) -> Result<(Point, Point)> {
    if coordinates.len() < CORNER_COUNT {
        return Err(BoxcatError::MalformedBox {
            points: coordinates.len(),
        });
    }
    Ok((coordinates[TOP_LEFT], coordinates[BOTTOM_RIGHT]))
}

/// Expands a rectangle into the four-corner form
/// `[top-left, top-right, bottom-left, bottom-right]`.
pub fn rect_to_coordinates(rect: Rect) -> Vec<Point> {
    let (x0, y0, x1, y1) = rect;
    vec![(x0, y0), (x1, y0), (x0, y1), (x1, y1)]
}

/// Running min/max over a sequence of boxes.
///
/// The first box initializes all four extrema; each later box replaces an
/// extremum only when it exceeds it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxAccumulator {
    extent: Option<Rect>,
    count: usize,
}

impl BoxAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one coordinate list into the running extent.
    pub fn push(&mut self, coordinates: &[Point]) -> Result<()> {
        let ((left, top), (right, bottom)) = corners(coordinates)?;
        self.extent = Some(match self.extent {
            None => (left, top, right, bottom),
            Some((min_x, min_y, max_x, max_y)) => (
                if left < min_x { left } else { min_x },
                if top < min_y { top } else { min_y },
                if right > max_x { right } else { max_x },
                if bottom > max_y { bottom } else { max_y },
            ),
        });
        self.count += 1;
        Ok(())
    }

    /// Number of boxes folded in so far.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The enclosing rectangle, or None if no box was pushed.
    pub fn rect(&self) -> Option<Rect> {
        self.extent
    }

    /// The enclosing box in four-corner form.
    pub fn finish(self) -> Option<Vec<Point>> {
        self.extent.map(rect_to_coordinates)
    }
}

/// Merges boxes into the smallest axis-aligned box enclosing all of them.
///
/// Returns `Ok(None)` for an empty input.
pub fn merge_boxes<'a, I>(boxes: I) -> Result<Option<Vec<Point>>>
where
    I: IntoIterator<Item = &'a [Point]>,
{
    let mut acc = BoxAccumulator::new();
    for coordinates in boxes {
        acc.push(coordinates)?;
    }
    Ok(acc.finish())
}
