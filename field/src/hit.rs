#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::point::Point;
use crate::scene::Drawable;

/// Whether `point` falls within `drawable`'s hit radius.
///
/// The radius is the full diameter, not half of it, so the clickable area
/// is generous compared with the drawn body.
#[must_use]
pub fn contains(drawable: &Drawable, point: Point) -> bool {
    drawable.center.distance(point) < drawable.size
}

/// The first drawable in render order whose hit radius contains `point`.
///
/// Overlaps resolve to the earliest drawable, which for a newest-first event
/// list means the most recent event wins.
#[must_use]
pub fn hit_test(point: Point, drawables: &[Drawable]) -> Option<&Drawable> {
    drawables.iter().find(|d| contains(d, point))
}
