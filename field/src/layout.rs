//! Deterministic layout: event identity → base position, size and colour.
//!
//! Every function here is pure. The same identity and canvas size always
//! land in the same place, which is what keeps an entity visually stable
//! while the scene is rebuilt from scratch on every frame.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use serde::Serialize;
use wire::{Event, Level};

use crate::color::{self, Color};
use crate::consts::{BASE_SIZE, X_SPREAD, Y_BAND, Y_MARGIN, Y_SPREAD};
use crate::point::{Point, Viewport};

/// Per-frame visual stand-in for one event, before animation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    /// Identity of the source event.
    pub event_id: String,
    pub level: Level,
    pub acknowledged: bool,
    /// Unanimated centre.
    pub base: Point,
    /// Horizontal drift bias in `-1..=1`.
    pub vx: f64,
    /// Vertical drift bias in `-2..=2`.
    pub vy: f64,
    /// Diameter in pixels.
    pub size: f64,
    pub color: Color,
}

/// Sum of the first UTF-16 code unit of each character in the identity.
///
/// Characters outside the BMP contribute only their high surrogate.
#[must_use]
pub fn identity_hash(id: &str) -> u64 {
    id.chars()
        .map(|c| c.encode_utf16(&mut [0; 2])[0])
        .fold(0_u64, |acc, unit| acc.wrapping_add(u64::from(unit)))
}

/// Base centre for an identity on a canvas of the given size.
///
/// `x = (hash * 37) mod width` and `y = (hash * 97) mod (height - 60) + 30`.
/// A zero-width canvas puts every entity at `x = 0`; a canvas no taller than
/// the margin band puts every entity at `y = 30`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn base_position(hash: u64, viewport: Viewport) -> Point {
    let x = if viewport.width > 0.0 {
        hash.wrapping_mul(X_SPREAD) as f64 % viewport.width
    } else {
        0.0
    };

    let band = viewport.height - Y_BAND;
    let y = if band > 0.0 {
        hash.wrapping_mul(Y_SPREAD) as f64 % band + Y_MARGIN
    } else {
        Y_MARGIN
    };

    Point { x, y }
}

/// Diameter for a status code: `24 + (status mod 10)`, always in `24..=33`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn entity_size(status: i64) -> f64 {
    BASE_SIZE + status.rem_euclid(10) as f64
}

/// Drift bias `(vx, vy)` derived from the identity hash.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn velocity_bias(hash: u64) -> (f64, f64) {
    let vx = (hash % 3) as f64 - 1.0;
    let vy = (hash % 5) as f64 - 2.0;
    (vx, vy)
}

/// Map an event to its unanimated entity.
#[must_use]
pub fn layout(event: &Event, viewport: Viewport) -> Entity {
    let hash = identity_hash(&event.id);
    let (vx, vy) = velocity_bias(hash);
    Entity {
        event_id: event.id.clone(),
        level: event.level,
        acknowledged: event.acknowledged,
        base: base_position(hash, viewport),
        vx,
        vy,
        size: entity_size(event.status),
        color: color::for_event(event),
    }
}
