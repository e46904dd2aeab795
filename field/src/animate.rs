//! Per-frame animation of laid-out entities.
//!
//! Animation never accumulates: each frame starts again from the entity's
//! base position and adds a wander term that depends only on the tick. That
//! keeps frames reproducible and means nothing but the tick needs to survive
//! between them.

#[cfg(test)]
#[path = "animate_test.rs"]
mod animate_test;

use crate::color::{DISTRESS, HEAD};
use crate::consts::{
    DISTRESS_OFFSET_Y, DISTRESS_RATE, DISTRESS_THRESHOLD, DRIFT_X, DRIFT_Y, WANDER_AMP_X, WANDER_AMP_Y,
    WANDER_RATE_X, WANDER_RATE_Y,
};
use crate::layout::Entity;
use crate::point::{Point, Viewport};
use crate::scene::{Drawable, Ellipse};

/// Monotonic animation clock. The first frame is tick 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameClock {
    tick: u64,
}

impl FrameClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to the next frame and return its tick.
    pub fn advance(&mut self) -> u64 {
        self.tick = self.tick.saturating_add(1);
        self.tick
    }

    /// Tick of the most recent frame, or 0 before the first.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }
}

/// Wandered, unclamped centre for `entity` at `tick`.
///
/// The phase includes the entity's own coordinate so neighbours drift out of step.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn wander(entity: &Entity, tick: u64) -> Point {
    let t = tick as f64;
    let base = entity.base;
    let dx = (t * WANDER_RATE_X + base.x).sin() * WANDER_AMP_X + entity.vx * DRIFT_X;
    let dy = (t * WANDER_RATE_Y + base.y).cos() * WANDER_AMP_Y + entity.vy * DRIFT_Y;
    base.offset(dx, dy)
}

/// Whether an entity centred at `x` shows the distress mark at `tick`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn distress_pulse(tick: u64, x: f64) -> bool {
    (tick as f64 * DISTRESS_RATE + x).sin().abs() > DISTRESS_THRESHOLD
}

/// Animate one entity for `tick`, producing what the renderer draws.
#[must_use]
pub fn animate(entity: &Entity, viewport: Viewport, tick: u64) -> Drawable {
    let size = entity.size;
    let center = viewport.clamp(wander(entity, tick), size);

    let body = Ellipse { center, width: size * 1.6, height: size, color: entity.color };
    let head = Ellipse {
        center: center.offset(size * 0.6, -size * 0.1),
        width: size * 0.6,
        height: size * 0.5,
        color: HEAD,
    };

    let in_distress = entity.level == wire::Level::Error && !entity.acknowledged;
    let distress = (in_distress && distress_pulse(tick, center.x)).then(|| Ellipse {
        center: center.offset(0.0, DISTRESS_OFFSET_Y),
        width: size * 1.2,
        height: size * 0.6,
        color: DISTRESS,
    });

    Drawable {
        event_id: entity.event_id.clone(),
        center,
        size,
        color: entity.color,
        body,
        head,
        distress,
    }
}
