//! The per-frame pipeline: events → entities → drawables.
//!
//! The scene is rebuilt from the current event list on every frame rather
//! than cached, so it can never drift from the events it was built from.
//! Drawables keep the order of the input events; that order is the render
//! order and also the hit-test priority.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use serde::Serialize;
use wire::Event;

use crate::animate::animate;
use crate::color::Color;
use crate::hit;
use crate::layout::layout;
use crate::point::{Point, Viewport};

/// A filled ellipse in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ellipse {
    pub center: Point,
    pub width: f64,
    pub height: f64,
    pub color: Color,
}

/// Draw instructions for one entity in one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Drawable {
    /// Identity of the source event.
    pub event_id: String,
    /// Animated, clamped centre.
    pub center: Point,
    /// Diameter; also the hit radius.
    pub size: f64,
    pub color: Color,
    pub body: Ellipse,
    pub head: Ellipse,
    /// Shadow mark drawn beneath the body for this frame only.
    pub distress: Option<Ellipse>,
}

/// Everything drawn in one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scene {
    pub tick: u64,
    pub viewport: Viewport,
    pub drawables: Vec<Drawable>,
}

impl Scene {
    /// The drawable under `point`, if any. See [`hit::hit_test`].
    #[must_use]
    pub fn hit(&self, point: Point) -> Option<&Drawable> {
        hit::hit_test(point, &self.drawables)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }
}

/// Build the scene for `tick` from `events` in render order.
#[must_use]
pub fn build<'a, I>(events: I, viewport: Viewport, tick: u64) -> Scene
where
    I: IntoIterator<Item = &'a Event>,
{
    let drawables = events
        .into_iter()
        .map(|event| animate(&layout(event, viewport), viewport, tick))
        .collect();
    Scene { tick, viewport, drawables }
}
