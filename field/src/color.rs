//! RGBA colours and the field palette.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

use serde::Serialize;
use wire::{Event, Level};

/// An 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque gray with all channels set to `v`.
    #[must_use]
    pub const fn gray(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    /// CSS `rgba(...)` notation.
    #[must_use]
    pub fn to_css(self) -> String {
        format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, f64::from(self.a) / 255.0)
    }
}

/// Acknowledged events, regardless of level.
pub const ACKNOWLEDGED: Color = Color::gray(150);
/// Unacknowledged `error` events.
pub const ERROR: Color = Color::rgb(220, 80, 80);
/// Unacknowledged `warning` events.
pub const WARNING: Color = Color::rgb(220, 180, 60);
/// Unacknowledged `info` events.
pub const INFO: Color = Color::rgb(80, 200, 120);
/// Head of every entity.
pub const HEAD: Color = Color::gray(40);
/// Translucent shadow drawn under an entity in distress.
pub const DISTRESS: Color = Color::rgba(120, 40, 40, 120);

/// Body colour for an event. Acknowledgement wins over level.
#[must_use]
pub fn for_event(event: &Event) -> Color {
    if event.acknowledged {
        return ACKNOWLEDGED;
    }
    match event.level {
        Level::Error => ERROR,
        Level::Warning => WARNING,
        Level::Info => INFO,
    }
}
