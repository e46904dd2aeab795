//! Shared numeric constants for the field crate.

// ── Layout ──────────────────────────────────────────────────────

/// Multiplier applied to the identity hash to spread entities horizontally.
pub const X_SPREAD: u64 = 37;

/// Multiplier applied to the identity hash to spread entities vertically.
pub const Y_SPREAD: u64 = 97;

/// Vertical margin kept clear at the top of the field.
pub const Y_MARGIN: f64 = 30.0;

/// Total vertical band excluded from base placement (top and bottom margin).
pub const Y_BAND: f64 = 60.0;

/// Smallest entity diameter; status codes add up to 9 more.
pub const BASE_SIZE: f64 = 24.0;

// ── Animation ───────────────────────────────────────────────────

/// Phase advance per tick for the horizontal wander.
pub const WANDER_RATE_X: f64 = 0.01;

/// Phase advance per tick for the vertical wander.
pub const WANDER_RATE_Y: f64 = 0.008;

/// Amplitude of the horizontal wander, in pixels.
pub const WANDER_AMP_X: f64 = 0.5;

/// Amplitude of the vertical wander, in pixels.
pub const WANDER_AMP_Y: f64 = 0.3;

/// Share of the horizontal velocity bias applied each frame.
pub const DRIFT_X: f64 = 0.5;

/// Share of the vertical velocity bias applied each frame.
pub const DRIFT_Y: f64 = 0.2;

/// Phase advance per tick for the distress pulse.
pub const DISTRESS_RATE: f64 = 0.1;

/// Pulse magnitude above which the distress mark is drawn.
pub const DISTRESS_THRESHOLD: f64 = 0.98;

/// Vertical offset of the distress mark below the entity centre.
pub const DISTRESS_OFFSET_Y: f64 = 6.0;

/// Target frame rate of the animation clock.
pub const TARGET_FPS: u32 = 30;
