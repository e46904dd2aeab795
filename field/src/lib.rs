//! Spatial engine for the shepherd dashboard field.
//!
//! This crate has no I/O and no clock of its own. Given the current list of
//! events (newest first) and the canvas size, it derives one visual entity
//! per event, animates it for the requested frame tick, and resolves pointer
//! coordinates back to the entity underneath. Entities are rebuilt from the
//! events every frame; the only state that survives between frames is the
//! [`animate::FrameClock`] the caller advances.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`layout`] | Deterministic event identity → base position, size, velocity bias, colour |
//! | [`animate`] | Per-frame wander, canvas clamping and the distress pulse |
//! | [`scene`] | The per-frame pipeline and the drawables it produces |
//! | [`hit`] | Pointer hit-testing against a frame's drawables |
//! | [`color`] | RGBA colour type and the field palette |
//! | [`point`] | Points and canvas dimensions |
//! | [`consts`] | Shared numeric constants (margins, animation rates, thresholds) |

pub mod animate;
pub mod color;
pub mod consts;
pub mod hit;
pub mod layout;
pub mod point;
pub mod scene;
