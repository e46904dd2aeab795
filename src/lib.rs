//! Server Shepherd: a live operations dashboard client.
//!
//! Each backend log event becomes a small creature on a canvas. Its spot is
//! derived from the event id, its size from the status code and its colour
//! from severity. Unacknowledged errors pulse a distress mark. Clicking a
//! creature shows its details and can acknowledge it on the backend.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | Bounded newest-first event list |
//! | [`sync`] | Push-channel task, reconnect policy, message application |
//! | [`api`] | REST backend client (`/events`, `/acknowledge`, `/ingest`) |
//! | [`interaction`] | Pointer selection and the acknowledge flow |
//! | [`session`] | The task that owns all client state and publishes frames |
//! | [`console`] | Stdin/stdout front end for `shepherd watch` |
//! | [`tail`] | Log-file follower that feeds `/ingest` |
//! | [`config`] | Session settings and their defaults |
//! | [`error`] | Crate error type |
//!
//! The spatial engine (layout, animation, hit-testing) lives in the `field`
//! crate; the wire model lives in `wire`.

pub mod api;
pub mod config;
pub mod console;
pub mod error;
pub mod interaction;
pub mod session;
pub mod store;
pub mod sync;
pub mod tail;

pub use error::ShepherdError;
