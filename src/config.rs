//! Client configuration.
//!
//! `Config` collects everything a session needs: where the backend lives,
//! how many events to retain, how fast to animate, the viewport, and the
//! reconnect policy. The CLI fills it from flags and `SHEPHERD_*` variables;
//! tests build it directly from `Config::default()`.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use field::point::Viewport;

use crate::error::ShepherdError;
use crate::store::DEFAULT_CAPACITY;
use crate::sync::ReconnectPolicy;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// HTTP origin of the backend, e.g. `http://127.0.0.1:8000`.
    pub base_url: String,
    /// Explicit push-channel URL. Derived from `base_url` when absent.
    pub ws_url: Option<String>,
    pub capacity: usize,
    pub fps: u32,
    pub viewport: Viewport,
    pub reconnect: ReconnectPolicy,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            ws_url: None,
            capacity: DEFAULT_CAPACITY,
            fps: field::consts::TARGET_FPS,
            viewport: Viewport::default(),
            reconnect: ReconnectPolicy::default(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Check the settings a session cannot run without.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a zero capacity, zero fps, or a
    /// non-positive viewport, and `InvalidBaseUrl` when the base URL is
    /// not http(s).
    pub fn validate(&self) -> Result<(), ShepherdError> {
        if self.capacity == 0 {
            return Err(ShepherdError::InvalidConfig("capacity must be at least 1".to_owned()));
        }
        if self.fps == 0 {
            return Err(ShepherdError::InvalidConfig("fps must be at least 1".to_owned()));
        }
        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            return Err(ShepherdError::InvalidConfig(format!(
                "viewport must be positive, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        self.resolved_ws_url()?;
        Ok(())
    }

    /// Push-channel URL: the explicit override, or `/ws` on the base origin.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBaseUrl` when the base URL is not http(s).
    pub fn resolved_ws_url(&self) -> Result<String, ShepherdError> {
        let derived = ws_url(&self.base_url)?;
        Ok(self.ws_url.clone().unwrap_or(derived))
    }

    /// Time between animation frames.
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }
}

/// Map an http(s) origin to its ws(s) push endpoint.
///
/// # Errors
///
/// Returns `InvalidBaseUrl` for any other scheme.
pub fn ws_url(base_url: &str) -> Result<String, ShepherdError> {
    let trimmed = base_url.trim_end_matches('/');
    if let Some(rest) = trimmed.strip_prefix("http://") {
        return Ok(format!("ws://{rest}/ws"));
    }
    if let Some(rest) = trimmed.strip_prefix("https://") {
        return Ok(format!("wss://{rest}/ws"));
    }

    Err(ShepherdError::InvalidBaseUrl(base_url.to_owned()))
}
