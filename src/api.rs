//! REST client for the dashboard backend.
//!
//! [`Backend`] is the seam the session talks through: the snapshot fetch and
//! the acknowledge call. [`HttpBackend`] implements it over `reqwest`; tests
//! substitute in-memory doubles.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become `ServerStatus`. A 2xx response whose body says
//! `{"ok": false}` becomes `Rejected`: the backend answers an unknown id with
//! HTTP 200 and `"error": "not_found"`, which must not count as success.
//! Request timeouts surface as `Http`.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;
use wire::{Event, IngestRequest, Reply, Snapshot};

use crate::config::Config;
use crate::error::ShepherdError;

/// Operations the session needs from the backend.
#[async_trait]
pub trait Backend: Send + Sync + 'static {
    /// Fetch the current event list, newest first.
    async fn fetch_events(&self) -> Result<Vec<Event>, ShepherdError>;

    /// Ask the backend to acknowledge the event with `id`.
    async fn acknowledge(&self, id: &str) -> Result<(), ShepherdError>;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    /// Build a client for `base_url` whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBaseUrl` if `base_url` is not an http(s) URL that can
    /// carry a path, or `Http` if the TLS client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ShepherdError> {
        let parsed = Url::parse(base_url).map_err(|_| ShepherdError::InvalidBaseUrl(base_url.to_owned()))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(ShepherdError::InvalidBaseUrl(base_url.to_owned()));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url: parsed })
    }

    /// A client for the session described by `config`.
    ///
    /// # Errors
    ///
    /// As [`HttpBackend::new`].
    pub fn from_config(config: &Config) -> Result<Self, ShepherdError> {
        Self::new(&config.base_url, config.request_timeout)
    }

    /// URL for `segments` under the base path. Each segment is percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBaseUrl` if the base cannot carry path segments.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ShepherdError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ShepherdError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Submit one raw log line; returns the id the backend assigned.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx status, or an
    /// `{"ok": false}` body.
    pub async fn ingest(&self, raw: &str) -> Result<Option<String>, ShepherdError> {
        let url = self.endpoint(&["ingest"])?;
        let response = self.client.post(url).json(&IngestRequest { raw: raw.to_owned() }).send().await?;
        let reply = read_reply(response, "ingest").await?;
        Ok(reply.and_then(|reply| reply.id))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_events(&self) -> Result<Vec<Event>, ShepherdError> {
        let url = self.endpoint(&["events"])?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(ShepherdError::ServerStatus { status: status.as_u16(), body });
        }
        let snapshot = response.json::<Snapshot>().await?;
        debug!(count = snapshot.events.len(), "fetched event snapshot");
        Ok(snapshot.events)
    }

    async fn acknowledge(&self, id: &str) -> Result<(), ShepherdError> {
        let url = self.endpoint(&["acknowledge", id])?;
        let response = self.client.post(url).send().await?;
        read_reply(response, "acknowledge").await?;
        Ok(())
    }
}

/// Check the status and the `ok` field of a backend reply.
///
/// A 2xx body that is not a JSON reply object is accepted as success and
/// yields `None`.
async fn read_reply(response: reqwest::Response, action: &'static str) -> Result<Option<Reply>, ShepherdError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ShepherdError::ServerStatus { status: status.as_u16(), body });
    }
    interpret_reply(&body, action)
}

pub(crate) fn interpret_reply(body: &str, action: &'static str) -> Result<Option<Reply>, ShepherdError> {
    match serde_json::from_str::<Reply>(body) {
        Ok(reply) if !reply.ok => Err(ShepherdError::Rejected {
            action,
            reason: reply.error.unwrap_or_else(|| "unspecified".to_owned()),
        }),
        Ok(reply) => Ok(Some(reply)),
        Err(error) => {
            debug!(action, %error, "reply body is not a reply object");
            Ok(None)
        }
    }
}
