//! Log-tail agent: follows a file and ingests each new line.
//!
//! The agent starts at the current end of the file, so only lines written
//! after it starts are sent. It polls the file size; a size smaller than the
//! read offset means the file was truncated or replaced, and reading starts
//! over from the beginning. A line is sent once its newline has been written.

#[cfg(test)]
#[path = "tail_test.rs"]
mod tail_test;

use std::io::SeekFrom;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::{debug, info, warn};

use crate::api::HttpBackend;
use crate::error::ShepherdError;

pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Where followed lines go.
#[async_trait]
pub trait LineSink: Send + Sync {
    async fn send_line(&self, line: &str) -> Result<(), ShepherdError>;
}

#[async_trait]
impl LineSink for HttpBackend {
    async fn send_line(&self, line: &str) -> Result<(), ShepherdError> {
        let id = self.ingest(line).await?;
        debug!(id = id.as_deref().unwrap_or("-"), "tail: ingested");
        Ok(())
    }
}

/// Splits a byte stream into complete lines.
#[derive(Debug, Default)]
pub struct LineBuffer {
    partial: Vec<u8>,
}

impl LineBuffer {
    /// Feed `chunk` and return the lines it completed, without terminators.
    /// Blank lines are skipped; invalid UTF-8 is replaced.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.partial.extend_from_slice(chunk);
        let Some(last_newline) = self.partial.iter().rposition(|&b| b == b'\n') else {
            return Vec::new();
        };
        let rest = self.partial.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.partial, rest);
        complete
            .split(|&b| b == b'\n')
            .map(|line| String::from_utf8_lossy(line).trim_end_matches('\r').to_owned())
            .filter(|line| !line.trim().is_empty())
            .collect()
    }

    pub fn clear(&mut self) {
        self.partial.clear();
    }
}

/// Follow `path` forever, sending each new line to `sink`.
///
/// Send failures are logged and the line is dropped. A missing file is
/// waited for.
///
/// # Errors
///
/// Returns an I/O error if `path` cannot be inspected at startup or a read
/// fails.
pub async fn follow(path: &Path, sink: &dyn LineSink, poll: Duration) -> Result<(), ShepherdError> {
    let mut offset = tokio::fs::metadata(path).await?.len();
    let mut buffer = LineBuffer::default();
    info!(path = %path.display(), offset, "tail: following");

    let mut ticker = tokio::time::interval(poll);
    loop {
        ticker.tick().await;
        let len = match tokio::fs::metadata(path).await {
            Ok(meta) => meta.len(),
            Err(error) => {
                debug!(path = %path.display(), %error, "tail: file not readable yet");
                continue;
            }
        };
        if len < offset {
            info!(path = %path.display(), "tail: file truncated, reading from start");
            offset = 0;
            buffer.clear();
        }
        if len == offset {
            continue;
        }

        let chunk = read_from(path, offset).await?;
        offset = offset.saturating_add(u64::try_from(chunk.len()).unwrap_or(u64::MAX));
        for line in buffer.push(&chunk) {
            if let Err(error) = sink.send_line(&line).await {
                warn!(%error, "tail: send failed");
            }
        }
    }
}

async fn read_from(path: &Path, offset: u64) -> Result<Vec<u8>, ShepherdError> {
    let mut file = tokio::fs::File::open(path).await?;
    file.seek(SeekFrom::Start(offset)).await?;
    let mut chunk = Vec::new();
    file.read_to_end(&mut chunk).await?;
    Ok(chunk)
}
