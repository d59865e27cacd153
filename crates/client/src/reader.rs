//! Reader strategies
//!
//! The strategies differ only in how they frame the response body; the
//! read loop, capping, and timeout handling are shared. The loop checks
//! its stop conditions before each blocking read: once the read window
//! has elapsed or the stream has closed, no further read is attempted.

use futures_util::StreamExt;
use reqwest::Client;
use tokio::time::{Instant, timeout};

use crate::config::ReaderConfig;
use crate::decode::{Decoder, LineDecoder, SseDecoder};
use crate::error::{ClientError, Result};

/// Reads the event stream with incremental SSE parsing
///
/// # Example
///
/// ```no_run
/// use thermo_client::{EventStreamReader, ReaderConfig};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> thermo_client::Result<()> {
/// let reader = EventStreamReader::new(ReaderConfig::default());
/// let summary = reader.read("http://localhost:8080/v1/temperature/stream").await?;
/// println!("{summary}");
/// # Ok(())
/// # }
/// ```
pub struct EventStreamReader {
    client: Client,
    config: ReaderConfig,
}

impl EventStreamReader {
    /// Create a reader with the given configuration
    pub fn new(config: ReaderConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Read the stream at `url` and join the collected events
    pub async fn read(&self, url: &str) -> Result<String> {
        let events = collect(&self.client, url, &self.config, SseDecoder::new()).await?;
        Ok(events.join(&self.config.delimiter))
    }
}

/// Reads the event stream line by line
///
/// Semantically equivalent to [`EventStreamReader`] for single-line
/// events; it simply treats every non-empty body line as one event.
pub struct LineReader {
    client: Client,
    config: ReaderConfig,
}

impl LineReader {
    /// Create a reader with the given configuration
    pub fn new(config: ReaderConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Read the stream at `url` and join the collected events
    pub async fn read(&self, url: &str) -> Result<String> {
        let events = collect(&self.client, url, &self.config, LineDecoder::new()).await?;
        Ok(events.join(&self.config.delimiter))
    }
}

/// Shared read loop: collect up to `max_events` within the read window
///
/// Stop conditions, checked before each blocking read:
/// - the collected count reached `max_events`
/// - the read window elapsed
/// - the stream closed
///
/// A transport failure mid-read is logged and stops collection early;
/// whatever was collected so far is returned.
async fn collect(
    client: &Client,
    url: &str,
    config: &ReaderConfig,
    mut decoder: impl Decoder,
) -> Result<Vec<String>> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| ClientError::Connect {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Status {
            url: url.to_string(),
            status,
        });
    }

    let deadline = Instant::now() + config.read_timeout();
    let mut body = response.bytes_stream();
    let mut events = Vec::new();

    'read: while events.len() < config.max_events {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            tracing::debug!(url, collected = events.len(), "read window elapsed");
            break;
        }

        let chunk = match timeout(remaining, body.next()).await {
            // Window elapsed while waiting for the next chunk
            Err(_) => {
                tracing::debug!(url, collected = events.len(), "read window elapsed");
                break;
            }
            // Stream closed by the server
            Ok(None) => {
                tracing::debug!(url, collected = events.len(), "stream closed");
                break;
            }
            Ok(Some(Err(e))) => {
                tracing::warn!(url, error = %e, "transport failure during read, stopping early");
                break;
            }
            Ok(Some(Ok(chunk))) => chunk,
        };

        for event in decoder.feed(&chunk) {
            events.push(event);
            if events.len() >= config.max_events {
                break 'read;
            }
        }
    }

    tracing::debug!(url, collected = events.len(), "read complete");
    Ok(events)
}
