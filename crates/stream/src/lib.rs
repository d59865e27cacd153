//! Thermo Stream - HTTP endpoint for the live telemetry stream
//!
//! Exposes the broker's content to external callers as server-sent
//! events, one scalar aggregate per event, plus synchronous readback
//! endpoints that consume the stream through the client strategies.
//!
//! # Delivery strategies
//!
//! - **Blocking-pull** (`/v1/temperature/stream`): each event suspends
//!   on `Broker::consume`; delivery follows the production cadence.
//! - **Polled** (`/v1/temperature/stream/polled`): waits for queue
//!   readiness, then polls. Kept as a distinct strategy because its
//!   poll may race with other consumers; the wait itself suspends on
//!   the broker's notifier rather than re-checking in a hot loop.
//!
//! Sessions are independent: a transport failure or cancelled wait is
//! terminal for that session only and never touches the broker or any
//! other session.

mod config;
mod error;
mod handlers;
mod session;

pub use config::StreamServerConfig;
pub use error::{Result, StreamError};
pub use session::{DeliveryStrategy, SessionState, StreamSession};

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use thermo_broker::Broker;

use handlers::{HandlerState, health, read_events, read_lines, stream_blocking, stream_polled};

/// HTTP server pushing broker values to connected clients
pub struct StreamServer {
    config: StreamServerConfig,
    broker: Arc<Broker>,
}

impl StreamServer {
    /// Create a new stream server over the given broker
    pub fn new(config: StreamServerConfig, broker: Arc<Broker>) -> Self {
        Self { config, broker }
    }

    /// Bind the configured address and serve until cancelled
    pub async fn run(self, cancel: CancellationToken) -> Result<()> {
        let bind_addr = self.config.bind_addr();

        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| StreamError::Bind {
                address: bind_addr,
                source: e,
            })?;

        self.run_on(listener, cancel).await
    }

    /// Serve on an already-bound listener until cancelled
    ///
    /// Useful with a port-0 listener when the caller needs the actual
    /// address before the server starts.
    pub async fn run_on(self, listener: TcpListener, cancel: CancellationToken) -> Result<()> {
        let local_addr = listener.local_addr().map_err(StreamError::Serve)?;

        tracing::info!(
            address = %local_addr,
            topic = %self.broker.topic(),
            "stream endpoint listening"
        );

        let state = Arc::new(HandlerState {
            broker: self.broker,
            base_url: format!("http://{local_addr}"),
            reader: self.config.reader.clone(),
            cancel: cancel.clone(),
        });

        let app = build_router(state);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(cancel))
            .await
            .map_err(StreamError::Serve)?;

        tracing::info!("stream endpoint stopped");
        Ok(())
    }
}

/// Build the axum router
fn build_router(state: Arc<HandlerState>) -> Router {
    Router::new()
        .route("/v1/temperature/stream", get(stream_blocking))
        .route("/v1/temperature/stream/polled", get(stream_polled))
        .route("/v1/temperature/read/events", get(read_events))
        .route("/v1/temperature/read/lines", get(read_lines))
        .route("/health", get(health))
        .with_state(state)
}

/// Shutdown signal future
async fn shutdown_signal(cancel: CancellationToken) {
    cancel.cancelled().await;
}
