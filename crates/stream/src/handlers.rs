//! HTTP route handlers
//!
//! Two SSE delivery strategies over the broker plus readback endpoints
//! that consume the server's own stream through the client strategies.
//!
//! # Endpoints
//!
//! - `GET /v1/temperature/stream` - blocking-pull SSE
//! - `GET /v1/temperature/stream/polled` - polled push-loop SSE
//! - `GET /v1/temperature/read/events` - readback via SSE parsing
//! - `GET /v1/temperature/read/lines` - readback via line reading
//! - `GET /health` - liveness check

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use futures_util::Stream;
use futures_util::stream;
use tokio_util::sync::CancellationToken;

use thermo_broker::Broker;
use thermo_client::{ClientError, EventStreamReader, LineReader, ReaderConfig};

use crate::session::{DeliveryStrategy, StreamSession};

/// Shared state for handlers
pub struct HandlerState {
    /// The broker this endpoint drains
    pub broker: Arc<Broker>,

    /// Base URL of this server, for the readback self-reads
    pub base_url: String,

    /// Limits applied by the readback endpoints
    pub reader: ReaderConfig,

    /// Cancelled when the server shuts down; ends in-flight waits
    pub cancel: CancellationToken,
}

/// Per-stream state threaded through the SSE unfold
struct SseState {
    shared: Arc<HandlerState>,
    session: StreamSession,
}

/// GET /health - liveness check
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /v1/temperature/stream - blocking-pull delivery
///
/// Each event suspends on `Broker::consume` until a value exists, so
/// delivery is naturally rate-limited to the production cadence. A
/// cancelled wait surfaces as a stream error and ends the session.
pub async fn stream_blocking(
    State(state): State<Arc<HandlerState>>,
) -> Sse<impl Stream<Item = std::result::Result<Event, axum::Error>>> {
    let session = StreamSession::new(DeliveryStrategy::BlockingPull);

    let stream = stream::unfold(
        SseState {
            shared: state,
            session,
        },
        |mut st| async move {
            if st.session.is_terminal() {
                return None;
            }

            match st.shared.broker.consume(&st.shared.cancel).await {
                Ok(value) => {
                    st.session.streaming();
                    Some((Ok(Event::default().data(value.to_string())), st))
                }
                Err(e) => {
                    st.session.fail("blocking wait cancelled");
                    Some((Err(axum::Error::new(e)), st))
                }
            }
        },
    );

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// GET /v1/temperature/stream/polled - polled push-loop delivery
///
/// Waits for queue readiness, then polls. The poll can race with other
/// consumers; losing the race just means waiting for the next value.
pub async fn stream_polled(
    State(state): State<Arc<HandlerState>>,
) -> Sse<impl Stream<Item = std::result::Result<Event, axum::Error>>> {
    let session = StreamSession::new(DeliveryStrategy::Polled);

    let stream = stream::unfold(
        SseState {
            shared: state,
            session,
        },
        |mut st| async move {
            if st.session.is_terminal() {
                return None;
            }

            loop {
                if let Err(e) = st.shared.broker.wait_ready(&st.shared.cancel).await {
                    st.session.fail("readiness wait cancelled");
                    return Some((Err(axum::Error::new(e)), st));
                }

                if let Some(value) = st.shared.broker.poll() {
                    st.session.streaming();
                    return Some((Ok(Event::default().data(value.to_string())), st));
                }
            }
        },
    );

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// GET /v1/temperature/read/events - readback via the SSE strategy
pub async fn read_events(State(state): State<Arc<HandlerState>>) -> Response {
    let url = stream_url(&state);
    let reader = EventStreamReader::new(state.reader.clone());
    readback_response(reader.read(&url).await)
}

/// GET /v1/temperature/read/lines - readback via the line strategy
pub async fn read_lines(State(state): State<Arc<HandlerState>>) -> Response {
    let url = stream_url(&state);
    let reader = LineReader::new(state.reader.clone());
    readback_response(reader.read(&url).await)
}

fn stream_url(state: &HandlerState) -> String {
    format!("{}/v1/temperature/stream", state.base_url)
}

/// Render a readback result
///
/// Mid-read failures were already absorbed by the reader; only a failed
/// connection to our own stream endpoint reaches the error arm.
fn readback_response(result: std::result::Result<String, ClientError>) -> Response {
    match result {
        Ok(summary) => (StatusCode::OK, summary).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "readback failed to open stream");
            (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
        }
    }
}
