//! Incremental event decoding
//!
//! Both strategies buffer raw body chunks and surface complete events as
//! they become available; a chunk boundary can land anywhere, including
//! mid-line.

use bytes::{BufMut, BytesMut};

/// Turns raw body chunks into discrete event strings
pub(crate) trait Decoder {
    /// Feed one body chunk, returning every event completed by it
    fn feed(&mut self, chunk: &[u8]) -> Vec<String>;
}

/// SSE decoder - accumulates `data:` fields, dispatches on blank lines
///
/// Comment lines (leading `:`) and fields other than `data` are
/// ignored. An event whose accumulated data is empty is skipped rather
/// than surfaced, so a malformed frame is never fatal.
#[derive(Debug, Default)]
pub(crate) struct SseDecoder {
    buf: BytesMut,
    data: Vec<String>,
}

impl SseDecoder {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

impl Decoder for SseDecoder {
    fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.put(chunk);

        let mut events = Vec::new();
        while let Some(line) = next_line(&mut self.buf) {
            if line.is_empty() {
                // Event boundary
                if !self.data.is_empty() {
                    events.push(self.data.join("\n"));
                    self.data.clear();
                }
                continue;
            }

            if line.starts_with(':') {
                continue;
            }

            let (field, value) = match line.split_once(':') {
                Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
                None => (line.as_str(), ""),
            };

            if field == "data" {
                self.data.push(value.to_string());
            }
        }

        events
    }
}

/// Line decoder - every non-empty body line is one event
///
/// Strips the `data:` prefix SSE framing adds so callers see clean
/// values, and skips comment lines (keep-alives arrive as `:` lines).
#[derive(Debug, Default)]
pub(crate) struct LineDecoder {
    buf: BytesMut,
}

impl LineDecoder {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

impl Decoder for LineDecoder {
    fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.put(chunk);

        let mut events = Vec::new();
        while let Some(line) = next_line(&mut self.buf) {
            if line.is_empty() || line.starts_with(':') {
                continue;
            }

            let value = match line.strip_prefix("data:") {
                Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
                None => line.as_str(),
            };

            if !value.is_empty() {
                events.push(value.to_string());
            }
        }

        events
    }
}

/// Pop the next complete line off the buffer, without its terminator
///
/// Handles both `\n` and `\r\n`. Returns `None` until a full line is
/// buffered.
fn next_line(buf: &mut BytesMut) -> Option<String> {
    let newline = buf.iter().position(|&b| b == b'\n')?;
    let line = buf.split_to(newline + 1);

    let mut line = &line[..newline];
    if line.last() == Some(&b'\r') {
        line = &line[..line.len() - 1];
    }

    Some(String::from_utf8_lossy(line).into_owned())
}
