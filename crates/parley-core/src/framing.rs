//! Line buffering and frame decoding for streamed response bodies
//!
//! The body arrives as opaque byte chunks whose boundaries need not line up
//! with event boundaries. [`LineBuffer`] carries incomplete trailing lines
//! (including split UTF-8 sequences) across reads; [`FrameDecoder`] turns each
//! complete `data:` line into a [`StreamEvent`].

use crate::error::{ChatError, ChatResult};
use crate::event::StreamEvent;

/// Marker that introduces an event line
pub const DATA_PREFIX: &str = "data:";

/// Payload that terminates a stream
pub const DONE_SENTINEL: &str = "[DONE]";

/// Accumulates byte chunks and yields complete lines
///
/// Lines are split on `\n`; a trailing `\r` is dropped. Because `\n` never
/// occurs inside a multi-byte UTF-8 sequence, every complete line decodes
/// without losing characters split across chunks.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chunk and return every line it completes
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.pending[start..].iter().position(|&b| b == b'\n') {
            let end = start + offset;
            lines.push(decode_line(&self.pending[start..end]));
            start = end + 1;
        }
        self.pending.drain(..start);
        lines
    }

    /// Flush the unterminated remainder at end of data
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let line = decode_line(&self.pending);
        self.pending.clear();
        Some(line)
    }

    /// Bytes held back waiting for a newline
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Parse one line of a relay response body
///
/// Returns `Ok(None)` for lines that are not events (blank separators,
/// comments, `event:` fields), and [`ChatError::FrameParseFailure`] when a
/// `data:` payload is neither the sentinel nor a recognisable frame.
pub fn parse_line(line: &str) -> ChatResult<Option<StreamEvent>> {
    let Some(rest) = line.strip_prefix(DATA_PREFIX) else {
        return Ok(None);
    };

    let payload = rest.trim();
    if payload == DONE_SENTINEL {
        return Ok(Some(StreamEvent::Done));
    }

    serde_json::from_str(payload)
        .map(Some)
        .map_err(|e| ChatError::FrameParseFailure(format!("{e} in {payload:?}")))
}

/// Incremental decoder from body chunks to stream events
///
/// Unparseable frames are counted and skipped; they never abort decoding.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    lines: LineBuffer,
    skipped: usize,
}

impl FrameDecoder {
    /// Create a decoder with an empty line buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one body chunk, returning the events it completes
    pub fn push(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        let lines = self.lines.push(chunk);
        lines.iter().filter_map(|line| self.decode(line)).collect()
    }

    /// Decode whatever is left once the transport reports end-of-data
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        match self.lines.finish() {
            Some(line) => self.decode(&line).into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// Number of frames dropped because they failed to parse
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn decode(&mut self, line: &str) -> Option<StreamEvent> {
        match parse_line(line) {
            Ok(event) => event,
            Err(e) => {
                self.skipped += 1;
                tracing::trace!("Skipping frame: {}", e);
                None
            }
        }
    }
}
