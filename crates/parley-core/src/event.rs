//! Stream events carried between the relay and the reconciler
//!
//! Each event travels as one `data:` line whose payload is a JSON object with a
//! `type` discriminator, except [`StreamEvent::Done`] which is the bare
//! `[DONE]` sentinel.

use serde::{Deserialize, Serialize};

use crate::framing::DONE_SENTINEL;

/// One frame of a streamed reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StreamEvent {
    /// A reply has started
    Start {
        /// Identifier of the reply being produced
        #[serde(rename = "messageId", default, skip_serializing_if = "Option::is_none")]
        message_id: Option<String>,
    },

    /// A generation step has started
    StartStep,

    /// A text part has opened
    TextStart {
        /// Text part identifier
        #[serde(default)]
        id: String,
    },

    /// A fragment of generated text
    TextDelta {
        /// Text part identifier
        #[serde(default)]
        id: String,
        /// Fragment to append, verbatim
        delta: String,
    },

    /// A text part has closed
    TextEnd {
        /// Text part identifier
        #[serde(default)]
        id: String,
    },

    /// A generation step has finished
    FinishStep,

    /// The reply is complete
    Finish,

    /// The backend failed after streaming began
    Error {
        /// Human-readable failure description
        #[serde(rename = "errorText")]
        error_text: String,
    },

    /// End-of-stream sentinel (`[DONE]`), distinct from transport end-of-data
    #[serde(skip)]
    Done,

    /// Any frame whose `type` is not recognised; always safe to ignore
    #[serde(other)]
    Unknown,
}

impl StreamEvent {
    /// Build a text fragment frame
    pub fn text_delta(id: impl Into<String>, delta: impl Into<String>) -> Self {
        StreamEvent::TextDelta {
            id: id.into(),
            delta: delta.into(),
        }
    }

    /// Build an in-band error frame
    pub fn error(error_text: impl Into<String>) -> Self {
        StreamEvent::Error {
            error_text: error_text.into(),
        }
    }

    /// Short name of the frame, matching its wire `type`
    pub fn kind(&self) -> &'static str {
        match self {
            StreamEvent::Start { .. } => "start",
            StreamEvent::StartStep => "start-step",
            StreamEvent::TextStart { .. } => "text-start",
            StreamEvent::TextDelta { .. } => "text-delta",
            StreamEvent::TextEnd { .. } => "text-end",
            StreamEvent::FinishStep => "finish-step",
            StreamEvent::Finish => "finish",
            StreamEvent::Error { .. } => "error",
            StreamEvent::Done => "done",
            StreamEvent::Unknown => "unknown",
        }
    }

    /// Whether this frame terminates the stream
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Done)
    }

    /// Payload written after the `data:` marker
    pub fn payload(&self) -> String {
        match self {
            StreamEvent::Done => DONE_SENTINEL.to_string(),
            other => serde_json::to_string(other).unwrap_or_else(|_| "{}".to_string()),
        }
    }

    /// Format as a complete SSE event (`data: ...` plus blank line)
    pub fn to_sse(&self) -> String {
        format!("data: {}\n\n", self.payload())
    }
}
