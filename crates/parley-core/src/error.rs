//! Reconciler error taxonomy

use serde::{Deserialize, Serialize};

/// Result type for chat session operations
pub type ChatResult<T> = Result<T, ChatError>;

/// Why a submission was refused before any request was issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum SubmitRejection {
    /// Nothing left after trimming whitespace
    #[error("message is empty")]
    Empty,

    /// Another turn is still sending or streaming
    #[error("a reply is still in flight")]
    InFlight,

    /// The session was closed by its owner
    #[error("chat session is closed")]
    Closed,
}

/// Chat session errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ChatError {
    /// Rejected locally; no request issued, no message appended
    #[error("Invalid submission: {0}")]
    InvalidSubmission(SubmitRejection),

    /// The relay answered with a non-streamed failure
    #[error("Relay setup failed: {0}")]
    RelaySetupFailure(String),

    /// The connection dropped, a read failed, or the turn deadline expired
    #[error("Stream transport failed: {0}")]
    StreamTransportFailure(String),

    /// A single event line could not be decoded
    #[error("Frame parse failed: {0}")]
    FrameParseFailure(String),
}

impl ChatError {
    /// Stable name of the error kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            ChatError::InvalidSubmission(_) => "InvalidSubmission",
            ChatError::RelaySetupFailure(_) => "RelaySetupFailure",
            ChatError::StreamTransportFailure(_) => "StreamTransportFailure",
            ChatError::FrameParseFailure(_) => "FrameParseFailure",
        }
    }
}

impl From<SubmitRejection> for ChatError {
    fn from(reason: SubmitRejection) -> Self {
        ChatError::InvalidSubmission(reason)
    }
}
