//! Bodies exchanged with the relay endpoint

use serde::{Deserialize, Serialize};

use crate::message::Message;

/// Path the relay is mounted on
pub const CHAT_PATH: &str = "/api/chat";

/// Header advertising the UI-message-stream framing version
pub const UI_STREAM_HEADER: &str = "x-vercel-ai-ui-message-stream";

/// Framing version sent in [`UI_STREAM_HEADER`]
pub const UI_STREAM_VERSION: &str = "v1";

/// Request body: the full conversation, role and content only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation in order, oldest first
    pub messages: Vec<Message>,
}

impl ChatRequest {
    /// Build a request from any sequence of messages
    pub fn new(messages: impl IntoIterator<Item = Message>) -> Self {
        Self {
            messages: messages.into_iter().collect(),
        }
    }
}

/// Non-streamed failure body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable failure description
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_shape() {
        let request = ChatRequest::new([Message::user("hi"), Message::assistant("hello")]);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "messages": [
                    {"role": "user", "content": "hi"},
                    {"role": "assistant", "content": "hello"}
                ]
            })
        );
    }
}
