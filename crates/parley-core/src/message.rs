//! Conversation messages and the transcript that owns them

use serde::{Deserialize, Serialize};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Text typed by the visitor
    User,
    /// Text produced by the generation backend
    Assistant,
}

impl Role {
    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single turn in the conversation
///
/// Fields are private: content only grows through [`Transcript::append_delta`]
/// while the message is the in-progress assistant reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    /// Create a message with an explicit role
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Role of the author
    pub fn role(&self) -> Role {
        self.role
    }

    /// Text of the message
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Ordered conversation state
///
/// At most one message is in progress at any time and it is always the last
/// element. Cloning yields a snapshot that observers may hold onto freely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
    in_progress: bool,
}

impl Transcript {
    /// Create an empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sealed user message
    ///
    /// Any in-progress reply is sealed first so the in-progress message stays last.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.seal();
        self.messages.push(Message::user(content));
    }

    /// Fold one generated fragment into the transcript
    ///
    /// Appends to the in-progress assistant message, or opens a new one whose
    /// content is `delta` when no reply is in progress.
    pub fn append_delta(&mut self, delta: &str) {
        match self.messages.last_mut() {
            Some(last) if self.in_progress => last.content.push_str(delta),
            _ => {
                self.messages.push(Message::assistant(delta));
                self.in_progress = true;
            }
        }
    }

    /// Seal the in-progress reply, if any
    ///
    /// Returns `true` when a message was sealed.
    pub fn seal(&mut self) -> bool {
        std::mem::replace(&mut self.in_progress, false)
    }

    /// The assistant message still receiving fragments
    pub fn in_progress(&self) -> Option<&Message> {
        if self.in_progress {
            self.messages.last()
        } else {
            None
        }
    }

    /// Whether a reply is currently being streamed into the transcript
    pub fn is_streaming(&self) -> bool {
        self.in_progress
    }

    /// All messages in conversation order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Most recent message
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the transcript holds no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterate over messages in conversation order
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
