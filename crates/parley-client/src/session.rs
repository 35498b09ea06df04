//! Chat session state machine

use std::time::Duration;

use futures::StreamExt;
use parley_config::ClientConfig;
use parley_core::{
    ChatError, ChatResult, FrameDecoder, Message, StreamEvent, SubmitRejection, Transcript,
};
use tokio::sync::watch;
use tokio::time::{timeout_at, Instant};
use tokio_util::sync::CancellationToken;

use crate::transport::{HttpRelay, RelayTransport};

/// Where a session is in its submit cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// Ready for a submission
    #[default]
    Idle,
    /// Request sent, no fragment received yet
    Sending,
    /// At least one fragment received
    Streaming,
}

/// Observable session state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    /// Conversation so far, including a reply still streaming
    pub transcript: Transcript,
    /// Current phase
    pub phase: Phase,
    /// Most recent failure of the latest turn, cleared on the next submission
    pub last_error: Option<ChatError>,
    /// Unsent input text
    pub draft: String,
}

/// How a turn ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The stream ended; `reply` is the sealed assistant message, if any fragment arrived
    Completed {
        /// Text of the reply
        reply: Option<String>,
    },
    /// Setup or transport failed; partial content is kept
    Failed(ChatError),
    /// The session was closed while the turn was running
    Cancelled,
}

/// Session tunables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Upper bound on one turn, from request to end of stream
    pub timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

impl SessionOptions {
    /// Options from the `[client]` config section
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// How far a turn got after the last event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Done,
    Cancelled,
}

/// One chat session: a transcript plus the single turn that may be in flight
///
/// All mutation goes through the session; observers read snapshots from
/// [`ChatSession::subscribe`]. Methods take `&self` so the session can be
/// shared (e.g. in an `Arc`) between the task driving turns and the one that
/// closes it.
pub struct ChatSession<T = HttpRelay> {
    transport: T,
    options: SessionOptions,
    state: watch::Sender<SessionSnapshot>,
    cancel: CancellationToken,
}

impl ChatSession<HttpRelay> {
    /// Session talking HTTP to the configured relay
    pub fn connect(config: &ClientConfig) -> Self {
        Self::new(HttpRelay::from_config(config), SessionOptions::from_config(config))
    }
}

impl<T: RelayTransport> ChatSession<T> {
    /// Open a session with an empty transcript
    pub fn new(transport: T, options: SessionOptions) -> Self {
        Self {
            transport,
            options,
            state: watch::Sender::new(SessionSnapshot::default()),
            cancel: CancellationToken::new(),
        }
    }

    /// Receive a snapshot after every change
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// Current state
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.state.borrow().phase
    }

    /// Replace the unsent input text
    pub fn set_draft(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_if_modified(|snap| {
            if snap.draft == text {
                return false;
            }
            snap.draft = text;
            true
        });
    }

    /// Submit the current draft
    pub async fn submit_draft(&self) -> ChatResult<TurnOutcome> {
        let draft = self.state.borrow().draft.clone();
        self.submit(&draft).await
    }

    /// Run one turn: append `text`, stream the reply into the transcript
    ///
    /// Only a rejected submission is an `Err`; failures after the request
    /// was issued are reported through [`TurnOutcome::Failed`] and
    /// `last_error`.
    pub async fn submit(&self, text: &str) -> ChatResult<TurnOutcome> {
        let messages = self.begin_turn(text).inspect_err(|e| {
            tracing::debug!("Submission rejected: {}", e);
        })?;

        tracing::info!("Submitting turn with {} messages", messages.len());
        let deadline = Instant::now() + self.options.timeout;

        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Ok(Flow::Cancelled),
            result = timeout_at(deadline, self.stream_turn(&messages)) => match result {
                Ok(result) => result,
                Err(_) => Err(ChatError::StreamTransportFailure(format!(
                    "no complete reply within {}s",
                    self.options.timeout.as_secs()
                ))),
            },
        };

        match result {
            Ok(Flow::Cancelled) => Ok(self.cancel_turn()),
            Ok(_) => Ok(self.end_turn(Ok(()))),
            Err(e) => Ok(self.end_turn(Err(e))),
        }
    }

    /// Stop the session: cancels a running turn and rejects later submissions
    pub fn close(&self) {
        if !self.cancel.is_cancelled() {
            tracing::debug!("Closing chat session");
        }
        self.cancel.cancel();
    }

    /// Whether [`ChatSession::close`] was called
    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Check and claim the session for a new turn, atomically
    fn begin_turn(&self, text: &str) -> ChatResult<Vec<Message>> {
        let mut claimed = Err(SubmitRejection::Empty);

        self.state.send_if_modified(|snap| {
            claimed = if self.cancel.is_cancelled() {
                Err(SubmitRejection::Closed)
            } else if snap.phase != Phase::Idle {
                Err(SubmitRejection::InFlight)
            } else if text.trim().is_empty() {
                Err(SubmitRejection::Empty)
            } else {
                snap.transcript.push_user(text);
                snap.draft.clear();
                snap.phase = Phase::Sending;
                snap.last_error = None;
                Ok(snap.transcript.messages().to_vec())
            };
            claimed.is_ok()
        });

        claimed.map_err(ChatError::from)
    }

    async fn stream_turn(&self, messages: &[Message]) -> ChatResult<Flow> {
        let mut chunks = self.transport.open(messages).await?;
        let mut decoder = FrameDecoder::new();

        loop {
            let chunk = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Ok(Flow::Cancelled),
                chunk = chunks.next() => chunk,
            };
            let Some(chunk) = chunk else { break };

            for event in decoder.push(&chunk?) {
                match self.apply(event) {
                    Flow::Continue => {}
                    flow => return Ok(flow),
                }
            }
        }

        let mut flow = Flow::Done;
        for event in decoder.finish() {
            match self.apply(event) {
                Flow::Continue => {}
                end => {
                    flow = end;
                    break;
                }
            }
        }
        if decoder.skipped() > 0 {
            tracing::debug!("Skipped {} undecodable lines", decoder.skipped());
        }
        Ok(flow)
    }

    /// Fold one event into the state
    ///
    /// Nothing is applied once the session is closed.
    fn apply(&self, event: StreamEvent) -> Flow {
        if self.cancel.is_cancelled() {
            return Flow::Cancelled;
        }
        if event.is_terminal() {
            return Flow::Done;
        }

        let mut flow = Flow::Continue;
        self.state.send_if_modified(|snap| {
            if self.cancel.is_cancelled() {
                flow = Flow::Cancelled;
                return false;
            }
            match event {
                StreamEvent::TextDelta { delta, .. } => {
                    tracing::trace!("delta: {} bytes", delta.len());
                    snap.transcript.append_delta(&delta);
                    snap.phase = Phase::Streaming;
                    true
                }
                StreamEvent::Error { error_text } => {
                    tracing::warn!("Relay reported a generation error: {}", error_text);
                    snap.last_error = Some(ChatError::StreamTransportFailure(error_text));
                    true
                }
                _ => false,
            }
        });
        flow
    }

    /// Stop a turn the owner abandoned: keep what arrived, apply nothing more
    fn cancel_turn(&self) -> TurnOutcome {
        tracing::debug!("Turn cancelled");
        self.state.send_modify(|snap| {
            snap.transcript.seal();
            snap.phase = Phase::Idle;
        });
        TurnOutcome::Cancelled
    }

    /// Seal whatever arrived and return to `Idle`
    fn end_turn(&self, result: ChatResult<()>) -> TurnOutcome {
        let mut reply = None;
        self.state.send_modify(|snap| {
            if snap.transcript.seal() {
                reply = snap.transcript.last().map(|m| m.content().to_string());
            }
            snap.phase = Phase::Idle;
            if let Err(e) = &result {
                snap.last_error = Some(e.clone());
            }
        });

        match result {
            Ok(()) => {
                tracing::debug!("Turn completed");
                TurnOutcome::Completed { reply }
            }
            Err(e) => {
                tracing::warn!(kind = e.kind(), "Turn failed: {}", e);
                TurnOutcome::Failed(e)
            }
        }
    }
}
