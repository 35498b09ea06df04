//! Scripted generation backend
//!
//! Plays back a fixed sequence of fragments, delays and failures instead of
//! calling a real model. Used by `parley serve --provider mock` and by tests
//! that need deterministic streams without API keys or network calls.

use async_stream::stream;
use async_trait::async_trait;
use parley_core::{FragmentStream, GenerationBackend, GenerationRequest, LlmError, LlmResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

const DEFAULT_RESPONSE: &str = "Thanks for reaching out! The SDE Abroad masterclass walks you \
through landing a software role overseas. Click \"Join Now\" to see pricing.";

/// One step of a scripted stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockStep {
    /// Emit a text fragment
    Fragment(String),
    /// Wait before the next step
    Delay(Duration),
    /// End the stream with an error
    Fail(String),
    /// Never produce another item
    Stall,
}

impl MockStep {
    /// Shorthand for [`MockStep::Fragment`]
    pub fn fragment(text: impl Into<String>) -> Self {
        MockStep::Fragment(text.into())
    }
}

/// Scripted backend with call recording
///
/// Clones share state, so a test can keep a handle while the relay owns
/// another.
#[derive(Clone)]
pub struct MockBackend {
    model_name: String,
    /// Script used when no per-message script matches
    default_script: Arc<Mutex<Vec<MockStep>>>,
    /// Scripts keyed by the last user message
    chat_scripts: Arc<Mutex<HashMap<String, Vec<MockStep>>>>,
    /// When set, `stream_chat` fails before streaming
    setup_error: Arc<Mutex<Option<LlmError>>>,
    healthy: Arc<AtomicBool>,
    call_history: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a mock answering every message with a canned reply
    pub fn new() -> Self {
        Self {
            model_name: "mock-llm".to_string(),
            default_script: Arc::new(Mutex::new(words(DEFAULT_RESPONSE))),
            chat_scripts: Arc::new(Mutex::new(HashMap::new())),
            setup_error: Arc::new(Mutex::new(None)),
            healthy: Arc::new(AtomicBool::new(true)),
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock with a custom model name
    pub fn with_model(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            ..Self::new()
        }
    }

    /// Create a mock that streams exactly `fragments` for every request
    pub fn with_fragments<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mock = Self::new();
        mock.set_default_script(fragments.into_iter().map(|f| MockStep::Fragment(f.into())));
        mock
    }

    /// Replace the default script
    pub fn set_default_script(&self, steps: impl IntoIterator<Item = MockStep>) {
        *lock(&self.default_script) = steps.into_iter().collect();
    }

    /// Script the reply to a specific last user message
    pub fn set_chat_script(&self, last_user_message: &str, steps: impl IntoIterator<Item = MockStep>) {
        lock(&self.chat_scripts).insert(last_user_message.to_string(), steps.into_iter().collect());
    }

    /// Make every following `stream_chat` call fail during setup
    pub fn fail_setup(&self, error: LlmError) {
        *lock(&self.setup_error) = Some(error);
    }

    /// Clear a setup failure
    pub fn recover(&self) {
        *lock(&self.setup_error) = None;
    }

    /// Set what `health_check` reports
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Requests received so far
    pub fn call_history(&self) -> Vec<GenerationRequest> {
        lock(&self.call_history).clone()
    }

    /// Forget recorded requests
    pub fn clear_history(&self) {
        lock(&self.call_history).clear();
    }

    fn script_for(&self, request: &GenerationRequest) -> Vec<MockStep> {
        request
            .last_user_message()
            .and_then(|msg| lock(&self.chat_scripts).get(msg).cloned())
            .unwrap_or_else(|| lock(&self.default_script).clone())
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    async fn stream_chat(&self, request: GenerationRequest) -> LlmResult<FragmentStream> {
        lock(&self.call_history).push(request.clone());

        if let Some(error) = lock(&self.setup_error).clone() {
            return Err(error);
        }

        let steps = self.script_for(&request);
        tracing::debug!("Mock backend playing {} steps", steps.len());

        Ok(Box::pin(stream! {
            for step in steps {
                match step {
                    MockStep::Fragment(text) => yield Ok(text),
                    MockStep::Delay(duration) => tokio::time::sleep(duration).await,
                    MockStep::Fail(message) => {
                        yield Err(LlmError::Stream(message));
                        break;
                    }
                    MockStep::Stall => futures::future::pending::<()>().await,
                }
            }
        }))
    }

    async fn health_check(&self) -> LlmResult<bool> {
        Ok(self.healthy.load(Ordering::SeqCst))
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }

    fn model(&self) -> &str {
        &self.model_name
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Split text into word fragments, keeping the separating spaces
fn words(text: &str) -> Vec<MockStep> {
    text.split_inclusive(' ').map(MockStep::fragment).collect()
}
