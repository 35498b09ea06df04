//! Default values shared by the configuration sections

/// Default model for the Gemini provider
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Default model for OpenAI-compatible providers
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Default model for Ollama
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";

/// Fixed sampling temperature for generated replies
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Backend request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Relay bind host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Relay bind port
pub const DEFAULT_PORT: u16 = 3000;

/// Maximum accepted request body (1 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Interval between SSE keep-alive comments
pub const DEFAULT_KEEP_ALIVE_SECS: u64 = 15;

/// Relay URL the chat client talks to
pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:3000/api/chat";
