//! # Parley Core
//!
//! Shared building blocks for the Parley chat relay and its client-side
//! reconciler.
//!
//! ## Modules
//!
//! - [`message`]: roles, messages and the growing [`Transcript`]
//! - [`event`]: the closed set of [`StreamEvent`] frames carried on the wire
//! - [`framing`]: line buffering and `data:` frame decoding
//! - [`wire`]: request/response bodies exchanged with the relay endpoint
//! - [`backend`]: the [`GenerationBackend`] capability the relay forwards to
//! - [`prompts`]: the fixed system instruction
//!
//! Core defines the interfaces; HTTP plumbing lives in `parley-web`
//! (relay), `parley-client` (reconciler) and `parley-llm` (backends).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod event;
pub mod framing;
pub mod message;
pub mod prompts;
pub mod wire;

pub use backend::{FragmentStream, GenerationBackend, GenerationRequest, LlmError, LlmResult};
pub use error::{ChatError, ChatResult, SubmitRejection};
pub use event::StreamEvent;
pub use framing::{FrameDecoder, LineBuffer};
pub use message::{Message, Role, Transcript};
pub use wire::{ChatRequest, ErrorBody};
