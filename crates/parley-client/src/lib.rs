//! # Parley Client
//!
//! The stream reconciler. A [`ChatSession`] owns the transcript, sends the
//! whole conversation to the relay on every submission and folds the framed
//! reply into an in-progress assistant message as it arrives. Observers get
//! [`SessionSnapshot`]s through a `tokio::sync::watch` channel.
//!
//! ```rust,no_run
//! use parley_client::{ChatSession, TurnOutcome};
//! use parley_config::ClientConfig;
//!
//! # async fn run() -> Result<(), parley_core::ChatError> {
//! let session = ChatSession::connect(&ClientConfig::default());
//! match session.submit("What does the masterclass cover?").await? {
//!     TurnOutcome::Completed { reply } => println!("{}", reply.unwrap_or_default()),
//!     TurnOutcome::Failed(e) => eprintln!("turn failed: {e}"),
//!     TurnOutcome::Cancelled => {}
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod session;
mod transport;

pub use session::{ChatSession, Phase, SessionOptions, SessionSnapshot, TurnOutcome};
pub use transport::{ByteStream, HttpRelay, RelayTransport};
