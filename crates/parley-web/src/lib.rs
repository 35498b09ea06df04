//! # Parley Web
//!
//! The relay endpoint: accepts a conversation on `POST /api/chat`, forwards
//! it with the fixed system instruction to a generation backend and streams
//! the fragments back as UI message stream frames.

pub mod routes;
pub mod server;
pub mod services;

mod assets;
mod error;

pub use error::{Result, WebError};
pub use server::{build_router, serve, start_server};
pub use services::{RelayService, RelayState};
