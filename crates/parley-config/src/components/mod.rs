//! Configuration sections
//!
//! One module per consumer: the relay server, the generation backend, and the
//! chat client.

pub mod chat;
pub mod client;
pub mod defaults;
pub mod web;

pub use chat::*;
pub use client::*;
pub use web::*;
