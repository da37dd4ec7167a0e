//! Federated wiki journal engines
//!
//! Two pure engines over the same action vocabulary:
//! - [`replay`] recomputes a story from any journal prefix (history views)
//! - [`apply_action`] mutates a live story as actions arrive (the server)
//!
//! Neither performs I/O, so both are safe to call concurrently.

pub mod apply;
pub mod replay;
mod story;

pub use apply::{apply_action, recognise, JournalError};
pub use replay::{replay, replay_step, Replay};
