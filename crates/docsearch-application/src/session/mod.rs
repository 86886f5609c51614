//! Session application services.
//!
//! This module contains the in-memory session store and the chat
//! transcript view built on top of it.

mod store;
mod transcript;

pub use store::SessionStore;
pub use transcript::TranscriptStore;
