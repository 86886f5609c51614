//! Session domain module.
//!
//! - `model`: per-folder session state (`Session`, `SessionPatch`, sorting and paging types)
//! - `message`: chat transcript types (`ChatRole`, `ChatMessage`, `ChatTranscript`)

mod message;
mod model;

pub use message::{ChatMessage, ChatRole, ChatTranscript};
pub use model::{PageSize, Session, SessionPatch, SortConfig, SortDirection};
