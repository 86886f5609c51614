//! Application layer for the docsearch client.
//!
//! This crate coordinates the domain types from `docsearch-core` with a
//! search backend and folder catalog: per-folder session state, request
//! epochs, and the cancellable table/chat search protocol.

pub mod folder;
pub mod search;
pub mod session;

pub use folder::{FolderList, FolderService};
pub use search::{EpochTracker, FAILURE_PREFIX, SearchCoordinator, SearchOutcome};
pub use session::{SessionStore, TranscriptStore};
