//! Domain layer for the docsearch client.
//!
//! Holds the scope and session models, the chat transcript, normalized
//! result rows with their materializer, and the traits behind which the
//! search server and folder catalog live.

pub mod config;
pub mod error;
pub mod folder;
pub mod scope;
pub mod search;
pub mod session;

// Re-export common types
pub use error::{DocsearchError, Result, ValidationError};
pub use scope::{Scope, SearchMode};
