//! Search scopes.
//!
//! A scope is the identity under which one independent search lifeline runs:
//! a folder paired with an interaction mode. Two scopes never share state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Interaction mode within a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// One-shot query rendered as a result table.
    Table,
    /// Multi-turn query that carries the transcript as context.
    Chat,
}

impl SearchMode {
    pub const ALL: [SearchMode; 2] = [SearchMode::Table, SearchMode::Chat];
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Table => write!(f, "table"),
            SearchMode::Chat => write!(f, "chat"),
        }
    }
}

/// `(folder_id, mode)` pair. Identity is structural equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub folder_id: String,
    pub mode: SearchMode,
}

impl Scope {
    pub fn new(folder_id: impl Into<String>, mode: SearchMode) -> Self {
        Self {
            folder_id: folder_id.into(),
            mode,
        }
    }

    pub fn table(folder_id: impl Into<String>) -> Self {
        Self::new(folder_id, SearchMode::Table)
    }

    pub fn chat(folder_id: impl Into<String>) -> Self {
        Self::new(folder_id, SearchMode::Chat)
    }

    /// Both scopes living under `folder_id`.
    pub fn all_for(folder_id: &str) -> [Scope; 2] {
        SearchMode::ALL.map(|mode| Scope::new(folder_id, mode))
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.folder_id, self.mode)
    }
}
