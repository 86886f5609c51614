//! Search wire models.

use crate::session::{ChatMessage, ChatRole};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a table search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSearchRequest {
    pub query: String,
    pub folder_id: String,
    /// Server-side names of every file currently listed under the folder
    pub files: Vec<String>,
}

/// One transcript entry as sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl From<&ChatMessage> for ChatTurn {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role,
            content: message.text.clone(),
        }
    }
}

/// Body of a chat search request: a table request plus the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSearchRequest {
    pub query: String,
    pub folder_id: String,
    pub files: Vec<String>,
    pub messages: Vec<ChatTurn>,
}

/// A settled search response, before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResponse {
    /// Raw elements of the `LLMRESPONSE` list
    pub results: Vec<Value>,
    /// Direct answer text (chat only)
    pub assistant_text: Option<String>,
}

impl SearchResponse {
    pub fn rows(results: Vec<Value>) -> Self {
        Self {
            results,
            assistant_text: None,
        }
    }

    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            results: Vec::new(),
            assistant_text: Some(text.into()),
        }
    }
}
