use super::store::SessionStore;
use docsearch_core::session::{ChatMessage, ChatRole};
use std::sync::Arc;

/// Chat transcript access on top of the session store.
///
/// The transcript is independent of the table result set: clearing one
/// never touches the other.
#[derive(Clone)]
pub struct TranscriptStore {
    sessions: Arc<SessionStore>,
}

impl TranscriptStore {
    pub fn new(sessions: Arc<SessionStore>) -> Self {
        Self { sessions }
    }

    /// Appends a message with a fresh id and the current timestamp.
    pub async fn append(
        &self,
        folder_id: &str,
        role: ChatRole,
        text: impl Into<String>,
    ) -> ChatMessage {
        let text = text.into();
        self.sessions
            .update_with(folder_id, |session| {
                session.chat_transcript.append(role, text).clone()
            })
            .await
    }

    pub async fn clear(&self, folder_id: &str) {
        self.sessions
            .update_with(folder_id, |session| session.chat_transcript.clear())
            .await;
        tracing::debug!("[TranscriptStore] cleared transcript for {}", folder_id);
    }

    pub async fn messages(&self, folder_id: &str) -> Vec<ChatMessage> {
        self.sessions
            .get(folder_id)
            .await
            .chat_transcript
            .messages()
            .to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsearch_core::search::ResultRow;
    use serde_json::json;

    #[tokio::test]
    async fn test_clear_leaves_rows_untouched() {
        let sessions = Arc::new(SessionStore::new());
        sessions
            .update_with("fld_1", |s| s.commit_rows(ResultRow::normalize_all(vec![json!("r")])))
            .await;

        let transcripts = TranscriptStore::new(sessions.clone());
        transcripts.append("fld_1", ChatRole::User, "hello").await;
        transcripts.append("fld_1", ChatRole::Assistant, "hi").await;
        assert_eq!(transcripts.messages("fld_1").await.len(), 2);

        transcripts.clear("fld_1").await;
        assert!(transcripts.messages("fld_1").await.is_empty());
        assert_eq!(sessions.get("fld_1").await.rows.len(), 1);
    }

    #[tokio::test]
    async fn test_append_never_deduplicates() {
        let transcripts = TranscriptStore::new(Arc::new(SessionStore::new()));
        let first = transcripts.append("fld_1", ChatRole::User, "same").await;
        let second = transcripts.append("fld_1", ChatRole::User, "same").await;

        assert_ne!(first.id, second.id);
        let texts: Vec<String> = transcripts
            .messages("fld_1")
            .await
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, vec!["same", "same"]);
    }
}
