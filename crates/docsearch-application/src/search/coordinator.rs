//! Search coordinator.
//!
//! Runs table and chat queries per scope. The same entry point doubles as
//! start and stop: calling it while its scope is searching cancels the
//! in-flight request instead of starting a new one. Responses are admitted
//! into the session store only if their epoch is still current.

use super::epoch::{EpochTicket, EpochTracker};
use crate::folder::FolderList;
use crate::session::{SessionStore, TranscriptStore};
use docsearch_core::config::SearchConfig;
use docsearch_core::search::{
    ChatSearchRequest, ChatTurn, ResultRow, ResultView, SearchBackend, SearchResponse,
    TableSearchRequest, render_rows,
};
use docsearch_core::session::{ChatRole, PageSize, Session, SessionPatch};
use docsearch_core::{DocsearchError, Result, Scope, SearchMode, ValidationError};
use std::sync::Arc;

/// Prefix of the assistant message that reports a failed chat search.
pub const FAILURE_PREFIX: &str = "Search failed: ";

/// How a call to a search entry point ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The call cancelled the scope's in-flight request. No request was made.
    Cancelled,
    /// The response was committed to the session.
    Completed { rows: usize },
    /// The request failed and the error was recorded on the session.
    Failed { message: String },
    /// The transport aborted the request. Nothing was recorded.
    Aborted,
    /// A newer request or a cancel made the response stale. Nothing was written.
    Superseded,
}

enum Start {
    Toggled,
    Dispatch {
        request: PendingRequest,
        ticket: EpochTicket,
    },
}

enum PendingRequest {
    Table(TableSearchRequest),
    Chat(ChatSearchRequest),
}

/// Orchestrates the request/response protocol for both search modes.
///
/// Cheap to clone; clones share all state.
#[derive(Clone)]
pub struct SearchCoordinator {
    sessions: Arc<SessionStore>,
    transcripts: TranscriptStore,
    epochs: Arc<EpochTracker>,
    folders: FolderList,
    backend: Arc<dyn SearchBackend>,
    config: SearchConfig,
}

impl SearchCoordinator {
    /// Creates a coordinator reading folder contents from `folders`.
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        folders: FolderList,
        config: SearchConfig,
    ) -> Self {
        let page_size = PageSize::try_from(config.default_page_size).unwrap_or_else(|_| {
            tracing::warn!(
                "[SearchCoordinator] unsupported default page size {}, using {}",
                config.default_page_size,
                PageSize::default().get()
            );
            PageSize::default()
        });
        let sessions = Arc::new(SessionStore::with_page_size(page_size));
        Self {
            transcripts: TranscriptStore::new(sessions.clone()),
            sessions,
            epochs: Arc::new(EpochTracker::new()),
            folders,
            backend,
            config,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn transcripts(&self) -> &TranscriptStore {
        &self.transcripts
    }

    pub fn epochs(&self) -> &EpochTracker {
        &self.epochs
    }

    // ============================================================================
    // Search entry points
    // ============================================================================

    /// Starts a table search for `folder_id`, or cancels the running one.
    pub async fn run_table_search(
        &self,
        folder_id: &str,
    ) -> std::result::Result<SearchOutcome, ValidationError> {
        self.run(folder_id, SearchMode::Table).await
    }

    /// Starts a chat search for `folder_id`, or cancels the running one.
    pub async fn run_chat_search(
        &self,
        folder_id: &str,
    ) -> std::result::Result<SearchOutcome, ValidationError> {
        self.run(folder_id, SearchMode::Chat).await
    }

    /// Runs the protocol for one scope.
    ///
    /// Validation errors are returned before any epoch is allocated. Every
    /// other outcome, failures included, is reported through
    /// [`SearchOutcome`] after it has been applied to the session.
    pub async fn run(
        &self,
        folder_id: &str,
        mode: SearchMode,
    ) -> std::result::Result<SearchOutcome, ValidationError> {
        let scope = Scope::new(folder_id, mode);
        let files = self.folders.server_names(folder_id).await;

        let start = self
            .sessions
            .update_with(folder_id, |session| self.start(session, &scope, files))
            .await;

        let (request, ticket) = match start {
            Ok(Start::Toggled) => {
                tracing::info!("[SearchCoordinator] {} cancelled by user", scope);
                return Ok(SearchOutcome::Cancelled);
            }
            Ok(Start::Dispatch { request, ticket }) => (request, ticket),
            Err(err) => {
                tracing::debug!("[SearchCoordinator] {} rejected: {}", scope, err);
                return Err(err);
            }
        };

        tracing::info!(
            "[SearchCoordinator] {} dispatching epoch {}",
            scope,
            ticket.epoch
        );

        let result = tokio::select! {
            biased;
            _ = ticket.token.cancelled() => Err(DocsearchError::Aborted),
            result = self.send(&request) => result,
        };

        Ok(self.settle(&scope, ticket.epoch, result).await)
    }

    /// Toggle check, validation, optimistic append and epoch allocation.
    ///
    /// Runs under the session write lock.
    fn start(
        &self,
        session: &mut Session,
        scope: &Scope,
        files: Vec<String>,
    ) -> std::result::Result<Start, ValidationError> {
        let mode = scope.mode;

        if session.is_searching(mode) {
            self.epochs.cancel(scope);
            session.set_searching(mode, false);
            return Ok(Start::Toggled);
        }

        let query = validate_query(session.query_text(mode), self.config.max_query_len)?;
        if files.is_empty() {
            return Err(ValidationError::NoFiles {
                folder_id: scope.folder_id.clone(),
            });
        }

        let request = match mode {
            SearchMode::Table => PendingRequest::Table(TableSearchRequest {
                query,
                folder_id: scope.folder_id.clone(),
                files,
            }),
            SearchMode::Chat => {
                session.chat_transcript.append(ChatRole::User, query.clone());
                session.query_chat.clear();
                PendingRequest::Chat(ChatSearchRequest {
                    query,
                    folder_id: scope.folder_id.clone(),
                    files,
                    messages: session.chat_transcript.iter().map(ChatTurn::from).collect(),
                })
            }
        };

        let ticket = self.epochs.begin(scope);
        session.set_searching(mode, true);
        session.error = None;

        Ok(Start::Dispatch { request, ticket })
    }

    async fn send(&self, request: &PendingRequest) -> Result<SearchResponse> {
        match request {
            PendingRequest::Table(body) => self.backend.table_search(body).await,
            PendingRequest::Chat(body) => self.backend.chat_search(body).await,
        }
    }

    /// Applies a settled response if, and only if, its epoch is still current.
    async fn settle(
        &self,
        scope: &Scope,
        epoch: u64,
        result: Result<SearchResponse>,
    ) -> SearchOutcome {
        let mode = scope.mode;
        let outcome = self
            .sessions
            .modify_existing(&scope.folder_id, |session| {
                if !self.epochs.is_current(scope, epoch) {
                    return SearchOutcome::Superseded;
                }

                let outcome = match result {
                    Ok(response) => commit(session, mode, response),
                    Err(err) if err.is_aborted() => SearchOutcome::Aborted,
                    Err(err) => {
                        let message = err.user_message();
                        tracing::warn!("[SearchCoordinator] {} failed: {}", scope, err);
                        session.error = Some(message.clone());
                        if mode == SearchMode::Chat {
                            let notice = format!("{FAILURE_PREFIX}{message}");
                            session.chat_transcript.append(ChatRole::Assistant, notice);
                        }
                        SearchOutcome::Failed { message }
                    }
                };

                session.set_searching(mode, false);
                outcome
            })
            .await
            .unwrap_or(SearchOutcome::Superseded);

        match &outcome {
            SearchOutcome::Superseded => {
                tracing::debug!("[SearchCoordinator] {} epoch {} is stale", scope, epoch)
            }
            SearchOutcome::Completed { rows } => {
                tracing::info!("[SearchCoordinator] {} committed {} rows", scope, rows)
            }
            _ => {}
        }
        outcome
    }

    // ============================================================================
    // Session operations
    // ============================================================================

    pub async fn session(&self, folder_id: &str) -> Session {
        self.sessions.get(folder_id).await
    }

    /// Materialized result table for `folder_id`.
    pub async fn view(&self, folder_id: &str) -> ResultView {
        ResultView::from_session(&self.sessions.get(folder_id).await)
    }

    pub async fn set_query_text(
        &self,
        folder_id: &str,
        mode: SearchMode,
        text: impl Into<String>,
    ) {
        self.sessions
            .update(folder_id, SessionPatch::query(mode, text))
            .await;
    }

    pub async fn toggle_sort(&self, folder_id: &str, key: &str) {
        self.sessions
            .update_with(folder_id, |session| session.toggle_sort(key))
            .await;
    }

    pub async fn set_page_size(&self, folder_id: &str, page_size: PageSize) {
        self.sessions
            .update_with(folder_id, |session| session.set_page_size(page_size))
            .await;
    }

    pub async fn set_page(&self, folder_id: &str, page: usize) {
        self.sessions
            .update_with(folder_id, |session| session.set_page(page))
            .await;
    }

    pub async fn clear_chat(&self, folder_id: &str) {
        self.transcripts.clear(folder_id).await;
    }

    /// Aligns sessions with the authoritative folder id set.
    ///
    /// Sessions of vanished folders are evicted and both of their scopes
    /// are cancelled and forgotten.
    pub async fn synchronize<I, S>(&self, folder_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let epochs = &self.epochs;
        self.sessions
            .synchronize(folder_ids, |folder_id| {
                for scope in Scope::all_for(folder_id) {
                    epochs.discard(&scope);
                }
            })
            .await;
    }
}

/// Trims `text` and checks it against the length limit.
pub fn validate_query(
    text: &str,
    max_len: usize,
) -> std::result::Result<String, ValidationError> {
    let query = text.trim();
    if query.is_empty() {
        return Err(ValidationError::EmptyQuery);
    }
    let len = query.chars().count();
    if len > max_len {
        return Err(ValidationError::QueryTooLong { len, max: max_len });
    }
    Ok(query.to_string())
}

fn commit(session: &mut Session, mode: SearchMode, response: SearchResponse) -> SearchOutcome {
    let SearchResponse {
        results,
        assistant_text,
    } = response;
    let rows = ResultRow::normalize_all(results);
    let count = rows.len();

    match mode {
        SearchMode::Table => session.commit_rows(rows),
        // Chat results surface only as the assistant turn; table rows stay untouched.
        SearchMode::Chat => {
            let text = assistant_text
                .filter(|text| !text.trim().is_empty())
                .unwrap_or_else(|| render_rows(&rows));
            session.chat_transcript.append(ChatRole::Assistant, text);
        }
    }

    SearchOutcome::Completed { rows: count }
}
