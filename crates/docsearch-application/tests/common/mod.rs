#![allow(dead_code)]

use async_trait::async_trait;
use docsearch_application::{FolderList, SearchCoordinator, SearchOutcome};
use docsearch_core::config::SearchConfig;
use docsearch_core::folder::Folder;
use docsearch_core::search::{ChatSearchRequest, SearchBackend, SearchResponse, TableSearchRequest};
use docsearch_core::{DocsearchError, Result, SearchMode, ValidationError};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// A request the coordinator sent to the backend.
#[derive(Debug, Clone)]
pub enum Sent {
    Table(TableSearchRequest),
    Chat(ChatSearchRequest),
}

impl Sent {
    pub fn files(&self) -> &[String] {
        match self {
            Sent::Table(r) => &r.files,
            Sent::Chat(r) => &r.files,
        }
    }

    pub fn folder_id(&self) -> &str {
        match self {
            Sent::Table(r) => &r.folder_id,
            Sent::Chat(r) => &r.folder_id,
        }
    }

    pub fn chat(&self) -> &ChatSearchRequest {
        match self {
            Sent::Chat(r) => r,
            Sent::Table(_) => panic!("expected a chat request"),
        }
    }
}

/// One in-flight backend call, answered explicitly by the test.
pub struct PendingCall {
    pub sent: Sent,
    reply: oneshot::Sender<Result<SearchResponse>>,
}

impl PendingCall {
    /// Settles the call. Returns false if the coordinator already dropped it.
    pub fn respond(self, result: Result<SearchResponse>) -> bool {
        self.reply.send(result).is_ok()
    }

    pub fn rows(self, rows: Vec<serde_json::Value>) -> bool {
        self.respond(Ok(SearchResponse::rows(rows)))
    }
}

/// Backend whose every call blocks until the test answers it.
pub struct ScriptedBackend {
    calls: mpsc::UnboundedSender<PendingCall>,
}

impl ScriptedBackend {
    async fn call(&self, sent: Sent) -> Result<SearchResponse> {
        let (reply, answer) = oneshot::channel();
        self.calls
            .send(PendingCall { sent, reply })
            .map_err(|_| DocsearchError::transport("test harness dropped"))?;
        // a dropped reply means the test never answered; treat as aborted
        answer.await.unwrap_or(Err(DocsearchError::Aborted))
    }
}

#[async_trait]
impl SearchBackend for ScriptedBackend {
    async fn table_search(&self, request: &TableSearchRequest) -> Result<SearchResponse> {
        self.call(Sent::Table(request.clone())).await
    }

    async fn chat_search(&self, request: &ChatSearchRequest) -> Result<SearchResponse> {
        self.call(Sent::Chat(request.clone())).await
    }
}

pub struct Harness {
    pub coordinator: SearchCoordinator,
    pub folders: FolderList,
    pub calls: mpsc::UnboundedReceiver<PendingCall>,
}

pub type SearchTask = JoinHandle<std::result::Result<SearchOutcome, ValidationError>>;

impl Harness {
    pub async fn new(folders: Vec<Folder>) -> Self {
        Self::with_config(folders, SearchConfig::default()).await
    }

    pub async fn with_config(folders: Vec<Folder>, config: SearchConfig) -> Self {
        let (tx, calls) = mpsc::unbounded_channel();
        let list = FolderList::new();
        let ids: Vec<String> = folders.iter().map(|f| f.id.clone()).collect();
        list.replace(folders).await;

        let backend = std::sync::Arc::new(ScriptedBackend { calls: tx });
        let coordinator = SearchCoordinator::new(backend, list.clone(), config);
        coordinator.synchronize(ids).await;

        Self {
            coordinator,
            folders: list,
            calls,
        }
    }

    /// Sets the query text and spawns the entry point for `mode`.
    pub async fn spawn_search(&self, folder_id: &str, mode: SearchMode, query: &str) -> SearchTask {
        self.coordinator.set_query_text(folder_id, mode, query).await;
        self.spawn_toggle(folder_id, mode)
    }

    /// Spawns the entry point for `mode` without touching the query text.
    pub fn spawn_toggle(&self, folder_id: &str, mode: SearchMode) -> SearchTask {
        let coordinator = self.coordinator.clone();
        let folder_id = folder_id.to_string();
        tokio::spawn(async move { coordinator.run(&folder_id, mode).await })
    }

    /// Waits for the next backend call.
    pub async fn next_call(&mut self) -> PendingCall {
        self.calls.recv().await.expect("backend channel closed")
    }

    pub fn no_pending_call(&mut self) -> bool {
        self.calls.try_recv().is_err()
    }
}

pub fn folder_with_files(id: &str, files: &[&str]) -> Folder {
    Folder::new(id, id.to_uppercase()).with_files(files.iter().map(|f| format!("{id}/{f}")))
}
