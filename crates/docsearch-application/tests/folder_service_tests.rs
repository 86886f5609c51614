mod common;

use async_trait::async_trait;
use common::{Harness, folder_with_files};
use docsearch_application::FolderService;
use docsearch_core::folder::{Folder, FolderCatalog, IqaRequest, MAX_FOLDER_NAME_LEN};
use docsearch_core::search::ResultView;
use docsearch_core::session::{PageSize, SortConfig, SortDirection};
use docsearch_core::{DocsearchError, Result, Scope, SearchMode, ValidationError};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Catalog that keeps folders in memory and counts server round trips.
#[derive(Default)]
struct MemoryCatalog {
    folders: Mutex<Vec<Folder>>,
    calls: AtomicUsize,
    iqa_requests: Mutex<Vec<IqaRequest>>,
}

impl MemoryCatalog {
    fn seeded(folders: Vec<Folder>) -> Self {
        Self {
            folders: Mutex::new(folders),
            ..Default::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn listing(&self) -> Vec<Folder> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.folders.lock().await.clone()
    }
}

#[async_trait]
impl FolderCatalog for MemoryCatalog {
    async fn list_folders(&self) -> Result<Vec<Folder>> {
        Ok(self.listing().await)
    }

    async fn create_folder(&self, name: &str) -> Result<Vec<Folder>> {
        {
            let mut folders = self.folders.lock().await;
            let id = format!("fld_{}", folders.len());
            folders.push(Folder::new(id, name));
        }
        Ok(self.listing().await)
    }

    async fn delete_folder(&self, folder_id: &str) -> Result<Vec<Folder>> {
        {
            let mut folders = self.folders.lock().await;
            let before = folders.len();
            folders.retain(|f| f.id != folder_id);
            if folders.len() == before {
                return Err(DocsearchError::server(404, "Folder not found"));
            }
        }
        Ok(self.listing().await)
    }

    async fn delete_file(&self, folder_id: &str, server_name: &str) -> Result<Vec<Folder>> {
        {
            let mut folders = self.folders.lock().await;
            if let Some(folder) = folders.iter_mut().find(|f| f.id == folder_id) {
                folder.files.retain(|f| f.server_name != server_name);
            }
        }
        Ok(self.listing().await)
    }

    async fn upload_files(&self, folder_id: &str, paths: &[PathBuf]) -> Result<Vec<Folder>> {
        {
            let mut folders = self.folders.lock().await;
            let folder = folders
                .iter_mut()
                .find(|f| f.id == folder_id)
                .ok_or_else(|| DocsearchError::server(404, "Folder not found"))?;
            let names = folder
                .server_names()
                .into_iter()
                .chain(paths.iter().map(|p| {
                    format!("{}/{}", folder_id, p.file_name().unwrap().to_string_lossy())
                }));
            *folder = Folder::new(folder.id.clone(), folder.name.clone()).with_files(names);
        }
        Ok(self.listing().await)
    }

    async fn process_iqa(&self, request: &IqaRequest) -> Result<Vec<Value>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.iqa_requests.lock().await.push(request.clone());
        Ok(request
            .files
            .iter()
            .enumerate()
            .map(|(i, file)| {
                json!({
                    "rowId": i + 1,
                    "folderId": request.folder_id,
                    "file": file,
                    "status": "Processed",
                    "confidence": 0.78 + (i as f64) * 0.02,
                })
            })
            .collect())
    }
}

async fn setup(folders: Vec<Folder>) -> (Harness, Arc<MemoryCatalog>, FolderService) {
    let harness = Harness::new(folders.clone()).await;
    let catalog = Arc::new(MemoryCatalog::seeded(folders));
    let service = FolderService::new(
        catalog.clone(),
        harness.folders.clone(),
        harness.coordinator.clone(),
    );
    (harness, catalog, service)
}

#[tokio::test]
async fn test_create_folder_adds_session() {
    let (h, catalog, service) = setup(vec![Folder::new("root", "Root")]).await;

    let folders = service.create_folder("  Contracts ").await.unwrap();
    assert_eq!(folders.len(), 2);
    assert_eq!(folders[1].name, "Contracts");
    assert_eq!(catalog.calls(), 1);

    assert_eq!(
        h.coordinator.sessions().folder_ids().await,
        vec!["fld_1", "root"]
    );
    assert_eq!(service.folders().ids().await, vec!["root", "fld_1"]);
}

#[tokio::test]
async fn test_invalid_folder_names_never_reach_server() {
    let (_h, catalog, service) = setup(vec![Folder::new("fld_1", "Reports")]).await;

    let err = service.create_folder("a/b").await.unwrap_err();
    assert!(err.is_validation());

    let err = service.create_folder("reports").await.unwrap_err();
    assert!(matches!(
        err,
        DocsearchError::Validation(ValidationError::DuplicateFolderName(_))
    ));

    let long = "x".repeat(MAX_FOLDER_NAME_LEN + 1);
    assert!(service.create_folder(&long).await.is_err());
    assert_eq!(catalog.calls(), 0);
}

#[tokio::test]
async fn test_root_folder_cannot_be_deleted() {
    let (_h, catalog, service) = setup(vec![Folder::new("root", "Root")]).await;

    let err = service.delete_folder("root").await.unwrap_err();
    assert!(matches!(
        err,
        DocsearchError::Validation(ValidationError::RootFolderProtected)
    ));
    assert_eq!(catalog.calls(), 0);
}

#[tokio::test]
async fn test_delete_folder_cancels_in_flight_search() {
    let (mut h, _catalog, service) = setup(vec![
        folder_with_files("fld_a", &["a.pdf"]),
        folder_with_files("fld_b", &["b.pdf"]),
    ])
    .await;

    let task = h.spawn_search("fld_b", SearchMode::Table, "q").await;
    let call = h.next_call().await;

    service.delete_folder("fld_b").await.unwrap();

    assert_eq!(
        task.await.unwrap(),
        Ok(docsearch_application::SearchOutcome::Superseded)
    );
    drop(call);
    assert_eq!(h.coordinator.sessions().folder_ids().await, vec!["fld_a"]);
    assert_eq!(h.coordinator.epochs().current(&Scope::table("fld_b")), None);
}

#[tokio::test]
async fn test_delete_file_updates_request_files() {
    let (mut h, _catalog, service) =
        setup(vec![folder_with_files("fld_a", &["a.pdf", "b.pdf"])]).await;

    service.delete_file("fld_a", "fld_a/a.pdf").await.unwrap();

    let task = h.spawn_search("fld_a", SearchMode::Table, "q").await;
    let call = h.next_call().await;
    assert_eq!(call.sent.files(), ["fld_a/b.pdf"]);
    call.rows(vec![]);
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_upload_checks_local_files_first() {
    let (_h, catalog, service) = setup(vec![Folder::new("fld_a", "A")]).await;
    let dir = tempfile::tempdir().unwrap();

    let err = service.upload_files("fld_a", &[]).await.unwrap_err();
    assert!(matches!(
        err,
        DocsearchError::Validation(ValidationError::NoFiles { .. })
    ));

    let missing = dir.path().join("missing.pdf");
    let err = service.upload_files("fld_a", &[missing]).await.unwrap_err();
    assert!(matches!(err, DocsearchError::Io { .. }));
    assert_eq!(catalog.calls(), 0);

    let report = dir.path().join("report.pdf");
    std::fs::write(&report, b"%PDF-1.4").unwrap();
    let folders = service.upload_files("fld_a", &[report]).await.unwrap();
    assert_eq!(folders[0].server_names(), vec!["fld_a/report.pdf"]);
    assert_eq!(
        service.folders().server_names("fld_a").await,
        vec!["fld_a/report.pdf"]
    );
}

#[tokio::test]
async fn test_refresh_replaces_listing() {
    let (h, catalog, service) = setup(vec![Folder::new("fld_a", "A")]).await;
    catalog
        .folders
        .lock()
        .await
        .push(Folder::new("fld_b", "B"));

    let folders = service.refresh().await.unwrap();
    assert_eq!(folders.len(), 2);
    assert!(h.coordinator.sessions().contains("fld_b").await);
}

// ============================================================================
// IQA processing
// ============================================================================

#[tokio::test]
async fn test_iqa_processes_current_listing() {
    let (_h, catalog, service) =
        setup(vec![folder_with_files("fld_1", &["a.pdf", "b.pdf", "c.pdf"])]).await;

    service.delete_file("fld_1", "fld_1/b.pdf").await.unwrap();
    let rows = service.process_iqa("fld_1").await.unwrap();

    let requests = catalog.iqa_requests.lock().await.clone();
    assert_eq!(
        requests,
        vec![IqaRequest {
            folder_id: "fld_1".into(),
            files: vec!["fld_1/a.pdf".into(), "fld_1/c.pdf".into()],
        }]
    );
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].text("file").as_deref(), Some("fld_1/c.pdf"));

    let view = ResultView::new(
        &rows,
        &SortConfig::by("confidence", SortDirection::Desc),
        1,
        PageSize::Ten,
    );
    assert_eq!(view.rows[0].text("file").as_deref(), Some("fld_1/c.pdf"));
    assert!(view.columns.contains(&"status".to_string()));
}

#[tokio::test]
async fn test_iqa_on_empty_folder_never_reaches_server() {
    let (_h, catalog, service) = setup(vec![Folder::new("fld_1", "Empty")]).await;

    let err = service.process_iqa("fld_1").await.unwrap_err();
    assert!(matches!(
        err,
        DocsearchError::Validation(ValidationError::NoFiles { .. })
    ));

    let err = service.process_iqa("unknown").await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(catalog.calls(), 0);
    assert!(catalog.iqa_requests.lock().await.is_empty());
}
