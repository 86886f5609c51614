use super::list::FolderList;
use crate::search::SearchCoordinator;
use docsearch_core::folder::{
    Folder, FolderCatalog, IqaRequest, ensure_deletable, validate_folder_name, validate_upload,
};
use docsearch_core::search::ResultRow;
use docsearch_core::{DocsearchError, Result, ValidationError};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Folder and file operations that keep the session store in step.
///
/// Every successful call replaces the shared [`FolderList`] with the
/// server's listing and synchronizes the coordinator's sessions with it.
pub struct FolderService {
    catalog: Arc<dyn FolderCatalog>,
    folders: FolderList,
    coordinator: SearchCoordinator,
}

impl FolderService {
    pub fn new(
        catalog: Arc<dyn FolderCatalog>,
        folders: FolderList,
        coordinator: SearchCoordinator,
    ) -> Self {
        Self {
            catalog,
            folders,
            coordinator,
        }
    }

    pub fn folders(&self) -> &FolderList {
        &self.folders
    }

    /// Reloads the listing from the server.
    pub async fn refresh(&self) -> Result<Vec<Folder>> {
        let folders = self.catalog.list_folders().await?;
        self.apply(folders).await
    }

    pub async fn create_folder(&self, name: &str) -> Result<Vec<Folder>> {
        let existing = self.folders.snapshot().await;
        let name = validate_folder_name(name, &existing)?;
        tracing::info!("[FolderService] creating folder '{}'", name);
        let folders = self.catalog.create_folder(&name).await?;
        self.apply(folders).await
    }

    pub async fn delete_folder(&self, folder_id: &str) -> Result<Vec<Folder>> {
        ensure_deletable(folder_id)?;
        tracing::info!("[FolderService] deleting folder {}", folder_id);
        let folders = self.catalog.delete_folder(folder_id).await?;
        self.apply(folders).await
    }

    pub async fn delete_file(&self, folder_id: &str, server_name: &str) -> Result<Vec<Folder>> {
        tracing::info!("[FolderService] deleting {} from {}", server_name, folder_id);
        let folders = self.catalog.delete_file(folder_id, server_name).await?;
        self.apply(folders).await
    }

    /// Uploads local files after checking the batch against upload limits.
    pub async fn upload_files(&self, folder_id: &str, paths: &[PathBuf]) -> Result<Vec<Folder>> {
        let mut sizes = Vec::with_capacity(paths.len());
        for path in paths {
            let metadata = tokio::fs::metadata(path).await.map_err(|e| {
                DocsearchError::io(format!("Cannot read {}: {}", path.display(), e))
            })?;
            sizes.push((file_label(path), metadata.len()));
        }
        validate_upload(
            folder_id,
            sizes.iter().map(|(name, size)| (name.as_str(), *size)),
        )?;

        tracing::info!(
            "[FolderService] uploading {} files into {}",
            paths.len(),
            folder_id
        );
        let folders = self.catalog.upload_files(folder_id, paths).await?;
        self.apply(folders).await
    }

    /// Runs IQA processing over every file currently listed under
    /// `folder_id`. The listing itself is left unchanged.
    pub async fn process_iqa(&self, folder_id: &str) -> Result<Vec<ResultRow>> {
        let files = self.folders.server_names(folder_id).await;
        if files.is_empty() {
            return Err(ValidationError::NoFiles {
                folder_id: folder_id.to_string(),
            }
            .into());
        }

        tracing::info!(
            "[FolderService] processing {} files in {}",
            files.len(),
            folder_id
        );
        let request = IqaRequest {
            folder_id: folder_id.to_string(),
            files,
        };
        let rows = self.catalog.process_iqa(&request).await?;
        Ok(ResultRow::normalize_all(rows))
    }

    async fn apply(&self, folders: Vec<Folder>) -> Result<Vec<Folder>> {
        let ids: Vec<String> = folders.iter().map(|f| f.id.clone()).collect();
        self.folders.replace(folders.clone()).await;
        self.coordinator.synchronize(ids).await;
        Ok(folders)
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
