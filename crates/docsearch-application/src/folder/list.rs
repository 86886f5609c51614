use docsearch_core::folder::Folder;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared snapshot of the server's folder listing.
///
/// Replaced wholesale by [`super::FolderService`] after every folder or file
/// change; read by the coordinator at request time.
#[derive(Clone, Default)]
pub struct FolderList {
    folders: Arc<RwLock<Vec<Folder>>>,
}

impl FolderList {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn replace(&self, folders: Vec<Folder>) {
        *self.folders.write().await = folders;
    }

    pub async fn snapshot(&self) -> Vec<Folder> {
        self.folders.read().await.clone()
    }

    pub async fn get(&self, folder_id: &str) -> Option<Folder> {
        self.folders
            .read()
            .await
            .iter()
            .find(|f| f.id == folder_id)
            .cloned()
    }

    pub async fn ids(&self) -> Vec<String> {
        self.folders.read().await.iter().map(|f| f.id.clone()).collect()
    }

    /// Server-side file names currently listed under `folder_id`.
    ///
    /// Empty when the folder is unknown.
    pub async fn server_names(&self, folder_id: &str) -> Vec<String> {
        self.folders
            .read()
            .await
            .iter()
            .find(|f| f.id == folder_id)
            .map(Folder::server_names)
            .unwrap_or_default()
    }
}
