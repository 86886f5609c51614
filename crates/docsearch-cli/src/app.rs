use anyhow::{Context, Result};
use docsearch_application::{FolderList, FolderService, SearchCoordinator};
use docsearch_infrastructure::{ConfigService, HttpSearchClient};
use std::path::Path;
use std::sync::Arc;

/// Wired application services for one CLI invocation.
pub struct App {
    pub coordinator: SearchCoordinator,
    pub folders: FolderService,
}

impl App {
    pub fn load(config_path: Option<&Path>, base_url: Option<&str>) -> Result<Self> {
        let config_service = match config_path {
            Some(path) => ConfigService::with_path(path),
            None => ConfigService::new(),
        };
        let mut config = config_service
            .get_config()
            .context("Failed to load configuration")?;
        if let Some(url) = base_url {
            config.server.base_url = url.to_string();
        }
        tracing::debug!("[App] using server {}", config.server.base_url);

        let client = Arc::new(
            HttpSearchClient::new(&config.server).context("Failed to create HTTP client")?,
        );
        let folder_list = FolderList::new();
        let coordinator =
            SearchCoordinator::new(client.clone(), folder_list.clone(), config.search);
        let folders = FolderService::new(client, folder_list, coordinator.clone());

        Ok(Self {
            coordinator,
            folders,
        })
    }

    /// Loads the folder listing and checks that `folder_id` exists.
    pub async fn open_folder(&self, folder_id: &str) -> Result<()> {
        self.folders
            .refresh()
            .await
            .context("Failed to load folders")?;
        if self.folders.folders().get(folder_id).await.is_none() {
            anyhow::bail!("Folder not found: {}", folder_id);
        }
        Ok(())
    }
}
