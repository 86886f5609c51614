//! Folder catalog trait definition.

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

use super::model::{Folder, IqaRequest};
use crate::error::Result;

/// Server-side folder and file management.
///
/// Every mutating call returns the complete, authoritative folder list as
/// it stands after the change.
#[async_trait]
pub trait FolderCatalog: Send + Sync {
    async fn list_folders(&self) -> Result<Vec<Folder>>;

    async fn create_folder(&self, name: &str) -> Result<Vec<Folder>>;

    async fn delete_folder(&self, folder_id: &str) -> Result<Vec<Folder>>;

    async fn delete_file(&self, folder_id: &str, server_name: &str) -> Result<Vec<Folder>>;

    /// Uploads local files into `folder_id`. A file whose original name
    /// already exists in the folder replaces the older copy.
    async fn upload_files(&self, folder_id: &str, paths: &[PathBuf]) -> Result<Vec<Folder>>;

    /// Runs IQA processing over the listed files and returns one raw row
    /// per processed file.
    async fn process_iqa(&self, request: &IqaRequest) -> Result<Vec<Value>>;
}
