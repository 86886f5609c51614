use super::response::{
    parse_chat_response, parse_folders, parse_iqa_response, parse_table_response, parse_upload,
    server_error,
};
use async_trait::async_trait;
use docsearch_core::config::ServerConfig;
use docsearch_core::folder::{Folder, FolderCatalog, IqaRequest};
use docsearch_core::search::{
    ChatSearchRequest, SearchBackend, SearchResponse, TableSearchRequest,
};
use docsearch_core::{DocsearchError, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// HTTP client for the document search server.
///
/// Implements both [`SearchBackend`] and [`FolderCatalog`] over one
/// connection pool. Dropping an in-flight call aborts the request.
#[derive(Clone)]
pub struct HttpSearchClient {
    client: Client,
    base_url: String,
}

impl HttpSearchClient {
    /// Creates a client for `config.base_url`, applying the optional
    /// request timeout.
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| DocsearchError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends `request` and returns the JSON body of a successful response.
    async fn send(&self, request: RequestBuilder) -> Result<Value> {
        let response = request.send().await.map_err(|err| {
            if err.is_timeout() {
                DocsearchError::transport(format!("request timed out: {}", err))
            } else {
                DocsearchError::transport(err.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let url = response.url().to_string();
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(
                "[HttpSearchClient] {} -> {}: {}",
                url,
                status,
                body_excerpt(&body)
            );
            return Err(server_error(status, &body));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| DocsearchError::malformed(format!("response is not JSON: {}", e)))
    }

    async fn file_part(path: &Path) -> Result<Part> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| DocsearchError::io(format!("Cannot read {}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime = mime_guess::from_path(path).first_or_octet_stream();

        Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime.essence_str())
            .map_err(|e| DocsearchError::transport(e.to_string()))
    }
}

/// First 120 characters of an error body.
fn body_excerpt(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(120)
        .map(|(i, _)| i)
        .unwrap_or(body.len());
    &body[..end]
}

#[async_trait]
impl SearchBackend for HttpSearchClient {
    async fn table_search(&self, request: &TableSearchRequest) -> Result<SearchResponse> {
        let body = self
            .send(self.client.post(self.endpoint("/search")).json(request))
            .await?;
        parse_table_response(body)
    }

    async fn chat_search(&self, request: &ChatSearchRequest) -> Result<SearchResponse> {
        let body = self
            .send(self.client.post(self.endpoint("/chat/search")).json(request))
            .await?;
        parse_chat_response(body)
    }
}

#[async_trait]
impl FolderCatalog for HttpSearchClient {
    async fn list_folders(&self) -> Result<Vec<Folder>> {
        let body = self.send(self.client.get(self.endpoint("/metadata"))).await?;
        parse_folders(body)
    }

    async fn create_folder(&self, name: &str) -> Result<Vec<Folder>> {
        let request = self
            .client
            .post(self.endpoint("/folders"))
            .form(&[("name", name)]);
        parse_folders(self.send(request).await?)
    }

    async fn delete_folder(&self, folder_id: &str) -> Result<Vec<Folder>> {
        let request = self
            .client
            .delete(self.endpoint(&format!("/folders/{}", folder_id)));
        parse_folders(self.send(request).await?)
    }

    async fn delete_file(&self, folder_id: &str, server_name: &str) -> Result<Vec<Folder>> {
        let request = self
            .client
            .delete(self.endpoint(&format!("/folders/{}/files", folder_id)))
            .query(&[("server_name", server_name)]);
        parse_folders(self.send(request).await?)
    }

    async fn upload_files(&self, folder_id: &str, paths: &[PathBuf]) -> Result<Vec<Folder>> {
        let mut form = Form::new();
        for path in paths {
            form = form.part("files", Self::file_part(path).await?);
        }

        let request = self
            .client
            .post(self.endpoint("/upload"))
            .query(&[("folder_id", folder_id)])
            .multipart(form);
        parse_upload(self.send(request).await?)
    }

    async fn process_iqa(&self, request: &IqaRequest) -> Result<Vec<Value>> {
        let body = self
            .send(self.client.post(self.endpoint("/iqa/process")).json(request))
            .await?;
        parse_iqa_response(body)
    }
}
