use serde::{Deserialize, Serialize};

/// Id of the folder every server starts with. It cannot be deleted.
pub const ROOT_FOLDER_ID: &str = "root";

/// A document uploaded into a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderFile {
    /// Server-relative path, e.g. `fld_1a2b/report_9f8e7d6c.pdf`
    pub server_name: String,
    pub original_name: String,
    #[serde(default)]
    pub size: u64,
    /// Companion normalized JSON produced on upload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_server_name: Option<String>,
}

/// A folder as listed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub files: Vec<FolderFile>,
}

/// Body of a folder processing (IQA) request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IqaRequest {
    pub folder_id: String,
    /// Server-side names of the files to process
    pub files: Vec<String>,
}

impl Folder {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            files: Vec::new(),
        }
    }

    pub fn with_files<I, S>(mut self, server_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for server_name in server_names {
            let server_name = server_name.into();
            let original_name = server_name
                .rsplit('/')
                .next()
                .unwrap_or(&server_name)
                .to_string();
            self.files.push(FolderFile {
                server_name,
                original_name,
                size: 0,
                normalized_server_name: None,
            });
        }
        self
    }

    /// Server-side names of every file in this folder, in listing order.
    pub fn server_names(&self) -> Vec<String> {
        self.files.iter().map(|f| f.server_name.clone()).collect()
    }
}
