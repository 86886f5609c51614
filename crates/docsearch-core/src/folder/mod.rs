//! Folder domain module.
//!
//! Folders and their files are owned by the server. The client only keeps
//! a snapshot of the listing and mirrors the server's validation rules.

mod catalog;
mod model;
mod validation;

pub use catalog::FolderCatalog;
pub use model::{Folder, FolderFile, IqaRequest, ROOT_FOLDER_ID};
pub use validation::{MAX_FOLDER_NAME_LEN, ensure_deletable, validate_folder_name, validate_upload};
