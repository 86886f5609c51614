//! Folder listing snapshot and the service that keeps it current.

mod list;
mod service;

pub use list::FolderList;
pub use service::FolderService;
