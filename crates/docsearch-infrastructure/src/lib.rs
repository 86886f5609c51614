//! Infrastructure adapters for docsearch: the HTTP client for the search
//! server, config file loading and platform paths.

pub mod config_service;
pub mod http;
pub mod paths;

pub use config_service::ConfigService;
pub use http::HttpSearchClient;
pub use paths::DocsearchPaths;
