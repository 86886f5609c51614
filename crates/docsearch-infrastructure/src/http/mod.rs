//! HTTP adapter for the document search server.

mod client;
pub mod response;

pub use client::HttpSearchClient;
