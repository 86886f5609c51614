//! Search backend trait definition.

use async_trait::async_trait;

use crate::error::Result;
use crate::search::{ChatSearchRequest, SearchResponse, TableSearchRequest};

/// The opaque search/ranking service behind the network boundary.
///
/// Implementations do not need to know about cancellation: the coordinator
/// drops the returned future when a request is cancelled or superseded.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Runs a table query.
    ///
    /// # Errors
    /// `Server` on a non-success status, `Malformed` when the result list is
    /// missing or not a list, `Transport` when the server cannot be reached.
    async fn table_search(&self, request: &TableSearchRequest) -> Result<SearchResponse>;

    /// Runs a chat query. A response with neither results nor answer text is
    /// valid and yields an empty [`SearchResponse`].
    async fn chat_search(&self, request: &ChatSearchRequest) -> Result<SearchResponse>;
}
