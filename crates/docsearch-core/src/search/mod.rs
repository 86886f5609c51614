//! Search domain module.
//!
//! - `model`: request/response wire types
//! - `service`: the `SearchBackend` trait implemented by transports
//! - `result`: normalized result rows
//! - `materializer`: column derivation, sorting and pagination
//! - `render`: plain-text rendering of rows for chat replies

pub mod materializer;
pub mod model;
pub mod render;
pub mod result;
pub mod service;

pub use materializer::{ResultView, columns, page_slice, sorted, total_pages};
pub use model::{ChatSearchRequest, ChatTurn, SearchResponse, TableSearchRequest};
pub use render::{NO_RESULTS_TEXT, render_rows};
pub use result::{Record, ResultRow};
pub use service::SearchBackend;
