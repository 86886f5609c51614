//! Parsing of server response bodies.
//!
//! Bodies are read as [`serde_json::Value`] first so that a shape mismatch
//! can be reported as [`DocsearchError::Malformed`] with the offending field.

use docsearch_core::folder::Folder;
use docsearch_core::search::SearchResponse;
use docsearch_core::{DocsearchError, Result};
use reqwest::StatusCode;
use serde_json::Value;

const RESULTS_FIELD: &str = "LLMRESPONSE";
const ANSWER_FIELD: &str = "assistant_text";
const FOLDERS_FIELD: &str = "folders";
const IQA_FIELD: &str = "IQA_RESPONSE";

/// `{folders: [...]}` as returned by the listing and every folder mutation.
pub fn parse_folders(body: Value) -> Result<Vec<Folder>> {
    let folders = match body {
        Value::Object(mut map) => map.remove(FOLDERS_FIELD),
        _ => None,
    };
    match folders {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| {
                serde_json::from_value::<Folder>(item)
                    .map_err(|e| DocsearchError::malformed(format!("invalid folder entry: {}", e)))
            })
            .collect(),
        _ => Err(DocsearchError::malformed("`folders` is not a list")),
    }
}

/// `{ok, metadata: {folders: [...]}}` as returned by an upload.
pub fn parse_upload(body: Value) -> Result<Vec<Folder>> {
    match body {
        Value::Object(mut map) => match map.remove("metadata") {
            Some(metadata) => parse_folders(metadata),
            None => Err(DocsearchError::malformed("upload response has no `metadata`")),
        },
        _ => Err(DocsearchError::malformed("upload response is not an object")),
    }
}

/// Table response: `LLMRESPONSE` must be present and a list.
pub fn parse_table_response(body: Value) -> Result<SearchResponse> {
    match body {
        Value::Object(mut map) => match map.remove(RESULTS_FIELD) {
            Some(Value::Array(results)) => Ok(SearchResponse::rows(results)),
            _ => Err(DocsearchError::malformed(format!(
                "`{}` is not a list",
                RESULTS_FIELD
            ))),
        },
        _ => Err(DocsearchError::malformed("search response is not an object")),
    }
}

/// IQA response: `IQA_RESPONSE` must be present and a list.
pub fn parse_iqa_response(body: Value) -> Result<Vec<Value>> {
    match body {
        Value::Object(mut map) => match map.remove(IQA_FIELD) {
            Some(Value::Array(rows)) => Ok(rows),
            _ => Err(DocsearchError::malformed(format!("`{}` is not a list", IQA_FIELD))),
        },
        _ => Err(DocsearchError::malformed("IQA response is not an object")),
    }
}

/// Chat response: both fields are optional, but a present
/// `LLMRESPONSE` must still be a list.
pub fn parse_chat_response(body: Value) -> Result<SearchResponse> {
    let Value::Object(mut map) = body else {
        return Err(DocsearchError::malformed("chat response is not an object"));
    };

    let results = match map.remove(RESULTS_FIELD) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(results)) => results,
        Some(_) => {
            return Err(DocsearchError::malformed(format!(
                "`{}` is not a list",
                RESULTS_FIELD
            )));
        }
    };
    let assistant_text = match map.remove(ANSWER_FIELD) {
        Some(Value::String(text)) => Some(text),
        _ => None,
    };

    Ok(SearchResponse {
        results,
        assistant_text,
    })
}

/// Turns a non-success response into a [`DocsearchError::Server`].
///
/// The message is the `detail` field of a JSON error body, else the raw
/// body text, else the status reason phrase.
pub fn server_error(status: StatusCode, body: &str) -> DocsearchError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("detail").and_then(detail_text))
        .or_else(|| {
            let text = body.trim();
            (!text.is_empty()).then(|| text.to_string())
        })
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_default();

    DocsearchError::server(status.as_u16(), message)
}

fn detail_text(detail: &Value) -> Option<String> {
    match detail {
        Value::String(text) => Some(text.clone()),
        // request validation failures carry a list of {loc, msg, type}
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
