//! Normalized result rows.
//!
//! Servers return heterogeneous lists. Each element is resolved once, at
//! normalization time, into one of three row shapes so that rendering and
//! sorting never need to re-inspect raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Synthetic 1-based position added to wrapped elements. Never shown as a column.
pub const INDEX_FIELD: &str = "_index";
pub const VALUE_FIELD: &str = "value";
pub const ANSWER_FIELD: &str = "answer";

pub type Record = Map<String, Value>;

/// A single normalized result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "fields", rename_all = "snake_case")]
pub enum ResultRow {
    /// A bare value, either wrapped from a non-object element or an object
    /// carrying nothing but `value`.
    Simple(Record),
    /// An object carrying an `answer` field.
    Answer(Record),
    /// Any other object.
    Generic(Record),
}

impl ResultRow {
    /// Normalizes one element of a server result list.
    ///
    /// `position` is the element's 1-based position in the list.
    pub fn normalize(element: Value, position: usize) -> Self {
        match element {
            Value::Object(record) => Self::classify(record),
            other => {
                let mut record = Record::new();
                record.insert(VALUE_FIELD.to_string(), Value::String(stringify(&other)));
                record.insert(INDEX_FIELD.to_string(), Value::from(position));
                ResultRow::Simple(record)
            }
        }
    }

    /// Normalizes a whole result list, preserving order.
    pub fn normalize_all(elements: Vec<Value>) -> Vec<Self> {
        elements
            .into_iter()
            .enumerate()
            .map(|(i, element)| Self::normalize(element, i + 1))
            .collect()
    }

    fn classify(record: Record) -> Self {
        let only_value = record.contains_key(VALUE_FIELD)
            && record.keys().all(|k| k == VALUE_FIELD || k == INDEX_FIELD);
        if only_value {
            ResultRow::Simple(record)
        } else if record.contains_key(ANSWER_FIELD) {
            ResultRow::Answer(record)
        } else {
            ResultRow::Generic(record)
        }
    }

    pub fn fields(&self) -> &Record {
        match self {
            ResultRow::Simple(r) | ResultRow::Answer(r) | ResultRow::Generic(r) => r,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields().get(key)
    }

    /// Display text of `key`, if present.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).map(stringify)
    }

    pub fn is_simple(&self) -> bool {
        matches!(self, ResultRow::Simple(_))
    }

    pub fn is_answer(&self) -> bool {
        matches!(self, ResultRow::Answer(_))
    }
}

/// Renders a JSON value as plain text.
///
/// Strings are used verbatim, arrays are joined with commas, everything
/// else uses its JSON text.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}
