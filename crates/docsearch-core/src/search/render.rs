//! Plain-text rendering of result rows for the chat transcript.
//!
//! Used only when a chat response carries no `assistant_text`.

use super::result::{ANSWER_FIELD, INDEX_FIELD, ResultRow, VALUE_FIELD, stringify};
use serde_json::Value;

pub const NO_RESULTS_TEXT: &str = "No results found.";

const SOURCE_FIELDS: [&str; 3] = ["file", "source_file", "files"];

/// Renders `rows` deterministically as chat text.
///
/// - all rows simple: a bullet list of values
/// - any row carries an answer: the answers, then the matched source files
/// - otherwise, or when those answers are all blank with no sources:
///   numbered blocks of `key: value` lines
pub fn render_rows(rows: &[ResultRow]) -> String {
    if rows.is_empty() {
        return NO_RESULTS_TEXT.to_string();
    }

    if rows.iter().all(ResultRow::is_simple) {
        return rows
            .iter()
            .map(|row| format!("- {}", row.text(VALUE_FIELD).unwrap_or_default()))
            .collect::<Vec<_>>()
            .join("\n");
    }

    if rows.iter().any(ResultRow::is_answer) {
        let text = render_answers(rows);
        if !text.is_empty() {
            return text;
        }
    }

    render_blocks(rows)
}

fn render_blocks(rows: &[ResultRow]) -> String {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let mut block = format!("{}.", i + 1);
            for (key, value) in row.fields() {
                if key == INDEX_FIELD {
                    continue;
                }
                block.push_str(&format!("\n   {}: {}", key, stringify(value)));
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_answers(rows: &[ResultRow]) -> String {
    let answers: Vec<String> = rows
        .iter()
        .filter_map(|row| row.text(ANSWER_FIELD))
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();

    let mut sources: Vec<String> = Vec::new();
    for row in rows {
        for field in SOURCE_FIELDS {
            match row.get(field) {
                Some(Value::Array(items)) => {
                    for item in items {
                        push_unique(&mut sources, stringify(item));
                    }
                }
                Some(Value::Null) | None => {}
                Some(other) => push_unique(&mut sources, stringify(other)),
            }
        }
    }

    let mut text = answers.join("\n\n");
    if !sources.is_empty() {
        text.push_str("\n\nSources:");
        for source in &sources {
            text.push_str(&format!("\n- {}", source));
        }
    }
    text
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !value.trim().is_empty() && !list.contains(&value) {
        list.push(value);
    }
}
