//! Result materializer: derives the visible table from committed rows.
//!
//! Everything here is a pure function of the session state, evaluated on read.

use super::result::{INDEX_FIELD, ResultRow, stringify};
use crate::session::{PageSize, Session, SortConfig, SortDirection};
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Union of all keys across `rows`, in first-seen order, minus bookkeeping fields.
pub fn columns(rows: &[ResultRow]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();
    for row in rows {
        for key in row.fields().keys() {
            if key == INDEX_FIELD {
                continue;
            }
            if seen.insert(key.as_str()) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

/// Returns `rows` sorted by `sort`. Stable; `key: None` preserves order.
pub fn sorted(rows: &[ResultRow], sort: &SortConfig) -> Vec<ResultRow> {
    let mut out = rows.to_vec();
    if let Some(key) = &sort.key {
        out.sort_by(|a, b| compare_field(a.get(key), b.get(key), sort.direction));
    }
    out
}

/// Compares two cell values.
///
/// Missing values (absent or `null`) sort last in either direction. Numeric
/// values rank ahead of text and compare numerically; text compares
/// lexicographically. Descending reverses that order, missing values aside.
pub fn compare_field(a: Option<&Value>, b: Option<&Value>, direction: SortDirection) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ordering = match (as_number(a), as_number(b)) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => stringify(a).cmp(&stringify(b)),
            };
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        }
    }
}

fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if !s.trim().is_empty() => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

pub fn total_pages(row_count: usize, page_size: PageSize) -> usize {
    row_count.div_ceil(page_size.get()).max(1)
}

/// Slice `[(page-1)*size, page*size)` of `rows`, empty when out of range.
pub fn page_slice(rows: &[ResultRow], page: usize, page_size: PageSize) -> &[ResultRow] {
    let size = page_size.get();
    let start = page.saturating_sub(1).saturating_mul(size);
    if start >= rows.len() {
        return &[];
    }
    let end = (start + size).min(rows.len());
    &rows[start..end]
}

/// What the rendering layer shows for a folder's result table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub columns: Vec<String>,
    pub rows: Vec<ResultRow>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_rows: usize,
}

impl ResultView {
    pub fn from_session(session: &Session) -> Self {
        Self::new(
            &session.rows,
            &session.sort,
            session.current_page,
            session.page_size,
        )
    }

    /// View of rows that live outside a session. `page` is clamped to
    /// `1..=total_pages`.
    pub fn new(rows: &[ResultRow], sort: &SortConfig, page: usize, page_size: PageSize) -> Self {
        let total_pages = total_pages(rows.len(), page_size);
        let current_page = page.clamp(1, total_pages);
        let sorted_rows = sorted(rows, sort);
        Self {
            columns: columns(rows),
            rows: page_slice(&sorted_rows, current_page, page_size).to_vec(),
            current_page,
            total_pages,
            total_rows: rows.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> ResultRow {
        ResultRow::normalize(value, 1)
    }

    fn values(rows: &[ResultRow], key: &str) -> Vec<Option<String>> {
        rows.iter().map(|r| r.text(key)).collect()
    }

    #[test]
    fn test_numeric_strings_sort_numerically() {
        let rows = vec![row(json!({"n": "2"})), row(json!({"n": "10"})), row(json!({"n": "1"}))];
        let out = sorted(&rows, &SortConfig::by("n", SortDirection::Asc));
        assert_eq!(
            values(&out, "n"),
            vec![Some("1".into()), Some("2".into()), Some("10".into())]
        );
    }

    #[test]
    fn test_missing_values_sort_last_in_both_directions() {
        let rows = vec![
            row(json!({"n": 1})),
            row(json!({"other": true})),
            row(json!({"n": null})),
            row(json!({"n": 3})),
        ];

        let asc = sorted(&rows, &SortConfig::by("n", SortDirection::Asc));
        assert_eq!(values(&asc, "n")[..2], [Some("1".into()), Some("3".into())]);

        let desc = sorted(&rows, &SortConfig::by("n", SortDirection::Desc));
        assert_eq!(values(&desc, "n")[..2], [Some("3".into()), Some("1".into())]);
        assert!(desc[2].get("n").is_none_or(Value::is_null));
        assert!(desc[3].get("n").is_none_or(Value::is_null));
    }

    #[test]
    fn test_numbers_rank_ahead_of_text() {
        let rows = vec![row(json!({"k": "beta"})), row(json!({"k": 5})), row(json!({"k": "alpha"}))];
        let out = sorted(&rows, &SortConfig::by("k", SortDirection::Asc));
        assert_eq!(
            values(&out, "k"),
            vec![Some("5".into()), Some("alpha".into()), Some("beta".into())]
        );
    }

    #[test]
    fn test_mixed_numeric_and_text_column_sorts_in_both_directions() {
        const POOL: [&str; 11] = ["2", "10", "1a", "9", "100", "1b", "3x", "20", "x", "05", "5"];

        for len in [20usize, 97, 250, 520] {
            let rows: Vec<ResultRow> = (0..len)
                .map(|i| {
                    if i % 13 == 7 {
                        row(json!({"other": i}))
                    } else {
                        row(json!({"k": POOL[(i * 7 + i / 3) % POOL.len()]}))
                    }
                })
                .collect();

            let asc = sorted(&rows, &SortConfig::by("k", SortDirection::Asc));
            let desc = sorted(&rows, &SortConfig::by("k", SortDirection::Desc));
            assert_eq!(asc.len(), len);
            assert_eq!(desc.len(), len);

            let rank = |row: &ResultRow| match row.get("k") {
                None => 2,
                Some(value) if as_number(value).is_some() => 0,
                Some(_) => 1,
            };
            let ranks: Vec<u8> = asc.iter().map(rank).collect();
            assert!(ranks.windows(2).all(|w| w[0] <= w[1]));

            let numbers: Vec<f64> = asc.iter().filter_map(|r| r.get("k").and_then(as_number)).collect();
            assert!(numbers.windows(2).all(|w| w[0] <= w[1]));
            let texts: Vec<String> = asc
                .iter()
                .filter(|r| rank(*r) == 1)
                .filter_map(|r| r.text("k"))
                .collect();
            assert!(texts.windows(2).all(|w| w[0] <= w[1]));

            let desc_ranks: Vec<u8> = desc.iter().map(rank).collect();
            assert!(desc_ranks.windows(2).all(|w| w[0] == w[1] || w[1] == 2 || (w[0] == 1 && w[1] == 0)));
            let desc_numbers: Vec<f64> =
                desc.iter().filter_map(|r| r.get("k").and_then(as_number)).collect();
            assert!(desc_numbers.windows(2).all(|w| w[0] >= w[1]));
            assert!(desc.iter().rev().take_while(|r| rank(*r) == 2).count() >= len / 13);
        }
    }

    #[test]
    fn test_no_sort_key_is_identity() {
        let rows = vec![row(json!({"n": 3})), row(json!({"n": 1}))];
        assert_eq!(sorted(&rows, &SortConfig::default()), rows);
    }

    #[test]
    fn test_columns_union_excludes_index() {
        let rows = vec![
            ResultRow::normalize(json!("plain"), 1),
            row(json!({"file": "a.pdf", "score": 1})),
            row(json!({"file": "b.pdf", "page": 2})),
        ];
        assert_eq!(columns(&rows), vec!["value", "file", "score", "page"]);
        assert!(rows[0].get(INDEX_FIELD).is_some());
    }

    #[test]
    fn test_pagination_bounds() {
        let rows: Vec<ResultRow> = (0..23).map(|i| ResultRow::normalize(json!(i), i + 1)).collect();

        assert_eq!(total_pages(0, PageSize::Ten), 1);
        assert_eq!(total_pages(23, PageSize::Ten), 3);
        assert_eq!(page_slice(&rows, 1, PageSize::Ten).len(), 10);
        assert_eq!(page_slice(&rows, 3, PageSize::Ten).len(), 3);
        assert!(page_slice(&rows, 4, PageSize::Ten).is_empty());
    }

    #[test]
    fn test_detached_view_clamps_page() {
        let rows: Vec<ResultRow> = (1..=5).map(|i| row(json!({"n": i}))).collect();

        let view = ResultView::new(&rows, &SortConfig::by("n", SortDirection::Desc), 9, PageSize::Ten);
        assert_eq!(view.current_page, 1);
        assert_eq!(view.total_pages, 1);
        assert_eq!(view.total_rows, 5);
        assert_eq!(view.rows[0].text("n").as_deref(), Some("5"));
    }

    #[test]
    fn test_view_sorts_before_paging() {
        let mut session = Session::default();
        session.commit_rows(
            (1..=12)
                .map(|i| ResultRow::normalize(json!({"n": i}), i))
                .collect(),
        );
        session.sort = SortConfig::by("n", SortDirection::Desc);
        session.set_page(2);

        let view = ResultView::from_session(&session);
        assert_eq!(view.total_pages, 2);
        assert_eq!(view.total_rows, 12);
        assert_eq!(values(&view.rows, "n"), vec![Some("2".into()), Some("1".into())]);
        assert_eq!(view.columns, vec!["n"]);
    }
}
