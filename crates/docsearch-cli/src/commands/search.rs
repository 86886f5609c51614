use super::run_cancellable;
use crate::SearchArgs;
use crate::app::App;
use anyhow::Result;
use docsearch_application::SearchOutcome;
use docsearch_core::SearchMode;
use docsearch_core::search::{NO_RESULTS_TEXT, ResultView};
use docsearch_core::session::PageSize;

const MAX_CELL_WIDTH: usize = 40;

pub async fn run(app: &App, args: SearchArgs) -> Result<()> {
    app.open_folder(&args.folder_id).await?;
    let coordinator = &app.coordinator;
    let folder_id = args.folder_id.as_str();

    coordinator
        .set_query_text(folder_id, SearchMode::Table, args.query.as_str())
        .await;

    match run_cancellable(coordinator, folder_id, SearchMode::Table).await? {
        SearchOutcome::Completed { .. } => {}
        SearchOutcome::Failed { message } => anyhow::bail!("Search failed: {}", message),
        _ => {
            eprintln!("Search cancelled.");
            return Ok(());
        }
    }

    if let Some(size) = args.page_size {
        coordinator
            .set_page_size(folder_id, PageSize::try_from(size)?)
            .await;
    }
    if let Some(key) = &args.sort {
        coordinator.toggle_sort(folder_id, key).await;
        if args.desc {
            coordinator.toggle_sort(folder_id, key).await;
        }
    }
    coordinator.set_page(folder_id, args.page).await;

    print!("{}", render_table(&coordinator.view(folder_id).await));
    Ok(())
}

/// Renders one page of results as aligned text columns.
pub(crate) fn render_table(view: &ResultView) -> String {
    if view.total_rows == 0 {
        return format!("{}\n", NO_RESULTS_TEXT);
    }

    let cells: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|row| {
            view.columns
                .iter()
                .map(|column| truncate(&row.text(column).unwrap_or_default()))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = view
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, view.columns.iter().map(String::as_str), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, rule.iter().map(String::as_str), &widths);
    for row in &cells {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    out.push_str(&format!(
        "\nPage {} of {} ({} results)\n",
        view.current_page, view.total_pages, view.total_rows
    ));
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

fn truncate(text: &str) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= MAX_CELL_WIDTH {
        return flat;
    }
    let mut cut: String = flat.chars().take(MAX_CELL_WIDTH - 1).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsearch_core::search::ResultRow;
    use docsearch_core::session::Session;
    use serde_json::json;

    #[test]
    fn test_render_table_aligns_columns() {
        let mut session = Session::default();
        session.commit_rows(ResultRow::normalize_all(vec![
            json!({"file": "lease.pdf", "page": 3}),
            json!({"file": "a.pdf", "page": 12}),
        ]));

        let rendered = render_table(&ResultView::from_session(&session));
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "file       page");
        assert_eq!(lines[1], "---------  ----");
        assert_eq!(lines[2], "lease.pdf  3");
        assert_eq!(lines[3], "a.pdf      12");
        assert_eq!(lines[5], "Page 1 of 1 (2 results)");
    }

    #[test]
    fn test_render_empty_view() {
        let view = ResultView::from_session(&Session::default());
        assert_eq!(render_table(&view), "No results found.\n");
    }

    #[test]
    fn test_truncate_long_cells() {
        let long = "x".repeat(100);
        assert_eq!(truncate(&long).chars().count(), MAX_CELL_WIDTH);
        assert_eq!(truncate("a\nb"), "a b");
    }
}
