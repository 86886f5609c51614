use super::search::render_table;
use crate::IqaArgs;
use crate::app::App;
use anyhow::{Context, Result};
use docsearch_core::search::ResultView;
use docsearch_core::session::{PageSize, SortConfig, SortDirection};

pub async fn run(app: &App, args: IqaArgs) -> Result<()> {
    app.open_folder(&args.folder_id).await?;

    let rows = app
        .folders
        .process_iqa(&args.folder_id)
        .await
        .with_context(|| format!("IQA processing failed for {}", args.folder_id))?;

    let page_size = match args.page_size {
        Some(size) => PageSize::try_from(size)?,
        None => PageSize::default(),
    };
    let sort = sort_config(args.sort.as_deref(), args.desc);

    print!(
        "{}",
        render_table(&ResultView::new(&rows, &sort, args.page, page_size))
    );
    Ok(())
}

fn sort_config(key: Option<&str>, desc: bool) -> SortConfig {
    match key {
        Some(key) if desc => SortConfig::by(key, SortDirection::Desc),
        Some(key) => SortConfig::by(key, SortDirection::Asc),
        None => SortConfig::default(),
    }
}
