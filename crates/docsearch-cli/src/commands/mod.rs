pub mod chat;
pub mod folders;
pub mod iqa;
pub mod search;

use docsearch_application::{SearchCoordinator, SearchOutcome};
use docsearch_core::{SearchMode, ValidationError};

/// Runs one search, cancelling it through the toggle entry point on Ctrl-C.
pub async fn run_cancellable(
    coordinator: &SearchCoordinator,
    folder_id: &str,
    mode: SearchMode,
) -> Result<SearchOutcome, ValidationError> {
    let search = coordinator.run(folder_id, mode);
    tokio::pin!(search);

    tokio::select! {
        outcome = &mut search => outcome,
        _ = tokio::signal::ctrl_c() => {
            if coordinator.session(folder_id).await.is_searching(mode) {
                coordinator.run(folder_id, mode).await?;
            }
            search.await
        }
    }
}
