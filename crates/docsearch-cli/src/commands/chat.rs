use super::run_cancellable;
use crate::app::App;
use anyhow::{Context, Result};
use docsearch_application::SearchOutcome;
use docsearch_core::SearchMode;
use docsearch_core::session::ChatRole;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

const PROMPT: &str = "> ";

/// Line-oriented chat over one folder. Ends on `/quit` or end of input.
pub async fn run(app: &App, folder_id: &str) -> Result<()> {
    app.open_folder(folder_id).await?;
    let coordinator = &app.coordinator;

    println!("Chatting with {}. /clear resets the conversation, /quit exits.", folder_id);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{}", PROMPT);
        std::io::stdout().flush().context("Failed to write prompt")?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            println!();
            break;
        };

        match line.trim() {
            "" => continue,
            "/quit" => break,
            "/clear" => {
                coordinator.clear_chat(folder_id).await;
                println!("Conversation cleared.");
                continue;
            }
            _ => {}
        }

        coordinator
            .set_query_text(folder_id, SearchMode::Chat, line)
            .await;

        match run_cancellable(coordinator, folder_id, SearchMode::Chat).await {
            Ok(SearchOutcome::Completed { .. }) | Ok(SearchOutcome::Failed { .. }) => {
                let session = coordinator.session(folder_id).await;
                if let Some(reply) = session
                    .chat_transcript
                    .last()
                    .filter(|m| m.role == ChatRole::Assistant)
                {
                    println!("{}\n", reply.text);
                }
            }
            Ok(_) => println!("(cancelled)\n"),
            Err(err) => eprintln!("{}", err),
        }
    }

    Ok(())
}
