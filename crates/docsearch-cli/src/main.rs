use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod commands;

#[derive(Parser)]
#[command(name = "docsearch")]
#[command(about = "Search documents in server-side folders", long_about = None)]
struct Cli {
    /// Config file (default: ~/.config/docsearch/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Search server URL, overriding the config file
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List folders and their files
    Folders,
    /// Create a folder
    CreateFolder { name: String },
    /// Delete a folder and every file in it
    DeleteFolder { folder_id: String },
    /// Delete one file from a folder
    DeleteFile {
        folder_id: String,
        /// Server-side name, as printed by `folders`
        server_name: String,
    },
    /// Upload local files into a folder
    Upload {
        folder_id: String,
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Run a table search over a folder (Ctrl-C cancels)
    Search(SearchArgs),
    /// Run IQA processing over every file in a folder
    Iqa(IqaArgs),
    /// Chat with a folder's documents (`/clear`, `/quit`; Ctrl-C cancels a pending reply)
    Chat { folder_id: String },
}

#[derive(Args)]
pub struct SearchArgs {
    pub folder_id: String,
    pub query: String,
    /// Rows per page: 10, 20, 50 or 100
    #[arg(long)]
    pub page_size: Option<usize>,
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    /// Column to sort by
    #[arg(long)]
    pub sort: Option<String>,
    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

#[derive(Args)]
pub struct IqaArgs {
    pub folder_id: String,
    /// Rows per page: 10, 20, 50 or 100
    #[arg(long)]
    pub page_size: Option<usize>,
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    /// Column to sort by
    #[arg(long)]
    pub sort: Option<String>,
    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let app = app::App::load(cli.config.as_deref(), cli.base_url.as_deref())?;

    match cli.command {
        Commands::Folders => commands::folders::list(&app).await?,
        Commands::CreateFolder { name } => commands::folders::create(&app, &name).await?,
        Commands::DeleteFolder { folder_id } => {
            commands::folders::delete_folder(&app, &folder_id).await?
        }
        Commands::DeleteFile {
            folder_id,
            server_name,
        } => commands::folders::delete_file(&app, &folder_id, &server_name).await?,
        Commands::Upload { folder_id, paths } => {
            commands::folders::upload(&app, &folder_id, &paths).await?
        }
        Commands::Search(args) => commands::search::run(&app, args).await?,
        Commands::Iqa(args) => commands::iqa::run(&app, args).await?,
        Commands::Chat { folder_id } => commands::chat::run(&app, &folder_id).await?,
    }

    Ok(())
}
