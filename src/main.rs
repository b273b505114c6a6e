use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use fineprint::commands::{self, ResultOptions};
use fineprint::state::AppState;

#[derive(Parser)]
#[command(name = "fineprint")]
#[command(about = "Scan food labels and explain their ingredients", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug, Default)]
struct ViewArgs {
    /// Only show ingredients whose name or category contains this text
    #[arg(long, short, default_value = "")]
    query: String,
    /// Only show ingredients in exactly this category
    #[arg(long, short)]
    category: Option<String>,
    /// Print the plain-text summary instead of the detailed view
    #[arg(long)]
    copy: bool,
    /// Share the summary
    #[arg(long, conflicts_with = "copy")]
    share: bool,
    /// Write copied or shared text to this file
    #[arg(long)]
    out: Option<PathBuf>,
}

impl From<ViewArgs> for ResultOptions {
    fn from(a: ViewArgs) -> Self {
        ResultOptions {
            query: a.query,
            category: a.category,
            copy: a.copy,
            share: a.share,
            out: a.out,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the analysis service is up (unauthenticated)
    Health,
    /// Upload a label photo and show the ingredient breakdown
    Scan {
        image: PathBuf,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Analyze a pasted, comma-separated ingredient list
    Analyze {
        text: String,
        /// Fall back to an offline demo result if the request fails
        #[arg(long)]
        demo: bool,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// List past scans, newest first
    History {
        #[arg(long, short, default_value = "")]
        query: String,
    },
    /// Profile, recent scans and most frequent ingredients
    Dashboard,
    /// Show or change the account profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    Show,
    Rename { name: String },
    /// Delete the profile and all scan history
    Delete {
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "fineprint=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let state = AppState::init()?;
    tracing::debug!(base_url = %state.config.api_base_url, "config loaded");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Health => commands::health::health(&state, &mut out).await?,
        Commands::Scan { image, view } => {
            commands::scan(&state, &image, &view.into(), &mut out).await?
        }
        Commands::Analyze { text, demo, view } => {
            commands::analyze(&state, &text, demo, &view.into(), &mut out).await?
        }
        Commands::History { query } => commands::history::history(&state, &query, &mut out).await?,
        Commands::Dashboard => commands::dashboard::dashboard(&state, &mut out).await?,
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::profile::show(&state, &mut out).await?,
            ProfileAction::Rename { name } => {
                commands::profile::rename(&state, &name, &mut out).await?
            }
            ProfileAction::Delete { yes } => {
                commands::profile::delete(&state, yes, &mut out).await?
            }
        },
    }
    out.flush()?;
    Ok(())
}
