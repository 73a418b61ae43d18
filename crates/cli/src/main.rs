//! carewise CLI — the main entry point.
//!
//! Commands:
//! - `onboard`  — Initialize config
//! - `status`   — Show effective configuration
//! - `doctor`   — Check config and gateway access
//! - `classify` — Rank the categories a question matches
//! - `prompt`   — Print the prompt envelope for a question
//! - `ask`      — Interactive or single-question mode
//! - `demo`     — Run the reference nighttime-confusion scenario offline

use clap::{Parser, Subcommand};

mod commands;

use commands::inputs::ContextArgs;

#[derive(Parser)]
#[command(
    name = "carewise",
    about = "carewise — context-aware answers for family caregivers",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Onboard,

    /// Show effective configuration
    Status,

    /// Check configuration and gateway access
    Doctor,

    /// Show which categories a question matches, highest importance first
    Classify {
        /// The question to classify
        question: String,
    },

    /// Print the prompt that would be sent for a question (no network)
    Prompt {
        /// The question
        question: String,

        #[command(flatten)]
        context: ContextArgs,

        /// JSON file with prior conversation turns
        #[arg(long)]
        history: Option<std::path::PathBuf>,
    },

    /// Ask a question, or chat interactively
    Ask {
        /// Ask a single question instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        #[command(flatten)]
        context: ContextArgs,

        /// Never call the model gateway; always answer from fallback
        #[arg(long)]
        offline: bool,
    },

    /// Walk through the reference nighttime-confusion scenario
    Demo {
        /// Ask for a comparison of approaches instead of a worked example
        #[arg(long)]
        strategy: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Status => commands::status::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
        Commands::Classify { question } => commands::classify::run(&question)?,
        Commands::Prompt {
            question,
            context,
            history,
        } => commands::prompt::run(&question, &context, history.as_deref())?,
        Commands::Ask {
            message,
            context,
            offline,
        } => commands::ask::run(message, &context, offline).await?,
        Commands::Demo { strategy } => commands::demo::run(strategy),
    }

    Ok(())
}
