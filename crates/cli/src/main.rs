//! DocChat CLI, the main entry point.
//!
//! Commands:
//! - `onboard`: create the default config file
//! - `chat`: chat about a document, interactively or one message at a time
//! - `status`: show the effective configuration
//! - `feedback`: leave or list feedback

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use docchat_core::Tone;

mod commands;

#[derive(Parser)]
#[command(
    name = "docchat",
    about = "DocChat — chat with your documents",
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
    /// Create ~/.docchat/config.toml with default settings
    Onboard,

    /// Chat with the model about an uploaded document
    Chat {
        /// Upload this file (PDF or plain text) before chatting
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Answer tone: Friendly, Formal, Professional, Casual, Empathetic, Humorous
        #[arg(short, long)]
        tone: Option<Tone>,

        /// Number of document chunks placed in each prompt
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Print the retrieved chunks before each answer
        #[arg(long)]
        show_context: bool,

        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Show the effective configuration
    Status,

    /// Leave feedback or list what has been left
    Feedback {
        #[command(subcommand)]
        action: FeedbackAction,
    },
}

#[derive(Subcommand)]
enum FeedbackAction {
    /// Append feedback to the log
    Add {
        /// Feedback text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Print every stored entry
    List,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Chat {
            file,
            tone,
            top_k,
            show_context,
            message,
        } => {
            let options = commands::chat::ChatOptions {
                file,
                tone,
                top_k,
                show_context,
            };
            commands::chat::run(options, message).await?
        }
        Commands::Status => commands::status::run().await?,
        Commands::Feedback { action } => match action {
            FeedbackAction::Add { text } => commands::feedback::add(&text.join(" ")).await?,
            FeedbackAction::List => commands::feedback::list().await?,
        },
    }

    Ok(())
}
