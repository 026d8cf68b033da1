//! aiyou - command-line client for AI.YOU assistants
//!
//! Main entry point for the aiyou CLI.

use std::path::{Path, PathBuf};

use aiyou_config::{DOTENV_FILE, DotEnv};
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;

mod commands;
mod transcript;

use commands::{chat, info, interactive};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// aiyou - chat with AI.YOU assistants from the terminal
#[derive(Parser)]
#[command(name = "aiyou")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Print only the response (errors are still reported)
    #[arg(short, long, global = true)]
    pub silent: bool,

    /// Assistant ID
    #[arg(short, long, global = true, env = "AIYOU_ASSISTANT_ID")]
    pub assistant: Option<String>,

    /// Extra instruction appended to the first message of a thread
    #[arg(short, long, global = true)]
    pub instruction: Option<String>,

    /// Read the instruction from a file (wins over --instruction)
    #[arg(short = 'f', long, global = true)]
    pub instruction_file: Option<PathBuf>,

    /// Print assistant details after login
    #[arg(long, global = true)]
    pub show_assistant_info: bool,

    /// API base URL (default: https://ai.dragonflygroup.fr/api)
    #[arg(long, global = true, env = "AIYOU_BASE_URL")]
    pub base_url: Option<String>,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send one message and print the reply
    Chat(chat::ChatArgs),

    /// Enter interactive chat mode (REPL)
    Interactive(interactive::InteractiveArgs),

    /// Show details about the configured assistant
    Info,

    /// Print the version
    Version,
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guard = init_tracing(cli.debug, cli.silent);
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "aiyou starting");

    if let Commands::Version = cli.command {
        println!("aiyou version {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let loaded = aiyou_config::load_settings(None, None);
    for warning in &loaded.warnings {
        tracing::warn!("{}", warning);
    }
    for path in loaded.loaded_from() {
        tracing::debug!(path = %path.display(), "Using settings");
    }

    let dotenv = DotEnv::load(Path::new(DOTENV_FILE)).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring unreadable .env file");
        DotEnv::default()
    });

    // Create context for commands
    let ctx = commands::Context {
        settings: loaded.settings,
        dotenv,
        assistant: cli.assistant,
        base_url: cli.base_url,
        instruction: cli.instruction,
        instruction_file: cli.instruction_file,
        show_assistant_info: cli.show_assistant_info,
        json_output: cli.json,
        silent: cli.silent,
    };

    // Dispatch to command handlers
    match cli.command {
        Commands::Chat(args) => chat::run(args, &ctx).await,
        Commands::Interactive(args) => interactive::run(args, &ctx).await,
        Commands::Info => info::run(&ctx).await,
        Commands::Version => Ok(()),
    }
}

/// Console (human-readable, stderr) plus a daily JSON log file.
///
/// The returned guard flushes the file writer and must live until exit.
fn init_tracing(debug: bool, silent: bool) -> Option<WorkerGuard> {
    use tracing_subscriber::prelude::*;

    let console_filter = if silent {
        "error"
    } else if debug {
        "aiyou=debug,aiyou_client=debug,aiyou_config=debug,info"
    } else {
        "aiyou=info,aiyou_client=info,aiyou_config=info,warn"
    };

    let (file_layer, guard) = match aiyou_config::config_dir() {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir.join("logs"), "aiyou.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "aiyou=debug,aiyou_client=debug,aiyou_config=debug,warn",
                ));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(debug)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(console_filter)),
        )
        .with(file_layer)
        .init();

    guard
}
