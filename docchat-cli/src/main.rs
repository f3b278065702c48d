//! docchat CLI: terminal client for a retrieval-augmented document chat service.
//!
//! Provides the interactive TUI, a line-oriented REPL, and one-shot commands.

mod commands;
mod repl;
mod slash;
mod tui;

use clap::Parser;
use docchat_core::config::{ConfigOverrides, load_config};
use docchat_core::{ChatWorkspace, SessionState};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// docchat: ask questions about your documents
#[derive(Parser, Debug)]
#[command(name = "docchat", version, about, long_about = None)]
struct Cli {
    /// Base URL of the RAG service (overrides config and DOCCHAT_API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Session id to join instead of generating a fresh one
    #[arg(short, long, global = true)]
    session: Option<String>,

    /// Workspace directory (for .docchat/config.toml)
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Disable TUI, use simple REPL
    #[arg(long)]
    no_tui: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Upload up to two documents and print the indexed metadata
    Upload {
        /// Files to upload (only the first two are sent)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Ask one question and print the answer
    Ask {
        /// The question
        question: String,
        /// Comma-separated document ids to restrict the search to
        #[arg(short, long)]
        documents: Option<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print where configuration files are read from
    Path,
    /// Write a default .docchat/config.toml in the workspace
    Init,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Resolve workspace
    let workspace_dir = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let overrides = ConfigOverrides {
        api_base: cli.api_base.clone(),
        timeout_secs: None,
        use_tui: cli.no_tui.then_some(false),
    };
    let config = load_config(Some(&workspace_dir), Some(&overrides))
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
    let use_tui = cli.command.is_none() && config.ui.use_tui;

    // Set up tracing: human-readable stderr + JSON file logging
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // Stderr output would tear the TUI, so it only runs in line modes.
    let stderr_layer = (!use_tui).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(EnvFilter::new(filter))
    });

    let log_dir = directories::ProjectDirs::from("dev", "docchat", "docchat")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "docchat.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    for warning in config.validate() {
        tracing::warn!("{warning}");
    }

    let state = match &cli.session {
        Some(id) => SessionState::with_session_id(id.trim()),
        None => SessionState::new(),
    };

    if let Some(command) = cli.command {
        return commands::handle_command(
            command,
            config,
            state,
            &workspace_dir,
            cli.session.is_some(),
        )
        .await;
    }

    let workspace = ChatWorkspace::connect(&config, state)?;
    if use_tui {
        tui::run(config, workspace).await
    } else {
        repl::run_interactive(config, workspace).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask_with_documents() {
        let cli = Cli::parse_from([
            "docchat",
            "--session",
            "s1",
            "ask",
            "what is it?",
            "--documents",
            "d1,d2",
        ]);
        assert_eq!(cli.session.as_deref(), Some("s1"));
        match cli.command {
            Some(Commands::Ask {
                question,
                documents,
            }) => {
                assert_eq!(question, "what is it?");
                assert_eq!(documents.as_deref(), Some("d1,d2"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_upload_requires_files() {
        assert!(Cli::try_parse_from(["docchat", "upload"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["docchat", "upload", "a.pdf", "--api-base", "http://x:9"]);
        assert_eq!(cli.api_base.as_deref(), Some("http://x:9"));
    }
}
