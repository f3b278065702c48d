//! One-shot subcommand handlers.

use crate::repl::{format_message, print_documents};
use crate::{Commands, ConfigAction};
use anyhow::{Context, bail};
use docchat_core::config::{
    DocChatConfig, init_workspace_config, user_config_path, workspace_config_path,
};
use docchat_core::view::{TranscriptView, transcript_view};
use docchat_core::{ChatWorkspace, SessionState};
use std::path::{Path, PathBuf};

/// Dispatch a subcommand.
///
/// `config` never connects, so it still works with a broken `api.base_url`.
pub async fn handle_command(
    command: Commands,
    config: DocChatConfig,
    state: SessionState,
    workspace_dir: &Path,
    session_given: bool,
) -> anyhow::Result<()> {
    match command {
        Commands::Upload { files } => {
            let workspace = ChatWorkspace::connect(&config, state)?;
            handle_upload(&config, workspace, &files).await
        }
        Commands::Ask {
            question,
            documents,
        } => {
            let workspace = ChatWorkspace::connect(&config, state)?;
            handle_ask(workspace, &question, documents, session_given).await
        }
        Commands::Config { action } => handle_config(action, &config, workspace_dir),
    }
}

async fn handle_upload(
    config: &DocChatConfig,
    mut workspace: ChatWorkspace,
    files: &[PathBuf],
) -> anyhow::Result<()> {
    let dropped = workspace.stage_paths(files)?;
    if dropped > 0 {
        tracing::warn!(dropped, "only the first two files are uploaded");
    }
    for file in &workspace.state().selected_files {
        if !config.upload.accepts(&file.name) {
            tracing::warn!(file = %file.name, "extension not in upload.accepted_extensions");
        }
    }

    workspace.submit_upload().await?;
    let state = workspace.state();
    if let Some(error) = &state.upload_error {
        bail!("{error}");
    }
    println!("Session: {}", state.session_id);
    print_documents(state);
    Ok(())
}

async fn handle_ask(
    mut workspace: ChatWorkspace,
    question: &str,
    documents: Option<String>,
    session_given: bool,
) -> anyhow::Result<()> {
    if !session_given {
        tracing::warn!("no --session given; the question runs against a fresh, empty session");
    }
    if let Some(filter) = documents {
        workspace.set_document_filter(filter);
    }

    if workspace.submit_question(question).await?.is_none() {
        bail!("question is empty");
    }
    let state = workspace.state();
    if let Some(error) = &state.chat_error {
        bail!("{error}");
    }
    if let TranscriptView::Messages(messages) = transcript_view(state) {
        if let Some(answer) = messages.last() {
            println!("{}", format_message(answer));
        }
    }
    Ok(())
}

fn handle_config(
    action: ConfigAction,
    config: &DocChatConfig,
    workspace_dir: &Path,
) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(config).context("serializing config")?;
            println!("{toml_str}");
            for warning in config.validate() {
                println!("# warning: {warning}");
            }
            Ok(())
        }
        ConfigAction::Path => {
            match user_config_path() {
                Some(path) => println!("user:      {}", path.display()),
                None => println!("user:      (no home directory)"),
            }
            println!("workspace: {}", workspace_config_path(workspace_dir).display());
            Ok(())
        }
        ConfigAction::Init => {
            let path = init_workspace_config(workspace_dir)?;
            println!("Created default configuration at: {}", path.display());
            Ok(())
        }
    }
}
