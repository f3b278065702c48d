//! REPL (Read-Eval-Print Loop) for line-oriented interactive use.

use crate::slash::{CommandRegistry, SlashCommand};
use docchat_core::config::DocChatConfig;
use docchat_core::view::{
    MessageView, TranscriptView, document_rows, indexed_count_label, transcript_view,
    upload_form_view,
};
use docchat_core::{ChatWorkspace, Completion, SessionState};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Format an assistant or user message for the terminal.
pub(crate) fn format_message(msg: &MessageView) -> String {
    let label = match msg.role {
        docchat_core::Role::User => "\x1b[1;34mYou:\x1b[0m",
        docchat_core::Role::Assistant => "\x1b[32mAssistant:\x1b[0m",
    };
    let mut out = format!("{label} {}", msg.content);
    if !msg.sources.is_empty() {
        out.push_str(&format!("\n  \x1b[90msources: {}\x1b[0m", msg.sources.join(", ")));
    }
    out
}

/// Print the indexed documents, the staged files and the filter.
pub(crate) fn print_documents(state: &SessionState) {
    let form = upload_form_view(state);
    match indexed_count_label(state) {
        Some(label) => println!("  {label}"),
        None => println!("  \x1b[90mNo documents indexed yet.\x1b[0m"),
    }
    for row in document_rows(state) {
        println!("  \x1b[90m{}\x1b[0m  {}", row.short_id, row.summary);
    }
    if !form.staged.is_empty() {
        println!("  Staged:");
        for file in &form.staged {
            println!("    {} ({})", file.name, file.size_label);
        }
    }
    let filter = state.document_filter.trim();
    if filter.is_empty() {
        println!("  Filter: \x1b[90mall documents\x1b[0m");
    } else {
        println!("  Filter: {filter}");
    }
}

fn print_upload_outcome(state: &SessionState) {
    match &state.upload_error {
        Some(error) => println!("\x1b[31m  {error}\x1b[0m"),
        None => {
            println!("\x1b[90m  Session: {}\x1b[0m", state.session_id);
            print_documents(state);
        }
    }
}

fn print_answer(state: &SessionState) {
    if let Some(error) = &state.chat_error {
        println!("\x1b[31m  {error}\x1b[0m");
        return;
    }
    if let TranscriptView::Messages(messages) = transcript_view(state) {
        if let Some(last) = messages.last() {
            println!("{}\n", format_message(last));
        }
    }
}

/// Stage files, reporting anything the user should know.
fn stage(workspace: &mut ChatWorkspace, config: &DocChatConfig, paths: &[PathBuf]) -> bool {
    match workspace.stage_paths(paths) {
        Ok(dropped) => {
            if dropped > 0 {
                println!(
                    "\x1b[33m  Only the first two files were staged; {dropped} ignored.\x1b[0m"
                );
            }
            for file in &workspace.state().selected_files {
                if !config.upload.accepts(&file.name) {
                    println!(
                        "\x1b[33m  {} may be rejected: expected {}\x1b[0m",
                        file.name,
                        config.upload.accepted_extensions.join(", ")
                    );
                }
            }
            true
        }
        Err(e) => {
            println!("\x1b[31m  {e}\x1b[0m");
            false
        }
    }
}

async fn upload(workspace: &mut ChatWorkspace) {
    println!("\x1b[90m  Uploading…\x1b[0m");
    match workspace.submit_upload().await {
        Ok(Completion::Applied) => print_upload_outcome(workspace.state()),
        Ok(Completion::Discarded) => {}
        Err(e) => println!("\x1b[31m  {e}\x1b[0m"),
    }
}

/// Run one slash command. Returns false when the REPL should exit.
async fn handle_command(
    command: SlashCommand,
    workspace: &mut ChatWorkspace,
    config: &DocChatConfig,
    registry: &CommandRegistry,
) -> bool {
    match command {
        SlashCommand::Upload(paths) => {
            if stage(workspace, config, &paths) {
                upload(workspace).await;
            }
        }
        SlashCommand::Stage(paths) => {
            if stage(workspace, config, &paths) {
                println!("  Staged {} file(s).", workspace.state().selected_files.len());
            }
        }
        SlashCommand::ClearFiles => {
            workspace.clear_selection();
            println!("  Selection cleared.");
        }
        SlashCommand::Docs => print_documents(workspace.state()),
        SlashCommand::Filter(text) => {
            if text.trim().is_empty() {
                println!("  Filter cleared; searching all documents.");
            } else {
                println!("  Filter set to {text}");
            }
            workspace.set_document_filter(text);
        }
        SlashCommand::Session(None) => println!("  Session: {}", workspace.state().session_id),
        SlashCommand::Session(Some(id)) => {
            workspace.set_session_id(id);
            println!("  Session: {}", workspace.state().session_id);
        }
        SlashCommand::New => {
            workspace.new_session();
            println!("  Started session {}", workspace.state().session_id);
        }
        SlashCommand::Help => println!("{}", registry.help_text()),
        SlashCommand::Quit => return false,
        SlashCommand::Usage(usage) => println!("  Usage: {usage}"),
        SlashCommand::Unknown { name, suggestion } => match suggestion {
            Some(s) => println!("  Unknown command {name}. Did you mean {s}?"),
            None => println!("  Unknown command {name}. Type /help for commands."),
        },
    }
    true
}

/// Run the interactive REPL.
pub async fn run_interactive(
    config: DocChatConfig,
    mut workspace: ChatWorkspace,
) -> anyhow::Result<()> {
    println!("\x1b[1;32m  docchat\x1b[0m");
    println!(
        "  Service: {} | Session: {}",
        config.api.base_url,
        workspace.state().session_id
    );
    println!("  Type /help for commands, /quit to exit\n");

    let registry = CommandRegistry::new();
    let stdin = io::stdin();
    loop {
        print!("\x1b[1;34m> \x1b[0m");
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if let Some(command) = registry.parse(input) {
            if !handle_command(command, &mut workspace, &config, &registry).await {
                break;
            }
            continue;
        }

        println!("\x1b[90m  Thinking…\x1b[0m");
        match workspace.submit_question(input).await {
            Ok(Some(Completion::Applied)) => print_answer(workspace.state()),
            Ok(_) => {}
            Err(e) => println!("\x1b[31m  {e}\x1b[0m"),
        }
    }

    println!("Goodbye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docchat_core::{ChatMessage, Citation, MockRagBackend, UploadResponse};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[test]
    fn test_format_message_with_sources() {
        let msg = ChatMessage::assistant("Paris").with_citations(vec![Citation {
            document_id: "d1".into(),
            source: "atlas.pdf".into(),
            chunk_index: 4,
            text_snippet: String::new(),
        }]);
        let text = format_message(&MessageView::from(&msg));
        assert!(text.contains("Assistant:"));
        assert!(text.contains("Paris"));
        assert!(text.contains("sources: atlas.pdf #4"));
    }

    #[tokio::test]
    async fn test_upload_command_stages_and_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        let c = dir.path().join("c.txt");
        for p in [&a, &b, &c] {
            std::fs::write(p, b"text").unwrap();
        }

        let mock = Arc::new(MockRagBackend::new());
        mock.push_upload(Ok(UploadResponse {
            session_id: "s9".into(),
            documents: Vec::new(),
        }));
        let mut ws = ChatWorkspace::new(mock.clone());
        let config = DocChatConfig::default();
        let registry = CommandRegistry::new();

        let keep_going = handle_command(
            SlashCommand::Upload(vec![a, b, c]),
            &mut ws,
            &config,
            &registry,
        )
        .await;
        assert!(keep_going);
        assert_eq!(mock.upload_requests()[0].files.len(), 2);
        assert_eq!(ws.state().session_id, "s9");
    }

    #[tokio::test]
    async fn test_quit_stops_loop() {
        let mut ws = ChatWorkspace::new(Arc::new(MockRagBackend::new()));
        let keep_going = handle_command(
            SlashCommand::Quit,
            &mut ws,
            &DocChatConfig::default(),
            &CommandRegistry::new(),
        )
        .await;
        assert!(!keep_going);
    }

    #[tokio::test]
    async fn test_new_session_command_resets() {
        let mut ws = ChatWorkspace::new(Arc::new(MockRagBackend::new()));
        ws.set_document_filter("d1");
        ws.set_session_id("old");
        handle_command(
            SlashCommand::New,
            &mut ws,
            &DocChatConfig::default(),
            &CommandRegistry::new(),
        )
        .await;
        assert_ne!(ws.state().session_id, "old");
        assert!(ws.state().document_filter.is_empty());
    }
}
