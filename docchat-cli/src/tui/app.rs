//! Main TUI application: state, event loop, and top-level draw function.

use crate::slash::{CommandRegistry, SlashCommand};
use crate::tui::event::{Action, EventHandler, map_global_key};
use crate::tui::theme::Theme;
use crate::tui::widgets::conversation::{ConversationState, render_conversation};
use crate::tui::widgets::documents::{DocumentsPanelData, render_documents_panel};
use crate::tui::widgets::header::{HeaderData, render_header};
use crate::tui::widgets::help_overlay::render_help_overlay;
use crate::tui::widgets::input_area::{InputAction, InputWidget};
use crate::tui::widgets::status_bar::{Notice, render_status_bar};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use docchat_core::config::{DocChatConfig, UploadConfig};
use docchat_core::view::{
    document_rows, question_form_view, short_id, transcript_view, upload_form_view,
};
use docchat_core::{ChatWorkspace, Completion, FlowEvent, ValidationError};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::debug;

/// Narrowest terminal that still gets the documents panel.
const MIN_WIDTH_FOR_PANEL: u16 = 70;

/// The main TUI application state.
pub struct App {
    workspace: ChatWorkspace,
    api_base: String,
    upload_config: UploadConfig,
    commands: CommandRegistry,

    // UI state
    pub conversation: ConversationState,
    pub input: InputWidget,
    pub theme: Theme,
    pub notice: Option<Notice>,
    pub show_documents: bool,
    pub show_help: bool,
    pub should_quit: bool,

    // Completions of background uploads and queries
    flow_tx: mpsc::UnboundedSender<FlowEvent>,
    flow_rx: mpsc::UnboundedReceiver<FlowEvent>,
}

impl App {
    pub fn new(config: &DocChatConfig, workspace: ChatWorkspace) -> Self {
        let theme = Theme::from_name(&config.ui.theme);
        let (flow_tx, flow_rx) = mpsc::unbounded_channel();
        Self {
            workspace,
            api_base: config.api.base_url.clone(),
            upload_config: config.upload.clone(),
            commands: CommandRegistry::new(),
            conversation: ConversationState::new(),
            input: InputWidget::new(&theme),
            theme,
            notice: None,
            show_documents: true,
            show_help: false,
            should_quit: false,
            flow_tx,
            flow_rx,
        }
    }

    pub fn workspace(&self) -> &ChatWorkspace {
        &self.workspace
    }

    /// Run the main event loop.
    pub async fn run<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut ratatui::Terminal<B>,
    ) -> anyhow::Result<()> {
        let mut event_handler = EventHandler::new();
        let tick_rate = std::time::Duration::from_millis(250);

        loop {
            terminal.draw(|frame| self.draw(frame))?;

            tokio::select! {
                event = event_handler.next() => {
                    match event {
                        Some(event) => self.handle_terminal_event(event),
                        None => self.should_quit = true,
                    }
                }
                Some(event) = self.flow_rx.recv() => {
                    self.handle_flow_event(event);
                }
                // Tick keeps the busy indicator fresh while requests run
                _ = tokio::time::sleep(tick_rate) => {}
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Draw the full UI.
    pub fn draw(&self, frame: &mut Frame) {
        let state = self.workspace.state();

        let panel_visible = self.show_documents && frame.area().width >= MIN_WIDTH_FOR_PANEL;
        // The panel shows upload errors itself; otherwise they get a line of their own.
        let upload_error = state.upload_error.as_deref().filter(|_| !panel_visible);

        let [header_area, main_area, error_area, input_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(6),
            Constraint::Length(u16::from(upload_error.is_some())),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        render_header(
            frame,
            header_area,
            &HeaderData::from_state(&self.api_base, state),
            &self.theme,
        );

        let transcript = transcript_view(state);
        if panel_visible {
            let [conv_area, panel_area] =
                Layout::horizontal([Constraint::Percentage(66), Constraint::Percentage(34)])
                    .areas(main_area);
            render_conversation(frame, conv_area, &transcript, &self.conversation, &self.theme);
            let panel = DocumentsPanelData {
                form: upload_form_view(state),
                documents: document_rows(state),
                filter: state.document_filter.clone(),
            };
            render_documents_panel(frame, panel_area, &panel, &self.theme);
        } else {
            render_conversation(frame, main_area, &transcript, &self.conversation, &self.theme);
        }

        if let Some(error) = upload_error {
            let line = Line::from(Span::styled(
                format!(" Upload: {error}"),
                self.theme.error_style(),
            ));
            frame.render_widget(Paragraph::new(line), error_area);
        }

        let form = question_form_view(state);
        self.input.render(frame, input_area, &form, &self.theme);

        render_status_bar(
            frame,
            status_area,
            form.status,
            self.notice.as_ref(),
            state.is_loading || state.is_uploading,
            &self.theme,
        );

        if self.show_help {
            render_help_overlay(frame, frame.area(), &self.commands, &self.theme);
        }
    }

    /// Handle a terminal event (keyboard, paste, mouse, resize).
    fn handle_terminal_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key_event(key),
            Event::Paste(_) => self.forward_to_input(&event),
            Event::Mouse(mouse) => self.handle_mouse_event(mouse),
            _ => {}
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            if self.show_help {
                self.show_help = false;
            } else {
                self.notice = None;
            }
            return;
        }

        if let Some(action) = map_global_key(&key) {
            self.execute_action(action);
            return;
        }

        if self.show_help {
            return;
        }
        self.forward_to_input(&Event::Key(key));
    }

    fn forward_to_input(&mut self, event: &Event) {
        match self.input.handle_event(event) {
            InputAction::Submit(text) => self.submit(&text),
            InputAction::Edited => self.workspace.set_question_input(self.input.text()),
            InputAction::Consumed => {}
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.conversation.scroll_up(3),
            MouseEventKind::ScrollDown => self.conversation.scroll_down(3),
            _ => {}
        }
    }

    /// Execute a high-level action.
    fn execute_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::NewSession => self.new_session(),
            Action::UploadStaged => self.start_upload(),
            Action::ClearStaged => self.clear_staged(),
            Action::ScrollUp => self.conversation.scroll_up(1),
            Action::ScrollDown => self.conversation.scroll_down(1),
            Action::PageUp => self.conversation.scroll_up(10),
            Action::PageDown => self.conversation.scroll_down(10),
            Action::ScrollToBottom => self.conversation.scroll_to_bottom(),
            Action::ToggleDocuments => self.show_documents = !self.show_documents,
            Action::ToggleHelp => self.show_help = !self.show_help,
        }
    }

    /// Handle submitted input: a slash command or a question.
    pub fn submit(&mut self, text: &str) {
        if let Some(command) = self.commands.parse(text) {
            self.input.clear();
            self.workspace.set_question_input("");
            self.handle_command(command);
            return;
        }

        self.workspace.set_question_input(text);
        match self.workspace.begin_question() {
            Ok(Some(pending)) => {
                self.input.clear();
                self.notice = None;
                self.conversation.scroll_to_bottom();
                self.workspace.spawn_query(pending, self.flow_tx.clone());
            }
            Ok(None) => {}
            Err(ValidationError::RequestInFlight { .. }) => {
                self.notice = Some(Notice::warning("Still waiting for the previous answer."));
            }
            // Validation failures are already on the question form.
            Err(e) => debug!(error = %e, "question not sent"),
        }
    }

    /// Handle a parsed slash command.
    pub fn handle_command(&mut self, command: SlashCommand) {
        match command {
            SlashCommand::Upload(paths) => {
                if self.stage(paths) {
                    self.start_upload();
                }
            }
            SlashCommand::Stage(paths) => {
                self.stage(paths);
            }
            SlashCommand::ClearFiles => self.clear_staged(),
            SlashCommand::Docs => {
                self.show_documents = true;
                let state = self.workspace.state();
                let filter = if state.document_filter.trim().is_empty() {
                    "all documents".to_string()
                } else {
                    state.document_filter.clone()
                };
                self.notice = Some(Notice::info(format!(
                    "{} indexed; filter: {filter}",
                    state.documents.len()
                )));
            }
            SlashCommand::Filter(text) => {
                self.notice = Some(if text.trim().is_empty() {
                    Notice::info("Filter cleared; searching all documents.")
                } else {
                    Notice::info(format!("Filter set to {text}"))
                });
                self.workspace.set_document_filter(text);
            }
            SlashCommand::Session(None) => {
                let id = self.workspace.state().session_id.clone();
                self.notice = Some(Notice::info(format!("Session: {id}")));
            }
            SlashCommand::Session(Some(id)) => {
                self.notice = Some(Notice::info(format!("Session set to {id}")));
                self.workspace.set_session_id(id);
            }
            SlashCommand::New => self.new_session(),
            SlashCommand::Help => self.show_help = true,
            SlashCommand::Quit => self.should_quit = true,
            SlashCommand::Usage(usage) => {
                self.notice = Some(Notice::warning(format!("Usage: {usage}")));
            }
            SlashCommand::Unknown { name, suggestion } => {
                let text = match suggestion {
                    Some(s) => format!("Unknown command {name}. Did you mean {s}?"),
                    None => format!("Unknown command {name}. Type /help for commands."),
                };
                self.notice = Some(Notice::warning(text));
            }
        }
    }

    /// Stage files from disk. Returns false when nothing new was staged.
    fn stage(&mut self, paths: Vec<PathBuf>) -> bool {
        match self.workspace.stage_paths(&paths) {
            Ok(dropped) => {
                let state = self.workspace.state();
                let unsupported: Vec<&str> = state
                    .selected_files
                    .iter()
                    .filter(|f| !self.upload_config.accepts(&f.name))
                    .map(|f| f.name.as_str())
                    .collect();
                self.notice = Some(if dropped > 0 {
                    Notice::warning(format!(
                        "Only the first two files were staged; {dropped} ignored."
                    ))
                } else if !unsupported.is_empty() {
                    Notice::warning(format!(
                        "{} may be rejected: expected {}",
                        unsupported.join(", "),
                        self.upload_config.accepted_extensions.join(", ")
                    ))
                } else {
                    Notice::info(format!("Staged {} file(s).", state.selected_files.len()))
                });
                true
            }
            Err(e) => {
                self.notice = Some(Notice::warning(e.to_string()));
                false
            }
        }
    }

    fn start_upload(&mut self) {
        match self.workspace.begin_upload() {
            Ok(pending) => {
                self.notice = None;
                self.workspace.spawn_upload(pending, self.flow_tx.clone());
            }
            Err(ValidationError::RequestInFlight { .. }) => {
                self.notice = Some(Notice::warning("An upload is already running."));
            }
            Err(e) => debug!(error = %e, "upload not started"),
        }
    }

    fn clear_staged(&mut self) {
        if self.workspace.state().is_uploading {
            return;
        }
        self.workspace.clear_selection();
        self.notice = Some(Notice::info("Selection cleared."));
    }

    fn new_session(&mut self) {
        self.workspace.new_session();
        self.input.clear();
        self.conversation.scroll_to_bottom();
        let id = self.workspace.state().session_id.clone();
        self.notice = Some(Notice::info(format!("Started session {}", short_id(&id))));
    }

    /// Apply a finished background request.
    fn handle_flow_event(&mut self, event: FlowEvent) {
        let is_upload = matches!(event, FlowEvent::UploadFinished { .. });
        match self.workspace.apply(event) {
            Completion::Applied => {
                let state = self.workspace.state();
                if is_upload && state.upload_error.is_none() {
                    self.notice = Some(Notice::info(format!(
                        "Indexed into session {}",
                        short_id(&state.session_id)
                    )));
                }
            }
            Completion::Discarded => debug!("dropped completion from a previous session"),
        }
    }
}

#[cfg(test)]
impl App {
    /// Wait for one background completion and apply it.
    async fn pump_flow_event(&mut self) {
        if let Some(event) = self.flow_rx.recv().await {
            self.handle_flow_event(event);
        }
    }
}
