//! Question input wrapping tui-textarea for multiline editing.

use crate::tui::theme::Theme;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use docchat_core::view::QuestionFormView;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders};
use tui_textarea::TextArea;

/// Input widget wrapping tui-textarea.
pub struct InputWidget {
    textarea: TextArea<'static>,
    history: Vec<String>,
    history_index: Option<usize>,
    draft: Option<String>,
}

/// Result of processing an input event.
#[derive(Debug, PartialEq, Eq)]
pub enum InputAction {
    /// Enter was pressed on non-blank text. The widget keeps its text; the
    /// caller clears it once the submission is accepted.
    Submit(String),
    /// The text changed.
    Edited,
    /// The key moved the cursor or did nothing visible.
    Consumed,
}

impl InputWidget {
    pub fn new(theme: &Theme) -> Self {
        let mut textarea = TextArea::default();
        textarea.set_cursor_line_style(Style::default());
        textarea.set_style(Style::default().fg(theme.fg).bg(theme.bg));
        textarea.set_placeholder_text("Ask something about your documents, or type /help");
        textarea.set_placeholder_style(theme.muted_style());

        Self {
            textarea,
            history: Vec::new(),
            history_index: None,
            draft: None,
        }
    }

    /// Get the current input text.
    pub fn text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.textarea.lines().iter().all(|l| l.is_empty())
    }

    /// Clear the input and reset history navigation state.
    pub fn clear(&mut self) {
        self.clear_textarea();
        self.history_index = None;
        self.draft = None;
    }

    fn clear_textarea(&mut self) {
        self.textarea.select_all();
        self.textarea.cut();
    }

    pub fn set_text(&mut self, text: &str) {
        self.clear_textarea();
        self.textarea.insert_str(text);
    }

    /// Insert pasted text at the cursor.
    pub fn insert(&mut self, text: &str) {
        self.textarea.insert_str(text);
    }

    /// Process a crossterm event. Returns the resulting action.
    pub fn handle_event(&mut self, event: &Event) -> InputAction {
        match event {
            Event::Key(KeyEvent {
                code: KeyCode::Enter,
                modifiers,
                ..
            }) => {
                if modifiers.contains(KeyModifiers::SHIFT) || modifiers.contains(KeyModifiers::ALT)
                {
                    self.textarea.insert_newline();
                    InputAction::Edited
                } else {
                    let text = self.text();
                    if text.trim().is_empty() {
                        return InputAction::Consumed;
                    }
                    self.add_to_history(&text);
                    InputAction::Submit(text)
                }
            }
            Event::Key(KeyEvent {
                code: KeyCode::Up,
                modifiers: KeyModifiers::NONE,
                ..
            }) if self.textarea.cursor().0 == 0 => {
                self.history_prev();
                InputAction::Edited
            }
            Event::Key(KeyEvent {
                code: KeyCode::Down,
                modifiers: KeyModifiers::NONE,
                ..
            }) if self.textarea.cursor().0 == self.textarea.lines().len().saturating_sub(1) => {
                self.history_next();
                InputAction::Edited
            }
            Event::Paste(text) => {
                self.insert(text);
                InputAction::Edited
            }
            _ => {
                if self.textarea.input(event.clone()) {
                    InputAction::Edited
                } else {
                    InputAction::Consumed
                }
            }
        }
    }

    fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        match self.history_index {
            None => {
                self.draft = Some(self.text());
                self.history_index = Some(self.history.len() - 1);
            }
            Some(0) => return,
            Some(ref mut idx) => *idx -= 1,
        }
        if let Some(idx) = self.history_index {
            let text = self.history[idx].clone();
            self.set_text(&text);
        }
    }

    fn history_next(&mut self) {
        match self.history_index {
            None => {}
            Some(idx) if idx + 1 >= self.history.len() => {
                self.history_index = None;
                let draft = self.draft.take().unwrap_or_default();
                self.set_text(&draft);
            }
            Some(ref mut idx) => {
                *idx += 1;
                let text = self.history[*idx].clone();
                self.set_text(&text);
            }
        }
    }

    /// Add an entry to history, skipping repeats of the last entry.
    pub fn add_to_history(&mut self, text: &str) {
        let trimmed = text.trim().to_string();
        if trimmed.is_empty() {
            return;
        }
        if self.history.last() != Some(&trimmed) {
            self.history.push(trimmed);
        }
        self.history_index = None;
        self.draft = None;
    }

    /// Render the question form: send label on top, inline chat error below.
    pub fn render(&self, frame: &mut Frame, area: Rect, form: &QuestionFormView, theme: &Theme) {
        let mut block = Block::default()
            .borders(Borders::TOP | Borders::BOTTOM)
            .border_style(theme.border_style())
            .title(Line::from(vec![
                Span::styled(" > ", theme.muted_style()),
                Span::styled(
                    format!("[Enter] {} ", form.send_label),
                    theme.action_style(form.send_enabled),
                ),
            ]));
        if let Some(error) = &form.error {
            block = block.title_bottom(Line::from(Span::styled(
                format!(" {error} "),
                theme.error_style(),
            )));
        }
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(&self.textarea, inner);
    }
}
