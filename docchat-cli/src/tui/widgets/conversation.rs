//! Conversation pane widget - scrollable transcript.

use crate::tui::theme::Theme;
use docchat_core::Role;
use docchat_core::view::{MessageView, TranscriptView};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Scroll state for the conversation pane. Messages come from the session.
pub struct ConversationState {
    pub scroll_offset: u16,
    pub auto_scroll: bool,
}

impl ConversationState {
    pub fn new() -> Self {
        Self {
            scroll_offset: 0,
            auto_scroll: true,
        }
    }

    pub fn scroll_up(&mut self, amount: u16) {
        self.auto_scroll = false;
        self.scroll_offset = self.scroll_offset.saturating_add(amount);
    }

    pub fn scroll_down(&mut self, amount: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
        if self.scroll_offset == 0 {
            self.auto_scroll = true;
        }
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
        self.auto_scroll = true;
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the conversation pane.
pub fn render_conversation(
    frame: &mut Frame,
    area: Rect,
    transcript: &TranscriptView,
    state: &ConversationState,
    theme: &Theme,
) {
    let block = Block::default()
        .title(" Conversation ")
        .borders(Borders::NONE)
        .style(theme.base_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let messages = match transcript {
        TranscriptView::Empty { title, hint } => {
            let top = inner.height.saturating_sub(2) / 2;
            let mut lines: Vec<Line> = (0..top).map(|_| Line::from("")).collect();
            lines.push(Line::from(Span::styled(
                *title,
                theme.base_style().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(*hint, theme.muted_style())));
            let paragraph = Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, inner);
            return;
        }
        TranscriptView::Messages(messages) => messages,
    };

    let mut all_lines: Vec<Line> = Vec::new();
    for msg in messages {
        render_message_lines(&mut all_lines, msg, theme);
        all_lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(Text::from(all_lines)).wrap(Wrap { trim: false });

    // Wrapped height is what matters for scrolling, not the logical line count.
    let total_lines = rendered_height(&paragraph, inner.width);
    let max_scroll = total_lines.saturating_sub(inner.height);
    let scroll = if state.auto_scroll {
        max_scroll
    } else {
        max_scroll.saturating_sub(state.scroll_offset)
    };

    frame.render_widget(paragraph.scroll((scroll, 0)), inner);
}

/// Rows the paragraph occupies once word-wrapped at `width`.
fn rendered_height(paragraph: &Paragraph, width: u16) -> u16 {
    u16::try_from(paragraph.line_count(width.max(1))).unwrap_or(u16::MAX)
}

fn render_message_lines(lines: &mut Vec<Line<'static>>, msg: &MessageView, theme: &Theme) {
    let (label, label_style, body_style) = match msg.role {
        Role::User => ("You: ", theme.user_message_style(), theme.base_style()),
        Role::Assistant if msg.is_pending => (
            "Assistant: ",
            theme.assistant_message_style().add_modifier(Modifier::BOLD),
            theme.pending_style(),
        ),
        Role::Assistant => (
            "Assistant: ",
            theme.assistant_message_style().add_modifier(Modifier::BOLD),
            theme.assistant_message_style(),
        ),
    };

    let mut header = Vec::with_capacity(2);
    if let Some(timestamp) = &msg.timestamp {
        header.push(Span::styled(format!("[{timestamp}] "), theme.muted_style()));
    }
    header.push(Span::styled(label, label_style));
    lines.push(Line::from(header));

    for text_line in msg.content.lines() {
        lines.push(Line::from(Span::styled(text_line.to_string(), body_style)));
    }

    if !msg.sources.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("  sources: ", theme.muted_style()),
            Span::styled(msg.sources.join(", "), theme.citation_style()),
        ]));
    }
}
