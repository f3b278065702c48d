//! Header bar widget showing service, session and activity.

use crate::tui::theme::Theme;
use docchat_core::SessionState;
use docchat_core::view::{indexed_count_label, short_id};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// Data needed to render the header bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderData {
    pub api_base: String,
    pub session_id: String,
    pub indexed: Option<String>,
    pub is_busy: bool,
}

impl HeaderData {
    pub fn from_state(api_base: &str, state: &SessionState) -> Self {
        Self {
            api_base: api_base.to_string(),
            session_id: state.session_id.clone(),
            indexed: indexed_count_label(state),
            is_busy: state.is_loading || state.is_uploading,
        }
    }

    /// Session id as shown in the header.
    pub fn session_display(&self) -> String {
        let trimmed = self.session_id.trim();
        if trimmed.is_empty() {
            return "no session".to_string();
        }
        let short = short_id(trimmed);
        if short.len() < trimmed.len() {
            format!("session {short}…")
        } else {
            format!("session {short}")
        }
    }
}

/// Render the header bar.
pub fn render_header(frame: &mut Frame, area: Rect, data: &HeaderData, theme: &Theme) {
    let status_indicator = if data.is_busy { "⟳" } else { "●" };
    let separator = || Span::styled(" │ ", theme.header_style().fg(theme.border_color));

    let mut spans = vec![
        Span::styled(
            format!(" {status_indicator} docchat"),
            theme
                .header_style()
                .add_modifier(Modifier::BOLD)
                .fg(theme.success_fg),
        ),
        separator(),
        Span::styled(
            data.session_display(),
            theme.header_style().add_modifier(Modifier::BOLD),
        ),
        separator(),
        Span::styled(data.api_base.clone(), theme.header_style()),
    ];
    if let Some(indexed) = &data.indexed {
        spans.push(separator());
        spans.push(Span::styled(indexed.clone(), theme.header_style().fg(theme.accent)));
    }

    let header = Paragraph::new(Line::from(spans)).style(theme.header_style());
    frame.render_widget(header, area);
}
