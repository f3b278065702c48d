//! Status bar widget showing request status, notices and keybinding hints.

use crate::tui::theme::Theme;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

const HINTS: &str = "[Enter] Send │ [Ctrl+U] Upload │ [Ctrl+N] New session │ [F1] Help │ [Ctrl+C] Quit";

/// A one-line notice from the last local command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_warning: bool,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_warning: false,
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_warning: true,
        }
    }
}

/// Render the status bar. A notice replaces the keybinding hints.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    status: &str,
    notice: Option<&Notice>,
    is_busy: bool,
    theme: &Theme,
) {
    let badge_bg = if is_busy { theme.warning_fg } else { theme.accent };
    let mut spans = vec![
        Span::styled(
            format!(" {status} "),
            theme
                .status_bar_style()
                .fg(theme.bg)
                .bg(badge_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ", theme.status_bar_style()),
    ];
    match notice {
        Some(notice) if notice.is_warning => {
            spans.push(Span::styled(notice.text.clone(), theme.warning_style()));
        }
        Some(notice) => spans.push(Span::styled(notice.text.clone(), theme.status_bar_style())),
        None => spans.push(Span::styled(HINTS, theme.status_bar_style())),
    }

    let bar = Paragraph::new(Line::from(spans)).style(theme.status_bar_style());
    frame.render_widget(bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use docchat_core::view::{IDLE_STATUS, LOADING_STATUS};

    #[test]
    fn test_notice_constructors() {
        assert!(!Notice::info("ok").is_warning);
        assert!(Notice::warning("careful").is_warning);
    }

    #[test]
    fn test_render_status_bar_idle() {
        let backend = ratatui::backend::TestBackend::new(120, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| {
                render_status_bar(frame, frame.area(), IDLE_STATUS, None, false, &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_render_status_bar_with_notice() {
        let backend = ratatui::backend::TestBackend::new(80, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let notice = Notice::warning("Only the first two files were staged.");
        terminal
            .draw(|frame| {
                render_status_bar(frame, frame.area(), LOADING_STATUS, Some(&notice), true, &theme);
            })
            .unwrap();
    }
}
