//! Help overlay: keyboard shortcuts and slash commands.
//!
//! Toggled with F1 or /help, closed with Esc.

use crate::slash::CommandRegistry;
use crate::tui::theme::Theme;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

const SHORTCUTS: &[(&str, &str)] = &[
    ("Enter", "Send question (or run /command)"),
    ("Shift+Enter", "New line"),
    ("Up / Down", "Input history"),
    ("Ctrl+U", "Upload staged files"),
    ("Ctrl+X", "Clear staged files"),
    ("Ctrl+N", "Start a new session"),
    ("Ctrl+B", "Toggle documents panel"),
    ("PgUp / PgDn", "Scroll conversation"),
    ("Ctrl+L", "Jump to latest message"),
    ("F1 / Esc", "Toggle / close help"),
    ("Ctrl+C / Ctrl+D", "Quit"),
];

/// Render the help overlay centered in `area`.
pub fn render_help_overlay(frame: &mut Frame, area: Rect, commands: &CommandRegistry, theme: &Theme) {
    if area.width < 20 || area.height < 10 {
        return;
    }
    let popup = Rect {
        x: area.x + area.width / 10,
        y: area.y + area.height / 10,
        width: area.width - area.width / 5,
        height: area.height - area.height / 5,
    };
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Help [Esc to close] ")
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .style(theme.base_style());

    let bold = theme.base_style().add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::from(Span::styled("Keys", bold))];
    for (key, description) in SHORTCUTS {
        lines.push(Line::from(vec![
            Span::styled(format!("  {key:<16}"), theme.muted_style().fg(theme.accent)),
            Span::raw(*description),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Commands", bold)));
    for cmd in commands.all() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<24}", cmd.usage), theme.muted_style().fg(theme.accent)),
            Span::raw(cmd.description),
        ]));
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, popup);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_help_overlay_lists_commands() {
        let backend = ratatui::backend::TestBackend::new(100, 40);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let registry = CommandRegistry::new();
        terminal
            .draw(|frame| render_help_overlay(frame, frame.area(), &registry, &theme))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("/upload"));
        assert!(text.contains("Ctrl+N"));
    }

    #[test]
    fn test_tiny_area_renders_nothing() {
        let backend = ratatui::backend::TestBackend::new(10, 5);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| render_help_overlay(frame, frame.area(), &CommandRegistry::new(), &theme))
            .unwrap();
    }
}
