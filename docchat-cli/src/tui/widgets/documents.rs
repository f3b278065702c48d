//! Documents panel: upload form, indexed documents and the active filter.

use crate::tui::theme::Theme;
use docchat_core::view::{DocumentRow, UploadFormView};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

/// Data needed to render the documents panel.
#[derive(Debug, Clone)]
pub struct DocumentsPanelData {
    pub form: UploadFormView,
    pub documents: Vec<DocumentRow>,
    pub filter: String,
}

/// Cut `text` to `max` display columns, ending in `…` when shortened.
pub fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

fn section_title(title: &str, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        theme.panel_style().add_modifier(Modifier::BOLD),
    ))
}

/// Render the documents panel.
pub fn render_documents_panel(
    frame: &mut Frame,
    area: Rect,
    data: &DocumentsPanelData,
    theme: &Theme,
) {
    let block = Block::default()
        .title(" Documents ")
        .borders(Borders::LEFT)
        .border_style(theme.border_style())
        .style(theme.panel_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let width = usize::from(inner.width.saturating_sub(2)).max(4);

    let mut lines: Vec<Line> = vec![section_title("Upload (max 2 files)", theme)];
    if data.form.staged.is_empty() {
        lines.push(Line::from(Span::styled(
            "  /stage <path> to pick files",
            theme.muted_style(),
        )));
    }
    for file in &data.form.staged {
        let name_width = width.saturating_sub(file.size_label.width() + 3);
        lines.push(Line::from(vec![
            Span::raw(format!("  {} ", truncate_to_width(&file.name, name_width))),
            Span::styled(file.size_label.clone(), theme.muted_style()),
        ]));
    }
    lines.push(Line::from(Span::styled(
        format!("  [Ctrl+U] {}", data.form.upload_label),
        theme.action_style(data.form.upload_enabled),
    )));
    if data.form.clear_enabled {
        lines.push(Line::from(Span::styled(
            "  [Ctrl+X] Clear selection",
            theme.muted_style(),
        )));
    }
    if let Some(error) = &data.form.error {
        lines.push(Line::from(Span::styled(format!("  {error}"), theme.error_style())));
    }

    lines.push(Line::from(""));
    lines.push(section_title("Indexed", theme));
    if let Some(label) = &data.form.indexed_label {
        lines.push(Line::from(Span::styled(format!("  {label}"), theme.success_style())));
    }
    if data.documents.is_empty() {
        lines.push(Line::from(Span::styled("  nothing indexed yet", theme.muted_style())));
    }
    for row in &data.documents {
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", row.short_id), theme.muted_style()),
            Span::raw(truncate_to_width(
                &row.summary,
                width.saturating_sub(row.short_id.width() + 3),
            )),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(section_title("Filter", theme));
    let filter_line = if data.filter.trim().is_empty() {
        Span::styled("  all documents", theme.muted_style())
    } else {
        Span::raw(format!("  {}", data.filter))
    };
    lines.push(Line::from(filter_line));

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}
