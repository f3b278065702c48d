//! Theme system for the docchat TUI.
//!
//! Provides dark and light color palettes, loaded from `ui.theme`.

use ratatui::style::{Color, Modifier, Style};

/// Complete color theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // Base colors
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub muted_fg: Color,

    // Message colors
    pub user_msg_fg: Color,
    pub assistant_msg_fg: Color,
    pub citation_fg: Color,

    // Status colors
    pub error_fg: Color,
    pub warning_fg: Color,
    pub success_fg: Color,

    // UI chrome
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub border_color: Color,
    pub panel_bg: Color,
}

impl Theme {
    /// Create the default dark theme.
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            bg: Color::Rgb(30, 30, 46),
            fg: Color::Rgb(205, 214, 244),
            accent: Color::Rgb(137, 180, 250),
            muted_fg: Color::Rgb(127, 132, 156),

            user_msg_fg: Color::Rgb(137, 180, 250),
            assistant_msg_fg: Color::Rgb(166, 227, 161),
            citation_fg: Color::Rgb(180, 190, 254),

            error_fg: Color::Rgb(243, 139, 168),
            warning_fg: Color::Rgb(250, 179, 135),
            success_fg: Color::Rgb(166, 227, 161),

            header_bg: Color::Rgb(24, 24, 37),
            header_fg: Color::Rgb(205, 214, 244),
            status_bar_bg: Color::Rgb(24, 24, 37),
            status_bar_fg: Color::Rgb(166, 173, 200),
            border_color: Color::Rgb(69, 71, 90),
            panel_bg: Color::Rgb(24, 24, 37),
        }
    }

    /// Create the light theme.
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            bg: Color::Rgb(239, 241, 245),
            fg: Color::Rgb(76, 79, 105),
            accent: Color::Rgb(30, 102, 245),
            muted_fg: Color::Rgb(140, 143, 161),

            user_msg_fg: Color::Rgb(30, 102, 245),
            assistant_msg_fg: Color::Rgb(64, 160, 43),
            citation_fg: Color::Rgb(114, 135, 253),

            error_fg: Color::Rgb(210, 15, 57),
            warning_fg: Color::Rgb(254, 100, 11),
            success_fg: Color::Rgb(64, 160, 43),

            header_bg: Color::Rgb(220, 224, 232),
            header_fg: Color::Rgb(76, 79, 105),
            status_bar_bg: Color::Rgb(220, 224, 232),
            status_bar_fg: Color::Rgb(92, 95, 119),
            border_color: Color::Rgb(172, 176, 190),
            panel_bg: Color::Rgb(230, 233, 239),
        }
    }

    /// Load a theme by name from config. Falls back to dark.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    // -- Convenience style constructors --

    pub fn base_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn header_style(&self) -> Style {
        Style::default().fg(self.header_fg).bg(self.header_bg)
    }

    pub fn status_bar_style(&self) -> Style {
        Style::default()
            .fg(self.status_bar_fg)
            .bg(self.status_bar_bg)
    }

    pub fn panel_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.panel_bg)
    }

    pub fn user_message_style(&self) -> Style {
        Style::default()
            .fg(self.user_msg_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn assistant_message_style(&self) -> Style {
        Style::default().fg(self.assistant_msg_fg)
    }

    pub fn pending_style(&self) -> Style {
        Style::default()
            .fg(self.muted_fg)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted_fg)
    }

    pub fn citation_style(&self) -> Style {
        Style::default().fg(self.citation_fg)
    }

    pub fn error_style(&self) -> Style {
        Style::default()
            .fg(self.error_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.warning_fg)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success_fg)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border_color)
    }

    /// Accent when enabled, muted while a request is running.
    pub fn action_style(&self, enabled: bool) -> Style {
        if enabled {
            Style::default()
                .fg(self.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            self.pending_style()
        }
    }
}
