//! TUI (Terminal User Interface) module for docchat.
//!
//! Conversation pane, documents panel, question input and status bar,
//! driven by a single event loop.

pub mod app;
pub mod event;
pub mod theme;
pub mod widgets;

use app::App;
use docchat_core::ChatWorkspace;
use docchat_core::config::DocChatConfig;

/// Run the TUI application.
pub async fn run(config: DocChatConfig, workspace: ChatWorkspace) -> anyhow::Result<()> {
    // Setup terminal
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableMouseCapture,
        crossterm::event::EnableBracketedPaste
    )?;

    let backend = ratatui::backend::CrosstermBackend::new(std::io::stdout());
    let mut terminal = ratatui::Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(&config, workspace);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::event::DisableBracketedPaste,
        crossterm::event::DisableMouseCapture,
        crossterm::terminal::LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}
