//! Terminal event handling using crossterm EventStream.

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyModifiers};
use futures::StreamExt;

/// High-level actions the TUI can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NewSession,
    UploadStaged,
    ClearStaged,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    ScrollToBottom,
    ToggleDocuments,
    ToggleHelp,
}

/// Reads terminal events asynchronously using crossterm's EventStream.
pub struct EventHandler {
    stream: EventStream,
}

impl EventHandler {
    pub fn new() -> Self {
        Self {
            stream: EventStream::new(),
        }
    }

    /// Read the next terminal event. Returns None if the stream ends.
    pub async fn next(&mut self) -> Option<Event> {
        self.stream.next().await.and_then(|r| r.ok())
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a key event to an Action.
/// Returns None if the event should be passed to the input widget.
pub fn map_global_key(event: &KeyEvent) -> Option<Action> {
    match (event.modifiers, event.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
        (KeyModifiers::CONTROL, KeyCode::Char('d')) => Some(Action::Quit),
        (KeyModifiers::CONTROL, KeyCode::Char('n')) => Some(Action::NewSession),
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => Some(Action::UploadStaged),
        (KeyModifiers::CONTROL, KeyCode::Char('x')) => Some(Action::ClearStaged),
        (KeyModifiers::CONTROL, KeyCode::Char('l')) => Some(Action::ScrollToBottom),
        (KeyModifiers::CONTROL, KeyCode::Char('b')) => Some(Action::ToggleDocuments),
        (_, KeyCode::F(1)) => Some(Action::ToggleHelp),
        (_, KeyCode::PageUp) => Some(Action::PageUp),
        (_, KeyCode::PageDown) => Some(Action::PageDown),
        (KeyModifiers::ALT, KeyCode::Up) => Some(Action::ScrollUp),
        (KeyModifiers::ALT, KeyCode::Down) => Some(Action::ScrollDown),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    #[test]
    fn test_ctrl_c_and_ctrl_d_quit() {
        assert_eq!(map_global_key(&ctrl(KeyCode::Char('c'))), Some(Action::Quit));
        assert_eq!(map_global_key(&ctrl(KeyCode::Char('d'))), Some(Action::Quit));
    }

    #[test]
    fn test_ctrl_n_starts_new_session() {
        assert_eq!(
            map_global_key(&ctrl(KeyCode::Char('n'))),
            Some(Action::NewSession)
        );
    }

    #[test]
    fn test_ctrl_u_uploads() {
        assert_eq!(
            map_global_key(&ctrl(KeyCode::Char('u'))),
            Some(Action::UploadStaged)
        );
    }

    #[test]
    fn test_paging_keys() {
        assert_eq!(map_global_key(&key(KeyCode::PageUp)), Some(Action::PageUp));
        assert_eq!(map_global_key(&key(KeyCode::PageDown)), Some(Action::PageDown));
        assert_eq!(map_global_key(&key(KeyCode::F(1))), Some(Action::ToggleHelp));
    }

    #[test]
    fn test_regular_key_not_global() {
        assert_eq!(map_global_key(&key(KeyCode::Char('a'))), None);
        assert_eq!(map_global_key(&key(KeyCode::Enter)), None);
        assert_eq!(map_global_key(&key(KeyCode::Up)), None);
    }
}
