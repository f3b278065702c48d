//! TUI widget modules.

pub mod conversation;
pub mod documents;
pub mod header;
pub mod help_overlay;
pub mod input_area;
pub mod status_bar;
