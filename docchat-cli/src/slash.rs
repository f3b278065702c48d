//! Slash commands shared by the REPL and the TUI.
//!
//! The registry holds help metadata and resolves aliases; `parse` turns an
//! input line into a [`SlashCommand`] the front-ends dispatch on.

use std::path::PathBuf;

/// Metadata describing a slash command.
#[derive(Debug, Clone)]
pub struct CommandInfo {
    /// Primary name including the slash, e.g. "/upload".
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    /// One-line description shown in /help.
    pub description: &'static str,
    pub usage: &'static str,
}

const COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        name: "/upload",
        aliases: &["/up"],
        description: "Stage up to two files and upload them",
        usage: "/upload <path> [<path>]",
    },
    CommandInfo {
        name: "/stage",
        aliases: &[],
        description: "Stage files without uploading (first two kept)",
        usage: "/stage <path>...",
    },
    CommandInfo {
        name: "/clear-files",
        aliases: &["/clear"],
        description: "Drop the staged files",
        usage: "/clear-files",
    },
    CommandInfo {
        name: "/docs",
        aliases: &["/documents"],
        description: "List indexed documents and the current filter",
        usage: "/docs",
    },
    CommandInfo {
        name: "/filter",
        aliases: &[],
        description: "Set the document-id filter (empty searches everything)",
        usage: "/filter [id, id, ...]",
    },
    CommandInfo {
        name: "/session",
        aliases: &[],
        description: "Show or replace the session id",
        usage: "/session [id]",
    },
    CommandInfo {
        name: "/new",
        aliases: &["/reset"],
        description: "Start a fresh session",
        usage: "/new",
    },
    CommandInfo {
        name: "/help",
        aliases: &["/?"],
        description: "Show this help",
        usage: "/help",
    },
    CommandInfo {
        name: "/quit",
        aliases: &["/exit", "/q"],
        description: "Exit docchat",
        usage: "/quit",
    },
];

/// A parsed slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Upload(Vec<PathBuf>),
    Stage(Vec<PathBuf>),
    ClearFiles,
    Docs,
    /// Raw filter text; empty clears the filter.
    Filter(String),
    /// `None` shows the current id.
    Session(Option<String>),
    New,
    Help,
    Quit,
    /// Known command with bad arguments.
    Usage(&'static str),
    Unknown {
        name: String,
        suggestion: Option<&'static str>,
    },
}

/// Registry of all slash commands.
pub struct CommandRegistry {
    commands: &'static [CommandInfo],
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self { commands: COMMANDS }
    }

    /// Resolve a name or alias to its command.
    pub fn lookup(&self, name: &str) -> Option<&CommandInfo> {
        self.commands
            .iter()
            .find(|c| c.name == name || c.aliases.contains(&name))
    }

    pub fn all(&self) -> &[CommandInfo] {
        self.commands
    }

    /// Names and aliases starting with `prefix`, sorted.
    pub fn completions(&self, prefix: &str) -> Vec<&'static str> {
        let mut results: Vec<&'static str> = self
            .commands
            .iter()
            .flat_map(|c| std::iter::once(c.name).chain(c.aliases.iter().copied()))
            .filter(|name| name.starts_with(prefix))
            .collect();
        results.sort();
        results
    }

    /// Closest command name within edit distance 3.
    pub fn suggest(&self, input: &str) -> Option<&'static str> {
        self.commands
            .iter()
            .flat_map(|c| std::iter::once(c.name).chain(c.aliases.iter().copied()))
            .map(|name| (name, edit_distance(input, name)))
            .filter(|(_, dist)| *dist <= 3)
            .min_by_key(|(_, dist)| *dist)
            .map(|(name, _)| name)
    }

    /// Help text, one line per command.
    pub fn help_text(&self) -> String {
        let width = self.commands.iter().map(|c| c.usage.len()).max().unwrap_or(0);
        let mut out = String::from("Commands:\n");
        for cmd in self.commands {
            out.push_str(&format!("  {:width$}  {}\n", cmd.usage, cmd.description));
        }
        out.push_str("Anything else is sent as a question.");
        out
    }

    /// Parse a line. Returns `None` when it is not a slash command.
    ///
    /// A first word with another `/` in it (`/etc/hosts`, `//help`) reads
    /// as a path, so the line stays a question.
    pub fn parse(&self, input: &str) -> Option<SlashCommand> {
        let input = input.trim();
        if !input.starts_with('/') {
            return None;
        }
        let (name, rest) = match input.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (input, ""),
        };
        if name[1..].contains('/') {
            return None;
        }
        let Some(info) = self.lookup(name) else {
            return Some(SlashCommand::Unknown {
                name: name.to_string(),
                suggestion: self.suggest(name),
            });
        };
        let paths = || -> Vec<PathBuf> { rest.split_whitespace().map(PathBuf::from).collect() };
        let command = match info.name {
            "/upload" if rest.is_empty() => SlashCommand::Usage(info.usage),
            "/upload" => SlashCommand::Upload(paths()),
            "/stage" if rest.is_empty() => SlashCommand::Usage(info.usage),
            "/stage" => SlashCommand::Stage(paths()),
            "/clear-files" => SlashCommand::ClearFiles,
            "/docs" => SlashCommand::Docs,
            "/filter" => SlashCommand::Filter(rest.to_string()),
            "/session" if rest.is_empty() => SlashCommand::Session(None),
            "/session" => SlashCommand::Session(Some(rest.to_string())),
            "/new" => SlashCommand::New,
            "/help" => SlashCommand::Help,
            "/quit" => SlashCommand::Quit,
            _ => SlashCommand::Usage(info.usage),
        };
        Some(command)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Levenshtein distance over bytes.
fn edit_distance(a: &str, b: &str) -> usize {
    let a = a.as_bytes();
    let b = b.as_bytes();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> Option<SlashCommand> {
        CommandRegistry::new().parse(input)
    }

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert_eq!(parse("what is in the report?"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn test_path_like_first_word_is_a_question() {
        assert_eq!(parse("/etc/hosts is mentioned where?"), None);
        assert_eq!(parse("//help me read this"), None);
        assert!(matches!(parse("/sesion"), Some(SlashCommand::Unknown { .. })));
    }

    #[test]
    fn test_upload_paths() {
        assert_eq!(
            parse("/upload a.pdf  notes.md"),
            Some(SlashCommand::Upload(vec![
                PathBuf::from("a.pdf"),
                PathBuf::from("notes.md")
            ]))
        );
    }

    #[test]
    fn test_upload_without_paths_shows_usage() {
        assert_eq!(
            parse("/upload"),
            Some(SlashCommand::Usage("/upload <path> [<path>]"))
        );
    }

    #[test]
    fn test_alias_resolution() {
        assert_eq!(parse("/q"), Some(SlashCommand::Quit));
        assert_eq!(parse("/exit"), Some(SlashCommand::Quit));
        assert_eq!(parse("/reset"), Some(SlashCommand::New));
        assert_eq!(parse("/clear"), Some(SlashCommand::ClearFiles));
    }

    #[test]
    fn test_filter_keeps_raw_text() {
        assert_eq!(
            parse("/filter d1, d2 ,d3"),
            Some(SlashCommand::Filter("d1, d2 ,d3".into()))
        );
        assert_eq!(parse("/filter"), Some(SlashCommand::Filter(String::new())));
    }

    #[test]
    fn test_session_show_and_set() {
        assert_eq!(parse("/session"), Some(SlashCommand::Session(None)));
        assert_eq!(
            parse("/session abc-123"),
            Some(SlashCommand::Session(Some("abc-123".into())))
        );
    }

    #[test]
    fn test_unknown_command_suggests() {
        assert_eq!(
            parse("/uplod a.pdf"),
            Some(SlashCommand::Unknown {
                name: "/uplod".into(),
                suggestion: Some("/upload"),
            })
        );
        assert!(matches!(
            parse("/zzzzzzzzzz"),
            Some(SlashCommand::Unknown { suggestion: None, .. })
        ));
    }

    #[test]
    fn test_completions() {
        let registry = CommandRegistry::new();
        assert_eq!(registry.completions("/s"), vec!["/session", "/stage"]);
    }

    #[test]
    fn test_help_text_lists_every_usage() {
        let registry = CommandRegistry::new();
        let help = registry.help_text();
        for cmd in registry.all() {
            assert!(help.contains(cmd.usage), "missing {}", cmd.usage);
        }
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("/help", "/help"), 0);
        assert_eq!(edit_distance("/hlp", "/help"), 1);
        assert_eq!(edit_distance("", "abc"), 3);
    }
}
