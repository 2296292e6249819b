//! Commands of the interactive shell.

use crate::tab::TabId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Search in the active tab
    Search(String),
    NewTab,
    ListTabs,
    Switch(TabId),
    NextTab,
    PrevTab,
    Rename(TabId, String),
    Delete(TabId),
    Chat(String),
    /// Redraw the active tab's results
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands.")]
    Unknown(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("'{0}' is not a tab id")]
    InvalidTabId(String),
}

/// Shown by `help`
pub const HELP: &str = "\
Commands:
  search <query>        search in the active tab
  new                   open a new search tab
  tabs                  list tabs
  switch <id>           switch to a tab
  next | prev           cycle through tabs
  rename <id> <name>    rename a tab
  delete <id>           delete a tab
  chat <message>        ask about the protein in the active tab
  show                  show the active tab's results
  help                  show this help
  quit                  exit";

impl Command {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "search" | "s" => Command::Search(required(rest, "search <query>")?.to_string()),
            "new" => Command::NewTab,
            "tabs" | "ls" => Command::ListTabs,
            "switch" => Command::Switch(tab_id(required(rest, "switch <id>")?)?),
            "next" => Command::NextTab,
            "prev" => Command::PrevTab,
            "rename" => {
                let usage = "rename <id> <name>";
                let (id, name) = required(rest, usage)?
                    .split_once(char::is_whitespace)
                    .ok_or(CommandError::Usage(usage))?;
                Command::Rename(tab_id(id)?, name.trim().to_string())
            }
            "delete" | "close" => Command::Delete(tab_id(required(rest, "delete <id>")?)?),
            "chat" | "ask" => Command::Chat(required(rest, "chat <message>")?.to_string()),
            "show" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            _ => return Err(CommandError::Unknown(word.to_string())),
        };
        Ok(Some(command))
    }
}

fn required<'a>(rest: &'a str, usage: &'static str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::Usage(usage))
    } else {
        Ok(rest)
    }
}

fn tab_id(text: &str) -> Result<TabId, CommandError> {
    text.trim()
        .parse()
        .map_err(|_| CommandError::InvalidTabId(text.trim().to_string()))
}
