//! Built-in command table
//!
//! The first token decides (case-sensitive). Anything that is not a
//! built-in runs as an external command line.

use super::context::tokenize;
use crate::error::Error;

pub const CD_USAGE: &str = "CD takes one argument - the directory to change to";
pub const VIEW_USAGE: &str = "VIEW takes one argument - the location of an image file";

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Blank or whitespace-only line
    Empty,
    /// `exit`: the shell finishes
    Exit,
    /// `cd <path>`; `None` when no path was given
    ChangeDirectory(Option<String>),
    /// `view <path>`; argument count is checked by the shell
    View(Vec<String>),
    /// Anything else, kept verbatim for the command interpreter
    External(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let tokens = tokenize(line);
        let Some(first) = tokens.first() else {
            return Command::Empty;
        };

        match first.as_str() {
            "exit" => Command::Exit,
            "cd" => Command::ChangeDirectory(match tokens.len() {
                1 => None,
                2 => Some(tokens[1].clone()),
                // Unquoted path with spaces: take the rest of the line
                _ if !line.contains(['"', '\'']) => Some(remainder(line)),
                _ => Some(tokens[1..].join(" ")),
            }),
            "view" => Command::View(tokens[1..].to_vec()),
            _ => Command::External(line.to_string()),
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, Command::External(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Empty => "",
            Command::Exit => "exit",
            Command::ChangeDirectory(_) => "cd",
            Command::View(_) => "view",
            Command::External(_) => "external",
        }
    }

    /// Wrong-argument-count error carrying this built-in's usage line
    pub fn usage_error(&self) -> Error {
        let usage = match self {
            Command::ChangeDirectory(_) => CD_USAGE,
            Command::View(_) => VIEW_USAGE,
            _ => "takes no arguments",
        };
        Error::InvalidArguments {
            command: self.name().to_string(),
            usage: usage.to_string(),
        }
    }
}

/// Everything after the first word, trimmed
fn remainder(line: &str) -> String {
    line.trim_start()
        .split_once(char::is_whitespace)
        .map(|(_, rest)| rest.trim().to_string())
        .unwrap_or_default()
}
