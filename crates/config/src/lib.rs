// Configuration loading

pub mod labels;
pub mod settings;

pub use labels::{LabelKey, LabelTables, Labels};
pub use settings::{language_code, GlobalConfig};

use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    /// File read / write error.
    Io(String),
    /// Malformed JSON.
    Parse(String),
    /// Language not in the configured list.
    UnknownLanguage { name: String, available: Vec<String> },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::UnknownLanguage { name, available } => {
                write!(f, "unknown language '{name}' (available: {})", available.join(", "))
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Drop `//` comment lines so hand-edited JSON files still parse.
pub(crate) fn strip_comment_lines(contents: &str) -> String {
    contents
        .lines()
        .filter(|line| !line.trim().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n")
}
