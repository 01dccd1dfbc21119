//! Error types for document parsing

use std::path::PathBuf;
use thiserror::Error;

/// Part of the document being read when input ran out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStage {
    Header,
    Authors,
}

impl std::fmt::Display for ParseStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseStage::Header => write!(f, "header"),
            ParseStage::Authors => write!(f, "authors"),
        }
    }
}

/// Errors that abort a parse
///
/// Parsing is all-or-nothing: any of these ends the parse and no partial
/// document is returned.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Reading the input stream failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input contains no non-empty line to use as the title
    #[error("unexpected EOF; expected title")]
    MissingTitle,

    /// Input ended before the first section heading
    #[error("unexpected EOF in {0}")]
    UnexpectedEof(ParseStage),

    /// A header line that is neither a time, tags, a note nor the subtitle
    #[error("unexpected header line: {0:?}")]
    UnexpectedHeaderLine(String),

    /// A dot-command with no registered handler
    #[error("{file}:{line}: unknown command {command:?}")]
    UnknownCommand {
        file: String,
        line: usize,
        command: String,
    },

    /// A dot-command invoked with the wrong arguments
    #[error("{file}:{line}: {message}")]
    MalformedCommandArgs {
        file: String,
        line: usize,
        message: String,
    },

    /// A `.code` address that does not resolve in the referenced file
    #[error("{file}:{line}: bad address {address:?}: {reason}")]
    InvalidAddress {
        file: String,
        line: usize,
        address: String,
        reason: String,
    },

    /// A file referenced by a dot-command could not be read
    #[error("{file}:{line}: failed to read {path}: {source}", path = .path.display())]
    AssetRead {
        file: String,
        line: usize,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Registering a command under an unusable name
    #[error("bad name in register: {0:?}")]
    InvalidCommandName(String),
}

impl ParseError {
    /// Build a [`ParseError::MalformedCommandArgs`] for a command line
    pub fn malformed(file: &str, line: usize, message: impl Into<String>) -> Self {
        ParseError::MalformedCommandArgs {
            file: file.to_string(),
            line,
            message: message.into(),
        }
    }
}
