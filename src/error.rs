use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::exit_codes;

/// Errors that can occur while loading, parsing, or evaluating a program.
#[derive(Debug, thiserror::Error)]
pub enum BrainfuckError {
    /// The filtered source does not conform to the grammar.
    #[error("unmatched bracket {kind} at instruction {pos}")]
    Syntax { pos: usize, kind: UnmatchedBracketKind },

    /// The parser itself failed for a reason unrelated to the grammar.
    #[error("parser fault at instruction {pos}: {reason}")]
    ParsingEngine { pos: usize, reason: String },

    /// Loop nesting went past the configured ceiling.
    #[error("exceeded maximal loop nesting depth (depth {depth}, limit {limit})")]
    RecursionLimit { depth: usize, limit: usize },

    /// Any other failure raised while the program was running.
    #[error("{source}")]
    Runtime {
        #[from]
        source: RuntimeFault,
    },

    /// The program source could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failures surfaced by the evaluator's I/O boundary.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeFault {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// `,` was executed with no input left to read.
    #[error("input exhausted while reading a character")]
    EndOfInput,

    #[error("interrupted while waiting for input")]
    Interrupted,

    /// The `--stdout` destination could not be created.
    #[error("failed to open output file {}: {source}", .path.display())]
    OpenOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The input stream held bytes that do not decode as UTF-8.
    #[error("invalid input: {0}")]
    InvalidInput(#[source] io::Error),
}

/// Which side of the loop was unmatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnmatchedBracketKind {
    Open,
    Close,
}

impl fmt::Display for UnmatchedBracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnmatchedBracketKind::Open => write!(f, "'['"),
            UnmatchedBracketKind::Close => write!(f, "']'"),
        }
    }
}

impl BrainfuckError {
    /// Class label printed in front of diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            BrainfuckError::Syntax { .. } => "SyntaxError",
            BrainfuckError::ParsingEngine { .. } => "ParsingError",
            BrainfuckError::RecursionLimit { .. } => "RecursionError",
            BrainfuckError::Runtime { .. } => "RuntimeError",
            BrainfuckError::SourceRead { .. } => "ReadError",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            BrainfuckError::Syntax { .. } => exit_codes::SYNTAX,
            BrainfuckError::ParsingEngine { .. } => exit_codes::PARSING,
            BrainfuckError::RecursionLimit { .. } => exit_codes::RECURSION,
            BrainfuckError::Runtime { .. } => exit_codes::RUNTIME,
            BrainfuckError::SourceRead { .. } => exit_codes::SOURCE_READ,
        }
    }

    /// Position in the filtered source, for errors raised before evaluation.
    pub fn position(&self) -> Option<usize> {
        match self {
            BrainfuckError::Syntax { pos, .. } | BrainfuckError::ParsingEngine { pos, .. } => {
                Some(*pos)
            }
            _ => None,
        }
    }
}

impl From<io::Error> for BrainfuckError {
    fn from(err: io::Error) -> Self {
        BrainfuckError::Runtime { source: RuntimeFault::Io(err) }
    }
}
