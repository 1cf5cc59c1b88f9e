use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by a parse. Everything else in the input is absorbed
/// into degenerate field values rather than reported.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("I/O error while reading PGN input: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to open file '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to initialize zstd decoder for '{}': {source}", .path.display())]
    Decoder {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid cleanup pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    #[error("Invalid compression value '{0}'. Supported values: 'zstd' or omitted.")]
    InvalidCompression(String),

    /// A recognized tag line without a quoted value.
    #[error("Malformed tag '{key}' on line {line}: missing quoted value")]
    MalformedTag { line: usize, key: &'static str },

    #[error("{0}")]
    Files(String),
}

pub type Result<T> = std::result::Result<T, ParseError>;

#[derive(Debug, Clone, Default)]
pub struct ErrorAccumulator(Option<String>);

impl ErrorAccumulator {
    pub fn push(&mut self, msg: &str) {
        match &mut self.0 {
            Some(existing) => {
                existing.push_str("; ");
                existing.push_str(msg);
            }
            None => {
                self.0 = Some(msg.to_string());
            }
        }
    }

    pub fn take(&mut self) -> Option<String> {
        self.0.take()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}
