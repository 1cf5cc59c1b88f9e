//! Line-oriented PGN parsing into flat game records.
//!
//! ```no_run
//! use pgn_parser::{ParserConfig, parse_file};
//!
//! let games = parse_file("games.pgn", &[r"%clk \S+"], &ParserConfig::default())?;
//! for game in &games {
//!     println!("{game}");
//! }
//! # Ok::<(), pgn_parser::ParseError>(())
//! ```

mod error;
mod filter;
mod log;
mod reader;
mod types;

pub use error::{ParseError, Result};
pub use filter::{CleanupPatterns, RESULT_MARKERS, extract_moves, is_result_marker};
pub use reader::{
    CompressionMode, MalformedTagPolicy, Parser, ParserConfig, PgnInput, parse_file, parse_glob,
};
pub use types::{GameRecord, TAG_COUNT, TagKey};
