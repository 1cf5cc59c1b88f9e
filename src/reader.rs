use crate::error::{ErrorAccumulator, ParseError, Result};
use crate::filter::{CleanupPatterns, extract_moves};
use crate::log;
use crate::types::{GameRecord, TagKey};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::mem;
use std::path::{Path, PathBuf};
use zstd::stream::read::Decoder as ZstdDecoder;

pub type PgnInput = Box<dyn Read + Send>;

const MOVE_LINE_PREFIX: &str = "1.";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CompressionMode {
    #[default]
    Plain,
    Zstd,
}

impl CompressionMode {
    pub fn parse(raw: &str) -> Result<Self> {
        let normalized = raw.trim();
        if normalized.eq_ignore_ascii_case("zstd") {
            Ok(Self::Zstd)
        } else {
            Err(ParseError::InvalidCompression(normalized.to_string()))
        }
    }

    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("zst") => Self::Zstd,
            _ => Self::Plain,
        }
    }
}

/// What to do with a recognized tag line that has no quoted value.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MalformedTagPolicy {
    /// Warn and leave the field untouched.
    #[default]
    Skip,
    Fail,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ParserConfig {
    pub compression: CompressionMode,
    pub malformed_tags: MalformedTagPolicy,
}

#[derive(Debug, Eq, PartialEq)]
enum LineKind {
    Tag,
    Moves,
    Other,
}

fn classify(line: &str) -> LineKind {
    if line.starts_with('[') || line.starts_with('{') {
        LineKind::Tag
    } else if line.starts_with(MOVE_LINE_PREFIX) {
        LineKind::Moves
    } else {
        LineKind::Other
    }
}

/// Key of a tag line: the first space-delimited token with `[` removed.
fn tag_key(line: &str) -> Option<TagKey> {
    let token = line.split(' ').next().unwrap_or_default();
    TagKey::from_name(&token.replace('[', ""))
}

/// Text between the first and second `"` of the line.
fn tag_value(line: &str) -> Option<&str> {
    let mut parts = line.split('"');
    parts.next()?;
    let value = parts.next()?;
    parts.next()?;
    Some(value)
}

fn open_input_stream(path: &Path, compression: CompressionMode) -> Result<PgnInput> {
    let file = File::open(path).map_err(|source| ParseError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    match compression {
        CompressionMode::Plain => Ok(Box::new(file)),
        CompressionMode::Zstd => ZstdDecoder::new(file)
            .map(|decoder| Box::new(decoder) as PgnInput)
            .map_err(|source| ParseError::Decoder {
                path: path.to_path_buf(),
                source,
            }),
    }
}

/// Single forward pass over a PGN source. Tag lines fill the current record;
/// each move line completes it and starts the next one.
pub struct Parser {
    input: BufReader<PgnInput>,
    config: ParserConfig,
    records: Vec<GameRecord>,
    current: GameRecord,
    line_number: usize,
}

impl Parser {
    pub fn new(input: impl Read + Send + 'static) -> Self {
        Self::with_config(input, ParserConfig::default())
    }

    pub fn with_config(input: impl Read + Send + 'static, config: ParserConfig) -> Self {
        Self {
            input: BufReader::new(Box::new(input)),
            config,
            records: Vec::new(),
            current: GameRecord::new(),
            line_number: 0,
        }
    }

    pub fn open(path: impl AsRef<Path>, config: &ParserConfig) -> Result<Self> {
        let input = open_input_stream(path.as_ref(), config.compression)?;
        Ok(Self::with_config(input, *config))
    }

    /// Reads the whole source and returns one record per move line, in
    /// source order. `patterns` are extra regexes removed from move lines.
    /// Tags after the last move line are discarded.
    pub fn parse<S: AsRef<str>>(self, patterns: &[S]) -> Result<Vec<GameRecord>> {
        let patterns = CleanupPatterns::compile(patterns)?;
        self.parse_with(&patterns)
    }

    pub fn parse_with(mut self, patterns: &CleanupPatterns) -> Result<Vec<GameRecord>> {
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if self.input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            self.line_number += 1;

            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\n', '\r']);
            self.process_line(line, patterns)?;
        }

        if self.current != GameRecord::default() {
            log::debug(format!(
                "Discarding trailing tags without a move line after line {}",
                self.line_number
            ));
        }

        Ok(self.records)
    }

    fn process_line(&mut self, line: &str, patterns: &CleanupPatterns) -> Result<()> {
        match classify(line) {
            LineKind::Tag => self.set_tag(line),
            LineKind::Moves => {
                self.set_moves(line, patterns);
                Ok(())
            }
            LineKind::Other => Ok(()),
        }
    }

    fn set_tag(&mut self, line: &str) -> Result<()> {
        let Some(key) = tag_key(line) else {
            return Ok(());
        };

        match tag_value(line) {
            Some(value) => {
                self.current.set(key, value);
                Ok(())
            }
            None => {
                let err = ParseError::MalformedTag {
                    line: self.line_number,
                    key: key.name(),
                };
                match self.config.malformed_tags {
                    MalformedTagPolicy::Skip => {
                        log::warn(err.to_string());
                        Ok(())
                    }
                    MalformedTagPolicy::Fail => {
                        log::error(err.to_string());
                        Err(err)
                    }
                }
            }
        }
    }

    fn set_moves(&mut self, line: &str, patterns: &CleanupPatterns) {
        self.current.moves = extract_moves(line, patterns);
        let record = mem::take(&mut self.current);
        log::debug(format!(
            "Sealed game {} at line {} with {} moves",
            self.records.len() + 1,
            self.line_number,
            record.moves.len()
        ));
        self.records.push(record);
    }
}

pub fn parse_file<S: AsRef<str>>(
    path: impl AsRef<Path>,
    patterns: &[S],
    config: &ParserConfig,
) -> Result<Vec<GameRecord>> {
    Parser::open(path, config)?.parse(patterns)
}

/// Parses every file matched by `pattern` (or the single path when it has
/// no `*`/`?`). With several files, ones that cannot be opened are skipped.
pub fn parse_glob<S: AsRef<str>>(
    pattern: &str,
    patterns: &[S],
    config: &ParserConfig,
) -> Result<Vec<GameRecord>> {
    let paths: Vec<PathBuf> = if pattern.contains('*') || pattern.contains('?') {
        glob::glob(pattern)?.filter_map(|entry| entry.ok()).collect()
    } else {
        vec![PathBuf::from(pattern)]
    };

    let patterns = CleanupPatterns::compile(patterns)?;

    let mut records = Vec::new();
    let mut open_errors = ErrorAccumulator::default();
    let mut opened = 0usize;

    for path in &paths {
        let parser = match Parser::open(path, config) {
            Ok(parser) => parser,
            Err(err) => {
                if paths.len() == 1 {
                    return Err(err);
                }
                log::warn(err.to_string());
                open_errors.push(&err.to_string());
                continue;
            }
        };
        opened += 1;
        records.extend(parser.parse_with(&patterns)?);
    }

    if opened == 0 && !open_errors.is_empty() {
        return Err(ParseError::Files(open_errors.take().unwrap_or_default()));
    }

    Ok(records)
}
