use serde_json::{Map, Value};
use std::fmt;
use std::fmt::Write as _;

pub const TAG_COUNT: usize = 19;

/// Tag names recognized in a game header, in canonical order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TagKey {
    Event = 0,
    Site = 1,
    White = 2,
    Black = 3,
    Result = 4,
    Annotator = 5,
    PlyCount = 6,
    Date = 7,
    UtcDate = 8,
    UtcTime = 9,
    WhiteElo = 10,
    BlackElo = 11,
    WhiteRatingDiff = 12,
    BlackRatingDiff = 13,
    Eco = 14,
    Opening = 15,
    TimeControl = 16,
    Time = 17,
    Termination = 18,
}

impl TagKey {
    pub const ALL: [TagKey; TAG_COUNT] = [
        TagKey::Event,
        TagKey::Site,
        TagKey::White,
        TagKey::Black,
        TagKey::Result,
        TagKey::Annotator,
        TagKey::PlyCount,
        TagKey::Date,
        TagKey::UtcDate,
        TagKey::UtcTime,
        TagKey::WhiteElo,
        TagKey::BlackElo,
        TagKey::WhiteRatingDiff,
        TagKey::BlackRatingDiff,
        TagKey::Eco,
        TagKey::Opening,
        TagKey::TimeControl,
        TagKey::Time,
        TagKey::Termination,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// The tag name as written in PGN headers.
    pub fn name(self) -> &'static str {
        TAG_NAMES[self.index()]
    }

    /// Exact, case-sensitive lookup of a header name.
    pub fn from_name(name: &str) -> Option<Self> {
        TAG_NAMES
            .iter()
            .position(|candidate| *candidate == name)
            .map(|idx| Self::ALL[idx])
    }
}

const TAG_NAMES: [&str; TAG_COUNT] = [
    "Event",
    "Site",
    "White",
    "Black",
    "Result",
    "Annotator",
    "PlyCount",
    "Date",
    "UTCDate",
    "UTCTime",
    "WhiteElo",
    "BlackElo",
    "WhiteRatingDiff",
    "BlackRatingDiff",
    "ECO",
    "Opening",
    "TimeControl",
    "Time",
    "Termination",
];

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One parsed game: the recognized header tags plus the move tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameRecord {
    // Core game info
    pub event: Option<String>,
    pub site: Option<String>,
    pub white: Option<String>,
    pub black: Option<String>,
    pub result: Option<String>,
    pub annotator: Option<String>,
    pub ply_count: Option<String>,

    // Date/Time
    pub date: Option<String>,
    pub utc_date: Option<String>,
    pub utc_time: Option<String>,

    // Player info
    pub white_elo: Option<String>,
    pub black_elo: Option<String>,
    pub white_rating_diff: Option<String>,
    pub black_rating_diff: Option<String>,

    // Opening info
    pub eco: Option<String>,
    pub opening: Option<String>,

    // Game details
    pub time_control: Option<String>,
    pub time: Option<String>,
    pub termination: Option<String>,

    pub moves: Vec<String>,
}

impl GameRecord {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: TagKey) -> &Option<String> {
        match key {
            TagKey::Event => &self.event,
            TagKey::Site => &self.site,
            TagKey::White => &self.white,
            TagKey::Black => &self.black,
            TagKey::Result => &self.result,
            TagKey::Annotator => &self.annotator,
            TagKey::PlyCount => &self.ply_count,
            TagKey::Date => &self.date,
            TagKey::UtcDate => &self.utc_date,
            TagKey::UtcTime => &self.utc_time,
            TagKey::WhiteElo => &self.white_elo,
            TagKey::BlackElo => &self.black_elo,
            TagKey::WhiteRatingDiff => &self.white_rating_diff,
            TagKey::BlackRatingDiff => &self.black_rating_diff,
            TagKey::Eco => &self.eco,
            TagKey::Opening => &self.opening,
            TagKey::TimeControl => &self.time_control,
            TagKey::Time => &self.time,
            TagKey::Termination => &self.termination,
        }
    }

    fn slot_mut(&mut self, key: TagKey) -> &mut Option<String> {
        match key {
            TagKey::Event => &mut self.event,
            TagKey::Site => &mut self.site,
            TagKey::White => &mut self.white,
            TagKey::Black => &mut self.black,
            TagKey::Result => &mut self.result,
            TagKey::Annotator => &mut self.annotator,
            TagKey::PlyCount => &mut self.ply_count,
            TagKey::Date => &mut self.date,
            TagKey::UtcDate => &mut self.utc_date,
            TagKey::UtcTime => &mut self.utc_time,
            TagKey::WhiteElo => &mut self.white_elo,
            TagKey::BlackElo => &mut self.black_elo,
            TagKey::WhiteRatingDiff => &mut self.white_rating_diff,
            TagKey::BlackRatingDiff => &mut self.black_rating_diff,
            TagKey::Eco => &mut self.eco,
            TagKey::Opening => &mut self.opening,
            TagKey::TimeControl => &mut self.time_control,
            TagKey::Time => &mut self.time,
            TagKey::Termination => &mut self.termination,
        }
    }

    pub fn get(&self, key: TagKey) -> Option<&str> {
        self.slot(key).as_deref()
    }

    /// Overwrites the tag; a later occurrence of the same tag wins.
    pub fn set(&mut self, key: TagKey, value: impl Into<String>) {
        *self.slot_mut(key) = Some(value.into());
    }

    /// All tags (canonical order) followed by `moves`.
    pub fn as_mapping(&self) -> Map<String, Value> {
        let mut map = Map::with_capacity(TAG_COUNT + 1);
        for key in TagKey::ALL {
            let value = match self.get(key) {
                Some(v) => Value::String(v.to_string()),
                None => Value::Null,
            };
            map.insert(key.name().to_string(), value);
        }
        map.insert(
            "moves".to_string(),
            Value::Array(self.moves.iter().cloned().map(Value::String).collect()),
        );
        map
    }

    /// Moves grouped per turn, `"e4 e5"`. A trailing unpaired move is dropped.
    pub fn paired_moves(&self) -> Vec<String> {
        self.moves
            .chunks_exact(2)
            .map(|pair| format!("{} {}", pair[0], pair[1]))
            .collect()
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, token: &str) -> fmt::Result {
    let quote = if token.contains('\'') && !token.contains('"') {
        '"'
    } else {
        '\''
    };

    f.write_char(quote)?;
    for ch in token.chars() {
        if ch == quote || ch == '\\' {
            f.write_char('\\')?;
        }
        f.write_char(ch)?;
    }
    f.write_char(quote)
}

/// Golden-file format: every tag in canonical order (`None` when absent)
/// and then the move list as `['e4', 'e5']`, separated by single spaces.
impl fmt::Display for GameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for key in TagKey::ALL {
            f.write_str(self.get(key).unwrap_or("None"))?;
            f.write_char(' ')?;
        }

        f.write_char('[')?;
        for (idx, token) in self.moves.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write_quoted(f, token)?;
        }
        f.write_char(']')
    }
}
