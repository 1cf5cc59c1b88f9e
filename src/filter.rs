use crate::error::{ParseError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Evaluation runs (`%eval`, `-0.09`, ...), single braces/brackets and move
/// numbers (`1.`, `23.`, `4...`). Alternatives are tried left to right at
/// every position.
static ANNOTATIONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\d.%eval]{4,}|[{}\[\]]|[\d.]{2,}").unwrap());

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Final tokens treated as the game outcome, including O/o typos for 0.
pub const RESULT_MARKERS: [&str; 9] = [
    "0-1", "1-0", "0-0", "O-1", "1-O", "O-O", "o-1", "1-o", "o-o",
];

pub fn is_result_marker(token: &str) -> bool {
    RESULT_MARKERS.contains(&token)
}

/// Caller-supplied removal patterns for comment styles the built-in pass
/// does not cover. Applied in the order given.
#[derive(Debug, Clone, Default)]
pub struct CleanupPatterns(Vec<Regex>);

impl CleanupPatterns {
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        patterns
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(pattern).map_err(|source| ParseError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn apply(&self, mut text: String) -> String {
        for regex in &self.0 {
            if regex.is_match(&text) {
                text = regex.replace_all(&text, "").into_owned();
            }
        }
        text
    }
}

/// Strips annotations, move numbers and the trailing result from a move
/// line and returns the remaining move tokens in order.
pub fn extract_moves(line: &str, patterns: &CleanupPatterns) -> Vec<String> {
    let stripped = ANNOTATIONS.replace_all(line, "");
    let collapsed = WHITESPACE.replace_all(&stripped, " ").into_owned();
    let cleaned = patterns.apply(collapsed);

    let mut tokens: Vec<String> = cleaned.split_whitespace().map(str::to_string).collect();
    if tokens.last().is_some_and(|last| is_result_marker(last)) {
        tokens.pop();
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(line: &str) -> Vec<String> {
        extract_moves(line, &CleanupPatterns::default())
    }

    #[test]
    fn test_extract_lichess_eval_line() {
        let line = "1. e4 { [%eval 0.2] } e5 2. Nf3 Nc6 1-0\n";
        assert_eq!(extract(line), vec!["e4", "e5", "Nf3", "Nc6"]);
    }

    #[test]
    fn test_extract_negative_eval_and_black_move_numbers() {
        let line = "1. d4 { [%eval -0.09] } 1... d5 { [%eval 0.13] } 2. c4 0-1";
        assert_eq!(extract(line), vec!["d4", "d5", "c4"]);
    }

    #[test]
    fn test_extract_without_result_marker() {
        assert_eq!(extract("1. e4 e5"), vec!["e4", "e5"]);
    }

    #[test]
    fn test_extract_drops_every_result_marker() {
        for marker in RESULT_MARKERS {
            let line = format!("1. e4 e5 2. Nf3 {marker}");
            assert_eq!(extract(&line), vec!["e4", "e5", "Nf3"], "marker {marker}");
        }
    }

    #[test]
    fn test_extract_only_drops_final_marker() {
        assert_eq!(extract("1. e4 1-0 e5"), vec!["e4", "1-0", "e5"]);
    }

    #[test]
    fn test_extract_draw_marker_is_kept() {
        assert_eq!(extract("1. e4 e5 1/2-1/2"), vec!["e4", "e5", "1/2-1/2"]);
    }

    #[test]
    fn test_extract_multi_digit_move_numbers() {
        let line = "23. Qxd5 Rxd5 24... Kh8 105. a8=Q";
        assert_eq!(extract(line), vec!["Qxd5", "Rxd5", "Kh8", "a8=Q"]);
    }

    #[test]
    fn test_extract_clock_comments_need_custom_pattern() {
        let line = "1. e4 { [%clk 0:03:00] } e5 { [%clk 0:02:58] } 1-0";
        assert_eq!(
            extract(line),
            vec!["e4", "%clk", "0::", "e5", "%clk", "0::"]
        );

        let patterns = CleanupPatterns::compile(&[r"%clk \S+"]).unwrap();
        assert_eq!(extract_moves(line, &patterns), vec!["e4", "e5"]);
    }

    #[test]
    fn test_custom_patterns_apply_in_order() {
        let patterns = CleanupPatterns::compile(&["xx", "ax"]).unwrap();
        // "axxx" -> "ax" after the first pattern -> "" after the second.
        assert_eq!(extract_moves("1. axxx e4", &patterns), vec!["e4"]);
        assert_eq!(patterns.len(), 2);
    }

    #[test]
    fn test_invalid_custom_pattern() {
        let err = CleanupPatterns::compile(&["(unclosed"]).unwrap_err();
        match err {
            ParseError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "(unclosed"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_extract_empty_after_cleanup() {
        assert!(extract("1. {} 2.").is_empty());
        assert!(extract("1.").is_empty());
    }

    #[test]
    fn test_extract_is_idempotent() {
        let lines = [
            "1. e4 { [%eval 0.2] } e5 2. Nf3 Nc6 1-0",
            "1. d4 { [%eval -0.09] } 1... Nf6 2. c4 e6 3. Nc3 Bb4 0-1",
            "1. e4 c5 2. Nf3 d6 3. d4 cxd4 4. Nxd4 Nf6 5. Nc3 a6",
        ];
        for line in lines {
            let once = extract(line);
            let twice = extract(&once.join(" "));
            assert_eq!(once, twice, "line {line}");
        }
    }

    #[test]
    fn test_is_result_marker() {
        assert!(is_result_marker("1-0"));
        assert!(is_result_marker("o-o"));
        assert!(!is_result_marker("1/2-1/2"));
        assert!(!is_result_marker("*"));
    }
}
