//! Text statistics for raw document text.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Reading rate used for the reading time estimate.
pub const DEFAULT_WORDS_PER_MINUTE: usize = 200;

// Paragraph separator: a newline, optional whitespace, another newline
static RE_PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Counts derived from a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStats {
    /// Whitespace-delimited non-empty tokens
    pub words: usize,
    /// Characters (Unicode scalar values)
    pub characters: usize,
    /// Characters that are not whitespace
    pub characters_no_spaces: usize,
    /// `\n`-delimited segments; empty text is one line
    pub lines: usize,
    /// Non-empty blocks separated by blank lines
    pub paragraphs: usize,
    /// `ceil(words / rate)`, zero for empty text
    pub reading_time_minutes: usize,
}

impl TextStats {
    /// Analyzes text at the default reading rate.
    pub fn analyze(text: &str) -> Self {
        Self::analyze_with_rate(text, DEFAULT_WORDS_PER_MINUTE)
    }

    /// Analyzes text with a custom words-per-minute rate.
    ///
    /// A rate of zero is treated as one word per minute.
    pub fn analyze_with_rate(text: &str, words_per_minute: usize) -> Self {
        let words = text.split_whitespace().count();
        let characters = text.chars().count();
        let characters_no_spaces = text.chars().filter(|c| !c.is_whitespace()).count();
        let lines = text.split('\n').count();
        let paragraphs = RE_PARAGRAPH_BREAK
            .split(text)
            .filter(|p| !p.trim().is_empty())
            .count();

        Self {
            words,
            characters,
            characters_no_spaces,
            lines,
            paragraphs,
            reading_time_minutes: words.div_ceil(words_per_minute.max(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_text() {
        let stats = TextStats::analyze("");
        assert_eq!(
            stats,
            TextStats {
                words: 0,
                characters: 0,
                characters_no_spaces: 0,
                lines: 1,
                paragraphs: 0,
                reading_time_minutes: 0,
            }
        );
    }

    #[test]
    fn test_simple_words() {
        let stats = TextStats::analyze("a b c");
        assert_eq!(stats.words, 3);
        assert_eq!(stats.characters, 5);
        assert_eq!(stats.characters_no_spaces, 3);
        assert_eq!(stats.lines, 1);
        assert_eq!(stats.paragraphs, 1);
        assert_eq!(stats.reading_time_minutes, 1);
    }

    #[test]
    fn test_trailing_newline_counts_line() {
        assert_eq!(TextStats::analyze("one\n").lines, 2);
        assert_eq!(TextStats::analyze("one\ntwo\nthree").lines, 3);
    }

    #[test]
    fn test_paragraphs_blank_lines() {
        let text = "first para\nstill first\n\n  \n\nsecond\n\n\n";
        let stats = TextStats::analyze(text);
        assert_eq!(stats.paragraphs, 2);
    }

    #[test]
    fn test_reading_time_rounds_up() {
        let text = "word ".repeat(201);
        assert_eq!(TextStats::analyze(&text).reading_time_minutes, 2);
        let text = "word ".repeat(200);
        assert_eq!(TextStats::analyze(&text).reading_time_minutes, 1);
    }

    #[test]
    fn test_custom_rate() {
        let text = "word ".repeat(100);
        assert_eq!(TextStats::analyze_with_rate(&text, 50).reading_time_minutes, 2);
        assert_eq!(TextStats::analyze_with_rate(&text, 0).reading_time_minutes, 100);
    }

    #[test]
    fn test_unicode_characters() {
        let stats = TextStats::analyze("héllo 世界");
        assert_eq!(stats.characters, 8);
        assert_eq!(stats.characters_no_spaces, 7);
        assert_eq!(stats.words, 2);
    }

    #[test]
    fn test_serialized_field_names() {
        let value = serde_json::to_value(TextStats::analyze("a")).unwrap();
        assert!(value.get("charactersNoSpaces").is_some());
        assert!(value.get("readingTimeMinutes").is_some());
    }

    proptest! {
        #[test]
        fn prop_counts_are_consistent(text in "[a-zé \\n\\t]{0,200}") {
            let stats = TextStats::analyze(&text);
            prop_assert!(stats.characters_no_spaces <= stats.characters);
            prop_assert!(stats.words <= stats.characters_no_spaces);
            prop_assert!(stats.paragraphs <= stats.lines);
            prop_assert_eq!(stats.reading_time_minutes == 0, stats.words == 0);
        }
    }
}
