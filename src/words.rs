//! Word list parsing.
//!
//! One entry per line, `english,chinese`. A three-field line
//! `english,phonetic,chinese` is also accepted; the phonetic string travels
//! alongside the entry but is not part of [`WordEntry`] itself. Blank lines
//! are skipped; malformed lines are warned about and skipped.

use std::path::Path;

use anyhow::Context as _;
use tracing::warn;

use crate::error::LexicardResult;

/// One vocabulary pair. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordEntry {
    pub english: String,
    pub chinese: String,
}

/// A parsed word-list line: the entry plus an optional phonetic string
/// supplied separately from the pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordRecord {
    pub entry: WordEntry,
    pub phonetic: Option<String>,
}

pub fn parse_word_list(text: &str) -> Vec<WordRecord> {
    let mut records = Vec::new();
    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        let record = match parts.as_slice() {
            [english, chinese] if !english.is_empty() && !chinese.is_empty() => WordRecord {
                entry: WordEntry {
                    english: (*english).to_string(),
                    chinese: (*chinese).to_string(),
                },
                phonetic: None,
            },
            [english, phonetic, chinese, ..] if !english.is_empty() && !chinese.is_empty() => {
                WordRecord {
                    entry: WordEntry {
                        english: (*english).to_string(),
                        chinese: (*chinese).to_string(),
                    },
                    phonetic: (!phonetic.is_empty()).then(|| (*phonetic).to_string()),
                }
            }
            _ => {
                warn!(line = line_no + 1, text = %line, "skipping malformed word list line");
                continue;
            }
        };
        records.push(record);
    }
    records
}

pub fn load_word_list(path: &Path) -> LexicardResult<Vec<WordRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read word list '{}'", path.display()))?;
    Ok(parse_word_list(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_field_lines() {
        let records = parse_word_list("apple,苹果\nbook,书\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].entry.english, "apple");
        assert_eq!(records[0].entry.chinese, "苹果");
        assert_eq!(records[0].phonetic, None);
    }

    #[test]
    fn parses_three_field_lines_with_phonetic() {
        let records = parse_word_list("apple,/ˈæp.əl/,苹果");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].phonetic.as_deref(), Some("/ˈæp.əl/"));
        assert_eq!(records[0].entry.chinese, "苹果");
    }

    #[test]
    fn trims_whitespace_and_skips_blank_lines() {
        let records = parse_word_list("  apple , 苹果 \n\n\t\nbook,书");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].entry.english, "apple");
        assert_eq!(records[0].entry.chinese, "苹果");
    }

    #[test]
    fn skips_malformed_lines() {
        let records = parse_word_list("no-comma-here\napple,苹果\n,\n,missing");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].entry.english, "apple");
    }

    #[test]
    fn empty_phonetic_field_collapses_to_none() {
        let records = parse_word_list("apple,,苹果");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].phonetic, None);
    }

    #[test]
    fn empty_input_yields_no_records() {
        assert!(parse_word_list("").is_empty());
        assert!(parse_word_list("\n\n").is_empty());
    }
}
