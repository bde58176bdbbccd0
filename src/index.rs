use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::tokenize::{line_tokens, normalize, tokens};

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("failed to read corpus: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a query produced no value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("\"{0}\" not found in text")]
    NotFound(String),
    #[error("{0}")]
    InvalidInput(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct WordCount {
    word: String,
    count: usize,
}

/// Occurrence counts per normalized word, in the order words were first seen.
#[derive(Debug, Clone, Default)]
pub struct FrequencyIndex {
    entries: Vec<WordCount>,
    slots: HashMap<String, usize>,
    total_tokens: usize,
}

impl FrequencyIndex {
    /// Count already-normalized tokens. Empty tokens are skipped.
    pub fn build<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut index = Self::default();
        for token in tokens {
            if token.is_empty() {
                continue;
            }
            index.total_tokens += 1;
            match index.slots.get(&token) {
                Some(&slot) => index.entries[slot].count += 1,
                None => {
                    index.slots.insert(token.clone(), index.entries.len());
                    index.entries.push(WordCount {
                        word: token,
                        count: 1,
                    });
                }
            }
        }
        index
    }

    /// Count for `word` after normalization, or `0` when it never occurs.
    pub fn frequency_of(&self, word: &str) -> usize {
        self.lookup(word).unwrap_or(0)
    }

    pub fn lookup(&self, word: &str) -> Result<usize, QueryError> {
        let normalized = normalize(word);
        if normalized.is_empty() {
            return Err(QueryError::InvalidInput("word must contain letters or digits"));
        }
        self.slots
            .get(&normalized)
            .map(|&slot| self.entries[slot].count)
            .ok_or(QueryError::NotFound(normalized))
    }

    /// Words whose count is strictly greater than `min_exclusive`, in
    /// encounter order. A negative threshold yields nothing.
    pub fn words_above_threshold(&self, min_exclusive: i64) -> Vec<&str> {
        self.try_words_above_threshold(min_exclusive)
            .unwrap_or_default()
    }

    pub fn try_words_above_threshold(&self, min_exclusive: i64) -> Result<Vec<&str>, QueryError> {
        let Ok(min) = usize::try_from(min_exclusive) else {
            return Err(QueryError::InvalidInput("threshold must be >= 0"));
        };
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.count > min)
            .map(|entry| entry.word.as_str())
            .collect())
    }

    /// Number of distinct words that occur more than once.
    pub fn repeated_word_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.count > 1).count()
    }

    pub fn total_tokens(&self) -> usize {
        self.total_tokens
    }

    pub fn distinct_words(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(word, count)` pairs in encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.entries
            .iter()
            .map(|entry| (entry.word.as_str(), entry.count))
    }
}

/// Words tied at the highest count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MostRepeated {
    pub count: usize,
    pub words: Vec<String>,
}

/// Every word whose count equals the maximum over the whole index.
///
/// The maximum is settled before any word is collected, so the result does
/// not depend on scan order. Words come back in encounter order.
pub fn max_words(index: &FrequencyIndex) -> MostRepeated {
    let Some(max) = index.iter().map(|(_, count)| count).max() else {
        return MostRepeated::default();
    };
    let words = index
        .iter()
        .filter(|(_, count)| *count == max)
        .map(|(word, _)| word.to_string())
        .collect();
    MostRepeated { count: max, words }
}

/// Distinct, ascending 1-based line numbers per normalized word.
#[derive(Debug, Clone, Default)]
pub struct LineOccurrenceIndex {
    lines: HashMap<String, Vec<usize>>,
    total_lines: usize,
}

impl LineOccurrenceIndex {
    /// Index `(line_number, tokens)` pairs. Line numbers start at 1; a line
    /// numbered 0 is ignored.
    pub fn build<I>(lines_of_tokens: I) -> Self
    where
        I: IntoIterator<Item = (usize, Vec<String>)>,
    {
        let mut index = Self::default();
        for (line_no, words) in lines_of_tokens {
            if line_no == 0 {
                warn!("ignoring tokens on line 0");
                continue;
            }
            index.total_lines = index.total_lines.max(line_no);
            for word in words {
                if word.is_empty() {
                    continue;
                }
                let seen = index.lines.entry(word).or_default();
                if seen.last() != Some(&line_no) {
                    seen.push(line_no);
                }
            }
        }
        for seen in index.lines.values_mut() {
            if !seen.is_sorted() {
                seen.sort_unstable();
                seen.dedup();
            }
        }
        index
    }

    /// Lines containing `word` after normalization; empty when absent.
    pub fn lines_containing(&self, word: &str) -> &[usize] {
        self.lines
            .get(&normalize(word))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn count_lines_containing(&self, word: &str) -> usize {
        self.lines_containing(word).len()
    }

    pub fn total_lines(&self) -> usize {
        self.total_lines
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineMatches {
    pub count: usize,
    pub lines: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CorpusStats {
    pub total_tokens: usize,
    pub distinct_words: usize,
    pub total_lines: usize,
    pub repeated_words: usize,
}

/// Frequency and line indexes built from one corpus.
#[derive(Debug, Clone, Default)]
pub struct TextIndex {
    frequencies: FrequencyIndex,
    lines: LineOccurrenceIndex,
}

impl TextIndex {
    pub fn from_text(text: &str) -> Self {
        let frequencies = FrequencyIndex::build(tokens(text));
        let lines = LineOccurrenceIndex::build(line_tokens(text));
        debug!(
            "indexed {} tokens ({} distinct) over {} lines",
            frequencies.total_tokens(),
            frequencies.distinct_words(),
            lines.total_lines()
        );
        Self { frequencies, lines }
    }

    pub fn build_from_file<P: AsRef<Path>>(path: P) -> Result<Arc<Self>, IndexError> {
        let path_ref = path.as_ref();
        let text = fs::read_to_string(path_ref)?;
        let index = Self::from_text(&text);

        let stats = index.stats();
        if stats.total_tokens == 0 {
            warn!("corpus {} contains no indexable words", path_ref.display());
        }
        info!("total lines read: {}", stats.total_lines);
        info!(
            "total words indexed: {} ({} distinct)",
            stats.total_tokens, stats.distinct_words
        );
        Ok(Arc::new(index))
    }

    pub fn frequencies(&self) -> &FrequencyIndex {
        &self.frequencies
    }

    pub fn lines(&self) -> &LineOccurrenceIndex {
        &self.lines
    }

    pub fn frequency_of(&self, word: &str) -> usize {
        self.frequencies.frequency_of(word)
    }

    pub fn lookup(&self, word: &str) -> Result<usize, QueryError> {
        self.frequencies.lookup(word)
    }

    pub fn words_above_threshold(&self, min: i64) -> Vec<&str> {
        self.frequencies.words_above_threshold(min)
    }

    pub fn try_words_above_threshold(&self, min: i64) -> Result<Vec<&str>, QueryError> {
        self.frequencies.try_words_above_threshold(min)
    }

    pub fn total_words_repeated_more_than_once(&self) -> usize {
        self.frequencies.repeated_word_count()
    }

    pub fn most_repeated_words(&self) -> MostRepeated {
        max_words(&self.frequencies)
    }

    pub fn lines_containing(&self, word: &str) -> LineMatches {
        let lines = self.lines.lines_containing(word).to_vec();
        LineMatches {
            count: lines.len(),
            lines,
        }
    }

    /// Like [`TextIndex::lines_containing`], but rejects a query word that
    /// normalizes to nothing.
    pub fn try_lines_containing(&self, word: &str) -> Result<LineMatches, QueryError> {
        if normalize(word).is_empty() {
            return Err(QueryError::InvalidInput("word must contain letters or digits"));
        }
        Ok(self.lines_containing(word))
    }

    pub fn stats(&self) -> CorpusStats {
        CorpusStats {
            total_tokens: self.frequencies.total_tokens(),
            distinct_words: self.frequencies.distinct_words(),
            total_lines: self.lines.total_lines(),
            repeated_words: self.frequencies.repeated_word_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SCENARIO: &str = "The cat sat.\nThe cat ran.";

    fn make_index(lines: &[&str]) -> Arc<TextIndex> {
        let mut file = NamedTempFile::new().expect("temp file");
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        TextIndex::build_from_file(file.path()).expect("build index")
    }

    #[test]
    fn answers_the_cat_scenario() {
        let index = TextIndex::from_text(SCENARIO);
        assert_eq!(index.frequency_of("the"), 2);
        assert_eq!(index.frequency_of("cat"), 2);
        assert_eq!(index.frequency_of("sat"), 1);
        assert_eq!(
            index.most_repeated_words(),
            MostRepeated {
                count: 2,
                words: vec!["the".to_string(), "cat".to_string()],
            }
        );
        assert_eq!(
            index.lines_containing("cat"),
            LineMatches {
                count: 2,
                lines: vec![1, 2],
            }
        );
        assert_eq!(
            index.lines_containing("ran"),
            LineMatches {
                count: 1,
                lines: vec![2],
            }
        );
        assert_eq!(index.total_words_repeated_more_than_once(), 2);
    }

    #[test]
    fn builds_from_file() {
        let index = make_index(&["The cat sat.", "The cat ran."]);
        assert_eq!(index.frequency_of("The"), 2);
        assert_eq!(index.lines_containing("ran").lines, vec![2]);
        assert_eq!(index.stats().total_lines, 2);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TextIndex::build_from_file(dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, IndexError::Io(_)));
    }

    #[test]
    fn absent_words_are_zero_and_empty() {
        let index = TextIndex::from_text(SCENARIO);
        assert_eq!(index.frequency_of("dog"), 0);
        assert_eq!(index.lines_containing("dog"), LineMatches::default());
        assert_eq!(
            index.lookup("dog"),
            Err(QueryError::NotFound("dog".to_string()))
        );
    }

    #[test]
    fn empty_query_word_is_invalid_input() {
        let index = TextIndex::from_text(SCENARIO);
        assert_eq!(index.frequency_of("..."), 0);
        assert!(matches!(index.lookup("..."), Err(QueryError::InvalidInput(_))));
        assert!(matches!(
            index.try_lines_containing(""),
            Err(QueryError::InvalidInput(_))
        ));
    }

    #[test]
    fn query_words_are_normalized() {
        let index = TextIndex::from_text(SCENARIO);
        assert_eq!(index.frequency_of("Cat."), index.frequency_of("cat"));
        assert_eq!(index.lines_containing("CAT!"), index.lines_containing("cat"));
    }

    #[test]
    fn multi_word_queries_never_match_a_joined_token() {
        let index = TextIndex::from_text("thecat sat\n");
        assert_eq!(index.frequency_of("thecat"), 1);
        assert_eq!(index.frequency_of("the cat"), 0);
        assert_eq!(
            index.lookup("the cat"),
            Err(QueryError::NotFound("the cat".to_string()))
        );
        assert_eq!(index.lines_containing("the cat"), LineMatches::default());
        assert_eq!(
            index.try_lines_containing("the cat"),
            Ok(LineMatches::default())
        );
        assert_eq!(index.lines().count_lines_containing("the cat"), 0);
    }

    #[test]
    fn surrounding_whitespace_in_queries_is_ignored() {
        let index = TextIndex::from_text(SCENARIO);
        assert_eq!(index.frequency_of(" cat "), 2);
        assert_eq!(index.frequency_of("\tCat.\n"), 2);
        assert_eq!(index.lines_containing(" cat ").lines, vec![1, 2]);
        assert_eq!(index.try_lines_containing(" ran ").map(|m| m.lines), Ok(vec![2]));
        assert!(matches!(
            index.try_lines_containing("  "),
            Err(QueryError::InvalidInput(_))
        ));
    }

    #[test]
    fn counts_sum_to_token_total() {
        let text = "a b, b. c c c -- !!\n\nA d";
        let index = TextIndex::from_text(text);
        let sum: usize = index.frequencies().iter().map(|(_, count)| count).sum();
        assert_eq!(sum, index.stats().total_tokens);
        assert_eq!(sum, 8);
        assert!(index.frequencies().iter().all(|(word, _)| !word.is_empty()));
    }

    #[test]
    fn threshold_is_strict_and_in_encounter_order() {
        let index = TextIndex::from_text("b a b c a b");
        assert_eq!(index.words_above_threshold(0), vec!["b", "a", "c"]);
        assert_eq!(index.words_above_threshold(1), vec!["b", "a"]);
        assert_eq!(index.words_above_threshold(2), vec!["b"]);
        assert!(index.words_above_threshold(3).is_empty());
        for t in 0..4 {
            let expected: Vec<&str> = index
                .frequencies()
                .iter()
                .filter(|(_, count)| *count as i64 > t)
                .map(|(word, _)| word)
                .collect();
            assert_eq!(index.words_above_threshold(t), expected);
        }
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let index = TextIndex::from_text("a b");
        assert!(index.words_above_threshold(-1).is_empty());
        assert!(matches!(
            index.try_words_above_threshold(-5),
            Err(QueryError::InvalidInput(_))
        ));
    }

    #[test]
    fn max_words_reports_ties_regardless_of_order() {
        // "x" leads early and is overtaken; "z" only ever ties.
        let index = FrequencyIndex::build(
            ["x", "x", "y", "y", "y", "z", "z", "z"]
                .into_iter()
                .map(String::from),
        );
        let most = max_words(&index);
        assert_eq!(most.count, 3);
        assert_eq!(most.words, vec!["y", "z"]);
    }

    #[test]
    fn max_words_boundaries() {
        let empty = FrequencyIndex::build(Vec::<String>::new());
        assert_eq!(max_words(&empty), MostRepeated::default());

        let single = FrequencyIndex::build(vec!["solo".to_string(), "solo".to_string()]);
        assert_eq!(
            max_words(&single),
            MostRepeated {
                count: 2,
                words: vec!["solo".to_string()],
            }
        );
    }

    #[test]
    fn line_sets_are_distinct_and_ascending() {
        let index = TextIndex::from_text("cat cat cat\ndog\ncat dog cat\n\ncat");
        let cat = index.lines_containing("cat");
        assert_eq!(cat.lines, vec![1, 3, 5]);
        assert_eq!(cat.count, index.lines().count_lines_containing("cat"));
        assert!(cat.lines.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(cat.lines.iter().all(|&line| line >= 1 && line <= index.lines().total_lines()));
    }

    #[test]
    fn line_index_sorts_out_of_order_input() {
        let index = LineOccurrenceIndex::build(vec![
            (3, vec!["a".to_string()]),
            (1, vec!["a".to_string(), "a".to_string()]),
            (3, vec!["a".to_string()]),
            (0, vec!["b".to_string()]),
        ]);
        assert_eq!(index.lines_containing("a"), &[1, 3]);
        assert!(index.lines_containing("b").is_empty());
        assert_eq!(index.total_lines(), 3);
    }

    #[test]
    fn empty_corpus_has_empty_results() {
        let index = TextIndex::from_text("");
        assert_eq!(index.stats().total_tokens, 0);
        assert!(index.frequencies().is_empty());
        assert!(index.most_repeated_words().words.is_empty());
        assert!(index.words_above_threshold(0).is_empty());
        assert_eq!(index.total_words_repeated_more_than_once(), 0);
    }
}
