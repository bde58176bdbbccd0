//! Human-readable sentences for query results.

use crate::index::{LineMatches, MostRepeated, QueryError};

pub fn frequency(word: &str, result: &Result<usize, QueryError>) -> String {
    match result {
        Ok(count) => format!("The frequency of the word \"{word}\" is: {count}"),
        Err(QueryError::NotFound(_)) => format!("\"{word}\" not found in text file"),
        Err(QueryError::InvalidInput(reason)) => format!("Invalid word \"{word}\": {reason}"),
    }
}

pub fn words_above(min: i64, result: &Result<Vec<&str>, QueryError>) -> String {
    match result {
        Ok(words) => format!(
            "The list of words that have frequency greater than {min}: {}",
            words.join(" ")
        ),
        Err(err) => format!("Invalid frequency {min}: {err}"),
    }
}

pub fn repeated_total(total: usize) -> String {
    format!("Total number of words repeated more than once: {total}")
}

pub fn most_repeated(most: &MostRepeated) -> String {
    format!(
        "The most repeated word(s) in the file are: {}",
        most.words.join(" ")
    )
}

pub fn lines(word: &str, matches: &LineMatches) -> String {
    let numbers: Vec<String> = matches.lines.iter().map(ToString::to_string).collect();
    format!(
        "The word \"{word}\" appears on {} line(s) total. The line number(s): {}",
        matches.count,
        numbers.join(" ")
    )
}
