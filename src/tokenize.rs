/// Lowercase `raw` and drop punctuation, i.e. every character that is neither
/// alphanumeric nor whitespace. Surrounding whitespace is trimmed.
///
/// Applying it twice gives the same result as applying it once, so query
/// words and indexed tokens can share it. Internal whitespace survives, so a
/// multi-word query never matches a single indexed token.
pub fn normalize(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    for c in raw.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() || c.is_whitespace() {
            normalized.push(c);
        }
    }
    let trimmed = normalized.trim();
    if trimmed.len() == normalized.len() {
        normalized
    } else {
        trimmed.to_string()
    }
}

/// Normalize a single token, returning `None` when nothing is left.
pub fn normalize_token(raw: &str) -> Option<String> {
    let normalized = normalize(raw);
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Whitespace-delimited, normalized tokens of the whole text.
pub fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().filter_map(normalize_token)
}

/// Normalized tokens per line, paired with the 1-based line number.
///
/// Blank lines are still yielded (with no tokens) so numbering follows the
/// source text.
pub fn line_tokens(text: &str) -> impl Iterator<Item = (usize, Vec<String>)> + '_ {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, tokens(line).collect()))
}
