use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Signature of a custom matcher predicate.
///
/// Receives the stringified candidate cell, its column index, and the full
/// stringified row.
pub type PredicateFn = dyn Fn(&str, usize, &[String]) -> bool + Send + Sync;

/// How a sheet name or header cell is recognised.
///
/// Closed tagged variant resolved once at spec-construction time; matching
/// itself never allocates or recompiles.
#[derive(Clone)]
pub enum Matcher {
    /// Exact string equality against the stringified candidate.
    Exact(String),
    /// Regex test against the stringified candidate.
    Pattern(Regex),
    /// Arbitrary predicate over (candidate, index, row).
    Predicate(Arc<PredicateFn>),
}

impl Matcher {
    pub fn exact(text: impl Into<String>) -> Self {
        Matcher::Exact(text.into())
    }

    pub fn pattern(pattern: Regex) -> Self {
        Matcher::Pattern(pattern)
    }

    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&str, usize, &[String]) -> bool + Send + Sync + 'static,
    {
        Matcher::Predicate(Arc::new(predicate))
    }

    /// Test a stringified candidate at `index` within `row`.
    pub fn matches(&self, text: &str, index: usize, row: &[String]) -> bool {
        match self {
            Matcher::Exact(expected) => text == expected,
            Matcher::Pattern(pattern) => pattern.is_match(text),
            Matcher::Predicate(predicate) => predicate(text, index, row),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Exact(text) => f.debug_tuple("Exact").field(text).finish(),
            Matcher::Pattern(pattern) => f.debug_tuple("Pattern").field(&pattern.as_str()).finish(),
            Matcher::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl From<&str> for Matcher {
    fn from(text: &str) -> Self {
        Matcher::exact(text)
    }
}

impl From<String> for Matcher {
    fn from(text: String) -> Self {
        Matcher::Exact(text)
    }
}

impl From<Regex> for Matcher {
    fn from(pattern: Regex) -> Self {
        Matcher::Pattern(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn exact_matches_whole_string() {
        let matcher = Matcher::exact("ID");
        let cells = row(&["ID", "IDX"]);
        assert!(matcher.matches("ID", 0, &cells));
        assert!(!matcher.matches("IDX", 1, &cells));
        assert!(!matcher.matches("id", 0, &cells));
    }

    #[test]
    fn pattern_matches_substring() {
        let matcher = Matcher::pattern(Regex::new(r"(?i)word.?count.?target").unwrap());
        let cells = row(&["Word Count Target"]);
        assert!(matcher.matches("Word Count Target", 0, &cells));
        assert!(!matcher.matches("Word Target", 0, &cells));
    }

    #[test]
    fn predicate_sees_index_and_row() {
        let matcher = Matcher::predicate(|text, index, row| {
            index == 1 && text == "B" && row.first().is_some_and(|c| c == "A")
        });
        let cells = row(&["A", "B"]);
        assert!(matcher.matches("B", 1, &cells));
        assert!(!matcher.matches("B", 0, &cells));
    }
}
