//! Single-edit spelling candidates over a vocabulary of known names

use std::collections::{BTreeSet, HashSet};

/// Alphabet used for replacements and insertions. Space and hyphen are
/// included so missing separators count as single edits.
const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz -";

/// Finds known names one edit away from a query string.
#[derive(Debug, Clone)]
pub struct Speller {
    vocabulary: HashSet<String>,
}

impl Speller {
    pub fn new<I, S>(vocabulary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vocabulary: vocabulary.into_iter().map(Into::into).collect(),
        }
    }

    /// Vocabulary entries exactly one edit from `query`, excluding the query
    /// itself. Sorted for deterministic iteration.
    pub fn candidates(&self, query: &str) -> BTreeSet<String> {
        edits1(query)
            .into_iter()
            .filter(|edit| edit != query && self.vocabulary.contains(edit))
            .collect()
    }
}

fn edits1(word: &str) -> HashSet<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut edits = HashSet::new();

    for i in 0..chars.len() {
        let mut deleted = chars.clone();
        deleted.remove(i);
        edits.insert(deleted.into_iter().collect());
    }
    for i in 0..chars.len().saturating_sub(1) {
        let mut transposed = chars.clone();
        transposed.swap(i, i + 1);
        edits.insert(transposed.into_iter().collect());
    }
    for c in ALPHABET.chars() {
        for i in 0..chars.len() {
            let mut replaced = chars.clone();
            replaced[i] = c;
            edits.insert(replaced.into_iter().collect());
        }
        for i in 0..=chars.len() {
            let mut inserted = chars.clone();
            inserted.insert(i, c);
            edits.insert(inserted.into_iter().collect());
        }
    }
    edits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_one_edit_away() {
        let speller = Speller::new(["john doe", "jane doe"]);
        let candidates = speller.candidates("jon doe");
        assert_eq!(candidates.into_iter().collect::<Vec<_>>(), vec!["john doe"]);
    }

    #[test]
    fn test_candidates_exclude_query() {
        let speller = Speller::new(["john doe", "jon doe"]);
        let candidates = speller.candidates("jon doe");
        assert!(!candidates.contains("jon doe"));
        assert!(candidates.contains("john doe"));
    }

    #[test]
    fn test_transposition_is_one_edit() {
        let speller = Speller::new(["ann smith"]);
        assert!(speller.candidates("ann smiht").contains("ann smith"));
    }

    #[test]
    fn test_missing_separator_is_one_edit() {
        let speller = Speller::new(["ann smith"]);
        assert!(speller.candidates("annsmith").contains("ann smith"));
    }

    #[test]
    fn test_distant_names_are_not_candidates() {
        let speller = Speller::new(["karen white"]);
        assert!(speller.candidates("jon doe").is_empty());
    }
}
