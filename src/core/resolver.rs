//! Identifier lookup with fuzzy "did you mean" suggestions.
//!
//! Lookups are exact and case-sensitive. Suggestions use the Ratcliff/Obershelp
//! similarity: twice the number of characters in the recursively found longest
//! common blocks, divided by the combined length of both strings.

use crate::domain::model::Keyed;
use crate::utils::error::{RationError, RecordKind, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const DEFAULT_MAX_SUGGESTIONS: usize = 3;
pub const DEFAULT_SIMILARITY_CUTOFF: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchSettings {
    pub max_suggestions: usize,
    pub similarity_cutoff: f64,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            similarity_cutoff: DEFAULT_SIMILARITY_CUTOFF,
        }
    }
}

/// Returns the first row whose key equals `target`, or `NotFound` with suggestions.
pub fn resolve<'a, T: Keyed>(
    target: &str,
    rows: &'a [T],
    kind: RecordKind,
    settings: &MatchSettings,
) -> Result<&'a T> {
    if let Some(row) = rows.iter().find(|row| row.key() == target) {
        return Ok(row);
    }

    let mut seen = HashSet::new();
    let keys: Vec<&str> = rows
        .iter()
        .map(Keyed::key)
        .filter(|key| seen.insert(*key))
        .collect();
    let suggestions = close_matches(
        target,
        &keys,
        settings.max_suggestions,
        settings.similarity_cutoff,
    );

    tracing::debug!(
        "{} ID '{}' not found, {} suggestion(s)",
        kind,
        target,
        suggestions.len()
    );

    Err(RationError::NotFound {
        kind,
        id: target.to_string(),
        suggestions,
    })
}

/// Best `n` candidates scoring at least `cutoff`, most similar first.
/// Equal scores are ordered by the candidate string, larger first.
pub fn close_matches(word: &str, candidates: &[&str], n: usize, cutoff: f64) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(f64, &str)> = candidates
        .iter()
        .map(|candidate| (similarity(candidate, word), *candidate))
        .filter(|(score, _)| *score >= cutoff)
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| b.1.cmp(a.1)));
    scored.truncate(n);
    scored
        .into_iter()
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}

/// Similarity in `[0, 1]`; two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_characters(&a, &b) as f64 / total as f64
}

fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matched += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]`. Among equally long
/// blocks the one starting earliest in `a`, then earliest in `b`, wins.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // run[j + 1] = length of the match ending at a[i - 1], b[j]
    let mut run = vec![0usize; b.len() + 1];

    for i in alo..ahi {
        let mut next = vec![0usize; b.len() + 1];
        for j in blo..bhi {
            if a[i] != b[j] {
                continue;
            }
            let k = run[j] + 1;
            next[j + 1] = k;
            if k > best_size {
                best_i = i + 1 - k;
                best_j = j + 1 - k;
                best_size = k;
            }
        }
        run = next;
    }

    (best_i, best_j, best_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[derive(Debug)]
    struct Row(&'static str, u32);

    impl Keyed for Row {
        fn key(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_similarity_matches_known_values() {
        assert_relative_eq!(similarity("abcd", "bcde"), 0.75);
        assert_relative_eq!(similarity("XYZ", "XYZ1"), 6.0 / 7.0);
        assert_relative_eq!(similarity("apple", "apple"), 1.0);
        assert_relative_eq!(similarity("", ""), 1.0);
        assert_relative_eq!(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_similarity_uses_recursive_blocks() {
        // "qabxcd" vs "abycdf": blocks "ab" and "cd"
        assert_relative_eq!(similarity("qabxcd", "abycdf"), 8.0 / 12.0);
    }

    #[test]
    fn test_close_matches_orders_and_limits() {
        let candidates = ["ape", "apple", "peach", "puppy"];
        assert_eq!(
            close_matches("appel", &candidates, 3, 0.6),
            vec!["apple".to_string(), "ape".to_string()]
        );

        let many = ["SOY1", "SOY2", "SOY3", "SOY4"];
        let result = close_matches("SOY", &many, 3, 0.6);
        assert_eq!(result, vec!["SOY4", "SOY3", "SOY2"]);
    }

    #[test]
    fn test_close_matches_respects_cutoff() {
        let candidates = ["CORN", "WHEAT", "BARLEY"];
        for suggestion in close_matches("CORM", &candidates, 3, 0.6) {
            assert!(similarity(&suggestion, "CORM") >= 0.6);
        }
        assert!(close_matches("ZZZZZZ", &candidates, 3, 0.6).is_empty());
        assert!(close_matches("CORN", &candidates, 0, 0.6).is_empty());
    }

    #[test]
    fn test_resolve_prefers_exact_match() {
        let rows = [Row("XYZ1", 1), Row("XYZ", 2), Row("XYZ", 3)];
        let row = resolve("XYZ", &rows, RecordKind::Animal, &MatchSettings::default()).unwrap();
        assert_eq!(row.1, 2);
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let rows = [Row("Corn", 1)];
        let err = resolve("corn", &rows, RecordKind::Feed, &MatchSettings::default()).unwrap_err();
        match err {
            RationError::NotFound { id, suggestions, .. } => {
                assert_eq!(id, "corn");
                assert_eq!(suggestions, vec!["Corn".to_string()]);
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_miss_suggests_distinct_keys() {
        let rows = [Row("XYZ1", 1), Row("XYZ1", 2), Row("ABC", 3)];
        let err = resolve("XYZ", &rows, RecordKind::Animal, &MatchSettings::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Animal ID 'XYZ' not found. Did you mean: XYZ1?"
        );
    }
}
