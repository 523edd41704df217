use rapidfuzz::distance::jaro_winkler;
use std::collections::HashMap;

use super::Vocabulary;

/// Minimum Jaro-Winkler similarity for a spelling suggestion
pub const SUGGESTION_THRESHOLD: f64 = 0.85;

/// Largest length difference, in chars, between a guess and a suggestion
pub const MAX_LENGTH_GAP: usize = 2;

struct Candidate {
    lower: String,
    word: String,
    position: usize,
}

/// Lowercased vocabulary bucketed by first letter and length.
///
/// Built once per round; a lookup only scores the buckets sharing the
/// guess's first letter within [`MAX_LENGTH_GAP`] of its length.
#[derive(Default)]
pub struct SpellingIndex {
    buckets: HashMap<(char, usize), Vec<Candidate>>,
}

impl SpellingIndex {
    pub fn new(vocabulary: &Vocabulary) -> Self {
        let mut buckets: HashMap<(char, usize), Vec<Candidate>> = HashMap::new();

        for (position, word) in vocabulary.iter().enumerate() {
            let lower = word.to_lowercase();
            let Some(first) = lower.chars().next() else {
                continue;
            };
            let length = lower.chars().count();
            buckets.entry((first, length)).or_default().push(Candidate {
                lower,
                word: word.to_string(),
                position,
            });
        }

        Self { buckets }
    }

    /// Up to `limit` words scoring at least [`SUGGESTION_THRESHOLD`], best
    /// first, ties in vocabulary order. `exclude` is never suggested.
    pub fn suggest(&self, word: &str, limit: usize, exclude: &str) -> Vec<String> {
        let lower = word.to_lowercase();
        let Some(first) = lower.chars().next() else {
            return Vec::new();
        };
        if limit == 0 {
            return Vec::new();
        }
        let length = lower.chars().count();

        let mut scored: Vec<(f64, &Candidate)> = (length.saturating_sub(MAX_LENGTH_GAP)
            ..=length + MAX_LENGTH_GAP)
            .filter_map(|len| self.buckets.get(&(first, len)))
            .flatten()
            .filter(|candidate| candidate.word != exclude)
            .map(|candidate| {
                let score =
                    jaro_winkler::normalized_similarity(lower.chars(), candidate.lower.chars());
                (score, candidate)
            })
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();

        scored.sort_by(|a, b| {
            b.0.total_cmp(&a.0)
                .then_with(|| a.1.position.cmp(&b.1.position))
        });
        scored
            .into_iter()
            .take(limit)
            .map(|(_, candidate)| candidate.word.clone())
            .collect()
    }

    /// Number of words scored for a guess of this spelling
    pub fn scan_size(&self, word: &str) -> usize {
        let lower = word.to_lowercase();
        let Some(first) = lower.chars().next() else {
            return 0;
        };
        let length = lower.chars().count();

        (length.saturating_sub(MAX_LENGTH_GAP)..=length + MAX_LENGTH_GAP)
            .filter_map(|len| self.buckets.get(&(first, len)))
            .map(Vec::len)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typo_suggestions() {
        let vocab = Vocabulary::new(["elma", "armut", "armutlu", "kitap"]);
        let index = SpellingIndex::new(&vocab);

        let suggestions = index.suggest("armutt", 3, "elma");
        assert_eq!(suggestions.first().map(String::as_str), Some("armut"));
        assert!(!suggestions.contains(&"kitap".to_string()));
    }

    #[test]
    fn test_case_insensitive_and_excluded() {
        let vocab = Vocabulary::new(["Ankara", "ankara"]);
        let index = SpellingIndex::new(&vocab);

        assert_eq!(index.suggest("ANKARA", 5, "ankara"), vec!["Ankara"]);
        assert!(index.suggest("", 5, "").is_empty());
        assert!(index.suggest("ankara", 0, "").is_empty());
    }

    #[test]
    fn test_scan_is_bounded_by_bucket() {
        let words: Vec<String> = (0..1000)
            .map(|i| format!("{}kelime{}", if i % 2 == 0 { 'a' } else { 'b' }, i))
            .chain(std::iter::once("abcdefghijklmnopqrstuvwxyz".to_string()))
            .collect();
        let vocab = Vocabulary::new(words);
        let index = SpellingIndex::new(&vocab);

        // Only "a…" words of length 7..=11 are candidates for "akelime12"
        let scanned = index.scan_size("akelime12");
        assert!(scanned > 0);
        assert!(scanned <= 500);
        assert_eq!(index.scan_size("zzz"), 0);
        assert_eq!(index.scan_size("abcdefghijklmnopqrstuvwxyz"), 1);
    }

    #[test]
    fn test_ties_keep_vocabulary_order() {
        let vocab = Vocabulary::new(["kalem", "kalem2", "kalem1"]);
        let index = SpellingIndex::new(&vocab);

        // "kalem" scores higher; the two equal scores follow insertion order
        assert_eq!(index.suggest("kalem3", 3, ""), vec!["kalem", "kalem2", "kalem1"]);
    }
}
