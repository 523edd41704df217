use std::collections::HashMap;

use crate::error::{Result, WordGameError};
use crate::vectors::VectorSource;
use crate::vocabulary::Vocabulary;

/// Vocabulary word with its similarity to the hidden word
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub word: String,
    pub similarity: f32,
}

impl RankedEntry {
    pub fn new(word: impl Into<String>, similarity: f32) -> Self {
        Self {
            word: word.into(),
            similarity,
        }
    }
}

/// Total order of the vocabulary by similarity to the hidden word.
///
/// Rank 1 is the hidden word itself and is never stored as an entry; the
/// entry at index `i` has rank `i + 2`. Ties keep vocabulary order.
#[derive(Debug, Clone)]
pub struct Ranking {
    hidden_word: String,
    entries: Vec<RankedEntry>,
    ranks: HashMap<String, usize>,
    skipped: usize,
}

impl Ranking {
    /// Score every vocabulary word against the hidden word and sort.
    ///
    /// Words the vector source cannot resolve are left out of the ranking.
    /// O(V·D) similarity work plus an O(V log V) sort; build once per round.
    pub fn build(
        hidden_word: &str,
        vocabulary: &Vocabulary,
        source: &dyn VectorSource,
    ) -> Result<Self> {
        let hidden_vec = source
            .vector(hidden_word)
            .ok_or_else(|| WordGameError::word_not_found(hidden_word))?;
        let hidden_norm = hidden_vec.norm();
        if hidden_norm == 0.0 || !hidden_norm.is_finite() {
            return Err(WordGameError::DegenerateVector(hidden_word.to_string()));
        }

        let mut entries = Vec::with_capacity(vocabulary.len());
        let mut skipped = 0usize;

        for word in vocabulary.iter() {
            if word == hidden_word {
                continue;
            }
            let Some(vec) = source.vector(word) else {
                skipped += 1;
                continue;
            };

            let similarity = hidden_vec.similarity(vec).map_err(|e| match e {
                WordGameError::DegenerateVector(_) => {
                    WordGameError::DegenerateVector(word.to_string())
                }
                other => other,
            })?;

            entries.push(RankedEntry::new(word, similarity));
        }

        if skipped > 0 {
            tracing::debug!(
                "{} vocabulary words have no vector in '{}' and were left unranked",
                skipped,
                source.name()
            );
        }

        // Stable: equal similarities keep vocabulary order
        entries.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));

        Ok(Self::from_sorted(hidden_word, entries, skipped))
    }

    fn from_sorted(hidden_word: &str, entries: Vec<RankedEntry>, skipped: usize) -> Self {
        let ranks = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (entry.word.clone(), idx + 2))
            .collect();

        Self {
            hidden_word: hidden_word.to_string(),
            entries,
            ranks,
            skipped,
        }
    }

    pub fn hidden_word(&self) -> &str {
        &self.hidden_word
    }

    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    /// Ranked words plus the hidden word
    pub fn total_words(&self) -> usize {
        self.entries.len() + 1
    }

    /// Vocabulary words dropped for lack of a vector
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Rank of an exact word: 1 for the hidden word, `None` if unranked
    pub fn rank_of(&self, word: &str) -> Option<usize> {
        if word == self.hidden_word {
            return Some(1);
        }
        self.ranks.get(word).copied()
    }

    pub fn word_at_rank(&self, rank: usize) -> Result<&str> {
        match rank {
            1 => Ok(&self.hidden_word),
            r if (2..=self.total_words()).contains(&r) => Ok(&self.entries[r - 2].word),
            r => Err(WordGameError::InvalidRange {
                rank: r,
                total: self.total_words(),
            }),
        }
    }

    /// Similarity stored for a rank (1.0 for the hidden word)
    pub fn similarity_at_rank(&self, rank: usize) -> Option<f32> {
        match rank {
            1 => Some(1.0),
            r if r >= 2 => self.entries.get(r - 2).map(|e| e.similarity),
            _ => None,
        }
    }

    /// First `k` words with their ranks, starting at the hidden word
    pub fn top_k(&self, k: usize) -> Vec<(&str, usize)> {
        std::iter::once(self.hidden_word.as_str())
            .chain(self.entries.iter().map(|e| e.word.as_str()))
            .take(k)
            .enumerate()
            .map(|(idx, word)| (word, idx + 1))
            .collect()
    }

    /// `(min, max)` similarity over ranked entries
    pub fn similarity_range(&self) -> Option<(f32, f32)> {
        let max = self.entries.first()?.similarity;
        let min = self.entries.last()?.similarity;
        Some((min, max))
    }
}
