use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::config::{EngineConfig, ScoringMode};
use crate::core::{ClosestWord, GuessResponse};
use crate::error::{Result, WordGameError};
use crate::ranking::{map_score, normalize, normalized_ranks, Ranking, ScoreBounds};
use crate::vectors::VectorSource;
use crate::vocabulary::{SpellingIndex, Vocabulary};

/// One game round: hidden word, precomputed ranking and score bounds.
///
/// Immutable once built; share it behind an `Arc` for concurrent queries.
pub struct GameRound {
    vocabulary: Vocabulary,
    ranking: Ranking,
    normalized: Option<HashMap<String, usize>>,
    spelling: SpellingIndex,
    bounds: ScoreBounds,
    config: EngineConfig,
    vectors: Arc<dyn VectorSource>,
    started_at: DateTime<Utc>,
}

/// Serializable round summary (the hidden word is not included)
#[derive(Debug, Clone, Serialize)]
pub struct RoundInfo {
    pub total_words: usize,
    pub vocabulary_size: usize,
    pub unranked_words: usize,
    pub bounds: ScoreBounds,
    pub score_ceiling: u32,
    pub started_at: DateTime<Utc>,
}

impl GameRound {
    /// Build a round around a random hidden word
    pub fn start<R: Rng + ?Sized>(
        vocabulary: Vocabulary,
        vectors: Arc<dyn VectorSource>,
        config: EngineConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let hidden_word = select_hidden_word(&vocabulary, vectors.as_ref(), rng)?;
        Self::setup(&hidden_word, vocabulary, vectors, config)
    }

    /// Build a round around a given hidden word.
    ///
    /// Any failure here (no vector for the hidden word, zero vectors,
    /// degenerate bounds) is fatal for the round.
    pub fn setup(
        hidden_word: &str,
        vocabulary: Vocabulary,
        vectors: Arc<dyn VectorSource>,
        config: EngineConfig,
    ) -> Result<Self> {
        let start = Instant::now();
        config.validate()?;

        if vocabulary.is_empty() {
            return Err(WordGameError::EmptyVocabulary);
        }

        let ranking = Ranking::build(hidden_word, &vocabulary, vectors.as_ref())?;
        let bounds = ScoreBounds::from_ranking(&ranking, config.bounds)?;
        let normalized = config
            .normalization
            .then(|| normalized_ranks(&ranking, &vocabulary));
        let spelling = if config.suggestions > 0 {
            SpellingIndex::new(&vocabulary)
        } else {
            SpellingIndex::default()
        };

        tracing::info!(
            "✅ Round ready: {} ranked words ({} unranked), bounds [{:.4}, {:.4}], hidden word length {}, {:.1}ms",
            ranking.total_words(),
            ranking.skipped(),
            bounds.min,
            bounds.max,
            hidden_word.chars().count(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(Self {
            vocabulary,
            ranking,
            normalized,
            spelling,
            bounds,
            config,
            vectors,
            started_at: Utc::now(),
        })
    }

    /// Score a guess against the hidden word
    pub fn submit_guess(&self, guess: &str) -> Result<GuessResponse> {
        let word = guess.trim();
        if word.is_empty() {
            return Err(WordGameError::word_not_found(word));
        }

        let key = if self.config.normalization {
            normalize(word, &self.vocabulary)
        } else {
            word.to_string()
        };

        if let Some(rank) = self.lookup_rank(&key) {
            return self.ranked_response(word, rank);
        }

        if self.config.scoring == ScoringMode::Distance {
            if let Some(response) = self.unranked_response(word)? {
                return Ok(response);
            }
        }

        Err(WordGameError::WordNotFound {
            word: word.to_string(),
            suggestions: self.suggest(word),
        })
    }

    /// The hidden word
    pub fn reveal(&self) -> &str {
        self.ranking.hidden_word()
    }

    /// Word at a rank in `[1, total_words]`
    pub fn hint(&self, rank: usize) -> Result<String> {
        self.ranking.word_at_rank(rank).map(str::to_string)
    }

    /// Closest words, hidden word first.
    ///
    /// `limit` is capped at `EngineConfig::max_closest`, so the result holds
    /// `min(limit, max_closest, total_words)` entries.
    pub fn closest_words(&self, limit: usize) -> Vec<ClosestWord> {
        self.ranking
            .top_k(limit.min(self.config.max_closest))
            .into_iter()
            .map(|(word, rank)| ClosestWord {
                word: word.to_string(),
                rank,
                similarity: self.ranking.similarity_at_rank(rank).unwrap_or_default(),
            })
            .collect()
    }

    pub fn total_words(&self) -> usize {
        self.ranking.total_words()
    }

    pub fn bounds(&self) -> ScoreBounds {
        self.bounds
    }

    pub fn ranking(&self) -> &Ranking {
        &self.ranking
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn info(&self) -> RoundInfo {
        RoundInfo {
            total_words: self.ranking.total_words(),
            vocabulary_size: self.vocabulary.len(),
            unranked_words: self.ranking.skipped(),
            bounds: self.bounds,
            score_ceiling: self.config.score_ceiling,
            started_at: self.started_at,
        }
    }

    fn lookup_rank(&self, key: &str) -> Option<usize> {
        match &self.normalized {
            Some(ranks) => ranks.get(key).copied(),
            None => self.ranking.rank_of(key),
        }
    }

    fn ranked_response(&self, word: &str, rank: usize) -> Result<GuessResponse> {
        let matched = self.ranking.word_at_rank(rank)?.to_string();
        let similarity = self.ranking.similarity_at_rank(rank).unwrap_or_default();
        let distance = if rank == 1 {
            1
        } else {
            map_score(similarity, &self.bounds, self.config.score_ceiling)?
        };

        Ok(GuessResponse {
            word: word.to_string(),
            matched,
            rank: Some(rank),
            total_words: self.ranking.total_words(),
            similarity,
            distance,
            is_correct: rank == 1,
        })
    }

    /// Distance-only score for a word the model knows but the vocabulary lacks
    fn unranked_response(&self, word: &str) -> Result<Option<GuessResponse>> {
        let Some(guess_vec) = self.vectors.vector(word) else {
            return Ok(None);
        };
        let hidden = self.ranking.hidden_word();
        let hidden_vec = self
            .vectors
            .vector(hidden)
            .ok_or_else(|| WordGameError::word_not_found(hidden))?;

        let similarity = hidden_vec
            .similarity(guess_vec)
            .map_err(|_| WordGameError::word_not_found(word))?;
        let distance = map_score(similarity, &self.bounds, self.config.score_ceiling)?;

        Ok(Some(GuessResponse {
            word: word.to_string(),
            matched: word.to_string(),
            rank: None,
            total_words: self.ranking.total_words(),
            similarity,
            distance,
            is_correct: false,
        }))
    }

    /// Closest vocabulary spellings for an unknown guess
    fn suggest(&self, word: &str) -> Vec<String> {
        self.spelling
            .suggest(word, self.config.suggestions, self.ranking.hidden_word())
    }
}

/// Pick a hidden word uniformly among vocabulary words that are lowercase-led,
/// purely alphabetic and known to the vector source.
///
/// Walks one random permutation, so exhaustion is detected instead of retrying forever.
pub fn select_hidden_word<R: Rng + ?Sized>(
    vocabulary: &Vocabulary,
    vectors: &dyn VectorSource,
    rng: &mut R,
) -> Result<String> {
    let mut candidates: Vec<&str> = vocabulary.iter().collect();
    candidates.shuffle(rng);

    candidates
        .into_iter()
        .find(|word| is_hidden_word_candidate(word) && vectors.contains(word))
        .map(str::to_string)
        .ok_or(WordGameError::EmptyVocabulary)
}

/// Capitalized words are treated as proper nouns
fn is_hidden_word_candidate(word: &str) -> bool {
    match word.chars().next() {
        Some(first) => !first.is_uppercase() && word.chars().all(char::is_alphabetic),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::BoundsPolicy;
    use crate::vectors::InMemoryVectors;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fruit_vectors() -> Arc<dyn VectorSource> {
        Arc::new(
            InMemoryVectors::from_pairs(vec![
                ("elma", vec![1.0, 0.0]),
                ("armut", vec![0.8, 0.6]),
                ("kitap", vec![0.2, 0.979_795_9]),
                ("uzay", vec![0.5, 0.866_025_4]),
            ])
            .unwrap(),
        )
    }

    fn empirical() -> EngineConfig {
        EngineConfig {
            bounds: BoundsPolicy::Empirical,
            ..EngineConfig::default()
        }
    }

    fn fruit_round(config: EngineConfig) -> GameRound {
        let vocab = Vocabulary::new(["elma", "armut", "kitap"]);
        GameRound::setup("elma", vocab, fruit_vectors(), config).unwrap()
    }

    #[test]
    fn test_guess_ranks() {
        let round = fruit_round(empirical());

        let hit = round.submit_guess("elma").unwrap();
        assert!(hit.is_correct);
        assert_eq!(hit.rank, Some(1));
        assert_eq!(hit.distance, 1);
        assert_eq!(hit.similarity, 1.0);

        let close = round.submit_guess(" armut ").unwrap();
        assert_eq!(close.word, "armut");
        assert_eq!(close.rank, Some(2));
        assert_eq!(close.total_words, 3);
        assert_eq!(close.distance, 2);

        let far = round.submit_guess("kitap").unwrap();
        assert_eq!(far.rank, Some(3));
        assert_eq!(far.distance, 5000);
    }

    #[test]
    fn test_unknown_guess_is_word_not_found() {
        let round = fruit_round(empirical());
        match round.submit_guess("bilinmeyen").unwrap_err() {
            WordGameError::WordNotFound { word, .. } => assert_eq!(word, "bilinmeyen"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(round.submit_guess("   ").is_err());
    }

    #[test]
    fn test_suggestions_for_typos() {
        let round = fruit_round(empirical());
        match round.submit_guess("armutt").unwrap_err() {
            WordGameError::WordNotFound { suggestions, .. } => {
                assert_eq!(suggestions.first().map(String::as_str), Some("armut"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_distance_mode_scores_out_of_vocabulary_words() {
        let mut config = empirical();
        config.scoring = ScoringMode::Distance;
        let round = fruit_round(config);

        // "uzay" has a vector (sim 0.5) but is not in the vocabulary
        let response = round.submit_guess("uzay").unwrap();
        assert_eq!(response.rank, None);
        assert!((response.similarity - 0.5).abs() < 1e-5);
        assert!(response.distance > 2 && response.distance < 5000);

        let rank_mode = fruit_round(empirical());
        assert!(rank_mode.submit_guess("uzay").is_err());
    }

    #[test]
    fn test_hint_range() {
        let round = fruit_round(empirical());
        assert_eq!(round.hint(1).unwrap(), "elma");
        assert_eq!(round.hint(2).unwrap(), "armut");
        assert_eq!(round.hint(3).unwrap(), "kitap");

        assert!(matches!(round.hint(0), Err(WordGameError::InvalidRange { .. })));
        assert!(matches!(
            round.hint(round.total_words() + 1),
            Err(WordGameError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_closest_words() {
        let round = fruit_round(empirical());
        let closest = round.closest_words(2);
        assert_eq!(closest.len(), 2);
        assert_eq!(closest[0].word, "elma");
        assert_eq!(closest[0].rank, 1);
        assert_eq!(closest[1].word, "armut");
        assert_eq!(closest[1].rank, 2);

        assert_eq!(round.closest_words(100).len(), 3);
    }

    #[test]
    fn test_closest_words_capped_by_config() {
        let config = EngineConfig {
            max_closest: 2,
            ..empirical()
        };
        let round = fruit_round(config);
        assert_eq!(round.closest_words(100).len(), 2);
        assert_eq!(round.closest_words(1).len(), 1);
    }

    #[test]
    fn test_suggestions_skip_hidden_word_and_can_be_disabled() {
        let round = fruit_round(empirical());
        match round.submit_guess("elmaa").unwrap_err() {
            WordGameError::WordNotFound { suggestions, .. } => {
                assert!(!suggestions.contains(&"elma".to_string()))
            }
            other => panic!("unexpected error: {other}"),
        }

        let config = EngineConfig {
            suggestions: 0,
            ..empirical()
        };
        match fruit_round(config).submit_guess("armutt").unwrap_err() {
            WordGameError::WordNotFound { suggestions, .. } => assert!(suggestions.is_empty()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_reveal() {
        let round = fruit_round(empirical());
        assert_eq!(round.reveal(), "elma");
    }

    #[test]
    fn test_infinitive_guesses_share_rank() {
        let vectors: Arc<dyn VectorSource> = Arc::new(
            InMemoryVectors::from_pairs(vec![
                ("iş", vec![1.0, 0.0]),
                ("çalışma", vec![0.9, 0.2]),
                ("çalışmak", vec![0.6, 0.8]),
                ("deniz", vec![0.0, 1.0]),
            ])
            .unwrap(),
        );
        let vocab = Vocabulary::new(["iş", "çalışmak", "çalışma", "deniz"]);
        let round = GameRound::setup("iş", vocab, vectors, empirical()).unwrap();

        let a = round.submit_guess("çalışmak").unwrap();
        let b = round.submit_guess("çalışma").unwrap();
        assert_eq!(a.rank, b.rank);
        assert_eq!(a.rank, Some(2));
        assert_eq!(a.distance, b.distance);
    }

    #[test]
    fn test_normalization_disabled_keeps_exact_ranks() {
        let vectors: Arc<dyn VectorSource> = Arc::new(
            InMemoryVectors::from_pairs(vec![
                ("iş", vec![1.0, 0.0]),
                ("çalışma", vec![0.9, 0.2]),
                ("çalışmak", vec![0.6, 0.8]),
                ("deniz", vec![0.0, 1.0]),
            ])
            .unwrap(),
        );
        let vocab = Vocabulary::new(["iş", "çalışmak", "çalışma", "deniz"]);
        let mut config = empirical();
        config.normalization = false;
        let round = GameRound::setup("iş", vocab, vectors, config).unwrap();

        assert_eq!(round.submit_guess("çalışma").unwrap().rank, Some(2));
        assert_eq!(round.submit_guess("çalışmak").unwrap().rank, Some(3));
    }

    #[test]
    fn test_clamped_bounds_too_narrow_fail_setup() {
        // Empirical range [0.2, 0.25] clamps to [0.30, 0.25]
        let vectors: Arc<dyn VectorSource> = Arc::new(
            InMemoryVectors::from_pairs(vec![
                ("elma", vec![1.0, 0.0]),
                ("a", vec![0.25, 0.968_245_8]),
                ("b", vec![0.2, 0.979_795_9]),
            ])
            .unwrap(),
        );
        let vocab = Vocabulary::new(["elma", "a", "b"]);
        let result = GameRound::setup("elma", vocab, vectors, EngineConfig::default());
        assert!(matches!(result, Err(WordGameError::DegenerateBounds { .. })));
    }

    #[test]
    fn test_empty_vocabulary() {
        let result = GameRound::setup("elma", Vocabulary::default(), fruit_vectors(), empirical());
        assert!(matches!(result, Err(WordGameError::EmptyVocabulary)));
    }

    #[test]
    fn test_select_hidden_word_filters() {
        let vectors = fruit_vectors();
        let vocab = Vocabulary::new(["Elma", "masa", "armut", "3d"]);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let word = select_hidden_word(&vocab, vectors.as_ref(), &mut rng).unwrap();
            assert_eq!(word, "armut");
        }
    }

    #[test]
    fn test_select_hidden_word_exhaustion() {
        let vectors = fruit_vectors();
        let vocab = Vocabulary::new(["Elma", "masa", "Kitap"]);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            select_hidden_word(&vocab, vectors.as_ref(), &mut rng),
            Err(WordGameError::EmptyVocabulary)
        ));
    }

    #[test]
    fn test_start_picks_valid_word() {
        let vocab = Vocabulary::new(["elma", "armut", "kitap"]);
        let mut rng = StdRng::seed_from_u64(42);
        let round = GameRound::start(vocab, fruit_vectors(), empirical(), &mut rng).unwrap();

        assert!(["elma", "armut", "kitap"].contains(&round.reveal()));
        assert_eq!(round.total_words(), 3);
        assert_eq!(round.info().vocabulary_size, 3);
    }
}
