use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::cache::{CacheStats, MeaningCache};
use crate::config::EngineConfig;
use crate::core::{ClosestWord, GuessResponse, MeaningResponse};
use crate::error::{Result, WordGameError};
use crate::meaning::MeaningLookup;
use crate::round::{GameRound, RoundInfo};
use crate::vectors::VectorSource;
use crate::vocabulary::Vocabulary;

/// Lifecycle of the current round
#[derive(Clone)]
pub enum RoundState {
    /// Setup running, queries get `NotReady`
    Pending,
    Ready(Arc<GameRound>),
    /// Setup aborted, queries get `SetupFailed`
    Failed(String),
}

/// Game orchestrator: owns the ready gate around the current round and the
/// meaning lookup collaborators.
///
/// Round setup runs on the blocking pool; queries clone the ready `Arc`
/// snapshot and never wait on setup.
pub struct GameEngine {
    state: Arc<RwLock<RoundState>>,
    generation: Arc<AtomicU64>,
    vectors: Arc<dyn VectorSource>,
    vocabulary: Arc<Vocabulary>,
    config: EngineConfig,
    meaning_lookup: Option<Arc<dyn MeaningLookup>>,
    meaning_cache: Option<Arc<dyn MeaningCache>>,
}

impl GameEngine {
    /// Create an engine with no round yet (state `Pending`)
    pub fn new(vectors: Arc<dyn VectorSource>, vocabulary: Vocabulary, config: EngineConfig) -> Self {
        Self {
            state: Arc::new(RwLock::new(RoundState::Pending)),
            generation: Arc::new(AtomicU64::new(0)),
            vectors,
            vocabulary: Arc::new(vocabulary),
            config,
            meaning_lookup: None,
            meaning_cache: None,
        }
    }

    /// Set the dictionary service used by [`GameEngine::meanings`]
    pub fn with_meaning_lookup(mut self, lookup: Arc<dyn MeaningLookup>) -> Self {
        self.meaning_lookup = Some(lookup);
        self
    }

    /// Cache meaning lookups
    pub fn with_meaning_cache(mut self, cache: Arc<dyn MeaningCache>) -> Self {
        self.meaning_cache = Some(cache);
        self
    }

    /// Start a new round in the background; returns immediately.
    ///
    /// `hidden_word` fixes the word, otherwise one is drawn at random.
    pub fn spawn_round(&self, hidden_word: Option<String>) -> JoinHandle<Result<Arc<GameRound>>> {
        let task = self.setup_task(hidden_word);
        tokio::spawn(task)
    }

    /// Start a new round and wait until it is ready (or failed)
    pub async fn start_round(&self, hidden_word: Option<String>) -> Result<Arc<GameRound>> {
        self.setup_task(hidden_word).await
    }

    fn setup_task(
        &self,
        hidden_word: Option<String>,
    ) -> impl std::future::Future<Output = Result<Arc<GameRound>>> + Send + 'static {
        let state = Arc::clone(&self.state);
        let generation = Arc::clone(&self.generation);
        let vectors = Arc::clone(&self.vectors);
        let vocabulary = Arc::clone(&self.vocabulary);
        let config = self.config.clone();
        let ticket = generation.fetch_add(1, Ordering::SeqCst) + 1;

        async move {
            {
                let mut guard = state.write().await;
                // Requested earlier but polled after a newer round: never touch its state
                if generation.load(Ordering::SeqCst) != ticket {
                    tracing::debug!("Skipping superseded round #{}", ticket);
                    return Err(WordGameError::SetupFailed(format!(
                        "round #{} superseded before setup",
                        ticket
                    )));
                }
                *guard = RoundState::Pending;
            }

            let built = tokio::task::spawn_blocking(move || {
                let vocabulary = (*vocabulary).clone();
                match hidden_word {
                    Some(word) => GameRound::setup(&word, vocabulary, vectors, config),
                    None => GameRound::start(vocabulary, vectors, config, &mut rand::thread_rng()),
                }
            })
            .await
            .map_err(|e| WordGameError::SetupFailed(format!("setup task aborted: {}", e)))
            .and_then(|result| result.map(Arc::new));

            let mut guard = state.write().await;
            // A newer round was requested meanwhile; leave its state alone
            if generation.load(Ordering::SeqCst) != ticket {
                tracing::debug!("Discarding superseded round #{}", ticket);
                return built;
            }

            match &built {
                Ok(round) => *guard = RoundState::Ready(Arc::clone(round)),
                Err(e) => {
                    tracing::error!("❌ Round setup failed: {}", e);
                    *guard = RoundState::Failed(e.to_string());
                }
            }
            built
        }
    }

    /// Current round snapshot
    pub async fn round(&self) -> Result<Arc<GameRound>> {
        match &*self.state.read().await {
            RoundState::Ready(round) => Ok(Arc::clone(round)),
            RoundState::Pending => Err(WordGameError::NotReady),
            RoundState::Failed(reason) => Err(WordGameError::SetupFailed(reason.clone())),
        }
    }

    pub async fn is_ready(&self) -> bool {
        matches!(&*self.state.read().await, RoundState::Ready(_))
    }

    pub async fn submit_guess(&self, word: &str) -> Result<GuessResponse> {
        let round = self.round().await?;
        let response = round.submit_guess(word);
        match &response {
            Ok(guess) => tracing::debug!("Guess {}", guess.display()),
            Err(e) => tracing::debug!("Guess '{}' rejected: {}", word.trim(), e),
        }
        response
    }

    pub async fn reveal(&self) -> Result<String> {
        Ok(self.round().await?.reveal().to_string())
    }

    pub async fn hint(&self, rank: usize) -> Result<String> {
        self.round().await?.hint(rank)
    }

    pub async fn closest_words(&self, limit: usize) -> Result<Vec<ClosestWord>> {
        Ok(self.round().await?.closest_words(limit))
    }

    pub async fn round_info(&self) -> Result<RoundInfo> {
        Ok(self.round().await?.info())
    }

    /// Dictionary meanings; never fails, errors are reported in the response
    pub async fn meanings(&self, word: &str) -> MeaningResponse {
        let word = word.trim();

        let Some(lookup) = &self.meaning_lookup else {
            return MeaningResponse::failed(word, "no meaning lookup configured");
        };

        if let Some(cache) = &self.meaning_cache {
            match cache.get(word).await {
                Ok(Some(cached)) => {
                    if let Err(e) = cache.increment_hit(word).await {
                        tracing::warn!("Failed to record meaning cache hit: {}", e);
                    }
                    return MeaningResponse::found(word, cached.meanings, true);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!("Meaning cache read failed: {}", e),
            }
        }

        match lookup.search(word).await {
            Ok(meanings) => {
                if let Some(cache) = &self.meaning_cache {
                    if !meanings.is_empty() {
                        if let Err(e) = cache.save(word, &meanings).await {
                            tracing::warn!("Failed to save to meaning cache: {}", e);
                        }
                    }
                }
                MeaningResponse::found(word, meanings, false)
            }
            Err(e) => {
                tracing::warn!("⚠️ Meaning lookup '{}' failed for '{}': {}", lookup.name(), word, e);
                MeaningResponse::failed(word, e.to_string())
            }
        }
    }

    /// Get meaning cache statistics
    pub async fn cache_stats(&self) -> Result<CacheStats> {
        match &self.meaning_cache {
            Some(cache) => cache.stats().await,
            None => Err(WordGameError::Other("meaning cache disabled".to_string())),
        }
    }

    /// Clean up old meaning cache entries
    pub async fn cleanup_cache(&self, max_age_days: i64) -> Result<u64> {
        match &self.meaning_cache {
            Some(cache) => cache.cleanup(max_age_days).await,
            None => Ok(0),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SqliteMeaningCache;
    use crate::ranking::BoundsPolicy;
    use crate::vectors::InMemoryVectors;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    struct StaticMeanings {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MeaningLookup for StaticMeanings {
        async fn search(&self, word: &str) -> Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![format!("{} anlamı", word)])
        }

        fn name(&self) -> &str {
            "static"
        }
    }

    struct BrokenMeanings;

    #[async_trait]
    impl MeaningLookup for BrokenMeanings {
        async fn search(&self, _word: &str) -> Result<Vec<String>> {
            Err(WordGameError::MeaningLookup("connection refused".to_string()))
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    fn engine() -> GameEngine {
        let vectors = InMemoryVectors::from_pairs(vec![
            ("elma", vec![1.0, 0.0]),
            ("armut", vec![0.8, 0.6]),
            ("kitap", vec![0.2, 0.979_795_9]),
        ])
        .unwrap();
        let config = EngineConfig {
            bounds: BoundsPolicy::Empirical,
            ..EngineConfig::default()
        };
        GameEngine::new(
            Arc::new(vectors),
            Vocabulary::new(["elma", "armut", "kitap"]),
            config,
        )
    }

    #[tokio::test]
    async fn test_not_ready_before_setup() {
        let engine = engine();
        assert!(!engine.is_ready().await);
        assert!(matches!(
            engine.submit_guess("armut").await,
            Err(WordGameError::NotReady)
        ));
        assert!(matches!(engine.hint(1).await, Err(WordGameError::NotReady)));
    }

    #[tokio::test]
    async fn test_round_lifecycle() {
        let engine = engine();
        engine.start_round(Some("elma".to_string())).await.unwrap();

        assert!(engine.is_ready().await);
        assert_eq!(engine.submit_guess("armut").await.unwrap().rank, Some(2));
        assert_eq!(engine.reveal().await.unwrap(), "elma");
        assert_eq!(engine.hint(3).await.unwrap(), "kitap");
        assert_eq!(engine.closest_words(2).await.unwrap().len(), 2);
        assert_eq!(engine.round_info().await.unwrap().total_words, 3);
    }

    #[tokio::test]
    async fn test_spawned_round_becomes_ready() {
        let engine = engine();
        let handle = engine.spawn_round(None);
        let round = handle.await.unwrap().unwrap();

        assert!(engine.is_ready().await);
        assert_eq!(engine.reveal().await.unwrap(), round.reveal());
    }

    #[tokio::test]
    async fn test_failed_setup_blocks_queries() {
        let engine = engine();
        let result = engine.start_round(Some("yok".to_string())).await;
        assert!(result.is_err());

        assert!(matches!(
            engine.submit_guess("armut").await,
            Err(WordGameError::SetupFailed(_))
        ));

        // A later successful round recovers
        engine.start_round(Some("armut".to_string())).await.unwrap();
        assert!(engine.is_ready().await);
    }

    #[tokio::test]
    async fn test_stale_round_keeps_newer_round_ready() {
        let engine = engine();
        let earlier = engine.setup_task(Some("elma".to_string()));
        let newer = engine.start_round(Some("armut".to_string())).await.unwrap();

        assert!(earlier.await.is_err());
        assert!(engine.is_ready().await);
        assert_eq!(engine.reveal().await.unwrap(), newer.reveal());
        assert_eq!(engine.submit_guess("armut").await.unwrap().rank, Some(1));
    }

    #[tokio::test]
    async fn test_overlapping_spawned_rounds_settle_on_latest() {
        let engine = engine();
        let first = engine.spawn_round(Some("elma".to_string()));
        let second = engine.spawn_round(Some("kitap".to_string()));
        let _ = first.await.unwrap();
        second.await.unwrap().unwrap();

        assert!(engine.is_ready().await);
        assert_eq!(engine.reveal().await.unwrap(), "kitap");
    }

    #[tokio::test]
    async fn test_meanings_fail_open() {
        let broken = engine().with_meaning_lookup(Arc::new(BrokenMeanings));
        let response = broken.meanings("elma").await;
        assert!(response.meanings.is_empty());
        assert!(response.error.unwrap().contains("connection refused"));

        let unconfigured = engine();
        let response = unconfigured.meanings("elma").await;
        assert!(response.error.is_some());
    }

    #[tokio::test]
    async fn test_meanings_cached() {
        let lookup = Arc::new(StaticMeanings { calls: AtomicUsize::new(0) });
        let cache = Arc::new(SqliteMeaningCache::new(":memory:").await.unwrap());
        let engine = engine()
            .with_meaning_lookup(lookup.clone())
            .with_meaning_cache(cache);

        let first = engine.meanings("elma").await;
        assert!(!first.from_cache);
        assert_eq!(first.meanings, vec!["elma anlamı"]);

        let second = engine.meanings("elma").await;
        assert!(second.from_cache);
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);

        let stats = engine.cache_stats().await.unwrap();
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.total_hits, 1);
    }
}
