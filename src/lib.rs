//! # WordRank Engine
//!
//! Semantic word-guessing game engine:
//! - Vocabulary ranked once per round by embedding cosine similarity
//! - O(1) rank, hint and closest-word queries
//! - Distance scores interpolated between configurable similarity bounds
//! - Turkish infinitive folding (`çalışmak` → `çalışma`)
//! - Ready-gated async engine with dictionary meaning lookups (SQLite cached)
//! - Multiple interfaces: Rust library, Python bindings, HTTP API, CLI
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wordrank_engine::{EngineConfig, GameEngine, InMemoryVectors, Vocabulary};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let vectors = InMemoryVectors::load_text_file("cc.tr.300.vec", Some(200_000))?;
//!     let vocabulary = Vocabulary::new(vectors.words().iter().cloned());
//!     let engine = GameEngine::new(Arc::new(vectors), vocabulary, EngineConfig::default());
//!
//!     engine.start_round(None).await?;
//!     let guess = engine.submit_guess("bilgisayar").await?;
//!
//!     println!("{:?} / {} (distance {})", guess.rank, guess.total_words, guess.distance);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod meaning;
pub mod ranking;
pub mod round;
pub mod vectors;
pub mod vocabulary;

// Re-export primary types
pub use crate::core::{cosine_similarity, ClosestWord, Embedding, GuessResponse, MeaningResponse};
pub use cache::{MeaningCache, SqliteMeaningCache};
pub use config::{EngineConfig, ScoringMode};
pub use engine::{GameEngine, RoundState};
pub use error::{Result, WordGameError};
pub use meaning::{MeaningLookup, TdkDictionary};
pub use ranking::{map_score, normalize, BoundsPolicy, Ranking, ScoreBounds};
pub use round::{GameRound, RoundInfo};
pub use vectors::{InMemoryVectors, VectorSource};
pub use vocabulary::{
    load_or_default, FileVocabulary, SpellingIndex, Vocabulary, VocabularyLoader,
};

// Python bindings
#[cfg(feature = "python")]
pub mod python;

#[cfg(feature = "python")]
pub use python::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
