pub mod sqlite;

use async_trait::async_trait;
use serde::Serialize;
use crate::error::Result;

pub use sqlite::SqliteMeaningCache;

/// Trait for meaning cache implementations
#[async_trait]
pub trait MeaningCache: Send + Sync {
    /// Get cached meanings for a word
    async fn get(&self, word: &str) -> Result<Option<CachedMeanings>>;

    /// Save meanings to cache
    async fn save(&self, word: &str, meanings: &[String]) -> Result<()>;

    /// Increment cache hit counter
    async fn increment_hit(&self, word: &str) -> Result<()>;

    /// Get cache statistics
    async fn stats(&self) -> Result<CacheStats>;

    /// Clear expired entries (older than `max_age_days`)
    async fn cleanup(&self, max_age_days: i64) -> Result<u64>;
}

/// Cached meanings with metadata
#[derive(Debug, Clone)]
pub struct CachedMeanings {
    pub word: String,
    pub meanings: Vec<String>,
    pub hit_count: i32,
    pub cached_at: chrono::DateTime<chrono::Utc>,
}

/// Cache statistics
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub total_entries: u64,
    pub total_hits: u64,
    pub avg_hit_count: f64,
    pub oldest_entry: Option<chrono::DateTime<chrono::Utc>>,
    pub newest_entry: Option<chrono::DateTime<chrono::Utc>>,
}
