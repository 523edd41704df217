pub mod tdk;

use async_trait::async_trait;
use crate::error::Result;

pub use tdk::TdkDictionary;

/// Trait for dictionary services returning word meanings
#[async_trait]
pub trait MeaningLookup: Send + Sync {
    /// Meanings for a word; an empty list means the service knows no entry
    async fn search(&self, word: &str) -> Result<Vec<String>>;

    /// Get lookup name for logging
    fn name(&self) -> &str;
}
