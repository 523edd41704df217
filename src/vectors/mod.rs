pub mod memory;

use crate::core::Embedding;

pub use memory::InMemoryVectors;

/// Trait for word vector sources (pretrained embedding models)
pub trait VectorSource: Send + Sync {
    /// Embedding for a word, `None` when the model does not know it
    fn vector(&self, word: &str) -> Option<&Embedding>;

    /// Embedding dimension
    fn dimension(&self) -> usize;

    /// Number of known words
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, word: &str) -> bool {
        self.vector(word).is_some()
    }

    /// Get source name for logging
    fn name(&self) -> &str;
}
