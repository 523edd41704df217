use serde::{Deserialize, Serialize};

/// Scored guess returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuessResponse {
    /// Word as submitted (trimmed)
    pub word: String,

    /// Word the guess resolved to after suffix normalization
    pub matched: String,

    /// Position in the round ranking (1 = hidden word); `None` when the word
    /// is known to the vector source but outside the ranked vocabulary
    pub rank: Option<usize>,

    /// Number of rankable words (hidden word included)
    pub total_words: usize,

    /// Raw cosine similarity to the hidden word
    pub similarity: f32,

    /// Mapped distance score (1 = hidden word, 2 = closest, ceiling = farthest)
    pub distance: u32,

    /// Whether the guess is the hidden word
    pub is_correct: bool,
}

impl GuessResponse {
    /// Get display string for logging
    pub fn display(&self) -> String {
        let rank = self
            .rank
            .map(|r| format!("#{}/{}", r, self.total_words))
            .unwrap_or_else(|| "unranked".to_string());
        format!(
            "{} → {} ({}, sim={:.4}, distance={})",
            self.word, self.matched, rank, self.similarity, self.distance
        )
    }
}

/// One entry of the closest-words listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClosestWord {
    pub word: String,
    pub rank: usize,
    pub similarity: f32,
}

/// Dictionary meanings for a word; lookup failures are reported, not raised
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MeaningResponse {
    pub word: String,
    #[serde(default)]
    pub meanings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub from_cache: bool,
}

impl MeaningResponse {
    pub fn found(word: impl Into<String>, meanings: Vec<String>, from_cache: bool) -> Self {
        Self {
            word: word.into(),
            meanings,
            error: None,
            from_cache,
        }
    }

    pub fn failed(word: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            meanings: Vec::new(),
            error: Some(error.into()),
            from_cache: false,
        }
    }
}
