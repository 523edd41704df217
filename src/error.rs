use thiserror::Error;

/// Main error type for the word game engine
#[derive(Error, Debug)]
pub enum WordGameError {
    /// Guess (or hidden word) unknown to the vector source and the vocabulary
    #[error("Word not found: {word}")]
    WordNotFound { word: String, suggestions: Vec<String> },

    /// Hint rank outside `[1, total]`
    #[error("Rank {rank} is out of range (1..={total})")]
    InvalidRange { rank: usize, total: usize },

    /// Zero-norm or non-finite embedding
    #[error("Degenerate vector for '{0}'")]
    DegenerateVector(String),

    /// Embeddings of different length
    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Score bounds that cannot be interpolated
    #[error("Degenerate score bounds: min={min}, max={max}")]
    DegenerateBounds { min: f32, max: f32 },

    /// No word qualifies as the hidden word
    #[error("Vocabulary has no usable hidden word candidate")]
    EmptyVocabulary,

    /// Round setup still running
    #[error("Game round is not ready yet")]
    NotReady,

    /// Round setup aborted
    #[error("Game round setup failed: {0}")]
    SetupFailed(String),

    /// Malformed vector file
    #[error("Invalid vector data at line {line}: {message}")]
    VectorFormat { line: usize, message: String },

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Meaning service errors
    #[error("Meaning lookup error: {0}")]
    MeaningLookup(String),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// HTTP request errors
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl WordGameError {
    /// Shorthand for a not-found error without suggestions
    pub fn word_not_found(word: impl Into<String>) -> Self {
        WordGameError::WordNotFound {
            word: word.into(),
            suggestions: Vec::new(),
        }
    }

    /// Whether the error only concerns a single query (the round stays usable)
    pub fn is_query_error(&self) -> bool {
        matches!(
            self,
            WordGameError::WordNotFound { .. } | WordGameError::InvalidRange { .. }
        )
    }
}

impl From<serde_yaml::Error> for WordGameError {
    fn from(e: serde_yaml::Error) -> Self {
        WordGameError::Config(e.to_string())
    }
}

impl From<String> for WordGameError {
    fn from(s: String) -> Self {
        WordGameError::Other(s)
    }
}

impl From<&str> for WordGameError {
    fn from(s: &str) -> Self {
        WordGameError::Other(s.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, WordGameError>;
