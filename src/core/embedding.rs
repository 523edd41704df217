use crate::error::{Result, WordGameError};

/// Word embedding produced by a vector source (fixed dimension per source)
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    values: Vec<f32>,
}

impl Embedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Euclidean norm
    pub fn norm(&self) -> f32 {
        self.values.iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    /// Cosine similarity against another embedding
    pub fn similarity(&self, other: &Embedding) -> Result<f32> {
        cosine_similarity(&self.values, &other.values)
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(values: Vec<f32>) -> Self {
        Self::new(values)
    }
}

/// Cosine similarity: dot(a, b) / (|a| * |b|), clamped to [-1, 1].
///
/// Fails on length mismatch and on zero-norm input instead of returning NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(WordGameError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return Err(WordGameError::DegenerateVector("zero-norm vector".to_string()));
    }

    let similarity = dot / denom;
    if !similarity.is_finite() {
        return Err(WordGameError::DegenerateVector("non-finite similarity".to_string()));
    }

    Ok(similarity.clamp(-1.0, 1.0))
}
