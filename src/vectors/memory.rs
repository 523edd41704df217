use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::core::Embedding;
use crate::error::{Result, WordGameError};
use crate::vectors::VectorSource;

/// Word vectors held in memory, keyed by word.
///
/// Loads the fastText / word2vec text format (`.vec`):
/// ```text
/// 2000000 300
/// bir 0.0123 -0.0456 ...
/// ve -0.0311 0.0220 ...
/// ```
/// The `count dim` header is optional. Word order of the file (frequency
/// order for the published models) is preserved in [`InMemoryVectors::words`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryVectors {
    vectors: HashMap<String, Embedding>,
    order: Vec<String>,
    dimension: usize,
}

impl InMemoryVectors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(word, values)` pairs; every vector must share one dimension
    pub fn from_pairs<I, W>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (W, Vec<f32>)>,
        W: Into<String>,
    {
        let mut vectors = Self::new();
        for (word, values) in pairs {
            vectors.insert(word, values)?;
        }
        Ok(vectors)
    }

    /// Insert a vector; the first insert fixes the dimension, duplicates keep the first vector
    pub fn insert(&mut self, word: impl Into<String>, values: Vec<f32>) -> Result<()> {
        let word = word.into();
        if self.dimension == 0 {
            self.dimension = values.len();
        } else if values.len() != self.dimension {
            return Err(WordGameError::DimensionMismatch {
                expected: self.dimension,
                actual: values.len(),
            });
        }

        if !self.vectors.contains_key(&word) {
            self.order.push(word.clone());
            self.vectors.insert(word, Embedding::new(values));
        }
        Ok(())
    }

    /// Load a `.vec` text file, keeping at most `limit` vectors
    pub fn load_text_file(path: impl AsRef<Path>, limit: Option<usize>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let vectors = Self::from_reader(BufReader::new(file), limit)?;

        tracing::info!(
            "Loaded {} vectors (dim={}) from {}",
            vectors.len(),
            vectors.dimension,
            path.display()
        );
        Ok(vectors)
    }

    /// Parse the text format from any buffered reader
    pub fn from_reader<R: BufRead>(reader: R, limit: Option<usize>) -> Result<Self> {
        let mut vectors = Self::new();
        let limit = limit.unwrap_or(usize::MAX);

        for (idx, line) in reader.lines().enumerate() {
            if vectors.len() >= limit {
                break;
            }
            let line = line?;
            let line_no = idx + 1;
            let mut parts = line.split_whitespace();

            let Some(word) = parts.next() else {
                continue;
            };
            let rest: Vec<&str> = parts.collect();

            // `count dim` header
            if idx == 0 && rest.len() == 1 && word.parse::<usize>().is_ok() {
                if let Ok(dim) = rest[0].parse::<usize>() {
                    vectors.dimension = dim;
                    continue;
                }
            }

            let values = rest
                .iter()
                .map(|v| v.parse::<f32>())
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| WordGameError::VectorFormat {
                    line: line_no,
                    message: format!("'{}': {}", word, e),
                })?;

            if values.is_empty() {
                return Err(WordGameError::VectorFormat {
                    line: line_no,
                    message: format!("'{}' has no components", word),
                });
            }

            vectors.insert(word, values).map_err(|e| WordGameError::VectorFormat {
                line: line_no,
                message: e.to_string(),
            })?;
        }

        Ok(vectors)
    }

    /// Known words in load order
    pub fn words(&self) -> &[String] {
        &self.order
    }
}

impl VectorSource for InMemoryVectors {
    fn vector(&self, word: &str) -> Option<&Embedding> {
        self.vectors.get(word)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }

    fn name(&self) -> &str {
        "memory"
    }
}
