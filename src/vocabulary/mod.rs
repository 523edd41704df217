pub mod loader;
pub mod suggest;

use std::collections::HashSet;

pub use loader::{load_or_default, FileVocabulary, StaticVocabulary, VocabularyLoader, DEFAULT_WORDS};
pub use suggest::SpellingIndex;

/// Ordered, duplicate-free word list for one round
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabulary {
    words: Vec<String>,
    index: HashSet<String>,
}

impl Vocabulary {
    /// Build from raw words: trims, skips blanks, keeps the first occurrence of duplicates
    pub fn new<I, W>(words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        let mut vocabulary = Self::default();
        for word in words {
            let word: String = word.into();
            let word = word.trim();
            if word.is_empty() || vocabulary.index.contains(word) {
                continue;
            }
            vocabulary.index.insert(word.to_string());
            vocabulary.words.push(word.to_string());
        }
        vocabulary
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains(word)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
