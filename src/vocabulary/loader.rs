use std::fs;
use std::path::PathBuf;

use crate::error::Result;
use crate::vocabulary::Vocabulary;

/// Built-in fallback word list
pub const DEFAULT_WORDS: &[&str] = &[
    "bilişim", "bilgisayar", "yazılım", "donanım", "internet", "ağ", "veri", "program",
    "elma", "armut", "kiraz", "meyve", "sebze", "ekmek", "su", "çay",
    "kitap", "defter", "kalem", "okul", "öğretmen", "öğrenci", "ders", "sınav",
    "ev", "kapı", "pencere", "masa", "sandalye", "oda", "bahçe", "ağaç",
    "deniz", "dağ", "nehir", "göl", "güneş", "ay", "yıldız", "bulut",
    "araba", "tren", "uçak", "gemi", "yol", "şehir", "köy", "ülke",
    "çalışmak", "çalışma", "okumak", "okuma", "yazmak", "yazma", "gelmek", "gitmek",
    "sevgi", "mutluluk", "korku", "umut", "zaman", "hayat", "dünya", "insan",
];

/// Trait for vocabulary sources
pub trait VocabularyLoader: Send + Sync {
    /// Load raw words in order
    fn load(&self) -> Result<Vec<String>>;

    /// Get loader name for logging
    fn name(&self) -> &str;
}

/// One word per line; blank lines and `#` comments are skipped
pub struct FileVocabulary {
    path: PathBuf,
}

impl FileVocabulary {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl VocabularyLoader for FileVocabulary {
    fn load(&self) -> Result<Vec<String>> {
        let content = fs::read_to_string(&self.path)?;
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect())
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Fixed in-memory word list
#[derive(Debug, Clone, Default)]
pub struct StaticVocabulary {
    words: Vec<String>,
}

impl StaticVocabulary {
    pub fn new<I, W>(words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// The built-in default list
    pub fn builtin() -> Self {
        Self::new(DEFAULT_WORDS.iter().copied())
    }
}

impl VocabularyLoader for StaticVocabulary {
    fn load(&self) -> Result<Vec<String>> {
        Ok(self.words.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Load a vocabulary, falling back to [`DEFAULT_WORDS`] when the loader fails
/// or yields nothing
pub fn load_or_default(loader: &dyn VocabularyLoader) -> Vocabulary {
    match loader.load() {
        Ok(words) => {
            let vocabulary = Vocabulary::new(words);
            if vocabulary.is_empty() {
                tracing::warn!("⚠️ Vocabulary '{}' is empty, using built-in list", loader.name());
                Vocabulary::new(DEFAULT_WORDS.iter().copied())
            } else {
                tracing::info!("📚 Loaded {} words from {}", vocabulary.len(), loader.name());
                vocabulary
            }
        }
        Err(e) => {
            tracing::warn!(
                "⚠️ Vocabulary '{}' unavailable ({}), using built-in list",
                loader.name(),
                e
            );
            Vocabulary::new(DEFAULT_WORDS.iter().copied())
        }
    }
}
