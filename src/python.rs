use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::core::GuessResponse;
use crate::error::WordGameError;
use crate::round::GameRound;
use crate::vectors::{InMemoryVectors, VectorSource};
use crate::vocabulary::{load_or_default, FileVocabulary, Vocabulary};

fn to_py_err(e: WordGameError) -> PyErr {
    match e {
        WordGameError::WordNotFound { .. } => {
            PyErr::new::<pyo3::exceptions::PyKeyError, _>(e.to_string())
        }
        WordGameError::InvalidRange { .. } => {
            PyErr::new::<pyo3::exceptions::PyIndexError, _>(e.to_string())
        }
        e => PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()),
    }
}

/// Python wrapper for one game round
#[pyclass]
struct WordGame {
    round: Arc<GameRound>,
}

#[pymethods]
impl WordGame {
    /// Load vectors (and optionally a vocabulary file) and start a round
    #[new]
    fn new(
        vectors_path: String,
        vocab_path: Option<String>,
        hidden_word: Option<String>,
        limit: Option<usize>,
        config_path: Option<String>,
    ) -> PyResult<Self> {
        let config = match config_path {
            Some(path) => EngineConfig::from_yaml_file(path).map_err(to_py_err)?,
            None => EngineConfig::default(),
        };

        let vectors = InMemoryVectors::load_text_file(&vectors_path, limit).map_err(to_py_err)?;
        let vocabulary = match vocab_path {
            Some(path) => load_or_default(&FileVocabulary::new(path)),
            None => Vocabulary::new(vectors.words().iter().cloned()),
        };
        let vectors: Arc<dyn VectorSource> = Arc::new(vectors);

        let round = match hidden_word {
            Some(word) => GameRound::setup(&word, vocabulary, vectors, config),
            None => GameRound::start(vocabulary, vectors, config, &mut rand::thread_rng()),
        }
        .map_err(to_py_err)?;

        Ok(Self {
            round: Arc::new(round),
        })
    }

    /// Score a guess
    fn guess(&self, word: String) -> PyResult<PyObject> {
        let response = self.round.submit_guess(&word).map_err(to_py_err)?;
        Python::with_gil(|py| guess_response_to_py(py, &response))
    }

    /// Word at a rank
    fn hint(&self, rank: usize) -> PyResult<String> {
        self.round.hint(rank).map_err(to_py_err)
    }

    /// The hidden word
    fn reveal(&self) -> String {
        self.round.reveal().to_string()
    }

    /// Closest words as a list of dicts
    fn closest(&self, limit: Option<usize>) -> PyResult<Vec<PyObject>> {
        let closest = self.round.closest_words(limit.unwrap_or(100));
        Python::with_gil(|py| {
            closest
                .iter()
                .map(|entry| {
                    let dict = PyDict::new(py);
                    dict.set_item("word", &entry.word)?;
                    dict.set_item("rank", entry.rank)?;
                    dict.set_item("similarity", entry.similarity)?;
                    Ok(dict.into())
                })
                .collect()
        })
    }

    #[getter]
    fn total_words(&self) -> usize {
        self.round.total_words()
    }
}

/// Convert GuessResponse to Python dict
fn guess_response_to_py(py: Python, response: &GuessResponse) -> PyResult<PyObject> {
    let dict = PyDict::new(py);
    dict.set_item("word", &response.word)?;
    dict.set_item("matched", &response.matched)?;
    dict.set_item("rank", response.rank)?;
    dict.set_item("total_words", response.total_words)?;
    dict.set_item("similarity", response.similarity)?;
    dict.set_item("distance", response.distance)?;
    dict.set_item("is_correct", response.is_correct)?;
    Ok(dict.into())
}

/// Python module
#[pymodule]
fn wordrank_engine(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<WordGame>()?;
    m.add("__version__", crate::VERSION)?;
    Ok(())
}
