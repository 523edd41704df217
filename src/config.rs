use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, WordGameError};
use crate::ranking::{BoundsPolicy, DEFAULT_SCORE_CEILING};

/// Which guesses a round accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    /// Only ranked vocabulary words (after normalization)
    #[default]
    Rank,
    /// Any word the vector source knows; out-of-vocabulary guesses get a
    /// distance but no rank
    Distance,
}

/// Round/engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Worst distance score
    pub score_ceiling: u32,
    pub bounds: BoundsPolicy,
    /// Fold `-mek`/`-mak` infinitives onto `-me`/`-ma` vocabulary words
    pub normalization: bool,
    pub scoring: ScoringMode,
    /// Upper limit for closest-words listings
    pub max_closest: usize,
    /// Spelling suggestions attached to unknown guesses
    pub suggestions: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            score_ceiling: DEFAULT_SCORE_CEILING,
            bounds: BoundsPolicy::default(),
            normalization: true,
            scoring: ScoringMode::Rank,
            max_closest: 500,
            suggestions: 3,
        }
    }
}

impl EngineConfig {
    /// Load from a YAML file; absent keys keep their defaults
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.score_ceiling < 2 {
            return Err(WordGameError::Config(format!(
                "score_ceiling must be >= 2, got {}",
                self.score_ceiling
            )));
        }
        if let BoundsPolicy::Clamped { min_floor, max_cap } = self.bounds {
            if min_floor >= max_cap {
                return Err(WordGameError::Config(format!(
                    "min_floor ({}) must be below max_cap ({})",
                    min_floor, max_cap
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.score_ceiling, 5000);
        assert!(config.normalization);
        assert_eq!(config.scoring, ScoringMode::Rank);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml() {
        let config = EngineConfig::from_yaml_str(
            "score_ceiling: 15000\nscoring: distance\nbounds:\n  policy: empirical\n",
        )
        .unwrap();
        assert_eq!(config.score_ceiling, 15000);
        assert_eq!(config.scoring, ScoringMode::Distance);
        assert_eq!(config.bounds, BoundsPolicy::Empirical);
        assert!(config.normalization);
    }

    #[test]
    fn test_invalid_yaml_values() {
        assert!(matches!(
            EngineConfig::from_yaml_str("score_ceiling: 1"),
            Err(WordGameError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_yaml_str(
                "bounds:\n  policy: clamped\n  min_floor: 0.7\n  max_cap: 0.6\n"
            ),
            Err(WordGameError::Config(_))
        ));
        assert!(EngineConfig::from_yaml_str("scoring: [").is_err());
    }
}
