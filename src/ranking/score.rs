use serde::{Deserialize, Serialize};

use crate::error::{Result, WordGameError};
use crate::ranking::Ranking;

/// Default distance ceiling
pub const DEFAULT_SCORE_CEILING: u32 = 5000;

/// Default clamp applied by [`BoundsPolicy::Clamped`]
pub const DEFAULT_MIN_FLOOR: f32 = 0.30;
pub const DEFAULT_MAX_CAP: f32 = 0.64;

/// How score bounds are derived from a ranking
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum BoundsPolicy {
    /// Raw min/max similarity across the ranked vocabulary
    Empirical,
    /// Empirical bounds with `max <= max_cap` and `min >= min_floor`
    Clamped { min_floor: f32, max_cap: f32 },
}

impl Default for BoundsPolicy {
    fn default() -> Self {
        BoundsPolicy::Clamped {
            min_floor: DEFAULT_MIN_FLOOR,
            max_cap: DEFAULT_MAX_CAP,
        }
    }
}

/// Similarity range used to interpolate distance scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBounds {
    pub min: f32,
    pub max: f32,
}

impl ScoreBounds {
    /// Requires finite bounds with `max > min`
    pub fn new(min: f32, max: f32) -> Result<Self> {
        let bounds = Self { min, max };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Derive bounds from a built ranking under the given policy
    pub fn from_ranking(ranking: &Ranking, policy: BoundsPolicy) -> Result<Self> {
        let (min, max) = ranking
            .similarity_range()
            .ok_or(WordGameError::EmptyVocabulary)?;

        match policy {
            BoundsPolicy::Empirical => Self::new(min, max),
            BoundsPolicy::Clamped { min_floor, max_cap } => {
                Self::new(min.max(min_floor), max.min(max_cap))
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.max <= self.min {
            return Err(WordGameError::DegenerateBounds {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Map a raw similarity to a distance score in `[1, ceiling]`.
///
/// 1.0 (self match) → 1, `>= max` → 2, `<= min` → `ceiling`, otherwise a
/// truncated linear interpolation between 2 and `ceiling`.
pub fn map_score(similarity: f32, bounds: &ScoreBounds, ceiling: u32) -> Result<u32> {
    bounds.validate()?;

    if similarity == 1.0 {
        return Ok(1);
    }
    if similarity >= bounds.max {
        return Ok(2);
    }
    if similarity <= bounds.min {
        return Ok(ceiling);
    }

    let span = f64::from(ceiling.saturating_sub(2));
    let ratio = f64::from(bounds.max - similarity) / f64::from(bounds.max - bounds.min);
    Ok(2 + (span * ratio) as u32)
}
