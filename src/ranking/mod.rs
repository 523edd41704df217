pub mod index;
pub mod normalizer;
pub mod score;

pub use index::{RankedEntry, Ranking};
pub use normalizer::{normalize, normalized_ranks};
pub use score::{map_score, BoundsPolicy, ScoreBounds, DEFAULT_SCORE_CEILING};
