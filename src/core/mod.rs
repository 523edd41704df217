pub mod embedding;
pub mod guess_response;

pub use embedding::{cosine_similarity, Embedding};
pub use guess_response::{ClosestWord, GuessResponse, MeaningResponse};
