//! mcguess word vectors
//!
//! Word2vec binary loading and thought-vector similarity

mod similarity;
mod store;

pub use similarity::{cosine_similarity, SimilarityScorer, ThoughtVector};
pub use store::{LoadStats, WordVectorStore, MAX_MODEL_BYTES};
