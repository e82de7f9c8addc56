// file: src/ranking/mod.rs
// description: similarity ranking module exports
// reference: internal module structure

pub mod ranker;
pub mod similarity;

pub use ranker::SimilarityRanker;
pub use similarity::cosine_similarity;
