// file: src/embedding/mod.rs
// description: sentence embedding backends behind an injectable trait
// reference: internal module structure

pub mod handle;
pub mod hashing;
pub mod http;

pub use handle::ModelHandle;
pub use hashing::HashingEmbedder;
pub use http::HttpEmbeddingClient;

use crate::error::Result;
use async_trait::async_trait;

/// A fixed-length vector produced by an embedding model.
pub type Embedding = Vec<f32>;

/// Trait for text embedding models
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, returning one vector per input in input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>>;

    /// Returns the embedding dimension
    fn dimension(&self) -> usize;

    /// Returns the model name/identifier
    fn model_name(&self) -> &str;
}
