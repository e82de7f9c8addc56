// file: src/embedding/hashing.rs
// description: deterministic bag-of-words embedder for offline ranking and tests
// reference: feature hashing with signed buckets

use super::{Embedder, Embedding};
use crate::error::Result;
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};

lazy_static! {
    static ref TOKEN_PATTERN: Regex = Regex::new(r"[\p{L}\p{N}]+").unwrap();
}

pub const HASHING_MODEL_NAME: &str = "hashing-bow";

/// Hashes lowercase word tokens into signed buckets and L2-normalizes the
/// result. Identical texts always produce identical vectors; a text with no
/// tokens produces the zero vector.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    pub fn embed_text(&self, text: &str) -> Embedding {
        let mut vector = vec![0.0f32; self.dimension];
        let normalized = text.to_lowercase();

        for token in TOKEN_PATTERN.find_iter(&normalized) {
            let digest = Sha256::digest(token.as_str().as_bytes());

            let mut bucket_bytes = [0u8; 8];
            bucket_bytes.copy_from_slice(&digest[..8]);
            let bucket = (u64::from_le_bytes(bucket_bytes) % self.dimension as u64) as usize;
            let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };

            vector[bucket] += sign;
        }

        let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for v in &mut vector {
                *v /= magnitude;
            }
        }

        vector
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        HASHING_MODEL_NAME
    }
}
