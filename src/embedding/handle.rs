// file: src/embedding/handle.rs
// description: lazily loaded, shareable embedding model handle
// reference: https://docs.rs/tokio/latest/tokio/sync/struct.OnceCell.html

use super::hashing::HashingEmbedder;
use super::http::HttpEmbeddingClient;
use super::{Embedder, Embedding};
use crate::config::EmbeddingConfig;
use crate::error::{RankerError, Result};
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info};

type Loader = Box<dyn Fn() -> Result<Arc<dyn Embedder>> + Send + Sync>;

/// Owns the embedding model for the process. The model is built on first
/// use; concurrent first callers wait on the same initialisation, and a failed
/// load is retried on the next call.
pub struct ModelHandle {
    name: String,
    loader: Loader,
    model: OnceCell<Arc<dyn Embedder>>,
    encode_lock: Option<Mutex<()>>,
}

impl ModelHandle {
    pub fn new<F>(name: impl Into<String>, loader: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn Embedder>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            loader: Box::new(loader),
            model: OnceCell::new(),
            encode_lock: None,
        }
    }

    /// Wrap an already constructed model.
    pub fn from_embedder(embedder: Arc<dyn Embedder>) -> Self {
        let name = embedder.model_name().to_string();
        let fallback = Arc::clone(&embedder);

        Self {
            name,
            loader: Box::new(move || Ok(Arc::clone(&fallback))),
            model: OnceCell::new_with(Some(embedder)),
            encode_lock: None,
        }
    }

    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        let handle = match config.provider.as_str() {
            "http" => {
                let config = config.clone();
                Self::new(config.model.clone(), move || {
                    let client = HttpEmbeddingClient::new(&config)?;
                    Ok(Arc::new(client) as Arc<dyn Embedder>)
                })
            }
            "hashing" => {
                let dimension = config.dimension;
                Self::new(super::hashing::HASHING_MODEL_NAME, move || {
                    Ok(Arc::new(HashingEmbedder::new(dimension)) as Arc<dyn Embedder>)
                })
            }
            other => {
                return Err(RankerError::Config(format!(
                    "Unknown embedding provider '{}' (expected 'http' or 'hashing')",
                    other
                )));
            }
        };

        Ok(if config.serialize_encode {
            handle.serialized()
        } else {
            handle
        })
    }

    /// Allow at most one `embed` call at a time, for backends that are not
    /// safe to call concurrently.
    pub fn serialized(mut self) -> Self {
        self.encode_lock = Some(Mutex::new(()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_loaded(&self) -> bool {
        self.model.initialized()
    }

    pub async fn get(&self) -> Result<Arc<dyn Embedder>> {
        let model = self
            .model
            .get_or_try_init(|| async {
                info!("Loading embedding model: {}", self.name);
                (self.loader)().map_err(|e| match e {
                    RankerError::ModelUnavailable(_) => e,
                    other => RankerError::ModelUnavailable(other.to_string()),
                })
            })
            .await?;

        Ok(Arc::clone(model))
    }

    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        let model = self.get().await?;

        let _guard = match &self.encode_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };

        debug!("Encoding {} texts with {}", texts.len(), self.name);
        model.embed(texts).await
    }

    /// Encode a short text and return the observed vector dimension.
    pub async fn probe(&self) -> Result<usize> {
        let embeddings = self.embed(&["health check".to_string()]).await?;
        embeddings
            .first()
            .map(|e| e.len())
            .ok_or_else(|| RankerError::Embedding("Probe returned no embedding".to_string()))
    }
}
