// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{RankerError, Result};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub corpus: CorpusConfig,
    pub embedding: EmbeddingConfig,
    pub ranking: RankingConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorpusConfig {
    pub resumes_dir: PathBuf,
    pub max_file_size_mb: usize,
    pub parallel_workers: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    /// `http` for an OpenAI-compatible endpoint, `hashing` for the offline embedder
    pub provider: String,
    pub endpoint: String,
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub dimension: usize,
    pub batch_size: usize,
    pub timeout_secs: u64,
    #[serde(default)]
    pub serialize_encode: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RankingConfig {
    #[serde(default)]
    pub top_n: Option<usize>,
    pub score_precision: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("RESUME_RANKER")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| RankerError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| RankerError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            corpus: CorpusConfig {
                resumes_dir: PathBuf::from("./resumes"),
                max_file_size_mb: 20,
                parallel_workers: 4,
            },
            embedding: EmbeddingConfig {
                provider: "http".to_string(),
                endpoint: "http://localhost:8080/v1/embeddings".to_string(),
                model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
                api_key: None,
                dimension: 384,
                batch_size: 32,
                timeout_secs: 60,
                serialize_encode: false,
            },
            ranking: RankingConfig {
                top_n: None,
                score_precision: 3,
            },
            export: ExportConfig {
                output_dir: PathBuf::from("./exports"),
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.corpus.parallel_workers == 0 {
            return Err(RankerError::Config(
                "parallel_workers must be greater than 0".to_string(),
            ));
        }

        if self.embedding.batch_size == 0 {
            return Err(RankerError::Config(
                "batch_size must be greater than 0".to_string(),
            ));
        }

        if self.embedding.dimension == 0 {
            return Err(RankerError::Config(
                "dimension must be greater than 0".to_string(),
            ));
        }

        if self.embedding.timeout_secs == 0 {
            return Err(RankerError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.embedding.provider == "http" {
            Validator::validate_url(&self.embedding.endpoint)
                .map_err(|e| RankerError::Config(e.to_string()))?;
        }

        if self.ranking.top_n == Some(0) {
            return Err(RankerError::Config(
                "top_n must be a positive integer".to_string(),
            ));
        }

        if self.ranking.score_precision > 10 {
            return Err(RankerError::Config(
                "score_precision must be at most 10".to_string(),
            ));
        }

        Ok(())
    }
}
