// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod exporter;
pub mod extractor;
pub mod models;
pub mod pipeline;
pub mod ranking;
pub mod utils;

pub use config::{Config, CorpusConfig, EmbeddingConfig, ExportConfig, RankingConfig};
pub use corpus::{Corpus, CorpusLoader, NamedUpload, read_job_description};
pub use embedding::{Embedder, Embedding, HashingEmbedder, HttpEmbeddingClient, ModelHandle};
pub use error::{RankerError, Result};
pub use exporter::{JsonExporter, SpreadsheetExporter};
pub use extractor::TextExtractor;
pub use models::{
    Document, DocumentFormat, ExtractionFailure, RankedEntry, RankingReport, round_score,
};
pub use pipeline::{PipelineStats, ProgressTracker, ScreeningOutcome, ScreeningPipeline};
pub use ranking::{SimilarityRanker, cosine_similarity};
pub use utils::{
    HealthCheck, HealthReport, HealthStatus, OperationTimer, Validator, highlight_with,
    job_keywords,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_library_exports() {
        let _config = Config::default_config();
        let model = ModelHandle::from_embedder(Arc::new(HashingEmbedder::new(64)));
        let ranker = SimilarityRanker::new(Arc::new(model), 4);

        let ranked = ranker
            .rank("rust", &[("a.pdf", "rust")], None)
            .await
            .unwrap();
        assert_eq!(ranked[0].rank, 1);
    }
}
