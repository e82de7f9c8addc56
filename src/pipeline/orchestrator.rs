// file: src/pipeline/orchestrator.rs
// description: coordinates resume loading, similarity ranking, and report export
// reference: orchestrates asynchronous screening workflow

use crate::config::Config;
use crate::corpus::{Corpus, CorpusLoader, NamedUpload};
use crate::embedding::ModelHandle;
use crate::error::{RankerError, Result};
use crate::exporter::{JsonExporter, SpreadsheetExporter};
use crate::models::RankingReport;
use crate::pipeline::progress::{PipelineStats, ProgressTracker};
use crate::ranking::SimilarityRanker;
use crate::utils::{HealthCheck, HealthReport, HealthStatus, Validator};
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// A finished screening run.
#[derive(Debug, Clone)]
pub struct ScreeningOutcome {
    pub report: RankingReport,
    pub corpus: Corpus,
    pub stats: PipelineStats,
}

pub struct ScreeningPipeline {
    config: Config,
    model: Arc<ModelHandle>,
    ranker: SimilarityRanker,
    show_progress: bool,
    colored: bool,
}

impl ScreeningPipeline {
    pub fn new(config: Config) -> Result<Self> {
        let model = Arc::new(ModelHandle::from_config(&config.embedding)?);
        Ok(Self::with_model(config, model))
    }

    /// Build around an existing model handle, e.g. one shared between pipelines.
    pub fn with_model(config: Config, model: Arc<ModelHandle>) -> Self {
        let ranker = SimilarityRanker::new(Arc::clone(&model), config.embedding.batch_size);

        Self {
            config,
            model,
            ranker,
            show_progress: false,
            colored: false,
        }
    }

    pub fn with_progress(mut self, colored: bool) -> Self {
        self.show_progress = true;
        self.colored = colored;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn model(&self) -> &ModelHandle {
        &self.model
    }

    /// Resolve a top-N limit, falling back to the configured one.
    pub fn top_n(&self, requested: Option<usize>) -> Result<Option<NonZeroUsize>> {
        match requested.or(self.config.ranking.top_n) {
            None => Ok(None),
            Some(n) => NonZeroUsize::new(n).map(Some).ok_or_else(|| {
                RankerError::Validation("top-n must be a positive integer".to_string())
            }),
        }
    }

    /// Rank every resume in `resumes_dir` against the job description.
    pub async fn run(
        &self,
        job_description: &str,
        resumes_dir: &Path,
        top_n: Option<NonZeroUsize>,
    ) -> Result<ScreeningOutcome> {
        info!("Starting resume screening");
        Validator::validate_content_not_empty(job_description)?;

        let progress = self.progress_tracker();
        let corpus = self
            .loader(Arc::clone(&progress))
            .load_directory(resumes_dir)
            .await?;

        self.rank(job_description, corpus, top_n, progress).await
    }

    /// Rank in-memory uploads in the order given.
    pub async fn run_uploads(
        &self,
        job_description: &str,
        uploads: Vec<NamedUpload>,
        top_n: Option<NonZeroUsize>,
    ) -> Result<ScreeningOutcome> {
        info!("Starting resume screening for {} uploads", uploads.len());
        Validator::validate_content_not_empty(job_description)?;

        let progress = self.progress_tracker();
        let corpus = self
            .loader(Arc::clone(&progress))
            .load_uploads(uploads)
            .await?;

        self.rank(job_description, corpus, top_n, progress).await
    }

    /// Write the requested exports. Either path may be omitted.
    pub fn export(
        &self,
        report: &RankingReport,
        xlsx: Option<&Path>,
        json: Option<&Path>,
    ) -> Result<()> {
        if let Some(path) = xlsx {
            SpreadsheetExporter::new(self.config.ranking.score_precision).write(report, path)?;
        }

        if let Some(path) = json {
            JsonExporter::new().write(report, path, true)?;
        }

        Ok(())
    }

    /// Probe the embedding model and the resumes directory.
    pub async fn health_check(&self, resumes_dir: &Path) -> HealthReport {
        let mut checks = Vec::new();

        let start = Instant::now();
        let (status, detail) = match self.model.probe().await {
            Ok(dimension) if dimension == self.config.embedding.dimension => (
                HealthStatus::Healthy,
                format!("{} ({} dimensions)", self.model.name(), dimension),
            ),
            Ok(dimension) => (
                HealthStatus::Degraded,
                format!(
                    "{} returned {} dimensions, configured {}",
                    self.model.name(),
                    dimension,
                    self.config.embedding.dimension
                ),
            ),
            Err(e) => (HealthStatus::Unhealthy, e.to_string()),
        };
        checks.push(HealthCheck::new(
            "embedding model",
            status,
            detail,
            start.elapsed(),
        ));

        // a missing directory only degrades; `rank --resumes` can still point elsewhere
        let start = Instant::now();
        let (status, detail) = match Validator::validate_directory(resumes_dir) {
            Ok(()) => (HealthStatus::Healthy, resumes_dir.display().to_string()),
            Err(e) => (HealthStatus::Degraded, e.to_string()),
        };
        checks.push(HealthCheck::new(
            "resumes directory",
            status,
            detail,
            start.elapsed(),
        ));

        HealthReport::new(checks)
    }

    fn progress_tracker(&self) -> Arc<ProgressTracker> {
        Arc::new(if self.show_progress {
            ProgressTracker::with_color(0, self.colored)
        } else {
            ProgressTracker::hidden()
        })
    }

    fn loader(&self, progress: Arc<ProgressTracker>) -> CorpusLoader {
        CorpusLoader::new(self.config.corpus.clone()).with_progress(progress)
    }

    async fn rank(
        &self,
        job_description: &str,
        corpus: Corpus,
        top_n: Option<NonZeroUsize>,
        progress: Arc<ProgressTracker>,
    ) -> Result<ScreeningOutcome> {
        progress.finish();

        if corpus.is_empty() {
            warn!("No resumes could be loaded");
        }

        let report = self
            .ranker
            .rank_corpus(job_description, &corpus, top_n)
            .await?;
        let stats = progress.get_stats();

        self.log_final_stats(&stats, &report);
        Ok(ScreeningOutcome {
            report,
            corpus,
            stats,
        })
    }

    fn log_final_stats(&self, stats: &PipelineStats, report: &RankingReport) {
        info!("=== Screening Summary ===");
        info!("Model: {}", report.model);
        info!("Resumes extracted: {}", stats.documents_extracted);
        info!("Resumes failed: {}", stats.documents_failed);
        info!("Files skipped: {}", stats.documents_skipped);
        info!("Success rate: {:.2}%", stats.success_rate());
        info!(
            "Ranked: {} (omitted by limit: {})",
            report.entries.len(),
            report.truncated_count()
        );
        info!(
            "Text extracted from: {:.2} MB",
            stats.total_bytes_processed as f64 / 1_048_576.0
        );
        info!("=========================");
    }
}
