// file: src/corpus/loader.rs
// description: resume discovery and per-file text extraction with failure isolation
// reference: https://docs.rs/walkdir

use crate::config::CorpusConfig;
use crate::error::{RankerError, Result};
use crate::extractor::TextExtractor;
use crate::models::{Document, DocumentFormat, ExtractionFailure};
use crate::pipeline::ProgressTracker;
use crate::utils::Validator;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// A named in-memory file, e.g. from an upload form.
#[derive(Debug, Clone)]
pub struct NamedUpload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl NamedUpload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Loaded resumes in input order, plus every recognized file that could not
/// be loaded and every file skipped for an unrecognized suffix.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub documents: Vec<Document>,
    pub failures: Vec<ExtractionFailure>,
    pub skipped: Vec<String>,
}

impl Corpus {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.name == name)
    }

    /// `(name, text)` pairs in load order, ready for ranking.
    pub fn candidates(&self) -> Vec<(&str, &str)> {
        self.documents
            .iter()
            .map(|d| (d.name.as_str(), d.text.as_str()))
            .collect()
    }
}

enum Source {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

struct WorkItem {
    name: String,
    format: DocumentFormat,
    source: Source,
}

impl WorkItem {
    fn extract(self, extractor: TextExtractor, max_bytes: u64) -> Result<Document> {
        let bytes = match self.source {
            Source::Path(path) => {
                let size = fs::metadata(&path)
                    .map_err(|source| RankerError::FileOperation {
                        path: path.clone(),
                        source,
                    })?
                    .len();
                Validator::validate_file_size(size, max_bytes)?;

                fs::read(&path).map_err(|source| RankerError::FileOperation { path, source })?
            }
            Source::Bytes(bytes) => {
                Validator::validate_file_size(bytes.len() as u64, max_bytes)?;
                bytes
            }
        };

        let text = extractor.extract_bytes(&bytes, self.format)?;
        Ok(Document::new(
            self.name,
            self.format,
            text,
            bytes.len() as u64,
        ))
    }
}

/// Run a blocking extraction on the blocking pool. A panic inside a parser
/// becomes a parse failure for that document only.
async fn extract_isolated<F>(format: DocumentFormat, job: F) -> Result<Document>
where
    F: FnOnce() -> Result<Document> + Send + 'static,
{
    tokio::task::spawn_blocking(job).await.unwrap_or_else(|e| {
        Err(RankerError::parse(
            format,
            format!("extraction task failed: {}", e),
        ))
    })
}

pub struct CorpusLoader {
    config: CorpusConfig,
    extractor: TextExtractor,
    progress: Option<Arc<ProgressTracker>>,
}

impl CorpusLoader {
    pub fn new(config: CorpusConfig) -> Self {
        Self {
            config,
            extractor: TextExtractor::new(),
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: Arc<ProgressTracker>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Load every direct child file of `root`, sorted by file name.
    pub async fn load_directory(&self, root: &Path) -> Result<Corpus> {
        info!("Loading resumes from: {}", root.display());
        Validator::validate_directory(root)?;

        let mut entries = Vec::new();
        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| RankerError::Io(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            entries.push((name, Source::Path(entry.path().to_path_buf())));
        }

        self.load_entries(entries).await
    }

    /// Load in-memory files in the order given.
    pub async fn load_uploads(&self, uploads: Vec<NamedUpload>) -> Result<Corpus> {
        info!("Loading {} uploaded resumes", uploads.len());

        let entries = uploads
            .into_iter()
            .map(|upload| (upload.name, Source::Bytes(upload.bytes)))
            .collect();

        self.load_entries(entries).await
    }

    async fn load_entries(&self, entries: Vec<(String, Source)>) -> Result<Corpus> {
        let mut corpus = Corpus::default();
        let mut seen = HashSet::new();
        let mut work = Vec::new();

        for (name, source) in entries {
            let Some(format) = DocumentFormat::from_name(&name) else {
                debug!("Skipping unsupported file: {}", name);
                corpus.skipped.push(name);
                continue;
            };

            if !seen.insert(name.clone()) {
                warn!("Duplicate resume name, keeping the first: {}", name);
                corpus.failures.push(ExtractionFailure::new(
                    name,
                    format,
                    "duplicate document name",
                ));
                continue;
            }

            work.push(WorkItem {
                name,
                format,
                source,
            });
        }

        // rejections recorded so far count against the bar like extraction failures
        if let Some(progress) = &self.progress {
            progress.set_total(work.len() + corpus.failures.len());
            for _ in &corpus.skipped {
                progress.inc_skipped();
            }
            for _ in &corpus.failures {
                progress.inc_failed();
            }
        }

        let extractor = self.extractor;
        let max_bytes = (self.config.max_file_size_mb as u64) * 1_048_576;
        let workers = self.config.parallel_workers.max(1);
        let progress = self.progress.clone();

        let results = stream::iter(work.into_iter().map(move |item| {
            let name = item.name.clone();
            let format = item.format;
            let progress = progress.clone();
            async move {
                let outcome =
                    extract_isolated(format, move || item.extract(extractor, max_bytes)).await;

                if let Some(progress) = &progress {
                    match &outcome {
                        Ok(document) => progress.inc_extracted(document.size_bytes),
                        Err(_) => progress.inc_failed(),
                    }
                    progress.set_message(name.clone());
                }

                (name, format, outcome)
            }
        }))
        .buffered(workers)
        .collect::<Vec<_>>()
        .await;

        for (name, format, outcome) in results {
            match outcome {
                Ok(document) => {
                    if document.is_blank() {
                        warn!("No text extracted from {}", name);
                    }
                    corpus.documents.push(document);
                }
                Err(e) => {
                    warn!("Failed to extract {}: {}", name, e);
                    corpus
                        .failures
                        .push(ExtractionFailure::new(name, format, e.to_string()));
                }
            }
        }

        info!(
            "Loaded {} resumes ({} failed, {} skipped)",
            corpus.documents.len(),
            corpus.failures.len(),
            corpus.skipped.len()
        );
        Ok(corpus)
    }
}
