// file: src/ranking/ranker.rs
// description: ranks candidate texts against a reference by embedding similarity
// reference: batched embedding followed by a stable descending sort

use super::similarity::cosine_similarity;
use crate::corpus::Corpus;
use crate::embedding::{Embedding, ModelHandle};
use crate::error::{RankerError, Result};
use crate::models::{RankedEntry, RankingReport};
use crate::utils::OperationTimer;
use std::cmp::Ordering;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::debug;

const REFERENCE_LABEL: &str = "job description";

pub struct SimilarityRanker {
    model: Arc<ModelHandle>,
    batch_size: usize,
}

impl SimilarityRanker {
    pub fn new(model: Arc<ModelHandle>, batch_size: usize) -> Self {
        Self {
            model,
            batch_size: batch_size.max(1),
        }
    }

    pub fn model(&self) -> &ModelHandle {
        &self.model
    }

    /// Score every candidate against `reference` and sort descending. Ties
    /// keep their input order. Scores are returned unrounded.
    pub async fn rank<N, T>(
        &self,
        reference: &str,
        candidates: &[(N, T)],
        top_n: Option<NonZeroUsize>,
    ) -> Result<Vec<RankedEntry>>
    where
        N: AsRef<str>,
        T: AsRef<str>,
    {
        if reference.trim().is_empty() {
            return Err(RankerError::EmptyInput(
                "reference text must not be empty".to_string(),
            ));
        }

        if candidates.is_empty() {
            debug!("No candidates to rank");
            return Ok(Vec::new());
        }

        // blank candidates score 0.0 and are never sent to the backend,
        // which may reject empty inputs
        let mut texts = Vec::with_capacity(candidates.len() + 1);
        let mut labels = Vec::with_capacity(candidates.len() + 1);
        texts.push(reference.to_string());
        labels.push(REFERENCE_LABEL);
        for (name, text) in candidates {
            if !text.as_ref().trim().is_empty() {
                texts.push(text.as_ref().to_string());
                labels.push(name.as_ref());
            }
        }

        let embeddings = self.embed_batched(&texts, &labels).await?;
        let Some((reference_embedding, candidate_embeddings)) = embeddings.split_first() else {
            return Err(RankerError::Embedding(
                "no embedding returned for the job description".to_string(),
            ));
        };
        let mut candidate_embeddings = candidate_embeddings.iter();

        let mut scored = Vec::with_capacity(candidates.len());
        for (name, text) in candidates {
            let name = name.as_ref();

            if text.as_ref().trim().is_empty() {
                debug!("No text for {}, scoring 0", name);
                scored.push((name.to_string(), 0.0));
                continue;
            }

            let Some(embedding) = candidate_embeddings.next() else {
                return Err(RankerError::Embedding(format!(
                    "no embedding returned for {}",
                    name
                )));
            };

            if embedding.len() != reference_embedding.len() {
                return Err(RankerError::Embedding(format!(
                    "embedding for {} has dimension {}, expected {}",
                    name,
                    embedding.len(),
                    reference_embedding.len()
                )));
            }

            let score = cosine_similarity(reference_embedding, embedding);
            if !score.is_finite() {
                return Err(RankerError::Embedding(format!(
                    "non-finite similarity score for {}",
                    name
                )));
            }

            scored.push((name.to_string(), score));
        }

        // Vec::sort_by is stable, so equal scores keep candidate order
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        if let Some(limit) = top_n {
            scored.truncate(limit.get());
        }

        Ok(scored
            .into_iter()
            .enumerate()
            .map(|(idx, (name, score))| RankedEntry::new(idx + 1, name, score))
            .collect())
    }

    /// Rank a loaded corpus, carrying its failures and skipped files into the report.
    pub async fn rank_corpus(
        &self,
        reference: &str,
        corpus: &Corpus,
        top_n: Option<NonZeroUsize>,
    ) -> Result<RankingReport> {
        let timer = OperationTimer::new("rank resumes");

        let entries = self.rank(reference, &corpus.candidates(), top_n).await?;
        timer.finish_with_count(corpus.len());

        Ok(RankingReport::new(
            self.model.name().to_string(),
            corpus.len(),
            entries,
            corpus.failures.clone(),
            corpus.skipped.clone(),
        ))
    }

    /// `labels[i]` names `texts[i]` in error messages.
    async fn embed_batched(&self, texts: &[String], labels: &[&str]) -> Result<Vec<Embedding>> {
        let mut embeddings = Vec::with_capacity(texts.len());

        for (batch_index, chunk) in texts.chunks(self.batch_size).enumerate() {
            let start = batch_index * self.batch_size;
            debug!(
                "Embedding batch {} ({} texts)",
                batch_index + 1,
                chunk.len()
            );

            let batch = self.model.embed(chunk).await?;
            if batch.len() != chunk.len() {
                let names = &labels[start..start + chunk.len()];
                return Err(RankerError::Embedding(format!(
                    "model returned {} embeddings for {} texts ({})",
                    batch.len(),
                    chunk.len(),
                    names.join(", ")
                )));
            }

            embeddings.extend(batch);
        }

        Ok(embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::{Embedder, HashingEmbedder};
    use crate::models::{DocumentFormat, ExtractionFailure};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    fn hashing_ranker(batch_size: usize) -> SimilarityRanker {
        let model = ModelHandle::from_embedder(Arc::new(HashingEmbedder::new(4096)));
        SimilarityRanker::new(Arc::new(model), batch_size)
    }

    fn unavailable_ranker() -> SimilarityRanker {
        let model = ModelHandle::new("offline", || {
            Err(RankerError::ModelUnavailable("endpoint down".to_string()))
        });
        SimilarityRanker::new(Arc::new(model), 8)
    }

    fn sample_candidates() -> Vec<(&'static str, &'static str)> {
        vec![
            ("kim.pdf", "Rust and Go backend services, Kubernetes"),
            ("lee.docx", "Watercolor painter and gallery curator"),
            ("ana.pdf", "Python backend engineer, distributed systems, Kafka"),
            ("raj.docx", "Backend engineer, Python, distributed databases"),
            ("sam.pdf", "Pastry chef with ten years of experience"),
        ]
    }

    const JOB: &str = "Senior backend engineer with Python and distributed systems experience";

    #[tokio::test]
    async fn test_every_candidate_ranked_once_in_descending_order() {
        let ranker = hashing_ranker(16);
        let candidates = sample_candidates();

        let ranked = ranker.rank(JOB, &candidates, None).await.unwrap();

        assert_eq!(ranked.len(), candidates.len());
        let mut names: Vec<&str> = ranked.iter().map(|e| e.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["ana.pdf", "kim.pdf", "lee.docx", "raj.docx", "sam.pdf"]);

        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        for (idx, entry) in ranked.iter().enumerate() {
            assert_eq!(entry.rank, idx + 1);
            assert!((-1.0..=1.0).contains(&entry.score));
        }
    }

    #[tokio::test]
    async fn test_text_against_itself_scores_maximum() {
        let ranker = hashing_ranker(16);
        let text = "Staff engineer, compilers and query planners";

        let ranked = ranker.rank(text, &[("x", text)], None).await.unwrap();

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].name, "x");
        assert!((ranked[0].score - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_top_n_is_a_prefix_of_full_ranking() {
        let ranker = hashing_ranker(16);
        let candidates = sample_candidates();
        let full = ranker.rank(JOB, &candidates, None).await.unwrap();

        for n in 1..=7 {
            let limit = NonZeroUsize::new(n).unwrap();
            let truncated = ranker.rank(JOB, &candidates, Some(limit)).await.unwrap();
            let expected_len = n.min(candidates.len());
            assert_eq!(truncated.len(), expected_len);
            assert_eq!(truncated, full[..expected_len].to_vec());
        }
    }

    #[tokio::test]
    async fn test_empty_candidates_return_empty_without_loading_model() {
        let ranker = unavailable_ranker();
        let candidates: Vec<(String, String)> = Vec::new();

        let ranked = ranker.rank(JOB, &candidates, None).await.unwrap();

        assert!(ranked.is_empty());
        assert!(!ranker.model().is_loaded());
    }

    #[tokio::test]
    async fn test_empty_reference_fails_fast() {
        let ranker = unavailable_ranker();
        let result = ranker.rank("   \n", &[("a.pdf", "text")], None).await;
        assert!(matches!(result, Err(RankerError::EmptyInput(_))));
    }

    #[tokio::test]
    async fn test_model_unavailable_aborts_ranking() {
        let ranker = unavailable_ranker();
        let result = ranker.rank(JOB, &[("a.pdf", "text")], None).await;
        assert!(matches!(result, Err(RankerError::ModelUnavailable(_))));
    }

    #[tokio::test]
    async fn test_relevant_resume_ranks_first() {
        let ranker = hashing_ranker(16);
        let candidates = [
            ("A.pdf", "5 years Python, built distributed systems at scale"),
            (
                "B.docx",
                "Graphic designer skilled in Photoshop and Illustrator",
            ),
        ];

        let ranked = ranker.rank(JOB, &candidates, None).await.unwrap();

        assert_eq!(ranked[0].name, "A.pdf");
        assert_eq!(ranked[1].name, "B.docx");
        assert!(ranked[0].score > ranked[1].score);
        assert!(ranked[1].score < 0.2);
    }

    #[tokio::test]
    async fn test_ties_keep_input_order() {
        let ranker = hashing_ranker(16);
        let candidates = [
            ("third.pdf", "python engineer"),
            ("first.pdf", "python engineer"),
            ("second.pdf", "python engineer"),
        ];

        let ranked = ranker.rank(JOB, &candidates, None).await.unwrap();
        let names: Vec<&str> = ranked.iter().map(|e| e.name.as_str()).collect();

        assert_eq!(names, vec!["third.pdf", "first.pdf", "second.pdf"]);
    }

    #[tokio::test]
    async fn test_batch_size_does_not_change_scores() {
        let candidates = sample_candidates();
        let single = hashing_ranker(1).rank(JOB, &candidates, None).await.unwrap();
        let batched = hashing_ranker(64).rank(JOB, &candidates, None).await.unwrap();
        assert_eq!(single, batched);
    }

    struct DroppingEmbedder;

    #[async_trait]
    impl Embedder for DroppingEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>> {
            Ok(texts.iter().skip(1).map(|_| vec![1.0, 0.0]).collect())
        }

        fn dimension(&self) -> usize {
            2
        }

        fn model_name(&self) -> &str {
            "dropping"
        }
    }

    #[tokio::test]
    async fn test_short_batch_names_affected_documents() {
        let model = ModelHandle::from_embedder(Arc::new(DroppingEmbedder));
        let ranker = SimilarityRanker::new(Arc::new(model), 2);

        let err = ranker
            .rank(JOB, &[("a.pdf", "one"), ("b.pdf", "two")], None)
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(matches!(err, RankerError::Embedding(_)));
        assert!(message.contains("job description"));
        assert!(message.contains("a.pdf"));
    }

    /// Rejects empty inputs the way hosted embedding endpoints do.
    struct StrictEmbedder {
        inner: HashingEmbedder,
    }

    #[async_trait]
    impl Embedder for StrictEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>> {
            if texts.iter().any(|t| t.trim().is_empty()) {
                return Err(RankerError::Embedding(
                    "422 Unprocessable Entity: input must not be empty".to_string(),
                ));
            }
            self.inner.embed(texts).await
        }

        fn dimension(&self) -> usize {
            self.inner.dimension()
        }

        fn model_name(&self) -> &str {
            "strict"
        }
    }

    #[tokio::test]
    async fn test_blank_resume_scores_zero_without_reaching_backend() {
        let model = ModelHandle::from_embedder(Arc::new(StrictEmbedder {
            inner: HashingEmbedder::new(1024),
        }));
        let ranker = SimilarityRanker::new(Arc::new(model), 2);
        let candidates = [
            ("scan.pdf", "  \n "),
            ("ana.pdf", "Python backend engineer, distributed systems"),
            ("empty.docx", ""),
        ];

        let ranked = ranker.rank(JOB, &candidates, None).await.unwrap();

        let names: Vec<&str> = ranked.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["ana.pdf", "scan.pdf", "empty.docx"]);
        assert!(ranked[0].score > 0.0);
        assert_eq!(ranked[1].score, 0.0);
        assert_eq!(ranked[2].score, 0.0);
    }

    #[tokio::test]
    async fn test_rank_corpus_carries_failures_and_skips() {
        let ranker = hashing_ranker(16);
        let corpus = Corpus {
            documents: vec![crate::models::Document::new(
                "ok.docx".to_string(),
                DocumentFormat::Docx,
                "Python distributed systems".to_string(),
                10,
            )],
            failures: vec![ExtractionFailure::new(
                "broken.pdf",
                DocumentFormat::Pdf,
                "bad xref",
            )],
            skipped: vec!["X.txt".to_string()],
        };

        let report = ranker.rank_corpus(JOB, &corpus, None).await.unwrap();

        assert_eq!(report.model, "hashing-bow");
        assert_eq!(report.candidate_count, 1);
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.failures[0].name, "broken.pdf");
        assert_eq!(report.skipped, vec!["X.txt".to_string()]);
    }
}
