// file: src/models/ranking.rs
// description: ranked resume entries and the report handed to exporters
// reference: Used for similarity ranking results

use super::DocumentFormat;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Round a score for display. Stored scores keep full precision.
pub fn round_score(score: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (score * factor).round() / factor
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// 1-based position in the ranking
    pub rank: usize,

    /// Resume filename
    pub name: String,

    /// Cosine similarity against the job description, in [-1, 1]
    pub score: f64,
}

impl RankedEntry {
    pub fn new(rank: usize, name: String, score: f64) -> Self {
        Self { rank, name, score }
    }

    pub fn display_score(&self, precision: u32) -> f64 {
        round_score(self.score, precision)
    }

    /// Format as a single line for terminal output
    pub fn format_line(&self, precision: u32) -> String {
        format!(
            "{:>3}. {} (Score: {:.*})",
            self.rank,
            self.name,
            precision as usize,
            self.display_score(precision)
        )
    }
}

/// A document that was recognized but could not be ranked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionFailure {
    pub name: String,
    pub format: DocumentFormat,
    pub message: String,
}

impl ExtractionFailure {
    pub fn new(name: impl Into<String>, format: DocumentFormat, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            format,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingReport {
    pub generated_at: String,
    pub model: String,
    pub candidate_count: usize,
    pub entries: Vec<RankedEntry>,
    pub failures: Vec<ExtractionFailure>,
    pub skipped: Vec<String>,
}

impl RankingReport {
    pub fn new(
        model: String,
        candidate_count: usize,
        entries: Vec<RankedEntry>,
        failures: Vec<ExtractionFailure>,
        skipped: Vec<String>,
    ) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            model,
            candidate_count,
            entries,
            failures,
            skipped,
        }
    }

    /// Entries omitted by a top-N limit
    pub fn truncated_count(&self) -> usize {
        self.candidate_count.saturating_sub(self.entries.len())
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
