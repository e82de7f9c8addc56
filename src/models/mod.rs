// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod document;
pub mod ranking;

pub use document::{Document, DocumentFormat};
pub use ranking::{ExtractionFailure, RankedEntry, RankingReport, round_score};
