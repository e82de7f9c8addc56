// file: src/corpus/mod.rs
// description: resume corpus loading module exports
// reference: internal module structure

pub mod job;
pub mod loader;

pub use job::read_job_description;
pub use loader::{Corpus, CorpusLoader, NamedUpload};
