// file: src/utils/mod.rs
// description: utility functions module exports
// reference: internal module structure

pub mod highlight;
pub mod logging;
pub mod telemetry;
pub mod validation;

pub use highlight::{highlight_with, job_keywords};
pub use telemetry::{HealthCheck, HealthReport, HealthStatus, OperationTimer};
pub use validation::Validator;
