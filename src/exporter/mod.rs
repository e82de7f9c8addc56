// file: src/exporter/mod.rs
// description: ranking report exporters

pub mod json;
pub mod spreadsheet;

pub use json::JsonExporter;
pub use spreadsheet::{RANKING_SHEET, SpreadsheetExporter};
