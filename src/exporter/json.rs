// file: src/exporter/json.rs
// description: json export of ranking reports

use crate::error::{RankerError, Result};
use crate::models::RankingReport;
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl JsonExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, report: &RankingReport, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }

    pub fn write(&self, report: &RankingReport, path: &Path, pretty: bool) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| RankerError::FileOperation {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = self.render(report, pretty)?;
        fs::write(path, json).map_err(|source| RankerError::FileOperation {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Wrote ranking report to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentFormat, ExtractionFailure, RankedEntry};
    use tempfile::tempdir;

    #[test]
    fn test_write_report_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reports").join("ranking.json");
        let report = RankingReport::new(
            "hashing-bow".to_string(),
            2,
            vec![RankedEntry::new(1, "A.pdf".to_string(), 0.75)],
            vec![ExtractionFailure::new("bad.pdf", DocumentFormat::Pdf, "bad xref")],
            vec!["notes.txt".to_string()],
        );

        JsonExporter::new().write(&report, &path, true).unwrap();

        let parsed: RankingReport =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.entries, report.entries);
        assert_eq!(parsed.failures, report.failures);
        assert_eq!(parsed.skipped, vec!["notes.txt".to_string()]);
        assert_eq!(parsed.truncated_count(), 1);
    }
}
