// file: src/exporter/spreadsheet.rs
// description: two-column xlsx export of a ranking, with read back for verification
// reference: https://docs.rs/rust_xlsxwriter, https://docs.rs/calamine

use crate::error::{RankerError, Result};
use crate::models::RankingReport;
use calamine::{Data, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::fs;
use std::path::Path;
use tracing::info;

pub const RANKING_SHEET: &str = "Ranking";

const HEADER: [&str; 2] = ["Resume", "Score"];

fn export_error(err: XlsxError) -> RankerError {
    RankerError::Export(err.to_string())
}

#[derive(Debug, Clone, Copy)]
pub struct SpreadsheetExporter {
    precision: u32,
}

impl SpreadsheetExporter {
    pub fn new(precision: u32) -> Self {
        Self { precision }
    }

    /// Write one row per ranked entry, in rank order, under a `Resume | Score` header.
    pub fn write(&self, report: &RankingReport, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| RankerError::FileOperation {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();

        {
            let sheet = workbook.add_worksheet();
            sheet.set_name(RANKING_SHEET).map_err(export_error)?;

            for (col, title) in HEADER.iter().enumerate() {
                sheet
                    .write_string_with_format(0, col as u16, *title, &bold)
                    .map_err(export_error)?;
            }

            for (idx, entry) in report.entries.iter().enumerate() {
                let row = (idx + 1) as u32;
                sheet
                    .write_string(row, 0, entry.name.as_str())
                    .map_err(export_error)?;
                sheet
                    .write_number(row, 1, entry.display_score(self.precision))
                    .map_err(export_error)?;
            }

            sheet.set_column_width(0, 40).map_err(export_error)?;
        }

        workbook.save(path).map_err(export_error)?;

        info!(
            "Exported {} ranked resumes to {}",
            report.entries.len(),
            path.display()
        );
        Ok(())
    }

    /// Read the `(name, score)` rows of a ranking sheet, skipping the header.
    pub fn read_back(path: &Path) -> Result<Vec<(String, f64)>> {
        let mut workbook: Xlsx<_> =
            open_workbook(path).map_err(|e| RankerError::Export(format!("{}", e)))?;

        let range = workbook
            .worksheet_range(RANKING_SHEET)
            .map_err(|e| RankerError::Export(e.to_string()))?;

        let mut rows = Vec::new();
        for (idx, row) in range.rows().enumerate().skip(1) {
            let name = match row.first() {
                Some(Data::String(name)) => name.clone(),
                other => {
                    return Err(RankerError::Export(format!(
                        "row {} has no resume name: {:?}",
                        idx + 1,
                        other
                    )));
                }
            };

            let score = match row.get(1) {
                Some(Data::Float(score)) => *score,
                Some(Data::Int(score)) => *score as f64,
                other => {
                    return Err(RankerError::Export(format!(
                        "row {} has no numeric score: {:?}",
                        idx + 1,
                        other
                    )));
                }
            };

            rows.push((name, score));
        }

        Ok(rows)
    }
}
