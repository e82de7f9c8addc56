// file: src/extractor/docx.rs
// description: paragraph text extraction from DOCX byte streams
// reference: https://docs.rs/docx-rs

use crate::error::{RankerError, Result};
use crate::models::DocumentFormat;
use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild, read_docx};
use tracing::debug;

/// Body paragraphs joined with newlines. Tables are not body paragraphs and
/// contribute nothing.
pub fn extract_docx(bytes: &[u8]) -> Result<String> {
    let docx = read_docx(bytes).map_err(|e| RankerError::parse(DocumentFormat::Docx, e))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(paragraph) => Some(paragraph_text(paragraph)),
            _ => None,
        })
        .collect();

    debug!("Extracted {} DOCX paragraphs", paragraphs.len());
    Ok(paragraphs.join("\n"))
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    collect_children(&paragraph.children, &mut text);
    text
}

fn collect_children(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => out.push_str(&t.text),
                        RunChild::Tab(_) => out.push('\t'),
                        RunChild::Break(_) => out.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => collect_children(&link.children, out),
            _ => {}
        }
    }
}
