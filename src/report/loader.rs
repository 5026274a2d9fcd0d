//! Report loading
//!
//! Turns a Word report (or an already converted text file) into the plain
//! text the extractor works on. Paragraphs become lines; table rows become
//! tab-separated lines so label/number pairs inside cells stay adjacent.

use anyhow::{bail, Context, Result};
use std::path::Path;

use super::extractor::parse_report_text;
use super::models::ReportStatistics;

/// Read a `.docx` or `.txt` report and return its plain text.
pub async fn load_report_text(file_path: &Path) -> Result<String> {
    let extension = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "docx" => {
            let data = tokio::fs::read(file_path)
                .await
                .with_context(|| format!("failed to read {}", file_path.display()))?;
            docx_to_text(&data)
        }
        "txt" => tokio::fs::read_to_string(file_path)
            .await
            .with_context(|| format!("failed to read {}", file_path.display())),
        other => bail!(
            "Unsupported report format: .{other}\n\
            Reports must be Word .docx files or plain .txt exports."
        ),
    }
}

/// Load a report and run the extractor over it.
pub async fn parse_report_file(file_path: &Path) -> Result<ReportStatistics> {
    let text = load_report_text(file_path).await?;
    Ok(parse_report_text(&text))
}

/// Flatten the body of a Word document into newline-separated text.
pub fn docx_to_text(data: &[u8]) -> Result<String> {
    let docx = docx_rs::read_docx(data).context("not a readable Word document")?;
    let mut lines = Vec::new();

    for child in &docx.document.children {
        match child {
            docx_rs::DocumentChild::Paragraph(para) => {
                lines.push(extract_paragraph_text(para));
            }
            docx_rs::DocumentChild::Table(table) => {
                for table_child in &table.rows {
                    let docx_rs::TableChild::TableRow(row) = table_child;
                    let cells: Vec<String> = row
                        .cells
                        .iter()
                        .map(|row_child| {
                            let docx_rs::TableRowChild::TableCell(cell) = row_child;
                            cell.children
                                .iter()
                                .filter_map(|content| match content {
                                    docx_rs::TableCellContent::Paragraph(para) => {
                                        Some(extract_paragraph_text(para))
                                    }
                                    _ => None,
                                })
                                .collect::<Vec<_>>()
                                .join(" ")
                        })
                        .collect();
                    lines.push(cells.join("\t"));
                }
            }
            _ => {}
        }
    }

    tracing::debug!(lines = lines.len(), "converted Word report to text");
    Ok(lines.join("\n"))
}

/// Plain text of a paragraph, including tracked insertions.
pub(crate) fn extract_paragraph_text(para: &docx_rs::Paragraph) -> String {
    let mut text = String::new();

    for child in &para.children {
        match child {
            docx_rs::ParagraphChild::Run(run) => {
                text.push_str(&extract_run_text(run));
            }
            docx_rs::ParagraphChild::Insert(insert) => {
                for child in &insert.children {
                    if let docx_rs::InsertChild::Run(run) = child {
                        text.push_str(&extract_run_text(run));
                    }
                }
            }
            // Tracked deletions are not part of the report
            docx_rs::ParagraphChild::Delete(_) => {}
            _ => {}
        }
    }

    text.trim().to_string()
}

pub(crate) fn extract_run_text(run: &docx_rs::Run) -> String {
    let mut text = String::new();

    for child in &run.children {
        match child {
            docx_rs::RunChild::Text(text_elem) => text.push_str(&text_elem.text),
            docx_rs::RunChild::Tab(_) => text.push('\t'),
            docx_rs::RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }

    text
}
