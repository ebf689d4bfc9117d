//! CSV output and terminal previews for batch runs.

use crate::pipeline::AnalysisResult;
use crate::text::{clean, remove_stopwords};
use serde::Serialize;
use std::io::Write;
use thiserror::Error;

/// Errors raised while writing batch output.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Destination could not be written.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
    /// A row could not be encoded.
    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// A review paired with its stopword-free form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRow {
    /// Original review text.
    pub review: String,
    /// Cleaned text with stopwords removed.
    pub normalized_review: String,
}

impl NormalizedRow {
    /// Clean and normalize `review`.
    pub fn from_review(review: String) -> Self {
        let normalized_review = remove_stopwords(&clean(&review));
        Self {
            review,
            normalized_review,
        }
    }
}

#[derive(Serialize)]
struct SampleRow<'a> {
    review: &'a str,
}

#[derive(Serialize)]
struct AnalysisRow<'a> {
    review: &'a str,
    normalized_review: &'a str,
    sentiment: &'a str,
    topics: &'a str,
    summary: &'a str,
}

#[derive(Serialize)]
struct AnalysisRowWithCleaned<'a> {
    review: &'a str,
    cleaned_review: &'a str,
    normalized_review: &'a str,
    sentiment: &'a str,
    topics: &'a str,
    summary: &'a str,
}

/// Write sampled reviews under a single `review` header.
pub fn write_sample_csv<W: Write>(writer: W, reviews: &[String]) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    if reviews.is_empty() {
        csv.write_record(["review"])?;
    }
    for review in reviews {
        csv.serialize(SampleRow { review })?;
    }
    csv.flush()?;
    Ok(())
}

/// Write `review, normalized_review` rows.
pub fn write_normalized_csv<W: Write>(writer: W, rows: &[NormalizedRow]) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        csv.write_record(["review", "normalized_review"])?;
    }
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Write full analysis rows; `with_cleaned` inserts `cleaned_review` after `review`.
pub fn write_analysis_csv<W: Write>(
    writer: W,
    results: &[AnalysisResult],
    with_cleaned: bool,
) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    if results.is_empty() {
        let mut header = vec!["review"];
        if with_cleaned {
            header.push("cleaned_review");
        }
        header.extend(["normalized_review", "sentiment", "topics", "summary"]);
        csv.write_record(header)?;
    }
    for result in results {
        if with_cleaned {
            csv.serialize(AnalysisRowWithCleaned {
                review: &result.review,
                cleaned_review: &result.cleaned_review,
                normalized_review: &result.normalized_review,
                sentiment: result.sentiment.as_str(),
                topics: &result.topics,
                summary: &result.summary,
            })?;
        } else {
            csv.serialize(AnalysisRow {
                review: &result.review,
                normalized_review: &result.normalized_review,
                sentiment: result.sentiment.as_str(),
                topics: &result.topics,
                summary: &result.summary,
            })?;
        }
    }
    csv.flush()?;
    Ok(())
}

const PREVIEW_WIDTH: usize = 60;

/// Render `headers` and the first `limit` rows as an aligned text table.
///
/// Cells are flattened to one line and truncated so wide reviews do not wrap.
pub fn format_preview(headers: &[&str], rows: &[Vec<String>], limit: usize) -> String {
    let shown: Vec<Vec<String>> = rows
        .iter()
        .take(limit)
        .map(|row| row.iter().map(|cell| preview_cell(cell)).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &shown {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, headers.iter().copied(), &widths);
    for row in &shown {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

fn preview_cell(cell: &str) -> String {
    let flat = cell.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= PREVIEW_WIDTH {
        return flat;
    }
    let mut truncated: String = flat.chars().take(PREVIEW_WIDTH - 3).collect();
    truncated.push_str("...");
    truncated
}
