// src/report.rs
use crate::runner::SubmissionResult;

const HEADERS: [&str; 5] = ["(index)", "Name", "CU Used", "Compression Ratio", "Explorer"];

/// Totals across one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub confirmed: usize,
    pub failed: usize,
    /// Sum over confirmed cases only.
    pub total_compute_units: u64,
    pub total_latency_ms: u64,
    pub average_latency_ms: u64,
}

pub fn summarize(results: &[SubmissionResult]) -> BatchSummary {
    let confirmed: Vec<_> = results.iter().filter(|r| r.is_confirmed()).collect();
    let total_latency_ms: u64 = results.iter().map(|r| r.latency_ms).sum();

    BatchSummary {
        total: results.len(),
        confirmed: confirmed.len(),
        failed: results.len() - confirmed.len(),
        total_compute_units: confirmed
            .iter()
            .map(|r| r.compute_units_used().max(0) as u64)
            .sum(),
        total_latency_ms,
        average_latency_ms: if results.is_empty() {
            0
        } else {
            total_latency_ms / results.len() as u64
        },
    }
}

fn rows(results: &[SubmissionResult]) -> Vec<[String; 5]> {
    results
        .iter()
        .enumerate()
        .map(|(index, r)| {
            [
                index.to_string(),
                r.label.clone(),
                r.compute_units_used().to_string(),
                r.compression_ratio(),
                r.explorer(),
            ]
        })
        .collect()
}

/// Renders the results as a plain-text table, one row per case in input order.
pub fn render_table(results: &[SubmissionResult]) -> String {
    let rows = rows(results);

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: [&str; 5]| -> String {
        cells
            .iter()
            .zip(widths.iter())
            .enumerate()
            .map(|(column, (cell, &width))| {
                // numeric columns are right aligned
                if column == 2 || column == 3 {
                    format!(" {:>width$} ", cell, width = width)
                } else {
                    format!(" {:<width$} ", cell, width = width)
                }
            })
            .collect::<Vec<_>>()
            .join("│")
            .trim_end()
            .to_string()
    };

    let separator = widths
        .iter()
        .map(|w| "─".repeat(w + 2))
        .collect::<Vec<_>>()
        .join("┼");

    let mut out = String::new();
    out.push_str(&format_row(HEADERS));
    out.push('\n');
    out.push_str(&separator);
    out.push('\n');

    for row in &rows {
        out.push_str(&format_row([
            row[0].as_str(),
            row[1].as_str(),
            row[2].as_str(),
            row[3].as_str(),
            row[4].as_str(),
        ]));
        out.push('\n');
    }

    out
}

pub fn print_report(results: &[SubmissionResult]) {
    let summary = summarize(results);

    println!("\nCompute Unit Summary:\n");
    print!("{}", render_table(results));
    println!(
        "\n{} cases: {} confirmed, {} failed, {} CU consumed by confirmed cases",
        summary.total, summary.confirmed, summary.failed, summary.total_compute_units
    );
    println!(
        "Latency: {}ms total, {}ms per case on average",
        summary.total_latency_ms, summary.average_latency_ms
    );
}
