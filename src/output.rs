//! Output formatting and persistence for statistics reports.
//!
//! Supports plain-text tables, JSON serialization, and CSV append.

use anyhow::Result;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::debug;

use crate::analyzers::types::{FieldTable, Report};
use crate::dataset::ClassKey;
use csv::WriterBuilder;

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &Report) {
    debug!("{:#?}", report);
}

/// Serializes a report as pretty-printed JSON. Non-finite values become `null`.
pub fn to_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Renders one field table as aligned text:
///
/// ```text
/// Flavanoids Statistics
///
/// Alcohol Class | Flavanoids Mean | Flavanoids Median | Flavanoids Mode
/// --------------+-----------------+-------------------+----------------
/// Class 1       | 2.98            | 2.98              | 2.68
/// ```
pub fn render_table(table: &FieldTable) -> String {
    let field = table.field.name();
    let header = [
        "Alcohol Class".to_string(),
        format!("{field} Mean"),
        format!("{field} Median"),
        format!("{field} Mode"),
    ];

    let rows: Vec<[String; 4]> = table
        .rows
        .iter()
        .map(|(key, s)| {
            [
                format!("Class {key}"),
                s.mean.to_string(),
                s.median.to_string(),
                s.mode.to_string(),
            ]
        })
        .collect();

    let mut widths = header.each_ref().map(String::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "{field} Statistics");
    out.push('\n');
    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    for row in &rows {
        push_row(&mut out, row, &widths);
    }

    out
}

fn push_row(out: &mut String, cells: &[String; 4], widths: &[usize; 4]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect();
    let _ = writeln!(out, "{}", line.join(" | ").trim_end());
}

/// Renders every table of the report, separated by blank lines.
pub fn render_report(report: &Report) -> String {
    report
        .tables
        .iter()
        .map(render_table)
        .collect::<Vec<_>>()
        .join("\n")
}

/// One CSV line: a single class's statistics for a single field.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    field: &'a str,
    class: ClassKey,
    mean: f64,
    median: f64,
    mode: f64,
}

fn csv_rows(report: &Report) -> impl Iterator<Item = CsvRow<'_>> {
    report.tables.iter().flat_map(|table| {
        table.rows.iter().map(move |(key, s)| CsvRow {
            field: table.field.name(),
            class: *key,
            mean: s.mean,
            median: s.median,
            mode: s.mode,
        })
    })
}

/// Serializes a report as CSV with a header row.
pub fn to_csv(report: &Report) -> Result<String> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    for row in csv_rows(report) {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Appends every row of a [`Report`] to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, report: &Report) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for row in csv_rows(report) {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}
