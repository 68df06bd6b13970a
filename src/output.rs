// src/output.rs
use std::io::Write;

use clap::ValueEnum;

use crate::error::Result;
use crate::report::Row;

/// Output dialects, named after the Python csv module's as the original
/// report tooling exposed them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Dialect {
    /// Comma-separated.
    Excel,
    /// Tab-separated.
    ExcelTab,
    /// Human-readable aligned table.
    Pretty,
}

/// Write the header row (unless `headless`) and every projected row.
///
/// The CSV dialects stream; `pretty` has to measure column widths and so
/// collects the table first.
pub fn write<W, I>(
    out: W,
    dialect: Dialect,
    fieldnames: &[String],
    rows: I,
    headless: bool,
) -> Result<()>
where
    W: Write,
    I: Iterator<Item = Result<Row>>,
{
    match dialect {
        Dialect::Excel => write_delimited(out, b',', fieldnames, rows, headless),
        Dialect::ExcelTab => write_delimited(out, b'\t', fieldnames, rows, headless),
        Dialect::Pretty => write_pretty(out, fieldnames, rows, headless),
    }
}

fn write_delimited<W, I>(
    out: W,
    delimiter: u8,
    fieldnames: &[String],
    rows: I,
    headless: bool,
) -> Result<()>
where
    W: Write,
    I: Iterator<Item = Result<Row>>,
{
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::CRLF)
        .from_writer(out);

    if !headless {
        wtr.write_record(fieldnames)?;
    }
    for row in rows {
        let row = row?;
        wtr.write_record(fieldnames.iter().map(|f| cell_or_empty(&row, f)))?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_pretty<W, I>(mut out: W, fieldnames: &[String], rows: I, headless: bool) -> Result<()>
where
    W: Write,
    I: Iterator<Item = Result<Row>>,
{
    let mut table: Vec<Vec<String>> = Vec::new();
    if !headless {
        table.push(fieldnames.to_vec());
    }
    for row in rows {
        let row = row?;
        table.push(
            fieldnames
                .iter()
                .map(|f| cell_or_empty(&row, f).to_string())
                .collect(),
        );
    }

    let mut widths = vec![0usize; fieldnames.len()];
    for line in &table {
        for (i, cell) in line.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    for line in &table {
        let mut rendered = String::new();
        for (i, cell) in line.iter().enumerate() {
            rendered.push_str(&format!("{:<width$}  ", cell, width = widths[i]));
        }
        writeln!(out, "{}", rendered.trim_end())?;
    }
    out.flush()?;
    Ok(())
}

/// A row missing a selected key (ragged source line) prints as an empty
/// cell.
fn cell_or_empty<'a>(row: &'a Row, field: &str) -> &'a str {
    row.get(field).map(String::as_str).unwrap_or("")
}
