// src/report.rs
use std::collections::HashMap;
use std::io::{BufRead, Cursor, Read};

use serde::Serialize;
use tracing::debug;

use crate::dates;
use crate::dialect;
use crate::error::{Error, Result};

/// Fallback split between student-identity columns and assignment columns
/// when the header block carries no literal `Total` label.
const DEFAULT_SPLIT: usize = 2;

/// One gradable item from the report's assignment header block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub name: String,
    /// Due date, ISO-8601.
    pub due: String,
    /// Maximum score, kept exactly as the report printed it.
    pub total: String,
}

/// One student's raw score record, keyed by field name. Values are the
/// unparsed cell text; numeric interpretation happens in the projector.
pub type Row = HashMap<String, String>;

/// A parsed WebAssign report. Metadata and assignments are fully
/// materialized; `rows` is a single-pass iterator still bound to the open
/// input stream. Consuming it advances the stream, and it cannot be
/// restarted. Dropping the stream before exhausting `rows` is a caller
/// error.
#[derive(Debug)]
pub struct Report<R> {
    pub coursename: String,
    pub instructor: String,
    /// Creation timestamp, ISO-8601.
    pub created: String,
    pub assignments: Vec<Assignment>,
    /// Row keys, in source column order: the identity columns up to the
    /// split, then the assignment names.
    pub fieldnames: Vec<String>,
    pub rows: Rows<R>,
}

/// The report minus its row stream: what `webassign-to-meta` displays.
#[derive(Debug, Serialize)]
pub struct Meta<'a> {
    pub coursename: &'a str,
    pub instructor: &'a str,
    pub created: &'a str,
    pub assignments: &'a [Assignment],
}

impl<R> Report<R> {
    pub fn meta(&self) -> Meta<'_> {
        Meta {
            coursename: &self.coursename,
            instructor: &self.instructor,
            created: &self.created,
            assignments: &self.assignments,
        }
    }
}

/// Lazy iterator over the score table, one [`Row`] per line.
///
/// Ragged lines zip to the shorter side: trailing fieldnames with no cell
/// stay absent from the row. Real exports pad unevenly, so this is
/// accepted source behavior rather than an error.
pub struct Rows<R> {
    fieldnames: Vec<String>,
    records: csv::StringRecordsIntoIter<R>,
}

impl<R> std::fmt::Debug for Rows<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rows")
            .field("fieldnames", &self.fieldnames)
            .finish_non_exhaustive()
    }
}

impl<R: Read> Iterator for Rows<R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(rec) => rec,
            Err(e) => return Some(Err(e.into())),
        };
        let row = self
            .fieldnames
            .iter()
            .zip(record.iter())
            .map(|(name, raw)| (name.clone(), dialect::cell(raw)))
            .collect();
        Some(Ok(row))
    }
}

/// Parse a WebAssign report from `input`.
///
/// The layout is positional: three metadata lines, a blank line, a 3-row
/// tab-delimited assignment block (names / due dates / totals, one
/// assignment per column), a blank line, then the score table with its own
/// header line. Fails when the stream ends inside the header block or a
/// header line does not split under the tab dialect.
pub fn parse<R: BufRead>(mut input: R) -> Result<Report<R>> {
    let coursename = read_line(&mut input, "course name")?.trim().to_string();
    let instructor = read_line(&mut input, "instructor")?.trim().to_string();
    let created_raw = read_line(&mut input, "creation date")?;
    let created = dates::to_iso8601(created_raw.trim())?;

    read_line(&mut input, "separator after course header")?;

    // Buffer the assignment block and re-read it as a table.
    let mut block = String::new();
    for _ in 0..3 {
        block.push_str(&read_line(&mut input, "assignment header block")?);
    }

    read_line(&mut input, "separator after assignment block")?;

    let header_rows: Vec<Vec<String>> = dialect::reader()
        .from_reader(Cursor::new(block))
        .records()
        .map(|r| r.map(|rec| rec.iter().map(dialect::cell).collect()))
        .collect::<csv::Result<_>>()?;
    if header_rows.len() != 3 {
        return Err(Error::MalformedHeader(format!(
            "expected 3 assignment header rows, found {}",
            header_rows.len()
        )));
    }

    let split = header_rows[0]
        .iter()
        .position(|c| c == "Total")
        .unwrap_or(DEFAULT_SPLIT);

    // Transpose the columns after the split into assignments, stopping at
    // the shortest of the three rows.
    let width = header_rows.iter().map(Vec::len).min().unwrap_or(0);
    let mut assignments = Vec::with_capacity(width.saturating_sub(split));
    for i in split..width {
        assignments.push(Assignment {
            name: header_rows[0][i].clone(),
            due: dates::to_iso8601(&header_rows[1][i])?,
            total: header_rows[2][i].clone(),
        });
    }

    // The rest of the stream is the score table.
    let mut records = dialect::reader().from_reader(input).into_records();

    // Its first line only contributes the identity column names; the
    // assignment-name cells are superseded by the block parsed above.
    let header = match records.next() {
        Some(rec) => rec?,
        None => return Err(Error::Truncated("score table header")),
    };
    let mut fieldnames: Vec<String> = header.iter().take(split).map(dialect::cell).collect();
    fieldnames.extend(assignments.iter().map(|a| a.name.clone()));

    debug!(
        course = %coursename,
        assignments = assignments.len(),
        fields = fieldnames.len(),
        "parsed report header"
    );

    Ok(Report {
        coursename,
        instructor,
        created,
        assignments,
        rows: Rows {
            fieldnames: fieldnames.clone(),
            records,
        },
        fieldnames,
    })
}

fn read_line<R: BufRead>(input: &mut R, what: &'static str) -> Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(Error::Truncated(what));
    }
    Ok(line)
}
