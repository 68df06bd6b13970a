use csv::ReaderBuilder;

/// The tab dialect WebAssign reports are written in: tab delimiter, `"`
/// quotes, backslash escapes instead of quote doubling, records of uneven
/// width. CRLF and LF line endings are both accepted.
///
/// The dialect also ignores leading whitespace after a delimiter; the csv
/// crate has no switch for that, so cells are trimmed on the left as they
/// are materialized (see [`cell`]).
pub fn reader() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .delimiter(b'\t')
        .quote(b'"')
        .escape(Some(b'\\'))
        .double_quote(false);
    builder
}

/// Materialize one cell under the dialect's skip-initial-space rule.
pub fn cell(raw: &str) -> String {
    raw.trim_start().to_string()
}
