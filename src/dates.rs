use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{Error, Result};

/// Datetime shapes seen in WebAssign exports, most specific first.
const DATETIME_FORMATS: &[&str] = &[
    "%A, %B %d, %Y %I:%M:%S %p",
    "%A, %B %d, %Y %I:%M %p",
    "%A, %B %d, %Y %H:%M:%S",
    "%A, %B %d, %Y %H:%M",
    "%B %d, %Y %I:%M:%S %p",
    "%B %d, %Y %I:%M %p",
    "%B %d, %Y %H:%M:%S",
    "%B %d, %Y %H:%M",
    // two-digit years first: %Y would swallow "21" as year 21 AD
    "%m/%d/%y %I:%M %p",
    "%m/%d/%y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Date-only shapes; midnight is assumed.
const DATE_FORMATS: &[&str] = &[
    "%A, %B %d, %Y",
    "%B %d, %Y",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
];

/// Permissive parse of a report timestamp such as
/// `"Friday, August 20, 2021 11:59 PM CDT"` or `"09/01/2021"`.
///
/// The trailing timezone abbreviation carries no offset information in the
/// export, so it is dropped and the result is naive local time.
pub fn parse_permissive(raw: &str) -> Option<NaiveDateTime> {
    let cleaned = strip_tz_abbreviation(raw.trim());

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(cleaned, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Parse `raw` permissively and format it as ISO-8601
/// (`YYYY-MM-DDTHH:MM:SS`).
pub fn to_iso8601(raw: &str) -> Result<String> {
    parse_permissive(raw)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string())
        .ok_or_else(|| Error::DateParse {
            value: raw.to_string(),
        })
}

/// Drop a trailing `CDT`-style token: uppercase alphabetic, 2 to 5 chars,
/// and not the AM/PM marker.
fn strip_tz_abbreviation(s: &str) -> &str {
    if let Some((head, last)) = s.rsplit_once(char::is_whitespace) {
        let looks_like_tz = (2..=5).contains(&last.len())
            && last.chars().all(|c| c.is_ascii_uppercase())
            && last != "AM"
            && last != "PM";
        if looks_like_tz {
            return head.trim_end();
        }
    }
    s
}
