// src/project.rs
use std::collections::HashMap;

use crate::error::Result;
use crate::report::{Assignment, Report, Row};

/// Key column name that triggers username cleanup.
pub const USERNAME_KEY: &str = "Username";
/// Default name the key column is renamed to.
pub const RENAME_DEFAULT: &str = "webassign_username";

#[derive(Debug, Clone)]
pub struct Options {
    /// Emit raw scores instead of percentages.
    pub absolute: bool,
    /// Keep the `Total` column instead of omitting it.
    pub keeptotal: bool,
    /// Name of the key column.
    pub keyname: String,
    /// Name the key column is renamed to; empty disables the rename.
    pub rename: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            absolute: false,
            keeptotal: false,
            keyname: USERNAME_KEY.to_string(),
            rename: RENAME_DEFAULT.to_string(),
        }
    }
}

/// The projected column order plus the lazily transformed rows.
pub struct Projection {
    pub fieldnames: Vec<String>,
    pub rows: Box<dyn Iterator<Item = Result<Row>>>,
}

/// Shape the report's rows for output: select columns, convert scores to
/// percentages unless `absolute`, clean the username key, rename it.
///
/// Every stage wraps the previous iterator without materializing anything;
/// one row pulled downstream pulls exactly one row from the parser.
pub fn project<R: std::io::Read + 'static>(report: Report<R>, options: &Options) -> Projection {
    let assignments: Vec<Assignment> = report
        .assignments
        .iter()
        .filter(|a| options.keeptotal || a.name != "Total")
        .cloned()
        .collect();

    let mut fieldnames = Vec::with_capacity(assignments.len() + 1);
    fieldnames.push(options.keyname.clone());
    fieldnames.extend(assignments.iter().map(|a| a.name.clone()));

    let mut rows: Box<dyn Iterator<Item = Result<Row>>> = if options.absolute {
        let fields = fieldnames.clone();
        Box::new(report.rows.map(move |row| row.map(|r| select(&fields, &r))))
    } else {
        let fields = fieldnames.clone();
        // An assignment whose total is not numeric leaves its column
        // untouched, same as a non-numeric cell.
        let totals: HashMap<String, f64> = assignments
            .iter()
            .filter_map(|a| a.total.parse().ok().map(|t| (a.name.clone(), t)))
            .collect();
        Box::new(
            report
                .rows
                .map(move |row| row.map(|r| percentages(&fields, &totals, &r))),
        )
    };

    if options.keyname == USERNAME_KEY {
        let key = options.keyname.clone();
        rows = Box::new(rows.map(move |row| {
            row.map(|mut r| {
                fix_username(&key, &mut r);
                r
            })
        }));
    }

    let mut out_fieldnames = fieldnames;
    if !options.rename.is_empty() {
        out_fieldnames[0] = options.rename.clone();
        let from = options.keyname.clone();
        let to = options.rename.clone();
        rows = Box::new(rows.map(move |row| {
            row.map(|mut r| {
                if let Some(v) = r.remove(&from) {
                    r.insert(to.clone(), v);
                }
                r
            })
        }));
    }

    Projection {
        fieldnames: out_fieldnames,
        rows,
    }
}

fn select(fieldnames: &[String], row: &Row) -> Row {
    fieldnames
        .iter()
        .filter_map(|f| row.get(f).map(|v| (f.clone(), v.clone())))
        .collect()
}

fn percentages(fieldnames: &[String], totals: &HashMap<String, f64>, row: &Row) -> Row {
    fieldnames
        .iter()
        .filter_map(|f| row.get(f).map(|v| (f.clone(), percent(v, totals.get(f)))))
        .collect()
}

/// `value / total * 100`, formatted like a float, when both sides parse;
/// otherwise the cell passes through as-is (placeholders like "Excused").
/// The key column never converts because no total is recorded for it.
fn percent(value: &str, total: Option<&f64>) -> String {
    match (value.parse::<f64>(), total) {
        (Ok(v), Some(t)) => format!("{:?}", v / t * 100.0),
        _ => value.to_string(),
    }
}

fn fix_username(key: &str, row: &mut Row) {
    if let Some(u) = row.get_mut(key) {
        if let Some(at) = u.find('@') {
            u.truncate(at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report;
    use anyhow::Result;
    use std::io::Cursor;

    fn sample_report() -> String {
        [
            "Calc I",
            "Dr. Brady McCary",
            "August 20, 2021",
            "",
            "Assignments\t\tTotal\tHW1\tHW2\tEC",
            "Due\t\tDecember 17, 2021\tSeptember 1, 2021\
             \tSeptember 8, 2021\tSeptember 15, 2021",
            "Points\t\t20\t10\t10\tTBD",
            "",
            "Fullname\tUsername\tTotal\tHW1\tHW2\tEC",
            "Alice Liddell\talice@example.com\t18\t8\t10\t3",
            "Bob Stone\tbob\t7\t7\tExcused\t1",
        ]
        .join("\r\n")
    }

    fn parse_sample() -> crate::Result<report::Report<Cursor<String>>> {
        report::parse(Cursor::new(sample_report()))
    }

    fn collect(p: Projection) -> Result<Vec<Row>> {
        Ok(p.rows.collect::<crate::Result<_>>()?)
    }

    #[test]
    fn default_projection_end_to_end() -> Result<()> {
        let p = project(parse_sample()?, &Options::default());

        assert_eq!(p.fieldnames, vec!["webassign_username", "HW1", "HW2", "EC"]);

        let rows = collect(p)?;
        let alice = &rows[0];
        assert_eq!(alice["webassign_username"], "alice");
        assert_eq!(alice["HW1"], "80.0");
        assert_eq!(alice["HW2"], "100.0");
        assert!(!alice.contains_key("Username"));
        assert!(!alice.contains_key("Total"));
        Ok(())
    }

    #[test]
    fn absolute_keeptotal_no_rename_round_trips() -> Result<()> {
        let options = Options {
            absolute: true,
            keeptotal: true,
            keyname: "Username".to_string(),
            rename: String::new(),
        };
        let p = project(parse_sample()?, &options);

        assert_eq!(
            p.fieldnames,
            vec!["Username", "Total", "HW1", "HW2", "EC"]
        );

        let rows = collect(p)?;
        // non-key cells come back exactly as the source printed them
        assert_eq!(rows[0]["Total"], "18");
        assert_eq!(rows[0]["HW1"], "8");
        assert_eq!(rows[1]["HW2"], "Excused");
        Ok(())
    }

    #[test]
    fn unparseable_cells_and_totals_pass_through() -> Result<()> {
        let p = project(parse_sample()?, &Options::default());
        let rows = collect(p)?;

        // "Excused" cell survives percentage conversion untouched
        assert_eq!(rows[1]["HW2"], "Excused");
        // the EC column's total is "TBD", so its numeric cells survive too
        assert_eq!(rows[0]["EC"], "3");
        assert_eq!(rows[1]["EC"], "1");
        Ok(())
    }

    #[test]
    fn username_without_at_sign_is_unchanged() -> Result<()> {
        let p = project(parse_sample()?, &Options::default());
        let rows = collect(p)?;
        assert_eq!(rows[1]["webassign_username"], "bob");
        Ok(())
    }

    #[test]
    fn other_keynames_skip_username_cleanup() -> Result<()> {
        let options = Options {
            keyname: "Fullname".to_string(),
            rename: String::new(),
            ..Options::default()
        };
        let p = project(parse_sample()?, &options);

        assert_eq!(p.fieldnames[0], "Fullname");
        let rows = collect(p)?;
        assert_eq!(rows[0]["Fullname"], "Alice Liddell");
        Ok(())
    }

    #[test]
    fn rename_moves_the_key_value() -> Result<()> {
        let options = Options {
            rename: "login".to_string(),
            ..Options::default()
        };
        let p = project(parse_sample()?, &options);

        assert_eq!(p.fieldnames[0], "login");
        let rows = collect(p)?;
        assert_eq!(rows[0]["login"], "alice");
        assert!(!rows[0].contains_key("Username"));
        Ok(())
    }

    #[test]
    fn total_column_is_dropped_unless_kept() -> Result<()> {
        let p = project(parse_sample()?, &Options::default());
        assert!(!p.fieldnames.iter().any(|f| f == "Total"));

        let options = Options {
            keeptotal: true,
            ..Options::default()
        };
        let p = project(parse_sample()?, &options);
        assert!(p.fieldnames.iter().any(|f| f == "Total"));
        let rows = collect(p)?;
        assert_eq!(rows[0]["Total"], "90.0");
        Ok(())
    }

    #[test]
    fn ragged_row_projects_without_missing_keys() -> Result<()> {
        let mut doc = sample_report();
        doc.push_str("\r\nCarol Jones\tcarol@example.com\t15");

        let report = report::parse(Cursor::new(doc))?;
        let p = project(report, &Options::default());
        let rows = collect(p)?;

        let carol = &rows[2];
        assert_eq!(carol["webassign_username"], "carol");
        assert!(!carol.contains_key("HW1"));
        Ok(())
    }
}
