// src/bin/to_csv.rs
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use webassign::output::{self, Dialect};
use webassign::project::{self, Options, RENAME_DEFAULT, USERNAME_KEY};
use webassign::report;

/// WebAssign to CSV takes a WebAssign Report and produces a CSV of the
/// scores.
#[derive(Parser)]
#[command(name = "webassign-to-csv")]
struct Cli {
    /// Input WebAssign report file, defaults to STDIN.
    #[arg(long, default_value = "-")]
    file0: String,

    /// Output file, defaults to STDOUT.
    #[arg(long, default_value = "-")]
    file1: String,

    /// The CSV dialect of the output. Option excel uses commas, excel-tab
    /// uses tabs, pretty prints a human-readable table.
    #[arg(long, value_enum, default_value_t = Dialect::Excel)]
    dialect1: Dialect,

    /// Print the absolute scores instead of percentages.
    #[arg(long)]
    absolute: bool,

    /// Print the Total column instead of omitting it.
    #[arg(long)]
    keeptotal: bool,

    /// The name of the column to use as the key.
    #[arg(long, default_value = USERNAME_KEY)]
    keyname: String,

    /// The name to rename the key column to; pass an empty string to keep
    /// the original key column name.
    #[arg(long, default_value = RENAME_DEFAULT)]
    rename: String,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let input = open_input(&cli.file0).with_context(|| format!("opening input {:?}", cli.file0))?;
    let report = report::parse(input).context("parsing WebAssign report")?;
    info!(
        course = %report.coursename,
        assignments = report.assignments.len(),
        "parsed report"
    );

    let projection = project::project(
        report,
        &Options {
            absolute: cli.absolute,
            keeptotal: cli.keeptotal,
            keyname: cli.keyname,
            rename: cli.rename,
        },
    );

    let out = open_output(&cli.file1).with_context(|| format!("opening output {:?}", cli.file1))?;
    output::write(
        out,
        cli.dialect1,
        &projection.fieldnames,
        projection.rows,
        false,
    )
    .context("writing scores")?;
    Ok(())
}

fn open_input(path: &str) -> io::Result<Box<dyn BufRead>> {
    Ok(match path {
        "-" => Box::new(BufReader::new(io::stdin())),
        p => Box::new(BufReader::new(File::open(p)?)),
    })
}

fn open_output(path: &str) -> io::Result<Box<dyn Write>> {
    Ok(match path {
        "-" => Box::new(BufWriter::new(io::stdout())),
        p => Box::new(BufWriter::new(File::create(p)?)),
    })
}
