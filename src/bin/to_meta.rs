// src/bin/to_meta.rs
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};
use webassign::report;

/// WebAssign to Meta takes a WebAssign Report and produces the meta
/// information.
#[derive(Parser)]
#[command(name = "webassign-to-meta")]
struct Cli {
    /// Input WebAssign report file, defaults to STDIN.
    #[arg(long, default_value = "-")]
    file0: String,
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

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &report.meta()).context("writing meta")?;
    writeln!(out)?;
    Ok(())
}

fn open_input(path: &str) -> io::Result<Box<dyn BufRead>> {
    Ok(match path {
        "-" => Box::new(BufReader::new(io::stdin())),
        p => Box::new(BufReader::new(File::open(p)?)),
    })
}
