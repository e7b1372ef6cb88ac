use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::config::RuntimePaths;
use crate::ingest::{IngestReport, ingest_file};
use crate::parse::{DEFAULT_SEPARATOR, Separator};
use crate::sqlite::{ensure_sqlite_schema, open_sqlite_connection};

#[derive(Debug, Clone, Args)]
pub struct IngestArgs {
    /// Text file with one customer per line
    #[arg(short = 'f', long = "filename", value_name = "PATH")]
    pub filename: PathBuf,

    /// Field separator used in the file
    #[arg(short = 's', long = "separator", default_value = DEFAULT_SEPARATOR)]
    pub separator: String,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: &IngestArgs, runtime_paths: &RuntimePaths) -> Result<()> {
    let separator = Separator::new(args.separator.as_str())?;
    let filename = runtime_paths.cwd.join(&args.filename);

    let mut connection = open_sqlite_connection(&runtime_paths.db_path)?;
    ensure_sqlite_schema(&connection)?;

    if !args.json {
        println!(
            "ingest: reading customers from '{}', splitting lines on '{separator}' db={}",
            filename.display(),
            runtime_paths.db_path.display()
        );
    }

    let report = ingest_file(&mut connection, &filename, &separator)?;

    if args.json {
        let encoded =
            serde_json::to_string(&report).context("failed to encode ingest report")?;
        println!("{encoded}");
    } else {
        print_summary(&report);
    }

    Ok(())
}

fn print_summary(report: &IngestReport) {
    println!(
        "ingest: saved {} customer(s) from {} line(s) in {}ms",
        report.records_saved, report.lines_read, report.duration_ms
    );
    if let Some(example) = report.example_failed_line() {
        println!("ingest: failed to parse {} line(s)", report.failed_count());
        println!("ingest: an example of a failed line is '{example}'");
    }
}
