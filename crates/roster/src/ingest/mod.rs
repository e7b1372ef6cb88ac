use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Error, Result};
use rusqlite::Connection;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::models::CommandFailure;
use crate::parse::{Separator, parse_line, strip_line_terminator};
use crate::sqlite::insert_record;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub source_path: String,
    pub separator: String,
    pub started_at_utc: String,
    pub finished_at_utc: String,
    pub duration_ms: u64,
    pub lines_read: usize,
    pub records_saved: usize,

    /// Raw lines that failed to parse, terminators included.
    pub failed_lines: Vec<String>,
}

impl IngestReport {
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failed_lines.len()
    }

    /// First failed line without its line terminator.
    #[must_use]
    pub fn example_failed_line(&self) -> Option<&str> {
        self.failed_lines
            .first()
            .map(|line| strip_line_terminator(line))
    }
}

/// Opens `path` and ingests every line of it.
pub fn ingest_file(
    connection: &mut Connection,
    path: &Path,
    separator: &Separator,
) -> Result<IngestReport> {
    let file = File::open(path).map_err(|error| {
        Error::new(CommandFailure::io(format!(
            "error opening {}: {error}; does it exist?",
            path.display()
        )))
    })?;

    ingest_reader(
        connection,
        BufReader::new(file),
        separator,
        &path.display().to_string(),
    )
}

/// Parses and persists one line at a time. A line with the wrong field count
/// is kept in the report and never aborts the run; read and storage errors do.
pub fn ingest_reader<R: BufRead>(
    connection: &mut Connection,
    mut reader: R,
    separator: &Separator,
    source_label: &str,
) -> Result<IngestReport> {
    let started_at_utc = now_utc_rfc3339()?;
    let started_at = std::time::Instant::now();

    let mut buffer = Vec::new();
    let mut lines_read = 0usize;
    let mut records_saved = 0usize;
    let mut failed_lines = Vec::new();

    loop {
        buffer.clear();
        let bytes_read = reader.read_until(b'\n', &mut buffer).map_err(|error| {
            Error::new(CommandFailure::io(format!(
                "failed to read line {} of {source_label}: {error}",
                lines_read + 1
            )))
        })?;
        if bytes_read == 0 {
            break;
        }
        lines_read += 1;

        let line = String::from_utf8_lossy(&buffer);
        match parse_line(&line, separator) {
            Ok(record) => {
                insert_record(connection, &record).with_context(|| {
                    format!("failed to save line {lines_read} of {source_label}")
                })?;
                records_saved += 1;
            }
            Err(_) => failed_lines.push(line.into_owned()),
        }
    }

    Ok(IngestReport {
        source_path: source_label.to_string(),
        separator: separator.to_string(),
        started_at_utc,
        finished_at_utc: now_utc_rfc3339()?,
        duration_ms: started_at.elapsed().as_millis() as u64,
        lines_read,
        records_saved,
        failed_lines,
    })
}

fn now_utc_rfc3339() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("failed to format ingest timestamp")
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rusqlite::Connection;

    use super::ingest_reader;
    use crate::parse::Separator;
    use crate::sqlite::ensure_sqlite_schema;

    fn memory_db() -> Connection {
        let connection = Connection::open_in_memory().expect("in-memory sqlite should open");
        ensure_sqlite_schema(&connection).expect("schema creation should succeed");
        connection
    }

    #[test]
    fn keeps_failed_lines_verbatim() {
        let mut connection = memory_db();
        let input = "Ann,Lee,ann@lee.io,rv,Big,30'\nbroken line\r\nBo,Ray,bo@ray.io,van,Small,18 ft";

        let report = ingest_reader(
            &mut connection,
            Cursor::new(input),
            &Separator::default(),
            "inline",
        )
        .expect("ingest should succeed");

        assert_eq!(report.lines_read, 3);
        assert_eq!(report.records_saved, 2);
        assert_eq!(report.failed_lines, vec!["broken line\r\n".to_string()]);
        assert_eq!(report.example_failed_line(), Some("broken line"));
    }

    #[test]
    fn invalid_utf8_is_decoded_lossily() {
        let mut connection = memory_db();
        let input: &[u8] = b"J\xffo,Doe,j@doe.io,rv,Camp,20\n";

        let report = ingest_reader(
            &mut connection,
            Cursor::new(input),
            &Separator::default(),
            "inline",
        )
        .expect("ingest should succeed");

        assert_eq!(report.records_saved, 1);
        let first_name: String = connection
            .query_row("SELECT FirstName FROM Customers", [], |row| row.get(0))
            .expect("customer row should exist");
        assert_eq!(first_name, "J\u{fffd}o");
    }

    #[test]
    fn empty_input_reports_nothing() {
        let mut connection = memory_db();

        let report = ingest_reader(
            &mut connection,
            Cursor::new(""),
            &Separator::default(),
            "inline",
        )
        .expect("ingest should succeed");

        assert_eq!(report.lines_read, 0);
        assert_eq!(report.records_saved, 0);
        assert!(report.failed_lines.is_empty());
        assert_eq!(report.example_failed_line(), None);
    }
}
