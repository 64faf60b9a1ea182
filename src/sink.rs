//! Destinations for finished reports.
//!
//! Writing to the wiki itself is left to an external bot framework; the
//! sinks here print reports or store them as files keyed by page title.

use std::io::Write;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

/// Edit summary used when publishing a report.
pub const EDIT_SUMMARY: &str = "update report";

/// Errors from report sinks.
#[derive(Debug, Error, Diagnostic)]
pub enum SinkError {
    #[error("failed to write report for \"{page}\" to {path}")]
    #[diagnostic(
        code(covibot::sink::write),
        help("Check that the output directory exists and is writable.")
    )]
    Write {
        page: String,
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type SinkResult<T> = std::result::Result<T, SinkError>;

/// Accepts a full-text overwrite of a named report page.
pub trait ReportSink {
    fn publish(&mut self, page: &str, text: &str, summary: &str) -> SinkResult<()>;
}

/// Writes reports to a stream, each preceded by its page title.
pub struct StdoutSink<W: Write = std::io::Stdout> {
    out: W,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self {
            out: std::io::stdout(),
        }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> StdoutSink<W> {
    /// Write to an arbitrary stream instead of stdout.
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for StdoutSink<W> {
    fn publish(&mut self, page: &str, text: &str, _summary: &str) -> SinkResult<()> {
        writeln!(self.out, "== {page} ==\n{text}\n").map_err(|e| SinkError::Write {
            page: page.to_string(),
            path: "<stdout>".into(),
            source: e,
        })
    }
}

/// Stores each report as `<dir>/<page>.wiki`.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File a page title is written to.
    pub fn path_for(&self, page: &str) -> PathBuf {
        self.dir.join(format!("{}.wiki", file_stem(page)))
    }
}

impl ReportSink for DirectorySink {
    fn publish(&mut self, page: &str, text: &str, summary: &str) -> SinkResult<()> {
        let path = self.path_for(page);
        let write_err = |path: &Path, source: std::io::Error| SinkError::Write {
            page: page.to_string(),
            path: path.display().to_string(),
            source,
        };
        std::fs::create_dir_all(&self.dir).map_err(|e| write_err(self.dir.as_path(), e))?;
        std::fs::write(&path, text).map_err(|e| write_err(path.as_path(), e))?;
        tracing::info!(page, path = %path.display(), summary, "report written");
        Ok(())
    }
}

/// Page title as a portable file name.
fn file_stem(page: &str) -> String {
    page.chars()
        .map(|c| match c {
            '/' | ':' | ' ' | '\\' => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "Property talk:P227/Constraint violations/Single best value constraint";

    #[test]
    fn file_stem_replaces_separators() {
        assert_eq!(
            file_stem(PAGE),
            "Property_talk_P227_Constraint_violations_Single_best_value_constraint"
        );
    }

    #[test]
    fn directory_sink_overwrites_report() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut sink = DirectorySink::new(dir.path().join("reports"));

        sink.publish(PAGE, "first", EDIT_SUMMARY).unwrap();
        sink.publish(PAGE, "second", EDIT_SUMMARY).unwrap();

        let written = std::fs::read_to_string(sink.path_for(PAGE)).unwrap();
        assert_eq!(written, "second");
    }

    #[test]
    fn stdout_sink_prefixes_page_title() {
        let mut sink = StdoutSink::with_writer(Vec::new());
        sink.publish(PAGE, "body", EDIT_SUMMARY).unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert!(out.starts_with(&format!("== {PAGE} ==\nbody")));
    }
}
