//! Append-only report sinks.
//!
//! The reading log gets one `<timestamp>: <JSON metrics>` line per result; the
//! report log gets the rendered narrative. Write failures are logged and
//! swallowed so a full disk never stops a measurement.

use crate::report::render_narrative;
use crate::types::{Measurement, now_timestamp};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// A result worth recording.
#[derive(Debug, Clone, Copy)]
pub enum ReportEvent<'a> {
    Measurement(&'a Measurement),
    StableWeight(f64),
}

pub trait ReportSink {
    fn record(&self, event: ReportEvent<'_>);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ReportSink for NullSink {
    fn record(&self, _event: ReportEvent<'_>) {}
}

#[derive(Debug, Default, Clone)]
pub struct FileReportSink {
    reading_log: Option<PathBuf>,
    report_log: Option<PathBuf>,
}

impl FileReportSink {
    pub fn new(reading_log: Option<PathBuf>, report_log: Option<PathBuf>) -> Self {
        Self {
            reading_log,
            report_log,
        }
    }

    pub fn reading_log(&self) -> Option<&Path> {
        self.reading_log.as_deref()
    }

    pub fn report_log(&self) -> Option<&Path> {
        self.report_log.as_deref()
    }

    /// Reading-log line for an event, without the trailing newline.
    pub fn reading_line(event: ReportEvent<'_>, timestamp: &str) -> String {
        let body = match event {
            ReportEvent::Measurement(m) => serde_json::Value::Object(m.metrics()),
            ReportEvent::StableWeight(w) => serde_json::json!({ "weight": w }),
        };
        format!("{timestamp}: {body}")
    }
}

fn append(path: &Path, text: &str) {
    let res = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut f| f.write_all(text.as_bytes()));
    if let Err(e) = res {
        tracing::warn!(path = %path.display(), error = %e, "failed to append to log");
    }
}

impl ReportSink for FileReportSink {
    fn record(&self, event: ReportEvent<'_>) {
        let ts = now_timestamp();
        if let Some(path) = &self.reading_log {
            append(path, &format!("{}\n", Self::reading_line(event, &ts)));
        }
        if let (Some(path), ReportEvent::Measurement(m)) = (&self.report_log, event) {
            append(path, &format!("{}\n", render_narrative(m, &ts)));
        }
    }
}
