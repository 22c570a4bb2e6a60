//! Rendering of analysis reports

pub mod console;
pub mod html;

use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::analysis::AnalysisReport;
use crate::models::Chart;

/// Errors that can occur while writing a report
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown output format: {0}")]
    UnknownFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Console,
    Json,
    Jsonl,
    Html,
}

impl FromStr for OutputFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" => Ok(OutputFormat::Console),
            "json" => Ok(OutputFormat::Json),
            "jsonl" => Ok(OutputFormat::Jsonl),
            "html" => Ok(OutputFormat::Html),
            _ => Err(OutputError::UnknownFormat(s.to_string())),
        }
    }
}

/// JSON document written by the `json` format
#[derive(Serialize)]
struct ReportDocument<'a> {
    #[serde(flatten)]
    report: &'a AnalysisReport,
    charts: &'a [Chart],
}

/// Writes reports to a file or stdout
pub struct OutputHandler {
    format: OutputFormat,
    writer: Box<dyn Write>,
}

impl OutputHandler {
    /// Create a handler; the file is truncated if it exists
    pub fn new(format: OutputFormat, file_path: Option<PathBuf>) -> Result<Self, OutputError> {
        let writer: Box<dyn Write> = match file_path {
            Some(path) => {
                log::info!("Writing {:?} report to {:?}", format, path);
                Box::new(BufWriter::new(File::create(path)?))
            }
            None => Box::new(io::stdout()),
        };

        Ok(OutputHandler { format, writer })
    }

    /// Render the report and its charts
    pub fn write_report(
        &mut self,
        report: &AnalysisReport,
        charts: &[Chart],
    ) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Console => {
                let text = console::render(report, charts);
                self.writer.write_all(text.as_bytes())?;
            }
            OutputFormat::Json => {
                let document = ReportDocument { report, charts };
                serde_json::to_writer_pretty(&mut self.writer, &document)?;
                self.writer.write_all(b"\n")?;
            }
            OutputFormat::Jsonl => {
                for chart in charts {
                    serde_json::to_writer(&mut self.writer, chart)?;
                    self.writer.write_all(b"\n")?;
                }
            }
            OutputFormat::Html => {
                let page = html::render(report, charts)?;
                self.writer.write_all(page.as_bytes())?;
            }
        }
        self.flush()
    }

    /// Flush any buffered output
    pub fn flush(&mut self) -> Result<(), OutputError> {
        self.writer.flush()?;
        Ok(())
    }
}
