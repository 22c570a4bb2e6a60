//! Access log input
//!
//! Parses the combined access log format written by nginx and Apache:
//!
//! `10.0.0.1 - - [03/Jul/2017:09:50:05 +1000] "GET /index.html HTTP/1.1" 200 512 "-" "curl/7.1"`
//!
//! Only GET requests are recognized. Lines that do not match are skipped and
//! reported in the [`ParseOutcome`], never treated as errors.

use chrono::NaiveDateTime;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::AnalysisError;
use crate::models::{LogRecord, ParseOutcome, SkippedLine};

const LINE_PATTERN: &str = concat!(
    r"^(\S+) - - ",                                              // client IP
    r"\[(\d{2}/[A-Za-z]{3}/\d{4}:\d{2}:\d{2}:\d{2}) [+-]\d{4}\] ", // datetime, offset dropped
    r#""GET (.+?) [A-Za-z]+/[^"\s]+" "#,                          // requested path, may hold spaces
    r"(\d{3}) ",                                                 // status
    r"(\d+) ",                                                   // bytes
    r#""([^"]*)" "#,                                             // referrer
    r#""([^"]*)""#,                                              // user agent
);

const TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S";

/// Matches single access log lines against the fixed pattern
#[derive(Debug, Clone)]
pub struct AccessLogParser {
    pattern: Regex,
}

impl AccessLogParser {
    pub fn new() -> Self {
        AccessLogParser {
            // The pattern is a compile-time constant
            pattern: Regex::new(LINE_PATTERN).expect("access log pattern is valid"),
        }
    }

    /// Parse one line, returning `None` when it does not match
    pub fn parse_line(&self, line: &str) -> Option<LogRecord> {
        let caps = self.pattern.captures(line.trim_end())?;

        let client_ip = IpAddr::from_str(&caps[1]).ok()?;
        let timestamp = NaiveDateTime::parse_from_str(&caps[2], TIMESTAMP_FORMAT).ok()?;
        let status = caps[4].parse().ok()?;
        let bytes = caps[5].parse().ok()?;

        Some(LogRecord {
            client_ip,
            timestamp,
            path: caps[3].to_string(),
            status,
            bytes,
            referrer: caps[6].to_string(),
            user_agent: caps[7].to_string(),
        })
    }

    /// Parse every line of a log held in memory
    pub fn parse_str(&self, text: &str) -> ParseOutcome {
        let mut outcome = ParseOutcome::default();
        for (index, line) in text.lines().enumerate() {
            self.accept(&mut outcome, index + 1, line);
        }
        outcome
    }

    /// Parse every line from a reader; invalid UTF-8 is replaced, not fatal
    pub fn parse_reader<R: Read>(&self, reader: R) -> std::io::Result<ParseOutcome> {
        let mut reader = BufReader::new(reader);
        let mut outcome = ParseOutcome::default();
        let mut buf = Vec::new();
        let mut line_number = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break; // EOF
            }
            line_number += 1;
            let line = String::from_utf8_lossy(&buf);
            self.accept(&mut outcome, line_number, &line);
        }

        Ok(outcome)
    }

    fn accept(&self, outcome: &mut ParseOutcome, line_number: usize, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        match self.parse_line(line) {
            Some(record) => outcome.records.push(record),
            None => {
                log::debug!("Skipping line {}: {}", line_number, line.trim_end());
                outcome.skipped.push(SkippedLine {
                    line_number,
                    content: line.trim_end().to_string(),
                });
            }
        }
    }
}

impl Default for AccessLogParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads a whole access log file
pub struct AccessLogReader {
    file_path: PathBuf,
    parser: AccessLogParser,
}

impl AccessLogReader {
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        AccessLogReader {
            file_path: file_path.as_ref().to_path_buf(),
            parser: AccessLogParser::new(),
        }
    }

    /// Read and parse the file; the handle is closed before returning
    pub fn read_all(&self) -> Result<ParseOutcome, AnalysisError> {
        let file = File::open(&self.file_path).map_err(|source| AnalysisError::FileAccess {
            path: self.file_path.clone(),
            source,
        })?;
        log::info!("Reading access log {:?}", self.file_path);

        let outcome = self
            .parser
            .parse_reader(file)
            .map_err(|source| AnalysisError::FileAccess {
                path: self.file_path.clone(),
                source,
            })?;

        log::info!(
            "Parsed {} request(s) from {:?}",
            outcome.parsed_count(),
            self.file_path
        );
        if outcome.skipped_count() > 0 {
            log::warn!(
                "Skipped {} line(s) that did not match the access log format",
                outcome.skipped_count()
            );
        }

        Ok(outcome)
    }
}
