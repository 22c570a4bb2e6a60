use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// One request parsed from an access log line
///
/// The timestamp is naive: the log's UTC offset is dropped, so times are in
/// whatever zone the server wrote them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub client_ip: IpAddr,
    pub timestamp: NaiveDateTime,
    pub path: String,
    pub status: u16,
    pub bytes: u64,
    pub referrer: String,
    pub user_agent: String,
}

/// A non-blank line that did not match the access log pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedLine {
    /// 1-based line number in the input
    pub line_number: usize,
    pub content: String,
}

/// Result of parsing a whole log: the records plus what was dropped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    pub records: Vec<LogRecord>,
    pub skipped: Vec<SkippedLine>,
}

impl ParseOutcome {
    pub fn parsed_count(&self) -> usize {
        self.records.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Timestamps of every record, in file order
    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.records.iter().map(|r| r.timestamp).collect()
    }

    /// Timestamps of the records from one client, in file order
    pub fn timestamps_for(&self, ip: &IpAddr) -> Vec<NaiveDateTime> {
        self.records
            .iter()
            .filter(|r| &r.client_ip == ip)
            .map(|r| r.timestamp)
            .collect()
    }
}
