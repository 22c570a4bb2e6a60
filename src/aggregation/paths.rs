use std::collections::HashMap;

use crate::models::LogRecord;

/// Number of requests per path, most requested first, ties by path
pub fn path_occurrences(records: &[LogRecord]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.path.as_str()).or_insert(0) += 1;
    }

    let mut occurrences: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(path, count)| (path.to_string(), count))
        .collect();
    occurrences.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    occurrences
}
