use serde::{Deserialize, Serialize};

use super::SeriesPoint;

/// Axis label format for bucket starts
pub const AXIS_DATE_FORMAT: &str = "%d-%m-%y %H:%M";

/// The three views drawn for every series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Raw,
    Rolling,
    Cumulative,
}

/// A renderable line chart; points without a value are gaps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub kind: ChartKind,
    pub title: String,
    /// Series label: "full system" or a client IP
    pub label: String,
    pub points: Vec<SeriesPoint<Option<f64>>>,
}

impl Chart {
    /// Largest defined value, 0.0 for an all-gap chart
    pub fn max_value(&self) -> f64 {
        self.points
            .iter()
            .filter_map(|p| p.value)
            .fold(0.0, f64::max)
    }

    /// Bucket starts formatted for an axis
    pub fn axis_labels(&self) -> Vec<String> {
        self.points
            .iter()
            .map(|p| p.start.format(AXIS_DATE_FORMAT).to_string())
            .collect()
    }
}
