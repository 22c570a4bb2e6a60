mod chart;
mod record;
mod series;

pub use chart::{Chart, ChartKind, AXIS_DATE_FORMAT};
pub use record::{LogRecord, ParseOutcome, SkippedLine};
pub use series::{Bucket, SeriesPoint, TimeSeries};
