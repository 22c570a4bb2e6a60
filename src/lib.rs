pub mod aggregation;
pub mod analysis;
pub mod config;
pub mod error;
pub mod input;
pub mod models;
pub mod output;

// Re-export commonly used types
pub use models::{LogRecord, ParseOutcome, TimeSeries, Chart};
pub use aggregation::{TimeBucketer, rolling_average, cumulative_sum};
pub use analysis::{Analyzer, AnalysisReport};
pub use config::Config;
pub use error::AnalysisError;
pub use input::{AccessLogParser, AccessLogReader};
pub use output::{OutputHandler, OutputFormat};
