//! Time bucketing and the series derived from it

pub mod bucketer;
pub mod paths;
pub mod transforms;

pub use bucketer::TimeBucketer;
pub use paths::path_occurrences;
pub use transforms::{cumulative_sum, rolling_average};
