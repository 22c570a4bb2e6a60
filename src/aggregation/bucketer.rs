//! Fixed-width time bucketing
//!
//! Buckets are anchored at the first timestamp, not at clock boundaries. A
//! bucket starting at `start` takes every timestamp up to and including
//! `start + interval`; a timestamp exactly on a boundary therefore lands in
//! the bucket that closes there.

use chrono::{Duration, NaiveDateTime};
use std::borrow::Cow;

use crate::config::{AggregationConfig, OrderingPolicy};
use crate::error::AnalysisError;
use crate::models::{Bucket, TimeSeries};

/// Counts timestamps into contiguous fixed-width buckets
#[derive(Debug, Clone)]
pub struct TimeBucketer {
    interval_minutes: u32,
    interval: Duration,
    ordering: OrderingPolicy,
}

impl TimeBucketer {
    pub fn new(interval_minutes: u32, ordering: OrderingPolicy) -> Result<Self, AnalysisError> {
        if interval_minutes == 0 {
            return Err(AnalysisError::InvalidInterval);
        }
        Ok(TimeBucketer {
            interval_minutes,
            interval: Duration::minutes(i64::from(interval_minutes)),
            ordering,
        })
    }

    pub fn from_config(config: &AggregationConfig) -> Result<Self, AnalysisError> {
        Self::new(config.interval_minutes, config.ordering)
    }

    pub fn interval_minutes(&self) -> u32 {
        self.interval_minutes
    }

    /// Bucket the timestamps, zero-filling every empty bucket in the range
    pub fn bucket(&self, timestamps: &[NaiveDateTime]) -> Result<TimeSeries, AnalysisError> {
        if timestamps.is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        let ordered = self.ordered(timestamps)?;

        // The forward pass needs non-decreasing input
        let mut start = ordered[0];
        let mut end = start + self.interval;
        let mut buckets = vec![Bucket { start, value: 0 }];

        for &t in ordered.iter() {
            while t > end {
                start = end;
                end = start + self.interval;
                buckets.push(Bucket { start, value: 0 });
            }
            if let Some(current) = buckets.last_mut() {
                current.value += 1;
            }
        }

        Ok(TimeSeries {
            interval_minutes: self.interval_minutes,
            buckets,
        })
    }

    fn ordered<'a>(
        &self,
        timestamps: &'a [NaiveDateTime],
    ) -> Result<Cow<'a, [NaiveDateTime]>, AnalysisError> {
        let first_decrease = timestamps.windows(2).position(|w| w[1] < w[0]);

        match (first_decrease, self.ordering) {
            (None, _) => Ok(Cow::Borrowed(timestamps)),
            (Some(i), OrderingPolicy::Strict) => Err(AnalysisError::OutOfOrder {
                index: i + 1,
                previous: timestamps[i],
                current: timestamps[i + 1],
            }),
            (Some(i), OrderingPolicy::Sort) => {
                log::warn!(
                    "Timestamps go backwards at position {} ({} after {}), sorting before bucketing",
                    i + 1,
                    timestamps[i + 1],
                    timestamps[i]
                );
                let mut sorted = timestamps.to_vec();
                sorted.sort();
                Ok(Cow::Owned(sorted))
            }
        }
    }
}
