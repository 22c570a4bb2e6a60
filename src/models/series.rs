use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A value attached to the start of a bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint<V> {
    pub start: NaiveDateTime,
    pub value: V,
}

/// A bucket start with its request count
pub type Bucket = SeriesPoint<u64>;

/// Request counts per fixed-width bucket
///
/// Bucket starts are strictly increasing and exactly `interval_minutes`
/// apart; buckets without requests are present with a count of zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub interval_minutes: u32,
    pub buckets: Vec<Bucket>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Sum of all bucket counts
    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|b| b.value).sum()
    }

    pub fn counts(&self) -> impl Iterator<Item = u64> + '_ {
        self.buckets.iter().map(|b| b.value)
    }

    /// Bucket with the most requests; earliest wins on ties
    pub fn peak(&self) -> Option<&Bucket> {
        self.buckets
            .iter()
            .fold(None, |best: Option<&Bucket>, b| match best {
                Some(top) if top.value >= b.value => Some(top),
                _ => Some(b),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn series() -> TimeSeries {
        let origin = NaiveDate::from_ymd_opt(2017, 7, 3)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        TimeSeries {
            interval_minutes: 10,
            buckets: [2, 7, 0, 7]
                .iter()
                .enumerate()
                .map(|(i, &value)| Bucket {
                    start: origin + Duration::minutes(10 * i as i64),
                    value,
                })
                .collect(),
        }
    }

    #[test]
    fn test_totals() {
        let series = series();

        assert_eq!(series.len(), 4);
        assert_eq!(series.total(), 16);
        assert_eq!(series.counts().collect::<Vec<_>>(), vec![2, 7, 0, 7]);
    }

    #[test]
    fn test_peak_prefers_earliest() {
        let series = series();
        assert_eq!(series.peak().map(|b| b.start), Some(series.buckets[1].start));

        let empty = TimeSeries {
            interval_minutes: 10,
            buckets: Vec::new(),
        };
        assert!(empty.peak().is_none());
        assert!(empty.is_empty());
    }
}
