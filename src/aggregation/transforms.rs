//! Series derived from bucketed counts

use crate::error::AnalysisError;
use crate::models::{SeriesPoint, TimeSeries};

/// Moving mean over the last `window` buckets
///
/// The result has one point per bucket. The first `window - 1` points have
/// no value because the window is not yet full.
pub fn rolling_average(
    series: &TimeSeries,
    window: usize,
) -> Result<Vec<SeriesPoint<Option<f64>>>, AnalysisError> {
    if window == 0 {
        return Err(AnalysisError::InvalidWindow);
    }

    let buckets = &series.buckets;
    let mut sum: u64 = 0;
    let points = buckets
        .iter()
        .enumerate()
        .map(|(i, bucket)| {
            sum += bucket.value;
            if i >= window {
                sum -= buckets[i - window].value;
            }
            let value = (i + 1 >= window).then(|| sum as f64 / window as f64);
            SeriesPoint {
                start: bucket.start,
                value,
            }
        })
        .collect();

    Ok(points)
}

/// Running total of the bucket counts
pub fn cumulative_sum(series: &TimeSeries) -> Vec<SeriesPoint<u64>> {
    series
        .buckets
        .iter()
        .scan(0u64, |total, bucket| {
            *total += bucket.value;
            Some(SeriesPoint {
                start: bucket.start,
                value: *total,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Bucket;
    use chrono::{Duration, NaiveDate};

    fn series_of(counts: &[u64]) -> TimeSeries {
        let origin = NaiveDate::from_ymd_opt(2017, 7, 3)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        TimeSeries {
            interval_minutes: 5,
            buckets: counts
                .iter()
                .enumerate()
                .map(|(i, &value)| Bucket {
                    start: origin + Duration::minutes(5 * i as i64),
                    value,
                })
                .collect(),
        }
    }

    fn values<V: Copy>(points: &[SeriesPoint<V>]) -> Vec<V> {
        points.iter().map(|p| p.value).collect()
    }

    #[test]
    fn test_rolling_average() {
        let series = series_of(&[1, 2, 3, 4, 5]);
        let rolled = rolling_average(&series, 3).unwrap();

        assert_eq!(values(&rolled), vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);
        assert_eq!(rolled[4].start, series.buckets[4].start);
    }

    #[test]
    fn test_rolling_window_of_one_is_identity() {
        let series = series_of(&[4, 0, 7]);
        let rolled = rolling_average(&series, 1).unwrap();
        assert_eq!(values(&rolled), vec![Some(4.0), Some(0.0), Some(7.0)]);
    }

    #[test]
    fn test_rolling_window_longer_than_series() {
        let series = series_of(&[1, 2]);
        let rolled = rolling_average(&series, 5).unwrap();
        assert_eq!(rolled.len(), 2);
        assert!(rolled.iter().all(|p| p.value.is_none()));
    }

    #[test]
    fn test_rolling_zero_window() {
        let series = series_of(&[1]);
        assert!(matches!(
            rolling_average(&series, 0),
            Err(AnalysisError::InvalidWindow)
        ));
    }

    #[test]
    fn test_cumulative_sum() {
        let series = series_of(&[1, 2, 3, 4]);
        assert_eq!(values(&cumulative_sum(&series)), vec![1, 3, 6, 10]);
    }

    #[test]
    fn test_cumulative_sum_leaves_source_untouched() {
        let series = series_of(&[3, 0, 2]);
        let before = series.clone();
        let summed = cumulative_sum(&series);

        assert_eq!(series, before);
        assert_eq!(values(&summed), vec![3, 3, 5]);
        assert_eq!(summed.last().map(|p| p.value), Some(series.total()));
    }
}
