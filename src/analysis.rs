//! Whole-run pipeline: parse the log, split it into series, bucket each
//! series and derive the rolling and cumulative views.

use serde::Serialize;
use std::collections::BTreeSet;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::aggregation::{cumulative_sum, rolling_average, TimeBucketer};
use crate::config::{ChartConfig, Config, IpFilter};
use crate::error::AnalysisError;
use crate::input::AccessLogReader;
use crate::models::{Chart, ChartKind, ParseOutcome, SeriesPoint, TimeSeries};

/// Label of the series covering every client
pub const TOTAL_LABEL: &str = "full system";

/// Bucketed counts of one series plus its derived views
#[derive(Debug, Clone, Serialize)]
pub struct SeriesReport {
    pub label: String,
    /// `None` for the total series
    pub client_ip: Option<IpAddr>,
    pub counts: TimeSeries,
    pub rolling: Vec<SeriesPoint<Option<f64>>>,
    pub cumulative: Vec<SeriesPoint<u64>>,
}

/// Everything one run produced
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub source: PathBuf,
    pub parsed_lines: usize,
    pub skipped_lines: usize,
    pub interval_minutes: u32,
    pub roll_count: usize,
    pub series: Vec<SeriesReport>,
}

impl AnalysisReport {
    /// Build the enabled chart kinds for every series, in series order
    pub fn charts(&self, enabled: &ChartConfig) -> Vec<Chart> {
        let mut charts = Vec::new();

        for series in &self.series {
            if enabled.raw {
                charts.push(Chart {
                    kind: ChartKind::Raw,
                    title: format!(
                        "On interval {} minutes for {}",
                        self.interval_minutes, series.label
                    ),
                    label: series.label.clone(),
                    points: series
                        .counts
                        .buckets
                        .iter()
                        .map(|b| SeriesPoint {
                            start: b.start,
                            value: Some(b.value as f64),
                        })
                        .collect(),
                });
            }
            if enabled.rolling {
                charts.push(Chart {
                    kind: ChartKind::Rolling,
                    title: format!(
                        "Rolling Average on {} count roll for {}",
                        self.roll_count, series.label
                    ),
                    label: series.label.clone(),
                    points: series.rolling.clone(),
                });
            }
            if enabled.cumulative {
                charts.push(Chart {
                    kind: ChartKind::Cumulative,
                    title: format!("Cumulative {}", series.label),
                    label: series.label.clone(),
                    points: series
                        .cumulative
                        .iter()
                        .map(|p| SeriesPoint {
                            start: p.start,
                            value: Some(p.value as f64),
                        })
                        .collect(),
                });
            }
        }

        charts
    }
}

/// Runs the pipeline for one configuration
pub struct Analyzer {
    config: Config,
    bucketer: TimeBucketer,
}

impl Analyzer {
    pub fn new(config: Config) -> Result<Self, AnalysisError> {
        config.validate()?;
        let bucketer = TimeBucketer::from_config(&config.aggregation)?;
        Ok(Analyzer { config, bucketer })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read the configured log file and analyze it
    pub fn run(&self) -> Result<AnalysisReport, AnalysisError> {
        let outcome = AccessLogReader::new(&self.config.input.file_path).read_all()?;
        self.analyze(&outcome)
    }

    /// Analyze records that were already parsed
    pub fn analyze(&self, outcome: &ParseOutcome) -> Result<AnalysisReport, AnalysisError> {
        if outcome.records.is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        let mut series = Vec::new();

        if self.config.series.show_total {
            series.push(self.build_series(TOTAL_LABEL.to_string(), None, &outcome.timestamps())?);
        }

        if self.config.series.split_by_ip {
            for ip in self.selected_ips(outcome) {
                let timestamps = outcome.timestamps_for(&ip);
                series.push(self.build_series(ip.to_string(), Some(ip), &timestamps)?);
            }
        }

        Ok(AnalysisReport {
            source: self.config.input.file_path.clone(),
            parsed_lines: outcome.parsed_count(),
            skipped_lines: outcome.skipped_count(),
            interval_minutes: self.bucketer.interval_minutes(),
            roll_count: self.config.aggregation.roll_count,
            series,
        })
    }

    /// Client IPs with requests that the filter selects, sorted
    fn selected_ips(&self, outcome: &ParseOutcome) -> BTreeSet<IpAddr> {
        let filter = &self.config.series.ip_filter;
        let selected: BTreeSet<IpAddr> = outcome
            .records
            .iter()
            .map(|r| r.client_ip)
            .filter(|ip| filter.matches(ip))
            .collect();

        match filter {
            IpFilter::All => log::info!("Found {} distinct client IP(s)", selected.len()),
            IpFilter::Only(listed) => {
                for ip in listed.difference(&selected) {
                    log::warn!("No requests from {} in the log, skipping its series", ip);
                }
            }
        }

        selected
    }

    fn build_series(
        &self,
        label: String,
        client_ip: Option<IpAddr>,
        timestamps: &[chrono::NaiveDateTime],
    ) -> Result<SeriesReport, AnalysisError> {
        let counts = self.bucketer.bucket(timestamps)?;
        let rolling = rolling_average(&counts, self.config.aggregation.roll_count)?;
        let cumulative = cumulative_sum(&counts);

        log::info!(
            "Series '{}': {} request(s) in {} bucket(s) of {} minute(s)",
            label,
            counts.total(),
            counts.len(),
            counts.interval_minutes
        );

        Ok(SeriesReport {
            label,
            client_ip,
            counts,
            rolling,
            cumulative,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::AccessLogParser;
    use std::str::FromStr;

    const LOG: &str = r#"127.0.0.1 - - [03/Jul/2017:09:50:05 +1000] "GET / HTTP/1.1" 200 512 "-" "curl/7.1"
10.0.0.2 - - [03/Jul/2017:09:51:00 +1000] "GET /a HTTP/1.1" 200 10 "-" "curl/7.1"
127.0.0.1 - - [03/Jul/2017:10:02:00 +1000] "GET /b HTTP/1.1" 404 0 "-" "curl/7.1"
POST something that is not a request line
127.0.0.1 - - [03/Jul/2017:10:03:00 +1000] "GET /c HTTP/1.1" 200 99 "-" "curl/7.1"
"#;

    fn outcome() -> ParseOutcome {
        AccessLogParser::new().parse_str(LOG)
    }

    #[test]
    fn test_total_and_all_ips() {
        let analyzer = Analyzer::new(Config::default()).unwrap();
        let report = analyzer.analyze(&outcome()).unwrap();

        assert_eq!(report.parsed_lines, 4);
        assert_eq!(report.skipped_lines, 1);

        let labels: Vec<&str> = report.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec![TOTAL_LABEL, "10.0.0.2", "127.0.0.1"]);

        let total = &report.series[0];
        assert_eq!(total.counts.total(), 4);
        assert_eq!(total.counts.counts().collect::<Vec<_>>(), vec![2, 0, 2]);
        assert_eq!(total.cumulative.last().unwrap().value, 4);
        assert!(total.client_ip.is_none());

        let sum_of_ips: u64 = report.series[1..].iter().map(|s| s.counts.total()).sum();
        assert_eq!(sum_of_ips, 4);
    }

    #[test]
    fn test_ip_filter_and_missing_ip() {
        let mut config = Config::default();
        config.series.show_total = false;
        config.series.ip_filter = IpFilter::Only(
            ["127.0.0.1", "192.0.2.9"]
                .iter()
                .map(|s| IpAddr::from_str(s).unwrap())
                .collect(),
        );

        let report = Analyzer::new(config).unwrap().analyze(&outcome()).unwrap();

        assert_eq!(report.series.len(), 1);
        assert_eq!(report.series[0].label, "127.0.0.1");
        assert_eq!(report.series[0].counts.total(), 3);
    }

    #[test]
    fn test_ip_filter_without_matches() {
        let mut config = Config::default();
        config.series.ip_filter = IpFilter::Only(
            std::iter::once(IpAddr::from_str("192.0.2.9").unwrap()).collect(),
        );

        let report = Analyzer::new(config).unwrap().analyze(&outcome()).unwrap();

        assert_eq!(report.series.len(), 1);
        assert_eq!(report.series[0].label, TOTAL_LABEL);
    }

    #[test]
    fn test_empty_outcome() {
        let analyzer = Analyzer::new(Config::default()).unwrap();
        let result = analyzer.analyze(&ParseOutcome::default());
        assert!(matches!(result, Err(AnalysisError::EmptyInput)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = Config::default();
        config.aggregation.interval_minutes = 0;
        assert!(matches!(Analyzer::new(config), Err(AnalysisError::Config(_))));
    }

    #[test]
    fn test_charts_follow_enabled_kinds() {
        let mut config = Config::default();
        config.series.split_by_ip = false;
        config.aggregation.roll_count = 2;
        let analyzer = Analyzer::new(config).unwrap();
        let report = analyzer.analyze(&outcome()).unwrap();

        let all = report.charts(&analyzer.config().charts);
        let kinds: Vec<ChartKind> = all.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![ChartKind::Raw, ChartKind::Rolling, ChartKind::Cumulative]);
        assert_eq!(all[0].title, "On interval 5 minutes for full system");
        assert_eq!(all[1].title, "Rolling Average on 2 count roll for full system");
        assert_eq!(all[2].title, "Cumulative full system");

        let rolling: Vec<Option<f64>> = all[1].points.iter().map(|p| p.value).collect();
        assert_eq!(rolling, vec![None, Some(1.0), Some(1.0)]);

        let only_cumulative = ChartConfig {
            raw: false,
            rolling: false,
            cumulative: true,
        };
        let charts = report.charts(&only_cumulative);
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].points.last().unwrap().value, Some(4.0));
    }
}
