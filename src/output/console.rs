//! Plain-text bar charts for terminals

use std::fmt::{self, Write};

use crate::analysis::AnalysisReport;
use crate::models::{Chart, AXIS_DATE_FORMAT};

const BAR_WIDTH: usize = 40;

/// Render the parse summary, one line per series and every chart
pub fn render(report: &AnalysisReport, charts: &[Chart]) -> String {
    let mut out = String::new();
    if let Err(e) = write_report(&mut out, report, charts) {
        log::error!("Failed to format console report: {}", e);
    }
    out
}

fn write_report(out: &mut String, report: &AnalysisReport, charts: &[Chart]) -> fmt::Result {
    write_summary(out, report)?;
    for chart in charts {
        writeln!(out)?;
        render_chart(out, chart)?;
    }
    Ok(())
}

fn write_summary(out: &mut String, report: &AnalysisReport) -> fmt::Result {
    writeln!(
        out,
        "Access log {:?}: parsed {} request(s), skipped {} line(s)",
        report.source, report.parsed_lines, report.skipped_lines
    )?;
    for series in &report.series {
        let peak = series
            .counts
            .peak()
            .map(|b| format!("{} at {}", b.value, b.start.format(AXIS_DATE_FORMAT)))
            .unwrap_or_else(|| "n/a".to_string());
        writeln!(
            out,
            "  {:<40} {:>8} request(s) {:>6} bucket(s)  peak {}",
            series.label,
            series.counts.total(),
            series.counts.len(),
            peak
        )?;
    }
    Ok(())
}

fn render_chart(out: &mut String, chart: &Chart) -> fmt::Result {
    writeln!(out, "{}", chart.title)?;
    writeln!(out, "{}", "=".repeat(chart.title.len()))?;

    let max = chart.max_value();
    for (label, point) in chart.axis_labels().iter().zip(&chart.points) {
        match point.value {
            Some(value) => writeln!(out, "{}  {:>10.2}  {}", label, value, bar(value, max))?,
            None => writeln!(out, "{}  {:>10}", label, "-")?,
        }
    }
    Ok(())
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(len.min(BAR_WIDTH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChartKind, SeriesPoint};
    use chrono::NaiveDate;

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(10.0, 10.0).len(), BAR_WIDTH);
        assert_eq!(bar(5.0, 10.0).len(), BAR_WIDTH / 2);
        assert_eq!(bar(0.0, 10.0), "");
        assert_eq!(bar(3.0, 0.0), "");
    }

    #[test]
    fn test_render_chart_with_gaps() {
        let start = NaiveDate::from_ymd_opt(2017, 7, 3)
            .unwrap()
            .and_hms_opt(9, 50, 5)
            .unwrap();
        let chart = Chart {
            kind: ChartKind::Rolling,
            title: "Rolling Average on 2 count roll for full system".to_string(),
            label: "full system".to_string(),
            points: vec![
                SeriesPoint { start, value: None },
                SeriesPoint {
                    start: start + chrono::Duration::minutes(5),
                    value: Some(1.5),
                },
            ],
        };

        let mut out = String::new();
        render_chart(&mut out, &chart).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], chart.title);
        assert!(lines[2].starts_with("03-07-17 09:50"));
        assert!(lines[2].trim_end().ends_with('-'));
        assert!(lines[3].contains("1.50"));
        assert!(lines[3].ends_with(&"#".repeat(BAR_WIDTH)));
    }

    #[test]
    fn test_render_summary_and_charts() {
        use crate::analysis::Analyzer;
        use crate::config::Config;
        use crate::input::AccessLogParser;

        let log = r#"127.0.0.1 - - [03/Jul/2017:09:50:05 +1000] "GET / HTTP/1.1" 200 512 "-" "curl/7.1"
127.0.0.1 - - [03/Jul/2017:09:52:00 +1000] "GET /a HTTP/1.1" 200 10 "-" "curl/7.1"
"#;
        let mut config = Config::default();
        config.series.split_by_ip = false;
        let analyzer = Analyzer::new(config).unwrap();
        let report = analyzer
            .analyze(&AccessLogParser::new().parse_str(log))
            .unwrap();
        let charts = report.charts(&analyzer.config().charts);

        let text = render(&report, &charts);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].contains("parsed 2 request(s), skipped 0 line(s)"));
        assert!(lines[1].contains("full system"));
        assert!(lines[1].ends_with("peak 2 at 03-07-17 09:50"));
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], charts[0].title);
        assert_eq!(text.matches("=\n").count(), charts.len());
    }
}
