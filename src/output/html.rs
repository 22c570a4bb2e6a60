//! HTML report with Chart.js line charts

use crate::analysis::AnalysisReport;
use crate::models::Chart;

use super::OutputError;

/// Render a self-contained HTML page drawing every chart
pub fn render(report: &AnalysisReport, charts: &[Chart]) -> Result<String, OutputError> {
    let sections = (0..charts.len())
        .map(|i| {
            format!(
                r#"<div class="chart-container">
            <canvas id="chart-{}"></canvas>
        </div>"#,
                i
            )
        })
        .collect::<Vec<_>>()
        .join("\n        ");

    let scripts = charts
        .iter()
        .enumerate()
        .map(|(i, chart)| chart_script(i, chart))
        .collect::<Result<Vec<_>, _>>()?
        .join("\n\n        ");

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Access log report: {}</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js@4.4.0/dist/chart.umd.min.js"></script>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, sans-serif;
            margin: 0;
            padding: 20px;
            background: #f5f5f5;
        }}
        .container {{
            max-width: 1400px;
            margin: 0 auto;
            background: white;
            padding: 30px;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }}
        h1 {{
            color: #333;
            border-bottom: 3px solid #007bff;
            padding-bottom: 10px;
        }}
        .metadata {{
            background: #f8f9fa;
            padding: 15px;
            border-radius: 4px;
            margin: 20px 0;
        }}
        .chart-container {{
            position: relative;
            height: 400px;
            margin: 30px 0;
        }}
    </style>
</head>
<body>
    <div class="container">
        <h1>Access log report: {}</h1>

        <div class="metadata">
            <p><strong>Parsed requests:</strong> {}</p>
            <p><strong>Skipped lines:</strong> {}</p>
            <p><strong>Interval:</strong> {} minute(s)</p>
            <p><strong>Rolling window:</strong> {} bucket(s)</p>
        </div>

        {}
    </div>

    <script>
        {}
    </script>
</body>
</html>
"#,
        escape(&report.source.display().to_string()),
        escape(&report.source.display().to_string()),
        report.parsed_lines,
        report.skipped_lines,
        report.interval_minutes,
        report.roll_count,
        sections,
        scripts,
    ))
}

fn chart_script(index: usize, chart: &Chart) -> Result<String, OutputError> {
    let labels = script_json(&chart.axis_labels())?;
    let values: Vec<Option<f64>> = chart.points.iter().map(|p| p.value).collect();
    let data = script_json(&values)?;
    let title = script_json(&chart.title)?;
    let label = script_json(&chart.label)?;

    Ok(format!(
        r#"new Chart(document.getElementById('chart-{}'), {{
            type: 'line',
            data: {{
                labels: {},
                datasets: [{{
                    label: {},
                    data: {},
                    borderColor: 'rgba(54, 162, 235, 0.8)',
                    spanGaps: false,
                    pointRadius: 0
                }}]
            }},
            options: {{
                responsive: true,
                maintainAspectRatio: false,
                plugins: {{
                    title: {{
                        display: true,
                        text: {}
                    }}
                }},
                scales: {{
                    x: {{
                        ticks: {{
                            maxRotation: 30
                        }}
                    }},
                    y: {{
                        beginAtZero: true,
                        title: {{
                            display: true,
                            text: 'Requests'
                        }}
                    }}
                }}
            }}
        }});"#,
        index, labels, label, data, title
    ))
}

/// JSON safe to embed in a `<script>` element
fn script_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, OutputError> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
