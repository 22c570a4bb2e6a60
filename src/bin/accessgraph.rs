use std::path::PathBuf;
use std::str::FromStr;
use structopt::StructOpt;

use accessgraph::aggregation::path_occurrences;
use accessgraph::config::Config;
use accessgraph::input::AccessLogReader;
use accessgraph::output::{OutputFormat, OutputHandler};
use accessgraph::Analyzer;

/// Access log traffic grapher
#[derive(StructOpt, Debug)]
#[structopt(name = "accessgraph", about = "Graph web server traffic from an access log")]
pub struct Cli {
    /// Log debug output, including every skipped line
    #[structopt(short, long, global = true)]
    verbose: bool,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt, Debug)]
pub enum Command {
    /// Bucket requests over time and render the charts
    Graph {
        /// Path to configuration file; defaults are used when it does not exist
        #[structopt(short, long, default_value = "config.toml")]
        config: PathBuf,
        /// Access log to read, overriding the configuration
        #[structopt(short, long)]
        file: Option<PathBuf>,
        /// Output format (console, json, jsonl, html), overriding the configuration
        #[structopt(long)]
        format: Option<String>,
        /// Output file, overriding the configuration
        #[structopt(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate a default configuration file
    Config {
        /// Output path for the configuration file
        #[structopt(short, long, default_value = "config.toml")]
        output: PathBuf,
    },
    /// Parse and display requests from a log file
    Parse {
        /// Path to log file
        #[structopt(short, long)]
        file: PathBuf,
        /// Number of requests to show
        #[structopt(short, long, default_value = "10")]
        lines: usize,
    },
    /// Show the most requested paths
    Paths {
        /// Path to log file
        #[structopt(short, long)]
        file: PathBuf,
        /// Number of paths to show
        #[structopt(short = "n", long, default_value = "10")]
        top: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::from_args();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Command::Graph {
            config,
            file,
            format,
            output,
        } => {
            let mut config = if config.exists() {
                let loaded = Config::from_file(&config)?;
                log::info!("Configuration loaded from {:?}", config);
                loaded
            } else {
                log::warn!("Config file {:?} not found, using defaults", config);
                Config::default()
            };
            if let Some(file) = file {
                config.input.file_path = file;
            }
            if let Some(format) = format {
                config.output.format = format;
            }
            if let Some(output) = output {
                config.output.file_path = Some(output);
            }

            let analyzer = Analyzer::new(config)?;
            let report = analyzer.run()?;
            let charts = report.charts(&analyzer.config().charts);

            let format = OutputFormat::from_str(&analyzer.config().output.format)?;
            let mut handler =
                OutputHandler::new(format, analyzer.config().output.file_path.clone())?;
            handler.write_report(&report, &charts)?;
            log::info!(
                "Rendered {} chart(s) for {} series",
                charts.len(),
                report.series.len()
            );
        }
        Command::Config { output } => {
            let config = Config::default();
            config.to_file(&output)?;
            println!("Default configuration written to: {:?}", output);
        }
        Command::Parse { file, lines } => {
            let outcome = AccessLogReader::new(&file).read_all()?;
            let display_count = std::cmp::min(lines, outcome.parsed_count());

            println!(
                "Parsed {} request(s), skipped {} line(s) (showing {}):\n",
                outcome.parsed_count(),
                outcome.skipped_count(),
                display_count
            );
            for record in outcome.records.iter().take(display_count) {
                println!(
                    "  {} [{}] GET {} -> {} ({} bytes) \"{}\" \"{}\"",
                    record.client_ip,
                    record.timestamp,
                    record.path,
                    record.status,
                    record.bytes,
                    record.referrer,
                    record.user_agent
                );
            }
        }
        Command::Paths { file, top } => {
            let outcome = AccessLogReader::new(&file).read_all()?;
            let occurrences = path_occurrences(&outcome.records);

            println!(
                "{} distinct path(s) in {} request(s):\n",
                occurrences.len(),
                outcome.parsed_count()
            );
            for (path, count) in occurrences.iter().take(top) {
                println!("  {:>8}  {}", count, path);
            }
        }
    }

    Ok(())
}
