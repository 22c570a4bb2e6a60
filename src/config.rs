use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::output::OutputFormat;

/// Errors raised while loading, saving or validating a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for one grapher run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Input log configuration
    pub input: InputConfig,
    /// Bucketing configuration
    pub aggregation: AggregationConfig,
    /// Which series get produced
    pub series: SeriesConfig,
    /// Which chart kinds get produced per series
    pub charts: ChartConfig,
    /// Output configuration
    pub output: OutputConfig,
}

/// Input log configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Path to the access log
    pub file_path: PathBuf,
}

/// Bucketing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Bucket width in minutes
    pub interval_minutes: u32,
    /// Rolling average window, in buckets
    pub roll_count: usize,
    /// How timestamps that go backwards are handled
    #[serde(default)]
    pub ordering: OrderingPolicy,
}

/// Handling of timestamps that are not in non-decreasing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderingPolicy {
    /// Stable-sort timestamps before bucketing
    #[default]
    Sort,
    /// Reject input whose timestamps go backwards
    Strict,
}

/// Series selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesConfig {
    /// Produce a series over all requests
    pub show_total: bool,
    /// Produce one series per client IP
    pub split_by_ip: bool,
    /// Client IPs to split out
    #[serde(default)]
    pub ip_filter: IpFilter,
}

/// Client IPs that get their own series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(try_from = "IpFilterRepr", into = "IpFilterRepr")]
pub enum IpFilter {
    /// Every distinct client IP found in the log
    #[default]
    All,
    /// Only the listed addresses
    Only(BTreeSet<IpAddr>),
}

impl IpFilter {
    /// Returns true if the address is selected by this filter
    pub fn matches(&self, ip: &IpAddr) -> bool {
        match self {
            IpFilter::All => true,
            IpFilter::Only(ips) => ips.contains(ip),
        }
    }
}

/// On-disk form of [`IpFilter`]: the keyword `"all"` or a list of addresses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum IpFilterRepr {
    Keyword(String),
    List(Vec<String>),
}

impl TryFrom<IpFilterRepr> for IpFilter {
    type Error = String;

    fn try_from(repr: IpFilterRepr) -> Result<Self, Self::Error> {
        match repr {
            IpFilterRepr::Keyword(word) if word.eq_ignore_ascii_case("all") => Ok(IpFilter::All),
            IpFilterRepr::Keyword(word) => Err(format!(
                "ip_filter must be \"all\" or a list of addresses, got \"{}\"",
                word
            )),
            // An empty list means every IP
            IpFilterRepr::List(list) if list.is_empty() => Ok(IpFilter::All),
            IpFilterRepr::List(list) => list
                .iter()
                .map(|s| {
                    IpAddr::from_str(s.trim())
                        .map_err(|_| format!("Invalid IP address in ip_filter: {}", s))
                })
                .collect::<Result<BTreeSet<_>, _>>()
                .map(IpFilter::Only),
        }
    }
}

impl From<IpFilter> for IpFilterRepr {
    fn from(filter: IpFilter) -> Self {
        match filter {
            IpFilter::All => IpFilterRepr::Keyword("all".to_string()),
            IpFilter::Only(ips) => IpFilterRepr::List(ips.iter().map(|ip| ip.to_string()).collect()),
        }
    }
}

/// Chart kinds enabled per series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Raw request counts per bucket
    pub raw: bool,
    /// Rolling average over `roll_count` buckets
    pub rolling: bool,
    /// Running total of requests
    pub cumulative: bool,
}

impl ChartConfig {
    pub fn any_enabled(&self) -> bool {
        self.raw || self.rolling || self.cumulative
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format: "console", "json", "jsonl" or "html"
    pub format: String,
    /// Output file path; stdout when absent
    pub file_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input: InputConfig {
                file_path: PathBuf::from("access.log"),
            },
            aggregation: AggregationConfig {
                interval_minutes: 5,
                roll_count: 5,
                ordering: OrderingPolicy::Sort,
            },
            series: SeriesConfig {
                show_total: true,
                split_by_ip: true,
                ip_filter: IpFilter::All,
            },
            charts: ChartConfig {
                raw: true,
                rolling: true,
                cumulative: true,
            },
            output: OutputConfig {
                format: "console".to_string(),
                file_path: None,
            },
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Check the values a run cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.aggregation.interval_minutes == 0 {
            return Err(ConfigError::Invalid(
                "interval_minutes must be greater than zero".to_string(),
            ));
        }
        if self.aggregation.roll_count == 0 {
            return Err(ConfigError::Invalid(
                "roll_count must be greater than zero".to_string(),
            ));
        }
        if !self.series.show_total && !self.series.split_by_ip {
            return Err(ConfigError::Invalid(
                "at least one of show_total or split_by_ip must be enabled".to_string(),
            ));
        }
        if let Err(e) = self.output.format.parse::<OutputFormat>() {
            return Err(ConfigError::Invalid(e.to_string()));
        }
        if !self.charts.any_enabled() {
            log::warn!("No chart kind is enabled, only the parse summary will be reported");
        }
        Ok(())
    }
}
