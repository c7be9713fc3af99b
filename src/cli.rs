//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Warrastat - scrape and aggregate vehicle contract data
///
/// Fetches warranty, GAP, and protection contracts from the remote
/// contract system in date windows, persists them as JSON batches, and
/// computes descriptive statistics over everything persisted so far.
///
/// Examples:
///   warrastat scrape --from 2019-06-08 --to 2019-06-15 -u me -p secret
///   warrastat scrape --from 2019-01-01 --to 2019-12-31 --interval-days 7
///   warrastat analyze --input scraped_data
///   warrastat analyze --report pricing,vehicles
///   warrastat --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .warrastat.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Generate a default .warrastat.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Fetch contract batches from the remote system for a date range
    Scrape(ScrapeArgs),
    /// Load persisted batches and print aggregate reports
    Analyze(AnalyzeArgs),
}

/// Arguments for the scrape command.
#[derive(clap::Args, Debug, Clone)]
pub struct ScrapeArgs {
    /// First day of the range (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from: NaiveDate,

    /// Last day of the range (YYYY-MM-DD), inclusive
    #[arg(long, value_name = "DATE")]
    pub to: NaiveDate,

    /// Days covered by each fetch window
    #[arg(long, value_name = "DAYS")]
    pub interval_days: Option<u32>,

    /// Account username for the contract system
    #[arg(short, long, env = "WARRASTAT_USERNAME")]
    pub username: String,

    /// Account password for the contract system
    #[arg(short, long, env = "WARRASTAT_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Directory for the persisted batch files
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Seconds to sleep between window requests
    #[arg(long, value_name = "SECS")]
    pub delay_seconds: Option<u64>,

    /// Base URL of the contract system
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,
}

/// Arguments for the analyze command.
#[derive(clap::Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Directory of persisted batch files
    #[arg(short, long, value_name = "DIR")]
    pub input: Option<PathBuf>,

    /// Number of records profiled by the field report
    #[arg(long, value_name = "COUNT")]
    pub sample_size: Option<usize>,

    /// Number of makes shown by the vehicle report
    #[arg(long, value_name = "COUNT")]
    pub top_makes: Option<usize>,

    /// Reports to print (comma-separated); default is all of them
    ///
    /// Example: --report pricing,vehicles
    #[arg(long = "report", value_name = "REPORT", value_delimiter = ',')]
    pub reports: Vec<ReportKind>,
}

/// Selectable aggregate reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportKind {
    /// Per-field occurrence, type, and example profiling
    Fields,
    /// Counts per discriminator and contract type
    Categories,
    /// Per-family pricing statistics
    Pricing,
    /// Vehicle make/model breakdown
    Vehicles,
}

impl ReportKind {
    /// All reports, in print order.
    pub const ALL: [ReportKind; 4] = [
        ReportKind::Fields,
        ReportKind::Categories,
        ReportKind::Pricing,
        ReportKind::Vehicles,
    ];
}

impl AnalyzeArgs {
    /// The reports to print: the requested subset, or all when none given.
    pub fn selected_reports(&self) -> Vec<ReportKind> {
        if self.reports.is_empty() {
            ReportKind::ALL.to_vec()
        } else {
            let mut seen = Vec::new();
            for kind in ReportKind::ALL {
                if self.reports.contains(&kind) && !seen.contains(&kind) {
                    seen.push(kind);
                }
            }
            seen
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        let Some(ref command) = self.command else {
            return Err("No command given. Use 'scrape' or 'analyze'.".to_string());
        };

        match command {
            Command::Scrape(scrape) => {
                if scrape.from > scrape.to {
                    return Err(format!(
                        "--from ({}) must not be after --to ({})",
                        scrape.from, scrape.to
                    ));
                }

                if let Some(interval) = scrape.interval_days {
                    if interval == 0 {
                        return Err("Interval must be at least 1 day".to_string());
                    }
                }

                if let Some(ref base_url) = scrape.base_url {
                    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                        return Err(
                            "Base URL must start with 'http://' or 'https://'".to_string()
                        );
                    }
                }

                if scrape.username.is_empty() || scrape.password.is_empty() {
                    return Err("Username and password must not be empty".to_string());
                }
            }
            Command::Analyze(analyze) => {
                if let Some(sample_size) = analyze.sample_size {
                    if sample_size == 0 {
                        return Err("Sample size must be at least 1".to_string());
                    }
                }

                if let Some(ref input) = analyze.input {
                    if input.exists() && !input.is_dir() {
                        return Err(format!(
                            "Input path is not a directory: {}",
                            input.display()
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn make_scrape_args() -> Args {
        Args {
            command: Some(Command::Scrape(ScrapeArgs {
                from: date("2019-06-08"),
                to: date("2019-06-15"),
                interval_days: Some(7),
                username: "user".to_string(),
                password: "secret".to_string(),
                out: None,
                delay_seconds: None,
                base_url: None,
            })),
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_valid_scrape_args() {
        assert!(make_scrape_args().validate().is_ok());
    }

    #[test]
    fn test_validation_reversed_dates() {
        let mut args = make_scrape_args();
        if let Some(Command::Scrape(ref mut scrape)) = args.command {
            scrape.from = date("2019-06-16");
        }
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_interval() {
        let mut args = make_scrape_args();
        if let Some(Command::Scrape(ref mut scrape)) = args.command {
            scrape.interval_days = Some(0);
        }
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_scrape_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_command() {
        let mut args = make_scrape_args();
        args.command = None;
        assert!(args.validate().is_err());

        // --init-config needs no command.
        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_selected_reports_default_all() {
        let analyze = AnalyzeArgs {
            input: None,
            sample_size: None,
            top_makes: None,
            reports: vec![],
        };
        assert_eq!(analyze.selected_reports(), ReportKind::ALL.to_vec());
    }

    #[test]
    fn test_selected_reports_subset_deduplicated() {
        let analyze = AnalyzeArgs {
            input: None,
            sample_size: None,
            top_makes: None,
            reports: vec![ReportKind::Vehicles, ReportKind::Pricing, ReportKind::Pricing],
        };
        assert_eq!(
            analyze.selected_reports(),
            vec![ReportKind::Pricing, ReportKind::Vehicles]
        );
    }

    #[test]
    fn test_log_level() {
        let mut args = make_scrape_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
