//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.warrastat.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote contract system settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Scrape run settings.
    #[serde(default)]
    pub scrape: ScrapeConfig,

    /// Aggregation settings.
    #[serde(default)]
    pub analyze: AnalyzeConfig,
}

/// Remote contract system endpoints and request pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the contract system.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Login endpoint path.
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Contract search endpoint path.
    #[serde(default = "default_search_path")]
    pub search_path: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Fixed delay between window requests in seconds.
    #[serde(default = "default_delay")]
    pub delay_seconds: u64,
}

impl SourceConfig {
    /// Full login URL.
    pub fn login_url(&self) -> String {
        format!("{}{}", self.base_url, self.login_path)
    }

    /// Full contract search URL.
    pub fn search_url(&self) -> String {
        format!("{}{}", self.base_url, self.search_path)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            login_path: default_login_path(),
            search_path: default_search_path(),
            timeout_seconds: default_timeout(),
            delay_seconds: default_delay(),
        }
    }
}

fn default_base_url() -> String {
    "https://canadageneral.ca".to_string()
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_search_path() -> String {
    "/search/contracts".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_delay() -> u64 {
    2 // Be polite to the remote system.
}

/// Scrape run settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Directory for persisted batch files.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Days covered by each fetch window.
    #[serde(default = "default_interval_days")]
    pub interval_days: u32,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            interval_days: default_interval_days(),
        }
    }
}

fn default_output_dir() -> String {
    "scraped_data".to_string()
}

fn default_interval_days() -> u32 {
    7 // Weekly windows.
}

/// Aggregation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeConfig {
    /// Directory of persisted batch files to load.
    #[serde(default = "default_output_dir")]
    pub input_dir: String,

    /// Number of records profiled by the field report.
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    /// Number of makes shown by the vehicle report.
    #[serde(default = "default_top_makes")]
    pub top_makes: usize,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            input_dir: default_output_dir(),
            sample_size: default_sample_size(),
            top_makes: default_top_makes(),
        }
    }
}

fn default_sample_size() -> usize {
    1000
}

fn default_top_makes() -> usize {
    10
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".warrastat.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// where the CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        use crate::cli::Command;

        match args.command {
            Some(Command::Scrape(ref scrape)) => {
                if let Some(interval) = scrape.interval_days {
                    self.scrape.interval_days = interval;
                }
                if let Some(ref out) = scrape.out {
                    self.scrape.output_dir = out.to_string_lossy().to_string();
                }
                if let Some(delay) = scrape.delay_seconds {
                    self.source.delay_seconds = delay;
                }
                if let Some(ref base_url) = scrape.base_url {
                    self.source.base_url = base_url.clone();
                }
            }
            Some(Command::Analyze(ref analyze)) => {
                if let Some(ref input) = analyze.input {
                    self.analyze.input_dir = input.to_string_lossy().to_string();
                }
                if let Some(sample_size) = analyze.sample_size {
                    self.analyze.sample_size = sample_size;
                }
                if let Some(top_makes) = analyze.top_makes {
                    self.analyze.top_makes = top_makes;
                }
            }
            None => {}
        }
    }

    /// Validate the merged configuration.
    ///
    /// CLI arguments are sanity-checked at parse time, but values can
    /// also arrive straight from a config file, so everything the
    /// pipeline relies on is re-checked here after the merge.
    pub fn validate(&self) -> Result<()> {
        if self.scrape.interval_days == 0 {
            anyhow::bail!("scrape.interval_days must be at least 1");
        }

        if self.analyze.sample_size == 0 {
            anyhow::bail!("analyze.sample_size must be at least 1");
        }

        if !self.source.base_url.starts_with("http://")
            && !self.source.base_url.starts_with("https://")
        {
            anyhow::bail!(
                "source.base_url must start with 'http://' or 'https://': {}",
                self.source.base_url
            );
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.source.base_url, "https://canadageneral.ca");
        assert_eq!(config.source.login_url(), "https://canadageneral.ca/login");
        assert_eq!(config.scrape.interval_days, 7);
        assert_eq!(config.analyze.sample_size, 1000);
        assert_eq!(config.analyze.top_makes, 10);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[source]
base_url = "https://staging.example.com"
delay_seconds = 5

[scrape]
output_dir = "batches"
interval_days = 1

[analyze]
sample_size = 250
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.source.base_url, "https://staging.example.com");
        assert_eq!(config.source.delay_seconds, 5);
        assert_eq!(config.source.login_path, "/login");
        assert_eq!(config.scrape.output_dir, "batches");
        assert_eq!(config.scrape.interval_days, 1);
        assert_eq!(config.analyze.sample_size, 250);
        // Untouched section keeps its defaults.
        assert_eq!(config.analyze.top_makes, 10);
    }

    #[test]
    fn test_validate_rejects_zero_interval_from_file() {
        // A config file can carry values the CLI never sees; a zero
        // interval would otherwise stall window planning forever.
        let config: Config = toml::from_str("[scrape]\ninterval_days = 0\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("interval_days"));
    }

    #[test]
    fn test_validate_rejects_zero_sample_size() {
        let config: Config = toml::from_str("[analyze]\nsample_size = 0\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sample_size"));
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let config: Config = toml::from_str("[source]\nbase_url = \"ftp://x\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[source]"));
        assert!(toml_str.contains("[scrape]"));
        assert!(toml_str.contains("[analyze]"));
    }

    #[test]
    fn test_merge_with_scrape_args() {
        use crate::cli::{Args, Command, ScrapeArgs};

        let mut config = Config::default();
        let args = Args {
            command: Some(Command::Scrape(ScrapeArgs {
                from: "2019-06-08".parse().unwrap(),
                to: "2019-06-15".parse().unwrap(),
                interval_days: Some(3),
                username: "user".to_string(),
                password: "secret".to_string(),
                out: Some("custom_dir".into()),
                delay_seconds: Some(10),
                base_url: None,
            })),
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        };

        config.merge_with_args(&args);

        assert_eq!(config.scrape.interval_days, 3);
        assert_eq!(config.scrape.output_dir, "custom_dir");
        assert_eq!(config.source.delay_seconds, 10);
        // Untouched value keeps the file/default setting.
        assert_eq!(config.source.base_url, "https://canadageneral.ca");
    }
}
