//! Warrastat - contract scraping and batch statistics
//!
//! A CLI tool that fetches vehicle warranty, GAP, and protection
//! contracts from a remote system in date-bounded windows, persists them
//! as JSON batches, and computes aggregate reports over everything
//! persisted so far.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (authentication, config, unreadable input, etc.)
//!   2 - Scrape finished but every window failed

mod analysis;
mod cli;
mod config;
mod fetcher;
mod loader;
mod models;
mod report;

use anyhow::{Context, Result};
use cli::{AnalyzeArgs, Args, Command, ReportKind, ScrapeArgs};
use config::Config;
use models::ProductFamily;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("Warrastat v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Run failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .warrastat.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".warrastat.toml");

    if path.exists() {
        eprintln!("⚠️  .warrastat.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .warrastat.toml")?;

    println!("✅ Created .warrastat.toml with default settings.");
    println!("   Edit it to customize endpoints, directories, and report sizes.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Dispatch the requested command. Returns the process exit code.
async fn run(args: Args) -> Result<i32> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    // File-sourced values bypass CLI validation, so check the merged result.
    config.validate()?;

    match args.command {
        Some(Command::Scrape(ref scrape)) => run_scrape(scrape, &config, args.quiet).await,
        Some(Command::Analyze(ref analyze)) => run_analyze(analyze, &config),
        // validate() rejects the missing-command case before we get here.
        None => Err(anyhow::anyhow!("no command given")),
    }
}

/// Run a windowed scrape over the requested date range.
async fn run_scrape(scrape: &ScrapeArgs, config: &Config, quiet: bool) -> Result<i32> {
    let start_time = Instant::now();
    let out_dir = PathBuf::from(&config.scrape.output_dir);

    println!("🔐 Logging in to {}", config.source.base_url);
    let fetcher = fetcher::Fetcher::new(config.source.clone(), out_dir.clone(), !quiet)?;

    // Authentication failure is fatal; nothing is fetched without a session.
    fetcher
        .login(&scrape.username, &scrape.password)
        .await
        .context("Login failed, aborting the run")?;

    println!(
        "📥 Fetching contracts from {} to {} in {}-day windows",
        scrape.from, scrape.to, config.scrape.interval_days
    );

    let outcome = fetcher
        .run(scrape.from, scrape.to, config.scrape.interval_days)
        .await?;

    let duration = start_time.elapsed().as_secs_f64();

    println!("\n📊 Scrape Summary:");
    println!("   Batches saved: {}", outcome.saved);
    println!("   Windows failed: {}", outcome.failed);
    println!("   Output directory: {}", out_dir.display());
    println!("   Duration: {:.1}s", duration);

    if outcome.saved == 0 && outcome.failed > 0 {
        eprintln!("\n⛔ Every window failed; nothing was persisted (exit code 2).");
        return Ok(2);
    }

    println!("\n✅ Scrape complete!");
    Ok(0)
}

/// Load persisted batches and print the selected aggregate reports.
fn run_analyze(analyze: &AnalyzeArgs, config: &Config) -> Result<i32> {
    let input_dir = PathBuf::from(&config.analyze.input_dir);

    println!("📂 Loading batches from {}", input_dir.display());
    let records = loader::load_contracts(&input_dir)?;

    if records.is_empty() {
        println!("   No contract records found.");
        return Ok(0);
    }
    println!("   Loaded {} contract records\n", records.len());

    for kind in analyze.selected_reports() {
        match kind {
            ReportKind::Fields => {
                let profile = analysis::field_profile(&records, config.analyze.sample_size);
                println!("{}", report::render_field_profile(&profile));
            }
            ReportKind::Categories => {
                let categories = analysis::category_counts(&records);
                println!("{}", report::render_categories(&categories));
            }
            ReportKind::Pricing => {
                for family in ProductFamily::ALL {
                    let summary = analysis::pricing_summary(&records, family);
                    println!("{}", report::render_pricing(&summary));
                }
            }
            ReportKind::Vehicles => {
                let vehicles = analysis::vehicle_summary(&records, config.analyze.top_makes);
                println!("{}", report::render_vehicle_summary(&vehicles));
            }
        }
    }

    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .warrastat.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
