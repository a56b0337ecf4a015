//! Anime-Harvest main entry point
//!
//! This is the command-line interface for the anime and manga metadata
//! harvesters.

use anime_harvest::config::{load_config_with_hash, Config};
use anime_harvest::crawler::Fetcher;
use anime_harvest::jobs::{run_catalogue, run_covers, run_seasons, JobKind};
use anime_harvest::output::{print_reports, JobReport};
use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Anime-Harvest: polite scrapers for anime and manga metadata
///
/// Anime-Harvest pages through season schedules, HTML catalogues and manga
/// searches while respecting rate limits, deduplicates what it finds and
/// writes the results as JSON files.
#[derive(Parser, Debug)]
#[command(name = "anime-harvest")]
#[command(version)]
#[command(about = "Polite scrapers for anime and manga metadata", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Number of manga entries the covers job processes
    #[arg(value_name = "COUNT")]
    count: Option<usize>,

    /// Run only the seasons job
    #[arg(long, conflicts_with_all = ["catalogue", "covers"])]
    seasons: bool,

    /// Run only the catalogue job
    #[arg(long, conflicts_with_all = ["seasons", "covers"])]
    catalogue: bool,

    /// Run only the covers job
    #[arg(long, conflicts_with_all = ["seasons", "catalogue"])]
    covers: bool,

    /// Validate config and show what would run without fetching anything
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// The job selected by flag, if any
    fn selected_job(&self) -> Option<JobKind> {
        if self.seasons {
            Some(JobKind::Seasons)
        } else if self.catalogue {
            Some(JobKind::Catalogue)
        } else if self.covers {
            Some(JobKind::Covers)
        } else {
            None
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let jobs = match cli.selected_job() {
        Some(job) if !job.is_configured(&config) => {
            bail!("--{} requested but the config has no [{}] section", job, job)
        }
        Some(job) => vec![job],
        None => JobKind::configured(&config),
    };

    if cli.dry_run {
        handle_dry_run(&config, &jobs, cli.count);
        return Ok(());
    }

    let reports = handle_harvest(&config, &jobs, cli.count).await?;
    print_reports(&reports);

    if !reports.is_empty() && reports.iter().all(|r| !r.succeeded()) {
        bail!("every job failed");
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("anime_harvest=info,warn"),
            1 => EnvFilter::new("anime_harvest=debug,info"),
            2 => EnvFilter::new("anime_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would run
fn handle_dry_run(config: &Config, jobs: &[JobKind], count: Option<usize>) {
    println!("=== Anime-Harvest Dry Run ===\n");

    println!("Fetcher Configuration:");
    println!("  Timeout: {}s", config.fetcher.timeout_secs);
    println!("  Politeness delay: {}ms", config.fetcher.politeness_delay_ms);
    println!("  Retry delay: {}ms", config.fetcher.retry_delay_ms);
    println!(
        "  Rate limit cooldown: {}ms",
        config.fetcher.rate_limit_cooldown_ms
    );
    println!("  Max retries: {}", config.fetcher.max_retries);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nJobs ({}):", jobs.len());
    for job in jobs {
        match job {
            JobKind::Seasons => {
                if let Some(seasons) = &config.seasons {
                    println!(
                        "  - seasons: {}/seasons/{{{}, {}}} -> {}",
                        seasons.api_base, seasons.current, seasons.upcoming, seasons.output_path
                    );
                    if let Some(translate) = &seasons.translate {
                        println!(
                            "    * translate {} -> {} via {} ({} at once)",
                            translate.source, translate.target, translate.endpoint, translate.max_concurrent
                        );
                    }
                }
            }
            JobKind::Catalogue => {
                if let Some(catalogue) = &config.catalogue {
                    println!(
                        "  - catalogue: {} -> {}",
                        catalogue.base_url, catalogue.output_path
                    );
                    println!(
                        "    * cards '{}' marked '{}' within {} levels",
                        catalogue.card_selector, catalogue.marker, catalogue.marker_depth
                    );
                }
            }
            JobKind::Covers => {
                if let Some(covers) = &config.covers {
                    println!(
                        "  - covers: {} -> {} (first {} mangas)",
                        covers.input_path,
                        covers.output_path,
                        count.unwrap_or(covers.default_count)
                    );
                }
            }
        }
    }

    println!("\n✓ Configuration is valid");
}

/// Runs every selected job in turn; a failing job does not stop the others
async fn handle_harvest(
    config: &Config,
    jobs: &[JobKind],
    count: Option<usize>,
) -> anyhow::Result<Vec<JobReport>> {
    let fetcher = Fetcher::from_config(&config.user_agent, &config.fetcher)
        .context("Failed to build HTTP client")?;

    let mut reports = Vec::with_capacity(jobs.len());
    for job in jobs {
        tracing::info!("Starting {} job", job);

        let result = match job {
            JobKind::Seasons => match &config.seasons {
                Some(seasons) => run_seasons(seasons, &fetcher).await,
                None => continue,
            },
            JobKind::Catalogue => match &config.catalogue {
                Some(catalogue) => run_catalogue(catalogue, &fetcher).await,
                None => continue,
            },
            JobKind::Covers => match &config.covers {
                Some(covers) => {
                    let count = count.unwrap_or(covers.default_count);
                    run_covers(covers, &fetcher, count).await
                }
                None => continue,
            },
        };

        match result {
            Ok(report) => {
                if report.succeeded() {
                    tracing::info!("{} job completed", job);
                } else {
                    tracing::warn!("{} job finished with errors", job);
                }
                reports.push(report);
            }
            Err(e) => {
                tracing::error!("{} job failed: {}", job, e);
                let mut report = JobReport::start(job.name());
                report.fail(&e);
                reports.push(report.finish());
            }
        }
    }

    Ok(reports)
}
