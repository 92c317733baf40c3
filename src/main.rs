//! # Email Enricher CLI
//!
//! Command-line interface for the Email Enricher library (`email_enricher_core`).
//! This binary parses arguments, sets up configuration, loads a CSV or JSON
//! contact file, fills in missing emails and writes the enriched file back out.

use email_enricher_core::{
    initialize_enricher, Config, ConfigBuilder, EmailSource, EnrichmentOutcome,
};

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod records;

use records::{sibling_path, RecordFile};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Fills in missing contact emails from names and company websites.",
    long_about = "Email Enricher infers professional email addresses using web search, profile pages, per-domain pattern discovery and heuristic candidates. No address is assigned to two contacts in one run."
)]
struct AppArgs {
    /// Path to the input CSV or JSON file containing contacts.
    #[arg(env = "EMAIL_ENRICHER_INPUT")]
    input: PathBuf,

    /// Path to the output file. Defaults to `<input>_enriched.<ext>`.
    #[arg(env = "EMAIL_ENRICHER_OUTPUT")]
    output: Option<PathBuf>,

    /// Also write only the rows whose email changed. Defaults to `<input>_changes.<ext>`.
    #[arg(long, num_args = 0..=1, value_name = "PATH")]
    changes: Option<Option<PathBuf>>,

    /// Path to a configuration file (TOML format) to load settings from. CLI args override file settings.
    #[arg(long, env = "EMAIL_ENRICHER_CONFIG")]
    config_file: Option<String>,

    /// API key for the domain-search enrichment API.
    #[arg(long, env = "HUNTER_API_KEY", hide_env_values = true)]
    hunter_api_key: Option<String>,

    /// HTTP request timeout in seconds.
    #[arg(long, env = "EMAIL_ENRICHER_REQUEST_TIMEOUT")]
    request_timeout: Option<u64>,

    /// User agent string for search and page requests.
    #[arg(long, env = "EMAIL_ENRICHER_USER_AGENT")]
    user_agent: Option<String>,

    /// Number of search results inspected per query.
    #[arg(long, env = "EMAIL_ENRICHER_SEARCH_RESULTS")]
    search_results: Option<usize>,

    /// Skip the direct web search for each person.
    #[arg(long, env = "EMAIL_ENRICHER_NO_DIRECT_SEARCH")]
    no_direct_search: bool,

    /// Skip the professional-network profile search for each person.
    #[arg(long, env = "EMAIL_ENRICHER_NO_PROFILE_SEARCH")]
    no_profile_search: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_target(true)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Setting up tracing subscriber failed")?;

    tracing::info!(
        "Email Enricher CLI v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let args = AppArgs::parse();
    tracing::debug!("Parsed CLI arguments: {:?}", args);

    let config = match build_config(&args) {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            return Err(anyhow::anyhow!("Failed to build configuration: {}", e));
        }
    };
    tracing::debug!("Effective configuration loaded: {:?}", *config);

    let start_time = Instant::now();
    if let Err(e) = process_file(config, &args, start_time).await {
        tracing::error!("Execution failed: {}", e);
        return Err(e);
    }

    tracing::info!(
        "Processing finished successfully. Total duration: {:.2?}",
        start_time.elapsed()
    );
    Ok(())
}

fn build_config(args: &AppArgs) -> email_enricher_core::Result<Config> {
    let mut config_builder = ConfigBuilder::new();

    if let Some(ref path) = args.config_file {
        config_builder = config_builder.config_file(path);
    }
    if args.hunter_api_key.is_some() {
        config_builder = config_builder.hunter_api_key(args.hunter_api_key.as_deref());
    }
    if let Some(t) = args.request_timeout {
        config_builder = config_builder.request_timeout(Duration::from_secs(t));
    }
    if let Some(ref ua) = args.user_agent {
        config_builder = config_builder.user_agent(ua);
    }
    if let Some(n) = args.search_results {
        config_builder = config_builder.search_results_per_query(n);
    }
    if args.no_direct_search {
        config_builder = config_builder.enable_direct_search(false);
    }
    if args.no_profile_search {
        config_builder = config_builder.enable_profile_search(false);
    }

    config_builder.build()
}

async fn process_file(config: Arc<Config>, args: &AppArgs, start_time: Instant) -> Result<()> {
    let input_path = args.input.as_path();
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| sibling_path(input_path, "enriched"));
    let changes_path = args
        .changes
        .as_ref()
        .map(|p| p.clone().unwrap_or_else(|| sibling_path(input_path, "changes")));

    tracing::info!(
        "Input: '{}', Output: '{}'",
        input_path.display(),
        output_path.display()
    );
    if !input_path.is_file() {
        return Err(anyhow::anyhow!(
            "Input file not found or is not a file: {}",
            input_path.display()
        ));
    }
    ensure_parent_dir(&output_path)?;
    if let Some(ref path) = changes_path {
        ensure_parent_dir(path)?;
    }

    tracing::info!("Loading contacts from '{}'...", input_path.display());
    let mut records = RecordFile::load(input_path)?;
    let total_records_loaded = records.contacts.len();
    tracing::info!(
        "Loaded {} {:?} records from input file.",
        total_records_loaded,
        records.format()
    );

    let mut enricher = initialize_enricher(config.clone())
        .map_err(|e| anyhow::anyhow!("Failed to initialize EmailEnricher: {}", e))?;

    let pb = ProgressBar::new(total_records_loaded as u64);
    pb.set_style(ProgressStyle::default_bar()
         .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) | ETA: {eta} | {msg}")
         .context("Failed to set progress bar template")?
         .progress_chars("=> "));
    pb.set_message("Enriching contacts...");

    let outcomes = enricher
        .enrich_batch(&mut records.contacts, |_, outcome| {
            if let EnrichmentOutcome::Filled { email, .. } = outcome {
                pb.set_message(email.clone());
            }
            pb.inc(1);
        })
        .await;
    pb.finish_with_message(format!("Processed {} records", outcomes.len()));

    tracing::info!("Saving results to '{}'...", output_path.display());
    records.save(&output_path)?;
    if let Some(ref path) = changes_path {
        let written = records.save_changes(path)?;
        tracing::info!("Wrote {} changed rows to '{}'.", written, path.display());
    }
    tracing::info!("Results saved successfully.");

    log_summary(&outcomes, total_records_loaded, start_time.elapsed());
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            tracing::debug!("Creating output directory: {}", parent_dir.display());
            std::fs::create_dir_all(parent_dir).with_context(|| {
                format!(
                    "Failed to create output directory '{}'",
                    parent_dir.display()
                )
            })?;
        }
    }
    Ok(())
}

/// Logs a summary of the enrichment outcomes using `tracing::info`.
fn log_summary(outcomes: &[EnrichmentOutcome], original_total: usize, duration: Duration) {
    let filled_by = |source: EmailSource| {
        outcomes
            .iter()
            .filter(|o| matches!(o, EnrichmentOutcome::Filled { source: s, .. } if *s == source))
            .count()
    };
    let filled = outcomes.iter().filter(|o| o.is_filled()).count();
    let already_present = outcomes
        .iter()
        .filter(|o| matches!(o, EnrichmentOutcome::AlreadyPresent))
        .count();
    let skipped = outcomes
        .iter()
        .filter(|o| matches!(o, EnrichmentOutcome::Skipped(_)))
        .count();
    let no_match = outcomes
        .iter()
        .filter(|o| matches!(o, EnrichmentOutcome::NoMatch))
        .count();

    tracing::info!("-------------------- Enrichment Summary --------------------");
    tracing::info!("Total Records in Input File : {}", original_total);
    tracing::info!("  - Emails Filled           : {}", filled);
    tracing::info!("      via direct search     : {}", filled_by(EmailSource::DirectSearch));
    tracing::info!("      via profile network   : {}", filled_by(EmailSource::ProfileNetwork));
    tracing::info!("      via discovered pattern: {}", filled_by(EmailSource::DiscoveredPattern));
    tracing::info!("      via heuristic         : {}", filled_by(EmailSource::Heuristic));
    tracing::info!("  - Already Had Email       : {}", already_present);
    tracing::info!("  - No Unused Candidate     : {}", no_match);
    tracing::info!("  - Skipped (Invalid Input) : {}", skipped);
    tracing::info!("Total Time Taken            : {:.2?}", duration);
    if duration.as_secs_f64() > 0.01 && !outcomes.is_empty() {
        let rate = (outcomes.len() as f64) / duration.as_secs_f64();
        tracing::info!("Processing Rate             : {:.2} records/sec", rate);
    }
    tracing::info!("----------------------------------------------------------");
}
