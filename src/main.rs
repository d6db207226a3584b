//! linkedin-finder command line
//!
//! Prints the profile URL found for a person, or runs a JSON batch file.

use anyhow::Context;
use clap::Parser;
use linkedin_finder::{
    config::{self, Settings},
    BatchRunner, ProfileFinder, SearchOutcome, SearchRequest,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "linkedin-finder",
    version,
    about = "Find LinkedIn profiles using search queries"
)]
struct Cli {
    /// Search query, e.g. "John Smith Microsoft", or the person name with --company
    #[arg(required_unless_present = "batch")]
    query: Option<String>,

    /// Company name (if not included in query)
    #[arg(long)]
    company: Option<String>,

    /// Job title
    #[arg(long)]
    job_title: Option<String>,

    /// Delay between requests in seconds (default: 1.0, minimum 1.0)
    #[arg(long)]
    delay: Option<f64>,

    /// Enable verbose logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// Path to a settings file
    #[arg(short, long, env = "LINKEDIN_FINDER_SETTINGS")]
    config: Option<PathBuf>,

    /// Name similarity threshold, 0 disables the name check
    #[arg(long)]
    name_threshold: Option<f64>,

    /// Company similarity threshold, 0 disables the company check
    #[arg(long)]
    company_threshold: Option<f64>,

    /// Search backend: an engine name or "auto"
    #[arg(long)]
    backend: Option<String>,

    /// Validate names and companies with the language model
    #[arg(long, default_value_t = false)]
    llm: bool,

    /// Print the full outcome as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// JSON file with an array of {name, company, job_title} requests
    #[arg(long, conflicts_with = "query")]
    batch: Option<PathBuf>,

    /// Concurrent searches in batch mode
    #[arg(long, default_value_t = BatchRunner::DEFAULT_WORKERS)]
    workers: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();

    info!("linkedin-finder v{}", linkedin_finder::VERSION);
    info!("Use only in line with the LinkedIn terms of service and robots policies");

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every lookup succeeded
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let settings = load_settings(&cli)?;

    if let Some(path) = &cli.batch {
        return run_batch(&settings, path, cli.workers).await;
    }

    let query = cli.query.as_deref().unwrap_or_default();
    let finder = ProfileFinder::from_settings(&settings)?;

    let outcome = if cli.company.is_some() || cli.job_title.is_some() {
        let request = SearchRequest {
            name: query.to_string(),
            company: cli.company.clone(),
            job_title: cli.job_title.clone(),
        };
        finder.search(&request).await
    } else {
        finder.search_simple(query).await
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }

    Ok(outcome.success)
}

async fn run_batch(settings: &Settings, path: &Path, workers: usize) -> anyhow::Result<bool> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read batch file {}", path.display()))?;
    let requests: Vec<SearchRequest> = serde_json::from_str(&content)
        .with_context(|| format!("invalid batch file {}", path.display()))?;

    let runner = BatchRunner::from_settings(settings)?.with_workers(workers);
    let outcomes = runner.run(requests).await;

    println!("{}", serde_json::to_string_pretty(&outcomes)?);
    Ok(outcomes.iter().all(|o| o.success))
}

fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let mut settings = config::load(cli.config.as_deref())?;

    if let Some(delay) = cli.delay {
        settings.finder.min_delay_seconds = delay;
    }
    if let Some(threshold) = cli.name_threshold {
        settings.finder.name_similarity_threshold = threshold;
    }
    if let Some(threshold) = cli.company_threshold {
        settings.finder.company_similarity_threshold = threshold;
    }
    if let Some(backend) = &cli.backend {
        settings.search.backend = backend.clone();
    }
    if cli.llm {
        settings.llm.enabled = true;
    }

    settings.normalize();
    Ok(settings)
}

fn print_outcome(outcome: &SearchOutcome) {
    match (&outcome.profile_url, &outcome.error) {
        (Some(url), _) if outcome.success => println!("{}", url),
        (_, Some(error)) => eprintln!("Error: {}", error),
        _ => eprintln!("Error: no profile found"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_structured_flags() {
        let cli = Cli::try_parse_from([
            "linkedin-finder",
            "Jane Doe",
            "--company",
            "Acme",
            "--delay",
            "0.2",
            "--company-threshold",
            "0",
        ])
        .unwrap();
        assert_eq!(cli.query.as_deref(), Some("Jane Doe"));
        assert_eq!(cli.workers, 3);

        let settings = load_settings(&cli).unwrap();
        assert_eq!(settings.finder.min_delay_seconds, 1.0);
        assert_eq!(settings.finder.company_similarity_threshold, 0.0);
    }

    #[test]
    fn test_query_or_batch_required() {
        assert!(Cli::try_parse_from(["linkedin-finder"]).is_err());
        assert!(Cli::try_parse_from(["linkedin-finder", "--batch", "people.json"]).is_ok());
    }
}
