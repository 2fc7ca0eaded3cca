use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use papers_fetcher::config::{find_config_file, get_config, load_config};
use papers_fetcher::models::SearchQuery;
use papers_fetcher::output::ConsoleFormat;
use papers_fetcher::pipeline::{run, Destination};
use papers_fetcher::sources::PubMedSource;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Fetch PubMed papers and list authors affiliated with pharmaceutical or biotech companies
#[derive(Parser, Debug)]
#[command(name = "get-papers-list")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fetch research papers from PubMed and flag company-affiliated authors", long_about = None)]
struct Cli {
    /// Search query (full PubMed query syntax is supported)
    query: String,

    /// Number of results to fetch (default: 10, or the config file value)
    #[arg(long, short = 'n', value_parser = clap::value_parser!(u32).range(1..))]
    num_results: Option<u32>,

    /// Print debug information
    #[arg(long, short)]
    debug: bool,

    /// Output CSV filename (prints to the console when omitted)
    #[arg(long, short)]
    file: Option<PathBuf>,

    /// Console output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Auto)]
    format: OutputFormat,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// NCBI API key
    #[arg(long, env = "NCBI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

/// Output format for console results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, plain otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// Plain text format
    Plain,
    /// JSON format (machine-readable)
    Json,
}

impl OutputFormat {
    fn resolve(self) -> ConsoleFormat {
        match self {
            OutputFormat::Auto if std::io::stdout().is_terminal() => ConsoleFormat::Table,
            OutputFormat::Auto | OutputFormat::Plain => ConsoleFormat::Plain,
            OutputFormat::Table => ConsoleFormat::Table,
            OutputFormat::Json => ConsoleFormat::Json,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { "error" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("papers_fetcher={0},get_papers_list={0}", level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = if let Some(config_path) = &cli.config {
        load_config(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?
    } else if let Some(config_path) = find_config_file() {
        tracing::debug!("Using config file: {}", config_path.display());
        load_config(&config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?
    } else {
        get_config().context("Failed to read configuration from environment")?
    };

    if let Some(key) = cli.api_key {
        config.pubmed.api_key = Some(key);
    }

    let max_results = cli
        .num_results
        .map(|n| n as usize)
        .unwrap_or(config.output.default_max_results);
    let query = SearchQuery::new(cli.query).max_results(max_results);

    tracing::debug!(
        "Querying PubMed for: {} (max results: {})",
        query.query,
        query.max_results
    );

    let destination = match &cli.file {
        Some(path) => Destination::Csv(path.clone()),
        None => Destination::Console(cli.format.resolve()),
    };

    let source =
        PubMedSource::new(config.pubmed.clone()).context("Failed to create PubMed client")?;

    let report = run(&source, &query, &destination, &config.output.list_separator).await?;

    if cli.debug {
        eprintln!(
            "Found {} papers ({} with company-affiliated authors, {} skipped)",
            report.records.len(),
            report.with_company_authors().count(),
            report.skipped.len()
        );
    }

    if let Destination::Csv(path) = &destination {
        println!("Results saved to {}", path.display());
    }

    Ok(())
}
