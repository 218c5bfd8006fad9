// src/main.rs
// =============================================================================
// This is the entry point of the wasc CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Load the configuration and check every checker name (fail fast)
// 3. Analyse the websites concurrently
// 4. Write the report (JSON or CSV) to stdout or a file
// 5. Exit with a meaningful code:
//    0 = every website was analysed
//    1 = at least one website could not be downloaded
//    2 = configuration or I/O error
//
// Logs go to stderr through tracing; set RUST_LOG=debug to see every checker.
// =============================================================================

mod cli;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use wasc::analysis::Analysis;
use wasc::checker::CheckerRegistry;
use wasc::config::{self, CriterionSpec};
use wasc::fetch::{FetchConfig, HttpFetcher};
use wasc::progress::Progress;
use wasc::report;

#[tokio::main]
async fn main() {
    init_tracing();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {e:#}");
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,wasc=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let registry = CheckerRegistry::default();

    if cli.list_checkers {
        print_checkers(&registry);
        return Ok(0);
    }

    // Everything that can be wrong in the configuration is detected here,
    // before the first request
    let specs = load_criteria(&cli)?;
    let criteria = config::build_criteria(&specs, &registry)?;
    let analysis = Analysis::new(criteria, cli.jobs)?;

    let websites_path = cli.websites.as_deref().context("No website list given")?;
    let websites = config::read_websites(websites_path)?;
    tracing::info!(
        websites = websites.len(),
        criteria = specs.len(),
        file = %websites_path.display(),
        "configuration loaded"
    );

    let fetch_config = FetchConfig {
        timeout: Duration::from_secs(cli.timeout),
        ..FetchConfig::default()
    };
    let fetcher = HttpFetcher::new(&fetch_config).context("Failed to create HTTP client")?;

    let progress = Progress::new(websites.len(), !cli.no_progress);
    let records = analysis.run(&websites, &fetcher, &progress).await;

    let keys = analysis.output_keys();
    match &cli.output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            report::write_report(&mut out, &records, &keys, cli.output_format)?;
            out.flush()?;
            tracing::info!(file = %path.display(), "report saved");
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            report::write_report(&mut out, &records, &keys, cli.output_format)?;
        }
    }

    let unreachable = records.iter().filter(|r| !r.is_fetched()).count();
    tracing::info!(analysed = records.len(), unreachable, "completed");

    Ok(if unreachable > 0 { 1 } else { 0 })
}

// -c: one chain with the listed checkers, -C: criteria file, else defaults
fn load_criteria(cli: &Cli) -> Result<Vec<CriterionSpec>> {
    if let Some(path) = &cli.checkers {
        tracing::info!(file = %path.display(), "reading checkers");
        return Ok(vec![CriterionSpec {
            name: "checkers".to_string(),
            checkers: config::read_checker_list(path)?,
        }]);
    }
    if let Some(path) = &cli.criteria {
        tracing::info!(file = %path.display(), "reading criteria");
        return config::read_criteria(path);
    }
    tracing::info!("using default criteria");
    Ok(config::default_criteria())
}

fn print_checkers(registry: &CheckerRegistry) {
    for checker in registry.available() {
        match checker.tag() {
            Some(tag) => println!("{:<20} {} (tag: {}, e.g. {}:h1)", checker.name(), checker.description(), tag, checker.name()),
            None => println!("{:<20} {}", checker.name(), checker.description()),
        }
    }
}
