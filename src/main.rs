//! Infogen - batch infographic generation for architecture docs.

mod adapters;
mod batch;
mod cassette;
mod cli;
mod config;
mod context;
mod error;
mod jobs;
mod model;
mod output;
mod params;
mod ports;
mod settings;

use std::io::Write;
use std::process;

use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::batch::BatchGenerator;
use crate::cli::Cli;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::ImageError;
use crate::jobs::JobSet;
use crate::settings::RunSettings;

/// Overrides the log filter, e.g. `INFOGEN_LOG=infogen=trace`.
const LOG_ENV: &str = "INFOGEN_LOG";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Diagnostics go to stderr; stdout carries the progress and summary only.
fn init_logging(verbose: bool) {
    let default = if verbose { "infogen=debug" } else { "infogen=info" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

async fn run(cli: Cli) -> Result<(), ImageError> {
    let config_path = config::discover_config_path(cli.config.as_deref());
    debug!(path = %config_path.display(), "Loading config");
    let config = Config::load(&config_path)?;

    let jobs = match cli.jobs.as_deref() {
        Some(path) => JobSet::load(path)?,
        None => JobSet::builtin()?,
    };

    if cli.list {
        let mut stdout = std::io::stdout().lock();
        for name in jobs.names() {
            writeln!(stdout, "{name}")?;
        }
        return Ok(());
    }

    let jobs = jobs.select(&cli.only)?;
    for name in jobs.duplicate_names() {
        warn!(job = name, "Duplicate job name; later outcome replaces the earlier one");
    }
    output::check_distinct_slugs(&jobs.names())?;

    let settings = RunSettings::resolve(&cli, &config.batch)?;
    debug!(model = %settings.render.model, provider = %settings.provider, "Resolved model");

    let (ctx, recording) = ServiceContext::from_env(settings.provider, &config)?;

    let report = {
        let batch = BatchGenerator::new(ctx.generator.as_ref(), settings.render, settings.out_dir);
        batch.run_all(&jobs, &mut std::io::stdout().lock()).await?
    };
    // releases the recorder so the session can write the cassette
    drop(ctx);

    if report.is_empty() {
        warn!("No jobs to run");
    } else if report.failures() > 0 {
        warn!(failed = report.failures(), total = report.len(), "Some jobs failed");
    }

    if let Some(session) = recording {
        if let Err(e) = session.finish() {
            warn!(error = %e, "Failed to save cassette");
        }
    }

    Ok(())
}
