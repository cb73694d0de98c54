pub mod build;
pub mod check;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use console::style;
use edugraph_core::{BuildConfig, BuildReport, BuiltGraph, CsvSource, GraphAssembler, LocationIndex};

#[derive(Parser)]
#[command(
    name = "edugraph",
    about = "Build an RDF graph of higher-education courses and institutions",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the graph and write it out
    Build(build::BuildArgs),
    /// Run a build without writing the graph and print a summary
    Check(check::CheckArgs),
}

/// Inputs shared by every command that runs a build.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Course vacancy table (CSV)
    #[arg(long)]
    pub courses: PathBuf,
    /// Institution location table (CSV)
    #[arg(long)]
    pub locations: Option<PathBuf>,
    /// Build configuration (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Preamble lines before the course table header
    #[arg(long, default_value_t = 0)]
    pub skip_lines: usize,
    /// Preamble lines before the location table header
    #[arg(long, default_value_t = 0)]
    pub location_skip_lines: usize,
}

/// Loads configuration and inputs, then runs the whole build.
pub fn assemble(input: &InputArgs) -> Result<(BuildConfig, BuiltGraph)> {
    let config = crate::config::load(input.config.as_deref())?;

    let locations = match &input.locations {
        Some(path) => {
            let source = CsvSource::from_path(path).skip_lines(input.location_skip_lines);
            LocationIndex::from_source(&source, &config)
                .with_context(|| format!("Failed to read locations from {}", path.display()))?
        }
        None => LocationIndex::new(config.join_key),
    };
    tracing::debug!(rows = locations.len(), "Location index loaded");

    let courses = CsvSource::from_path(&input.courses).skip_lines(input.skip_lines);
    let graph = GraphAssembler::new(config.clone())
        .with_locations(locations)
        .build_from(&courses)
        .with_context(|| format!("Failed to build graph from {}", input.courses.display()))?;

    Ok((config, graph))
}

pub fn print_summary(report: &BuildReport) {
    let stats = &report.stats;
    eprintln!(
        "{} {} records: {} built, {} skipped, {} failed",
        style("●").green(),
        stats.records_seen,
        stats.records_built,
        stats.records_skipped,
        stats.records_failed
    );
    eprintln!(
        "  Entities: {}  Triples: {}",
        stats.total_entities(),
        stats.triples
    );
    for (kind, count) in &stats.entities {
        eprintln!("    {:<16} {count}", kind.as_str());
    }
    if stats.institutions_located > 0 {
        eprintln!("  Institutions located: {}", stats.institutions_located);
    }
    if stats.counties_without_district > 0 {
        eprintln!(
            "  {} {} counties without district",
            style("!").yellow(),
            stats.counties_without_district
        );
    }
    for failure in &report.failures {
        eprintln!(
            "  {} record {}: {}",
            style("✗").red(),
            failure.index,
            failure.message
        );
    }
    for collision in &report.collisions {
        eprintln!(
            "  {} {} claimed by {} ({}) and {} ({})",
            style("!").yellow(),
            collision.token,
            collision.existing_kind,
            collision.existing_source,
            collision.incoming_kind,
            collision.incoming_source
        );
    }
}
