use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use edugraph_core::GraphFormat;

use super::InputArgs;

pub const DEFAULT_FILE_STEM: &str = "education";

#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Directory the graph file is written into (created if missing)
    #[arg(long, default_value = "output", conflicts_with = "output")]
    pub out_dir: PathBuf,
    /// Exact output file, or '-' for stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Output format: turtle or ntriples
    #[arg(long, default_value_t = GraphFormat::Turtle)]
    pub format: GraphFormat,
    /// Write the build report as JSON
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl BuildArgs {
    /// Where the graph goes: `None` means stdout.
    #[must_use]
    pub fn destination(&self) -> Option<PathBuf> {
        match &self.output {
            Some(path) if path.as_os_str() == "-" => None,
            Some(path) => Some(path.clone()),
            None => Some(
                self.out_dir
                    .join(format!("{DEFAULT_FILE_STEM}.{}", self.format.extension())),
            ),
        }
    }
}

pub fn run(args: &BuildArgs) -> Result<()> {
    let (config, graph) = super::assemble(&args.input)?;

    match args.destination() {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            let file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            args.format
                .write(&graph.store, &config.namespace, &mut writer)?;
            writer.flush()?;
            eprintln!(
                "{} Wrote {} triples to {}",
                style("✓").green(),
                graph.store.len(),
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            args.format
                .write(&graph.store, &config.namespace, &mut writer)?;
            writer.flush()?;
        }
    }

    if let Some(path) = &args.report {
        write_report(path, &graph.report)?;
    }

    super::print_summary(&graph.report);
    Ok(())
}

fn write_report(path: &Path, report: &edugraph_core::BuildReport) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    Ok(())
}
