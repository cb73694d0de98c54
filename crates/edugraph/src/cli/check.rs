use anyhow::{bail, Result};
use clap::Args;

use super::InputArgs;

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Fail when any record was rejected or identifiers collided
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: &CheckArgs) -> Result<()> {
    let (_, graph) = super::assemble(&args.input)?;
    let report = &graph.report;
    super::print_summary(report);

    if args.strict && !(report.failures.is_empty() && report.collisions.is_empty()) {
        bail!(
            "{} rejected records, {} identifier collisions",
            report.failures.len(),
            report.collisions.len()
        );
    }
    Ok(())
}
