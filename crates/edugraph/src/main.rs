use anyhow::Result;
use clap::Parser;

use edugraph::cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build(args) => edugraph::cli::build::run(&args),
        Commands::Check(args) => edugraph::cli::check::run(&args),
    }
}
