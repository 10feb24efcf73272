use abundsplit::cli::{formatter, Cli, Commands};
use clap::Parser;
use colored::*;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize logging with ABUNDSPLIT_LOG environment variable support
    let log_level = std::env::var("ABUNDSPLIT_LOG").unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    formatter::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);

        let exit_code = match e.downcast_ref::<abundsplit::AbundSplitError>() {
            Some(abundsplit::AbundSplitError::Config(_)) => 2,
            Some(abundsplit::AbundSplitError::Io(_)) => 3,
            Some(abundsplit::AbundSplitError::Parse(_)) => 4,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.verbose > 0 {
        tracing::debug!("Verbosity level {}", cli.verbose);
    }

    match cli.command {
        Commands::Split(args) => abundsplit::cli::commands::split::run(args),
    }
}
