use clap::Parser;
use colored::*;
use kshuffle::cli::Cli;
use kshuffle::core::{run, RunConfig};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins, then KSHUFFLE_LOG, then the -v count
    let log_level = std::env::var("KSHUFFLE_LOG").unwrap_or_else(|_| {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
        .to_string()
    });

    // stdout carries the FASTA output
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .init();

    if let Err(e) = run_cli(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);

        let exit_code = match e.downcast_ref::<kshuffle::KshuffleError>() {
            Some(kshuffle::KshuffleError::Config(_)) => 2,
            Some(kshuffle::KshuffleError::Io(_)) => 3,
            Some(kshuffle::KshuffleError::Format(_)) => 4,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run_cli(cli: Cli) -> anyhow::Result<()> {
    let config = RunConfig::from_settings(&cli.settings()?)?;
    tracing::info!("Using random seed {}", config.seed());

    let input: Box<dyn BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(File::open(path).map_err(|e| {
            kshuffle::KshuffleError::Io(io::Error::new(
                e.kind(),
                format!("cannot open {}: {}", path.display(), e),
            ))
        })?)),
        None => Box::new(io::stdin().lock()),
    };

    let output: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(File::create(path).map_err(|e| {
            kshuffle::KshuffleError::Io(io::Error::new(
                e.kind(),
                format!("cannot create {}: {}", path.display(), e),
            ))
        })?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let summary = run(&config, input, output)?;
    tracing::info!(
        "Shuffled {} records ({} variants written, {} without a distinct shuffle)",
        summary.records,
        summary.variants,
        summary.fallbacks
    );
    Ok(())
}
