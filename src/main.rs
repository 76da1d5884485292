//! Option registry CLI
//!
//! Builds the client option registry (defaults plus environment overrides),
//! applies any `--set` overrides, and prints what was asked for.

use anyhow::Result;
use clap::Parser;
use option_registry::app::AppConfig;
use option_registry::cli::{Cli, Command};
use option_registry::error::OptionResult;
use option_registry::format::{
    OutputFormat, format_app, format_description, format_error, format_listing,
    format_suboptions, format_value,
};
use option_registry::registry::Registry;
use std::fs::OpenOptions;
use std::process::ExitCode;
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

/// Initialize logging based on the --log option.
fn init_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

fn run(cli: &Cli, format: OutputFormat) -> OptionResult<String> {
    let mut registry = Registry::with_defaults()?;

    for (path, value) in &cli.set {
        let stored = registry.set_option(path, value.as_str())?;
        debug!(option = %path, value = %stored, "Applied command-line override");
    }

    let out = match &cli.command {
        Command::Get { path } => {
            let full = registry.resolve(path)?.to_string();
            format_value(&full, &registry.get_option(path)?, format)
        }
        Command::GetDefault { path } => {
            let full = registry.resolve(path)?.to_string();
            format_value(&full, &registry.get_default(path)?, format)
        }
        Command::Describe { paths, no_recurse } => {
            let paths: Vec<&str> = paths.iter().map(String::as_str).collect();
            let text = registry.describe_options(&paths, !no_recurse)?;
            format_description(&text, format)
        }
        Command::Suboptions { path } => format_suboptions(registry.get_suboptions(path)?, format),
        Command::List => format_listing(&registry, format),
        Command::App => format_app(&AppConfig::from_registry(&registry)?, format),
    };
    Ok(out)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let format = OutputFormat::from(cli.format);
    match run(&cli, format) {
        Ok(out) => {
            println!("{}", out.trim_end());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", format_error(&e, format));
            Ok(ExitCode::FAILURE)
        }
    }
}
