//! CLI command definitions for option-registry
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

use clap::{Parser, Subcommand, ValueEnum};

use crate::format::OutputFormat;

/// Output format flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FormatArg {
    /// Human-readable text (default)
    #[default]
    Text,
    /// One JSON document per command
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Inspect the client option registry
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Override an option before running the command (PATH=VALUE, repeatable)
    #[arg(short, long = "set", value_name = "PATH=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, String)>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Text, global = true)]
    pub format: FormatArg,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print an option's current value
    Get {
        /// Dotted path or unique option name
        path: String,
    },

    /// Print an option's default value
    #[command(name = "default")]
    GetDefault {
        /// Dotted path or unique option name
        path: String,
    },

    /// Describe options (all of them when no path is given)
    Describe {
        /// Options or groups to describe
        paths: Vec<String>,

        /// Only describe a group's own options, not nested groups
        #[arg(long)]
        no_recurse: bool,
    },

    /// List the immediate children of a group
    Suboptions {
        /// Dotted path of a group
        path: String,
    },

    /// List every option with its current value
    List,

    /// Print the application launcher settings
    App,
}

/// Parse a `PATH=VALUE` assignment.
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((path, value)) if !path.trim().is_empty() => {
            Ok((path.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected PATH=VALUE, got '{}'", s)),
    }
}
