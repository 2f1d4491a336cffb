//! CLI argument definitions using clap
//!
//! Commands:
//! - leadschema serve --config <path> [--port <port>]
//! - leadschema check-schema --schema <path>
//! - leadschema validate --schema <path> --data <path> [--strict]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// leadschema - product catalog and lead intake gated by per-product schemas
#[derive(Parser, Debug)]
#[command(name = "leadschema")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./leadschema.json")]
        config: PathBuf,

        /// Overrides the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Check a schema definition file
    CheckSchema {
        #[arg(long)]
        schema: PathBuf,
    },

    /// Validate a data file against a schema definition file
    Validate {
        #[arg(long)]
        schema: PathBuf,

        #[arg(long)]
        data: PathBuf,

        /// Reject fields the schema does not declare
        #[arg(long)]
        strict: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
