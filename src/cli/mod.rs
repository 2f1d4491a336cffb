//! CLI module for leadschema
//!
//! Provides command-line interface for:
//! - serve: open the store and run the HTTP server
//! - check-schema: check a schema definition file
//! - validate: validate a data file against a schema file

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check_schema, run, run_command, serve, validate};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_json_file, write_error, write_response};
