//! CLI command implementations
//!
//! `serve` boots the store and the HTTP server. `check-schema` and
//! `validate` run the same checks the server applies, against local files,
//! and report the outcome on stdout.

use std::path::Path;
use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::api::ApiHandler;
use crate::http_server::HttpServer;
use crate::observability::{init_logging, Event};
use crate::schema::{Schema, ValidationOptions, Validator};
use crate::storage::{FileStore, MemoryStore, Store};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_json_file, write_error, write_response};

/// Parse arguments, run the command, and report any failure on stdout.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let result = run_command(cli.command);
    if let Err(e) = &result {
        write_error(e.code_str(), e.message())?;
    }
    result
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(&config, port),
        Command::CheckSchema { schema } => check_schema(&schema),
        Command::Validate {
            schema,
            data,
            strict,
        } => validate(&schema, &data, strict),
    }
}

/// Start the HTTP server.
///
/// 1. Load and validate the config
/// 2. Install logging
/// 3. Open the store (file-backed when `data_dir` is set)
/// 4. Serve until ctrl-c
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let config = Config::load(config_path)?;
    init_logging(&config.log_level, config.log_format)?;
    info!(event = %Event::ConfigLoaded, path = %config_path.display(), "configuration loaded");

    let handler = ApiHandler::new(open_store(&config)?)
        .with_validation_options(config.validation_options())
        .with_page_limits(config.page_limits());

    let server = HttpServer::with_config(config.http_config(port), handler);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })
}

fn open_store(config: &Config) -> CliResult<Arc<dyn Store>> {
    match &config.data_dir {
        Some(dir) => {
            let store = FileStore::open(dir)?;
            info!(event = %Event::StoreOpened, backend = "file", data_dir = %dir.display(), "store opened");
            Ok(Arc::new(store))
        }
        None => {
            info!(event = %Event::StoreOpened, backend = "memory", "store opened");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Check a schema definition file.
pub fn check_schema(schema_path: &Path) -> CliResult<()> {
    let definition = read_json_file(schema_path)?;
    let schema = Schema::parse(&definition)?;

    write_response(json!({
        "valid": true,
        "fields": schema.len(),
    }))
}

/// Validate a data file against a schema definition file.
///
/// The definition is checked strictly first; a malformed schema is reported
/// as such rather than as a data failure.
pub fn validate(schema_path: &Path, data_path: &Path, strict: bool) -> CliResult<()> {
    let schema = Schema::parse(&read_json_file(schema_path)?)?;
    let data = read_json_file(data_path)?;

    let validator = Validator::with_options(ValidationOptions {
        reject_unknown_fields: strict,
    });
    validator.validate(&data, &schema)?;

    write_response(json!({ "valid": true }))
}
