//! JSON I/O handling for CLI
//!
//! - Input: JSON documents read from files
//! - Output: single JSON object via stdout

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde_json::json;

use super::errors::{CliError, CliResult};
use crate::schema::Value;

/// Read one JSON document from a file
pub fn read_json_file(path: &Path) -> CliResult<Value> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("failed to read {}: {}", path.display(), e)))?;

    serde_json::from_str(&content)
        .map_err(|e| CliError::io_error(format!("invalid JSON in {}: {}", path.display(), e)))
}

/// Write a success response to stdout
pub fn write_response(data: serde_json::Value) -> CliResult<()> {
    let response = json!({
        "status": "ok",
        "data": data
    });

    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    let response = json!({
        "status": "error",
        "code": code,
        "message": message
    });

    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}
