//! Input reading and output formatting.

use std::io::{self, Read};

use jsonapi_model::ErrorList;
use serde_json::{json, Value};

use crate::error::CliError;

/// Reads JSON from a file, or stdin when no path is given.
pub fn read_json(input: Option<&str>) -> Result<Value, CliError> {
    let source = match input {
        Some(path) => std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_string(),
            source,
        })?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|source| CliError::Io {
                    path: "<stdin>".to_string(),
                    source,
                })?;
            buffer
        }
    };
    Ok(serde_json::from_str(&source)?)
}

/// Formats a value as pretty JSON.
pub fn format_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Prints a value as pretty JSON on stdout.
pub fn print_json(value: &Value) {
    println!("{}", format_json(value));
}

/// Prints an error document and turns the list into a rejection.
pub fn reject(errors: ErrorList) -> CliError {
    print_json(&json!({ "errors": errors }));
    CliError::Rejected(errors)
}
