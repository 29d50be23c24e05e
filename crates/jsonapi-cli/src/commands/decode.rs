//! Decode command implementation.

use std::path::PathBuf;

use jsonapi_codec::{decode_document, DecodeOutcome, Expectation, Operation, Shape};
use tracing::info;

use crate::config::CliConfig;
use crate::error::CliError;
use crate::output;

/// Arguments of the decode command.
pub struct DecodeArgs {
    pub input: Option<String>,
    pub config: Option<PathBuf>,
    pub type_name: Option<String>,
    pub id: Option<String>,
    pub operation: Operation,
    pub collection: bool,
    pub format_name: String,
    pub document: bool,
}

pub fn run(args: DecodeArgs) -> Result<(), CliError> {
    let value = output::read_json(args.input.as_deref())?;

    if args.document {
        let document = decode_document(&value).map_err(output::reject)?;
        output::print_json(&document.to_value()?);
        return Ok(());
    }

    let type_name = args
        .type_name
        .ok_or_else(|| CliError::Usage("--type is required unless --document is given".to_string()))?;
    if args.operation == Operation::Update && args.id.is_none() {
        return Err(CliError::Usage("--id is required for updates".to_string()));
    }
    let expectation = Expectation {
        type_name,
        shape: if args.collection {
            Shape::Collection
        } else {
            Shape::Single
        },
        operation: args.operation,
        id: args.id,
    };

    let config = CliConfig::load(args.config.as_deref())?;
    let registry = config.registry()?;
    let formats = config.formats();
    let format = formats.get(&args.format_name).ok_or_else(|| {
        CliError::Usage(format!(
            "unknown format '{}'; expected one of: {}",
            args.format_name,
            formats.names().join(", ")
        ))
    })?;

    let decoded = match format.decode(&registry, &value, &expectation)? {
        DecodeOutcome::Resource(resource) => serde_json::to_value(&resource)?,
        DecodeOutcome::Collection(resources) => serde_json::to_value(&resources)?,
        DecodeOutcome::Identifiers(linkage) => serde_json::to_value(&linkage)?,
        DecodeOutcome::Rejected(errors) => return Err(output::reject(errors)),
    };
    info!(type_name = %expectation.type_name, format = format.name(), "request body accepted");
    output::print_json(&decoded);
    Ok(())
}
