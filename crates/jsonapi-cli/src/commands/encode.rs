//! Encode command implementation.

use std::path::PathBuf;

use jsonapi_codec::{PageResult, PageSpec, RequestQuery};
use jsonapi_model::Entity;
use jsonapi_negotiate::Payload;
use serde_json::Value;

use crate::config::CliConfig;
use crate::error::CliError;
use crate::output;

pub fn run(
    input: Option<String>,
    config: Option<PathBuf>,
    format_name: String,
    url: Option<String>,
    total: Option<u64>,
) -> Result<(), CliError> {
    let config = CliConfig::load(config.as_deref())?;
    let registry = config.registry()?;
    let formats = config.formats();
    let format = formats.get(&format_name).ok_or_else(|| {
        CliError::Usage(format!(
            "unknown format '{}'; expected one of: {}",
            format_name,
            formats.names().join(", ")
        ))
    })?;

    let value = output::read_json(input.as_deref())?;
    let encoded = match (value, total) {
        (Value::Array(items), Some(total)) => {
            let url = url.ok_or_else(|| CliError::Usage("--total requires --url".to_string()))?;
            let query = RequestQuery::from_url(&url).map_err(output::reject)?;
            let spec = PageSpec::from_query(&query, &config.pagination).map_err(output::reject)?;
            let page = PageResult {
                items: entities(items)?,
                total,
                spec,
            };
            format.encode(&registry, Payload::Page { page: &page, url: &url })?
        }
        (Value::Array(items), None) => {
            let entities = entities(items)?;
            format.encode(&registry, Payload::Many(&entities))?
        }
        (_, Some(_)) => {
            return Err(CliError::Usage(
                "--total requires an array of entities".to_string(),
            ))
        }
        (value, None) => {
            let entity: Entity = serde_json::from_value(value)?;
            format.encode(&registry, Payload::One(&entity))?
        }
    };

    output::print_json(&encoded);
    Ok(())
}

fn entities(items: Vec<Value>) -> Result<Vec<Entity>, CliError> {
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(CliError::from))
        .collect()
}
