//! Check-registry command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use jsonapi_negotiate::Negotiator;
use serde_json::{json, Map, Value};
use tracing::info;

use crate::config::CliConfig;
use crate::error::CliError;
use crate::output;

pub fn run(config: PathBuf) -> Result<(), CliError> {
    let config = CliConfig::load(Some(&config))?;
    let registry = config.registry()?;
    let negotiator = Negotiator::new(registry.clone(), Arc::new(config.formats()));

    for endpoint in &config.endpoints {
        negotiator.check_endpoint(endpoint)?;
    }

    let types: Vec<Value> = registry
        .schemas()
        .map(|schema| {
            let relationships: Map<String, Value> = schema
                .relationships
                .iter()
                .map(|(name, relationship)| {
                    (
                        name.clone(),
                        json!({
                            "cardinality": relationship.cardinality,
                            "type": relationship.target_type,
                        }),
                    )
                })
                .collect();
            json!({
                "type": schema.type_name,
                "id_field": schema.id_field,
                "attributes": schema.attributes,
                "relationships": relationships,
                "serializer": schema.serializer,
                "formats": schema.formats,
            })
        })
        .collect();

    info!(types = registry.len(), "registry is valid");
    output::print_json(&json!({ "types": types }));
    Ok(())
}
