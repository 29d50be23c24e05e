//! Configuration file loading.
//!
//! ```toml
//! [encoder]
//! base_url = "https://api.example.com"
//! include_related = true
//!
//! [pagination]
//! default_size = 10
//!
//! [[resources]]
//! type = "articles"
//! attributes = ["title"]
//!
//! [[endpoints]]
//! type = "articles"
//! default_format = "json-api"
//! ```

use std::path::Path;

use jsonapi_codec::{DecoderOptions, EncoderOptions, PaginationConfig};
use jsonapi_model::{Registry, RegistryConfig, ResourceConfig};
use jsonapi_negotiate::{Endpoint, FormatTable, NegotiatorOptions};
use serde::Deserialize;
use tracing::debug;

use crate::error::CliError;

/// Whole configuration file; every section is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Encoder settings.
    pub encoder: EncoderOptions,
    /// Decoder settings.
    pub decoder: DecoderOptions,
    /// Pagination parameter names and limits.
    pub pagination: PaginationConfig,
    /// Negotiator settings.
    pub negotiation: NegotiatorOptions,
    /// Resource types, registered in file order.
    pub resources: Vec<ResourceConfig>,
    /// Endpoint defaults.
    pub endpoints: Vec<Endpoint>,
}

impl CliConfig {
    /// Loads a file, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let source = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&source)?;
        debug!(
            path = %path.display(),
            resources = config.resources.len(),
            endpoints = config.endpoints.len(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// Builds and freezes the registry.
    pub fn registry(&self) -> Result<Registry, CliError> {
        let registry = RegistryConfig {
            resources: self.resources.clone(),
        };
        Ok(registry.build()?)
    }

    /// Built-in formats configured from this file.
    pub fn formats(&self) -> FormatTable {
        FormatTable::builtin(
            self.encoder.clone(),
            self.decoder.clone(),
            self.pagination.clone(),
        )
    }

    /// Configured endpoint for a type, or one without defaults.
    pub fn endpoint(&self, type_name: &str) -> Endpoint {
        self.endpoints
            .iter()
            .find(|endpoint| endpoint.type_name == type_name)
            .cloned()
            .unwrap_or_else(|| Endpoint::new(type_name))
    }
}
