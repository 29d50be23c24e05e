//! Error types for registry operations.

use thiserror::Error;

/// Errors raised while building or querying the resource registry.
///
/// These are server misconfigurations, never client input problems.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Type already registered with a different schema.
    #[error("resource type '{0}' is already registered with a different schema")]
    Conflict(String),
    /// Type not registered.
    #[error("resource type '{0}' is not registered")]
    NotFound(String),
    /// Schema is internally inconsistent.
    #[error("invalid schema for '{type_name}': {reason}")]
    Schema {
        /// Type whose schema is invalid.
        type_name: String,
        /// What is wrong with it.
        reason: String,
    },
    /// A process-wide registry was already installed.
    #[error("a global registry is already installed")]
    AlreadyInstalled,
    /// Registry configuration could not be parsed.
    #[error("invalid registry configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl RegistryError {
    pub(crate) fn schema(type_name: &str, reason: impl Into<String>) -> Self {
        RegistryError::Schema {
            type_name: type_name.to_string(),
            reason: reason.into(),
        }
    }
}
