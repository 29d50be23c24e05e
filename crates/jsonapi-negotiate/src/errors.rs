use jsonapi_model::RegistryError;
use thiserror::Error;

/// Negotiator misconfiguration. Client mismatches (406, 415) are reported
/// as rejected negotiations instead.
#[derive(Error, Debug)]
pub enum NegotiationError {
    /// Endpoint names a type the registry does not know.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
    /// Endpoint default format was never registered.
    #[error("default format '{format}' of endpoint '{type_name}' is not registered")]
    UnknownDefaultFormat {
        /// Endpoint resource type.
        type_name: String,
        /// Missing format name.
        format: String,
    },
    /// Endpoint default format is registered but the resource type
    /// does not allow it.
    #[error("default format '{format}' of endpoint '{type_name}' is not allowed for the type")]
    ExcludedDefaultFormat {
        /// Endpoint resource type.
        type_name: String,
        /// Excluded format name.
        format: String,
    },
    /// Two formats registered under one name.
    #[error("format '{0}' is already registered")]
    DuplicateFormat(String),
}
