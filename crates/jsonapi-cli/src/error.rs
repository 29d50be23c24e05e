//! CLI error type.

use jsonapi_codec::CodecError;
use jsonapi_model::{ErrorList, RegistryError};
use jsonapi_negotiate::NegotiationError;
use thiserror::Error;

/// Everything a command can fail with.
#[derive(Error, Debug)]
pub enum CliError {
    /// File or stdin could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File path, or `<stdin>`.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },
    /// Input is not valid JSON or does not have the expected shape.
    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),
    /// Configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
    /// Registry could not be built or lacks a type.
    #[error("{0}")]
    Registry(#[from] RegistryError),
    /// Encoding or decoding failed on the server side.
    #[error("{0}")]
    Codec(#[from] CodecError),
    /// Negotiator misconfiguration.
    #[error("{0}")]
    Negotiation(#[from] NegotiationError),
    /// Bad combination of arguments.
    #[error("{0}")]
    Usage(String),
    /// Input was processed and refused; the errors were already printed.
    #[error("rejected with status {}", .0.status())]
    Rejected(ErrorList),
}

impl CliError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Rejected(_) => 2,
            _ => 1,
        }
    }
}
