use jsonapi_model::{Cardinality, ErrorObject, RegistryError};
use thiserror::Error;

/// Fatal codec failures.
///
/// Every variant is a server-side misconfiguration or programming error.
/// Bad client input is reported as a rejected outcome instead.
#[derive(Error, Debug)]
pub enum CodecError {
    /// Type missing from the registry.
    #[error("schema error: {0}")]
    Schema(#[from] RegistryError),
    /// Related value shape contradicts the declared cardinality.
    #[error("relationship '{relationship}' of '{type_name}' is declared {expected:?}")]
    Cardinality {
        /// Owning resource type.
        type_name: String,
        /// Relationship name.
        relationship: String,
        /// Declared cardinality.
        expected: Cardinality,
    },
    /// Related resource is of a type other than the declared target.
    #[error("relationship '{relationship}' of '{type_name}' links '{expected}', got '{actual}'")]
    TargetType {
        /// Owning resource type.
        type_name: String,
        /// Relationship name.
        relationship: String,
        /// Declared target type.
        expected: String,
        /// Type actually supplied.
        actual: String,
    },
    /// Related entity has no id and cannot be linked.
    #[error("relationship '{relationship}' of '{type_name}' refers to an entity without an id")]
    MissingRelatedId {
        /// Owning resource type.
        type_name: String,
        /// Relationship name.
        relationship: String,
    },
    /// Document could not be rendered as JSON.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CodecError {
    /// Client-facing error object; internal detail is never exposed.
    pub fn to_error_object(&self) -> ErrorObject {
        ErrorObject::internal()
    }
}
