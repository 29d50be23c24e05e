//! Framework-agnostic resource model for JSON:API documents.
//!
//! This crate provides:
//! - Resource objects, identifiers and relationship linkage
//! - The top-level document envelope (`data` xor `errors`)
//! - Error objects and the client-facing problem taxonomy
//! - The resource descriptor registry with its two-phase lifecycle
//!
//! Everything here is plain data. Encoding and decoding live in
//! `jsonapi-codec`; format selection lives in `jsonapi-negotiate`.
//!
#![deny(missing_docs)]

/// TOML registry configuration.
pub mod config;
/// Top-level document envelope.
pub mod document;
/// Encode-side entities.
pub mod entity;
/// Error objects and error lists.
pub mod error_object;
/// Registry error types.
pub mod errors;
/// Resource identifiers and validated names.
pub mod identifiers;
/// Field name inflection.
pub mod inflection;
/// JSON pointers into request documents.
pub mod pointer;
/// Problem taxonomy for client-facing failures.
pub mod problem;
/// Resource descriptor registry.
pub mod registry;
/// Resource object model.
pub mod resource;
/// Resource schemas.
pub mod schema;
/// Validation helpers used by model types.
pub mod validation;

pub use config::{RegistryConfig, RelationshipConfig, ResourceConfig};
pub use document::{
    Document, DocumentBody, JsonApiInfo, PrimaryData, JSONAPI_MEDIA_TYPE, JSONAPI_VERSION,
};
pub use entity::{Entity, Related, RelatedEntity};
pub use error_object::{ErrorLinks, ErrorList, ErrorObject, ErrorSource};
pub use errors::RegistryError;
pub use identifiers::{MemberName, ResourceIdentifier, TypeName};
pub use inflection::FieldInflection;
pub use pointer::JsonPointer;
pub use problem::Problem;
pub use registry::{global, install_global, Registry, RegistryBuilder};
pub use resource::{Link, Links, RelationshipData, RelationshipObject, ResourceObject};
pub use schema::{Cardinality, RelationshipSchema, ResourceSchema, DEFAULT_ID_FIELD};
pub use validation::ValidationError;
