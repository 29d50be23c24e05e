//! JSON:API document codec.
//!
//! This crate provides:
//! - The encoder, turning entities into documents (compound documents,
//!   links, pagination)
//! - The decoder, validating request documents against the registry
//! - Page-number and limit/offset pagination links
//! - Query parameter parsing
//! - A flat plain-JSON representation for non-JSON:API clients
//!
//! All operations are pure functions over a frozen registry.
//!
#![deny(missing_docs)]

/// Request documents to resource objects.
pub mod decoder;
/// Entities to documents.
pub mod encoder;
/// Codec error types.
pub mod errors;
/// Plain JSON representation.
pub mod flat;
/// Pagination links.
pub mod pagination;
/// Query parameter parsing.
pub mod query;
/// URL query-string helpers.
pub mod urls;

pub use decoder::{
    decode_document, DecodeOutcome, Decoder, DecoderOptions, Expectation, Operation, Shape,
};
pub use encoder::{Encoder, EncoderOptions};
pub use errors::CodecError;
pub use flat::{FlatDecoder, FlatEncoder};
pub use pagination::{
    compute_links, compute_offset_links, last_page, OffsetSpec, PageLinks, PageResult, PageSpec,
    PaginationConfig,
};
pub use query::{RequestQuery, SortField, FORMAT_PARAM, INCLUDE_PARAM, ORDERING_PARAM};
pub use urls::{percent_decode, query_of, remove_query_param, replace_query_param};
