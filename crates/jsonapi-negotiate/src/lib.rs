//! Content negotiation for JSON:API endpoints.
//!
//! Formats are strategies registered in a [`FormatTable`]. For each
//! request the [`Negotiator`] picks the response format from the `format`
//! query parameter, the `Accept` header, the request `Content-Type` or the
//! endpoint default, and the request decoder from the `Content-Type`.
//!
#![deny(missing_docs)]

/// Negotiation error types.
pub mod errors;
/// Format strategies and the format table.
pub mod format;
/// Media types and `Accept` parsing.
pub mod media_type;
/// Per-request selection.
pub mod negotiator;

pub use errors::NegotiationError;
pub use format::{
    DocumentFormat, FormatTable, JsonApiFormat, Payload, PlainJsonFormat, JSONAPI_FORMAT,
    PLAIN_JSON_FORMAT,
};
pub use media_type::{parse_accept, AcceptEntry, MediaType};
pub use negotiator::{
    Endpoint, Negotiated, Negotiation, Negotiator, NegotiatorOptions, RequestMeta,
    SelectionReason,
};
