//! Document format strategies and the table they are registered in.

use std::sync::Arc;

use jsonapi_codec::{
    CodecError, DecodeOutcome, Decoder, DecoderOptions, Encoder, EncoderOptions, Expectation,
    FlatDecoder, FlatEncoder, PageResult, PaginationConfig,
};
use jsonapi_model::{Entity, ErrorList, Registry};
use serde_json::Value;

use crate::errors::NegotiationError;
use crate::media_type::MediaType;

/// Name of the built-in JSON:API format.
pub const JSONAPI_FORMAT: &str = "json-api";

/// Name of the built-in plain JSON format.
pub const PLAIN_JSON_FORMAT: &str = "json";

/// What a format is asked to encode.
#[derive(Debug, Clone, Copy)]
pub enum Payload<'a> {
    /// One entity.
    One(&'a Entity),
    /// A whole collection.
    Many(&'a [Entity]),
    /// One page of a collection, with the URL it was requested under.
    Page {
        /// Items and totals.
        page: &'a PageResult<Entity>,
        /// Request URL; navigation links rewrite its page parameter.
        url: &'a str,
    },
    /// Client errors.
    Errors(&'a ErrorList),
}

/// A wire representation a resource can be served in.
///
/// Implementations are stateless strategies selected per request by the
/// negotiator.
pub trait DocumentFormat: Send + Sync {
    /// Short name used by the `format` query parameter.
    fn name(&self) -> &str;

    /// Media type the format is served as.
    fn media_type(&self) -> &MediaType;

    /// Serializer forced by this format, overriding the endpoint default.
    fn serializer(&self) -> Option<&str> {
        None
    }

    /// True if a request `Content-Type` can be decoded by this format.
    fn accepts_content_type(&self, content_type: &MediaType) -> bool {
        content_type.essence() == self.media_type().essence()
            && content_type.has_valid_jsonapi_params()
    }

    /// Encodes a payload.
    fn encode(&self, registry: &Registry, payload: Payload<'_>) -> Result<Value, CodecError>;

    /// Decodes a request body.
    fn decode(
        &self,
        registry: &Registry,
        body: &Value,
        expectation: &Expectation,
    ) -> Result<DecodeOutcome, CodecError>;
}

/// `application/vnd.api+json` documents.
#[derive(Debug, Clone)]
pub struct JsonApiFormat {
    media_type: MediaType,
    encoder: EncoderOptions,
    decoder: DecoderOptions,
    pagination: PaginationConfig,
    serializer: Option<String>,
}

impl JsonApiFormat {
    /// Creates the format with the given codec settings.
    pub fn new(encoder: EncoderOptions, decoder: DecoderOptions, pagination: PaginationConfig) -> Self {
        Self {
            media_type: MediaType::jsonapi(),
            encoder,
            decoder,
            pagination,
            serializer: None,
        }
    }

    /// Forces a serializer for every response in this format.
    pub fn with_serializer(mut self, serializer: impl Into<String>) -> Self {
        self.serializer = Some(serializer.into());
        self
    }
}

impl Default for JsonApiFormat {
    fn default() -> Self {
        Self::new(EncoderOptions::default(), DecoderOptions::default(), PaginationConfig::default())
    }
}

impl DocumentFormat for JsonApiFormat {
    fn name(&self) -> &str {
        JSONAPI_FORMAT
    }

    fn media_type(&self) -> &MediaType {
        &self.media_type
    }

    fn serializer(&self) -> Option<&str> {
        self.serializer.as_deref()
    }

    fn encode(&self, registry: &Registry, payload: Payload<'_>) -> Result<Value, CodecError> {
        let encoder = Encoder::new(registry, self.encoder.clone());
        let document = match payload {
            Payload::One(entity) => encoder.encode_one(entity)?,
            Payload::Many(entities) => encoder.encode_many(entities)?,
            Payload::Page { page, url } => encoder.encode_page(page, url, &self.pagination)?,
            Payload::Errors(errors) => encoder.encode_errors(errors),
        };
        Ok(document.to_value()?)
    }

    fn decode(
        &self,
        registry: &Registry,
        body: &Value,
        expectation: &Expectation,
    ) -> Result<DecodeOutcome, CodecError> {
        Decoder::new(registry, self.decoder.clone()).decode(body, expectation)
    }
}

/// `application/json` flat objects.
#[derive(Debug, Clone)]
pub struct PlainJsonFormat {
    media_type: MediaType,
    pagination: PaginationConfig,
    serializer: Option<String>,
}

impl PlainJsonFormat {
    /// Creates the format with the given pagination settings.
    pub fn new(pagination: PaginationConfig) -> Self {
        Self {
            media_type: MediaType::new("application", "json"),
            pagination,
            serializer: None,
        }
    }

    /// Forces a serializer for every response in this format.
    pub fn with_serializer(mut self, serializer: impl Into<String>) -> Self {
        self.serializer = Some(serializer.into());
        self
    }
}

impl Default for PlainJsonFormat {
    fn default() -> Self {
        Self::new(PaginationConfig::default())
    }
}

impl DocumentFormat for PlainJsonFormat {
    fn name(&self) -> &str {
        PLAIN_JSON_FORMAT
    }

    fn media_type(&self) -> &MediaType {
        &self.media_type
    }

    fn serializer(&self) -> Option<&str> {
        self.serializer.as_deref()
    }

    fn encode(&self, registry: &Registry, payload: Payload<'_>) -> Result<Value, CodecError> {
        let encoder = FlatEncoder::new(registry);
        match payload {
            Payload::One(entity) => encoder.encode_one(entity),
            Payload::Many(entities) => encoder.encode_many(entities),
            Payload::Page { page, url } => encoder.encode_page(page, url, &self.pagination),
            Payload::Errors(errors) => Ok(encoder.encode_errors(errors)),
        }
    }

    fn decode(
        &self,
        registry: &Registry,
        body: &Value,
        expectation: &Expectation,
    ) -> Result<DecodeOutcome, CodecError> {
        FlatDecoder::new(registry).decode(body, expectation)
    }
}

/// Registered formats in registration order.
///
/// Registration order breaks ties between equally good matches.
#[derive(Clone, Default)]
pub struct FormatTable {
    formats: Vec<Arc<dyn DocumentFormat>>,
}

impl FormatTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding the JSON:API format followed by plain JSON.
    pub fn builtin(
        encoder: EncoderOptions,
        decoder: DecoderOptions,
        pagination: PaginationConfig,
    ) -> Self {
        let json_api: Arc<dyn DocumentFormat> =
            Arc::new(JsonApiFormat::new(encoder, decoder, pagination.clone()));
        let plain: Arc<dyn DocumentFormat> = Arc::new(PlainJsonFormat::new(pagination));
        Self {
            formats: vec![json_api, plain],
        }
    }

    /// Adds a format; names must be unique.
    pub fn register(
        &mut self,
        format: Arc<dyn DocumentFormat>,
    ) -> Result<&mut Self, NegotiationError> {
        if self.get(format.name()).is_some() {
            return Err(NegotiationError::DuplicateFormat(format.name().to_string()));
        }
        self.formats.push(format);
        Ok(self)
    }

    /// Format registered under `name`.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn DocumentFormat>> {
        self.formats.iter().find(|format| format.name() == name)
    }

    /// Formats in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn DocumentFormat>> {
        self.formats.iter()
    }

    /// Names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.formats.iter().map(|format| format.name()).collect()
    }

    /// Number of registered formats.
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

impl std::fmt::Debug for FormatTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
