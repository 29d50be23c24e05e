//! Per-request format selection.
//!
//! Precedence for the response format:
//! 1. an explicit `format` query parameter (unknown names are refused),
//! 2. the `Accept` header, or the request `Content-Type` when there is no
//!    `Accept` header,
//! 3. the endpoint default.
//!
//! Among `Accept` ranges of equal quality and specificity, the format
//! registered first wins unless the endpoint default is among the matches.
//! An `Accept` header that matches nothing falls back only to the endpoint
//! default; a request with no preference at all is also served from the
//! schema's formats or the first registered one.
//!
//! The request body is decoded by the format matching its `Content-Type`.

use std::fmt;
use std::sync::Arc;

use jsonapi_codec::FORMAT_PARAM;
use jsonapi_model::{ErrorList, ErrorObject, Problem, Registry, ResourceSchema};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::NegotiationError;
use crate::format::{DocumentFormat, FormatTable};
use crate::media_type::{parse_accept, MediaType};

/// Server-side description of an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Resource type served.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Format used when the client expresses no preference.
    #[serde(default)]
    pub default_format: Option<String>,
    /// Serializer used unless the chosen format forces one.
    #[serde(default)]
    pub default_serializer: Option<String>,
}

impl Endpoint {
    /// Endpoint for a type with no explicit defaults.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            default_format: None,
            default_serializer: None,
        }
    }

    /// Sets the default format.
    pub fn with_default_format(mut self, format: impl Into<String>) -> Self {
        self.default_format = Some(format.into());
        self
    }

    /// Sets the default serializer.
    pub fn with_default_serializer(mut self, serializer: impl Into<String>) -> Self {
        self.default_serializer = Some(serializer.into());
        self
    }
}

/// Request facts relevant to negotiation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMeta {
    /// `Accept` header.
    pub accept: Option<String>,
    /// `Content-Type` header.
    pub content_type: Option<String>,
    /// `format` query parameter.
    pub format: Option<String>,
    /// True if the request carries a body to decode.
    pub has_body: bool,
}

impl RequestMeta {
    /// Request without headers or body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the `Accept` header.
    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    /// Sets the `Content-Type` header and marks a body present.
    pub fn body(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self.has_body = true;
        self
    }

    /// Sets the `format` query parameter.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

/// Why a response format was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionReason {
    /// `format` query parameter.
    ExplicitFormat,
    /// `Accept` header.
    Accept,
    /// Request `Content-Type`, no `Accept` header.
    ContentType,
    /// Endpoint default.
    Default,
}

/// Formats chosen for one request.
#[derive(Clone)]
pub struct Negotiated {
    response: Arc<dyn DocumentFormat>,
    request: Option<Arc<dyn DocumentFormat>>,
    reason: SelectionReason,
    effective_serializer: Option<String>,
}

impl Negotiated {
    /// Format the response is encoded in.
    pub fn response(&self) -> &Arc<dyn DocumentFormat> {
        &self.response
    }

    /// Format the request body is decoded with; `None` without a body.
    pub fn request(&self) -> Option<&Arc<dyn DocumentFormat>> {
        self.request.as_ref()
    }

    /// Why the response format won.
    pub fn reason(&self) -> SelectionReason {
        self.reason
    }

    /// Serializer to encode with: the format's override, else the endpoint
    /// default, else the schema default.
    pub fn effective_serializer(&self) -> Option<&str> {
        self.effective_serializer.as_deref()
    }

    /// `Content-Type` of the response.
    pub fn content_type(&self) -> String {
        self.response.media_type().to_string()
    }
}

impl fmt::Debug for Negotiated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Negotiated")
            .field("response", &self.response.name())
            .field("request", &self.request.as_ref().map(|format| format.name()))
            .field("reason", &self.reason)
            .field("effective_serializer", &self.effective_serializer)
            .finish()
    }
}

/// Outcome of negotiation.
#[derive(Debug, Clone)]
pub enum Negotiation {
    /// Formats for the response and the request body.
    Selected(Negotiated),
    /// 406 or 415; the errors are meant for the client.
    Rejected(ErrorList),
}

/// Negotiator settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NegotiatorOptions {
    /// Refuse with 406 when an `Accept` header matches no format, instead
    /// of falling back to the endpoint default.
    pub strict_accept: bool,
}

/// Selects formats over a shared, read-only format table.
#[derive(Debug, Clone)]
pub struct Negotiator {
    registry: Registry,
    formats: Arc<FormatTable>,
    options: NegotiatorOptions,
}

impl Negotiator {
    /// Creates a negotiator.
    pub fn new(registry: Registry, formats: Arc<FormatTable>) -> Self {
        Self {
            registry,
            formats,
            options: NegotiatorOptions::default(),
        }
    }

    /// Replaces the settings.
    pub fn with_options(mut self, options: NegotiatorOptions) -> Self {
        self.options = options;
        self
    }

    /// Registered formats.
    pub fn formats(&self) -> &FormatTable {
        &self.formats
    }

    /// Registry the endpoints are resolved against.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Chooses the response format and request decoder for one request.
    pub fn negotiate(
        &self,
        endpoint: &Endpoint,
        request: &RequestMeta,
    ) -> Result<Negotiation, NegotiationError> {
        let schema = self.registry.lookup(&endpoint.type_name)?;
        let candidates = self.candidates(schema);
        let default = self.default_format(endpoint, &candidates)?;

        let content_type = request.content_type.as_deref().map(MediaType::parse);
        let body_format = match &content_type {
            Some(Ok(content_type)) => candidates
                .iter()
                .find(|format| format.accepts_content_type(content_type))
                .cloned(),
            _ => None,
        };

        let selected = self.select_response(
            request,
            schema,
            &candidates,
            default.as_ref(),
            body_format.as_ref(),
        );
        let (response, reason) = match selected {
            Ok(selected) => selected,
            Err(error) => return Ok(rejected(endpoint, error)),
        };

        let request_format = match (request.has_body, &request.content_type, body_format) {
            (false, _, _) => None,
            (true, None, _) => Some(response.clone()),
            (true, Some(_), Some(format)) => Some(format),
            (true, Some(raw), None) => {
                let error = Problem::UnsupportedMediaType.without_source(format!(
                    "Content-Type '{}' is not supported; expected one of: {}",
                    raw,
                    media_types(&candidates)
                ));
                return Ok(rejected(endpoint, error));
            }
        };

        let effective_serializer = response
            .serializer()
            .map(str::to_string)
            .or_else(|| endpoint.default_serializer.clone())
            .or_else(|| schema.serializer.clone());

        debug!(
            type_name = %endpoint.type_name,
            format = response.name(),
            reason = ?reason,
            "negotiated response format"
        );
        Ok(Negotiation::Selected(Negotiated {
            response,
            request: request_format,
            reason,
            effective_serializer,
        }))
    }

    /// Checks that the endpoint type is registered and that its default
    /// format is both registered and allowed for the type.
    pub fn check_endpoint(&self, endpoint: &Endpoint) -> Result<(), NegotiationError> {
        let schema = self.registry.lookup(&endpoint.type_name)?;
        let candidates = self.candidates(schema);
        self.default_format(endpoint, &candidates).map(|_| ())
    }

    fn candidates(&self, schema: &ResourceSchema) -> Vec<Arc<dyn DocumentFormat>> {
        self.formats
            .iter()
            .filter(|format| schema.supports_format(format.name()))
            .cloned()
            .collect()
    }

    fn default_format(
        &self,
        endpoint: &Endpoint,
        candidates: &[Arc<dyn DocumentFormat>],
    ) -> Result<Option<Arc<dyn DocumentFormat>>, NegotiationError> {
        let Some(name) = &endpoint.default_format else {
            return Ok(None);
        };
        if self.formats.get(name).is_none() {
            return Err(NegotiationError::UnknownDefaultFormat {
                type_name: endpoint.type_name.clone(),
                format: name.clone(),
            });
        }
        candidates
            .iter()
            .find(|format| format.name() == name.as_str())
            .cloned()
            .map(Some)
            .ok_or_else(|| NegotiationError::ExcludedDefaultFormat {
                type_name: endpoint.type_name.clone(),
                format: name.clone(),
            })
    }

    fn select_response(
        &self,
        request: &RequestMeta,
        schema: &ResourceSchema,
        candidates: &[Arc<dyn DocumentFormat>],
        default: Option<&Arc<dyn DocumentFormat>>,
        body_format: Option<&Arc<dyn DocumentFormat>>,
    ) -> Result<(Arc<dyn DocumentFormat>, SelectionReason), ErrorObject> {
        if let Some(name) = &request.format {
            return candidates
                .iter()
                .find(|format| format.name() == name.as_str())
                .map(|format| (format.clone(), SelectionReason::ExplicitFormat))
                .ok_or_else(|| {
                    Problem::NotAcceptable.at_parameter(
                        FORMAT_PARAM,
                        format!(
                            "format '{}' is not available; expected one of: {}",
                            name,
                            names(candidates)
                        ),
                    )
                });
        }

        let accept = request.accept.as_deref().filter(|header| !header.trim().is_empty());
        let Some(header) = accept else {
            if let Some(format) = body_format {
                return Ok((format.clone(), SelectionReason::ContentType));
            }
            // no preference at all: the schema's own formats, then registration order
            let fallback = default.cloned().or_else(|| {
                schema
                    .formats
                    .iter()
                    .find_map(|name| candidates.iter().find(|format| format.name() == name.as_str()))
                    .or_else(|| candidates.first())
                    .cloned()
            });
            return fallback
                .map(|format| (format, SelectionReason::Default))
                .ok_or_else(|| Problem::NotAcceptable.without_source("no response format is available"));
        };

        let entries = parse_accept(header);
        for group in entries.chunk_by(|a, b| {
            a.quality == b.quality && a.range.specificity() == b.range.specificity()
        }) {
            // candidates are in registration order, so equal ranks resolve to the first registered
            let matching: Vec<&Arc<dyn DocumentFormat>> = candidates
                .iter()
                .filter(|format| group.iter().any(|entry| entry.range.matches(format.media_type())))
                .collect();
            let Some(first) = matching.first() else {
                continue;
            };
            let chosen = default
                .filter(|default| matching.iter().any(|format| format.name() == default.name()))
                .unwrap_or(*first);
            return Ok((chosen.clone(), SelectionReason::Accept));
        }

        let not_acceptable = || {
            Problem::NotAcceptable.without_source(format!(
                "none of '{}' is available; expected one of: {}",
                header,
                media_types(candidates)
            ))
        };
        if self.options.strict_accept {
            return Err(not_acceptable());
        }
        default
            .map(|format| (format.clone(), SelectionReason::Default))
            .ok_or_else(not_acceptable)
    }
}

fn rejected(endpoint: &Endpoint, error: ErrorObject) -> Negotiation {
    debug!(
        type_name = %endpoint.type_name,
        status = error.status_code(),
        "negotiation rejected"
    );
    Negotiation::Rejected(ErrorList::new(error))
}

fn names(formats: &[Arc<dyn DocumentFormat>]) -> String {
    formats
        .iter()
        .map(|format| format.name())
        .collect::<Vec<_>>()
        .join(", ")
}

fn media_types(formats: &[Arc<dyn DocumentFormat>]) -> String {
    formats
        .iter()
        .map(|format| format.media_type().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
