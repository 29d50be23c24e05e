//! Classification of client-facing failures and their HTTP mapping.

use serde::{Deserialize, Serialize};

use crate::error_object::{ErrorObject, ErrorSource};
use crate::pointer::JsonPointer;

/// Kind of problem reported back to a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Problem {
    /// Structurally invalid document envelope.
    MalformedDocument,
    /// Malformed or unsupported query parameter.
    InvalidParameter,
    /// Requested JSON:API version is newer than supported.
    UnsupportedVersion,
    /// `included` sent on a write request.
    IncludedOnWrite,
    /// Same `(type, id)` pair appears twice.
    DuplicateResource,
    /// Resource `type` does not match the endpoint.
    TypeConflict,
    /// Resource `id` does not match the endpoint.
    IdConflict,
    /// Attribute not declared by the resource schema.
    UnknownAttribute,
    /// Relationship not declared by the resource schema.
    UnknownRelationship,
    /// Reserved member (`type`, `id`, identity field) used as a field.
    ReservedMember,
    /// Same name used for an attribute and a relationship.
    MemberConflict,
    /// Linkage shape contradicts the declared cardinality.
    Cardinality,
    /// No acceptable response format.
    NotAcceptable,
    /// Request body media type not supported.
    UnsupportedMediaType,
    /// Server-side failure; never carries internal detail.
    Internal,
}

impl Problem {
    /// HTTP status code for this problem.
    pub fn status(self) -> u16 {
        match self {
            Problem::MalformedDocument
            | Problem::InvalidParameter
            | Problem::UnsupportedVersion
            | Problem::IncludedOnWrite
            | Problem::DuplicateResource => 400,
            Problem::NotAcceptable => 406,
            Problem::TypeConflict | Problem::IdConflict => 409,
            Problem::UnsupportedMediaType => 415,
            Problem::UnknownAttribute
            | Problem::UnknownRelationship
            | Problem::ReservedMember
            | Problem::MemberConflict
            | Problem::Cardinality => 422,
            Problem::Internal => 500,
        }
    }

    /// Stable application error code.
    pub fn code(self) -> &'static str {
        match self {
            Problem::MalformedDocument => "malformed_document",
            Problem::InvalidParameter => "invalid_parameter",
            Problem::UnsupportedVersion => "unsupported_version",
            Problem::IncludedOnWrite => "included_on_write",
            Problem::DuplicateResource => "duplicate_resource",
            Problem::TypeConflict => "type_conflict",
            Problem::IdConflict => "id_conflict",
            Problem::UnknownAttribute => "unknown_attribute",
            Problem::UnknownRelationship => "unknown_relationship",
            Problem::ReservedMember => "reserved_member",
            Problem::MemberConflict => "member_conflict",
            Problem::Cardinality => "cardinality",
            Problem::NotAcceptable => "not_acceptable",
            Problem::UnsupportedMediaType => "unsupported_media_type",
            Problem::Internal => "internal_error",
        }
    }

    /// Human-readable title.
    pub fn title(self) -> &'static str {
        match self {
            Problem::MalformedDocument => "Malformed Document",
            Problem::InvalidParameter => "Invalid Query Parameter",
            Problem::UnsupportedVersion => "Unsupported JSON:API Version",
            Problem::IncludedOnWrite => "Included Resources Not Allowed",
            Problem::DuplicateResource => "Duplicate Resource",
            Problem::TypeConflict => "Resource Type Conflict",
            Problem::IdConflict => "Resource Id Conflict",
            Problem::UnknownAttribute => "Unknown Attribute",
            Problem::UnknownRelationship => "Unknown Relationship",
            Problem::ReservedMember => "Reserved Member",
            Problem::MemberConflict => "Member Conflict",
            Problem::Cardinality => "Cardinality Mismatch",
            Problem::NotAcceptable => "Not Acceptable",
            Problem::UnsupportedMediaType => "Unsupported Media Type",
            Problem::Internal => "Internal Server Error",
        }
    }

    /// Error object pointing into the request document.
    pub fn at_pointer(self, pointer: &JsonPointer, detail: impl Into<String>) -> ErrorObject {
        self.error(Some(ErrorSource::Pointer(pointer.to_string())), Some(detail.into()))
    }

    /// Error object blaming a query parameter.
    pub fn at_parameter(self, parameter: &str, detail: impl Into<String>) -> ErrorObject {
        self.error(
            Some(ErrorSource::Parameter(parameter.to_string())),
            Some(detail.into()),
        )
    }

    /// Error object without a source (e.g. header-level failures).
    pub fn without_source(self, detail: impl Into<String>) -> ErrorObject {
        self.error(None, Some(detail.into()))
    }

    fn error(self, source: Option<ErrorSource>, detail: Option<String>) -> ErrorObject {
        ErrorObject {
            status: Some(self.status().to_string()),
            code: Some(self.code().to_string()),
            title: Some(self.title().to_string()),
            detail,
            source,
            ..ErrorObject::default()
        }
    }
}

impl ErrorObject {
    /// Generic server error exposing no internal detail.
    pub fn internal() -> Self {
        Problem::Internal.error(None, None)
    }
}
