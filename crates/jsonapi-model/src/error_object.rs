use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::resource::Link;
use crate::validation::ValidationError;

/// Reference to the part of the request that caused an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSource {
    /// JSON Pointer into the request document (e.g. `/data/attributes/title`).
    Pointer(String),
    /// Name of the offending query parameter.
    Parameter(String),
}

/// Links object of an error (`about`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLinks {
    /// Link to further details about this occurrence.
    pub about: Link,
}

/// JSON:API error object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorObject {
    /// Unique identifier for this occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Links with further details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<ErrorLinks>,
    /// HTTP status code as a string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Application-specific error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short summary that does not vary between occurrences.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Explanation specific to this occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Where in the request the problem was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrorSource>,
    /// Non-standard meta information.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
}

impl ErrorObject {
    /// Numeric status, if present and well formed.
    pub fn status_code(&self) -> Option<u16> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }

    /// Pointer of the error source, if it has one.
    pub fn pointer(&self) -> Option<&str> {
        match &self.source {
            Some(ErrorSource::Pointer(pointer)) => Some(pointer),
            _ => None,
        }
    }
}

/// Non-empty, ordered list of error objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorList(Vec<ErrorObject>);

impl ErrorList {
    /// Starts a list with its first error.
    pub fn new(first: ErrorObject) -> Self {
        Self(vec![first])
    }

    /// Builds a list from a vector, rejecting an empty one.
    pub fn from_vec(errors: Vec<ErrorObject>) -> Result<Self, ValidationError> {
        if errors.is_empty() {
            return Err(ValidationError::Empty { field: "errors" });
        }
        Ok(Self(errors))
    }

    /// Appends an error.
    pub fn push(&mut self, error: ErrorObject) {
        self.0.push(error);
    }

    /// Appends every error from another list.
    pub fn extend(&mut self, other: ErrorList) {
        self.0.extend(other.0);
    }

    /// Number of errors (always at least one).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the errors in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ErrorObject> {
        self.0.iter()
    }

    /// Consumes the list into its errors.
    pub fn into_vec(self) -> Vec<ErrorObject> {
        self.0
    }

    /// HTTP status for a response carrying every error in the list.
    ///
    /// The shared status when all errors agree; otherwise the generic code
    /// of the most severe class (500 for any 5xx, else 400).
    pub fn status(&self) -> u16 {
        let codes: Vec<u16> = self.0.iter().map(|e| e.status_code().unwrap_or(500)).collect();
        let first = codes[0];
        if codes.iter().all(|&code| code == first) {
            return first;
        }
        if codes.iter().any(|&code| code >= 500) {
            500
        } else {
            400
        }
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a ErrorObject;
    type IntoIter = std::slice::Iter<'a, ErrorObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<ErrorObject> for ErrorList {
    fn from(error: ErrorObject) -> Self {
        Self::new(error)
    }
}
