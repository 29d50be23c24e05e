//! Top-level JSON:API document envelope.

use std::collections::{BTreeMap, HashSet};

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error_object::ErrorList;
use crate::identifiers::ResourceIdentifier;
use crate::resource::{Link, Links, ResourceObject};

/// Highest JSON:API version this implementation speaks.
pub const JSONAPI_VERSION: &str = "1.0";

/// Media type registered for JSON:API documents.
pub const JSONAPI_MEDIA_TYPE: &str = "application/vnd.api+json";

/// The `jsonapi` implementation object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonApiInfo {
    /// Highest supported version.
    pub version: String,
    /// Non-standard meta information.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
}

impl Default for JsonApiInfo {
    fn default() -> Self {
        Self {
            version: JSONAPI_VERSION.to_string(),
            meta: Map::new(),
        }
    }
}

/// Primary data of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PrimaryData {
    /// A single resource object.
    Resource(Box<ResourceObject>),
    /// An ordered collection of resource objects.
    Collection(Vec<ResourceObject>),
    /// A single bare identifier (relationship endpoints).
    Identifier(ResourceIdentifier),
    /// A sequence of bare identifiers.
    Identifiers(Vec<ResourceIdentifier>),
    /// Empty to-one result.
    Null,
}

impl PrimaryData {
    /// Identifiers of every primary resource carrying an id.
    pub fn identifiers(&self) -> Vec<ResourceIdentifier> {
        match self {
            PrimaryData::Resource(resource) => resource.identifier().into_iter().collect(),
            PrimaryData::Collection(resources) => {
                resources.iter().filter_map(ResourceObject::identifier).collect()
            }
            PrimaryData::Identifier(identifier) => vec![identifier.clone()],
            PrimaryData::Identifiers(identifiers) => identifiers.clone(),
            PrimaryData::Null => Vec::new(),
        }
    }
}

/// Document body: `data` and `errors` are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentBody {
    /// Successful response or request payload.
    Data(PrimaryData),
    /// Non-empty list of errors.
    Errors(ErrorList),
}

/// JSON:API top-level document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    body: DocumentBody,
    included: Vec<ResourceObject>,
    links: Links,
    meta: Map<String, Value>,
    jsonapi: Option<JsonApiInfo>,
}

impl Document {
    /// Document carrying primary data.
    pub fn data(data: PrimaryData) -> Self {
        Self::with_body(DocumentBody::Data(data))
    }

    /// Document carrying errors.
    pub fn errors(errors: ErrorList) -> Self {
        Self::with_body(DocumentBody::Errors(errors))
    }

    fn with_body(body: DocumentBody) -> Self {
        Self {
            body,
            included: Vec::new(),
            links: BTreeMap::new(),
            meta: Map::new(),
            jsonapi: None,
        }
    }

    /// Document body.
    pub fn body(&self) -> &DocumentBody {
        &self.body
    }

    /// Primary data, if this is not an error document.
    pub fn primary(&self) -> Option<&PrimaryData> {
        match &self.body {
            DocumentBody::Data(data) => Some(data),
            DocumentBody::Errors(_) => None,
        }
    }

    /// Errors, if this is an error document.
    pub fn error_list(&self) -> Option<&ErrorList> {
        match &self.body {
            DocumentBody::Errors(errors) => Some(errors),
            DocumentBody::Data(_) => None,
        }
    }

    /// Included resources, unique by identifier.
    pub fn included(&self) -> &[ResourceObject] {
        &self.included
    }

    /// Top-level links.
    pub fn links(&self) -> &Links {
        &self.links
    }

    /// Top-level meta.
    pub fn meta(&self) -> &Map<String, Value> {
        &self.meta
    }

    /// Implementation object, when emitted.
    pub fn jsonapi(&self) -> Option<&JsonApiInfo> {
        self.jsonapi.as_ref()
    }

    /// Returns a copy with `included` set, dropping duplicates of each other
    /// and of primary resources.
    pub fn with_included(mut self, resources: Vec<ResourceObject>) -> Self {
        let mut seen: HashSet<ResourceIdentifier> = match &self.body {
            DocumentBody::Data(data) => data.identifiers().into_iter().collect(),
            DocumentBody::Errors(_) => HashSet::new(),
        };
        self.included = resources
            .into_iter()
            .filter(|resource| match resource.identifier() {
                Some(identifier) => seen.insert(identifier),
                None => false,
            })
            .collect();
        self
    }

    /// Returns a copy with a top-level link set.
    pub fn with_link(mut self, name: impl Into<String>, link: Link) -> Self {
        self.links.insert(name.into(), link);
        self
    }

    /// Returns a copy with a top-level meta member set.
    pub fn with_meta(mut self, key: impl Into<String>, value: Value) -> Self {
        self.meta.insert(key.into(), value);
        self
    }

    /// Returns a copy with the implementation object set.
    pub fn with_jsonapi(mut self, info: JsonApiInfo) -> Self {
        self.jsonapi = Some(info);
        self
    }

    /// Wire representation.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match &self.body {
            DocumentBody::Data(data) => map.serialize_entry("data", data)?,
            DocumentBody::Errors(errors) => map.serialize_entry("errors", errors)?,
        }
        if !self.included.is_empty() {
            map.serialize_entry("included", &self.included)?;
        }
        if !self.links.is_empty() {
            map.serialize_entry("links", &self.links)?;
        }
        if !self.meta.is_empty() {
            map.serialize_entry("meta", &self.meta)?;
        }
        if let Some(jsonapi) = &self.jsonapi {
            map.serialize_entry("jsonapi", jsonapi)?;
        }
        map.end()
    }
}
