//! In-memory resource object model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::identifiers::ResourceIdentifier;

/// Links object member: a bare URL or a link object with `meta`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Link {
    /// Plain URL string.
    Url(String),
    /// Link object.
    Object {
        /// Target URL.
        href: String,
        /// Non-standard meta information.
        #[serde(default, skip_serializing_if = "Map::is_empty")]
        meta: Map<String, Value>,
    },
}

impl Link {
    /// Returns the target URL regardless of representation.
    pub fn href(&self) -> &str {
        match self {
            Link::Url(href) => href,
            Link::Object { href, .. } => href,
        }
    }
}

impl From<String> for Link {
    fn from(href: String) -> Self {
        Link::Url(href)
    }
}

/// Named links keyed by relation (`self`, `related`, `first`, ...).
pub type Links = BTreeMap<String, Link>;

/// Resource linkage carried in a relationship's `data` member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RelationshipData {
    /// To-one linkage; `None` is serialized as `null` (empty relationship).
    ToOne(Option<ResourceIdentifier>),
    /// To-many linkage, order preserved.
    ToMany(Vec<ResourceIdentifier>),
}

impl RelationshipData {
    /// Iterates over the linked identifiers.
    pub fn identifiers(&self) -> impl Iterator<Item = &ResourceIdentifier> {
        let slice: &[ResourceIdentifier] = match self {
            RelationshipData::ToOne(Some(identifier)) => std::slice::from_ref(identifier),
            RelationshipData::ToOne(None) => &[],
            RelationshipData::ToMany(identifiers) => identifiers,
        };
        slice.iter()
    }
}

/// A relationship object: linkage plus links and meta.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelationshipObject {
    /// Resource linkage; absent when only links/meta are present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<RelationshipData>,
    /// Relationship links (`self`, `related`).
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub links: Links,
    /// Non-standard meta information.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
}

impl RelationshipObject {
    /// Relationship carrying only linkage.
    pub fn with_data(data: RelationshipData) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }
}

/// A single addressable entity with its attributes and relationships.
///
/// Instances are immutable: every `with_*` method consumes the object and
/// returns a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceObject {
    #[serde(rename = "type")]
    type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    attributes: Map<String, Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    relationships: BTreeMap<String, RelationshipObject>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    links: Links,
    #[serde(skip_serializing_if = "Map::is_empty")]
    meta: Map<String, Value>,
}

impl ResourceObject {
    /// Creates a resource of the given type. `id` is `None` only for
    /// not-yet-persisted resources in create payloads.
    pub fn new(type_name: impl Into<String>, id: Option<String>) -> Self {
        Self {
            type_name: type_name.into(),
            id,
            attributes: Map::new(),
            relationships: BTreeMap::new(),
            links: BTreeMap::new(),
            meta: Map::new(),
        }
    }

    /// Resource type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Resource id, if assigned.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The `{type, id}` identifier, or `None` for an unsaved resource.
    pub fn identifier(&self) -> Option<ResourceIdentifier> {
        self.id
            .as_ref()
            .map(|id| ResourceIdentifier::new(self.type_name.clone(), id.clone()))
    }

    /// Attribute values keyed by member name.
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Relationship objects keyed by member name.
    pub fn relationships(&self) -> &BTreeMap<String, RelationshipObject> {
        &self.relationships
    }

    /// Resource-level links.
    pub fn links(&self) -> &Links {
        &self.links
    }

    /// Resource-level meta.
    pub fn meta(&self) -> &Map<String, Value> {
        &self.meta
    }

    /// Returns a copy with the given id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Returns a copy with an attribute set. Any relationship of the same
    /// name is dropped so the two maps never share a key.
    pub fn with_attribute(mut self, name: impl Into<String>, value: Value) -> Self {
        let name = name.into();
        self.relationships.remove(&name);
        self.attributes.insert(name, value);
        self
    }

    /// Returns a copy with a relationship set. Any attribute of the same
    /// name is dropped so the two maps never share a key.
    pub fn with_relationship(
        mut self,
        name: impl Into<String>,
        relationship: RelationshipObject,
    ) -> Self {
        let name = name.into();
        self.attributes.remove(&name);
        self.relationships.insert(name, relationship);
        self
    }

    /// Returns a copy with a link set.
    pub fn with_link(mut self, name: impl Into<String>, link: Link) -> Self {
        self.links.insert(name.into(), link);
        self
    }

    /// Returns a copy with resource meta replaced.
    pub fn with_meta(mut self, meta: Map<String, Value>) -> Self {
        self.meta = meta;
        self
    }
}
