//! Encode-side input: entities handed over by the persistence layer.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::identifiers::ResourceIdentifier;

/// A loaded instance of a resource type.
///
/// `fields` may contain more than the schema declares (internal columns);
/// the encoder only emits schema-declared members. The id is read from the
/// schema's identity field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Entity {
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    fields: Map<String, Value>,
    #[serde(default)]
    related: BTreeMap<String, Related>,
}

/// Value of a relationship on an entity.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Related {
    /// To-many: ordered related entities.
    Many(Vec<RelatedEntity>),
    /// To-one: the related entity, or `None` when empty.
    One(Option<RelatedEntity>),
}

/// A related resource, either only referenced or fully loaded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RelatedEntity {
    /// Loaded entity; eligible for `included`.
    Loaded(Box<Entity>),
    /// Bare reference.
    Identifier(ResourceIdentifier),
}

impl Entity {
    /// Creates an entity of the given type with no fields.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Map::new(),
            related: BTreeMap::new(),
        }
    }

    /// Returns a copy with a field set.
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Returns a copy with a to-one relation set.
    pub fn with_one(mut self, name: impl Into<String>, related: Option<RelatedEntity>) -> Self {
        self.related.insert(name.into(), Related::One(related));
        self
    }

    /// Returns a copy with a to-many relation set.
    pub fn with_many(mut self, name: impl Into<String>, related: Vec<RelatedEntity>) -> Self {
        self.related.insert(name.into(), Related::Many(related));
        self
    }

    /// Resource type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Raw fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Related values keyed by relationship name.
    pub fn related(&self) -> &BTreeMap<String, Related> {
        &self.related
    }

    /// Reads the id through an identity-field accessor. Strings are used
    /// verbatim and numbers are stringified; anything else means no id.
    pub fn id_via(&self, id_field: &str) -> Option<String> {
        match self.fields.get(id_field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl RelatedEntity {
    /// Identifier of the related resource given the identity field of its
    /// type; `None` for a loaded entity without an id.
    pub fn identifier(&self, id_field: &str) -> Option<ResourceIdentifier> {
        match self {
            RelatedEntity::Identifier(identifier) => Some(identifier.clone()),
            RelatedEntity::Loaded(entity) => entity
                .id_via(id_field)
                .map(|id| ResourceIdentifier::new(entity.type_name.clone(), id)),
        }
    }

    /// Type name of the related resource.
    pub fn type_name(&self) -> &str {
        match self {
            RelatedEntity::Identifier(identifier) => &identifier.type_name,
            RelatedEntity::Loaded(entity) => &entity.type_name,
        }
    }
}

impl From<Entity> for RelatedEntity {
    fn from(entity: Entity) -> Self {
        RelatedEntity::Loaded(Box::new(entity))
    }
}

impl From<ResourceIdentifier> for RelatedEntity {
    fn from(identifier: ResourceIdentifier) -> Self {
        RelatedEntity::Identifier(identifier)
    }
}
