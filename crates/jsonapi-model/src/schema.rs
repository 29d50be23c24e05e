//! Field schema of a resource type.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::errors::RegistryError;
use crate::identifiers::{MemberName, TypeName};

/// Identity field used when a schema does not name one.
pub const DEFAULT_ID_FIELD: &str = "id";

/// Member names JSON:API reserves on every resource object.
pub const RESERVED_MEMBERS: [&str; 2] = ["type", "id"];

/// Relationship cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cardinality {
    /// Single identifier or `null`.
    ToOne,
    /// Sequence of identifiers.
    ToMany,
}

/// Declared relationship of a resource type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipSchema {
    /// Whether linkage is one identifier or many.
    pub cardinality: Cardinality,
    /// Resource type of the related resources.
    pub target_type: String,
}

/// Field schema for one resource type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSchema {
    /// Resource type name.
    pub type_name: String,
    /// Field holding the resource identity.
    pub id_field: String,
    /// Declared attribute names.
    pub attributes: BTreeSet<String>,
    /// Declared relationships by name.
    pub relationships: BTreeMap<String, RelationshipSchema>,
    /// Serializer the type is encoded with by default.
    pub serializer: Option<String>,
    /// Formats the type may be served through, in preference order.
    /// Empty means every registered format.
    pub formats: Vec<String>,
}

impl ResourceSchema {
    /// Creates an empty schema for a type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            id_field: DEFAULT_ID_FIELD.to_string(),
            attributes: BTreeSet::new(),
            relationships: BTreeMap::new(),
            serializer: None,
            formats: Vec::new(),
        }
    }

    /// Sets the identity field.
    pub fn id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = field.into();
        self
    }

    /// Declares an attribute.
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.insert(name.into());
        self
    }

    /// Declares a to-one relationship.
    pub fn to_one(mut self, name: impl Into<String>, target_type: impl Into<String>) -> Self {
        self.relationships.insert(
            name.into(),
            RelationshipSchema {
                cardinality: Cardinality::ToOne,
                target_type: target_type.into(),
            },
        );
        self
    }

    /// Declares a to-many relationship.
    pub fn to_many(mut self, name: impl Into<String>, target_type: impl Into<String>) -> Self {
        self.relationships.insert(
            name.into(),
            RelationshipSchema {
                cardinality: Cardinality::ToMany,
                target_type: target_type.into(),
            },
        );
        self
    }

    /// Sets the default serializer.
    pub fn serializer(mut self, serializer: impl Into<String>) -> Self {
        self.serializer = Some(serializer.into());
        self
    }

    /// Adds a format the type may be served through.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.formats.push(format.into());
        self
    }

    /// True if `name` is a declared attribute.
    pub fn is_attribute(&self, name: &str) -> bool {
        self.attributes.contains(name)
    }

    /// Declared relationship named `name`.
    pub fn relationship(&self, name: &str) -> Option<&RelationshipSchema> {
        self.relationships.get(name)
    }

    /// True for `type`, `id` and the identity field.
    pub fn is_reserved(&self, name: &str) -> bool {
        RESERVED_MEMBERS.contains(&name) || name == self.id_field
    }

    /// True if the type may be served through `format`.
    pub fn supports_format(&self, format: &str) -> bool {
        self.formats.is_empty() || self.formats.iter().any(|f| f == format)
    }

    /// Checks names and the attribute/relationship partition.
    pub fn validate(&self) -> Result<(), RegistryError> {
        TypeName::parse(self.type_name.as_str())
            .map_err(|e| RegistryError::schema(&self.type_name, e.to_string()))?;

        let names = self.attributes.iter().chain(self.relationships.keys());
        for name in names {
            MemberName::parse(name.as_str())
                .map_err(|e| RegistryError::schema(&self.type_name, e.to_string()))?;
            if self.is_reserved(name) {
                return Err(RegistryError::schema(
                    &self.type_name,
                    format!("'{}' is reserved and cannot be declared as a field", name),
                ));
            }
        }

        if let Some(name) = self
            .attributes
            .iter()
            .find(|name| self.relationships.contains_key(*name))
        {
            return Err(RegistryError::schema(
                &self.type_name,
                format!("'{}' is declared as both attribute and relationship", name),
            ));
        }

        for (name, relationship) in &self.relationships {
            TypeName::parse(relationship.target_type.as_str()).map_err(|e| {
                RegistryError::schema(&self.type_name, format!("relationship '{}': {}", name, e))
            })?;
        }

        Ok(())
    }
}
