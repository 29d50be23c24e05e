//! TOML description of the resource registry.
//!
//! ```toml
//! [[resources]]
//! type = "articles"
//! attributes = ["title"]
//! serializer = "ArticleSerializer"
//!
//! [resources.relationships]
//! author = { cardinality = "to-one", type = "people" }
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::errors::RegistryError;
use crate::registry::{Registry, RegistryBuilder};
use crate::schema::{Cardinality, ResourceSchema, DEFAULT_ID_FIELD};

/// Registry section of a configuration file.
#[derive(Clone, Default, Debug, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Resource types, registered in file order.
    pub resources: Vec<ResourceConfig>,
}

/// One resource type.
#[derive(Clone, Debug, Deserialize)]
pub struct ResourceConfig {
    /// Resource type name.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Identity field.
    #[serde(default = "default_id_field")]
    pub id_field: String,
    /// Attribute names.
    #[serde(default)]
    pub attributes: Vec<String>,
    /// Relationships by name.
    #[serde(default)]
    pub relationships: BTreeMap<String, RelationshipConfig>,
    /// Default serializer.
    #[serde(default)]
    pub serializer: Option<String>,
    /// Formats the type may be served through.
    #[serde(default)]
    pub formats: Vec<String>,
}

/// One relationship of a resource type.
#[derive(Clone, Debug, Deserialize)]
pub struct RelationshipConfig {
    /// To-one or to-many.
    pub cardinality: Cardinality,
    /// Related resource type.
    #[serde(rename = "type")]
    pub target_type: String,
}

fn default_id_field() -> String {
    DEFAULT_ID_FIELD.to_string()
}

impl RegistryConfig {
    /// Parses a TOML document containing `[[resources]]` tables.
    pub fn from_toml_str(source: &str) -> Result<Self, RegistryError> {
        Ok(toml::from_str(source)?)
    }

    /// Registers every resource and freezes the registry.
    pub fn build(&self) -> Result<Registry, RegistryError> {
        let mut builder = RegistryBuilder::new();
        for resource in &self.resources {
            builder.register(resource.to_schema())?;
        }
        builder.freeze()
    }
}

impl ResourceConfig {
    /// Converts the configuration entry into a schema.
    pub fn to_schema(&self) -> ResourceSchema {
        let mut schema = ResourceSchema::new(self.type_name.clone()).id_field(self.id_field.clone());
        for attribute in &self.attributes {
            schema = schema.attribute(attribute.clone());
        }
        for (name, relationship) in &self.relationships {
            schema = match relationship.cardinality {
                Cardinality::ToOne => schema.to_one(name.clone(), relationship.target_type.clone()),
                Cardinality::ToMany => schema.to_many(name.clone(), relationship.target_type.clone()),
            };
        }
        if let Some(serializer) = &self.serializer {
            schema = schema.serializer(serializer.clone());
        }
        for format in &self.formats {
            schema = schema.format(format.clone());
        }
        schema
    }
}
