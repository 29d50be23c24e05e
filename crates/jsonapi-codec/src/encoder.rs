//! Resource entities to JSON:API documents.

use std::collections::{HashSet, VecDeque};

use jsonapi_model::{
    Cardinality, Document, Entity, ErrorList, FieldInflection, JsonApiInfo, Link, PrimaryData,
    Registry, Related, RelatedEntity, RelationshipData, RelationshipObject, RelationshipSchema,
    ResourceIdentifier, ResourceObject, ResourceSchema,
};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::errors::CodecError;
use crate::pagination::{compute_links, PageResult, PaginationConfig};

/// Encoder settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderOptions {
    /// Base URL for `self`/`related` links; links are omitted without it.
    pub base_url: Option<String>,
    /// Encode loaded related entities into `included`.
    pub include_related: bool,
    /// Field name rewriting on the wire.
    pub inflection: FieldInflection,
    /// Emit the top-level `jsonapi` object.
    pub emit_version: bool,
}

/// Turns entities and resource objects into documents.
///
/// Encoding is a pure transformation; the encoder only reads the registry.
#[derive(Debug, Clone)]
pub struct Encoder<'r> {
    registry: &'r Registry,
    options: EncoderOptions,
}

impl<'r> Encoder<'r> {
    /// Creates an encoder over a frozen registry.
    pub fn new(registry: &'r Registry, options: EncoderOptions) -> Self {
        Self { registry, options }
    }

    /// Encoder settings.
    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    /// Document whose primary data is one entity.
    pub fn encode_one(&self, entity: &Entity) -> Result<Document, CodecError> {
        let resource = self.resource_object(entity)?;
        let document = Document::data(PrimaryData::Resource(Box::new(resource)));
        self.finish(document, &[entity])
    }

    /// Document whose primary data is a collection of entities.
    pub fn encode_many(&self, entities: &[Entity]) -> Result<Document, CodecError> {
        let resources = entities
            .iter()
            .map(|entity| self.resource_object(entity))
            .collect::<Result<Vec<_>, _>>()?;
        let primaries: Vec<&Entity> = entities.iter().collect();
        self.finish(Document::data(PrimaryData::Collection(resources)), &primaries)
    }

    /// Document for one page of a collection, with navigation links built
    /// from `page_url` and `meta.total`.
    pub fn encode_page(
        &self,
        page: &PageResult<Entity>,
        page_url: &str,
        config: &PaginationConfig,
    ) -> Result<Document, CodecError> {
        let document = self.encode_many(&page.items)?;
        let links = compute_links(page_url, &page.spec, page.total, config);
        Ok(links.apply(document))
    }

    /// Document for an already-built resource object, projected onto its
    /// schema.
    pub fn encode_resource(&self, resource: &ResourceObject) -> Result<Document, CodecError> {
        let resource = self.project(resource)?;
        Ok(self.stamp(Document::data(PrimaryData::Resource(Box::new(resource)))))
    }

    /// Collection variant of [`Encoder::encode_resource`].
    pub fn encode_resources(&self, resources: &[ResourceObject]) -> Result<Document, CodecError> {
        let resources = resources
            .iter()
            .map(|resource| self.project(resource))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.stamp(Document::data(PrimaryData::Collection(resources))))
    }

    /// Document of bare identifiers, as served by relationship endpoints.
    pub fn encode_identifiers(&self, data: &RelationshipData) -> Document {
        let primary = match data {
            RelationshipData::ToOne(Some(identifier)) => PrimaryData::Identifier(identifier.clone()),
            RelationshipData::ToOne(None) => PrimaryData::Null,
            RelationshipData::ToMany(identifiers) => PrimaryData::Identifiers(identifiers.clone()),
        };
        self.stamp(Document::data(primary))
    }

    /// Error document.
    pub fn encode_errors(&self, errors: &ErrorList) -> Document {
        self.stamp(Document::errors(errors.clone()))
    }

    /// Builds the resource object for one entity.
    pub fn resource_object(&self, entity: &Entity) -> Result<ResourceObject, CodecError> {
        let schema = self.registry.lookup(entity.type_name())?;
        let id = entity.id_via(&schema.id_field);
        let mut resource = ResourceObject::new(schema.type_name.clone(), id.clone());

        for (name, value) in entity.fields() {
            if schema.is_attribute(name) {
                resource = resource.with_attribute(self.wire(name), value.clone());
            } else if name != &schema.id_field && schema.relationship(name).is_none() {
                trace!(type_name = %schema.type_name, field = %name, "omitting undeclared field");
            }
        }

        for (name, relationship) in &schema.relationships {
            let data = match entity.related().get(name) {
                Some(related) => self.linkage(schema, name, relationship, related)?,
                None => match foreign_key(entity, name, relationship) {
                    Some(data) => data,
                    None => continue,
                },
            };
            let mut object = RelationshipObject::with_data(data);
            let wire = self.wire(name);
            self.relationship_links(&mut object, &schema.type_name, id.as_deref(), &wire);
            resource = resource.with_relationship(wire, object);
        }

        for name in entity.related().keys() {
            if schema.relationship(name).is_none() {
                trace!(type_name = %schema.type_name, relationship = %name, "omitting undeclared relationship");
            }
        }

        if let Some(url) = self.resource_url(&schema.type_name, id.as_deref()) {
            resource = resource.with_link("self", Link::Url(url));
        }
        Ok(resource)
    }

    fn project(&self, resource: &ResourceObject) -> Result<ResourceObject, CodecError> {
        let schema = self.registry.lookup(resource.type_name())?;
        let mut projected = ResourceObject::new(schema.type_name.clone(), resource.id().map(str::to_string))
            .with_meta(resource.meta().clone());

        for (name, value) in resource.attributes() {
            if schema.is_attribute(name) {
                projected = projected.with_attribute(self.wire(name), value.clone());
            } else {
                trace!(type_name = %schema.type_name, field = %name, "omitting undeclared attribute");
            }
        }
        for (name, relationship) in resource.relationships() {
            let Some(declared) = schema.relationship(name) else {
                trace!(type_name = %schema.type_name, relationship = %name, "omitting undeclared relationship");
                continue;
            };
            if let Some(data) = &relationship.data {
                check_shape(schema, name, declared, data)?;
            }
            let mut object = relationship.clone();
            let wire = self.wire(name);
            self.relationship_links(&mut object, &schema.type_name, resource.id(), &wire);
            projected = projected.with_relationship(wire, object);
        }
        for (name, link) in resource.links() {
            projected = projected.with_link(name.clone(), link.clone());
        }
        if let Some(url) = self.resource_url(&schema.type_name, resource.id()) {
            projected = projected.with_link("self", Link::Url(url));
        }
        Ok(projected)
    }

    fn linkage(
        &self,
        schema: &ResourceSchema,
        name: &str,
        relationship: &RelationshipSchema,
        related: &Related,
    ) -> Result<RelationshipData, CodecError> {
        match (relationship.cardinality, related) {
            (Cardinality::ToOne, Related::One(None)) => Ok(RelationshipData::ToOne(None)),
            (Cardinality::ToOne, Related::One(Some(entity))) => {
                let identifier = self.related_identifier(schema, name, relationship, entity)?;
                Ok(RelationshipData::ToOne(Some(identifier)))
            }
            (Cardinality::ToMany, Related::Many(entities)) => entities
                .iter()
                .map(|entity| self.related_identifier(schema, name, relationship, entity))
                .collect::<Result<Vec<_>, _>>()
                .map(RelationshipData::ToMany),
            (expected, _) => Err(CodecError::Cardinality {
                type_name: schema.type_name.clone(),
                relationship: name.to_string(),
                expected,
            }),
        }
    }

    fn related_identifier(
        &self,
        schema: &ResourceSchema,
        name: &str,
        relationship: &RelationshipSchema,
        related: &RelatedEntity,
    ) -> Result<ResourceIdentifier, CodecError> {
        if related.type_name() != relationship.target_type {
            return Err(CodecError::TargetType {
                type_name: schema.type_name.clone(),
                relationship: name.to_string(),
                expected: relationship.target_type.clone(),
                actual: related.type_name().to_string(),
            });
        }
        let target = self.registry.lookup(&relationship.target_type)?;
        related
            .identifier(&target.id_field)
            .ok_or_else(|| CodecError::MissingRelatedId {
                type_name: schema.type_name.clone(),
                relationship: name.to_string(),
            })
    }

    /// Adds `included` and the implementation object.
    fn finish(&self, document: Document, primaries: &[&Entity]) -> Result<Document, CodecError> {
        let document = if self.options.include_related {
            let included = self.included(&document, primaries)?;
            document.with_included(included)
        } else {
            document
        };
        Ok(self.stamp(document))
    }

    /// Breadth-first walk over loaded related entities, each encoded once.
    fn included(
        &self,
        document: &Document,
        primaries: &[&Entity],
    ) -> Result<Vec<ResourceObject>, CodecError> {
        let mut seen: HashSet<ResourceIdentifier> = document
            .primary()
            .map(PrimaryData::identifiers)
            .unwrap_or_default()
            .into_iter()
            .collect();
        let mut queue: VecDeque<&Entity> = VecDeque::new();
        for entity in primaries {
            self.enqueue_loaded(entity, &mut queue)?;
        }

        let mut included = Vec::new();
        while let Some(entity) = queue.pop_front() {
            let schema = self.registry.lookup(entity.type_name())?;
            let Some(id) = entity.id_via(&schema.id_field) else {
                trace!(type_name = %schema.type_name, "skipping related entity without id");
                continue;
            };
            if !seen.insert(ResourceIdentifier::new(schema.type_name.clone(), id)) {
                continue;
            }
            included.push(self.resource_object(entity)?);
            self.enqueue_loaded(entity, &mut queue)?;
        }
        Ok(included)
    }

    fn enqueue_loaded<'e>(
        &self,
        entity: &'e Entity,
        queue: &mut VecDeque<&'e Entity>,
    ) -> Result<(), CodecError> {
        let schema = self.registry.lookup(entity.type_name())?;
        for name in schema.relationships.keys() {
            let loaded: Vec<&RelatedEntity> = match entity.related().get(name) {
                Some(Related::One(Some(related))) => vec![related],
                Some(Related::Many(related)) => related.iter().collect(),
                _ => continue,
            };
            for related in loaded {
                if let RelatedEntity::Loaded(entity) = related {
                    queue.push_back(entity);
                }
            }
        }
        Ok(())
    }

    fn stamp(&self, document: Document) -> Document {
        if self.options.emit_version {
            document.with_jsonapi(JsonApiInfo::default())
        } else {
            document
        }
    }

    fn wire(&self, name: &str) -> String {
        self.options.inflection.to_wire(name).into_owned()
    }

    /// Fills in `self` and `related`; links the caller already set are kept.
    fn relationship_links(
        &self,
        object: &mut RelationshipObject,
        type_name: &str,
        id: Option<&str>,
        wire: &str,
    ) {
        let Some(base) = self.resource_url(type_name, id) else {
            return;
        };
        object
            .links
            .entry("self".to_string())
            .or_insert_with(|| Link::Url(format!("{}/relationships/{}", base, wire)));
        object
            .links
            .entry("related".to_string())
            .or_insert_with(|| Link::Url(format!("{}/{}", base, wire)));
    }

    fn resource_url(&self, type_name: &str, id: Option<&str>) -> Option<String> {
        let base = self.options.base_url.as_deref()?;
        let id = id?;
        Some(format!("{}/{}/{}", base.trim_end_matches('/'), type_name, id))
    }
}

/// Linkage taken from a foreign-key style field (`"author": "9"`).
fn foreign_key(
    entity: &Entity,
    name: &str,
    relationship: &RelationshipSchema,
) -> Option<RelationshipData> {
    let value = entity.fields().get(name)?;
    let identifier = |value: &serde_json::Value| match value {
        serde_json::Value::String(id) => {
            Some(ResourceIdentifier::new(relationship.target_type.clone(), id.clone()))
        }
        serde_json::Value::Number(id) => {
            Some(ResourceIdentifier::new(relationship.target_type.clone(), id.to_string()))
        }
        _ => None,
    };
    match (relationship.cardinality, value) {
        (Cardinality::ToOne, serde_json::Value::Null) => Some(RelationshipData::ToOne(None)),
        (Cardinality::ToOne, value) => identifier(value).map(|id| RelationshipData::ToOne(Some(id))),
        (Cardinality::ToMany, serde_json::Value::Array(values)) => values
            .iter()
            .map(identifier)
            .collect::<Option<Vec<_>>>()
            .map(RelationshipData::ToMany),
        (Cardinality::ToMany, _) => None,
    }
}

fn check_shape(
    schema: &ResourceSchema,
    name: &str,
    declared: &RelationshipSchema,
    data: &RelationshipData,
) -> Result<(), CodecError> {
    let matches = matches!(
        (declared.cardinality, data),
        (Cardinality::ToOne, RelationshipData::ToOne(_))
            | (Cardinality::ToMany, RelationshipData::ToMany(_))
    );
    if !matches {
        return Err(CodecError::Cardinality {
            type_name: schema.type_name.clone(),
            relationship: name.to_string(),
            expected: declared.cardinality,
        });
    }
    if let Some(identifier) = data
        .identifiers()
        .find(|identifier| identifier.type_name != declared.target_type)
    {
        return Err(CodecError::TargetType {
            type_name: schema.type_name.clone(),
            relationship: name.to_string(),
            expected: declared.target_type.clone(),
            actual: identifier.type_name.clone(),
        });
    }
    Ok(())
}
