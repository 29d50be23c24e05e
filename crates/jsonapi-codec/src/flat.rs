//! Plain JSON representation of resources.
//!
//! A resource is one flat object: the id, every attribute, and each
//! relationship as the related id (or an array of ids). Pages use the
//! `{count, next, previous, results}` envelope.

use std::collections::HashSet;

use jsonapi_model::{
    Cardinality, Entity, ErrorList, ErrorObject, JsonPointer, Problem, Registry, RelationshipData,
    RelationshipObject, ResourceIdentifier, ResourceObject, ResourceSchema,
};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::decoder::{DecodeOutcome, Expectation, Operation, Shape};
use crate::encoder::{Encoder, EncoderOptions};
use crate::errors::CodecError;
use crate::pagination::{compute_links, PageResult, PaginationConfig};

/// Encodes entities as flat JSON objects.
#[derive(Debug, Clone)]
pub struct FlatEncoder<'r> {
    inner: Encoder<'r>,
}

impl<'r> FlatEncoder<'r> {
    /// Creates a flat encoder over a frozen registry.
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            inner: Encoder::new(registry, EncoderOptions::default()),
        }
    }

    /// One entity as a flat object.
    pub fn encode_one(&self, entity: &Entity) -> Result<Value, CodecError> {
        let resource = self.inner.resource_object(entity)?;
        Ok(flatten(&resource))
    }

    /// Entities as an array of flat objects.
    pub fn encode_many(&self, entities: &[Entity]) -> Result<Value, CodecError> {
        let items = entities
            .iter()
            .map(|entity| self.encode_one(entity))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Array(items))
    }

    /// One page with count and neighbour links.
    pub fn encode_page(
        &self,
        page: &PageResult<Entity>,
        page_url: &str,
        config: &PaginationConfig,
    ) -> Result<Value, CodecError> {
        let links = compute_links(page_url, &page.spec, page.total, config);
        Ok(json!({
            "count": page.total,
            "next": links.next,
            "previous": links.prev,
            "results": self.encode_many(&page.items)?,
        }))
    }

    /// Flat form of an already-built resource object.
    pub fn encode_resource(&self, resource: &ResourceObject) -> Value {
        flatten(resource)
    }

    /// Error list under an `errors` member.
    pub fn encode_errors(&self, errors: &ErrorList) -> Value {
        json!({ "errors": errors })
    }
}

fn flatten(resource: &ResourceObject) -> Value {
    let mut object = Map::new();
    if let Some(id) = resource.id() {
        object.insert("id".to_string(), Value::String(id.to_string()));
    }
    for (name, value) in resource.attributes() {
        object.insert(name.clone(), value.clone());
    }
    for (name, relationship) in resource.relationships() {
        let value = match &relationship.data {
            Some(RelationshipData::ToOne(Some(identifier))) => Value::String(identifier.id.clone()),
            Some(RelationshipData::ToOne(None)) => Value::Null,
            Some(RelationshipData::ToMany(identifiers)) => identifiers
                .iter()
                .map(|identifier| Value::String(identifier.id.clone()))
                .collect(),
            None => continue,
        };
        object.insert(name.clone(), value);
    }
    Value::Object(object)
}

/// Decodes flat JSON request bodies into resource objects.
#[derive(Debug, Clone)]
pub struct FlatDecoder<'r> {
    registry: &'r Registry,
}

impl<'r> FlatDecoder<'r> {
    /// Creates a flat decoder over a frozen registry.
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Decodes a flat body. The type comes from the expectation since the
    /// body does not carry one.
    pub fn decode(
        &self,
        body: &Value,
        expectation: &Expectation,
    ) -> Result<DecodeOutcome, CodecError> {
        let schema = self.registry.lookup(&expectation.type_name)?;
        let root = JsonPointer::root();
        let result = match (expectation.operation, expectation.shape) {
            (Operation::Reference, shape) => {
                flat_linkage(body, &root, shape, &expectation.type_name)
                    .map(DecodeOutcome::Identifiers)
                    .map_err(ErrorList::new)
            }
            (_, Shape::Single) => {
                decode_object(body, &root, schema, expectation).map(DecodeOutcome::Resource)
            }
            (_, Shape::Collection) => decode_array(body, &root, schema, expectation),
        };
        Ok(result.unwrap_or_else(|errors| {
            debug!(type_name = %schema.type_name, errors = errors.len(), "rejected flat request body");
            DecodeOutcome::Rejected(errors)
        }))
    }
}

fn decode_array(
    body: &Value,
    pointer: &JsonPointer,
    schema: &ResourceSchema,
    expectation: &Expectation,
) -> Result<DecodeOutcome, ErrorList> {
    let items = body.as_array().ok_or_else(|| {
        ErrorList::new(Problem::MalformedDocument.at_pointer(pointer, "expected an array of objects"))
    })?;
    let mut errors: Vec<ErrorObject> = Vec::new();
    let mut resources = Vec::with_capacity(items.len());
    let mut seen = HashSet::new();
    for (index, item) in items.iter().enumerate() {
        let at = pointer.push_index(index);
        match decode_object(item, &at, schema, expectation) {
            Ok(resource) => {
                if let Some(id) = resource.id() {
                    if !seen.insert(id.to_string()) {
                        errors.push(Problem::DuplicateResource.at_pointer(
                            &at,
                            format!("id '{}' appears more than once", id),
                        ));
                        continue;
                    }
                }
                resources.push(resource);
            }
            Err(batch) => errors.extend(batch.into_vec()),
        }
    }
    match ErrorList::from_vec(errors) {
        Ok(errors) => Err(errors),
        Err(_) => Ok(DecodeOutcome::Collection(resources)),
    }
}

fn decode_object(
    body: &Value,
    pointer: &JsonPointer,
    schema: &ResourceSchema,
    expectation: &Expectation,
) -> Result<ResourceObject, ErrorList> {
    let object = body.as_object().ok_or_else(|| {
        ErrorList::new(Problem::MalformedDocument.at_pointer(pointer, "expected a JSON object"))
    })?;

    let id_at = pointer.push_field(&schema.id_field);
    let id = match object.get(&schema.id_field) {
        None => None,
        Some(value) => Some(scalar_id(value).ok_or_else(|| {
            ErrorList::new(Problem::MalformedDocument.at_pointer(&id_at, "id must be a string or number"))
        })?),
    };
    match (expectation.operation, &id, &expectation.id) {
        (Operation::Update, None, _) => {
            return Err(ErrorList::new(Problem::MalformedDocument.at_pointer(
                &id_at,
                "id is required when updating a resource",
            )))
        }
        (Operation::Update, Some(id), Some(expected)) if id != expected => {
            return Err(ErrorList::new(Problem::IdConflict.at_pointer(
                &id_at,
                format!("id '{}' does not match the endpoint id '{}'", id, expected),
            )))
        }
        _ => {}
    }

    let mut errors = Vec::new();
    let mut resource = ResourceObject::new(schema.type_name.clone(), id);
    for (key, value) in object {
        if key == &schema.id_field {
            continue;
        }
        let at = pointer.push_field(key);
        if schema.is_reserved(key) {
            errors.push(Problem::ReservedMember.at_pointer(&at, format!("'{}' is reserved", key)));
        } else if schema.is_attribute(key) {
            resource = resource.with_attribute(key.clone(), value.clone());
        } else if let Some(declared) = schema.relationship(key) {
            let shape = match declared.cardinality {
                Cardinality::ToOne => Shape::Single,
                Cardinality::ToMany => Shape::Collection,
            };
            match flat_linkage(value, &at, shape, &declared.target_type) {
                Ok(data) => {
                    resource = resource.with_relationship(key.clone(), RelationshipObject::with_data(data))
                }
                Err(error) => errors.push(error),
            }
        } else {
            errors.push(Problem::UnknownAttribute.at_pointer(
                &at,
                format!("'{}' is not a field of '{}'", key, schema.type_name),
            ));
        }
    }
    match ErrorList::from_vec(errors) {
        Ok(errors) => Err(errors),
        Err(_) => Ok(resource),
    }
}

/// Linkage from bare ids: a scalar or null for to-one, an array for to-many.
fn flat_linkage(
    value: &Value,
    pointer: &JsonPointer,
    shape: Shape,
    target_type: &str,
) -> Result<RelationshipData, ErrorObject> {
    let identifier = |value: &Value, at: &JsonPointer| {
        scalar_id(value)
            .map(|id| ResourceIdentifier::new(target_type, id))
            .ok_or_else(|| Problem::MalformedDocument.at_pointer(at, "related id must be a string or number"))
    };
    match (shape, value) {
        (Shape::Single, Value::Array(_)) => Err(Problem::Cardinality.at_pointer(
            pointer,
            "to-one relationship expects a single id or null",
        )),
        (Shape::Single, Value::Null) => Ok(RelationshipData::ToOne(None)),
        (Shape::Single, value) => identifier(value, pointer).map(|id| RelationshipData::ToOne(Some(id))),
        (Shape::Collection, Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(index, item)| identifier(item, &pointer.push_index(index)))
            .collect::<Result<Vec<_>, _>>()
            .map(RelationshipData::ToMany),
        (Shape::Collection, _) => Err(Problem::Cardinality.at_pointer(
            pointer,
            "to-many relationship expects an array of ids",
        )),
    }
}

fn scalar_id(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
