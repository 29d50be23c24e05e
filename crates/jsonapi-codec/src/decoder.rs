//! Request documents to validated resource objects.
//!
//! Decoding runs in two phases. The structural phase checks the envelope and
//! the identity of each resource and stops at the first violation. The
//! semantic phase checks attributes and relationships against the schema
//! and reports every violation in the document at once.

use std::collections::HashSet;

use jsonapi_model::{
    Cardinality, Document, ErrorList, ErrorObject, FieldInflection, JsonApiInfo, JsonPointer,
    Links, PrimaryData, Problem, Registry, RelationshipData, RelationshipObject,
    RelationshipSchema, ResourceIdentifier, ResourceObject, ResourceSchema, JSONAPI_VERSION,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::CodecError;

const TOP_LEVEL_MEMBERS: [&str; 6] = ["data", "errors", "included", "links", "meta", "jsonapi"];
const RESOURCE_MEMBERS: [&str; 6] = ["type", "id", "attributes", "relationships", "links", "meta"];
const RELATIONSHIP_MEMBERS: [&str; 3] = ["data", "links", "meta"];

/// What the endpoint is doing with the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// New resource; `id` optional.
    Create,
    /// Existing resource; `id` required and checked against the endpoint.
    Update,
    /// Relationship endpoint; the body is bare identifiers.
    Reference,
}

/// Expected shape of primary data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// One resource (or identifier/null for references).
    Single,
    /// Array of resources or identifiers.
    Collection,
}

/// Endpoint expectations a request body is checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectation {
    /// Resource type the endpoint serves (target type for references).
    pub type_name: String,
    /// Single or collection.
    pub shape: Shape,
    /// Kind of write.
    pub operation: Operation,
    /// Resource id addressed by the endpoint, for updates.
    pub id: Option<String>,
}

impl Expectation {
    /// Single-resource create.
    pub fn create(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            shape: Shape::Single,
            operation: Operation::Create,
            id: None,
        }
    }

    /// Bulk create.
    pub fn create_many(type_name: impl Into<String>) -> Self {
        Self {
            shape: Shape::Collection,
            ..Self::create(type_name)
        }
    }

    /// Update of the resource addressed by `id`.
    pub fn update(type_name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            shape: Shape::Single,
            operation: Operation::Update,
            id: Some(id.into()),
        }
    }

    /// Relationship replacement with identifiers of `target_type`.
    pub fn reference(target_type: impl Into<String>, shape: Shape) -> Self {
        Self {
            type_name: target_type.into(),
            shape,
            operation: Operation::Reference,
            id: None,
        }
    }
}

/// Result of decoding a request document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// One validated resource.
    Resource(ResourceObject),
    /// Validated resources, in document order.
    Collection(Vec<ResourceObject>),
    /// Linkage from a relationship request.
    Identifiers(RelationshipData),
    /// Client error; nothing was built.
    Rejected(ErrorList),
}

impl DecodeOutcome {
    /// Errors of a rejected document.
    pub fn rejection(&self) -> Option<&ErrorList> {
        match self {
            DecodeOutcome::Rejected(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Decoder settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderOptions {
    /// Field name rewriting on the wire.
    pub inflection: FieldInflection,
}

/// Validates request documents against the registry.
#[derive(Debug, Clone)]
pub struct Decoder<'r> {
    registry: &'r Registry,
    options: DecoderOptions,
}

impl<'r> Decoder<'r> {
    /// Creates a decoder over a frozen registry.
    pub fn new(registry: &'r Registry, options: DecoderOptions) -> Self {
        Self { registry, options }
    }

    /// Decodes a request body.
    ///
    /// Client mistakes come back as [`DecodeOutcome::Rejected`]; `Err` is
    /// reserved for an expectation naming an unregistered type.
    pub fn decode(
        &self,
        document: &Value,
        expectation: &Expectation,
    ) -> Result<DecodeOutcome, CodecError> {
        let schema = self.registry.lookup(&expectation.type_name)?;
        let outcome = match self.decode_checked(document, expectation, schema) {
            Ok(outcome) => outcome,
            Err(errors) => {
                debug!(
                    type_name = %schema.type_name,
                    errors = errors.len(),
                    status = errors.status(),
                    "rejected request document"
                );
                DecodeOutcome::Rejected(errors)
            }
        };
        Ok(outcome)
    }

    fn decode_checked(
        &self,
        document: &Value,
        expectation: &Expectation,
        schema: &ResourceSchema,
    ) -> Result<DecodeOutcome, ErrorList> {
        let data = check_envelope(document).map_err(ErrorList::new)?;
        let at = JsonPointer::root().push_field("data");

        if expectation.operation == Operation::Reference {
            return decode_identifiers(data, &at, expectation)
                .map(DecodeOutcome::Identifiers)
                .map_err(ErrorList::new);
        }

        match expectation.shape {
            Shape::Single => {
                if !data.is_object() {
                    return Err(ErrorList::new(malformed(&at, "expected a single resource object")));
                }
                let id = check_resource(data, &at, expectation).map_err(ErrorList::new)?;
                self.build_resource(data, &at, schema, id)
                    .map(DecodeOutcome::Resource)
            }
            Shape::Collection => {
                let Some(items) = data.as_array() else {
                    return Err(ErrorList::new(malformed(
                        &at,
                        "expected an array of resource objects",
                    )));
                };

                let mut checked = Vec::with_capacity(items.len());
                let mut seen = HashSet::new();
                for (index, item) in items.iter().enumerate() {
                    let pointer = at.push_index(index);
                    let id = check_resource(item, &pointer, expectation).map_err(ErrorList::new)?;
                    if let Some(id) = &id {
                        if !seen.insert(id.clone()) {
                            return Err(ErrorList::new(Problem::DuplicateResource.at_pointer(
                                &pointer,
                                format!("resource '{}/{}' appears more than once", schema.type_name, id),
                            )));
                        }
                    }
                    checked.push((pointer, id));
                }

                let mut errors = Vec::new();
                let mut resources = Vec::with_capacity(items.len());
                for ((pointer, id), item) in checked.into_iter().zip(items) {
                    match self.build_resource(item, &pointer, schema, id) {
                        Ok(resource) => resources.push(resource),
                        Err(batch) => errors.extend(batch.into_vec()),
                    }
                }
                match ErrorList::from_vec(errors) {
                    Ok(errors) => Err(errors),
                    Err(_) => Ok(DecodeOutcome::Collection(resources)),
                }
            }
        }
    }

    /// Semantic phase for one resource object.
    fn build_resource(
        &self,
        value: &Value,
        pointer: &JsonPointer,
        schema: &ResourceSchema,
        id: Option<String>,
    ) -> Result<ResourceObject, ErrorList> {
        let mut errors = Vec::new();
        let mut resource = ResourceObject::new(schema.type_name.clone(), id);
        let inflection = self.options.inflection;

        let attributes = value.get("attributes");
        let relationships = value.get("relationships");
        let attribute_keys = attributes.and_then(Value::as_object);
        let relationship_keys = relationships.and_then(Value::as_object);

        if let Some(attributes) = attributes {
            let at = pointer.push_field("attributes");
            match attributes.as_object() {
                None => errors.push(malformed(&at, "`attributes` must be an object")),
                Some(attributes) => {
                    for (key, value) in attributes {
                        let member = at.push_field(key);
                        let name = inflection.from_wire(key);
                        if schema.is_reserved(&name) {
                            errors.push(Problem::ReservedMember.at_pointer(
                                &member,
                                format!("'{}' is reserved and cannot be an attribute", key),
                            ));
                        } else if relationship_keys.is_some_and(|keys| keys.contains_key(key)) {
                            errors.push(Problem::MemberConflict.at_pointer(
                                &member,
                                format!("'{}' appears in both attributes and relationships", key),
                            ));
                        } else if !schema.is_attribute(&name) {
                            errors.push(Problem::UnknownAttribute.at_pointer(
                                &member,
                                format!("'{}' is not an attribute of '{}'", key, schema.type_name),
                            ));
                        } else {
                            resource = resource.with_attribute(name.into_owned(), value.clone());
                        }
                    }
                }
            }
        }

        if let Some(relationships) = relationships {
            let at = pointer.push_field("relationships");
            match relationships.as_object() {
                None => errors.push(malformed(&at, "`relationships` must be an object")),
                Some(relationships) => {
                    for (key, value) in relationships {
                        // already reported on the attribute side
                        if attribute_keys.is_some_and(|keys| keys.contains_key(key)) {
                            continue;
                        }
                        let member = at.push_field(key);
                        let name = inflection.from_wire(key);
                        if schema.is_reserved(&name) {
                            errors.push(Problem::ReservedMember.at_pointer(
                                &member,
                                format!("'{}' is reserved and cannot be a relationship", key),
                            ));
                            continue;
                        }
                        let Some(declared) = schema.relationship(&name) else {
                            errors.push(Problem::UnknownRelationship.at_pointer(
                                &member,
                                format!("'{}' is not a relationship of '{}'", key, schema.type_name),
                            ));
                            continue;
                        };
                        match relationship_object(value, &member, declared) {
                            Ok(object) => {
                                resource = resource.with_relationship(name.into_owned(), object)
                            }
                            Err(error) => errors.push(error),
                        }
                    }
                }
            }
        }

        if let Some(links) = value.get("links") {
            match parse_links(links, &pointer.push_field("links")) {
                Ok(links) => {
                    for (name, link) in links {
                        resource = resource.with_link(name, link);
                    }
                }
                Err(error) => errors.push(error),
            }
        }
        if let Some(meta) = value.get("meta") {
            match parse_meta(meta, &pointer.push_field("meta")) {
                Ok(meta) => resource = resource.with_meta(meta),
                Err(error) => errors.push(error),
            }
        }

        match ErrorList::from_vec(errors) {
            Ok(errors) => Err(errors),
            Err(_) => Ok(resource),
        }
    }
}

/// Parses any JSON:API document, error documents included, checking the
/// grammar only. Intended for clients reading server responses.
pub fn decode_document(value: &Value) -> Result<Document, ErrorList> {
    parse_document(value).map_err(ErrorList::new)
}

fn parse_document(value: &Value) -> Result<Document, ErrorObject> {
    let root = JsonPointer::root();
    let object = value
        .as_object()
        .ok_or_else(|| malformed(&root, "document must be a JSON object"))?;
    check_members(object, &root, &TOP_LEVEL_MEMBERS, "top-level")?;

    let mut document = match (object.get("data"), object.get("errors")) {
        (Some(_), Some(_)) => return Err(malformed(&root, "`data` and `errors` must not coexist")),
        (None, None) => return Err(malformed(&root, "document must contain `data` or `errors`")),
        (Some(data), None) => Document::data(parse_primary(data, &root.push_field("data"))?),
        (None, Some(errors)) => Document::errors(parse_errors(errors, &root.push_field("errors"))?),
    };

    if let Some(included) = object.get("included") {
        let at = root.push_field("included");
        let Some(primary) = document.primary() else {
            return Err(malformed(&at, "`included` requires `data`"));
        };
        let items = included
            .as_array()
            .ok_or_else(|| malformed(&at, "`included` must be an array"))?;
        let mut seen: HashSet<ResourceIdentifier> = primary.identifiers().into_iter().collect();
        let mut resources = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let pointer = at.push_index(index);
            let resource = parse_resource(item, &pointer)?;
            let identifier = resource
                .identifier()
                .ok_or_else(|| malformed(&pointer.push_field("id"), "included resources must carry an id"))?;
            if !seen.insert(identifier.clone()) {
                return Err(Problem::DuplicateResource.at_pointer(
                    &pointer,
                    format!("resource '{}' appears more than once", identifier),
                ));
            }
            resources.push(resource);
        }
        document = document.with_included(resources);
    }

    if let Some(links) = object.get("links") {
        for (name, link) in parse_links(links, &root.push_field("links"))? {
            document = document.with_link(name, link);
        }
    }
    if let Some(meta) = object.get("meta") {
        for (key, value) in parse_meta(meta, &root.push_field("meta"))? {
            document = document.with_meta(key, value);
        }
    }
    if let Some(jsonapi) = object.get("jsonapi") {
        let at = root.push_field("jsonapi");
        let info: JsonApiInfo = serde_json::from_value(jsonapi.clone())
            .map_err(|e| malformed(&at, format!("invalid `jsonapi` object: {}", e)))?;
        document = document.with_jsonapi(info);
    }
    Ok(document)
}

/// Structural checks on the envelope of a request; returns primary data.
fn check_envelope(document: &Value) -> Result<&Value, ErrorObject> {
    let root = JsonPointer::root();
    let object = document
        .as_object()
        .ok_or_else(|| malformed(&root, "request document must be a JSON object"))?;

    let data = match (object.get("data"), object.contains_key("errors")) {
        (Some(_), true) => return Err(malformed(&root, "`data` and `errors` must not coexist")),
        (None, true) => {
            return Err(malformed(
                &root.push_field("errors"),
                "request documents must not carry `errors`",
            ))
        }
        (None, false) => return Err(malformed(&root, "request document must contain `data`")),
        (Some(data), false) => data,
    };

    check_members(object, &root, &TOP_LEVEL_MEMBERS, "top-level")?;
    if object.contains_key("included") {
        return Err(Problem::IncludedOnWrite.at_pointer(
            &root.push_field("included"),
            "`included` is not allowed in request documents",
        ));
    }
    if let Some(jsonapi) = object.get("jsonapi") {
        check_version(jsonapi, &root.push_field("jsonapi"))?;
    }
    Ok(data)
}

fn check_version(jsonapi: &Value, pointer: &JsonPointer) -> Result<(), ErrorObject> {
    let object = jsonapi
        .as_object()
        .ok_or_else(|| malformed(pointer, "`jsonapi` must be an object"))?;
    let Some(version) = object.get("version") else {
        return Ok(());
    };
    let at = pointer.push_field("version");
    let requested = version
        .as_str()
        .and_then(version_tuple)
        .ok_or_else(|| malformed(&at, "`version` must be a string like \"1.0\""))?;
    let supported = version_tuple(JSONAPI_VERSION).unwrap_or((1, 0));
    if requested > supported {
        return Err(Problem::UnsupportedVersion.at_pointer(
            &at,
            format!("highest supported version is {}", JSONAPI_VERSION),
        ));
    }
    Ok(())
}

fn version_tuple(version: &str) -> Option<(u64, u64)> {
    let (major, minor) = version.split_once('.').unwrap_or((version, "0"));
    Some((major.parse().ok()?, minor.parse().ok()?))
}

/// Structural checks on one resource object; returns its id.
fn check_resource(
    value: &Value,
    pointer: &JsonPointer,
    expectation: &Expectation,
) -> Result<Option<String>, ErrorObject> {
    let object = value
        .as_object()
        .ok_or_else(|| malformed(pointer, "resource object must be a JSON object"))?;
    check_members(object, pointer, &RESOURCE_MEMBERS, "resource object")?;

    let type_at = pointer.push_field("type");
    let type_name = match object.get("type") {
        Some(Value::String(type_name)) => type_name,
        Some(_) => return Err(malformed(&type_at, "`type` must be a string")),
        None => return Err(malformed(&type_at, "resource object must contain `type`")),
    };
    if *type_name != expectation.type_name {
        return Err(Problem::TypeConflict.at_pointer(
            &type_at,
            format!("expected type '{}', got '{}'", expectation.type_name, type_name),
        ));
    }

    let id_at = pointer.push_field("id");
    let id = match object.get("id") {
        None => None,
        Some(Value::String(id)) => Some(id.clone()),
        Some(_) => return Err(malformed(&id_at, "`id` must be a string")),
    };
    match (expectation.operation, &id, &expectation.id) {
        (Operation::Update, None, _) => Err(malformed(
            &id_at,
            "`id` is required when updating a resource",
        )),
        (Operation::Update, Some(id), Some(expected)) if id != expected => {
            Err(Problem::IdConflict.at_pointer(
                &id_at,
                format!("id '{}' does not match the endpoint id '{}'", id, expected),
            ))
        }
        _ => Ok(id),
    }
}

fn decode_identifiers(
    data: &Value,
    pointer: &JsonPointer,
    expectation: &Expectation,
) -> Result<RelationshipData, ErrorObject> {
    let linkage = match expectation.shape {
        Shape::Single if data.is_array() => {
            return Err(malformed(pointer, "expected a single resource identifier or null"))
        }
        Shape::Collection if !data.is_array() => {
            return Err(malformed(pointer, "expected an array of resource identifiers"))
        }
        _ => parse_linkage(data, pointer)?,
    };
    check_target(&linkage, pointer, &expectation.type_name)?;

    let mut seen = HashSet::new();
    if let RelationshipData::ToMany(identifiers) = &linkage {
        for (index, identifier) in identifiers.iter().enumerate() {
            if !seen.insert(identifier) {
                return Err(Problem::DuplicateResource.at_pointer(
                    &pointer.push_index(index),
                    format!("resource '{}' appears more than once", identifier),
                ));
            }
        }
    }
    Ok(linkage)
}

fn relationship_object(
    value: &Value,
    pointer: &JsonPointer,
    declared: &RelationshipSchema,
) -> Result<RelationshipObject, ErrorObject> {
    let object = value
        .as_object()
        .ok_or_else(|| malformed(pointer, "relationship must be an object"))?;
    if !RELATIONSHIP_MEMBERS.iter().any(|member| object.contains_key(*member)) {
        return Err(malformed(
            pointer,
            "relationship must contain at least one of `data`, `links` or `meta`",
        ));
    }

    let mut relationship = RelationshipObject::default();
    if let Some(data) = object.get("data") {
        let at = pointer.push_field("data");
        match (declared.cardinality, data.is_array()) {
            (Cardinality::ToOne, true) => {
                return Err(Problem::Cardinality.at_pointer(
                    &at,
                    "to-one relationship expects a single resource identifier or null",
                ))
            }
            (Cardinality::ToMany, false) => {
                return Err(Problem::Cardinality.at_pointer(
                    &at,
                    "to-many relationship expects an array of resource identifiers",
                ))
            }
            _ => {}
        }
        let linkage = parse_linkage(data, &at)?;
        check_target(&linkage, &at, &declared.target_type)?;
        relationship.data = Some(linkage);
    }
    if let Some(links) = object.get("links") {
        relationship.links = parse_links(links, &pointer.push_field("links"))?;
    }
    if let Some(meta) = object.get("meta") {
        relationship.meta = parse_meta(meta, &pointer.push_field("meta"))?;
    }
    Ok(relationship)
}

fn check_target(
    linkage: &RelationshipData,
    pointer: &JsonPointer,
    target_type: &str,
) -> Result<(), ErrorObject> {
    let mismatch = |identifier: &ResourceIdentifier, at: JsonPointer| {
        Problem::TypeConflict.at_pointer(
            &at.push_field("type"),
            format!("expected type '{}', got '{}'", target_type, identifier.type_name),
        )
    };
    match linkage {
        RelationshipData::ToOne(Some(identifier)) if identifier.type_name != target_type => {
            Err(mismatch(identifier, pointer.clone()))
        }
        RelationshipData::ToMany(identifiers) => {
            match identifiers
                .iter()
                .enumerate()
                .find(|(_, identifier)| identifier.type_name != target_type)
            {
                Some((index, identifier)) => Err(mismatch(identifier, pointer.push_index(index))),
                None => Ok(()),
            }
        }
        _ => Ok(()),
    }
}

fn parse_primary(value: &Value, pointer: &JsonPointer) -> Result<PrimaryData, ErrorObject> {
    match value {
        Value::Null => Ok(PrimaryData::Null),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| parse_resource(item, &pointer.push_index(index)))
            .collect::<Result<Vec<_>, _>>()
            .map(PrimaryData::Collection),
        _ => parse_resource(value, pointer).map(|resource| PrimaryData::Resource(Box::new(resource))),
    }
}

/// Schema-less resource object parsing.
fn parse_resource(value: &Value, pointer: &JsonPointer) -> Result<ResourceObject, ErrorObject> {
    let object = value
        .as_object()
        .ok_or_else(|| malformed(pointer, "resource object must be a JSON object"))?;
    check_members(object, pointer, &RESOURCE_MEMBERS, "resource object")?;

    let type_name = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(&pointer.push_field("type"), "`type` must be a string"))?;
    let id = match object.get("id") {
        None => None,
        Some(Value::String(id)) => Some(id.clone()),
        Some(_) => return Err(malformed(&pointer.push_field("id"), "`id` must be a string")),
    };
    let mut resource = ResourceObject::new(type_name, id);

    if let Some(attributes) = object.get("attributes") {
        let attributes = attributes
            .as_object()
            .ok_or_else(|| malformed(&pointer.push_field("attributes"), "`attributes` must be an object"))?;
        for (name, value) in attributes {
            resource = resource.with_attribute(name.clone(), value.clone());
        }
    }
    if let Some(relationships) = object.get("relationships") {
        let at = pointer.push_field("relationships");
        let relationships = relationships
            .as_object()
            .ok_or_else(|| malformed(&at, "`relationships` must be an object"))?;
        for (name, value) in relationships {
            let member = at.push_field(name);
            let fields = value
                .as_object()
                .ok_or_else(|| malformed(&member, "relationship must be an object"))?;
            if !RELATIONSHIP_MEMBERS.iter().any(|m| fields.contains_key(*m)) {
                return Err(malformed(
                    &member,
                    "relationship must contain at least one of `data`, `links` or `meta`",
                ));
            }
            let mut relationship = RelationshipObject::default();
            if let Some(data) = fields.get("data") {
                relationship.data = Some(parse_linkage(data, &member.push_field("data"))?);
            }
            if let Some(links) = fields.get("links") {
                relationship.links = parse_links(links, &member.push_field("links"))?;
            }
            if let Some(meta) = fields.get("meta") {
                relationship.meta = parse_meta(meta, &member.push_field("meta"))?;
            }
            resource = resource.with_relationship(name.clone(), relationship);
        }
    }
    if let Some(links) = object.get("links") {
        for (name, link) in parse_links(links, &pointer.push_field("links"))? {
            resource = resource.with_link(name, link);
        }
    }
    if let Some(meta) = object.get("meta") {
        resource = resource.with_meta(parse_meta(meta, &pointer.push_field("meta"))?);
    }
    Ok(resource)
}

fn parse_linkage(value: &Value, pointer: &JsonPointer) -> Result<RelationshipData, ErrorObject> {
    match value {
        Value::Null => Ok(RelationshipData::ToOne(None)),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| parse_identifier(item, &pointer.push_index(index)))
            .collect::<Result<Vec<_>, _>>()
            .map(RelationshipData::ToMany),
        _ => parse_identifier(value, pointer).map(|identifier| RelationshipData::ToOne(Some(identifier))),
    }
}

fn parse_identifier(value: &Value, pointer: &JsonPointer) -> Result<ResourceIdentifier, ErrorObject> {
    let object = value
        .as_object()
        .ok_or_else(|| malformed(pointer, "resource identifier must be an object"))?;
    let type_name = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(&pointer.push_field("type"), "`type` must be a string"))?;
    let id = object
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(&pointer.push_field("id"), "`id` must be a string"))?;
    Ok(ResourceIdentifier::new(type_name, id))
}

fn parse_errors(value: &Value, pointer: &JsonPointer) -> Result<ErrorList, ErrorObject> {
    let items = value
        .as_array()
        .ok_or_else(|| malformed(pointer, "`errors` must be an array"))?;
    let errors = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<ErrorObject>(item.clone()).map_err(|e| {
                malformed(&pointer.push_index(index), format!("invalid error object: {}", e))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    ErrorList::from_vec(errors).map_err(|_| malformed(pointer, "`errors` must not be empty"))
}

fn parse_links(value: &Value, pointer: &JsonPointer) -> Result<Links, ErrorObject> {
    serde_json::from_value(value.clone())
        .map_err(|_| malformed(pointer, "links must map names to URLs or link objects"))
}

fn parse_meta(value: &Value, pointer: &JsonPointer) -> Result<Map<String, Value>, ErrorObject> {
    value
        .as_object()
        .cloned()
        .ok_or_else(|| malformed(pointer, "`meta` must be an object"))
}

fn check_members(
    object: &Map<String, Value>,
    pointer: &JsonPointer,
    allowed: &[&str],
    context: &str,
) -> Result<(), ErrorObject> {
    match object.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(member) => Err(malformed(
            &pointer.push_field(member),
            format!("'{}' is not a valid {} member", member, context),
        )),
        None => Ok(()),
    }
}

fn malformed(pointer: &JsonPointer, detail: impl Into<String>) -> ErrorObject {
    Problem::MalformedDocument.at_pointer(pointer, detail)
}
