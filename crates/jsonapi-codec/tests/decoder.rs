use jsonapi_codec::{
    decode_document, CodecError, DecodeOutcome, Decoder, DecoderOptions, Expectation, Shape,
};
use jsonapi_model::{
    ErrorList, FieldInflection, PrimaryData, Registry, RegistryBuilder, RelationshipData,
    ResourceIdentifier, ResourceObject, ResourceSchema,
};
use serde_json::{json, Value};

fn make_registry() -> Registry {
    let mut builder = RegistryBuilder::new();
    builder
        .register(
            ResourceSchema::new("articles")
                .attribute("title")
                .attribute("published_at")
                .to_one("author", "people")
                .to_many("comments", "comments"),
        )
        .unwrap()
        .register(ResourceSchema::new("people").attribute("name"))
        .unwrap()
        .register(ResourceSchema::new("comments").attribute("body"))
        .unwrap();
    builder.freeze().unwrap()
}

fn decode(document: Value, expectation: &Expectation) -> DecodeOutcome {
    let registry = make_registry();
    Decoder::new(&registry, DecoderOptions::default())
        .decode(&document, expectation)
        .unwrap()
}

fn make_rejected(document: Value, expectation: &Expectation) -> ErrorList {
    match decode(document, expectation) {
        DecodeOutcome::Rejected(errors) => errors,
        other => panic!("expected a rejection, got {:?}", other),
    }
}

fn make_resource(document: Value, expectation: &Expectation) -> ResourceObject {
    match decode(document, expectation) {
        DecodeOutcome::Resource(resource) => resource,
        other => panic!("expected a resource, got {:?}", other),
    }
}

fn pointers(errors: &ErrorList) -> Vec<&str> {
    errors.iter().filter_map(|error| error.pointer()).collect()
}

#[test]
fn test_decode_create() {
    let resource = make_resource(
        json!({
            "data": {
                "type": "articles",
                "attributes": { "title": "Ember Hamster" },
                "relationships": {
                    "author": { "data": { "type": "people", "id": "9" } },
                    "comments": { "data": [] }
                }
            }
        }),
        &Expectation::create("articles"),
    );

    assert_eq!(resource.id(), None);
    assert_eq!(resource.attributes()["title"], "Ember Hamster");
    assert_eq!(
        resource.relationships()["author"].data,
        Some(RelationshipData::ToOne(Some(ResourceIdentifier::new("people", "9"))))
    );
    assert_eq!(
        resource.relationships()["comments"].data,
        Some(RelationshipData::ToMany(Vec::new()))
    );
}

#[test]
fn test_client_generated_id_accepted_on_create() {
    let resource = make_resource(
        json!({ "data": { "type": "people", "id": "550e8400", "attributes": { "name": "Dan" } } }),
        &Expectation::create("people"),
    );
    assert_eq!(resource.id(), Some("550e8400"));
}

#[test]
fn test_unknown_attribute_rejected() {
    let errors = make_rejected(
        json!({ "data": { "type": "articles", "attributes": { "ghost": 1 } } }),
        &Expectation::create("articles"),
    );

    assert_eq!(errors.len(), 1);
    assert_eq!(errors.status(), 422);
    assert_eq!(pointers(&errors), vec!["/data/attributes/ghost"]);
}

#[test]
fn test_semantic_errors_are_batched() {
    let errors = make_rejected(
        json!({
            "data": {
                "type": "articles",
                "attributes": { "ghost": 1, "phantom": 2, "title": "ok" },
                "relationships": { "editor": { "data": null } }
            }
        }),
        &Expectation::create("articles"),
    );

    assert_eq!(
        pointers(&errors),
        vec![
            "/data/attributes/ghost",
            "/data/attributes/phantom",
            "/data/relationships/editor"
        ]
    );
    assert_eq!(errors.status(), 422);
}

#[test]
fn test_type_mismatch_is_conflict() {
    let errors = make_rejected(
        json!({ "data": { "type": "people", "attributes": { "name": "Dan" } } }),
        &Expectation::create("articles"),
    );

    assert_eq!(errors.status(), 409);
    assert_eq!(pointers(&errors), vec!["/data/type"]);
}

#[test]
fn test_update_requires_matching_id() {
    let errors = make_rejected(
        json!({ "data": { "type": "articles", "attributes": { "title": "x" } } }),
        &Expectation::update("articles", "1"),
    );
    assert_eq!(errors.status(), 400);
    assert_eq!(pointers(&errors), vec!["/data/id"]);

    let errors = make_rejected(
        json!({ "data": { "type": "articles", "id": "2" } }),
        &Expectation::update("articles", "1"),
    );
    assert_eq!(errors.status(), 409);
    assert_eq!(errors.iter().next().unwrap().code.as_deref(), Some("id_conflict"));
}

#[test]
fn test_numeric_id_rejected() {
    let errors = make_rejected(
        json!({ "data": { "type": "articles", "id": 1 } }),
        &Expectation::update("articles", "1"),
    );
    assert_eq!(pointers(&errors), vec!["/data/id"]);
}

#[test]
fn test_reserved_member_and_member_conflict() {
    let errors = make_rejected(
        json!({
            "data": {
                "type": "articles",
                "attributes": { "id": "7", "author": "Dan" },
                "relationships": { "author": { "data": null } }
            }
        }),
        &Expectation::create("articles"),
    );

    let codes: Vec<&str> = errors.iter().filter_map(|e| e.code.as_deref()).collect();
    assert_eq!(codes, vec!["member_conflict", "reserved_member"]);
    assert_eq!(
        pointers(&errors),
        vec!["/data/attributes/author", "/data/attributes/id"]
    );
}

#[test]
fn test_cardinality_mismatch_points_at_data() {
    let errors = make_rejected(
        json!({
            "data": {
                "type": "articles",
                "relationships": {
                    "author": { "data": [{ "type": "people", "id": "9" }] },
                    "comments": { "data": { "type": "comments", "id": "5" } }
                }
            }
        }),
        &Expectation::create("articles"),
    );

    assert_eq!(errors.status(), 422);
    assert_eq!(
        pointers(&errors),
        vec![
            "/data/relationships/author/data",
            "/data/relationships/comments/data"
        ]
    );
}

#[test]
fn test_wrong_relationship_target_type() {
    let errors = make_rejected(
        json!({
            "data": {
                "type": "articles",
                "relationships": {
                    "comments": { "data": [
                        { "type": "comments", "id": "5" },
                        { "type": "people", "id": "9" }
                    ] }
                }
            }
        }),
        &Expectation::create("articles"),
    );

    assert_eq!(errors.status(), 409);
    assert_eq!(
        pointers(&errors),
        vec!["/data/relationships/comments/data/1/type"]
    );
}

#[test]
fn test_empty_relationship_object_is_malformed() {
    let errors = make_rejected(
        json!({ "data": { "type": "articles", "relationships": { "author": {} } } }),
        &Expectation::create("articles"),
    );
    assert_eq!(errors.status(), 400);
    assert_eq!(pointers(&errors), vec!["/data/relationships/author"]);
}

#[test]
fn test_data_and_errors_are_exclusive() {
    let errors = make_rejected(
        json!({ "data": null, "errors": [{ "status": "400" }] }),
        &Expectation::create("articles"),
    );
    assert_eq!(errors.status(), 400);
    assert_eq!(pointers(&errors), vec![""]);

    let errors = make_rejected(
        json!({ "errors": [{ "status": "400" }] }),
        &Expectation::create("articles"),
    );
    assert_eq!(pointers(&errors), vec!["/errors"]);

    let errors = make_rejected(json!({ "meta": {} }), &Expectation::create("articles"));
    assert_eq!(pointers(&errors), vec![""]);
}

#[test]
fn test_structural_errors_fail_fast() {
    let errors = make_rejected(
        json!({
            "data": { "type": "articles", "attributes": { "ghost": 1 } },
            "extra": true
        }),
        &Expectation::create("articles"),
    );

    assert_eq!(errors.len(), 1);
    assert_eq!(pointers(&errors), vec!["/extra"]);
}

#[test]
fn test_included_rejected_on_write() {
    let errors = make_rejected(
        json!({
            "data": { "type": "articles", "attributes": { "title": "x" } },
            "included": [{ "type": "people", "id": "9" }]
        }),
        &Expectation::create("articles"),
    );
    assert_eq!(errors.iter().next().unwrap().code.as_deref(), Some("included_on_write"));
    assert_eq!(pointers(&errors), vec!["/included"]);
}

#[test]
fn test_unsupported_version() {
    let errors = make_rejected(
        json!({ "data": { "type": "people" }, "jsonapi": { "version": "1.1" } }),
        &Expectation::create("people"),
    );
    assert_eq!(errors.iter().next().unwrap().code.as_deref(), Some("unsupported_version"));
    assert_eq!(pointers(&errors), vec!["/jsonapi/version"]);

    let resource = make_resource(
        json!({ "data": { "type": "people" }, "jsonapi": { "version": "1.0" } }),
        &Expectation::create("people"),
    );
    assert_eq!(resource.type_name(), "people");
}

#[test]
fn test_bulk_create_detects_duplicates() {
    let errors = make_rejected(
        json!({ "data": [
            { "type": "people", "id": "1" },
            { "type": "people", "id": "2" },
            { "type": "people", "id": "1" }
        ] }),
        &Expectation::create_many("people"),
    );
    assert_eq!(errors.iter().next().unwrap().code.as_deref(), Some("duplicate_resource"));
    assert_eq!(pointers(&errors), vec!["/data/2"]);
}

#[test]
fn test_bulk_create_batches_across_items() {
    let errors = make_rejected(
        json!({ "data": [
            { "type": "people", "attributes": { "age": 3 } },
            { "type": "people", "attributes": { "name": "Dan" } },
            { "type": "people", "attributes": { "email": "x" } }
        ] }),
        &Expectation::create_many("people"),
    );
    assert_eq!(
        pointers(&errors),
        vec!["/data/0/attributes/age", "/data/2/attributes/email"]
    );
}

#[test]
fn test_bulk_create_accepts_collection() {
    let outcome = decode(
        json!({ "data": [
            { "type": "people", "attributes": { "name": "A" } },
            { "type": "people", "attributes": { "name": "B" } }
        ] }),
        &Expectation::create_many("people"),
    );
    let DecodeOutcome::Collection(resources) = outcome else {
        panic!("expected a collection, got {:?}", outcome);
    };
    assert_eq!(resources.len(), 2);
    assert_eq!(resources[1].attributes()["name"], "B");
}

#[test]
fn test_shape_mismatch_is_malformed() {
    let errors = make_rejected(
        json!({ "data": [{ "type": "people" }] }),
        &Expectation::create("people"),
    );
    assert_eq!(pointers(&errors), vec!["/data"]);
}

#[test]
fn test_reference_decoding() {
    let outcome = decode(
        json!({ "data": [{ "type": "comments", "id": "5" }, { "type": "comments", "id": "12" }] }),
        &Expectation::reference("comments", Shape::Collection),
    );
    assert_eq!(
        outcome,
        DecodeOutcome::Identifiers(RelationshipData::ToMany(vec![
            ResourceIdentifier::new("comments", "5"),
            ResourceIdentifier::new("comments", "12"),
        ]))
    );

    let outcome = decode(json!({ "data": null }), &Expectation::reference("people", Shape::Single));
    assert_eq!(outcome, DecodeOutcome::Identifiers(RelationshipData::ToOne(None)));

    let errors = make_rejected(
        json!({ "data": [{ "type": "comments", "id": "5" }, { "type": "comments", "id": "5" }] }),
        &Expectation::reference("comments", Shape::Collection),
    );
    assert_eq!(pointers(&errors), vec!["/data/1"]);
}

#[test]
fn test_dasherized_members_decode_to_schema_names() {
    let registry = make_registry();
    let decoder = Decoder::new(
        &registry,
        DecoderOptions {
            inflection: FieldInflection::Dasherize,
        },
    );
    let outcome = decoder
        .decode(
            &json!({ "data": { "type": "articles", "attributes": { "published-at": "2024-01-01" } } }),
            &Expectation::create("articles"),
        )
        .unwrap();
    let DecodeOutcome::Resource(resource) = outcome else {
        panic!("expected a resource, got {:?}", outcome);
    };
    assert_eq!(resource.attributes()["published_at"], "2024-01-01");
}

#[test]
fn test_unknown_expected_type_is_fatal() {
    let registry = make_registry();
    let err = Decoder::new(&registry, DecoderOptions::default())
        .decode(&json!({ "data": null }), &Expectation::create("ghosts"))
        .unwrap_err();
    assert!(matches!(err, CodecError::Schema(_)));
}

#[test]
fn test_decode_response_document() {
    let document = decode_document(&json!({
        "data": [{ "type": "articles", "id": "1", "relationships": {
            "author": { "data": { "type": "people", "id": "9" } }
        } }],
        "included": [{ "type": "people", "id": "9", "attributes": { "name": "Dan" } }],
        "links": { "self": "https://api.test/articles" },
        "meta": { "total": 1 }
    }))
    .unwrap();

    assert!(matches!(document.primary(), Some(PrimaryData::Collection(items)) if items.len() == 1));
    assert_eq!(document.included().len(), 1);
    assert_eq!(document.meta()["total"], 1);
}

#[test]
fn test_decode_error_document() {
    let document = decode_document(&json!({
        "errors": [{ "status": "404", "title": "Not Found" }]
    }))
    .unwrap();
    let errors = document.error_list().unwrap();
    assert_eq!(errors.status(), 404);
    assert!(document.primary().is_none());
}

#[test]
fn test_decode_document_rejects_bad_grammar() {
    let errors = decode_document(&json!({
        "data": { "type": "articles", "id": "1" },
        "included": [{ "type": "articles", "id": "1" }]
    }))
    .unwrap_err();
    assert_eq!(pointers(&errors), vec!["/included/0"]);

    let errors = decode_document(&json!({ "errors": [], "data": null })).unwrap_err();
    assert_eq!(pointers(&errors), vec![""]);

    let errors = decode_document(&json!({ "errors": [] })).unwrap_err();
    assert_eq!(pointers(&errors), vec!["/errors"]);
}
