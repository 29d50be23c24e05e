use jsonapi_codec::{
    DecodeOutcome, Expectation, FlatDecoder, FlatEncoder, PageResult, PageSpec, PaginationConfig,
    Shape,
};
use jsonapi_model::{
    Entity, ErrorList, JsonPointer, Problem, Registry, RegistryBuilder, RelationshipData,
    ResourceIdentifier, ResourceSchema,
};
use serde_json::json;

fn make_registry() -> Registry {
    let mut builder = RegistryBuilder::new();
    builder
        .register(
            ResourceSchema::new("articles")
                .attribute("title")
                .to_one("author", "people")
                .to_many("tags", "tags"),
        )
        .unwrap()
        .register(ResourceSchema::new("people").id_field("uuid").attribute("name"))
        .unwrap()
        .register(ResourceSchema::new("tags").attribute("label"))
        .unwrap();
    builder.freeze().unwrap()
}

fn make_article(id: u64) -> Entity {
    Entity::new("articles")
        .with_field("id", json!(id))
        .with_field("title", json!("Flat"))
        .with_field("author", json!("p-1"))
        .with_field("tags", json!([1, 2]))
}

fn make_rejected(outcome: DecodeOutcome) -> ErrorList {
    match outcome {
        DecodeOutcome::Rejected(errors) => errors,
        other => panic!("expected a rejection, got {:?}", other),
    }
}

#[test]
fn test_encode_flat_object() {
    let registry = make_registry();
    let value = FlatEncoder::new(&registry).encode_one(&make_article(1)).unwrap();

    assert_eq!(
        value,
        json!({ "id": "1", "title": "Flat", "author": "p-1", "tags": ["1", "2"] })
    );
}

#[test]
fn test_encode_flat_page() {
    let registry = make_registry();
    let page = PageResult {
        items: vec![make_article(11)],
        total: 11,
        spec: PageSpec::new(2, 10).unwrap(),
    };
    let value = FlatEncoder::new(&registry)
        .encode_page(&page, "/articles?page[number]=2", &PaginationConfig::default())
        .unwrap();

    assert_eq!(value["count"], 11);
    assert_eq!(value["next"], json!(null));
    assert_eq!(value["previous"], "/articles?page[number]=1");
    assert_eq!(value["results"][0]["id"], "11");
}

#[test]
fn test_encode_flat_errors() {
    let registry = make_registry();
    let errors = ErrorList::new(Problem::UnknownAttribute.at_pointer(
        &JsonPointer::root().push_field("ghost"),
        "unknown",
    ));
    let value = FlatEncoder::new(&registry).encode_errors(&errors);
    assert_eq!(value["errors"][0]["source"]["pointer"], "/ghost");
}

#[test]
fn test_decode_flat_create() {
    let registry = make_registry();
    let outcome = FlatDecoder::new(&registry)
        .decode(
            &json!({ "title": "Flat", "author": "p-1", "tags": [1, "2"] }),
            &Expectation::create("articles"),
        )
        .unwrap();
    let DecodeOutcome::Resource(resource) = outcome else {
        panic!("expected a resource, got {:?}", outcome);
    };

    assert_eq!(resource.id(), None);
    assert_eq!(resource.attributes()["title"], "Flat");
    assert_eq!(
        resource.relationships()["tags"].data,
        Some(RelationshipData::ToMany(vec![
            ResourceIdentifier::new("tags", "1"),
            ResourceIdentifier::new("tags", "2"),
        ]))
    );
}

#[test]
fn test_decode_flat_uses_identity_field() {
    let registry = make_registry();
    let outcome = FlatDecoder::new(&registry)
        .decode(
            &json!({ "uuid": "abc", "name": "Dan" }),
            &Expectation::update("people", "abc"),
        )
        .unwrap();
    let DecodeOutcome::Resource(resource) = outcome else {
        panic!("expected a resource, got {:?}", outcome);
    };
    assert_eq!(resource.id(), Some("abc"));

    let errors = make_rejected(
        FlatDecoder::new(&registry)
            .decode(&json!({ "uuid": "xyz" }), &Expectation::update("people", "abc"))
            .unwrap(),
    );
    assert_eq!(errors.status(), 409);
    assert_eq!(errors.iter().next().unwrap().pointer(), Some("/uuid"));
}

#[test]
fn test_decode_flat_batches_field_errors() {
    let registry = make_registry();
    let errors = make_rejected(
        FlatDecoder::new(&registry)
            .decode(
                &json!({ "author": ["p-1"], "ghost": 1, "type": "articles" }),
                &Expectation::create("articles"),
            )
            .unwrap(),
    );

    let pointers: Vec<&str> = errors.iter().filter_map(|e| e.pointer()).collect();
    assert_eq!(pointers, vec!["/author", "/ghost", "/type"]);
    let codes: Vec<&str> = errors.iter().filter_map(|e| e.code.as_deref()).collect();
    assert_eq!(codes, vec!["cardinality", "unknown_attribute", "reserved_member"]);
}

#[test]
fn test_decode_flat_collection_duplicates() {
    let registry = make_registry();
    let errors = make_rejected(
        FlatDecoder::new(&registry)
            .decode(
                &json!([{ "id": 1, "title": "a" }, { "id": "1", "title": "b" }]),
                &Expectation::create_many("articles"),
            )
            .unwrap(),
    );
    assert_eq!(errors.iter().next().unwrap().pointer(), Some("/1"));
}

#[test]
fn test_decode_flat_reference() {
    let registry = make_registry();
    let outcome = FlatDecoder::new(&registry)
        .decode(&json!([3, 4]), &Expectation::reference("tags", Shape::Collection))
        .unwrap();
    assert_eq!(
        outcome,
        DecodeOutcome::Identifiers(RelationshipData::ToMany(vec![
            ResourceIdentifier::new("tags", "3"),
            ResourceIdentifier::new("tags", "4"),
        ]))
    );
}
