use jsonapi_model::{
    Document, ErrorList, ErrorObject, FieldInflection, JsonApiInfo, JsonPointer, Link,
    PrimaryData, Problem, RelationshipData, RelationshipObject, ResourceIdentifier,
    ResourceObject, ValidationError,
};
use serde_json::json;

fn make_article(id: &str) -> ResourceObject {
    ResourceObject::new("articles", Some(id.to_string()))
        .with_attribute("title", json!("Rails is Omakase"))
        .with_relationship(
            "author",
            RelationshipObject::with_data(RelationshipData::ToOne(Some(ResourceIdentifier::new(
                "people", "9",
            )))),
        )
}

fn make_person(id: &str) -> ResourceObject {
    ResourceObject::new("people", Some(id.to_string())).with_attribute("name", json!("Dan"))
}

#[test]
fn test_data_document_serializes_members() {
    let document = Document::data(PrimaryData::Resource(Box::new(make_article("1"))))
        .with_link("self", Link::Url("https://api.test/articles/1".to_string()))
        .with_meta("copyright", json!("2024"))
        .with_jsonapi(JsonApiInfo::default());

    assert_eq!(
        document.to_value().unwrap(),
        json!({
            "data": {
                "type": "articles",
                "id": "1",
                "attributes": { "title": "Rails is Omakase" },
                "relationships": {
                    "author": { "data": { "type": "people", "id": "9" } }
                }
            },
            "links": { "self": "https://api.test/articles/1" },
            "meta": { "copyright": "2024" },
            "jsonapi": { "version": "1.0" }
        })
    );
}

#[test]
fn test_error_document_has_no_data() {
    let errors = ErrorList::new(Problem::UnknownAttribute.at_pointer(
        &JsonPointer::root().push_field("data").push_field("attributes").push_field("ghost"),
        "'ghost' is not an attribute of 'articles'",
    ));
    let value = Document::errors(errors).to_value().unwrap();

    assert!(value.get("data").is_none());
    assert_eq!(value["errors"][0]["status"], "422");
    assert_eq!(value["errors"][0]["code"], "unknown_attribute");
    assert_eq!(value["errors"][0]["source"]["pointer"], "/data/attributes/ghost");
}

#[test]
fn test_empty_to_one_serializes_null() {
    let resource = ResourceObject::new("articles", Some("1".to_string())).with_relationship(
        "author",
        RelationshipObject::with_data(RelationshipData::ToOne(None)),
    );
    let document = Document::data(PrimaryData::Resource(Box::new(resource)));

    assert_eq!(
        document.to_value().unwrap()["data"]["relationships"]["author"],
        json!({ "data": null })
    );
}

#[test]
fn test_null_primary_data() {
    let document = Document::data(PrimaryData::Null);
    assert_eq!(document.to_value().unwrap(), json!({ "data": null }));
}

#[test]
fn test_included_deduplicated() {
    let document = Document::data(PrimaryData::Collection(vec![make_article("1")]))
        .with_included(vec![
            make_person("9"),
            make_person("9"),
            make_article("1"),
            ResourceObject::new("people", None),
        ]);

    assert_eq!(document.included().len(), 1);
    assert_eq!(document.included()[0].id(), Some("9"));
}

#[test]
fn test_attribute_and_relationship_never_share_a_name() {
    let resource = make_article("1").with_attribute("author", json!("Dan"));
    assert!(resource.relationships().get("author").is_none());
    assert_eq!(resource.attributes()["author"], "Dan");

    let resource = resource.with_relationship(
        "author",
        RelationshipObject::with_data(RelationshipData::ToOne(None)),
    );
    assert!(resource.attributes().get("author").is_none());
}

#[test]
fn test_pointer_escaping() {
    let pointer = JsonPointer::root()
        .push_field("data")
        .push_index(0)
        .push_field("a/b~c");
    assert_eq!(pointer.to_string(), "/data/0/a~1b~0c");
    assert_eq!(JsonPointer::root().to_string(), "");
    assert!(JsonPointer::root().is_root());
}

#[test]
fn test_problem_status_mapping() {
    assert_eq!(Problem::MalformedDocument.status(), 400);
    assert_eq!(Problem::NotAcceptable.status(), 406);
    assert_eq!(Problem::TypeConflict.status(), 409);
    assert_eq!(Problem::UnsupportedMediaType.status(), 415);
    assert_eq!(Problem::Cardinality.status(), 422);
    assert_eq!(Problem::Internal.status(), 500);
}

#[test]
fn test_internal_error_hides_detail() {
    let error = ErrorObject::internal();
    assert_eq!(error.status.as_deref(), Some("500"));
    assert_eq!(error.title.as_deref(), Some("Internal Server Error"));
    assert!(error.detail.is_none());
    assert!(error.source.is_none());
}

#[test]
fn test_error_list_status() {
    let root = JsonPointer::root();
    let mut errors = ErrorList::new(Problem::UnknownAttribute.at_pointer(&root, "a"));
    errors.push(Problem::Cardinality.at_pointer(&root, "b"));
    assert_eq!(errors.status(), 422);

    errors.push(Problem::TypeConflict.at_pointer(&root, "c"));
    assert_eq!(errors.status(), 400);

    errors.push(ErrorObject::internal());
    assert_eq!(errors.status(), 500);
}

#[test]
fn test_error_list_must_not_be_empty() {
    assert_eq!(
        ErrorList::from_vec(Vec::new()).unwrap_err(),
        ValidationError::Empty { field: "errors" }
    );
}

#[test]
fn test_parameter_source() {
    let error = Problem::InvalidParameter.at_parameter("page[size]", "must be positive");
    let value = serde_json::to_value(&error).unwrap();
    assert_eq!(value["source"], json!({ "parameter": "page[size]" }));
}

#[test]
fn test_dasherize_inflection() {
    assert_eq!(FieldInflection::Dasherize.to_wire("first_name"), "first-name");
    assert_eq!(FieldInflection::Dasherize.from_wire("first-name"), "first_name");
    assert_eq!(FieldInflection::None.to_wire("first_name"), "first_name");
}
