use jsonapi_negotiate::{parse_accept, MediaType};

#[test]
fn test_parse_media_type() {
    let media_type = MediaType::parse("Application/JSON; Charset=\"UTF-8\"").unwrap();

    assert_eq!(media_type.essence(), "application/json");
    assert_eq!(media_type.param("charset"), Some("UTF-8"));
    assert_eq!(media_type.to_string(), "application/json; charset=UTF-8");
    assert!(!media_type.is_wildcard());
}

#[test]
fn test_invalid_media_types() {
    assert!(MediaType::parse("json").is_err());
    assert!(MediaType::parse("*/json").is_err());
    assert!(MediaType::parse("application/json; charset").is_err());
    assert!(MediaType::parse("/json").is_err());
}

#[test]
fn test_ranges_and_specificity() {
    let any = MediaType::parse("*/*").unwrap();
    let application = MediaType::parse("application/*").unwrap();
    let json = MediaType::parse("application/json").unwrap();
    let with_params = MediaType::parse("application/json; charset=utf-8").unwrap();

    assert!(any.matches(&json));
    assert!(application.matches(&MediaType::jsonapi()));
    assert!(!json.matches(&MediaType::jsonapi()));
    assert_eq!(
        [any.specificity(), application.specificity(), json.specificity(), with_params.specificity()],
        [0, 1, 2, 3]
    );
}

#[test]
fn test_jsonapi_params() {
    assert!(MediaType::parse("application/vnd.api+json; ext=\"https://example.com/ext\"")
        .unwrap()
        .has_valid_jsonapi_params());
    assert!(!MediaType::parse("application/vnd.api+json; version=1")
        .unwrap()
        .has_valid_jsonapi_params());
    assert!(MediaType::parse("application/json; version=1")
        .unwrap()
        .has_valid_jsonapi_params());
}

#[test]
fn test_accept_ordering() {
    let entries = parse_accept("text/*;q=0.8, */*;q=0.1, application/json, text/html;q=0.8");
    let ranges: Vec<String> = entries.iter().map(|entry| entry.range.to_string()).collect();

    assert_eq!(ranges, vec!["application/json", "text/html", "text/*", "*/*"]);
    assert_eq!(entries[1].quality, 800);
}

#[test]
fn test_accept_drops_refused_and_invalid_ranges() {
    let entries = parse_accept(
        "application/json;q=0, garbage, application/vnd.api+json; charset=utf-8, text/csv;q=2, text/plain",
    );
    let ranges: Vec<String> = entries.iter().map(|entry| entry.range.essence()).collect();
    assert_eq!(ranges, vec!["text/plain"]);
}
