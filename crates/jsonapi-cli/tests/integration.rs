//! Integration tests for CLI commands.

use serde_json::{json, Value};
use std::fs;
use std::process::Command;
use tempfile::TempDir;

const CONFIG: &str = r#"
[encoder]
base_url = "https://api.test"
include_related = true

[pagination]
default_size = 10

[[resources]]
type = "articles"
attributes = ["title"]
serializer = "ArticleSerializer"

[resources.relationships]
author = { cardinality = "to-one", type = "people" }

[[resources]]
type = "people"
attributes = ["name"]
formats = ["json"]

[[endpoints]]
type = "articles"
default_format = "json-api"
"#;

fn create_test_config() -> (TempDir, String) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("jsonapi.toml");
    fs::write(&config_path, CONFIG).unwrap();
    let config_path = config_path.to_str().unwrap().to_string();
    (temp_dir, config_path)
}

fn write_json(temp_dir: &TempDir, name: &str, value: &Value) -> String {
    let path = temp_dir.path().join(name);
    fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
    path.to_str().unwrap().to_string()
}

fn make_article_entity() -> Value {
    json!({
        "type": "articles",
        "fields": { "id": 1, "title": "Hello", "draft": true },
        "related": {
            "author": { "type": "people", "fields": { "id": "9", "name": "Dan" } }
        }
    })
}

fn run_cli(args: &[&str]) -> (bool, String, String) {
    let (code, stdout, stderr) = run_cli_with_code(args);
    (code == Some(0), stdout, stderr)
}

fn run_cli_with_code(args: &[&str]) -> (Option<i32>, String, String) {
    let output = Command::new("cargo")
        .args(["run", "--bin", "jsonapi", "--"])
        .args(args)
        .output()
        .expect("Failed to execute CLI");

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();

    (output.status.code(), stdout, stderr)
}

#[test]
fn test_encode_command() {
    let (temp_dir, config_path) = create_test_config();
    let input = write_json(&temp_dir, "article.json", &make_article_entity());

    let (success, stdout, _) = run_cli(&["encode", &input, "--config", &config_path]);
    assert!(success);

    let document: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(document["data"]["id"], "1");
    assert_eq!(document["data"]["attributes"], json!({ "title": "Hello" }));
    assert_eq!(document["data"]["links"]["self"], "https://api.test/articles/1");
    assert_eq!(document["included"][0]["attributes"]["name"], "Dan");
}

#[test]
fn test_encode_plain_json() {
    let (temp_dir, config_path) = create_test_config();
    let input = write_json(&temp_dir, "article.json", &make_article_entity());

    let (success, stdout, _) = run_cli(&[
        "encode",
        &input,
        "--config",
        &config_path,
        "--format",
        "json",
    ]);
    assert!(success);

    let value: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value, json!({ "id": "1", "title": "Hello", "author": "9" }));
}

#[test]
fn test_encode_page() {
    let (temp_dir, config_path) = create_test_config();
    let input = write_json(
        &temp_dir,
        "people.json",
        &json!([
            { "type": "people", "fields": { "id": "1", "name": "A" } },
            { "type": "people", "fields": { "id": "2", "name": "B" } }
        ]),
    );

    let (success, stdout, _) = run_cli(&[
        "encode",
        &input,
        "--config",
        &config_path,
        "--url",
        "https://api.test/people?page[number]=2&page[size]=2",
        "--total",
        "5",
    ]);
    assert!(success);

    let document: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(document["meta"], json!({ "total": 5, "pages": 3 }));
    assert_eq!(
        document["links"]["next"],
        "https://api.test/people?page[number]=3&page[size]=2"
    );
}

#[test]
fn test_encode_unknown_format_fails() {
    let (temp_dir, config_path) = create_test_config();
    let input = write_json(&temp_dir, "article.json", &make_article_entity());

    let (code, _, stderr) = run_cli_with_code(&[
        "encode",
        &input,
        "--config",
        &config_path,
        "--format",
        "xml",
    ]);
    assert_eq!(code, Some(1));
    assert!(stderr.contains("unknown format 'xml'"));
}

#[test]
fn test_decode_command() {
    let (temp_dir, config_path) = create_test_config();
    let input = write_json(
        &temp_dir,
        "request.json",
        &json!({
            "data": {
                "type": "articles",
                "id": "1",
                "attributes": { "title": "Updated" },
                "relationships": { "author": { "data": { "type": "people", "id": "9" } } }
            }
        }),
    );

    let (success, stdout, _) = run_cli(&[
        "decode",
        &input,
        "--config",
        &config_path,
        "--type",
        "articles",
        "--operation",
        "update",
        "--id",
        "1",
    ]);
    assert!(success);

    let resource: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(resource["attributes"]["title"], "Updated");
    assert_eq!(resource["relationships"]["author"]["data"]["id"], "9");
}

#[test]
fn test_decode_rejected_document() {
    let (temp_dir, config_path) = create_test_config();
    let input = write_json(
        &temp_dir,
        "request.json",
        &json!({ "data": { "type": "articles", "attributes": { "ghost": 1 } } }),
    );

    let (code, stdout, _) = run_cli_with_code(&[
        "decode",
        &input,
        "--config",
        &config_path,
        "--type",
        "articles",
    ]);
    assert_eq!(code, Some(2));

    let errors: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(errors["errors"][0]["status"], "422");
    assert_eq!(
        errors["errors"][0]["source"]["pointer"],
        "/data/attributes/ghost"
    );
}

#[test]
fn test_decode_any_document() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_json(
        &temp_dir,
        "response.json",
        &json!({ "errors": [{ "status": "404", "title": "Not Found" }] }),
    );

    let (success, stdout, _) = run_cli(&["decode", &input, "--document"]);
    assert!(success);
    assert!(stdout.contains("Not Found"));
}

#[test]
fn test_decode_requires_type() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_json(&temp_dir, "request.json", &json!({ "data": null }));

    let (code, _, stderr) = run_cli_with_code(&["decode", &input]);
    assert_eq!(code, Some(1));
    assert!(stderr.contains("--type is required"));
}

#[test]
fn test_paginate_command() {
    let (success, stdout, _) = run_cli(&[
        "paginate",
        "https://api.test/articles?page[number]=2&page[size]=10",
        "--total",
        "23",
    ]);
    assert!(success);

    let value: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["meta"], json!({ "total": 23, "pages": 3 }));
    assert_eq!(
        value["links"]["prev"],
        "https://api.test/articles?page[number]=1&page[size]=10"
    );
    assert_eq!(
        value["links"]["next"],
        "https://api.test/articles?page[number]=3&page[size]=10"
    );
}

#[test]
fn test_paginate_empty_collection() {
    let (success, stdout, _) = run_cli(&["paginate", "https://api.test/articles", "--total", "0"]);
    assert!(success);

    let value: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["meta"]["pages"], 0);
    assert_eq!(value["links"]["first"], "https://api.test/articles?page[number]=1");
    assert_eq!(value["links"]["prev"], Value::Null);
    assert_eq!(value["links"]["next"], Value::Null);
}

#[test]
fn test_paginate_offset() {
    let (success, stdout, _) = run_cli(&[
        "paginate",
        "https://api.test/articles?page[offset]=10&page[limit]=10",
        "--total",
        "25",
        "--offset",
    ]);
    assert!(success);

    let value: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(
        value["links"]["last"],
        "https://api.test/articles?page[offset]=20&page[limit]=10"
    );
}

#[test]
fn test_paginate_invalid_parameter() {
    let (code, stdout, _) = run_cli_with_code(&[
        "paginate",
        "https://api.test/articles?page[size]=0",
        "--total",
        "5",
    ]);
    assert_eq!(code, Some(2));
    assert!(stdout.contains("page[size]"));
}

#[test]
fn test_negotiate_command() {
    let (_temp_dir, config_path) = create_test_config();

    let (success, stdout, _) = run_cli(&[
        "negotiate",
        "--config",
        &config_path,
        "--type",
        "articles",
        "--accept",
        "application/json",
    ]);
    assert!(success);

    let value: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["format"], "json");
    assert_eq!(value["content_type"], "application/json");
    assert_eq!(value["reason"], "accept");
    assert_eq!(value["serializer"], "ArticleSerializer");
}

#[test]
fn test_negotiate_unsupported_media_type() {
    let (_temp_dir, config_path) = create_test_config();

    let (code, stdout, _) = run_cli_with_code(&[
        "negotiate",
        "--config",
        &config_path,
        "--type",
        "articles",
        "--content-type",
        "text/xml",
    ]);
    assert_eq!(code, Some(2));

    let errors: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(errors["errors"][0]["status"], "415");
}

#[test]
fn test_negotiate_unavailable_format() {
    let (_temp_dir, config_path) = create_test_config();

    let (code, stdout, _) = run_cli_with_code(&[
        "negotiate",
        "--config",
        &config_path,
        "--type",
        "people",
        "--format",
        "json-api",
    ]);
    assert_eq!(code, Some(2));

    let errors: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(errors["errors"][0]["status"], "406");
    assert_eq!(errors["errors"][0]["source"]["parameter"], "format");
}

#[test]
fn test_check_registry_command() {
    let (_temp_dir, config_path) = create_test_config();

    let (success, stdout, _) = run_cli(&["check-registry", &config_path]);
    assert!(success);

    let value: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["types"][0]["type"], "articles");
    assert_eq!(
        value["types"][0]["relationships"]["author"],
        json!({ "cardinality": "to-one", "type": "people" })
    );
    assert_eq!(value["types"][1]["formats"], json!(["json"]));
}

#[test]
fn test_check_registry_rejects_dangling_relationship() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("broken.toml");
    fs::write(
        &config_path,
        r#"
[[resources]]
type = "articles"

[resources.relationships]
author = { cardinality = "to-one", type = "people" }
"#,
    )
    .unwrap();

    let (code, _, stderr) = run_cli_with_code(&["check-registry", config_path.to_str().unwrap()]);
    assert_eq!(code, Some(1));
    assert!(stderr.contains("Error:"));
}

#[test]
fn test_check_registry_rejects_unknown_default_format() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("broken.toml");
    fs::write(
        &config_path,
        r#"
[[resources]]
type = "articles"

[[endpoints]]
type = "articles"
default_format = "yaml"
"#,
    )
    .unwrap();

    let (success, _, stderr) = run_cli(&["check-registry", config_path.to_str().unwrap()]);
    assert!(!success);
    assert!(stderr.contains("yaml"));
}

#[test]
fn test_check_registry_rejects_default_format_excluded_by_type() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("broken.toml");
    fs::write(
        &config_path,
        r#"
[[resources]]
type = "people"
formats = ["json"]

[[endpoints]]
type = "people"
default_format = "json-api"
"#,
    )
    .unwrap();

    let (code, _, stderr) = run_cli_with_code(&["check-registry", config_path.to_str().unwrap()]);
    assert_eq!(code, Some(1));
    assert!(stderr.contains("not allowed"));
}

#[test]
fn test_negotiate_unmatched_accept_without_default() {
    let (_temp_dir, config_path) = create_test_config();

    let (code, stdout, _) = run_cli_with_code(&[
        "negotiate",
        "--config",
        &config_path,
        "--type",
        "people",
        "--accept",
        "text/html",
    ]);
    assert_eq!(code, Some(2));

    let errors: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(errors["errors"][0]["status"], "406");
}
