//! End-to-end generation from descriptor directories

use std::fs;
use std::path::Path;

use apigen_codegen::generators::GeneratorConfig;
use apigen_codegen::{generate_from_dir, render_from_dir, Mode};
use serde_json::{json, Value};
use tempfile::TempDir;

fn write_descriptor(dir: &Path, file: &str, value: Value) {
    fs::write(dir.join(file), serde_json::to_string_pretty(&value).unwrap()).unwrap();
}

fn input_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

#[test]
fn cat_body_generates_one_struct() {
    let input = input_dir();
    write_descriptor(
        input.path(),
        "cat.json",
        json!({
            "cat": {
                "key": "cat",
                "type": "struct",
                "typeName": "Cat",
                "any_of": [
                    { "key": "name", "type": "simple", "typeName": "String", "required": true }
                ]
            }
        }),
    );

    let modules = render_from_dir(Mode::Bodies, input.path(), GeneratorConfig::default()).unwrap();
    assert_eq!(modules.len(), 1);

    let code = &modules["cat.rs"];
    assert!(code.starts_with("// @generated"));
    assert!(code.contains("use serde_json::{json, Map, Value};"));
    assert!(code.contains("use crate::runtime::QueryItem;"));
    assert!(code.contains("pub struct Cat {\n    pub name: String,\n}"));
    assert!(code.contains("pub fn new(name: String) -> Self {"));
    assert!(code.contains("inner.insert(\"name\".to_string(), json!(self.name));"));
    assert!(code.contains("document.insert(\"cat\".to_string(), Value::Object(inner));"));
}

#[test]
fn parameterized_bodies_share_resolved_types() {
    let input = input_dir();
    write_descriptor(
        input.path(),
        "query.json",
        json!({
            "query": {
                "key": "query",
                "type": "struct",
                "typeName": "Query",
                "parameters": {
                    "operator": {
                        "key": "operator",
                        "type": "enum",
                        "typeName": "Operator",
                        "options": ["and", "or"]
                    }
                },
                "one_of": [
                    {
                        "key": "match",
                        "type": "struct",
                        "typeName": "MatchQuery",
                        "childContainer": {
                            "key": "field",
                            "any_of": [
                                { "key": "query", "type": "simple", "typeName": "String", "required": true },
                                { "key": "operator", "type": "parameter" }
                            ]
                        }
                    },
                    { "key": "match_all", "type": "struct", "typeName": "MatchAllQuery" }
                ]
            }
        }),
    );

    let modules = render_from_dir(Mode::Bodies, input.path(), GeneratorConfig::default()).unwrap();
    let files: Vec<_> = modules.keys().map(String::as_str).collect();
    assert_eq!(
        files,
        vec!["match_all_query.rs", "match_query.rs", "operator.rs", "query.rs"]
    );

    let query = &modules["query.rs"];
    assert!(query.contains("pub child: Box<dyn QueryItem>,"));
    assert!(query.contains("document.insert(\"query\".to_string(), self.child.to_document());"));

    let match_query = &modules["match_query.rs"];
    assert!(match_query.contains("use super::operator::Operator;"));
    assert!(match_query.contains("pub operator: Option<Operator>,"));
    assert!(match_query.contains("container.insert(self.field.clone(), Value::Object(inner));"));

    let operator = &modules["operator.rs"];
    assert!(operator.contains("Operator::Or => \"or\","));
}

#[test]
fn endpoints_generate_one_method_per_template() {
    let input = input_dir();
    write_descriptor(
        input.path(),
        "search.json",
        json!({
            "search": {
                "documentation": "Returns documents matching a query.",
                "methods": ["GET", "POST"],
                "url": {
                    "paths": ["/_search", "/{index}/_search"],
                    "parts": {
                        "index": {
                            "type": "list",
                            "description": "A comma-separated list of index names"
                        }
                    }
                },
                "body": { "description": "The search definition" }
            }
        }),
    );

    let modules =
        render_from_dir(Mode::Endpoints, input.path(), GeneratorConfig::default()).unwrap();
    let code = &modules["search.rs"];

    assert!(code.contains("use serde_json::Value;"));
    assert!(code.contains("use crate::runtime::{HttpMethod, QueryItem, Request};"));
    assert!(code.contains("impl Request {"));
    assert!(code.contains(
        "pub fn search(method: Option<HttpMethod>, body: Option<&dyn QueryItem>) -> Self {"
    ));
    assert!(code.contains(
        "pub fn search_json(method: Option<HttpMethod>, body: Option<Value>) -> Self {"
    ));
    assert!(code.contains(
        "pub fn search_by_index(index: &[&str], method: Option<HttpMethod>, body: Option<&dyn QueryItem>) -> Self {"
    ));
    assert!(code.contains("let url = format!(\"/{}/_search\", index.join(\",\"));"));
    assert!(code.contains("/// Returns documents matching a query."));
    assert!(code.contains("/// - `method`: The http method used to execute the request"));
}

#[test]
fn fully_skipped_endpoint_produces_no_file() {
    let input = input_dir();
    write_descriptor(
        input.path(),
        "warmers.json",
        json!({
            "indices.get_warmer": {
                "documentation": "Returns warmers.",
                "methods": ["GET"],
                "url": {
                    "paths": ["/_warmers", "/{index}/_warmers"],
                    "parts": { "index": { "type": "list", "description": "Index names" } }
                }
            }
        }),
    );

    let modules =
        render_from_dir(Mode::Endpoints, input.path(), GeneratorConfig::default()).unwrap();
    assert!(modules.is_empty());
}

#[test]
fn naming_conflict_writes_nothing() {
    let input = input_dir();
    write_descriptor(
        input.path(),
        "a.json",
        json!({
            "first": {
                "key": "flag",
                "type": "enum",
                "typeName": "Flag",
                "options": ["on", "off"]
            }
        }),
    );
    write_descriptor(
        input.path(),
        "b.json",
        json!({
            "second": {
                "key": "flag",
                "type": "enum",
                "typeName": "Flag",
                "options": ["yes", "no"]
            }
        }),
    );

    let output = tempfile::tempdir().unwrap();
    let target = output.path().join("generated");
    let err = generate_from_dir(Mode::Bodies, input.path(), &target, GeneratorConfig::default())
        .unwrap_err();

    assert!(format!("{:#}", err).contains("Flag"));
    assert!(!target.exists());
}

#[test]
fn generated_files_land_in_the_output_directory() {
    let input = input_dir();
    write_descriptor(
        input.path(),
        "ping.json",
        json!({
            "ping": {
                "documentation": "Returns whether the cluster is running.",
                "methods": ["HEAD"],
                "url": { "paths": ["/"] }
            }
        }),
    );

    let output = tempfile::tempdir().unwrap();
    let config = GeneratorConfig {
        generate_mod_rs: true,
        receiver_type: "Transport".to_string(),
        ..GeneratorConfig::default()
    };
    let count = generate_from_dir(Mode::Endpoints, input.path(), output.path(), config).unwrap();

    assert_eq!(count, 2);
    let ping = fs::read_to_string(output.path().join("ping.rs")).unwrap();
    assert!(ping.contains("impl Transport {"));
    assert!(ping.contains("let method = method.unwrap_or(HttpMethod::Head);"));
    let mod_rs = fs::read_to_string(output.path().join("mod.rs")).unwrap();
    assert!(mod_rs.contains("pub mod ping;"));
}

#[test]
fn missing_input_directory_is_reported() {
    let output = tempfile::tempdir().unwrap();
    let missing = output.path().join("nope");

    let err = render_from_dir(Mode::Bodies, &missing, GeneratorConfig::default()).unwrap_err();
    assert!(format!("{:#}", err).contains("loading descriptors"));
}
