#![deny(missing_docs)]

//! # Document Validation
//!
//! Structural checks run over a generated (or hand-edited) Swagger 2.0
//! document before it is published.
//!
//! The checks cover:
//! - `swagger`, `info.title`, `info.version` and `paths` must be present.
//! - Every `#/definitions/*` and `#/parameters/*` reference must resolve.
//! - Operation ids must be unique across the document.
//! - Tag names must be unique.
//! - Every `{name}` in a path template needs a matching path parameter.

use crate::error::{AppError, AppResult};
use derive_more::Display;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

const HTTP_METHODS: [&str; 7] = ["get", "put", "post", "delete", "options", "head", "patch"];

/// A single problem found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DocumentIssue {
    /// A required member is absent or has the wrong shape.
    #[display("missing or malformed '{_0}'")]
    Missing(String),
    /// A `$ref` does not point at an existing entry.
    #[display("unresolved reference '{reference}' at {location}")]
    UnresolvedReference {
        /// The reference text.
        reference: String,
        /// JSON pointer of the object holding the reference.
        location: String,
    },
    /// Two operations share an id.
    #[display("duplicate operationId '{operation_id}' at {location}")]
    DuplicateOperationId {
        /// The repeated id.
        operation_id: String,
        /// JSON pointer of the second occurrence.
        location: String,
    },
    /// Two tags share a name.
    #[display("duplicate tag '{_0}'")]
    DuplicateTag(String),
    /// A path template variable has no path parameter.
    #[display("path parameter '{parameter}' of {location} is not declared")]
    UndeclaredPathParameter {
        /// Template variable name.
        parameter: String,
        /// JSON pointer of the operation.
        location: String,
    },
}

/// Runs every check and returns all issues found.
pub fn validate_document(doc: &Value) -> Vec<DocumentIssue> {
    let mut issues = Vec::new();
    let Some(root) = doc.as_object() else {
        issues.push(DocumentIssue::Missing("document".to_string()));
        return issues;
    };

    validate_root(root, &mut issues);
    validate_references(doc, root, "", &mut issues);
    validate_operations(root, &mut issues);
    validate_tags(root, &mut issues);
    issues
}

/// Fails with [`AppError::InvalidDocument`] listing every issue.
pub fn ensure_valid(doc: &Value) -> AppResult<()> {
    let issues = validate_document(doc);
    if issues.is_empty() {
        return Ok(());
    }
    let listed: Vec<String> = issues.iter().map(ToString::to_string).collect();
    Err(AppError::InvalidDocument(listed.join("; ")))
}

fn validate_root(root: &Map<String, Value>, issues: &mut Vec<DocumentIssue>) {
    if root.get("swagger").and_then(Value::as_str) != Some("2.0") {
        issues.push(DocumentIssue::Missing("swagger".to_string()));
    }
    let info = root.get("info");
    for field in ["title", "version"] {
        if info.and_then(|i| i.get(field)).and_then(Value::as_str).is_none() {
            issues.push(DocumentIssue::Missing(format!("info.{}", field)));
        }
    }
    if !root.get("paths").is_some_and(Value::is_object) {
        issues.push(DocumentIssue::Missing("paths".to_string()));
    }
}

fn section_has(root: &Map<String, Value>, section: &str, name: &str) -> bool {
    root.get(section)
        .and_then(Value::as_object)
        .is_some_and(|s| s.contains_key(name))
}

fn validate_references(
    node: &Value,
    root: &Map<String, Value>,
    pointer: &str,
    issues: &mut Vec<DocumentIssue>,
) {
    match node {
        Value::Object(map) => {
            if let Some(reference) = map.get("$ref").and_then(Value::as_str) {
                let resolved = if let Some(name) = reference.strip_prefix("#/definitions/") {
                    section_has(root, "definitions", name)
                } else if let Some(name) = reference.strip_prefix("#/parameters/") {
                    section_has(root, "parameters", name)
                } else {
                    // External and other local references are not followed.
                    true
                };
                if !resolved {
                    issues.push(DocumentIssue::UnresolvedReference {
                        reference: reference.to_string(),
                        location: display_pointer(pointer),
                    });
                }
            }
            for (key, child) in map {
                let child_pointer = format!("{}/{}", pointer, escape_pointer(key));
                validate_references(child, root, &child_pointer, issues);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                validate_references(child, root, &format!("{}/{}", pointer, index), issues);
            }
        }
        _ => {}
    }
}

fn validate_operations(root: &Map<String, Value>, issues: &mut Vec<DocumentIssue>) {
    let Some(paths) = root.get("paths").and_then(Value::as_object) else {
        return;
    };
    let mut seen: HashSet<&str> = HashSet::new();

    for (path, item) in paths {
        let Some(item) = item.as_object() else {
            continue;
        };
        let template_vars = template_variables(path);

        for method in HTTP_METHODS {
            let Some(operation) = item.get(method).and_then(Value::as_object) else {
                continue;
            };
            let location = format!("/paths/{}/{}", escape_pointer(path), method);

            if let Some(id) = operation.get("operationId").and_then(Value::as_str) {
                if !seen.insert(id) {
                    issues.push(DocumentIssue::DuplicateOperationId {
                        operation_id: id.to_string(),
                        location: location.clone(),
                    });
                }
            }

            let declared = declared_path_parameters(root, operation);
            for var in &template_vars {
                if !declared.contains(var.as_str()) {
                    issues.push(DocumentIssue::UndeclaredPathParameter {
                        parameter: var.clone(),
                        location: location.clone(),
                    });
                }
            }
        }
    }
}

fn declared_path_parameters<'a>(
    root: &'a Map<String, Value>,
    operation: &'a Map<String, Value>,
) -> HashSet<&'a str> {
    let shared = root.get("parameters").and_then(Value::as_object);
    let mut names = HashSet::new();
    let Some(parameters) = operation.get("parameters").and_then(Value::as_array) else {
        return names;
    };
    for parameter in parameters {
        let resolved = match parameter
            .get("$ref")
            .and_then(Value::as_str)
            .and_then(|r| r.strip_prefix("#/parameters/"))
        {
            Some(name) => shared.and_then(|s| s.get(name)),
            None => Some(parameter),
        };
        if let Some(parameter) = resolved {
            if parameter.get("in").and_then(Value::as_str) == Some("path") {
                if let Some(name) = parameter.get("name").and_then(Value::as_str) {
                    names.insert(name);
                }
            }
        }
    }
    names
}

fn validate_tags(root: &Map<String, Value>, issues: &mut Vec<DocumentIssue>) {
    let Some(tags) = root.get("tags").and_then(Value::as_array) else {
        return;
    };
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for tag in tags {
        if let Some(name) = tag.get("name").and_then(Value::as_str) {
            let count = counts.entry(name).or_insert(0);
            *count += 1;
            if *count == 2 {
                issues.push(DocumentIssue::DuplicateTag(name.to_string()));
            }
        }
    }
}

fn template_variables(path: &str) -> Vec<String> {
    path.split('{')
        .skip(1)
        .filter_map(|rest| rest.split_once('}').map(|(name, _)| name.to_string()))
        .collect()
}

fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

fn display_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn minimal() -> Value {
        json!({
            "swagger": "2.0",
            "info": { "title": "api", "version": "0.0.1" },
            "tags": [{ "name": "vegetable" }],
            "paths": {
                "/vegetables/{id}": {
                    "get": {
                        "operationId": "getVegetableById",
                        "parameters": [{ "$ref": "#/parameters/id" }],
                        "responses": {
                            "200": { "description": "ok", "schema": { "$ref": "#/definitions/Vegetable" } }
                        }
                    }
                }
            },
            "definitions": { "Vegetable": { "properties": {} } },
            "parameters": { "id": { "name": "id", "in": "path", "type": "string", "required": true } }
        })
    }

    #[test]
    fn test_valid_document() {
        assert_eq!(validate_document(&minimal()), Vec::<DocumentIssue>::new());
        assert!(ensure_valid(&minimal()).is_ok());
    }

    #[test]
    fn test_missing_root_members() {
        let issues = validate_document(&json!({ "info": {} }));
        assert_eq!(
            issues,
            vec![
                DocumentIssue::Missing("swagger".into()),
                DocumentIssue::Missing("info.title".into()),
                DocumentIssue::Missing("info.version".into()),
                DocumentIssue::Missing("paths".into()),
            ]
        );
    }

    #[test]
    fn test_unresolved_reference() {
        let mut doc = minimal();
        doc["definitions"] = json!({});
        let issues = validate_document(&doc);
        assert_eq!(
            issues,
            vec![DocumentIssue::UnresolvedReference {
                reference: "#/definitions/Vegetable".into(),
                location: "/paths/~1vegetables~1{id}/get/responses/200/schema".into(),
            }]
        );
    }

    #[test]
    fn test_duplicate_operation_id_and_tag() {
        let mut doc = minimal();
        doc["paths"]["/other/{id}"] = doc["paths"]["/vegetables/{id}"].clone();
        doc["tags"] = json!([{ "name": "vegetable" }, { "name": "vegetable" }]);

        let issues = validate_document(&doc);
        assert!(issues.contains(&DocumentIssue::DuplicateOperationId {
            operation_id: "getVegetableById".into(),
            location: "/paths/~1other~1{id}/get".into(),
        }));
        assert!(issues.contains(&DocumentIssue::DuplicateTag("vegetable".into())));
    }

    #[test]
    fn test_undeclared_path_parameter() {
        let mut doc = minimal();
        doc["paths"]["/vegetables/{id}"]["get"]["parameters"] = json!([]);
        let err = ensure_valid(&doc).unwrap_err();
        assert!(matches!(err, AppError::InvalidDocument(_)));
        assert!(err.to_string().contains("path parameter 'id'"));
    }
}
