use crud_swagger::{
    validate_document, ApiConfig, AppError, DocumentCache, DocumentOptions, FieldDescriptor,
    FieldKind, Resource, ResourceDescriptor, ResourceRegistry, SchemaDescriptor,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::HashSet;

const GREENHOUSE: &str = r#"
extensions:
  host: api.acme.com:8012
  x-powered-by: crud-swagger
resources:
  - singular: vegetable
    implicit_keys: true
    fields:
      - { name: name, type: text, required: true }
      - { name: diseases, type: "[text]", select: false }
      - { name: species, type: text, select: false }
      - { name: related, type: objectid, ref: vegetable }
    paths:
      /starkTrek:
        get: { operationId: enterprise }
    definitions:
      Spook: {}
  - singular: fungus
    plural: fungi
    select: "-hyphenated-field-name -password"
    implicit_keys: true
    fields:
      - { name: dork, type: boolean }
      - { name: hyphenated-field-name, type: text }
      - { name: password, type: text }
  - singular: goose
    plural: geese
    implicit_keys: true
    fields:
      - { name: cooked, type: boolean }
      - name: stuffed
        type: embedded
        schema:
          - { name: bread, type: boolean }
"#;

fn greenhouse() -> Value {
    ApiConfig::from_yaml_str(GREENHOUSE)
        .unwrap()
        .into_cache()
        .unwrap()
        .versioned(None, "/api/swagger.json")
        .unwrap()
        .into_value()
}

fn property_names(definition: &Value) -> Vec<String> {
    definition["properties"]
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect()
}

#[test]
fn test_header() {
    let body = greenhouse();
    assert_eq!(body["swagger"], "2.0");
    assert_eq!(body["info"]["version"], "0.0.1");
    assert_eq!(body["basePath"], "/api");
    assert_eq!(body["host"], "api.acme.com:8012");
    assert_eq!(body["x-powered-by"], "crud-swagger");
    assert_eq!(body["schemes"], json!(["http", "https"]));
    assert_eq!(body["consumes"], json!(["application/json"]));
    assert_eq!(body["produces"], json!(["application/json", "text/html"]));
    assert!(body.get("security").is_none());
    assert!(body.get("securityDefinitions").is_none());

    let tags: Vec<_> = body["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(tags, vec!["vegetable", "fungus", "goose"]);
    assert_eq!(body["tags"][1]["description"], "Fungus resource.");
    assert_eq!(body["tags"][1]["x-resource"], true);
}

#[test]
fn test_operations() {
    let body = greenhouse();
    let instance = &body["paths"]["/vegetables/{id}"];
    let collection = &body["paths"]["/vegetables"];

    let expected = [
        (instance, "get", "getVegetableById", "Get a vegetable by its unique ID", "Retrieve a vegetable by its ID."),
        (instance, "put", "updateVegetable", "Modify a vegetable by its unique ID", "Update an existing vegetable by its ID."),
        (instance, "delete", "deleteVegetableById", "Delete a vegetable by its unique ID", "Deletes an existing vegetable by its ID."),
        (collection, "get", "queryVegetable", "Query some vegetables", "Query over vegetables."),
        (collection, "post", "createVegetable", "Create some vegetables", "Create one or more vegetables."),
        (collection, "delete", "deleteVegetableByQuery", "Delete some vegetables by query", "Delete all vegetables matching the specified query."),
    ];
    for (item, verb, id, summary, description) in expected {
        let operation = &item[verb];
        assert_eq!(operation["operationId"], id);
        assert_eq!(operation["summary"], summary);
        assert_eq!(operation["description"], description);
        assert_eq!(operation["tags"], json!(["vegetable"]));
        assert!(operation.get("security").is_none());
    }

    assert!(instance.get("post").is_none());
    assert!(collection.get("put").is_none());
    assert!(body["paths"].get("/fungi/{id}").is_some());
    assert!(body["paths"].get("/geese").is_some());
}

#[test]
fn test_model_definitions() {
    let body = greenhouse();
    let definitions = &body["definitions"];

    let vegetable = &definitions["Vegetable"];
    assert_eq!(vegetable["required"], json!(["name"]));
    assert_eq!(property_names(vegetable), vec!["name", "related", "_id", "__v", "id"]);
    assert_eq!(vegetable["properties"]["related"]["$ref"], "#/definitions/Vegetable");
    assert_eq!(vegetable["properties"]["_id"], json!({ "type": "string" }));
    assert_eq!(
        vegetable["properties"]["__v"],
        json!({ "type": "number", "format": "int32" })
    );

    let fungus = &definitions["Fungus"];
    assert!(fungus.get("required").is_none());
    assert_eq!(property_names(fungus), vec!["dork", "_id", "__v", "id"]);

    let goose = &definitions["Goose"];
    assert_eq!(property_names(goose), vec!["cooked", "stuffed", "_id", "__v", "id"]);
    assert_eq!(
        goose["properties"]["stuffed"],
        json!({ "type": "array", "items": { "$ref": "#/definitions/GooseStuffed" } })
    );
    assert_eq!(property_names(&definitions["GooseStuffed"]), vec!["bread", "_id", "id"]);

    assert_eq!(
        definitions["ValidationError"]["required"],
        json!(["message", "name", "kind", "path"])
    );
    assert_eq!(
        definitions["ValidationError"]["properties"]["properties"]["$ref"],
        "#/definitions/ValidationErrorProperties"
    );
    assert_eq!(
        definitions["ValidationErrorProperties"]["required"],
        json!(["type", "message", "path"])
    );
    assert_eq!(definitions["ErrorModel"]["required"], json!(["code", "message"]));
}

#[test]
fn test_extensions_survive() {
    let body = greenhouse();
    assert_eq!(body["paths"]["/starkTrek"]["get"]["operationId"], "enterprise");
    assert_eq!(body["definitions"]["Spook"], json!({}));
}

#[test]
fn test_parameter_catalog_usage() {
    let body = greenhouse();
    let parameters = body["parameters"].as_object().unwrap();
    for name in ["skip", "limit", "count", "conditions", "sort", "select", "populate", "distinct", "hint", "comment", "id", "X-Update-Operator"] {
        assert!(parameters.contains_key(name), "missing parameter {}", name);
    }

    let put = &body["paths"]["/vegetables/{id}"]["put"]["parameters"];
    let last = put.as_array().unwrap().last().unwrap();
    assert_eq!(last["in"], "body");
    assert_eq!(last["schema"]["$ref"], "#/definitions/Vegetable");
    assert!(put
        .as_array()
        .unwrap()
        .contains(&json!({ "$ref": "#/parameters/X-Update-Operator" })));

    for path in ["/vegetables", "/vegetables/{id}"] {
        for (verb, operation) in body["paths"][path].as_object().unwrap() {
            assert_eq!(
                operation["responses"]["200"],
                json!({
                    "description": "Successful response. Single resource.",
                    "schema": { "$ref": "#/definitions/Vegetable" }
                }),
                "{} {}",
                verb,
                path
            );
        }
    }

    let query = &body["paths"]["/vegetables"]["get"];
    assert!(query["responses"].get("422").is_none());
    assert_eq!(
        body["paths"]["/vegetables"]["post"]["responses"]["422"]["schema"]["items"]["$ref"],
        "#/definitions/ValidationError"
    );
}

#[test]
fn test_references_resolve_and_ids_are_unique() {
    let body = greenhouse();
    let issues = validate_document(&body);
    assert!(issues.is_empty(), "{:?}", issues);

    let mut seen = HashSet::new();
    for item in body["paths"].as_object().unwrap().values() {
        for operation in item.as_object().unwrap().values() {
            if let Some(id) = operation.get("operationId").and_then(Value::as_str) {
                assert!(seen.insert(id.to_string()), "duplicate {}", id);
            }
        }
    }
    assert_eq!(seen.len(), 19);
}

#[test]
fn test_scalar_arrays() {
    let schema = SchemaDescriptor::new()
        .with_field(FieldDescriptor::new("name", "text"))
        .with_field(FieldDescriptor::new("zipCodes", "[text]"))
        .with_field(FieldDescriptor::new("radii", "[number]"))
        .with_field(FieldDescriptor::new(
            "vendors",
            FieldKind::array_of(FieldKind::ObjectId),
        ))
        .with_implicit_keys();
    let registry = ResourceRegistry::default().with_resource(Resource::new(
        ResourceDescriptor::new("ChargeArea", schema).with_plural("chargeAreas"),
    ));
    let cache = DocumentCache::new(registry, DocumentOptions::default());
    let body = cache.versioned(None, "/swagger.json").unwrap().into_value();

    let properties = &body["definitions"]["ChargeArea"]["properties"];
    assert_eq!(properties["zipCodes"], json!({ "type": "array", "items": { "type": "string" } }));
    assert_eq!(properties["radii"], json!({ "type": "array", "items": { "type": "number" } }));
    assert_eq!(properties["vendors"], json!({ "type": "array", "items": { "type": "string" } }));
    assert_eq!(body["paths"]["/chargeAreas/{id}"]["get"]["operationId"], "getChargeAreaById");
}

fn validation_cache(options: DocumentOptions) -> DocumentCache {
    let error = SchemaDescriptor::new().with_field(FieldDescriptor::new("code", "text"));
    let schema = SchemaDescriptor::new().with_field(FieldDescriptor::embedded("error", error));
    let resource = Resource::new(ResourceDescriptor::new("validation", schema))
        .with_options(options.resource_options());
    DocumentCache::new(ResourceRegistry::default().with_resource(resource), options)
}

#[test]
fn test_model_shadowing_builtin_definition() {
    let strict = validation_cache(DocumentOptions::default().with_strict_definitions(true));
    assert!(matches!(
        strict.versioned(None, "/swagger.json"),
        Err(AppError::DefinitionCollision(_))
    ));

    let lenient = validation_cache(DocumentOptions::default());
    let body = lenient.versioned(None, "/swagger.json").unwrap().into_value();
    assert_eq!(
        property_names(&body["definitions"]["ValidationError"]),
        vec!["properties", "message", "name", "kind", "path"]
    );
    assert_eq!(
        body["definitions"]["Validation"]["properties"]["error"]["items"]["$ref"],
        "#/definitions/ValidationError"
    );
}
