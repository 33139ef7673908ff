#![deny(missing_docs)]

//! # Parameter Catalog
//!
//! The reusable parameters published once under the root `parameters`
//! section and referenced from operations with `#/parameters/<name>`.
//! Only the body `document` parameter depends on the resource and is
//! therefore built inline per operation.

use crate::definitions::PropertyDefinition;
use crate::naming::definition_name;
use crate::operations::Verb;
use crate::type_mapping::JsonType;
use indexmap::IndexMap;
use serde::Serialize;

/// `skip` query parameter.
pub const SKIP: &str = "skip";
/// `limit` query parameter.
pub const LIMIT: &str = "limit";
/// `count` query parameter.
pub const COUNT: &str = "count";
/// `conditions` query parameter.
pub const CONDITIONS: &str = "conditions";
/// `sort` query parameter.
pub const SORT: &str = "sort";
/// `select` query parameter.
pub const SELECT: &str = "select";
/// `populate` query parameter.
pub const POPULATE: &str = "populate";
/// `distinct` query parameter.
pub const DISTINCT: &str = "distinct";
/// `hint` query parameter.
pub const HINT: &str = "hint";
/// `comment` query parameter.
pub const COMMENT: &str = "comment";
/// `id` path parameter.
pub const ID: &str = "id";
/// Name of the inline body parameter.
pub const DOCUMENT: &str = "document";

/// Default name of the update-operator header.
pub const DEFAULT_UPDATE_OPERATOR_HEADER: &str = "X-Update-Operator";

/// Where a parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// Query string.
    Query,
    /// Path template segment.
    Path,
    /// Request header.
    Header,
    /// Request body.
    Body,
}

/// A Swagger 2.0 parameter object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterDefinition {
    /// Parameter name.
    pub name: String,
    /// Location.
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Human readable description.
    pub description: String,
    /// Primitive type (non-body parameters).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<JsonType>,
    /// Type format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Body schema (body parameters only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<PropertyDefinition>,
    /// Whether the parameter must be supplied.
    pub required: bool,
}

impl ParameterDefinition {
    fn query(name: &str, type_: JsonType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            location: ParameterLocation::Query,
            description: description.to_string(),
            type_: Some(type_),
            format: None,
            schema: None,
            required: false,
        }
    }

    fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }
}

/// Settings shaping the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogOptions {
    /// Base URL of the query-string documentation. When set, query parameter
    /// descriptions link to `<url>#<name>`.
    pub docs_url: Option<String>,
    /// Header carrying the raw update operator on PUT.
    pub update_operator_header: String,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            docs_url: None,
            update_operator_header: DEFAULT_UPDATE_OPERATOR_HEADER.to_string(),
        }
    }
}

/// Builds catalog entries.
#[derive(Debug, Clone, Default)]
pub struct ParameterCatalog {
    options: CatalogOptions,
}

impl ParameterCatalog {
    /// Creates a catalog with the given options.
    pub fn new(options: CatalogOptions) -> Self {
        Self { options }
    }

    /// Name of the update-operator header parameter.
    pub fn update_operator_header(&self) -> &str {
        &self.options.update_operator_header
    }

    /// The shared parameters, keyed by name, in publication order.
    pub fn shared(&self) -> IndexMap<String, ParameterDefinition> {
        let query = [
            ParameterDefinition::query(SKIP, JsonType::Integer, "How many documents to skip.")
                .with_format("int32"),
            ParameterDefinition::query(
                LIMIT,
                JsonType::Integer,
                "The maximum number of documents to send.",
            )
            .with_format("int32"),
            ParameterDefinition::query(
                COUNT,
                JsonType::Boolean,
                "Set to true to return count instead of documents.",
            ),
            ParameterDefinition::query(
                CONDITIONS,
                JsonType::String,
                "Set the conditions used to find or remove the document(s).",
            ),
            ParameterDefinition::query(SORT, JsonType::String, "Set the fields by which to sort."),
            ParameterDefinition::query(
                SELECT,
                JsonType::String,
                "Select which paths will be returned by the query.",
            ),
            ParameterDefinition::query(
                POPULATE,
                JsonType::String,
                "Specify which paths to populate.",
            ),
            ParameterDefinition::query(
                DISTINCT,
                JsonType::String,
                "Set to a path name to retrieve an array of distinct values.",
            ),
            ParameterDefinition::query(
                HINT,
                JsonType::String,
                "Add an index hint to the query (must be enabled per resource).",
            ),
            ParameterDefinition::query(
                COMMENT,
                JsonType::String,
                "Add a comment to a query (must be enabled per resource).",
            ),
        ];

        let mut catalog = IndexMap::new();
        for mut param in query {
            if let Some(url) = &self.options.docs_url {
                param.description = format!("{} [doc]({}#{})", param.description, url, param.name);
            }
            catalog.insert(param.name.clone(), param);
        }

        catalog.insert(
            ID.to_string(),
            ParameterDefinition {
                name: ID.to_string(),
                location: ParameterLocation::Path,
                description: "The identifier of the resource.".to_string(),
                type_: Some(JsonType::String),
                format: None,
                schema: None,
                required: true,
            },
        );

        let header = self.update_operator_header().to_string();
        catalog.insert(
            header.clone(),
            ParameterDefinition {
                name: header,
                location: ParameterLocation::Header,
                description: "**BYPASSES VALIDATION** May be used with PUT to update the document using $push, $pull, or $set.".to_string(),
                type_: Some(JsonType::String),
                format: None,
                schema: None,
                required: false,
            },
        );

        catalog
    }

    /// The inline body parameter for creating (POST) or updating (PUT) a
    /// document of the resource named `singular`.
    pub fn document(&self, singular: &str, verb: Verb) -> ParameterDefinition {
        let description = if verb == Verb::Post {
            "Create a document by sending the paths to be updated in the request body."
        } else {
            "Update a document by sending the paths to be updated in the request body."
        };
        ParameterDefinition {
            name: DOCUMENT.to_string(),
            location: ParameterLocation::Body,
            description: description.to_string(),
            type_: None,
            format: None,
            schema: Some(PropertyDefinition::reference(&definition_name(singular))),
            required: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_shared_catalog_entries() {
        let catalog = ParameterCatalog::default().shared();
        let names: Vec<_> = catalog.keys().cloned().collect();
        assert_eq!(
            names,
            vec![
                "skip",
                "limit",
                "count",
                "conditions",
                "sort",
                "select",
                "populate",
                "distinct",
                "hint",
                "comment",
                "id",
                "X-Update-Operator"
            ]
        );

        let skip = serde_json::to_value(&catalog["skip"]).unwrap();
        assert_eq!(
            skip,
            json!({
                "name": "skip",
                "in": "query",
                "description": "How many documents to skip.",
                "type": "integer",
                "format": "int32",
                "required": false
            })
        );

        let id = &catalog["id"];
        assert_eq!(id.location, ParameterLocation::Path);
        assert!(id.required);

        let header = &catalog["X-Update-Operator"];
        assert_eq!(header.location, ParameterLocation::Header);
        assert!(!header.required);
    }

    #[test]
    fn test_docs_url_links_query_parameters() {
        let catalog = ParameterCatalog::new(CatalogOptions {
            docs_url: Some("https://docs.example.com/query".into()),
            update_operator_header: "X-Patch-Operator".into(),
        })
        .shared();

        assert_eq!(
            catalog["limit"].description,
            "The maximum number of documents to send. [doc](https://docs.example.com/query#limit)"
        );
        assert_eq!(catalog["id"].description, "The identifier of the resource.");
        assert!(catalog.contains_key("X-Patch-Operator"));
    }

    #[test]
    fn test_document_parameter() {
        let catalog = ParameterCatalog::default();
        let update = serde_json::to_value(catalog.document("vegetable", Verb::Put)).unwrap();
        assert_eq!(
            update,
            json!({
                "name": "document",
                "in": "body",
                "description": "Update a document by sending the paths to be updated in the request body.",
                "schema": { "$ref": "#/definitions/Vegetable" },
                "required": true
            })
        );

        let create = catalog.document("vegetable", Verb::Post);
        assert!(create.description.starts_with("Create a document"));
    }
}
