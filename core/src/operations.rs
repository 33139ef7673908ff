#![deny(missing_docs)]

//! # Operation Builder
//!
//! Builds one Swagger operation object per supported (scope × verb) pair:
//!
//! | path | verbs |
//! |---|---|
//! | `/<plural>/{id}` | get, put, delete |
//! | `/<plural>` | get, post, delete |

use crate::definitions::{PropertyDefinition, ERROR_MODEL, VALIDATION_ERROR};
use crate::naming::{capitalize, definition_name, parameter_ref};
use crate::parameters::{
    ParameterCatalog, ParameterDefinition, COMMENT, CONDITIONS, COUNT, DISTINCT, HINT, ID, LIMIT,
    POPULATE, SELECT, SKIP, SORT,
};
use indexmap::IndexMap;
use serde::Serialize;

/// Whether an operation targets one document or a query over many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// `/<plural>/{id}`
    Instance,
    /// `/<plural>`
    Collection,
}

/// HTTP verb of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// GET
    Get,
    /// PUT
    Put,
    /// POST
    Post,
    /// DELETE
    Delete,
}

impl Verb {
    /// Lower-case key used in the path item.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Put => "put",
            Verb::Post => "post",
            Verb::Delete => "delete",
        }
    }

    /// Verbs that carry a document and may fail validation.
    pub fn is_mutating(&self) -> bool {
        matches!(self, Verb::Put | Verb::Post)
    }
}

/// The six operations every resource exposes, in path-item order.
pub const SUPPORTED_OPERATIONS: [(Scope, Verb); 6] = [
    (Scope::Instance, Verb::Get),
    (Scope::Instance, Verb::Put),
    (Scope::Instance, Verb::Delete),
    (Scope::Collection, Verb::Get),
    (Scope::Collection, Verb::Post),
    (Scope::Collection, Verb::Delete),
];

/// A security requirement object: scheme name -> scopes.
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

/// An entry of an operation's `parameters` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParameterEntry {
    /// Pointer into the shared catalog.
    Reference {
        /// `#/parameters/<name>`
        #[serde(rename = "$ref")]
        reference: String,
    },
    /// A parameter defined in place.
    Inline(ParameterDefinition),
}

impl ParameterEntry {
    fn shared(name: &str) -> Self {
        ParameterEntry::Reference {
            reference: parameter_ref(name),
        }
    }
}

/// A response object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseDefinition {
    /// Human readable description.
    pub description: String,
    /// Body schema.
    pub schema: PropertyDefinition,
}

impl ResponseDefinition {
    fn new(description: impl Into<String>, schema: PropertyDefinition) -> Self {
        Self {
            description: description.into(),
            schema,
        }
    }
}

/// A Swagger operation object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationDefinition {
    /// Grouping tags; the resource's singular name.
    pub tags: Vec<String>,
    /// Document-wide unique identifier.
    #[serde(rename = "operationId")]
    pub operation_id: String,
    /// One-line summary.
    pub summary: String,
    /// Longer description.
    pub description: String,
    /// Parameters (catalog references plus the inline body).
    pub parameters: Vec<ParameterEntry>,
    /// Responses keyed by status code or `default`.
    pub responses: IndexMap<String, ResponseDefinition>,
    /// Security requirements, only when configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,
}

/// Builds operation objects for a resource.
pub struct OperationBuilder<'a> {
    catalog: &'a ParameterCatalog,
    security: Option<&'a [SecurityRequirement]>,
    collection_arrays: bool,
}

impl<'a> OperationBuilder<'a> {
    /// Creates a builder emitting no security requirements.
    pub fn new(catalog: &'a ParameterCatalog) -> Self {
        Self {
            catalog,
            security: None,
            collection_arrays: false,
        }
    }

    /// Attaches the given requirements to every operation.
    pub fn with_security(mut self, security: Option<&'a [SecurityRequirement]>) -> Self {
        self.security = security;
        self
    }

    /// Describes the collection GET result as an array of the model instead
    /// of a single model reference.
    pub fn with_collection_arrays(mut self, enabled: bool) -> Self {
        self.collection_arrays = enabled;
        self
    }

    /// Builds the operation, or `None` for a pair outside
    /// [`SUPPORTED_OPERATIONS`].
    pub fn build(
        &self,
        singular: &str,
        plural: &str,
        scope: Scope,
        verb: Verb,
    ) -> Option<OperationDefinition> {
        let (operation_id, summary, description) = describe(singular, plural, scope, verb)?;
        Some(OperationDefinition {
            tags: vec![singular.to_string()],
            operation_id,
            summary,
            description,
            parameters: self.parameters(singular, scope, verb),
            responses: self.responses(singular, plural, scope, verb),
            security: self.security.map(<[SecurityRequirement]>::to_vec),
        })
    }

    fn parameters(&self, singular: &str, scope: Scope, verb: Verb) -> Vec<ParameterEntry> {
        let mut names = vec![SELECT, POPULATE];
        match scope {
            Scope::Instance => {
                names.push(ID);
                if verb == Verb::Put {
                    names.push(self.catalog.update_operator_header());
                }
            }
            Scope::Collection => {
                names.extend([SKIP, LIMIT, COUNT, CONDITIONS, SORT, DISTINCT, HINT, COMMENT]);
            }
        }

        let mut parameters: Vec<ParameterEntry> =
            names.into_iter().map(ParameterEntry::shared).collect();
        if verb.is_mutating() {
            parameters.push(ParameterEntry::Inline(
                self.catalog.document(singular, verb),
            ));
        }
        parameters
    }

    fn responses(
        &self,
        singular: &str,
        plural: &str,
        scope: Scope,
        verb: Verb,
    ) -> IndexMap<String, ResponseDefinition> {
        let model = PropertyDefinition::reference(&definition_name(singular));
        let success = if self.collection_arrays && scope == Scope::Collection && verb == Verb::Get {
            ResponseDefinition::new(
                "Successful response. Array of resources.",
                PropertyDefinition::array_of(model),
            )
        } else {
            ResponseDefinition::new("Successful response. Single resource.", model)
        };
        let not_found = match scope {
            Scope::Instance => format!("No {} was found with that ID.", singular),
            Scope::Collection => format!("No {} matched that query.", plural),
        };

        let mut responses = IndexMap::new();
        responses.insert(
            "default".to_string(),
            ResponseDefinition::new(
                "Unexpected error.",
                PropertyDefinition::reference(ERROR_MODEL),
            ),
        );
        responses.insert("200".to_string(), success);
        responses.insert(
            "404".to_string(),
            ResponseDefinition::new(not_found, PropertyDefinition::reference(ERROR_MODEL)),
        );
        if verb.is_mutating() {
            responses.insert(
                "422".to_string(),
                ResponseDefinition::new(
                    "Validation error.",
                    PropertyDefinition::array_of(PropertyDefinition::reference(VALIDATION_ERROR)),
                ),
            );
        }
        responses
    }
}

fn describe(
    singular: &str,
    plural: &str,
    scope: Scope,
    verb: Verb,
) -> Option<(String, String, String)> {
    let key = capitalize(singular);
    let described = match (scope, verb) {
        (Scope::Instance, Verb::Get) => (
            format!("get{}ById", key),
            format!("Get a {} by its unique ID", singular),
            format!("Retrieve a {} by its ID.", singular),
        ),
        (Scope::Instance, Verb::Put) => (
            format!("update{}", key),
            format!("Modify a {} by its unique ID", singular),
            format!("Update an existing {} by its ID.", singular),
        ),
        (Scope::Instance, Verb::Delete) => (
            format!("delete{}ById", key),
            format!("Delete a {} by its unique ID", singular),
            format!("Deletes an existing {} by its ID.", singular),
        ),
        (Scope::Collection, Verb::Get) => (
            format!("query{}", key),
            format!("Query some {}", plural),
            format!("Query over {}.", plural),
        ),
        (Scope::Collection, Verb::Post) => (
            format!("create{}", key),
            format!("Create some {}", plural),
            format!("Create one or more {}.", plural),
        ),
        (Scope::Collection, Verb::Delete) => (
            format!("delete{}ByQuery", key),
            format!("Delete some {} by query", plural),
            format!("Delete all {} matching the specified query.", plural),
        ),
        (Scope::Instance, Verb::Post) | (Scope::Collection, Verb::Put) => return None,
    };
    Some(described)
}
