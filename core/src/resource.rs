#![deny(missing_docs)]

//! # Resource Fragments
//!
//! A [`Resource`] wraps one [`SchemaSource`] and produces its
//! `{paths, definitions}` fragment. The fragment is computed on first access
//! and frozen: later calls return the same value without walking the schema
//! again. Callers that need a regenerated fragment build a new handle.

use crate::definitions::{builtin_definitions, ModelDefinitionBuilder};
use crate::descriptor::SchemaSource;
use crate::error::AppResult;
use crate::merge::{report_collision, CollisionPolicy};
use crate::naming::definition_name;
use crate::operations::{OperationBuilder, Scope, SecurityRequirement, SUPPORTED_OPERATIONS};
use crate::parameters::{CatalogOptions, ParameterCatalog};
use crate::selection::Selection;
use crate::type_mapping::FieldKindMapper;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Settings shared by every operation of a resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceOptions {
    /// Catalog settings; must match the ones used for the root document.
    pub catalog: CatalogOptions,
    /// Security requirements attached to every operation.
    pub operation_security: Option<Vec<SecurityRequirement>>,
    /// Reaction to two models claiming the same definition name.
    pub collision_policy: CollisionPolicy,
    /// Describe the collection GET result as an array of the model.
    pub collection_array_response: bool,
}

/// The slice of the document contributed by one resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceFragment {
    /// Path items keyed by path template.
    pub paths: Map<String, Value>,
    /// Definitions keyed by name.
    pub definitions: Map<String, Value>,
}

/// A documented resource with a memoized fragment.
pub struct Resource {
    source: Arc<dyn SchemaSource>,
    options: ResourceOptions,
    extra_paths: Map<String, Value>,
    extra_definitions: Map<String, Value>,
    fragment: OnceLock<ResourceFragment>,
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("singular", &self.singular())
            .field("plural", &self.plural())
            .field("generated", &self.fragment.get().is_some())
            .finish()
    }
}

impl Resource {
    /// Creates a handle over `source`.
    pub fn new(source: impl SchemaSource + 'static) -> Self {
        Self::from_arc(Arc::new(source))
    }

    /// Creates a handle over a shared source.
    pub fn from_arc(source: Arc<dyn SchemaSource>) -> Self {
        Self {
            source,
            options: ResourceOptions::default(),
            extra_paths: Map::new(),
            extra_definitions: Map::new(),
            fragment: OnceLock::new(),
        }
    }

    /// Sets the operation options.
    pub fn with_options(mut self, options: ResourceOptions) -> Self {
        self.options = options;
        self
    }

    /// Adds a caller-defined path item. It is copied into the fragment
    /// verbatim and takes precedence over a generated path of the same name.
    pub fn with_path(mut self, path: impl Into<String>, item: Value) -> Self {
        self.extra_paths.insert(path.into(), item);
        self
    }

    /// Adds a caller-defined definition, with the same precedence rules as
    /// [`Resource::with_path`].
    pub fn with_definition(mut self, name: impl Into<String>, definition: Value) -> Self {
        self.extra_definitions.insert(name.into(), definition);
        self
    }

    /// Singular resource name.
    pub fn singular(&self) -> &str {
        self.source.singular()
    }

    /// Plural resource name.
    pub fn plural(&self) -> &str {
        self.source.plural()
    }

    /// `/<plural>`
    pub fn collection_path(&self) -> String {
        format!("/{}", self.plural())
    }

    /// `/<plural>/{id}`
    pub fn instance_path(&self) -> String {
        format!("/{}/{{id}}", self.plural())
    }

    /// Returns the fragment, generating it on first call.
    pub fn fragment(&self) -> AppResult<&ResourceFragment> {
        if let Some(fragment) = self.fragment.get() {
            return Ok(fragment);
        }
        let generated = self.generate()?;
        // A concurrent first caller may have won; either value is identical.
        Ok(self.fragment.get_or_init(|| generated))
    }

    fn generate(&self) -> AppResult<ResourceFragment> {
        let singular = self.source.singular();
        let plural = self.source.plural();

        let selection = self.source.select().and_then(Selection::parse);
        let mapper = FieldKindMapper;
        let builder = ModelDefinitionBuilder::new(&mapper, selection.as_ref())
            .with_collision_policy(self.options.collision_policy);
        let mut models = IndexMap::new();
        builder.build_into(self.source.schema(), &definition_name(singular), &mut models)?;
        for (name, model) in builtin_definitions() {
            if models.get(name).is_some_and(|existing| *existing != model) {
                report_collision(
                    self.options.collision_policy,
                    name,
                    format!(
                        "definitions/{} of resource '{}' shadows the built-in model",
                        name, singular
                    ),
                )?;
            }
            models.insert(name.to_string(), model);
        }

        let mut definitions = Map::new();
        for (name, model) in models {
            definitions.insert(name, serde_json::to_value(model)?);
        }

        let catalog = ParameterCatalog::new(self.options.catalog.clone());
        let operations = OperationBuilder::new(&catalog)
            .with_security(self.options.operation_security.as_deref())
            .with_collection_arrays(self.options.collection_array_response);

        let mut paths = Map::new();
        for (scope, verb) in SUPPORTED_OPERATIONS {
            let Some(operation) = operations.build(singular, plural, scope, verb) else {
                continue;
            };
            let path = match scope {
                Scope::Instance => self.instance_path(),
                Scope::Collection => self.collection_path(),
            };
            let item = paths
                .entry(path)
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(item) = item {
                item.insert(verb.as_str().to_string(), serde_json::to_value(operation)?);
            }
        }

        for (path, item) in &self.extra_paths {
            paths.insert(path.clone(), item.clone());
        }
        for (name, definition) in &self.extra_definitions {
            definitions.insert(name.clone(), definition.clone());
        }

        debug!(
            resource = %singular,
            paths = paths.len(),
            definitions = definitions.len(),
            "Generated resource fragment"
        );

        Ok(ResourceFragment { paths, definitions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{FieldDescriptor, ResourceDescriptor, SchemaDescriptor};
    use crate::error::AppError;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        inner: ResourceDescriptor,
        walks: Arc<AtomicUsize>,
    }

    impl SchemaSource for CountingSource {
        fn singular(&self) -> &str {
            self.inner.singular()
        }

        fn plural(&self) -> &str {
            self.inner.plural()
        }

        fn schema(&self) -> &SchemaDescriptor {
            self.walks.fetch_add(1, Ordering::SeqCst);
            self.inner.schema()
        }

        fn select(&self) -> Option<&str> {
            self.inner.select()
        }
    }

    fn vegetable() -> ResourceDescriptor {
        let schema = SchemaDescriptor::new()
            .with_field(FieldDescriptor::new("name", "text").required())
            .with_field(FieldDescriptor::new("related", "objectid").references("vegetable"))
            .with_implicit_keys();
        ResourceDescriptor::new("vegetable", schema)
    }

    #[test]
    fn test_fragment_paths_and_definitions() {
        let resource = Resource::new(vegetable());
        let fragment = resource.fragment().unwrap();

        let paths: Vec<_> = fragment.paths.keys().cloned().collect();
        assert_eq!(paths, vec!["/vegetables/{id}", "/vegetables"]);

        let instance = fragment.paths["/vegetables/{id}"].as_object().unwrap();
        let verbs: Vec<_> = instance.keys().cloned().collect();
        assert_eq!(verbs, vec!["get", "put", "delete"]);
        assert_eq!(instance["get"]["operationId"], "getVegetableById");

        let collection = fragment.paths["/vegetables"].as_object().unwrap();
        let verbs: Vec<_> = collection.keys().cloned().collect();
        assert_eq!(verbs, vec!["get", "post", "delete"]);

        let definitions: Vec<_> = fragment.definitions.keys().cloned().collect();
        assert_eq!(
            definitions,
            vec![
                "Vegetable",
                "ErrorModel",
                "ValidationError",
                "ValidationErrorProperties"
            ]
        );
        assert_eq!(fragment.definitions["Vegetable"]["required"], json!(["name"]));
    }

    #[test]
    fn test_fragment_is_memoized() {
        let walks = Arc::new(AtomicUsize::new(0));
        let resource = Resource::new(CountingSource {
            inner: vegetable(),
            walks: Arc::clone(&walks),
        });

        let first = resource.fragment().unwrap().clone();
        assert_eq!(walks.load(Ordering::SeqCst), 1);

        let second = resource.fragment().unwrap();
        assert_eq!(walks.load(Ordering::SeqCst), 1);
        assert_eq!(&first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(second).unwrap()
        );
    }

    #[test]
    fn test_caller_extensions_are_kept_verbatim() {
        let resource = Resource::new(vegetable())
            .with_path("/starkTrek", json!("enterprise"))
            .with_path(
                "/vegetables/best",
                json!({ "get": { "operationId": "getBestVegetable" } }),
            )
            .with_definition("Spook", json!({}));

        let fragment = resource.fragment().unwrap();
        assert_eq!(fragment.paths["/starkTrek"], json!("enterprise"));
        assert_eq!(
            fragment.paths["/vegetables/best"]["get"]["operationId"],
            "getBestVegetable"
        );
        assert_eq!(fragment.definitions["Spook"], json!({}));
        assert!(fragment.paths.contains_key("/vegetables/{id}"));
    }

    #[test]
    fn test_extension_overrides_generated_entry() {
        let resource =
            Resource::new(vegetable()).with_definition("ErrorModel", json!({ "type": "string" }));
        let fragment = resource.fragment().unwrap();
        assert_eq!(fragment.definitions["ErrorModel"], json!({ "type": "string" }));
    }

    #[test]
    fn test_generation_error_is_not_cached() {
        let schema = SchemaDescriptor::new().with_field(FieldDescriptor::new("shade", "rgb"));
        let resource = Resource::new(ResourceDescriptor::new("paint", schema));
        assert!(matches!(
            resource.fragment(),
            Err(AppError::UnrecognizedType { .. })
        ));
        assert!(resource.fragment().is_err());
    }

    fn validation_resource() -> ResourceDescriptor {
        let error = SchemaDescriptor::new().with_field(FieldDescriptor::new("code", "text"));
        ResourceDescriptor::new(
            "validation",
            SchemaDescriptor::new().with_field(FieldDescriptor::embedded("error", error)),
        )
    }

    #[test]
    fn test_builtin_shadowing_is_rejected_when_strict() {
        let resource = Resource::new(validation_resource()).with_options(ResourceOptions {
            collision_policy: CollisionPolicy::Reject,
            ..ResourceOptions::default()
        });
        let err = resource.fragment().unwrap_err();
        assert!(matches!(err, AppError::DefinitionCollision(_)));
        assert!(err.to_string().contains("definitions/ValidationError"));
    }

    #[test]
    fn test_builtin_wins_over_shadowing_model() {
        let resource = Resource::new(validation_resource());
        let fragment = resource.fragment().unwrap();
        assert_eq!(
            fragment.definitions["ValidationError"]["required"],
            json!(["message", "name", "kind", "path"])
        );
    }

    #[test]
    fn test_collection_array_response_option() {
        let resource = Resource::new(vegetable()).with_options(ResourceOptions {
            collection_array_response: true,
            ..ResourceOptions::default()
        });
        let fragment = resource.fragment().unwrap();
        assert_eq!(
            fragment.paths["/vegetables"]["get"]["responses"]["200"]["schema"],
            json!({ "type": "array", "items": { "$ref": "#/definitions/Vegetable" } })
        );
        assert_eq!(
            fragment.paths["/vegetables/{id}"]["get"]["responses"]["200"]["schema"],
            json!({ "$ref": "#/definitions/Vegetable" })
        );
    }

    #[test]
    fn test_operation_security_option() {
        let mut requirement = SecurityRequirement::new();
        requirement.insert("oauth".to_string(), vec!["read".to_string()]);
        let resource = Resource::new(vegetable()).with_options(ResourceOptions {
            catalog: CatalogOptions::default(),
            operation_security: Some(vec![requirement]),
            ..ResourceOptions::default()
        });

        let fragment = resource.fragment().unwrap();
        assert_eq!(
            fragment.paths["/vegetables"]["post"]["security"],
            json!([{ "oauth": ["read"] }])
        );
    }
}
