#![deny(missing_docs)]

//! # Root Document
//!
//! Assembles the complete Swagger 2.0 document from a set of resources and
//! derives per-release copies of it. The root is a plain JSON map so callers
//! can attach arbitrary top-level extensions (`host`, `x-*` keys) that every
//! derived copy carries along.

use crate::error::AppResult;
use crate::merge::{
    merge_fragment, merge_section, CollisionPolicy, FragmentAccumulator, DEFINITIONS, PATHS,
};
use crate::naming::capitalize;
use crate::operations::SecurityRequirement;
use crate::parameters::{CatalogOptions, ParameterCatalog};
use crate::resource::{Resource, ResourceOptions};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

/// Swagger version written to the `swagger` member.
pub const SWAGGER_VERSION: &str = "2.0";

/// Document-wide settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentOptions {
    /// `info.title`
    pub title: String,
    /// `info.description`
    pub description: String,
    /// `info.version` of the root document.
    pub version: String,
    /// `basePath` of the root document; omitted when `None`.
    pub base_path: Option<String>,
    /// Transfer protocols.
    pub schemes: Vec<String>,
    /// Accepted request media types.
    pub consumes: Vec<String>,
    /// Produced response media types.
    pub produces: Vec<String>,
    /// Root `securityDefinitions`.
    pub security_definitions: Option<Map<String, Value>>,
    /// Root `security` requirements.
    pub security: Option<Vec<SecurityRequirement>>,
    /// Requirements attached to each operation.
    pub operation_security: Option<Vec<SecurityRequirement>>,
    /// Catalog settings.
    pub catalog: CatalogOptions,
    /// Fail instead of warning when two models claim the same definition.
    pub strict_definitions: bool,
    /// Describe the collection GET result as an array of the model.
    pub collection_array_response: bool,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            title: "api".to_string(),
            description: "Generated API documentation.".to_string(),
            version: "0.0.1".to_string(),
            base_path: None,
            schemes: vec!["http".to_string(), "https".to_string()],
            consumes: vec!["application/json".to_string()],
            produces: vec!["application/json".to_string(), "text/html".to_string()],
            security_definitions: None,
            security: None,
            operation_security: None,
            catalog: CatalogOptions::default(),
            strict_definitions: false,
            collection_array_response: false,
        }
    }
}

impl DocumentOptions {
    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the root version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets the root base path.
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    /// Enables strict collision checks.
    pub fn with_strict_definitions(mut self, strict: bool) -> Self {
        self.strict_definitions = strict;
        self
    }

    /// Switches the collection GET result to an array of the model.
    pub fn with_collection_array_response(mut self, enabled: bool) -> Self {
        self.collection_array_response = enabled;
        self
    }

    /// Options to hand to every [`Resource`] so its operations agree with
    /// the root catalog.
    pub fn resource_options(&self) -> ResourceOptions {
        ResourceOptions {
            catalog: self.catalog.clone(),
            operation_security: self.operation_security.clone(),
            collision_policy: self.collision_policy(),
            collection_array_response: self.collection_array_response,
        }
    }

    fn collision_policy(&self) -> CollisionPolicy {
        if self.strict_definitions {
            CollisionPolicy::Reject
        } else {
            CollisionPolicy::Warn
        }
    }
}

/// A generated Swagger 2.0 document.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct RootDocument(Map<String, Value>);

impl RootDocument {
    /// Wraps an existing map.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Read access to the top-level members.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Looks up a top-level member.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Sets a top-level member, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Adds or replaces a path item.
    pub fn insert_path(&mut self, path: impl Into<String>, item: Value) {
        let mut entry = Map::new();
        entry.insert(path.into(), item);
        merge_section(&mut self.0, PATHS, &entry);
    }

    /// Adds or replaces a definition.
    pub fn insert_definition(&mut self, name: impl Into<String>, definition: Value) {
        let mut entry = Map::new();
        entry.insert(name.into(), definition);
        merge_section(&mut self.0, DEFINITIONS, &entry);
    }

    /// Clones the document into a JSON value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Consumes the document into a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Produces the document for one release.
    ///
    /// The copy keeps every member of `self`, overwrites `info.version` and
    /// `basePath`, then merges the fragments of `visible` on top. Later
    /// resources win when two fragments disagree.
    pub fn derive_versioned(
        &self,
        version: &str,
        visible: &[&Resource],
        base_path: &str,
    ) -> AppResult<RootDocument> {
        let mut copy = self.0.clone();

        let info = copy
            .entry("info".to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !info.is_object() {
            *info = Value::Object(Map::new());
        }
        if let Value::Object(info) = info {
            info.insert("version".to_string(), json!(version));
        }
        copy.insert("basePath".to_string(), json!(base_path));

        let mut accumulator = FragmentAccumulator::new(CollisionPolicy::Overwrite);
        for resource in visible {
            accumulator.push(resource.singular(), resource.fragment()?)?;
        }
        merge_fragment(&mut copy, &accumulator.finish());

        debug!(
            version = %version,
            base_path = %base_path,
            resources = visible.len(),
            "Derived versioned document"
        );
        Ok(RootDocument(copy))
    }
}

/// The tag advertised for a resource.
pub fn resource_tag(singular: &str) -> Value {
    json!({
        "name": singular,
        "description": format!("{} resource.", capitalize(singular)),
        "x-resource": true
    })
}

/// Builds the root document from `resources` in order.
pub fn generate_root<'a, I>(resources: I, options: &DocumentOptions) -> AppResult<RootDocument>
where
    I: IntoIterator<Item = &'a Resource>,
{
    let resources: Vec<&Resource> = resources.into_iter().collect();

    let mut accumulator = FragmentAccumulator::new(options.collision_policy());
    for resource in &resources {
        accumulator.push(resource.singular(), resource.fragment()?)?;
    }
    let merged = accumulator.finish();

    let mut parameters = Map::new();
    for (name, parameter) in ParameterCatalog::new(options.catalog.clone()).shared() {
        parameters.insert(name, serde_json::to_value(parameter)?);
    }

    let mut doc = Map::new();
    doc.insert("swagger".to_string(), json!(SWAGGER_VERSION));
    doc.insert(
        "info".to_string(),
        json!({
            "title": options.title,
            "version": options.version,
            "description": options.description
        }),
    );
    if let Some(base_path) = &options.base_path {
        doc.insert("basePath".to_string(), json!(base_path));
    }
    doc.insert(
        "tags".to_string(),
        Value::Array(resources.iter().map(|r| resource_tag(r.singular())).collect()),
    );
    doc.insert("schemes".to_string(), json!(options.schemes));
    doc.insert("consumes".to_string(), json!(options.consumes));
    doc.insert("produces".to_string(), json!(options.produces));
    doc.insert(PATHS.to_string(), Value::Object(merged.paths));
    doc.insert(DEFINITIONS.to_string(), Value::Object(merged.definitions));
    doc.insert("parameters".to_string(), Value::Object(parameters));
    if let Some(definitions) = &options.security_definitions {
        doc.insert(
            "securityDefinitions".to_string(),
            Value::Object(definitions.clone()),
        );
    }
    if let Some(security) = &options.security {
        doc.insert("security".to_string(), serde_json::to_value(security)?);
    }

    info!(resources = resources.len(), "Generated root document");
    Ok(RootDocument(doc))
}

/// Computes a base path by dropping the last `extra` segments of the
/// request path. The result always starts with `/`.
pub fn base_path_from_request(path: &str, extra: usize) -> String {
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let keep = segments.len().saturating_sub(extra);
    segments.truncate(keep);
    format!("/{}", segments.join("/"))
}
