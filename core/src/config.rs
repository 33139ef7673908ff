#![deny(missing_docs)]

//! # Configuration
//!
//! File-based description of an API: document settings, releases and the
//! resources with their fields. Files are YAML unless they end in `.json`.
//!
//! ```yaml
//! info:
//!   title: vegetables
//! releases: ["0.0.1", "0.1.0"]
//! extensions:
//!   host: api.example.com
//! resources:
//!   - singular: vegetable
//!     implicit_keys: true
//!     fields:
//!       - { name: name, type: text, required: true }
//!       - { name: related, type: objectid, ref: vegetable }
//! ```

use crate::cache::DocumentCache;
use crate::descriptor::{ResourceDescriptor, SchemaDescriptor};
use crate::document::DocumentOptions;
use crate::error::AppResult;
use crate::operations::SecurityRequirement;
use crate::parameters::CatalogOptions;
use crate::registry::{ResourceRegistry, DEFAULT_RELEASE};
use crate::resource::Resource;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::debug;

/// `info` block.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct InfoConfig {
    /// Document title.
    pub title: Option<String>,
    /// Document description.
    pub description: Option<String>,
}

/// One resource entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResourceConfig {
    /// Singular name.
    pub singular: String,
    /// Plural name; `singular + "s"` when absent.
    #[serde(default)]
    pub plural: Option<String>,
    /// Visibility directive.
    #[serde(default)]
    pub select: Option<String>,
    /// Releases the resource belongs to; all when empty.
    #[serde(default)]
    pub versions: Vec<String>,
    /// Add `_id`, `__v` and the virtual `id`.
    #[serde(default)]
    pub implicit_keys: bool,
    /// Declared fields.
    #[serde(default)]
    pub fields: SchemaDescriptor,
    /// Caller-defined path items.
    #[serde(default)]
    pub paths: Map<String, Value>,
    /// Caller-defined definitions.
    #[serde(default)]
    pub definitions: Map<String, Value>,
}

impl ResourceConfig {
    /// Builds the resource handle.
    pub fn to_resource(&self, options: &DocumentOptions) -> Resource {
        let schema = if self.implicit_keys {
            self.fields.clone().with_implicit_keys()
        } else {
            self.fields.clone()
        };
        let mut descriptor = ResourceDescriptor::new(&self.singular, schema);
        if let Some(plural) = &self.plural {
            descriptor = descriptor.with_plural(plural);
        }
        if let Some(select) = &self.select {
            descriptor = descriptor.with_select(select);
        }

        let mut resource = Resource::new(descriptor).with_options(options.resource_options());
        for (path, item) in &self.paths {
            resource = resource.with_path(path, item.clone());
        }
        for (name, definition) in &self.definitions {
            resource = resource.with_definition(name, definition.clone());
        }
        resource
    }
}

/// Whole-API configuration.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// `info` block.
    pub info: InfoConfig,
    /// Releases, oldest first.
    pub releases: Vec<String>,
    /// Root `basePath`.
    pub base_path: Option<String>,
    /// Overrides the default schemes.
    pub schemes: Option<Vec<String>>,
    /// Overrides the default request media types.
    pub consumes: Option<Vec<String>>,
    /// Overrides the default response media types.
    pub produces: Option<Vec<String>>,
    /// Base URL of the query-string documentation.
    pub query_docs_url: Option<String>,
    /// Name of the update-operator header.
    pub update_operator_header: Option<String>,
    /// Fail on conflicting definitions.
    pub strict_definitions: bool,
    /// Describe the collection GET result as an array of the model.
    pub collection_array_response: bool,
    /// Root `securityDefinitions`.
    pub security_definitions: Option<Map<String, Value>>,
    /// Root `security`.
    pub security: Option<Vec<SecurityRequirement>>,
    /// Per-operation `security`.
    pub operation_security: Option<Vec<SecurityRequirement>>,
    /// Extra root members such as `host` or `x-*` keys.
    pub extensions: Map<String, Value>,
    /// Documented resources.
    pub resources: Vec<ResourceConfig>,
}

impl ApiConfig {
    /// Loads a configuration file.
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        debug!(path = %path.display(), json = is_json, "Loading configuration");
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Parses YAML.
    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parses JSON.
    pub fn from_json_str(content: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Document options derived from this configuration.
    pub fn document_options(&self) -> DocumentOptions {
        let defaults = DocumentOptions::default();
        let mut catalog = CatalogOptions {
            docs_url: self.query_docs_url.clone(),
            ..CatalogOptions::default()
        };
        if let Some(header) = &self.update_operator_header {
            catalog.update_operator_header = header.clone();
        }
        DocumentOptions {
            title: self.info.title.clone().unwrap_or(defaults.title),
            description: self.info.description.clone().unwrap_or(defaults.description),
            version: self
                .releases
                .first()
                .cloned()
                .unwrap_or_else(|| DEFAULT_RELEASE.to_string()),
            base_path: self.base_path.clone(),
            schemes: self.schemes.clone().unwrap_or(defaults.schemes),
            consumes: self.consumes.clone().unwrap_or(defaults.consumes),
            produces: self.produces.clone().unwrap_or(defaults.produces),
            security_definitions: self.security_definitions.clone(),
            security: self.security.clone(),
            operation_security: self.operation_security.clone(),
            catalog,
            strict_definitions: self.strict_definitions,
            collection_array_response: self.collection_array_response,
        }
    }

    /// Builds the registry of configured resources.
    pub fn registry(&self, options: &DocumentOptions) -> AppResult<ResourceRegistry> {
        let mut registry = ResourceRegistry::new(self.releases.clone());
        for resource in &self.resources {
            registry.register(resource.to_resource(options), resource.versions.clone())?;
        }
        Ok(registry)
    }

    /// Builds a ready-to-serve cache, with `extensions` applied to the root.
    pub fn into_cache(self) -> AppResult<DocumentCache> {
        let options = self.document_options();
        let registry = self.registry(&options)?;
        let extensions = self.extensions;
        Ok(
            DocumentCache::new(registry, options).with_customizer(move |root| {
                for (key, value) in &extensions {
                    root.insert(key.clone(), value.clone());
                }
            }),
        )
    }
}
