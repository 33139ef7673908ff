#![deny(missing_docs)]

//! # Document Cache
//!
//! Owns the registry and produces documents on demand. The root document is
//! generated once, on first use, from the resources visible in the initial
//! release; customizers registered beforehand run on it exactly once.
//! Per-release documents are derived from that root on every request.

use crate::document::{base_path_from_request, generate_root, DocumentOptions, RootDocument};
use crate::error::AppResult;
use crate::registry::ResourceRegistry;
use std::sync::OnceLock;
use tracing::debug;

type Customizer = Box<dyn Fn(&mut RootDocument) + Send + Sync>;

/// Lazily generated, shareable documentation state.
pub struct DocumentCache {
    registry: ResourceRegistry,
    options: DocumentOptions,
    customizers: Vec<Customizer>,
    root: OnceLock<RootDocument>,
}

impl std::fmt::Debug for DocumentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentCache")
            .field("registry", &self.registry)
            .field("customizers", &self.customizers.len())
            .field("generated", &self.root.get().is_some())
            .finish()
    }
}

impl DocumentCache {
    /// Creates a cache. Nothing is generated until first use.
    pub fn new(registry: ResourceRegistry, options: DocumentOptions) -> Self {
        Self {
            registry,
            options,
            customizers: Vec::new(),
            root: OnceLock::new(),
        }
    }

    /// Registers a hook that edits the root document after generation,
    /// e.g. to add `host` or `x-*` members.
    pub fn with_customizer<F>(mut self, customizer: F) -> Self
    where
        F: Fn(&mut RootDocument) + Send + Sync + 'static,
    {
        self.customizers.push(Box::new(customizer));
        self
    }

    /// The registry.
    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// The document options.
    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    /// The root document, generated on first call.
    pub fn root(&self) -> AppResult<&RootDocument> {
        if let Some(root) = self.root.get() {
            return Ok(root);
        }
        let initial = self.registry.initial();
        let mut root = generate_root(self.registry.visible_at(initial), &self.options)?;
        for customize in &self.customizers {
            customize(&mut root);
        }
        debug!(release = %initial, "Cached root document");
        Ok(self.root.get_or_init(|| root))
    }

    /// The document for `requested` (latest when `None`), with the base path
    /// derived from the path the document was requested at.
    pub fn versioned(&self, requested: Option<&str>, request_path: &str) -> AppResult<RootDocument> {
        let release = self.registry.resolve(requested)?;
        let root = self.root()?;
        root.derive_versioned(
            release,
            &self.registry.visible_at(release),
            &base_path_from_request(request_path, 1),
        )
    }
}
