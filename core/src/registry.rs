#![deny(missing_docs)]

//! # Resource Registry
//!
//! Holds the known API releases and the resources visible in each of them.
//! Releases are opaque labels kept in declaration order; the last one is the
//! latest.

use crate::error::{AppError, AppResult};
use crate::resource::Resource;
use tracing::debug;

/// Release used when none are declared.
pub const DEFAULT_RELEASE: &str = "0.0.1";

#[derive(Debug)]
struct Entry {
    resource: Resource,
    /// Empty means "every release".
    versions: Vec<String>,
}

impl Entry {
    fn visible_at(&self, release: &str) -> bool {
        self.versions.is_empty() || self.versions.iter().any(|v| v == release)
    }
}

/// Ordered resources with per-release visibility.
#[derive(Debug)]
pub struct ResourceRegistry {
    releases: Vec<String>,
    entries: Vec<Entry>,
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ResourceRegistry {
    /// Creates a registry for `releases`. Duplicates are dropped; an empty
    /// list becomes [`DEFAULT_RELEASE`].
    pub fn new(releases: Vec<String>) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(releases.len());
        for release in releases {
            if !unique.contains(&release) {
                unique.push(release);
            }
        }
        if unique.is_empty() {
            unique.push(DEFAULT_RELEASE.to_string());
        }
        Self {
            releases: unique,
            entries: Vec::new(),
        }
    }

    /// Adds a resource visible in every release.
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.entries.push(Entry {
            resource,
            versions: Vec::new(),
        });
        self
    }

    /// Adds a resource visible only in `versions` (every release when empty).
    pub fn register(&mut self, resource: Resource, versions: Vec<String>) -> AppResult<()> {
        if let Some(unknown) = versions.iter().find(|v| !self.releases.contains(*v)) {
            return Err(AppError::UnknownRelease(format!(
                "resource '{}' is bound to undeclared release '{}'",
                resource.singular(),
                unknown
            )));
        }
        debug!(resource = %resource.singular(), versions = ?versions, "Registered resource");
        self.entries.push(Entry { resource, versions });
        Ok(())
    }

    /// Declared releases, oldest first.
    pub fn releases(&self) -> &[String] {
        &self.releases
    }

    /// The oldest release; the root document is built against it.
    pub fn initial(&self) -> &str {
        self.releases.first().map(String::as_str).unwrap_or(DEFAULT_RELEASE)
    }

    /// The newest release.
    pub fn latest(&self) -> &str {
        self.releases.last().map(String::as_str).unwrap_or(DEFAULT_RELEASE)
    }

    /// Resources visible in `release`, in registration order.
    pub fn visible_at(&self, release: &str) -> Vec<&Resource> {
        self.entries
            .iter()
            .filter(|e| e.visible_at(release))
            .map(|e| &e.resource)
            .collect()
    }

    /// Resolves a requested release; `None` means the latest.
    pub fn resolve(&self, requested: Option<&str>) -> AppResult<&str> {
        match requested.map(str::trim).filter(|r| !r.is_empty()) {
            None => Ok(self.latest()),
            Some(requested) => self
                .releases
                .iter()
                .find(|r| r.as_str() == requested)
                .map(String::as_str)
                .ok_or_else(|| AppError::UnknownRelease(requested.to_string())),
        }
    }
}
