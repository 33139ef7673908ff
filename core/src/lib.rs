#![deny(missing_docs)]

//! # CRUD Swagger Core
//!
//! Generates Swagger 2.0 documents for resources exposing a uniform CRUD
//! surface: model definitions from declared fields, a shared parameter
//! catalog, six operations per resource and a root document that can be
//! derived per API release.

/// Shared error types.
pub mod error;

/// Definition and reference naming.
pub mod naming;

/// Resource and field descriptors.
pub mod descriptor;

/// Type mapping logic (field kind -> Swagger type).
pub mod type_mapping;

/// Visibility directives.
pub mod selection;

/// Model definition building.
pub mod definitions;

/// Shared parameter catalog.
pub mod parameters;

/// Operation objects.
pub mod operations;

/// Per-resource fragments.
pub mod resource;

/// Fragment merging.
pub mod merge;

/// Root document assembly and versioned derivation.
pub mod document;

/// Release-aware resource registry.
pub mod registry;

/// Lazily generated document state.
pub mod cache;

/// Structural document checks.
pub mod validation;

/// File configuration.
pub mod config;

pub use cache::DocumentCache;
pub use config::{ApiConfig, ResourceConfig};
pub use descriptor::{
    FieldDescriptor, FieldKind, ResourceDescriptor, SchemaDescriptor, SchemaSource, Selected,
};
pub use document::{base_path_from_request, generate_root, DocumentOptions, RootDocument};
pub use error::{AppError, AppResult};
pub use registry::ResourceRegistry;
pub use resource::{Resource, ResourceFragment, ResourceOptions};
pub use validation::{ensure_valid, validate_document, DocumentIssue};
