#![deny(missing_docs)]

//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// Wrapper for YAML (de)serialization errors.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// A field declares a type the generator has no mapping for.
    #[from(ignore)]
    #[display("Unrecognized type '{kind}' for field {definition}.{field}")]
    UnrecognizedType {
        /// Definition that owns the field.
        definition: String,
        /// Field name.
        field: String,
        /// Declared type as written in the schema.
        kind: String,
    },

    /// Two resources produced different definitions under the same name.
    #[from(ignore)]
    #[display("Definition collision: {_0}")]
    DefinitionCollision(String),

    /// The requested API release is not registered.
    #[from(ignore)]
    #[display("Unknown release: {_0}")]
    UnknownRelease(String),

    /// A generated or loaded document failed validation.
    #[from(ignore)]
    #[display("Invalid document: {_0}")]
    InvalidDocument(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
