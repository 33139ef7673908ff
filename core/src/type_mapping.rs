#![deny(missing_docs)]

//! # Type Mapping
//!
//! Converts declared field kinds into Swagger 2.0 `{type, format}` pairs.
//! Only scalar classification happens here; references, embedded schemas and
//! array items are resolved by the definition builder.

use crate::descriptor::FieldKind;
use crate::error::{AppError, AppResult};
use serde::Serialize;
use std::fmt::Display;

/// Represents the simplified JSON types used by Swagger 2.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    /// A string type.
    String,
    /// An integer type.
    Integer,
    /// A floating point number.
    Number,
    /// A boolean type.
    Boolean,
    /// An array.
    Array,
}

impl JsonType {
    /// The keyword written to the `type` member.
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonType::String => "string",
            JsonType::Integer => "integer",
            JsonType::Number => "number",
            JsonType::Boolean => "boolean",
            JsonType::Array => "array",
        }
    }
}

impl Display for JsonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of mapping a scalar kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarSchema {
    /// The primary JSON type.
    pub type_: JsonType,
    /// Optional format specifier (e.g. "double", "date-time").
    pub format: Option<&'static str>,
}

/// Trait for converting declared field kinds to scalar schemas.
pub trait TypeMapper: Send + Sync {
    /// Maps a kind. `Ok(None)` means "known but not representable".
    fn map(&self, kind: &FieldKind) -> AppResult<Option<ScalarSchema>>;
}

/// The standard implementation of `TypeMapper`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldKindMapper;

impl TypeMapper for FieldKindMapper {
    fn map(&self, kind: &FieldKind) -> AppResult<Option<ScalarSchema>> {
        let mapped = match kind {
            FieldKind::Text | FieldKind::ObjectId => Some(simple(JsonType::String)),
            FieldKind::Number => Some(formatted(JsonType::Number, "double")),
            FieldKind::Boolean => Some(simple(JsonType::Boolean)),
            FieldKind::Date => Some(formatted(JsonType::String, "date-time")),
            FieldKind::Array(_) => Some(simple(JsonType::Array)),
            FieldKind::Mixed | FieldKind::Binary | FieldKind::Object | FieldKind::Embedded => None,
            FieldKind::Unknown(name) => {
                return Err(AppError::UnrecognizedType {
                    definition: String::new(),
                    field: String::new(),
                    kind: name.clone(),
                })
            }
        };
        Ok(mapped)
    }
}

fn simple(t: JsonType) -> ScalarSchema {
    ScalarSchema {
        type_: t,
        format: None,
    }
}

fn formatted(t: JsonType, fmt: &'static str) -> ScalarSchema {
    ScalarSchema {
        type_: t,
        format: Some(fmt),
    }
}
