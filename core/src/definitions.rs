#![deny(missing_docs)]

//! # Model Definitions
//!
//! Builds the `definitions` section for a resource: one model per resource
//! plus one synthesized model per embedded schema, named deterministically
//! after the field path (`Goose` + `stuffed` -> `GooseStuffed`).

use crate::descriptor::{FieldDescriptor, FieldKind, SchemaDescriptor, PRIMARY_KEY, REVISION_KEY};
use crate::error::{AppError, AppResult};
use crate::merge::{report_collision, CollisionPolicy};
use crate::naming::{definition_name, definition_ref, synthetic_name};
use crate::selection::{is_visible, Selection};
use crate::type_mapping::{JsonType, ScalarSchema, TypeMapper};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

/// Name of the generic error model.
pub const ERROR_MODEL: &str = "ErrorModel";

/// Name of the validation error model.
pub const VALIDATION_ERROR: &str = "ValidationError";

/// Name of the per-path validation error details model.
pub const VALIDATION_ERROR_PROPERTIES: &str = "ValidationErrorProperties";

/// A property (or schema) object: either a typed value or a `$ref`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PropertyDefinition {
    /// JSON type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<JsonType>,
    /// Type format (e.g. `double`, `date-time`, `int32`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Pointer to another definition.
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Item schema of an array.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<PropertyDefinition>>,
}

impl PropertyDefinition {
    /// A plain typed property.
    pub fn typed(type_: JsonType) -> Self {
        Self {
            type_: Some(type_),
            ..Self::default()
        }
    }

    /// A `$ref` to the definition called `name`.
    pub fn reference(name: &str) -> Self {
        Self {
            reference: Some(definition_ref(name)),
            ..Self::default()
        }
    }

    /// An array with the given item schema.
    pub fn array_of(items: PropertyDefinition) -> Self {
        Self {
            type_: Some(JsonType::Array),
            items: Some(Box::new(items)),
            ..Self::default()
        }
    }

    /// Sets the format.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Whether neither `type` nor `$ref` is set.
    pub fn is_empty(&self) -> bool {
        self.type_.is_none() && self.reference.is_none()
    }
}

impl From<ScalarSchema> for PropertyDefinition {
    fn from(scalar: ScalarSchema) -> Self {
        Self {
            type_: Some(scalar.type_),
            format: scalar.format.map(str::to_string),
            ..Self::default()
        }
    }
}

/// A model in the `definitions` section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ModelDefinition {
    /// Required property names, in field order. Omitted when empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Properties by field name.
    pub properties: IndexMap<String, PropertyDefinition>,
}

impl ModelDefinition {
    fn with_property(mut self, name: &str, property: PropertyDefinition, required: bool) -> Self {
        self.properties.insert(name.to_string(), property);
        if required {
            self.required.push(name.to_string());
        }
        self
    }
}

/// Walks schemas into model definitions.
pub struct ModelDefinitionBuilder<'a> {
    mapper: &'a dyn TypeMapper,
    selection: Option<&'a Selection>,
    policy: CollisionPolicy,
}

impl<'a> ModelDefinitionBuilder<'a> {
    /// Creates a builder applying `selection` at every nesting level.
    pub fn new(mapper: &'a dyn TypeMapper, selection: Option<&'a Selection>) -> Self {
        Self {
            mapper,
            selection,
            policy: CollisionPolicy::default(),
        }
    }

    /// Sets the reaction to two schemas producing the same definition name
    /// with different models (`Goose.stuffed.x` and `Goose.stuffedX`).
    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Builds the model for `schema` under `name` and registers it, followed
    /// by every embedded model it needs, into `definitions`.
    pub fn build_into(
        &self,
        schema: &SchemaDescriptor,
        name: &str,
        definitions: &mut IndexMap<String, ModelDefinition>,
    ) -> AppResult<()> {
        let existing = definitions.get(name).cloned();
        if existing.is_none() {
            // Reserve the slot so the parent precedes its embedded models.
            definitions.insert(name.to_string(), ModelDefinition::default());
        }
        let model = self.build(schema, name, definitions)?;
        if existing.is_some_and(|existing| existing != model) {
            report_collision(
                self.policy,
                name,
                format!("definitions/{} is generated from two different schemas", name),
            )?;
        }
        definitions.insert(name.to_string(), model);
        Ok(())
    }

    /// Builds the model for `schema`, registering embedded models into
    /// `definitions` under synthetic names derived from `name`.
    pub fn build(
        &self,
        schema: &SchemaDescriptor,
        name: &str,
        definitions: &mut IndexMap<String, ModelDefinition>,
    ) -> AppResult<ModelDefinition> {
        let mut model = ModelDefinition::default();
        for field in schema.ordered() {
            if !is_visible(field, self.selection) {
                continue;
            }
            let property = self.property(field, name, definitions)?;
            model = model.with_property(&field.name, property, field.required);
        }
        Ok(model)
    }

    fn property(
        &self,
        field: &FieldDescriptor,
        parent: &str,
        definitions: &mut IndexMap<String, ModelDefinition>,
    ) -> AppResult<PropertyDefinition> {
        if field.kind == FieldKind::ObjectId {
            if field.name == PRIMARY_KEY {
                return Ok(PropertyDefinition::typed(JsonType::String));
            }
            if let Some(target) = &field.reference {
                return Ok(PropertyDefinition::reference(&definition_name(target)));
            }
        }

        if let Some(nested) = &field.schema {
            let nested_name = synthetic_name(parent, &field.name);
            self.build_into(nested, &nested_name, definitions)?;
            return Ok(PropertyDefinition::array_of(PropertyDefinition::reference(
                &nested_name,
            )));
        }

        if let FieldKind::Array(inner) = &field.kind {
            let item_type = match self.map(field, parent, inner)? {
                Some(scalar) => scalar.type_,
                None => {
                    warn_degraded(field, parent, inner);
                    JsonType::String
                }
            };
            return Ok(PropertyDefinition::array_of(PropertyDefinition::typed(
                item_type,
            )));
        }

        if field.name == REVISION_KEY {
            return Ok(PropertyDefinition::typed(JsonType::Number).with_format("int32"));
        }

        let property = self
            .map(field, parent, &field.kind)?
            .map(PropertyDefinition::from)
            .unwrap_or_default();
        if property.is_empty() {
            warn_degraded(field, parent, &field.kind);
            return Ok(PropertyDefinition::typed(JsonType::String));
        }
        Ok(property)
    }

    fn map(
        &self,
        field: &FieldDescriptor,
        parent: &str,
        kind: &FieldKind,
    ) -> AppResult<Option<ScalarSchema>> {
        self.mapper.map(kind).map_err(|err| match err {
            AppError::UnrecognizedType { kind, .. } => AppError::UnrecognizedType {
                definition: parent.to_string(),
                field: field.name.clone(),
                kind,
            },
            other => other,
        })
    }
}

fn warn_degraded(field: &FieldDescriptor, parent: &str, kind: &FieldKind) {
    warn!(
        definition = %parent,
        field = %field.name,
        kind = %kind,
        "Field type is not supported in Swagger definitions, using \"string\""
    );
}

/// The generic error body.
pub fn error_model() -> ModelDefinition {
    ModelDefinition::default()
        .with_property(
            "code",
            PropertyDefinition::typed(JsonType::Integer).with_format("int32"),
            true,
        )
        .with_property("message", PropertyDefinition::typed(JsonType::String), true)
}

/// One entry of a validation failure list.
pub fn validation_error() -> ModelDefinition {
    ModelDefinition::default()
        .with_property(
            "properties",
            PropertyDefinition::reference(VALIDATION_ERROR_PROPERTIES),
            false,
        )
        .with_property("message", PropertyDefinition::typed(JsonType::String), true)
        .with_property("name", PropertyDefinition::typed(JsonType::String), true)
        .with_property("kind", PropertyDefinition::typed(JsonType::String), true)
        .with_property("path", PropertyDefinition::typed(JsonType::String), true)
}

/// Details of a validation failure.
pub fn validation_error_properties() -> ModelDefinition {
    ModelDefinition::default()
        .with_property("type", PropertyDefinition::typed(JsonType::String), true)
        .with_property("message", PropertyDefinition::typed(JsonType::String), true)
        .with_property("path", PropertyDefinition::typed(JsonType::String), true)
}

/// Definitions every resource fragment carries.
pub fn builtin_definitions() -> Vec<(&'static str, ModelDefinition)> {
    vec![
        (ERROR_MODEL, error_model()),
        (VALIDATION_ERROR, validation_error()),
        (VALIDATION_ERROR_PROPERTIES, validation_error_properties()),
    ]
}
