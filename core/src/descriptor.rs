#![deny(missing_docs)]

//! # Resource Descriptors
//!
//! Read-only description of the resources being documented. The data layer
//! (or a configuration file) supplies these snapshots; the generator never
//! mutates them.
//!
//! - **FieldKind**: closed set of declared field types.
//! - **FieldDescriptor** / **SchemaDescriptor**: fields, including virtuals and
//!   embedded schemas.
//! - **SchemaSource**: the introspection seam consumed by the generator.

use serde::Deserialize;
use std::fmt::Display;

/// Name of the primary key every stored document carries.
pub const PRIMARY_KEY: &str = "_id";

/// Name of the numeric revision key maintained by the data layer.
pub const REVISION_KEY: &str = "__v";

/// Name of the virtual string alias of the primary key.
pub const ID_ALIAS: &str = "id";

/// Declared type of a schema field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum FieldKind {
    /// Free text.
    #[default]
    Text,
    /// Floating point number.
    Number,
    /// Boolean flag.
    Boolean,
    /// Timestamp.
    Date,
    /// Identifier of another document, optionally referencing a resource.
    ObjectId,
    /// Opaque value of any shape.
    Mixed,
    /// Raw bytes.
    Binary,
    /// Plain, schemaless object.
    Object,
    /// Embedded sub-schema (see [`FieldDescriptor::schema`]).
    Embedded,
    /// Array of the inner kind. A bare `array` marker is `Array(Mixed)`.
    Array(Box<FieldKind>),
    /// A type name the generator does not know.
    Unknown(String),
}

impl FieldKind {
    /// Parses the textual notation used in configuration files.
    ///
    /// `[<kind>]` denotes an array of `<kind>`; unknown names are kept as
    /// [`FieldKind::Unknown`] so the error surfaces at generation time.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if let Some(inner) = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            return FieldKind::Array(Box::new(FieldKind::parse(inner)));
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "text" | "string" => FieldKind::Text,
            "number" => FieldKind::Number,
            "boolean" | "bool" => FieldKind::Boolean,
            "date" => FieldKind::Date,
            "objectid" | "oid" => FieldKind::ObjectId,
            "mixed" => FieldKind::Mixed,
            "binary" | "buffer" => FieldKind::Binary,
            "object" => FieldKind::Object,
            "embedded" => FieldKind::Embedded,
            "array" => FieldKind::Array(Box::new(FieldKind::Mixed)),
            _ => FieldKind::Unknown(trimmed.to_string()),
        }
    }

    /// Shorthand for `Array(Box::new(inner))`.
    pub fn array_of(inner: FieldKind) -> Self {
        FieldKind::Array(Box::new(inner))
    }
}

impl From<String> for FieldKind {
    fn from(s: String) -> Self {
        FieldKind::parse(&s)
    }
}

impl From<&str> for FieldKind {
    fn from(s: &str) -> Self {
        FieldKind::parse(s)
    }
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::Text => write!(f, "text"),
            FieldKind::Number => write!(f, "number"),
            FieldKind::Boolean => write!(f, "boolean"),
            FieldKind::Date => write!(f, "date"),
            FieldKind::ObjectId => write!(f, "objectid"),
            FieldKind::Mixed => write!(f, "mixed"),
            FieldKind::Binary => write!(f, "binary"),
            FieldKind::Object => write!(f, "object"),
            FieldKind::Embedded => write!(f, "embedded"),
            FieldKind::Array(inner) => write!(f, "[{}]", inner),
            FieldKind::Unknown(name) => write!(f, "{}", name),
        }
    }
}

/// Default-selection flag declared on a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "bool")]
pub enum Selected {
    /// The schema hides the field from query results.
    Excluded,
    /// The schema explicitly selects the field.
    Included,
    /// No declaration.
    #[default]
    Unspecified,
}

impl From<bool> for Selected {
    fn from(selected: bool) -> Self {
        if selected {
            Selected::Included
        } else {
            Selected::Excluded
        }
    }
}

/// One field of a schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldDescriptor {
    /// Field name, unique within its schema.
    pub name: String,
    /// Declared type. Virtuals default to text.
    #[serde(default, rename = "type")]
    pub kind: FieldKind,
    /// Whether the data layer requires a value.
    #[serde(default)]
    pub required: bool,
    /// Computed field with no storage.
    #[serde(default, rename = "virtual")]
    pub is_virtual: bool,
    /// Target resource (singular name) of an identifier reference.
    #[serde(default, rename = "ref")]
    pub reference: Option<String>,
    /// Embedded schema.
    #[serde(default)]
    pub schema: Option<SchemaDescriptor>,
    /// Default-selection flag (`select: false` in configuration).
    #[serde(default, rename = "select")]
    pub selected: Selected,
}

impl FieldDescriptor {
    /// Creates a stored, optional field with no selection declaration.
    pub fn new(name: impl Into<String>, kind: impl Into<FieldKind>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            required: false,
            is_virtual: false,
            reference: None,
            schema: None,
            selected: Selected::Unspecified,
        }
    }

    /// Creates a virtual field.
    pub fn virtual_field(name: impl Into<String>, kind: impl Into<FieldKind>) -> Self {
        let mut field = Self::new(name, kind);
        field.is_virtual = true;
        field
    }

    /// Creates a field holding an array of embedded documents.
    pub fn embedded(name: impl Into<String>, schema: SchemaDescriptor) -> Self {
        let mut field = Self::new(name, FieldKind::Embedded);
        field.schema = Some(schema);
        field
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the resource referenced by an identifier field.
    pub fn references(mut self, target: impl Into<String>) -> Self {
        self.reference = Some(target.into());
        self
    }

    /// Sets the default-selection flag.
    pub fn with_selected(mut self, selected: Selected) -> Self {
        self.selected = selected;
        self
    }
}

/// Ordered field collection of a schema.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct SchemaDescriptor {
    fields: Vec<FieldDescriptor>,
}

impl SchemaDescriptor {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field.
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Fields in generation order: stored fields first, then virtuals.
    pub fn ordered(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields
            .iter()
            .filter(|f| !f.is_virtual)
            .chain(self.fields.iter().filter(|f| f.is_virtual))
    }

    /// Finds a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Adds the keys a document store defines implicitly: `_id`, `__v`
    /// (top level only) and the virtual `id`. Existing fields win.
    ///
    /// Embedded schemas are processed recursively as nested documents.
    pub fn with_implicit_keys(self) -> Self {
        self.implicit_keys(true)
    }

    fn implicit_keys(mut self, top_level: bool) -> Self {
        for field in &mut self.fields {
            if let Some(nested) = field.schema.take() {
                field.schema = Some(nested.implicit_keys(false));
            }
        }
        if self.field(PRIMARY_KEY).is_none() {
            self.fields
                .push(FieldDescriptor::new(PRIMARY_KEY, FieldKind::ObjectId));
        }
        if top_level && self.field(REVISION_KEY).is_none() {
            self.fields
                .push(FieldDescriptor::new(REVISION_KEY, FieldKind::Number));
        }
        if self.field(ID_ALIAS).is_none() {
            self.fields
                .push(FieldDescriptor::virtual_field(ID_ALIAS, FieldKind::Text));
        }
        self
    }
}

impl FromIterator<FieldDescriptor> for SchemaDescriptor {
    fn from_iter<I: IntoIterator<Item = FieldDescriptor>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Introspection interface over one documented resource.
///
/// Implementations are read-only snapshots; the generator may call these
/// methods from several threads.
pub trait SchemaSource: Send + Sync {
    /// Singular resource name, e.g. `vegetable`.
    fn singular(&self) -> &str;
    /// Plural resource name used in paths, e.g. `vegetables`.
    fn plural(&self) -> &str;
    /// Field collection of the resource model.
    fn schema(&self) -> &SchemaDescriptor;
    /// Visibility directive, e.g. `-password` or `name color`.
    fn select(&self) -> Option<&str>;
}

/// Concrete resource description.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDescriptor {
    singular: String,
    plural: String,
    schema: SchemaDescriptor,
    select: Option<String>,
}

impl ResourceDescriptor {
    /// Creates a resource whose plural is `singular + "s"`.
    pub fn new(singular: impl Into<String>, schema: SchemaDescriptor) -> Self {
        let singular = singular.into();
        let plural = format!("{}s", singular);
        Self {
            singular,
            plural,
            schema,
            select: None,
        }
    }

    /// Overrides the plural name.
    pub fn with_plural(mut self, plural: impl Into<String>) -> Self {
        self.plural = plural.into();
        self
    }

    /// Sets the visibility directive.
    pub fn with_select(mut self, select: impl Into<String>) -> Self {
        self.select = Some(select.into());
        self
    }
}

impl SchemaSource for ResourceDescriptor {
    fn singular(&self) -> &str {
        &self.singular
    }

    fn plural(&self) -> &str {
        &self.plural
    }

    fn schema(&self) -> &SchemaDescriptor {
        &self.schema
    }

    fn select(&self) -> Option<&str> {
        self.select.as_deref()
    }
}
