//! Field-type schemas declared by `model` chunks.
//!
//! A [`Model`] is an ordered list of [`ModelField`]s. Fields of complex or
//! time-series type carry a nested model of their own, so a response's schema
//! is a tree. [`ModelIndex`] flattens that tree into a name lookup used while
//! decoding data chunks.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Declared type of a model field.
///
/// Wire names are matched exactly; anything unrecognized is kept as
/// [`FieldType::Unknown`] and decoded as a generic scalar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    /// `number`: integer when the literal has no fractional part, else double.
    Number,
    Long,
    Double,
    String,
    Boolean,
    Timestamp,
    Complex,
    TimeSeries,
    Csv,
    Duration,
    /// `object`: untyped scalar kept as given.
    Object,
    /// `json`: opaque JSON passthrough.
    Json,
    Unknown(String),
}

impl FieldType {
    /// The wire name of this type.
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Number => "number",
            FieldType::Long => "long",
            FieldType::Double => "double",
            FieldType::String => "string",
            FieldType::Boolean => "boolean",
            FieldType::Timestamp => "timestamp",
            FieldType::Complex => "complex",
            FieldType::TimeSeries => "timeseries",
            FieldType::Csv => "csv",
            FieldType::Duration => "duration",
            FieldType::Object => "object",
            FieldType::Json => "json",
            FieldType::Unknown(name) => name,
        }
    }

    /// Returns `true` for types whose cells are nested tables.
    pub fn is_nested(&self) -> bool {
        matches!(self, FieldType::Complex | FieldType::TimeSeries)
    }
}

impl From<String> for FieldType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "number" => FieldType::Number,
            "long" => FieldType::Long,
            "double" => FieldType::Double,
            "string" => FieldType::String,
            "boolean" => FieldType::Boolean,
            "timestamp" => FieldType::Timestamp,
            "complex" => FieldType::Complex,
            "timeseries" => FieldType::TimeSeries,
            "csv" => FieldType::Csv,
            "duration" => FieldType::Duration,
            "object" => FieldType::Object,
            "json" => FieldType::Json,
            _ => FieldType::Unknown(name),
        }
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a field's cell payload is carried.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Form {
    /// The payload is the data itself.
    #[default]
    Inline,
    /// The payload points at another dataset by name.
    Reference,
}

/// One column of a model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelField {
    pub alias: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<Form>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hints: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<Arc<Model>>,
}

impl ModelField {
    /// Create an inline field with no nested model.
    pub fn new(alias: impl Into<String>, field_type: FieldType) -> Self {
        ModelField {
            alias: alias.into(),
            field_type,
            form: None,
            hints: None,
            model: None,
        }
    }

    /// Create a field whose cells are nested tables of `model`.
    pub fn nested(alias: impl Into<String>, field_type: FieldType, model: Model) -> Self {
        ModelField {
            model: Some(Arc::new(model)),
            ..ModelField::new(alias, field_type)
        }
    }

    /// Mark this field as a reference to another dataset.
    pub fn reference(mut self) -> Self {
        self.form = Some(Form::Reference);
        self
    }

    /// Returns `true` if cells of this field point at other datasets.
    pub fn is_reference(&self) -> bool {
        self.form == Some(Form::Reference)
    }

    /// The nested model, present only for complex and time-series fields.
    pub fn nested_model(&self) -> Option<&Arc<Model>> {
        if self.field_type.is_nested() {
            self.model.as_ref()
        } else {
            None
        }
    }

    /// Number of terminal columns this field expands to.
    ///
    /// A nested field with no sub-fields still occupies one column.
    pub fn leaf_count(&self) -> usize {
        self.nested_model()
            .map(|model| model.leaf_count().max(1))
            .unwrap_or(1)
    }
}

/// An ordered field schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<ModelField>,
}

impl Model {
    pub fn new(name: impl Into<String>, fields: Vec<ModelField>) -> Self {
        Model {
            name: name.into(),
            fields,
        }
    }

    /// Total number of terminal columns after expanding nested fields.
    pub fn leaf_count(&self) -> usize {
        self.fields.iter().map(ModelField::leaf_count).sum()
    }

    /// Returns `true` if any field is a nested table.
    pub fn has_nested_fields(&self) -> bool {
        self.fields.iter().any(|f| f.nested_model().is_some())
    }

    /// Look up a field by alias.
    pub fn field(&self, alias: &str) -> Option<&ModelField> {
        self.fields.iter().find(|f| f.alias == alias)
    }
}

/// Name lookup over a model and every model nested inside it.
#[derive(Clone, Debug, Default)]
pub struct ModelIndex {
    models: HashMap<String, Arc<Model>>,
}

impl ModelIndex {
    /// Build an index from a top-level model by depth-first traversal.
    ///
    /// On a name collision the model visited last wins.
    pub fn build(top: &Arc<Model>) -> Self {
        let mut index = ModelIndex::default();
        index.visit(top);
        index
    }

    fn visit(&mut self, model: &Arc<Model>) {
        self.models.insert(model.name.clone(), Arc::clone(model));
        for field in &model.fields {
            if let Some(nested) = &field.model {
                self.visit(nested);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Model>> {
        self.models.get(name)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
