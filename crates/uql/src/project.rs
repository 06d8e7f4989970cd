//! Projection of decoded datasets into ordered, field-named records.
//!
//! A [`Projection`] is what JSON and YAML output serialize. Field order follows
//! the model; nested tables and resolved references become arrays of records;
//! markers and nulls become `null`.
//!
//! ```rust
//! use std::sync::Arc;
//! use uql::{project_dataset, to_json, DataSet, FieldType, Model, ModelField, Value};
//!
//! let model = Arc::new(Model::new(
//!     "m:main",
//!     vec![
//!         ModelField::new("name", FieldType::String),
//!         ModelField::new("count", FieldType::Number),
//!     ],
//! ));
//! let ds = DataSet::new(
//!     "d:main",
//!     model,
//!     vec![vec![Value::String("checkout".into()), Value::Int(3)]],
//! );
//!
//! let json = to_json(&project_dataset(&ds).unwrap()).unwrap();
//! assert_eq!(json, r#"[{"name":"checkout","count":3}]"#);
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::dataset::{DataSet, Row};
use crate::error::ProjectionError;
use crate::model::Model;
use crate::value::{format_timestamp, Value};

/// An ordered, serializable view of decoded data.
#[derive(Clone, Debug, PartialEq)]
pub enum Projection {
    /// A scalar, carried as JSON.
    Scalar(serde_json::Value),
    /// One row: aliases to values in model order.
    Record(Vec<(String, Projection)>),
    /// Rows of a table.
    List(Vec<Projection>),
}

impl Projection {
    /// Look up a field of a record by alias.
    pub fn get(&self, alias: &str) -> Option<&Projection> {
        match self {
            Projection::Record(fields) => fields.iter().find(|(a, _)| a == alias).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Convert into a `serde_json::Value`.
    ///
    /// Key order is only kept if `serde_json` preserves insertion order;
    /// serialize the projection directly when order matters.
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            Projection::Scalar(v) => v.clone(),
            Projection::Record(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(alias, value)| (alias.clone(), value.to_value()))
                    .collect(),
            ),
            Projection::List(items) => {
                serde_json::Value::Array(items.iter().map(Projection::to_value).collect())
            }
        }
    }
}

impl Serialize for Projection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Projection::Scalar(v) => v.serialize(serializer),
            Projection::Record(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (alias, value) in fields {
                    map.serialize_entry(alias, value)?;
                }
                map.end()
            }
            Projection::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

/// Project a dataset into a list of records.
///
/// Fails if two fields at the same level share an alias.
pub fn project_dataset(dataset: &DataSet) -> Result<Projection, ProjectionError> {
    project_rows(dataset.model.as_ref(), &dataset.rows, "")
}

fn project_rows(
    model: Option<&Arc<Model>>,
    rows: &[Row],
    path: &str,
) -> Result<Projection, ProjectionError> {
    let Some(model) = model else {
        return Ok(Projection::List(Vec::new()));
    };
    check_aliases(model, path)?;

    rows.iter()
        .map(|row| {
            model
                .fields
                .iter()
                .zip(row)
                .map(|(field, value)| -> Result<(String, Projection), ProjectionError> {
                    let child_path = join_path(path, &field.alias);
                    Ok((field.alias.clone(), project_value(value, &child_path)?))
                })
                .collect::<Result<Vec<_>, ProjectionError>>()
                .map(Projection::Record)
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Projection::List)
}

fn project_value(value: &Value, path: &str) -> Result<Projection, ProjectionError> {
    use serde_json::Value as Json;

    let scalar = match value {
        Value::Null | Value::NoData(_) => Json::Null,
        Value::Int(i) => Json::from(*i),
        Value::Double(d) => serde_json::Number::from_f64(*d)
            .map(Json::Number)
            .unwrap_or(Json::Null),
        Value::String(s) => Json::String(s.clone()),
        Value::Bool(b) => Json::Bool(*b),
        Value::Timestamp(ts) => Json::String(format_timestamp(ts)),
        Value::DataSetRef(r) => serde_json::to_value(r)?,
        Value::GenericScalar(v) | Value::GenericJson(v) => v.clone(),
        Value::NestedTable(table) => return project_rows(Some(&table.model), &table.rows, path),
        Value::DataSet(ds) => return project_rows(ds.model.as_ref(), &ds.rows, path),
    };
    Ok(Projection::Scalar(scalar))
}

fn check_aliases(model: &Model, path: &str) -> Result<(), ProjectionError> {
    let mut seen = HashSet::new();
    for field in &model.fields {
        if !seen.insert(field.alias.as_str()) {
            return Err(ProjectionError::AliasCollision {
                path: join_path(path, &field.alias),
            });
        }
    }
    Ok(())
}

fn join_path(parent: &str, alias: &str) -> String {
    if parent.is_empty() {
        alias.to_string()
    } else {
        format!("{}.{}", parent, alias)
    }
}

/// Serialize a projection as compact JSON.
pub fn to_json(projection: &Projection) -> Result<String, ProjectionError> {
    Ok(serde_json::to_string(projection)?)
}

/// Serialize a projection as pretty-printed JSON.
pub fn to_json_pretty(projection: &Projection) -> Result<String, ProjectionError> {
    Ok(serde_json::to_string_pretty(projection)?)
}

/// Serialize a projection as YAML.
pub fn to_yaml(projection: &Projection) -> Result<String, ProjectionError> {
    Ok(serde_yaml::to_string(projection)?)
}
