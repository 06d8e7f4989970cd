//! Typed cell values.
//!
//! Every cell of a decoded dataset is a [`Value`]. Scalars carry their data
//! directly; complex and time-series cells carry a [`NestedTable`]; reference
//! cells start as [`DataSetRef`] and are replaced by the resolver with either
//! the referenced [`DataSet`] or a [`NoData`] marker.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::dataset::{DataSet, Row};
use crate::model::Model;

/// A decoded cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A `null` payload.
    Null,
    Int(i64),
    Double(f64),
    String(String),
    Bool(bool),
    /// Always normalized to UTC.
    Timestamp(DateTime<Utc>),
    /// Unresolved pointer to another dataset.
    DataSetRef(DataSetRef),
    /// Inline complex or time-series rows.
    NestedTable(NestedTable),
    /// A reference replaced by the dataset it names.
    DataSet(Box<DataSet>),
    /// A reference whose target is absent from the response.
    NoData(NoData),
    /// An untyped scalar, kept as given.
    GenericScalar(serde_json::Value),
    /// Opaque JSON, kept as given.
    GenericJson(serde_json::Value),
}

/// Payload of a reference cell: `{"$dataset": ..., "$jsonPath": ...}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSetRef {
    #[serde(rename = "$dataset")]
    pub dataset: String,
    #[serde(rename = "$jsonPath", default)]
    pub json_path: String,
}

/// Rows of an inline complex or time-series cell.
#[derive(Clone, Debug, PartialEq)]
pub struct NestedTable {
    pub model: Arc<Model>,
    pub rows: Vec<Row>,
}

/// Marker left where a reference named a dataset that does not exist.
///
/// Keeps the field's nested model so layout can still count its columns.
#[derive(Clone, Debug, PartialEq)]
pub struct NoData {
    pub model: Option<Arc<Model>>,
}

impl NoData {
    /// Number of terminal columns the missing table would have occupied.
    pub fn leaf_count(&self) -> usize {
        self.model
            .as_ref()
            .map(|m| m.leaf_count().max(1))
            .unwrap_or(1)
    }
}

/// Borrowed view of any table-shaped cell.
#[derive(Clone, Copy, Debug)]
pub enum TableView<'a> {
    /// A table with a model and zero or more rows.
    Rows {
        model: Option<&'a Arc<Model>>,
        rows: &'a [Row],
    },
    /// An absent reference target.
    Missing(&'a NoData),
}

impl Value {
    /// Returns `true` for cells that are tables rather than scalars.
    pub fn is_table(&self) -> bool {
        self.as_table().is_some()
    }

    /// View table-shaped cells (nested tables, resolved datasets, markers).
    pub fn as_table(&self) -> Option<TableView<'_>> {
        match self {
            Value::NestedTable(t) => Some(TableView::Rows {
                model: Some(&t.model),
                rows: &t.rows,
            }),
            Value::DataSet(ds) => Some(TableView::Rows {
                model: ds.model.as_ref(),
                rows: &ds.rows,
            }),
            Value::NoData(marker) => Some(TableView::Missing(marker)),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }
}

/// Format a timestamp the way it is displayed and projected.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Scalars display as their text; `null` displays as nothing.
///
/// Table-shaped values display as a short summary. Layout never prints them
/// this way since it expands them into sub-tables.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(i) => write!(f, "{}", i),
            Value::Double(d) => write!(f, "{}", d),
            Value::String(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Timestamp(ts) => f.write_str(&format_timestamp(ts)),
            Value::DataSetRef(r) => write!(f, "-> {}", r.dataset),
            Value::NestedTable(t) => write!(f, "<{} rows>", t.rows.len()),
            Value::DataSet(ds) => write!(f, "<{}: {} rows>", ds.name, ds.rows.len()),
            Value::NoData(_) => Ok(()),
            Value::GenericScalar(serde_json::Value::String(s)) => f.write_str(s),
            Value::GenericScalar(serde_json::Value::Null) => Ok(()),
            Value::GenericScalar(v) | Value::GenericJson(v) => write!(f, "{}", v),
        }
    }
}
