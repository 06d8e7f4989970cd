//! Named tables of decoded rows.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::model::Model;
use crate::value::Value;

/// One row: a cell per model field, in field order.
pub type Row = Vec<Value>;

/// A named table of rows conforming to one model.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct DataSet {
    pub name: String,
    /// `None` only for schema-less empty datasets.
    pub model: Option<Arc<Model>>,
    pub metadata: BTreeMap<String, serde_json::Value>,
    pub rows: Vec<Row>,
    /// Continuation links by relation name.
    pub links: BTreeMap<String, String>,
}

impl DataSet {
    pub fn new(name: impl Into<String>, model: Arc<Model>, rows: Vec<Row>) -> Self {
        DataSet {
            name: name.into(),
            model: Some(model),
            rows,
            ..DataSet::default()
        }
    }

    /// Look up a continuation link by relation name.
    pub fn link(&self, rel: &str) -> Option<&str> {
        self.links.get(rel).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of terminal columns this dataset lays out to.
    pub fn leaf_count(&self) -> usize {
        self.model.as_ref().map(|m| m.leaf_count()).unwrap_or(0)
    }
}
