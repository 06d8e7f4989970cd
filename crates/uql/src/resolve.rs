//! Reference resolution over the dataset arena.
//!
//! Datasets are kept by name. Starting from the main dataset, every
//! [`Value::DataSetRef`] is replaced by the dataset it names, itself resolved
//! the same way. A reference to a missing dataset becomes a
//! [`Value::NoData`] marker carrying the field's model.
//!
//! The protocol does not produce cycles. Re-entering a dataset that is already
//! on the current resolution path, or exceeding the configured depth, yields
//! the marker instead of recursing.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::dataset::{DataSet, Row};
use crate::model::{Model, ModelField};
use crate::value::{NestedTable, NoData, Value};

/// Resolves references by name against a dataset arena.
pub struct Resolver<'a> {
    arena: &'a HashMap<String, DataSet>,
    max_depth: usize,
}

impl<'a> Resolver<'a> {
    pub fn new(arena: &'a HashMap<String, DataSet>, max_depth: usize) -> Self {
        Resolver { arena, max_depth }
    }

    /// Resolve the dataset called `name`, or `None` if the arena lacks it.
    pub fn resolve_named(&self, name: &str) -> Option<DataSet> {
        self.arena.get(name).map(|ds| self.resolve_dataset(ds))
    }

    /// Return a copy of `dataset` with every reachable reference substituted.
    ///
    /// Only reference cells are rewritten, so resolving an already resolved
    /// dataset returns an equal dataset.
    pub fn resolve_dataset(&self, dataset: &DataSet) -> DataSet {
        let mut path = vec![dataset.name.clone()];
        self.resolve_in_path(dataset, &mut path)
    }

    fn resolve_in_path(&self, dataset: &DataSet, path: &mut Vec<String>) -> DataSet {
        DataSet {
            name: dataset.name.clone(),
            model: dataset.model.clone(),
            metadata: dataset.metadata.clone(),
            rows: self.resolve_rows(dataset.model.as_ref(), &dataset.rows, path),
            links: dataset.links.clone(),
        }
    }

    fn resolve_rows(
        &self,
        model: Option<&Arc<Model>>,
        rows: &[Row],
        path: &mut Vec<String>,
    ) -> Vec<Row> {
        rows.iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(col, value)| {
                        let field = model.and_then(|m| m.fields.get(col));
                        self.resolve_value(field, value, path)
                    })
                    .collect()
            })
            .collect()
    }

    fn resolve_value(
        &self,
        field: Option<&ModelField>,
        value: &Value,
        path: &mut Vec<String>,
    ) -> Value {
        match value {
            Value::DataSetRef(reference) => {
                let missing = || {
                    Value::NoData(NoData {
                        model: field.and_then(|f| f.model.clone()),
                    })
                };
                let Some(target) = self.arena.get(&reference.dataset) else {
                    return missing();
                };
                if path.iter().any(|name| name == &reference.dataset) {
                    warn!(dataset = %reference.dataset, "reference cycle, leaving no data");
                    return missing();
                }
                if path.len() >= self.max_depth {
                    warn!(
                        dataset = %reference.dataset,
                        depth = path.len(),
                        "reference depth limit reached, leaving no data"
                    );
                    return missing();
                }
                path.push(reference.dataset.clone());
                let resolved = self.resolve_in_path(target, path);
                path.pop();
                Value::DataSet(Box::new(resolved))
            }
            Value::NestedTable(table) => Value::NestedTable(NestedTable {
                model: Arc::clone(&table.model),
                rows: self.resolve_rows(Some(&table.model), &table.rows, path),
            }),
            Value::DataSet(ds) => {
                path.push(ds.name.clone());
                let resolved = self.resolve_in_path(ds, path);
                path.pop();
                Value::DataSet(Box::new(resolved))
            }
            other => other.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldType;
    use crate::value::DataSetRef;

    fn pair_model() -> Model {
        Model::new(
            "m:pair",
            vec![
                ModelField::new("name", FieldType::String),
                ModelField::new("value", FieldType::String),
            ],
        )
    }

    fn main_model() -> Arc<Model> {
        Arc::new(Model::new(
            "m:main",
            vec![
                ModelField::new("id", FieldType::Long),
                ModelField::nested("pairs", FieldType::Complex, pair_model()).reference(),
            ],
        ))
    }

    fn reference(name: &str) -> Value {
        Value::DataSetRef(DataSetRef {
            dataset: name.into(),
            json_path: "$".into(),
        })
    }

    fn arena(main_rows: Vec<Row>, extra: Vec<DataSet>) -> HashMap<String, DataSet> {
        let mut arena = HashMap::new();
        arena.insert(
            "d:main".to_string(),
            DataSet::new("d:main", main_model(), main_rows),
        );
        for ds in extra {
            arena.insert(ds.name.clone(), ds);
        }
        arena
    }

    #[test]
    fn substitutes_present_references() {
        let pairs = DataSet::new(
            "d:pairs-1",
            Arc::new(pair_model()),
            vec![vec![Value::String("k".into()), Value::String("v".into())]],
        );
        let arena = arena(vec![vec![Value::Int(1), reference("d:pairs-1")]], vec![pairs]);
        let main = Resolver::new(&arena, 64).resolve_named("d:main").unwrap();

        match &main.rows[0][1] {
            Value::DataSet(ds) => {
                assert_eq!(ds.name, "d:pairs-1");
                assert_eq!(ds.rows.len(), 1);
            }
            other => panic!("expected resolved dataset, got {:?}", other),
        }
    }

    #[test]
    fn missing_reference_becomes_marker_with_model() {
        let arena = arena(vec![vec![Value::Int(1), reference("d:absent")]], vec![]);
        let main = Resolver::new(&arena, 64).resolve_named("d:main").unwrap();

        match &main.rows[0][1] {
            Value::NoData(marker) => assert_eq!(marker.leaf_count(), 2),
            other => panic!("expected no-data marker, got {:?}", other),
        }
    }

    #[test]
    fn empty_and_missing_are_distinct_but_same_width() {
        let empty = DataSet::new("d:empty", Arc::new(pair_model()), vec![]);
        let arena = arena(
            vec![
                vec![Value::Int(1), reference("d:empty")],
                vec![Value::Int(2), reference("d:absent")],
            ],
            vec![empty],
        );
        let main = Resolver::new(&arena, 64).resolve_named("d:main").unwrap();

        let empty_cell = &main.rows[0][1];
        let missing_cell = &main.rows[1][1];
        assert!(matches!(empty_cell, Value::DataSet(ds) if ds.rows.is_empty()));
        assert!(matches!(missing_cell, Value::NoData(_)));
        assert_ne!(empty_cell, missing_cell);

        let empty_width = match empty_cell {
            Value::DataSet(ds) => ds.leaf_count(),
            _ => unreachable!(),
        };
        let missing_width = match missing_cell {
            Value::NoData(marker) => marker.leaf_count(),
            _ => unreachable!(),
        };
        assert_eq!(empty_width, missing_width);
    }

    #[test]
    fn resolving_twice_is_a_no_op() {
        let pairs = DataSet::new(
            "d:pairs-1",
            Arc::new(pair_model()),
            vec![vec![Value::String("k".into()), Value::String("v".into())]],
        );
        let arena = arena(
            vec![
                vec![Value::Int(1), reference("d:pairs-1")],
                vec![Value::Int(2), reference("d:absent")],
            ],
            vec![pairs],
        );
        let resolver = Resolver::new(&arena, 64);
        let once = resolver.resolve_named("d:main").unwrap();
        let twice = resolver.resolve_dataset(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn cycles_terminate_with_marker() {
        let model = Arc::new(Model::new(
            "m:node",
            vec![ModelField::nested(
                "next",
                FieldType::Complex,
                Model::new("m:node", vec![]),
            )
            .reference()],
        ));
        let mut arena = HashMap::new();
        arena.insert(
            "d:main".to_string(),
            DataSet::new("d:main", Arc::clone(&model), vec![vec![reference("d:a")]]),
        );
        arena.insert(
            "d:a".to_string(),
            DataSet::new("d:a", Arc::clone(&model), vec![vec![reference("d:main")]]),
        );

        let main = Resolver::new(&arena, 64).resolve_named("d:main").unwrap();
        let Value::DataSet(a) = &main.rows[0][0] else {
            panic!("expected d:a to resolve");
        };
        assert!(matches!(a.rows[0][0], Value::NoData(_)));
    }

    #[test]
    fn depth_limit_yields_marker() {
        let pairs = DataSet::new("d:pairs-1", Arc::new(pair_model()), vec![]);
        let arena = arena(vec![vec![Value::Int(1), reference("d:pairs-1")]], vec![pairs]);
        let main = Resolver::new(&arena, 1).resolve_named("d:main").unwrap();
        assert!(matches!(main.rows[0][1], Value::NoData(_)));
    }

    #[test]
    fn shared_targets_resolve_in_every_row() {
        let pairs = DataSet::new("d:pairs-1", Arc::new(pair_model()), vec![]);
        let arena = arena(
            vec![
                vec![Value::Int(1), reference("d:pairs-1")],
                vec![Value::Int(2), reference("d:pairs-1")],
            ],
            vec![pairs],
        );
        let main = Resolver::new(&arena, 64).resolve_named("d:main").unwrap();
        assert!(matches!(main.rows[0][1], Value::DataSet(_)));
        assert!(matches!(main.rows[1][1], Value::DataSet(_)));
    }
}
