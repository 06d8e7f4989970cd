//! Width negotiation and text output for a whole document.
//!
//! ```text
//!  id | attributes
//!     | name | value
//! ====+======+=======
//!  a  | k1   | v1
//!     |------+-------
//!     | k2   | v2
//! ----+------+-------
//! ```
//!
//! The header and body are laid out independently, then every leaf column
//! takes the wider of its header and body widths before anything is drawn.

use std::sync::Arc;

use tracing::{debug, warn};
use uql::{DataSet, Model, Response};

use crate::config::TableConfig;
use crate::header::HeaderCell;
use crate::layout::{body_cell, border_line, join_blocks, TableCell};

/// A document laid out as a header tree over a body cell tree.
#[derive(Clone, Debug)]
pub struct TableLayout {
    header: Vec<HeaderCell>,
    body: TableCell,
}

impl TableLayout {
    /// Lay out `main` under the header of `model`.
    pub fn new(model: &Arc<Model>, main: Option<&DataSet>, config: &TableConfig) -> Self {
        TableLayout {
            header: HeaderCell::for_model(model, config),
            body: body_cell(model, main, config),
        }
    }

    pub fn body(&self) -> &TableCell {
        &self.body
    }

    pub fn header(&self) -> &[HeaderCell] {
        &self.header
    }

    /// Unify header and body widths per leaf column and push them down into
    /// both trees. Returns the final widths.
    pub fn negotiate(&mut self) -> Vec<usize> {
        let body = self.body.child_widths();
        let header: Vec<usize> = self.header.iter().flat_map(HeaderCell::child_widths).collect();
        if body.len() != header.len() {
            warn!(
                body = body.len(),
                header = header.len(),
                "header and body disagree on column count"
            );
        }

        let unified: Vec<usize> = (0..body.len().max(header.len()))
            .map(|i| {
                let b = body.get(i).copied().unwrap_or(0);
                let h = header.get(i).copied().unwrap_or(0);
                b.max(h)
            })
            .collect();

        self.body.inflate_widths(&unified);
        let mut offset = 0;
        for cell in &mut self.header {
            let span = cell.child_column_count();
            let end = (offset + span).min(unified.len());
            cell.inflate_widths(&unified[offset.min(end)..end]);
            offset += span;
        }

        debug!(columns = unified.len(), "negotiated column widths");
        unified
    }

    /// Negotiate widths and draw the table.
    ///
    /// A model without fields has no header columns and draws nothing.
    pub fn render(mut self) -> String {
        if self.header.is_empty() {
            return String::new();
        }
        let widths = self.negotiate();
        if widths.is_empty() {
            return String::new();
        }

        let blocks = self
            .header
            .iter()
            .map(|cell| (cell.render(), cell.total_width()))
            .collect();
        let mut lines = join_blocks(blocks);
        lines.push(border_line(&widths, '='));
        lines.extend(self.body.render());
        if !self.body.is_populated_table() {
            lines.push(self.body.render_bottom_border('-'));
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

/// Render `main` as a table under the header of `model`.
pub fn render_table(model: &Arc<Model>, main: Option<&DataSet>, config: &TableConfig) -> String {
    TableLayout::new(model, main, config).render()
}

/// Render a dataset under its own model; schema-less datasets render as nothing.
pub fn render_dataset(dataset: &DataSet, config: &TableConfig) -> String {
    match &dataset.model {
        Some(model) => render_table(model, Some(dataset), config),
        None => String::new(),
    }
}

/// Render a decoded response's main dataset.
///
/// The main dataset's own model governs the header, so a response rooted at a
/// nested dataset lines up with that dataset's columns. The response's
/// top-level model is used only when there is no main dataset.
///
/// # Example
///
/// ```rust
/// use uql::{DecoderConfig, Response};
/// use uql_render::{render_response, TableConfig};
///
/// let body = r#"[
///   {"type":"model","model":{"name":"m:main","fields":[{"alias":"count","type":"number"}]}},
///   {"type":"data","model":{"$jsonPath":"$","$model":"m:main"},"dataset":"d:main","data":[[123]]}
/// ]"#;
/// let response = Response::decode(body, &DecoderConfig::default()).unwrap();
///
/// assert_eq!(
///     render_response(&response, &TableConfig::default()),
///     " count \n=======\n 123   \n-------\n"
/// );
/// ```
pub fn render_response(response: &Response, config: &TableConfig) -> String {
    let model = response
        .main()
        .and_then(|main| main.model.as_ref())
        .or_else(|| response.model());
    match model {
        Some(model) => render_table(model, response.main(), config),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uql::{FieldType, ModelField, Value};

    fn single_column(alias: &str, values: &[&str]) -> (Arc<Model>, DataSet) {
        let model = Arc::new(Model::new(
            "m:main",
            vec![ModelField::new(alias, FieldType::String)],
        ));
        let rows = values
            .iter()
            .map(|v| vec![Value::String(v.to_string())])
            .collect();
        let ds = DataSet::new("d:main", Arc::clone(&model), rows);
        (model, ds)
    }

    #[test]
    fn header_wider_than_body() {
        let (model, ds) = single_column("description", &["ok"]);
        let out = render_table(&model, Some(&ds), &TableConfig::default());
        assert_eq!(
            out,
            " description \n=============\n ok          \n-------------\n"
        );
    }

    #[test]
    fn body_wider_than_header() {
        let (model, ds) = single_column("id", &["abcdef"]);
        let out = render_table(&model, Some(&ds), &TableConfig::default());
        assert_eq!(out, " id       \n==========\n abcdef   \n----------\n");
    }

    #[test]
    fn missing_main_renders_blank_body() {
        let (model, _) = single_column("id", &[]);
        let out = render_table(&model, None, &TableConfig::default());
        assert_eq!(out, " id \n====\n    \n----\n");
    }

    #[test]
    fn zero_rows_render_blank_body() {
        let (model, ds) = single_column("id", &[]);
        let out = render_dataset(&ds, &TableConfig::default());
        assert_eq!(out, render_table(&model, None, &TableConfig::default()));
    }

    #[test]
    fn model_without_fields_renders_nothing() {
        let model = Arc::new(Model::new("m:main", vec![]));
        let ds = DataSet::new("d:main", Arc::clone(&model), vec![]);
        assert_eq!(render_table(&model, Some(&ds), &TableConfig::default()), "");
        assert_eq!(render_table(&model, None, &TableConfig::default()), "");
    }

    #[test]
    fn negotiate_returns_unified_widths() {
        let (model, ds) = single_column("id", &["abc"]);
        let mut layout = TableLayout::new(&model, Some(&ds), &TableConfig::default());
        assert_eq!(layout.negotiate(), vec![5]);
        assert_eq!(layout.body().child_widths(), vec![5]);
        assert_eq!(layout.header()[0].child_widths(), vec![5]);
    }

    #[test]
    fn multiline_cells_pad_siblings() {
        let model = Arc::new(Model::new(
            "m:main",
            vec![
                ModelField::new("level", FieldType::String),
                ModelField::new("message", FieldType::String),
            ],
        ));
        let ds = DataSet::new(
            "d:main",
            Arc::clone(&model),
            vec![vec![
                Value::String("ERROR".into()),
                Value::String("boom\n\tat x".into()),
            ]],
        );
        let out = render_table(&model, Some(&ds), &TableConfig::default());
        assert_eq!(
            out,
            concat!(
                " level | message  \n",
                "=======+==========\n",
                " ERROR | boom     \n",
                "       |     at x \n",
                "-------+----------\n",
            )
        );
    }
}
