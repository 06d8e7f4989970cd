//! Layout cells for nested tables.
//!
//! A resolved dataset becomes a tree of [`TableCell`]s. Every cell covers one
//! or more *leaf columns* (terminal columns after expanding nested fields) and
//! supports the same operations:
//!
//! - [`child_column_count`](TableCell::child_column_count): leaf columns covered
//! - [`child_widths`](TableCell::child_widths): natural width of each leaf column
//! - [`inflate_widths`](TableCell::inflate_widths): grow leaf columns, never shrink
//! - [`render`](TableCell::render): the cell's text lines
//! - [`render_bottom_border`](TableCell::render_bottom_border): a divider line
//!
//! Widths include one column of padding on each side of the content. Adjacent
//! leaf columns are separated by a single border character.

use std::sync::Arc;

use tracing::warn;
use uql::{DataSet, Model, ModelField, Row, TableView, Value};

use crate::config::TableConfig;
use crate::util::{cell_lines, display_width, pad_right, repeat_char};

/// Columns of padding around cell content (one on each side).
pub const CELL_PADDING: usize = 2;
/// Joins columns within a row.
pub const COLUMN_SEPARATOR: &str = "|";
/// Joins column segments of a divider line.
pub const BORDER_JOINT: &str = "+";

/// One scalar value, possibly spanning several lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtomicCell {
    lines: Vec<String>,
    width: usize,
}

impl AtomicCell {
    pub fn new(text: &str, config: &TableConfig) -> Self {
        let lines = cell_lines(text, config.tab_width);
        let width = lines.iter().map(|l| display_width(l)).max().unwrap_or(0) + CELL_PADDING;
        AtomicCell { lines, width }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub(crate) fn inflate(&mut self, width: usize) {
        self.width = self.width.max(width);
    }

    pub(crate) fn render(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| pad_right(&format!(" {}", line), self.width))
            .collect()
    }
}

/// Why a table cell has nothing to show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmptyKind {
    /// The referenced dataset is absent from the response.
    NoData,
    /// The dataset exists but has zero rows.
    NoRows,
}

/// A table with no rows; still spans every leaf column of its model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmptyTable {
    kind: EmptyKind,
    widths: Vec<usize>,
}

/// A table whose fields are all scalars.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleTable {
    columns: usize,
    rows: Vec<Vec<AtomicCell>>,
}

/// A table with at least one nested field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombinedTable {
    columns: usize,
    rows: Vec<Vec<TableCell>>,
}

/// A node of the layout tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableCell {
    Atomic(AtomicCell),
    Empty(EmptyTable),
    Simple(SimpleTable),
    Combined(CombinedTable),
}

impl TableCell {
    /// Lay out a dataset's rows.
    ///
    /// A dataset without a model lays out as an empty table of `fallback_columns`.
    pub fn from_dataset(dataset: &DataSet, fallback_columns: usize, config: &TableConfig) -> Self {
        match &dataset.model {
            Some(model) => Self::from_rows(model, &dataset.rows, config),
            None => Self::empty(EmptyKind::NoRows, fallback_columns),
        }
    }

    /// Lay out rows of `model`, choosing the cell kind from the model's shape.
    pub fn from_rows(model: &Model, rows: &[Row], config: &TableConfig) -> Self {
        let columns = model.leaf_count().max(1);
        if rows.is_empty() || model.fields.is_empty() {
            return Self::empty(EmptyKind::NoRows, columns);
        }

        if !model.has_nested_fields() {
            let rows = rows
                .iter()
                .map(|row| {
                    model
                        .fields
                        .iter()
                        .zip(row)
                        .map(|(field, value)| scalar_cell(field, value, config))
                        .collect()
                })
                .collect();
            return TableCell::Simple(SimpleTable { columns, rows });
        }

        let rows = rows
            .iter()
            .map(|row| {
                model
                    .fields
                    .iter()
                    .zip(row)
                    .map(|(field, value)| Self::from_field(field, value, config))
                    .collect()
            })
            .collect();
        TableCell::Combined(CombinedTable { columns, rows })
    }

    /// Lay out one cell of a combined table.
    fn from_field(field: &ModelField, value: &Value, config: &TableConfig) -> Self {
        if field.nested_model().is_none() {
            return TableCell::Atomic(scalar_cell(field, value, config));
        }

        let columns = field.leaf_count();
        match value.as_table() {
            Some(TableView::Missing(_)) => Self::empty(EmptyKind::NoData, columns),
            Some(TableView::Rows { rows, .. }) if rows.is_empty() => {
                Self::empty(EmptyKind::NoRows, columns)
            }
            Some(TableView::Rows {
                model: Some(model),
                rows,
            }) if model.leaf_count().max(1) == columns => Self::from_rows(model, rows, config),
            Some(TableView::Rows { model, .. }) => {
                warn!(
                    field = %field.alias,
                    model = model.map(|m| m.name.as_str()).unwrap_or("<none>"),
                    "nested table does not match its field's model, leaving it blank"
                );
                Self::empty(EmptyKind::NoRows, columns)
            }
            None => {
                if !matches!(value, Value::Null) {
                    warn!(field = %field.alias, "scalar in a nested field, leaving it blank");
                }
                Self::empty(EmptyKind::NoData, columns)
            }
        }
    }

    /// An empty table spanning `columns` leaf columns.
    pub fn empty(kind: EmptyKind, columns: usize) -> Self {
        TableCell::Empty(EmptyTable {
            kind,
            widths: vec![0; columns],
        })
    }

    /// For empty tables, why they are empty.
    pub fn empty_kind(&self) -> Option<EmptyKind> {
        match self {
            TableCell::Empty(empty) => Some(empty.kind),
            _ => None,
        }
    }

    /// Returns `true` for tables with rows, which render their own bottom border.
    pub fn is_populated_table(&self) -> bool {
        matches!(self, TableCell::Simple(_) | TableCell::Combined(_))
    }

    pub fn child_column_count(&self) -> usize {
        match self {
            TableCell::Atomic(_) => 1,
            TableCell::Empty(empty) => empty.widths.len(),
            TableCell::Simple(table) => table.columns,
            TableCell::Combined(table) => table.columns,
        }
    }

    /// Natural width of each leaf column: the widest content in it.
    pub fn child_widths(&self) -> Vec<usize> {
        match self {
            TableCell::Atomic(cell) => vec![cell.width],
            TableCell::Empty(empty) => empty.widths.clone(),
            TableCell::Simple(table) => {
                let mut widths = vec![0; table.columns];
                for row in &table.rows {
                    for (width, cell) in widths.iter_mut().zip(row) {
                        *width = (*width).max(cell.width);
                    }
                }
                widths
            }
            TableCell::Combined(table) => {
                let mut widths = vec![0; table.columns];
                for row in &table.rows {
                    let row_widths = row.iter().flat_map(TableCell::child_widths);
                    for (width, cell_width) in widths.iter_mut().zip(row_widths) {
                        *width = (*width).max(cell_width);
                    }
                }
                widths
            }
        }
    }

    /// Grow leaf columns to at least `widths`.
    pub fn inflate_widths(&mut self, widths: &[usize]) {
        match self {
            TableCell::Atomic(cell) => {
                if let Some(&width) = widths.first() {
                    cell.inflate(width);
                }
            }
            TableCell::Empty(empty) => {
                for (current, &width) in empty.widths.iter_mut().zip(widths) {
                    *current = (*current).max(width);
                }
            }
            TableCell::Simple(table) => {
                for row in &mut table.rows {
                    for (cell, &width) in row.iter_mut().zip(widths) {
                        cell.inflate(width);
                    }
                }
            }
            TableCell::Combined(table) => {
                for row in &mut table.rows {
                    let mut offset = 0;
                    for cell in row.iter_mut() {
                        let span = cell.child_column_count();
                        let end = (offset + span).min(widths.len());
                        cell.inflate_widths(&widths[offset.min(end)..end]);
                        offset += span;
                    }
                }
            }
        }
    }

    /// Total rendered width including inner column separators.
    pub fn total_width(&self) -> usize {
        total_width(&self.child_widths())
    }

    /// The cell's lines. Populated tables end with their own bottom border.
    pub fn render(&self) -> Vec<String> {
        match self {
            TableCell::Atomic(cell) => cell.render(),
            TableCell::Empty(_) => vec![repeat_char(' ', self.total_width())],
            TableCell::Simple(table) => {
                let divider = self.render_bottom_border('-');
                let mut lines = Vec::new();
                for row in &table.rows {
                    let blocks = row.iter().map(|cell| (cell.render(), cell.width)).collect();
                    lines.extend(join_blocks(blocks));
                    lines.push(divider.clone());
                }
                lines
            }
            TableCell::Combined(table) => {
                let divider = self.render_bottom_border('-');
                let mut lines = Vec::new();
                for row in &table.rows {
                    let blocks = row
                        .iter()
                        .map(|cell| (cell.render_in_row(), cell.total_width()))
                        .collect();
                    lines.extend(join_blocks(blocks));
                    lines.push(divider.clone());
                }
                lines
            }
        }
    }

    // The enclosing row draws its own divider, so a sub-table drops its border.
    fn render_in_row(&self) -> Vec<String> {
        let mut lines = self.render();
        if self.is_populated_table() {
            lines.pop();
        }
        lines
    }

    /// A divider under this cell: `fill` segments per leaf column joined by `+`.
    pub fn render_bottom_border(&self, fill: char) -> String {
        match self {
            TableCell::Atomic(cell) => repeat_char(fill, cell.width),
            TableCell::Empty(empty) => border_line(&empty.widths, fill),
            TableCell::Simple(_) | TableCell::Combined(_) => {
                border_line(&self.child_widths(), fill)
            }
        }
    }
}

// A field without a nested model has no sub-columns, so a table in it shows blank.
fn scalar_cell(field: &ModelField, value: &Value, config: &TableConfig) -> AtomicCell {
    match value.as_table() {
        Some(TableView::Rows { .. }) => {
            warn!(field = %field.alias, "table in a scalar field, leaving it blank");
            AtomicCell::new("", config)
        }
        _ => AtomicCell::new(&value.to_string(), config),
    }
}

/// Width of leaf columns laid side by side with single-character separators.
pub fn total_width(widths: &[usize]) -> usize {
    widths.iter().sum::<usize>() + widths.len().saturating_sub(1)
}

/// A divider line of `fill` segments joined by `+`.
pub fn border_line(widths: &[usize], fill: char) -> String {
    widths
        .iter()
        .map(|&w| repeat_char(fill, w))
        .collect::<Vec<_>>()
        .join(BORDER_JOINT)
}

/// Place blocks of lines side by side, separated by `|`.
///
/// Each block is `(lines, width)`; shorter blocks are padded with blank lines
/// to the tallest block.
pub fn join_blocks(blocks: Vec<(Vec<String>, usize)>) -> Vec<String> {
    let height = blocks.iter().map(|(lines, _)| lines.len()).max().unwrap_or(0);
    (0..height)
        .map(|i| {
            blocks
                .iter()
                .map(|(lines, width)| match lines.get(i) {
                    Some(line) => pad_right(line, *width),
                    None => repeat_char(' ', *width),
                })
                .collect::<Vec<_>>()
                .join(COLUMN_SEPARATOR)
        })
        .collect()
}

/// Lay out the body of a document: the main dataset, or a blank table.
pub fn body_cell(model: &Arc<Model>, main: Option<&DataSet>, config: &TableConfig) -> TableCell {
    let columns = model.leaf_count().max(1);
    match main {
        Some(dataset) => TableCell::from_dataset(dataset, columns, config),
        None => TableCell::empty(EmptyKind::NoData, columns),
    }
}
