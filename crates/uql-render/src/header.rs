//! Header cells mirroring a model's field tree.
//!
//! A leaf header is one column name. A nested header shows its own name over
//! the full span of its children, with the children's headers below it.

use uql::{Model, ModelField};

use crate::config::TableConfig;
use crate::layout::{join_blocks, total_width, AtomicCell};
use crate::util::pad_right;

/// Header for one field and, recursively, its nested fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderCell {
    label: AtomicCell,
    children: Vec<HeaderCell>,
}

impl HeaderCell {
    /// One header cell per field of `model`.
    pub fn for_model(model: &Model, config: &TableConfig) -> Vec<HeaderCell> {
        model
            .fields
            .iter()
            .map(|field| HeaderCell::for_field(field, config))
            .collect()
    }

    pub fn for_field(field: &ModelField, config: &TableConfig) -> HeaderCell {
        let children = field
            .nested_model()
            .map(|model| HeaderCell::for_model(model, config))
            .unwrap_or_default();
        HeaderCell {
            label: AtomicCell::new(&field.alias, config),
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child_column_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(HeaderCell::child_column_count).sum()
        }
    }

    /// Natural width of each leaf column under this header.
    ///
    /// A name wider than its children's combined span widens only the
    /// rightmost child column.
    pub fn child_widths(&self) -> Vec<usize> {
        if self.is_leaf() {
            return vec![self.label.width()];
        }

        let mut widths: Vec<usize> = self
            .children
            .iter()
            .flat_map(HeaderCell::child_widths)
            .collect();
        let span = total_width(&widths);
        if let Some(last) = widths.last_mut() {
            if self.label.width() > span {
                *last += self.label.width() - span;
            }
        }
        widths
    }

    /// Grow leaf columns to at least `widths`.
    pub fn inflate_widths(&mut self, widths: &[usize]) {
        if self.is_leaf() {
            if let Some(&width) = widths.first() {
                self.label.inflate(width);
            }
            return;
        }

        let mut offset = 0;
        for child in &mut self.children {
            let span = child.child_column_count();
            let end = (offset + span).min(widths.len());
            child.inflate_widths(&widths[offset.min(end)..end]);
            offset += span;
        }
    }

    pub fn total_width(&self) -> usize {
        total_width(&self.child_widths())
    }

    /// This header's lines: its name, then its children side by side.
    pub fn render(&self) -> Vec<String> {
        if self.is_leaf() {
            return self.label.render();
        }

        let width = self.total_width();
        let mut lines: Vec<String> = self
            .label_lines()
            .into_iter()
            .map(|line| pad_right(&line, width))
            .collect();
        let blocks = self
            .children
            .iter()
            .map(|child| (child.render(), child.total_width()))
            .collect();
        lines.extend(join_blocks(blocks));
        lines
    }

    fn label_lines(&self) -> Vec<String> {
        self.label
            .lines()
            .iter()
            .map(|line| format!(" {}", line))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uql::FieldType;

    fn nested_field(name: &str, children: &[&str]) -> ModelField {
        let fields = children
            .iter()
            .map(|c| ModelField::new(*c, FieldType::String))
            .collect();
        ModelField::nested(name, FieldType::Complex, Model::new("m:nested", fields))
    }

    fn header(field: &ModelField) -> HeaderCell {
        HeaderCell::for_field(field, &TableConfig::default())
    }

    #[test]
    fn leaf_width_is_name_plus_padding() {
        let cell = header(&ModelField::new("id", FieldType::Long));
        assert!(cell.is_leaf());
        assert_eq!(cell.child_widths(), vec![4]);
        assert_eq!(cell.render(), vec![" id "]);
    }

    #[test]
    fn wide_parent_widens_rightmost_child_only() {
        // "attributes" is 12 wide; children "a" and "b" span 3 + 1 + 3 = 7.
        let cell = header(&nested_field("attributes", &["a", "b"]));
        assert_eq!(cell.child_column_count(), 2);
        assert_eq!(cell.child_widths(), vec![3, 8]);
        assert_eq!(cell.total_width(), 12);
    }

    #[test]
    fn narrow_parent_leaves_children_alone() {
        let cell = header(&nested_field("p", &["name", "value"]));
        assert_eq!(cell.child_widths(), vec![6, 7]);
    }

    #[test]
    fn nested_header_renders_two_lines() {
        let mut cell = header(&nested_field("kv", &["k", "v"]));
        cell.inflate_widths(&[4, 4]);
        assert_eq!(cell.render(), vec![" kv      ", " k  | v  "]);
    }

    #[test]
    fn inflate_never_shrinks() {
        let mut cell = header(&nested_field("kv", &["key", "v"]));
        cell.inflate_widths(&[1, 6]);
        assert_eq!(cell.child_widths(), vec![5, 6]);
    }
}
