//! # UQL Render - nested tables as plain text
//!
//! `uql-render` draws a decoded [`uql::Response`] as a monospaced text table.
//! Nested fields expand into sub-columns under their parent's name, and
//! nested rows stack vertically inside the parent row.
//!
//! ## Core Concepts
//!
//! - [`TableCell`]: layout tree for the body (atomic, empty, simple, combined)
//! - [`HeaderCell`]: layout tree for the column names
//! - [`TableLayout`]: negotiates widths between the two and draws the result
//! - [`TableConfig`]: tab expansion and other layout settings
//!
//! ## Quick Start
//!
//! ```rust
//! use uql::{DecoderConfig, Response};
//! use uql_render::{render_response, TableConfig};
//!
//! let body = r#"[
//!   {"type":"model","model":{"name":"m:main","fields":[
//!     {"alias":"id","type":"string"},
//!     {"alias":"attributes","type":"complex","form":"reference",
//!      "model":{"name":"m:attr","fields":[
//!        {"alias":"name","type":"string"},{"alias":"value","type":"string"}]}}]}},
//!   {"type":"data","model":{"$jsonPath":"$","$model":"m:main"},"dataset":"d:main",
//!    "data":[["a",{"$dataset":"d:attr-1","$jsonPath":"$"}]]},
//!   {"type":"data","model":{"$jsonPath":"$","$model":"m:attr"},"dataset":"d:attr-1",
//!    "data":[["k1","v1"],["k2","v2"]]}
//! ]"#;
//!
//! let response = Response::decode(body, &DecoderConfig::default()).unwrap();
//! let table = render_response(&response, &TableConfig::default());
//!
//! assert_eq!(table, concat!(
//!     " id | attributes   \n",
//!     "    | name | value \n",
//!     "====+======+=======\n",
//!     " a  | k1   | v1    \n",
//!     "    |------+-------\n",
//!     "    | k2   | v2    \n",
//!     "----+------+-------\n",
//! ));
//! ```
//!
//! ## Widths
//!
//! Every leaf column is as wide as its widest content plus one space on each
//! side. Columns are joined by `|` and divider segments by `+`. A parent name
//! wider than its children widens only the rightmost child.

mod config;
mod header;
mod layout;
mod render;
mod util;

pub use config::{TableConfig, DEFAULT_TAB_WIDTH};
pub use header::HeaderCell;
pub use layout::{
    border_line, total_width, AtomicCell, CombinedTable, EmptyKind, EmptyTable, SimpleTable,
    TableCell, BORDER_JOINT, CELL_PADDING, COLUMN_SEPARATOR,
};
pub use render::{render_dataset, render_response, render_table, TableLayout};
pub use util::{cell_lines, display_width, expand_tabs, pad_right};
