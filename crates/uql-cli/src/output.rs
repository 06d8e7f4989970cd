//! Output mode control for the `--output` flag.
//!
//! [`OutputMode::Table`] draws the response as text; the structured modes
//! serialize its projection instead.

use clap::ValueEnum;
use uql::{to_json_pretty, to_yaml, ProjectionError, Response};
use uql_render::{render_response, TableConfig};

/// How a decoded response is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputMode {
    /// Nested text table
    #[default]
    Table,
    /// Projected records as pretty-printed JSON
    Json,
    /// Projected records as YAML
    Yaml,
}

impl OutputMode {
    /// Returns true if this mode serializes the projection instead of drawing a table.
    pub fn is_structured(&self) -> bool {
        matches!(self, OutputMode::Json | OutputMode::Yaml)
    }
}

/// Format one response in the given mode. The result always ends with a newline
/// unless it is empty.
pub fn format_response(
    response: &Response,
    mode: OutputMode,
    table: &TableConfig,
) -> Result<String, ProjectionError> {
    let mut out = match mode {
        OutputMode::Table => return Ok(render_response(response, table)),
        OutputMode::Json => to_json_pretty(&response.project()?)?,
        OutputMode::Yaml => to_yaml(&response.project()?)?,
    };
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}
