//! Table rendering configuration.

use serde::Deserialize;
use uql::ConfigError;

/// Default number of spaces a tab expands to.
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Settings for table layout.
///
/// Constructed by the caller and passed to [`render_table`](crate::render_table);
/// nothing is read from process-wide state.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableConfig {
    /// Spaces substituted for each tab before measuring a cell.
    pub tab_width: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab_width(mut self, width: usize) -> Self {
        self.tab_width = width;
        self
    }

    /// Parse a configuration from YAML; missing keys keep their defaults.
    ///
    /// ```rust
    /// use uql_render::TableConfig;
    ///
    /// assert_eq!(TableConfig::from_yaml("tab_width: 2").unwrap().tab_width, 2);
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}
