//! Decoder configuration.
//!
//! There is no process-wide decoder: callers build a [`DecoderConfig`] and pass
//! it to [`Response::decode`](crate::Response::decode).

use serde::Deserialize;

use crate::error::ConfigError;

/// Name of the dataset every response is rooted at.
pub const MAIN_DATASET: &str = "d:main";

/// Default cap on nested reference resolution.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Settings for decoding and reference resolution.
///
/// # Example
///
/// ```rust
/// use uql::DecoderConfig;
///
/// let config = DecoderConfig::from_yaml("max_depth: 8").unwrap();
/// assert_eq!(config.max_depth, 8);
/// assert_eq!(config.main_dataset, "d:main");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecoderConfig {
    /// Dataset the resolved document starts from.
    pub main_dataset: String,
    /// Deepest chain of references followed before giving up with a marker.
    pub max_depth: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            main_dataset: MAIN_DATASET.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecoderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn main_dataset(mut self, name: impl Into<String>) -> Self {
        self.main_dataset = name.into();
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Parse a configuration from YAML; missing keys keep their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: DecoderConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that cannot address a dataset.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.main_dataset.is_empty() {
            return Err(ConfigError::Invalid("main_dataset must not be empty".into()));
        }
        Ok(())
    }
}
