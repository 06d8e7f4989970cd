//! Error types for the uql crate.
//!
//! Decoding errors are fatal to the decode call. Errors reported by the
//! server inside the response are not errors here: they are collected on the
//! [`Response`](crate::Response) as [`ServerError`](crate::ServerError) values.

use thiserror::Error;

/// Errors that can occur while decoding a response.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The response bytes are not a JSON array of chunks.
    #[error("malformed response envelope: {0}")]
    Envelope(#[from] serde_json::Error),

    /// A cell payload does not match the type its field declares.
    #[error("dataset '{dataset}', row {row}, column {column}: {reason}")]
    InvalidCell {
        dataset: String,
        row: usize,
        column: usize,
        reason: String,
    },

    /// A row does not carry one cell per model field.
    #[error("dataset '{dataset}', row {row}: expected {expected} cells, found {found}")]
    RowWidth {
        dataset: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A data chunk names a model that no model chunk declared.
    #[error("dataset '{dataset}' refers to undeclared model '{model}'")]
    UnknownModel { dataset: String, model: String },

    /// A data chunk carries rows but no model reference.
    #[error("dataset '{dataset}' has rows but no model")]
    MissingModel { dataset: String },
}

/// Errors that can occur when projecting a dataset into named records.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// Two fields at the same nesting level share an alias.
    #[error("duplicate field alias at '{path}'")]
    AliasCollision { path: String },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors that can occur when following a continuation link.
#[derive(Debug, Error)]
pub enum FollowError {
    /// The transport could not fetch the linked page.
    #[error("failed to fetch '{href}': {message}")]
    Transport { href: String, message: String },

    /// The linked page was fetched but could not be decoded.
    #[error("failed to decode '{href}': {source}")]
    Decode {
        href: String,
        #[source]
        source: DecodeError,
    },
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for decode operations.
pub type Result<T> = std::result::Result<T, DecodeError>;
