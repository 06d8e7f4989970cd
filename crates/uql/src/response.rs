//! The decoded response facade.
//!
//! [`Response::decode`] runs the whole pipeline over one response body:
//! parse chunks, decode datasets, resolve references from the main dataset.
//! Server-side errors are collected, not raised; check
//! [`Response::has_errors`] explicitly.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::chunk::{parse_chunks, process_chunks, ServerError};
use crate::config::DecoderConfig;
use crate::dataset::DataSet;
use crate::error::{FollowError, ProjectionError, Result};
use crate::model::Model;
use crate::project::{project_dataset, Projection};
use crate::resolve::Resolver;

/// Fetches response bodies for continuation links.
///
/// Implemented by the caller's HTTP layer; the decoder itself never does I/O.
pub trait Transport {
    type Error: fmt::Display;

    fn fetch(&self, href: &str) -> std::result::Result<Vec<u8>, Self::Error>;
}

/// A fully decoded and resolved response.
#[derive(Clone, Debug)]
pub struct Response {
    raw: Vec<u8>,
    model: Option<Arc<Model>>,
    main: Option<DataSet>,
    errors: Vec<ServerError>,
}

impl Response {
    /// Decode a response body.
    ///
    /// # Example
    ///
    /// ```rust
    /// use uql::{DecoderConfig, Response, Value};
    ///
    /// let body = r#"[
    ///   {"type":"model","model":{"name":"m:main","fields":[{"alias":"count","type":"number"}]}},
    ///   {"type":"data","model":{"$jsonPath":"$","$model":"m:main"},"dataset":"d:main","data":[[123]]}
    /// ]"#;
    ///
    /// let response = Response::decode(body, &DecoderConfig::default()).unwrap();
    /// assert!(!response.has_errors());
    /// assert_eq!(response.main().unwrap().rows[0][0], Value::Int(123));
    /// ```
    pub fn decode(bytes: impl Into<Vec<u8>>, config: &DecoderConfig) -> Result<Response> {
        let raw = bytes.into();
        let decoded = process_chunks(parse_chunks(&raw)?)?;

        let main = Resolver::new(&decoded.datasets, config.max_depth)
            .resolve_named(&config.main_dataset);
        debug!(
            datasets = decoded.datasets.len(),
            errors = decoded.errors.len(),
            has_main = main.is_some(),
            "decoded response"
        );

        Ok(Response {
            raw,
            model: decoded.model,
            main,
            errors: decoded.errors,
        })
    }

    /// The top-level model declared by the response.
    pub fn model(&self) -> Option<&Arc<Model>> {
        self.model.as_ref()
    }

    /// The resolved main dataset; `None` if the response carried none.
    pub fn main(&self) -> Option<&DataSet> {
        self.main.as_ref()
    }

    pub fn errors(&self) -> &[ServerError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The undecoded response body.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Look up a continuation link on any dataset.
    pub fn find_link<'d>(dataset: &'d DataSet, rel: &str) -> Option<&'d str> {
        dataset.link(rel)
    }

    /// Project the main dataset into records; `null` if there is none.
    pub fn project(&self) -> std::result::Result<Projection, ProjectionError> {
        match &self.main {
            Some(main) => project_dataset(main),
            None => Ok(Projection::Scalar(serde_json::Value::Null)),
        }
    }
}

/// Fetch and decode the page a dataset links to under `rel`.
///
/// Returns `Ok(None)` when the dataset has no such link.
pub fn follow<T: Transport>(
    dataset: &DataSet,
    rel: &str,
    transport: &T,
    config: &DecoderConfig,
) -> std::result::Result<Option<Response>, FollowError> {
    let Some(href) = Response::find_link(dataset, rel) else {
        return Ok(None);
    };
    debug!(dataset = %dataset.name, rel, href, "following link");

    let bytes = transport.fetch(href).map_err(|e| FollowError::Transport {
        href: href.to_string(),
        message: e.to_string(),
    })?;
    Response::decode(bytes, config)
        .map(Some)
        .map_err(|source| FollowError::Decode {
            href: href.to_string(),
            source,
        })
}
