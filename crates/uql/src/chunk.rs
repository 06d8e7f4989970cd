//! Wire chunks and the chunk processor.
//!
//! A response body is a JSON array of chunks, each tagged by `"type"`:
//!
//! ```text
//! {"type":"model","model":{"name":"m:main","fields":[...]}}
//! {"type":"data","model":{"$jsonPath":"$..[?(@.type == 'model')]..[?(@.name == 'm:main')]","$model":"m:main"},
//!  "dataset":"d:main","data":[[...],...],"_links":{"next":{"href":"..."}}}
//! {"type":"error","error":{"type":"...","title":"...","detail":"..."}}
//! ```
//!
//! [`process_chunks`] walks them in order and builds the dataset arena.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use tracing::{debug, trace, warn};

use crate::dataset::DataSet;
use crate::decode::decode_rows;
use crate::error::{DecodeError, Result};
use crate::model::{Model, ModelIndex};

/// One element of a response body.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Chunk {
    Model { model: Arc<Model> },
    Data(DataChunk),
    Error { error: ServerError },
    /// Chunk types this decoder does not know; skipped.
    #[serde(other)]
    Unknown,
}

/// Rows of one dataset.
#[derive(Clone, Debug, Deserialize)]
pub struct DataChunk {
    #[serde(default)]
    pub model: Option<ModelRef>,
    pub dataset: String,
    #[serde(default)]
    pub data: Vec<Vec<Json>>,
    #[serde(default)]
    pub metadata: BTreeMap<String, Json>,
    #[serde(rename = "_links", default)]
    pub links: BTreeMap<String, Link>,
}

/// Pointer from a data chunk to its model declaration.
#[derive(Clone, Debug, Deserialize)]
pub struct ModelRef {
    #[serde(rename = "$jsonPath", default)]
    pub json_path: String,
    #[serde(rename = "$model")]
    pub model: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Link {
    pub href: String,
}

/// An error reported by the server inside the response.
///
/// Collected on the response; never stops decoding.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerError {
    #[serde(rename = "type", default)]
    pub error_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub detail: String,
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.title.is_empty(), self.detail.is_empty()) {
            (false, false) => write!(f, "{}: {}", self.title, self.detail),
            (false, true) => f.write_str(&self.title),
            (true, false) => f.write_str(&self.detail),
            (true, true) => f.write_str(&self.error_type),
        }
    }
}

/// Output of the chunk processor: everything a response declared.
#[derive(Clone, Debug, Default)]
pub struct Decoded {
    /// The last top-level model declared.
    pub model: Option<Arc<Model>>,
    pub datasets: HashMap<String, DataSet>,
    pub errors: Vec<ServerError>,
}

/// Parse a response body into its chunks.
pub fn parse_chunks(bytes: &[u8]) -> Result<Vec<Chunk>> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Walk chunks in order, decoding every dataset and collecting errors.
///
/// A data chunk that names an undeclared model is fatal: the protocol sends a
/// model before the data that uses it.
pub fn process_chunks(chunks: Vec<Chunk>) -> Result<Decoded> {
    let mut decoded = Decoded::default();
    let mut index = ModelIndex::default();

    for chunk in chunks {
        match chunk {
            Chunk::Model { model } => {
                trace!(model = %model.name, "model chunk");
                index = ModelIndex::build(&model);
                decoded.model = Some(model);
            }
            Chunk::Data(data) => {
                let dataset = decode_data_chunk(data, &index)?;
                debug!(
                    dataset = %dataset.name,
                    rows = dataset.rows.len(),
                    "decoded data chunk"
                );
                if let Some(previous) = decoded.datasets.insert(dataset.name.clone(), dataset) {
                    warn!(dataset = %previous.name, "duplicate dataset name, keeping the later one");
                }
            }
            Chunk::Error { error } => {
                debug!(title = %error.title, "error chunk");
                decoded.errors.push(error);
            }
            Chunk::Unknown => trace!("skipping chunk of unknown type"),
        }
    }

    Ok(decoded)
}

fn decode_data_chunk(chunk: DataChunk, index: &ModelIndex) -> Result<DataSet> {
    let links = chunk
        .links
        .into_iter()
        .map(|(rel, link)| (rel, link.href))
        .collect();

    let Some(model_ref) = chunk.model else {
        if !chunk.data.is_empty() {
            return Err(DecodeError::MissingModel {
                dataset: chunk.dataset,
            });
        }
        return Ok(DataSet {
            name: chunk.dataset,
            model: None,
            metadata: chunk.metadata,
            rows: Vec::new(),
            links,
        });
    };

    let model = index
        .get(&model_ref.model)
        .cloned()
        .ok_or_else(|| DecodeError::UnknownModel {
            dataset: chunk.dataset.clone(),
            model: model_ref.model.clone(),
        })?;

    let rows = decode_rows(&chunk.dataset, &model, &chunk.data)?;
    Ok(DataSet {
        name: chunk.dataset,
        model: Some(model),
        metadata: chunk.metadata,
        rows,
        links,
    })
}
