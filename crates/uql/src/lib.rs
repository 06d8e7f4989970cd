//! # UQL - chunked query response decoding
//!
//! `uql` turns the body of a UQL query response into a typed, self-contained
//! document. A response is a JSON array of chunks: `model` chunks declare a
//! field schema, `data` chunks carry the rows of named datasets, and `error`
//! chunks report server-side problems.
//!
//! ## Pipeline
//!
//! ```text
//! bytes ─► chunks ─► datasets by name ─► resolved main dataset
//!          parse     decode + index      follow references
//! ```
//!
//! - [`ModelIndex`]: flattens nested models into a name lookup
//! - [`decode_rows`]: types every cell according to its field
//! - [`process_chunks`]: classifies chunks and builds the dataset arena
//! - [`Resolver`]: substitutes reference cells with the datasets they name
//! - [`Response`]: the facade over all of the above
//! - [`project_dataset`]: ordered records for JSON/YAML output
//!
//! ## Quick Start
//!
//! ```rust
//! use uql::{DecoderConfig, Response, Value};
//!
//! let body = r#"[
//!   {"type":"model","model":{"name":"m:main","fields":[
//!     {"alias":"service","type":"string"},
//!     {"alias":"calls","type":"complex","form":"reference",
//!      "model":{"name":"m:calls","fields":[{"alias":"count","type":"number"}]}}]}},
//!   {"type":"data","model":{"$jsonPath":"$","$model":"m:main"},"dataset":"d:main",
//!    "data":[["checkout",{"$dataset":"d:calls-1","$jsonPath":"$"}]]},
//!   {"type":"data","model":{"$jsonPath":"$","$model":"m:calls"},"dataset":"d:calls-1",
//!    "data":[[42]]}
//! ]"#;
//!
//! let response = Response::decode(body, &DecoderConfig::default()).unwrap();
//! let main = response.main().unwrap();
//!
//! match &main.rows[0][1] {
//!     Value::DataSet(calls) => assert_eq!(calls.rows[0][0], Value::Int(42)),
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```

mod chunk;
mod config;
mod dataset;
mod decode;
mod error;
mod model;
mod project;
mod resolve;
mod response;
mod value;

pub use chunk::{
    parse_chunks, process_chunks, Chunk, DataChunk, Decoded, Link, ModelRef, ServerError,
};
pub use config::{DecoderConfig, DEFAULT_MAX_DEPTH, MAIN_DATASET};
pub use dataset::{DataSet, Row};
pub use decode::{decode_cell, decode_rows, parse_timestamp};
pub use error::{ConfigError, DecodeError, FollowError, ProjectionError, Result};
pub use model::{FieldType, Form, Model, ModelField, ModelIndex};
pub use project::{project_dataset, to_json, to_json_pretty, to_yaml, Projection};
pub use resolve::Resolver;
pub use response::{follow, Response, Transport};
pub use value::{format_timestamp, DataSetRef, NestedTable, NoData, TableView, Value};
