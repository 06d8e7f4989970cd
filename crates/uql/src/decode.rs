//! Value decoding: raw JSON cell payloads to typed [`Value`]s.
//!
//! Dispatch happens per field, in declaration order. Reference-form fields
//! decode to [`DataSetRef`] regardless of their type; everything else is
//! decoded by an exhaustive match on [`FieldType`]. A failing cell fails the
//! whole dataset.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value as Json;

use crate::dataset::Row;
use crate::error::{DecodeError, Result};
use crate::model::{FieldType, Model, ModelField};
use crate::value::{DataSetRef, NestedTable, Value};

/// Decode a dataset's raw row matrix with the model governing it.
pub fn decode_rows(dataset: &str, model: &Arc<Model>, data: &[Vec<Json>]) -> Result<Vec<Row>> {
    data.iter()
        .enumerate()
        .map(|(row_idx, raw)| -> Result<Row> {
            if raw.len() != model.fields.len() {
                return Err(DecodeError::RowWidth {
                    dataset: dataset.to_string(),
                    row: row_idx,
                    expected: model.fields.len(),
                    found: raw.len(),
                });
            }
            model
                .fields
                .iter()
                .zip(raw)
                .enumerate()
                .map(|(col_idx, (field, payload))| {
                    decode_cell(field, payload).map_err(|reason| DecodeError::InvalidCell {
                        dataset: dataset.to_string(),
                        row: row_idx,
                        column: col_idx,
                        reason,
                    })
                })
                .collect()
        })
        .collect()
}

/// Decode one cell payload for a field.
///
/// Errors are plain reasons; [`decode_rows`] attaches the location.
pub fn decode_cell(field: &ModelField, payload: &Json) -> std::result::Result<Value, String> {
    if payload.is_null() {
        return Ok(Value::Null);
    }

    if field.is_reference() {
        let reference: DataSetRef = serde_json::from_value(payload.clone())
            .map_err(|e| format!("invalid dataset reference for '{}': {}", field.alias, e))?;
        return Ok(Value::DataSetRef(reference));
    }

    match &field.field_type {
        FieldType::Number => decode_number(payload),
        FieldType::Long => payload
            .as_i64()
            .map(Value::Int)
            .ok_or_else(|| mismatch("long", payload)),
        FieldType::Double => payload
            .as_f64()
            .map(Value::Double)
            .ok_or_else(|| mismatch("double", payload)),
        FieldType::String | FieldType::Csv | FieldType::Duration => payload
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| mismatch(field.field_type.as_str(), payload)),
        FieldType::Boolean => payload
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| mismatch("boolean", payload)),
        FieldType::Timestamp => {
            let text = payload
                .as_str()
                .ok_or_else(|| mismatch("timestamp", payload))?;
            parse_timestamp(text)
                .map(Value::Timestamp)
                .ok_or_else(|| format!("unparsable timestamp '{}'", text))
        }
        FieldType::Complex | FieldType::TimeSeries => {
            let model = field.model.as_ref().ok_or_else(|| {
                format!(
                    "{} field '{}' has no nested model",
                    field.field_type, field.alias
                )
            })?;
            decode_nested(model, payload).map(|rows| {
                Value::NestedTable(NestedTable {
                    model: Arc::clone(model),
                    rows,
                })
            })
        }
        FieldType::Object | FieldType::Unknown(_) => Ok(Value::GenericScalar(payload.clone())),
        FieldType::Json => Ok(Value::GenericJson(payload.clone())),
    }
}

// Integer literals decode as Int; anything with a fraction or exponent stays
// a double. `100.0` is therefore a Double.
fn decode_number(payload: &Json) -> std::result::Result<Value, String> {
    if let Some(i) = payload.as_i64() {
        return Ok(Value::Int(i));
    }
    payload
        .as_f64()
        .map(Value::Double)
        .ok_or_else(|| mismatch("number", payload))
}

fn decode_nested(model: &Arc<Model>, payload: &Json) -> std::result::Result<Vec<Row>, String> {
    let rows = payload
        .as_array()
        .ok_or_else(|| mismatch("nested table", payload))?;

    rows.iter()
        .enumerate()
        .map(|(row_idx, raw)| -> std::result::Result<Row, String> {
            let cells = raw.as_array().ok_or_else(|| {
                format!("nested row {}: {}", row_idx, mismatch("row array", raw))
            })?;
            if cells.len() != model.fields.len() {
                return Err(format!(
                    "nested row {}: expected {} cells, found {}",
                    row_idx,
                    model.fields.len(),
                    cells.len()
                ));
            }
            model
                .fields
                .iter()
                .zip(cells)
                .enumerate()
                .map(|(col_idx, (field, cell))| {
                    decode_cell(field, cell).map_err(|reason| {
                        format!("nested row {}, column {}: {}", row_idx, col_idx, reason)
                    })
                })
                .collect()
        })
        .collect()
}

/// Parse an ISO-8601 timestamp, normalizing to UTC.
///
/// Accepts RFC 3339 with an offset, a date-time without offset (taken as
/// UTC), and a bare date (midnight UTC).
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn mismatch(expected: &str, payload: &Json) -> String {
    let found = match payload {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    };
    format!("expected {}, found {}", expected, found)
}
