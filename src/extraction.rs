//! Extraction payload intake
//!
//! Reads what a platform extraction call returned and hands out the sample
//! record that discovery runs on. Accepts the `{"success", "data", "message"}`
//! envelope, a bare array of records, a single record, or NDJSON.

use crate::error::{ExtractionError, SchemaDiscoveryError};
use serde::Deserialize;
use serde_json::Value;
use std::io::{BufRead, Read};

/// Fields the product assistant relies on; missing ones are worth a warning
pub const RECOMMENDED_FIELDS: [&str; 4] = ["id", "name", "price", "description"];

#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Vec<Value>,
    #[serde(default)]
    message: String,
}

/// Records returned by one extraction run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub records: Vec<Value>,
    pub message: Option<String>,
}

/// Summary counters of an extraction run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionStats {
    pub total_records: usize,
    /// Top-level fields of the sample record
    pub total_fields: usize,
}

impl Extraction {
    pub fn from_records(records: Vec<Value>) -> Self {
        Extraction { records, message: None }
    }

    /// Interpret an already parsed payload
    pub fn from_value(value: Value) -> Result<Self, ExtractionError> {
        if is_envelope(&value) {
            let envelope: Envelope = serde_json::from_value(value)?;
            if !envelope.success {
                return Err(ExtractionError::Rejected(envelope.message));
            }
            let message = (!envelope.message.is_empty()).then_some(envelope.message);
            return Ok(Extraction {
                records: envelope.data,
                message,
            });
        }

        match value {
            Value::Array(records) => Ok(Self::from_records(records)),
            other => Ok(Self::from_records(vec![other])),
        }
    }

    /// Read a payload, trying SIMD parsing first and falling back to NDJSON
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, ExtractionError> {
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;

        // simd-json rewrites its input buffer, keep untouched bytes for the fallback
        let mut scratch = content.clone();
        match simd_json::serde::from_slice::<Value>(&mut scratch) {
            Ok(value) => Self::from_value(value),
            Err(err) => {
                log::debug!("SIMD parse failed ({}), reading as NDJSON", err);
                Self::from_ndjson(content.as_slice())
            }
        }
    }

    /// Read newline-delimited records, skipping blank lines
    pub fn from_ndjson<R: BufRead>(reader: R) -> Result<Self, ExtractionError> {
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            records.push(serde_json::from_str(line)?);
        }
        Ok(Self::from_records(records))
    }

    /// The record discovery runs on: the first one
    pub fn sample(&self) -> Result<&Value, SchemaDiscoveryError> {
        self.records.first().ok_or(SchemaDiscoveryError::EmptyExtraction)
    }

    pub fn stats(&self) -> ExtractionStats {
        ExtractionStats {
            total_records: self.records.len(),
            total_fields: self
                .records
                .first()
                .and_then(Value::as_object)
                .map_or(0, |record| record.len()),
        }
    }
}

fn is_envelope(value: &Value) -> bool {
    value
        .as_object()
        .map_or(false, |obj| matches!(obj.get("success"), Some(Value::Bool(_))) && obj.contains_key("data"))
}

/// Recommended fields absent from `sample`
pub fn missing_recommended_fields(sample: &Value) -> Vec<&'static str> {
    let Some(record) = sample.as_object() else {
        return RECOMMENDED_FIELDS.to_vec();
    };
    RECOMMENDED_FIELDS
        .into_iter()
        .filter(|field| !record.contains_key(*field))
        .collect()
}
