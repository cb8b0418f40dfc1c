//! Error types
//!
//! Each concern has its own error enum; `Error` gathers them for callers that
//! drive a whole wizard session.

use crate::path::FieldPath;
use thiserror::Error;

/// A canonical path string that could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldPathError {
    #[error("Field path is empty")]
    Empty,

    #[error("Field path '{0}' contains an empty key")]
    EmptyKey(String),

    #[error("Malformed field path: {0}")]
    Malformed(String),
}

/// No usable sample record to discover fields from
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaDiscoveryError {
    /// The sample is a scalar or an array instead of a record
    #[error("Extraction returned no usable data (sample is {found}, expected an object), please retry")]
    NotAnObject { found: &'static str },

    #[error("Extraction returned no records, please retry")]
    EmptyExtraction,
}

/// Identifier assignment against a path that cannot hold that role
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidIdentifierPathError {
    #[error("Product identifier must be a top-level field, got '{0}'")]
    NotTopLevel(FieldPath),

    #[error("Field '{0}' does not exist in the discovered schema")]
    UnknownField(FieldPath),

    #[error("Field '{0}' is not an expanded array of objects")]
    NotAnArray(FieldPath),

    #[error("Field '{field}' is not a field of '{array}' items")]
    NotUnderArray { array: FieldPath, field: FieldPath },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Cannot select unknown field '{0}'")]
    UnknownField(FieldPath),
}

/// Failure reading a platform extraction payload
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Failed to read extraction data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse extraction data: {0}")]
    Json(#[from] serde_json::Error),

    /// The platform answered with `success: false`
    #[error("Extraction rejected: {0}")]
    Rejected(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Select at least one field to include")]
    NoFieldsSelected,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown field group '{0}'")]
pub struct UnknownFieldGroupError(pub String);

/// Any failure of a field mapping session
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Path(#[from] FieldPathError),

    #[error(transparent)]
    Discovery(#[from] SchemaDiscoveryError),

    #[error(transparent)]
    Identifier(#[from] InvalidIdentifierPathError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

pub type Result<T> = std::result::Result<T, Error>;
