use tc_wire::WireError;
use thiserror::Error;

use crate::Path;

fn raw_suffix(raw: &Option<String>) -> String {
    match raw {
        Some(raw) => format!(" {raw}"),
        None => String::new(),
    }
}

// -----------------------------------------------------------------------------
// DecodeError

/// A failure while decoding a wire document against a schema.
///
/// Every variant carries the [`Path`] of the offending value.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("{path}: expected {expected}, found {actual}{}", raw_suffix(.raw))]
    TypeMismatch {
        path: Path,
        expected: String,
        actual: &'static str,
        raw: Option<String>,
    },

    #[error("{path}: missing field `{field}`")]
    MissingField { path: Path, field: String },

    #[error("{path}: unknown field `{field}`")]
    UnknownField { path: Path, field: String },

    #[error("{path}: no default available for field `{field}`")]
    MissingDefault { path: Path, field: String },

    #[error("{path}: variant `{variant}` cannot be deserialized")]
    SkippedVariant { path: Path, variant: String },

    #[error("{path}: unknown variant {value}")]
    UnknownVariant { path: Path, value: String },

    #[error("{path}: the format does not support flattened fields")]
    FlattenUnsupported { path: Path },

    #[error("{path}: expected {expected} elements, found {actual}")]
    ArityMismatch {
        path: Path,
        expected: usize,
        actual: usize,
    },

    #[error("{path}: {source}")]
    Wire {
        path: Path,
        #[source]
        source: WireError,
    },
}

impl DecodeError {
    /// Where in the document the failure occurred.
    pub fn path(&self) -> &Path {
        match self {
            DecodeError::TypeMismatch { path, .. }
            | DecodeError::MissingField { path, .. }
            | DecodeError::UnknownField { path, .. }
            | DecodeError::MissingDefault { path, .. }
            | DecodeError::SkippedVariant { path, .. }
            | DecodeError::UnknownVariant { path, .. }
            | DecodeError::FlattenUnsupported { path }
            | DecodeError::ArityMismatch { path, .. }
            | DecodeError::Wire { path, .. } => path,
        }
    }
}

// -----------------------------------------------------------------------------
// EncodeError

/// A failure while encoding a value against a schema.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum EncodeError {
    #[error("{path}: expected {expected}, found {actual}")]
    TypeMismatch {
        path: Path,
        expected: String,
        actual: &'static str,
    },

    #[error("{path}: value has no field `{field}`")]
    MissingField { path: Path, field: String },

    #[error("{path}: variant `{variant}` cannot be serialized")]
    SkippedVariant { path: Path, variant: String },

    #[error("{path}: unknown variant `{value}`")]
    UnknownVariant { path: Path, value: String },

    #[error("{path}: the format does not support flattened fields")]
    FlattenUnsupported { path: Path },

    #[error("{path}: expected {expected} elements, found {actual}")]
    ArityMismatch {
        path: Path,
        expected: usize,
        actual: usize,
    },

    #[error("{path}: {source}")]
    Wire {
        path: Path,
        #[source]
        source: WireError,
    },
}

impl EncodeError {
    /// Where in the value the failure occurred.
    pub fn path(&self) -> &Path {
        match self {
            EncodeError::TypeMismatch { path, .. }
            | EncodeError::MissingField { path, .. }
            | EncodeError::SkippedVariant { path, .. }
            | EncodeError::UnknownVariant { path, .. }
            | EncodeError::FlattenUnsupported { path }
            | EncodeError::ArityMismatch { path, .. }
            | EncodeError::Wire { path, .. } => path,
        }
    }
}
