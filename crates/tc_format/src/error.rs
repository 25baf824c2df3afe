use tc_codec::{DecodeError, EncodeError};
use tc_schema::SchemaError;
use tc_wire::WireError;
use thiserror::Error;

/// Any failure of the public entry points.
///
/// Schema construction failures are kept apart from failures of a single
/// call; see [`Error::is_construction`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("document: {0}")]
    Document(#[from] WireError),

    #[cfg(feature = "json")]
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "yaml")]
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[cfg(feature = "toml")]
    #[error("toml: {0}")]
    TomlRead(#[from] toml::de::Error),

    #[cfg(feature = "toml")]
    #[error("toml: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[cfg(feature = "msgpack")]
    #[error("msgpack: {0}")]
    MessagePackRead(#[from] rmp_serde::decode::Error),

    #[cfg(feature = "msgpack")]
    #[error("msgpack: {0}")]
    MessagePackWrite(#[from] rmp_serde::encode::Error),
}

impl Error {
    /// Whether the failure comes from building a schema rather than from
    /// encoding or decoding one value.
    #[inline]
    pub fn is_construction(&self) -> bool {
        matches!(self, Error::Schema(_))
    }
}
