//! Format adapters and the public entry points.
//!
//! Every format implements [`Format`] by converting between its own
//! representation and an untyped [`Document`]. The entry points then run
//! the schema walk of `tc_codec` against that document:
//!
//! - [`dumps`]: typed value to text or bytes.
//! - [`loads`]: text or bytes to an untyped document.
//! - [`loads_as`]: text or bytes to a typed value.
//!
//! [`dumps_of`] and [`loads_of`] take the schema of a host type from the
//! global [`SchemaRegistry`].
//!
//! # Examples
//!
//! ```
//! use tc_format::{Json, dumps, loads_as};
//! use tc_schema::{Record, RecordBuilder, Schema, Value, attrs};
//!
//! let schema = RecordBuilder::new("Pair")
//!     .field_with("a", Schema::str().into_ref(), attrs! { "rename" => "x" })
//!     .field("b", Schema::int().into_ref())
//!     .build()
//!     .unwrap();
//! let value = Value::Record(Record::new().with("a", "yes").with("b", 3));
//!
//! let text = dumps::<Json>(&schema, &value).unwrap();
//! assert_eq!(text, r#"{"x":"yes","b":3}"#);
//! assert_eq!(loads_as::<Json>(&schema, &text).unwrap(), value);
//! ```

// -----------------------------------------------------------------------------
// Modules

mod error;
mod format;

#[cfg(feature = "json")]
mod json;
#[cfg(feature = "msgpack")]
mod msgpack;
#[cfg(feature = "toml")]
mod toml;
#[cfg(feature = "yaml")]
mod yaml;

// -----------------------------------------------------------------------------
// Exports

pub use error::Error;
pub use format::Format;

#[cfg(feature = "json")]
pub use self::json::Json;
#[cfg(feature = "msgpack")]
pub use self::msgpack::MessagePack;
#[cfg(feature = "toml")]
pub use self::toml::Toml;
#[cfg(feature = "yaml")]
pub use self::yaml::Yaml;

// -----------------------------------------------------------------------------
// Entry points

use tc_codec::{decode, encode};
use tc_schema::{Describe, Schema, SchemaRegistry, Value};
use tc_wire::{Document, DocumentReader, DocumentWriter};

/// Encodes `value` against `schema` in format `F`.
pub fn dumps<F: Format>(schema: &Schema, value: &Value) -> Result<F::Output, Error> {
    let mut writer = DocumentWriter::new(F::CAPABILITIES);
    encode(schema, value, &mut writer)?;
    let document = writer.finish()?;
    log::trace!("writing {} `{}`", F::NAME, schema.name());
    F::write(&document)
}

/// Parses `input` in format `F` without a schema.
///
/// The result can be turned into a [`Value`] with [`Value::from_document`].
#[inline]
pub fn loads<F: Format>(input: &F::Input) -> Result<Document, Error> {
    F::read(input)
}

/// Parses `input` in format `F` and decodes it against `schema`.
pub fn loads_as<F: Format>(schema: &Schema, input: &F::Input) -> Result<Value, Error> {
    let document = F::read(input)?;
    log::trace!("decoding {} `{}`", F::NAME, schema.name());
    Ok(decode(schema, DocumentReader::new(&document, F::CAPABILITIES))?)
}

/// [`dumps`] with the schema of `T`.
pub fn dumps_of<F: Format, T: Describe>(value: &Value) -> Result<F::Output, Error> {
    let schema = SchemaRegistry::global().schema_of::<T>()?;
    dumps::<F>(&schema, value)
}

/// [`loads_as`] with the schema of `T`.
pub fn loads_of<F: Format, T: Describe>(input: &F::Input) -> Result<Value, Error> {
    let schema = SchemaRegistry::global().schema_of::<T>()?;
    loads_as::<F>(&schema, input)
}
