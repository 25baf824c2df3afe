//! The wire event model shared by every format adapter.
//!
//! A format adapter turns its concrete representation into a stream of
//! structural events. The schema walk in `tc_codec` only talks to the two
//! traits defined here:
//!
//! - [`WireSink`]: the producer side, fed by the serializer.
//! - [`WireSource`]: the pull side, drained by the deserializer.
//!
//! Format quirks are reported through [`Capabilities`] instead of being
//! branched on by name.
//!
//! The adapters in this workspace go through an untyped [`Document`] tree:
//! [`DocumentWriter`] is a sink that builds one, [`DocumentReader`] is a
//! source that walks one.

// -----------------------------------------------------------------------------
// Modules

mod capabilities;
mod document;
mod error;
mod reader;
mod scalar;
mod sink;
mod source;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use capabilities::Capabilities;
pub use document::Document;
pub use error::WireError;
pub use reader::{DocumentReader, ReaderCheckpoint};
pub use scalar::Scalar;
pub use sink::WireSink;
pub use source::{WireKind, WireSource};
pub use writer::DocumentWriter;
