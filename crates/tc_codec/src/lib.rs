//! The schema walk between typed [`Value`](tc_schema::Value)s and the wire
//! event model.
//!
//! [`encode`] pushes a value into a [`WireSink`](tc_wire::WireSink);
//! [`decode`] pulls one from a [`WireSource`](tc_wire::WireSource). Both are
//! driven entirely by the [`Schema`](tc_schema::Schema) and adjust to the
//! format through its [`Capabilities`](tc_wire::Capabilities): string-only
//! map keys, missing byte strings, missing null and unsupported flatten.

// -----------------------------------------------------------------------------
// Modules

mod de;
mod error;
mod key;
mod path;
mod ser;

// -----------------------------------------------------------------------------
// Exports

pub use de::{Decoder, decode};
pub use error::{DecodeError, EncodeError};
pub use path::{Path, Segment};
pub use ser::{Encoder, encode};
