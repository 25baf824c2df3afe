//! The schema model: immutable descriptions of a type's shape that drive
//! encoding and decoding.
//!
//! - [`Schema`] / [`SchemaKind`]: the shape itself, shared via [`SchemaRef`].
//! - [`RecordBuilder`] / [`EnumBuilder`]: build user types from declared
//!   fields and variants plus their [`Attributes`].
//! - [`resolve`]: checks loosely-typed annotations and normalizes them.
//! - [`convert`]: the case converter behind `rename_all`.
//! - [`Describe`] / [`SchemaRegistry`]: host reflection and the per-type
//!   schema cache.
//! - [`Value`]: the typed in-memory value a schema describes.

// -----------------------------------------------------------------------------
// Modules

mod attr;
mod case;
mod describe;
mod enums;
mod error;
mod record;
mod registry;
mod schema;
mod textual;
mod value;
mod zero;

pub mod resolve;

// -----------------------------------------------------------------------------
// Exports

pub use attr::{AttrValue, Attributes, Factory};
pub use case::{Convention, convert};
pub use describe::{AnyValue, BuildContext, Bytes, Describe, Union};
pub use enums::{EnumBuilder, EnumSchema, VariantFlags, VariantSpec};
pub use error::SchemaError;
pub use record::{
    CatchAll, DecodePlan, DefaultPolicy, FieldFlags, FieldSpec, PlanLeaf, RecordBuilder,
    RecordSchema,
};
pub use registry::SchemaRegistry;
pub use schema::{Primitive, Schema, SchemaKind, SchemaRef};
pub use value::{EnumMember, Record, UnionMember, Value};
pub use zero::zero_value;
