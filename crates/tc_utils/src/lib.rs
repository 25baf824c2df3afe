//! Small shared containers for the codec workspace.
//!
//! - [`hash`]: `hashbrown` containers with a fixed `foldhash` seed, so that
//!   lookup tables built from schemas behave the same on every run.
//! - [`TypeIdMap`]: a map keyed by [`TypeId`](core::any::TypeId), the host-type
//!   identity used by the schema cache.

// -----------------------------------------------------------------------------
// Modules

mod typeid_map;

pub mod hash;

// -----------------------------------------------------------------------------
// Top-level exports

pub use typeid_map::TypeIdMap;
