use crate::{Capabilities, Scalar, WireError};

// -----------------------------------------------------------------------------
// WireSink

/// The producer side of the wire event model.
///
/// Events must be balanced: every `begin_map` is closed by `end_map`, every
/// `begin_seq` by `end_seq`. Inside a map, keys and values alternate, starting
/// with a key.
pub trait WireSink {
    /// The structural features of the format behind this sink.
    fn capabilities(&self) -> Capabilities;

    /// Opens a map. `size_hint` is the number of entries, when known.
    fn begin_map(&mut self, size_hint: Option<usize>) -> Result<(), WireError>;

    /// Writes the key of the next map entry.
    fn map_key(&mut self, key: Scalar) -> Result<(), WireError>;

    /// Closes the innermost map.
    fn end_map(&mut self) -> Result<(), WireError>;

    /// Opens a sequence. `size_hint` is the number of items, when known.
    fn begin_seq(&mut self, size_hint: Option<usize>) -> Result<(), WireError>;

    /// Closes the innermost sequence.
    fn end_seq(&mut self) -> Result<(), WireError>;

    /// Writes a scalar value.
    fn value(&mut self, scalar: Scalar) -> Result<(), WireError>;

    /// Writes a null value.
    fn null(&mut self) -> Result<(), WireError>;
}

impl<S: WireSink + ?Sized> WireSink for &mut S {
    #[inline]
    fn capabilities(&self) -> Capabilities {
        (**self).capabilities()
    }

    #[inline]
    fn begin_map(&mut self, size_hint: Option<usize>) -> Result<(), WireError> {
        (**self).begin_map(size_hint)
    }

    #[inline]
    fn map_key(&mut self, key: Scalar) -> Result<(), WireError> {
        (**self).map_key(key)
    }

    #[inline]
    fn end_map(&mut self) -> Result<(), WireError> {
        (**self).end_map()
    }

    #[inline]
    fn begin_seq(&mut self, size_hint: Option<usize>) -> Result<(), WireError> {
        (**self).begin_seq(size_hint)
    }

    #[inline]
    fn end_seq(&mut self) -> Result<(), WireError> {
        (**self).end_seq()
    }

    #[inline]
    fn value(&mut self, scalar: Scalar) -> Result<(), WireError> {
        (**self).value(scalar)
    }

    #[inline]
    fn null(&mut self) -> Result<(), WireError> {
        (**self).null()
    }
}
