use core::fmt;

use crate::{Capabilities, Scalar, WireError};

// -----------------------------------------------------------------------------
// WireKind

/// What the next pull from a [`WireSource`] would yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireKind {
    Map,
    Seq,
    Scalar,
    Null,
    /// The innermost container (or the whole stream) has no further value.
    End,
}

impl WireKind {
    pub const fn name(self) -> &'static str {
        match self {
            WireKind::Map => "map",
            WireKind::Seq => "seq",
            WireKind::Scalar => "scalar",
            WireKind::Null => "null",
            WireKind::End => "end",
        }
    }
}

impl fmt::Display for WireKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// -----------------------------------------------------------------------------
// WireSource

/// The pull side of the wire event model.
///
/// Inside a map, entries are read with [`next_map_key`](Self::next_map_key)
/// followed by exactly one value pull (or [`skip_value`](Self::skip_value)).
/// While positioned before a key, [`peek_kind`](Self::peek_kind) reports
/// [`WireKind::Scalar`] or [`WireKind::End`].
///
/// Sources are rewindable: [`checkpoint`](Self::checkpoint) captures the
/// current position and [`rewind`](Self::rewind) restores it. Union decoding
/// relies on this to try members one after another.
pub trait WireSource {
    /// An opaque saved position.
    type Checkpoint;

    /// The structural features of the format behind this source.
    fn capabilities(&self) -> Capabilities;

    /// Kind of the next value, without consuming it.
    fn peek_kind(&mut self) -> Result<WireKind, WireError>;

    /// Enters a map. Returns the number of entries, when known.
    fn enter_map(&mut self) -> Result<Option<usize>, WireError>;

    /// Reads the next key of the innermost map, `None` once it is exhausted.
    fn next_map_key(&mut self) -> Result<Option<Scalar>, WireError>;

    /// Leaves the innermost map. All entries must have been read.
    fn exit_map(&mut self) -> Result<(), WireError>;

    /// Enters a sequence. Returns the number of items, when known.
    fn enter_seq(&mut self) -> Result<Option<usize>, WireError>;

    /// Leaves the innermost sequence. All items must have been read.
    fn exit_seq(&mut self) -> Result<(), WireError>;

    /// Pulls a scalar value.
    fn next_scalar(&mut self) -> Result<Scalar, WireError>;

    /// Pulls a null value.
    fn next_null(&mut self) -> Result<(), WireError>;

    /// Consumes the next value, whatever its shape.
    fn skip_value(&mut self) -> Result<(), WireError>;

    fn checkpoint(&self) -> Self::Checkpoint;

    fn rewind(&mut self, checkpoint: Self::Checkpoint);
}

impl<S: WireSource + ?Sized> WireSource for &mut S {
    type Checkpoint = S::Checkpoint;

    #[inline]
    fn capabilities(&self) -> Capabilities {
        (**self).capabilities()
    }

    #[inline]
    fn peek_kind(&mut self) -> Result<WireKind, WireError> {
        (**self).peek_kind()
    }

    #[inline]
    fn enter_map(&mut self) -> Result<Option<usize>, WireError> {
        (**self).enter_map()
    }

    #[inline]
    fn next_map_key(&mut self) -> Result<Option<Scalar>, WireError> {
        (**self).next_map_key()
    }

    #[inline]
    fn exit_map(&mut self) -> Result<(), WireError> {
        (**self).exit_map()
    }

    #[inline]
    fn enter_seq(&mut self) -> Result<Option<usize>, WireError> {
        (**self).enter_seq()
    }

    #[inline]
    fn exit_seq(&mut self) -> Result<(), WireError> {
        (**self).exit_seq()
    }

    #[inline]
    fn next_scalar(&mut self) -> Result<Scalar, WireError> {
        (**self).next_scalar()
    }

    #[inline]
    fn next_null(&mut self) -> Result<(), WireError> {
        (**self).next_null()
    }

    #[inline]
    fn skip_value(&mut self) -> Result<(), WireError> {
        (**self).skip_value()
    }

    #[inline]
    fn checkpoint(&self) -> Self::Checkpoint {
        (**self).checkpoint()
    }

    #[inline]
    fn rewind(&mut self, checkpoint: Self::Checkpoint) {
        (**self).rewind(checkpoint)
    }
}
