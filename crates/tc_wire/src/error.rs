use thiserror::Error;

// -----------------------------------------------------------------------------
// WireError

/// Structural failure reported by a [`WireSource`](crate::WireSource) or a
/// [`WireSink`](crate::WireSink).
///
/// These are protocol violations of the event stream itself (unbalanced
/// containers, reading past the end). Type disagreements between a schema and
/// the data are reported by the codec, not here.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum WireError {
    #[error("expected {expected} but the stream holds {actual}")]
    Unexpected {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("the event stream has no further value")]
    Exhausted,

    #[error("`{0}` does not match the innermost open container")]
    Unbalanced(&'static str),

    #[error("{0} unread entries left in the container")]
    Trailing(usize),

    #[error("map keys must be scalars, found {0}")]
    NonScalarKey(&'static str),

    #[error("a map key was written without its value")]
    DanglingKey,

    #[error("a value was written where a map key was expected")]
    KeyExpected,

    #[error("the event stream already produced a root value")]
    MultipleRoots,

    #[error("{0}")]
    Custom(String),
}
