use tc_wire::{Capabilities, Document};

use crate::Error;

/// One concrete wire format.
///
/// A format converts between its representation and an untyped
/// [`Document`]. The schema walk then runs against the document with the
/// format's [`Capabilities`].
pub trait Format {
    /// Short lowercase name, used in log messages.
    const NAME: &'static str;

    /// The structural features of the format.
    const CAPABILITIES: Capabilities;

    /// What [`read`](Self::read) accepts: text or bytes.
    type Input: ?Sized;

    /// What [`write`](Self::write) produces.
    type Output;

    fn read(input: &Self::Input) -> Result<Document, Error>;

    fn write(document: &Document) -> Result<Self::Output, Error>;
}
