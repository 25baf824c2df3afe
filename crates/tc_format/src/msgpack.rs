use tc_wire::{Capabilities, Document};

use crate::{Error, Format};

/// MessagePack through `rmp-serde`.
///
/// Keys may be any scalar and byte strings are native. Flattened fields
/// are not supported.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessagePack;

impl Format for MessagePack {
    const NAME: &'static str = "msgpack";
    const CAPABILITIES: Capabilities = Capabilities::MESSAGEPACK;

    type Input = [u8];
    type Output = Vec<u8>;

    fn read(input: &[u8]) -> Result<Document, Error> {
        Ok(rmp_serde::from_slice(input)?)
    }

    fn write(document: &Document) -> Result<Vec<u8>, Error> {
        Ok(rmp_serde::to_vec(document)?)
    }
}

#[cfg(test)]
mod tests {
    use tc_wire::Document;

    use super::MessagePack;
    use crate::Format;

    #[test]
    fn document_bytes() {
        let doc = Document::Map(vec![
            (Document::Int(1), Document::Bytes(vec![0, 255])),
            (Document::Str("k".into()), Document::Null),
        ]);
        let bytes = MessagePack::write(&doc).unwrap();
        assert_eq!(MessagePack::read(&bytes).unwrap(), doc);
    }
}
