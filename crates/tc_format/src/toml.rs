use tc_wire::{Capabilities, Document};

use crate::{Error, Format};

/// TOML through the `toml` crate.
///
/// TOML has no null, and the root must be a table. Plain values of a table
/// are written before its sub-tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct Toml;

impl Format for Toml {
    const NAME: &'static str = "toml";
    const CAPABILITIES: Capabilities = Capabilities::TOML;

    type Input = str;
    type Output = String;

    fn read(input: &str) -> Result<Document, Error> {
        Ok(toml::from_str(input)?)
    }

    fn write(document: &Document) -> Result<String, Error> {
        Ok(toml::to_string(document)?)
    }
}

#[cfg(test)]
mod tests {
    use tc_wire::Document;

    use super::Toml;
    use crate::Format;

    #[test]
    fn document_text() {
        let doc = Toml::read("name = \"x\"\n\n[inner]\nn = 2\n").unwrap();
        assert_eq!(doc.get("name"), Some(&Document::Str("x".into())));
        assert_eq!(
            doc.get("inner").and_then(|inner| inner.get("n")),
            Some(&Document::Int(2))
        );
        let again = Toml::read(&Toml::write(&doc).unwrap()).unwrap();
        assert_eq!(again, doc);
    }
}
