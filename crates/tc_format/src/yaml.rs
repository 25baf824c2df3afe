use tc_wire::{Capabilities, Document};

use crate::{Error, Format};

/// YAML through `serde_yaml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Yaml;

impl Format for Yaml {
    const NAME: &'static str = "yaml";
    const CAPABILITIES: Capabilities = Capabilities::YAML;

    type Input = str;
    type Output = String;

    fn read(input: &str) -> Result<Document, Error> {
        Ok(serde_yaml::from_str(input)?)
    }

    fn write(document: &Document) -> Result<String, Error> {
        Ok(serde_yaml::to_string(document)?)
    }
}

#[cfg(test)]
mod tests {
    use tc_wire::Document;

    use super::Yaml;
    use crate::Format;

    #[test]
    fn document_text() {
        let doc = Yaml::read("a: 1\nb:\n  - x\n  - ~\n").unwrap();
        assert_eq!(doc.get("a"), Some(&Document::Int(1)));
        assert_eq!(
            doc.get("b"),
            Some(&Document::Seq(vec![Document::Str("x".into()), Document::Null]))
        );
        let again = Yaml::read(&Yaml::write(&doc).unwrap()).unwrap();
        assert_eq!(again, doc);
    }
}
