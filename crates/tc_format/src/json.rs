use tc_wire::{Capabilities, Document};

use crate::{Error, Format};

/// JSON through `serde_json`.
///
/// Map keys are strings and there is no byte string.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl Format for Json {
    const NAME: &'static str = "json";
    const CAPABILITIES: Capabilities = Capabilities::JSON;

    type Input = str;
    type Output = String;

    fn read(input: &str) -> Result<Document, Error> {
        Ok(serde_json::from_str(input)?)
    }

    fn write(document: &Document) -> Result<String, Error> {
        Ok(serde_json::to_string(document)?)
    }
}
